//! # NumPy
//!
//! Reads `edge_index` arrays written by `numpy.save`: a `2 x E` array of 32 or 64-bit
//! integers whose first row holds the sources and second row the targets. C and Fortran
//! order are both accepted, as are gzipped files (`*.npy.gz`).

use std::io::{BufRead, Read};

use npyz::{DType, NpyFile, Order, TypeChar};

use super::*;

/// A GraphReader for `*.npy` coordinate arrays
#[derive(Debug, Copy, Clone, Default)]
pub struct NpyReader {
    number_of_nodes: Option<NumNodes>,
}

impl NpyReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the number of nodes; otherwise it is the largest id plus one
    pub fn number_of_nodes(mut self, n: NumNodes) -> Self {
        self.number_of_nodes = Some(n);
        self
    }

    /// Reads the two coordinate rows `(sources, targets)` of an `edge_index` array.
    ///
    /// # Errors
    /// - [`Error::MalformedInput`] (line 0) if the array is not a `2 x E` integer array
    /// - [`Error::Io`] if the header or the data cannot be read
    pub fn coordinates<R: Read>(&self, reader: R) -> Result<(Vec<i64>, Vec<i64>)> {
        let npy = NpyFile::new(reader)?;

        let shape = npy.shape().to_vec();
        let [2, num_edges] = shape[..] else {
            return Err(Error::malformed(
                0,
                format!("expected an array of shape (2, E), found {shape:?}"),
            ));
        };
        let num_edges = num_edges as usize;
        let order = npy.order();

        let DType::Plain(ty) = npy.dtype() else {
            return Err(Error::malformed(0, "expected a plain integer dtype"));
        };
        let data: Vec<i64> = match (ty.type_char(), ty.size_field()) {
            (TypeChar::Int, 8) => npy.into_vec::<i64>()?,
            (TypeChar::Int, 4) => npy.into_vec::<i32>()?.into_iter().map(i64::from).collect(),
            (TypeChar::Uint, 4) => npy.into_vec::<u32>()?.into_iter().map(i64::from).collect(),
            _ => {
                return Err(Error::malformed(
                    0,
                    format!("unsupported dtype {ty}, expected 32 or 64-bit integers"),
                ));
            }
        };

        Ok(match order {
            Order::C => {
                let mut sources = data;
                let targets = sources.split_off(num_edges);
                (sources, targets)
            }
            Order::Fortran => data.chunks_exact(2).map(|pair| (pair[0], pair[1])).unzip(),
        })
    }
}

impl<G: GraphFromScratch> GraphReader<G> for NpyReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        let (sources, targets) = self.coordinates(reader)?;

        let bound = self.number_of_nodes.unwrap_or(INVALID_NODE);
        let to_node = |x: i64| {
            if (0..bound as i64).contains(&x) {
                Ok(x as Node)
            } else {
                Err(Error::node_out_of_range(x, bound))
            }
        };
        let edges = sources
            .iter()
            .zip(&targets)
            .map(|(&u, &v)| -> Result<Edge> { Ok(Edge(to_node(u)?, to_node(v)?)) });

        match self.number_of_nodes {
            Some(n) => G::try_from_fallible_edges(n, edges),
            None => {
                let edges = edges.collect::<Result<Vec<_>>>()?;
                let n = edges
                    .iter()
                    .map(|&Edge(u, v)| u.max(v) + 1)
                    .max()
                    .unwrap_or(0);

                G::try_from_edges(n, edges)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::repr::*;
    use itertools::Itertools;

    /// Serializes `data` as a version 1.0 `.npy` file
    pub(crate) fn npy_bytes(descr: &str, fortran: bool, shape: &[usize], data: &[u8]) -> Vec<u8> {
        let mut dims = shape.iter().join(", ");
        if shape.len() == 1 {
            dims.push(',');
        }
        let fortran = if fortran { "True" } else { "False" };

        let mut header =
            format!("{{'descr': '{descr}', 'fortran_order': {fortran}, 'shape': ({dims}), }}");
        while (10 + header.len() + 1) % 64 != 0 {
            header.push(' ');
        }
        header.push('\n');

        let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
        bytes.extend((header.len() as u16).to_le_bytes());
        bytes.extend(header.as_bytes());
        bytes.extend(data);
        bytes
    }

    pub(crate) fn edge_index_i64(sources: &[i64], targets: &[i64]) -> Vec<u8> {
        let data = sources
            .iter()
            .chain(targets)
            .flat_map(|x| x.to_le_bytes())
            .collect_vec();
        npy_bytes("<i8", false, &[2, sources.len()], &data)
    }

    fn read(reader: NpyReader, bytes: &[u8]) -> Result<CompressedCsr> {
        reader.try_read_graph(bytes)
    }

    #[test]
    fn c_order_int64() {
        let bytes = edge_index_i64(&[0, 0, 1, 1], &[1, 2, 2, 3]);
        let graph = read(NpyReader::new(), &bytes).unwrap();

        assert_eq!(graph, CompressedCsr::build(4, [(0, 1), (0, 2), (1, 2), (1, 3)]).unwrap());

        let graph = read(NpyReader::new().number_of_nodes(10), &bytes).unwrap();
        assert_eq!(graph.order(), 10);
        assert_eq!(graph.size(), 4);
    }

    #[test]
    fn fortran_order_int32() {
        // column-major: (u0, v0), (u1, v1), ...
        let data = [2i32, 0, 1, 2, 2, 1]
            .iter()
            .flat_map(|x| x.to_le_bytes())
            .collect_vec();
        let bytes = npy_bytes("<i4", true, &[2, 3], &data);

        let graph = read(NpyReader::new(), &bytes).unwrap();
        assert_eq!(graph.edges().collect_vec(), vec![Edge(1, 2), Edge(2, 0), Edge(2, 1)]);
    }

    #[test]
    fn rejects_bad_arrays() {
        let data = [0i64; 6].iter().flat_map(|x| x.to_le_bytes()).collect_vec();
        assert!(matches!(
            read(NpyReader::new(), &npy_bytes("<i8", false, &[3, 2], &data)),
            Err(Error::MalformedInput { line: 0, .. })
        ));
        assert!(matches!(
            read(NpyReader::new(), &npy_bytes("<f8", false, &[2, 3], &data)),
            Err(Error::MalformedInput { line: 0, .. })
        ));
        assert!(matches!(
            read(NpyReader::new(), b"not a numpy file"),
            Err(Error::Io(_))
        ));

        assert!(matches!(
            read(NpyReader::new(), &edge_index_i64(&[0, -2], &[1, 1])),
            Err(Error::NodeOutOfRange { node: -2, .. })
        ));
        assert!(matches!(
            read(NpyReader::new().number_of_nodes(2), &edge_index_i64(&[0], &[2])),
            Err(Error::NodeOutOfRange { node: 2, order: 2 })
        ));
    }
}
