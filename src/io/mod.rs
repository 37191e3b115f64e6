/*!
# IO

Reading edge lists into any [`GraphFromScratch`] graph, most importantly
[`CompressedCsr`](crate::repr::CompressedCsr).

Supported inputs:
- **EdgeList**: one edge `u v` per line, separated by whitespace,
- **CSV**: one edge `u,v` per line,
- **NumPy**: a `2 x E` integer `edge_index` array (`*.npy`), see [`NpyReader`],

each either plain or gzip-compressed (`*.gz`). See [`EdgeListReader`] for the options of
the text formats; [`try_load_graph_file`] picks the reader by file name.

Parsing errors are reported as [`Error::MalformedInput`] with the 1-based line number,
ids that are negative or do not fit into a [`Node`] as [`Error::NodeOutOfRange`].
*/

pub mod edge_list;
pub mod npy;

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::{edge::*, error::*, node::*, ops::*};

pub use edge_list::*;
pub use npy::*;

/// Trait for types that can read graphs in a specific format.
pub trait GraphReader<G> {
    /// Reads a graph from the given reader according to the settings in `self`.
    ///
    /// # Errors
    /// Returns an error if reading fails or the input is not a valid representation
    /// of a graph in the expected format.
    fn try_read_graph<R>(&self, reader: R) -> Result<G>
    where
        R: BufRead;

    /// Reads a graph from a file according to the settings in `self`.
    /// Files ending in `.gz` are decompressed on the fly.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or if its contents
    /// are not a valid representation of a graph in the expected format.
    fn try_read_graph_file<P>(&self, path: P) -> Result<G>
    where
        P: AsRef<Path>,
    {
        self.try_read_graph(open_file(path.as_ref())?)
    }
}

/// Returns *true* if `path` names a gzip-compressed file
pub fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens `path` for buffered reading, transparently decompressing `*.gz` files
pub fn open_file(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)?;
    let gzipped = is_gzipped(path);

    debug!(path = %path.display(), gzipped, "io.open");

    Ok(if gzipped {
        Box::new(BufReader::new(MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    })
}

/// Returns *true* if `path` names a (possibly gzipped) NumPy array
pub fn is_npy(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    name.ends_with(".npy") || name.ends_with(".npy.gz")
}

/// Reads a graph from `*.npy`, `*.csv` or edge list files (each optionally gzipped)
/// with default reader settings, choosing the format by file name.
///
/// # Errors
/// Fails like the [`GraphReader`] of the chosen format.
pub fn try_load_graph_file<G, P>(path: P) -> Result<G>
where
    G: GraphFromScratch,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if is_npy(path) {
        NpyReader::new().try_read_graph_file(path)
    } else {
        EdgeListReader::new().try_read_graph_file(path)
    }
}

/// Shorthand for returning early with an error when a condition fails
macro_rules! raise_error_unless {
    ($cond : expr, $err : expr) => {
        if !($cond) {
            return Err($err);
        }
    };
}

use raise_error_unless;

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::repr::*;
    use flate2::{Compression, write::GzEncoder};

    #[test]
    fn load_picks_format_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let expected = CompressedCsr::build(4, [(0, 1), (0, 2), (1, 2), (1, 3)]).unwrap();

        let npy = dir.path().join("edge_index.npy");
        std::fs::write(&npy, npy::test::edge_index_i64(&[0, 0, 1, 1], &[1, 2, 2, 3])).unwrap();

        let npy_gz = dir.path().join("edge_index.npy.gz");
        let mut encoder = GzEncoder::new(File::create(&npy_gz).unwrap(), Compression::default());
        encoder
            .write_all(&npy::test::edge_index_i64(&[1, 0, 1, 0], &[3, 2, 2, 1]))
            .unwrap();
        encoder.finish().unwrap();

        let csv = dir.path().join("edges.csv");
        std::fs::write(&csv, "0,1\n0,2\n1,2\n1,3\n").unwrap();

        let txt = dir.path().join("edges.txt");
        std::fs::write(&txt, "0 1\n0 2\n1 2\n1 3\n").unwrap();

        for path in [&npy, &npy_gz, &csv, &txt] {
            let graph: CompressedCsr = try_load_graph_file(path).unwrap();
            assert_eq!(graph, expected, "{}", path.display());
        }

        assert!(is_npy(Path::new("a/B.NPY")));
        assert!(!is_npy(Path::new("a/b.npz")));
    }
}
