//! # EdgeList
//!
//! The EdgeList-Format consists of non-comment lines `u v` (or `u,v` for CSV files), each
//! representing a directed edge `Edge(u, v)`. Ids are 0-based unless the reader is
//! configured as `one_indexed`. CSV input ([`Separator::Comma`]) goes through the `csv`
//! crate, so quoted fields and CRLF line endings are accepted.
//!
//! ```
//! use glzip::{io::*, prelude::*};
//!
//! let input = "# a comment\n0 1\n0 2\n\n1 2\n1 3\n";
//! let graph: CompressedCsr = EdgeListReader::new().try_read_graph(input.as_bytes()).unwrap();
//!
//! assert_eq!(graph.order(), 4);
//! assert_eq!(graph.size(), 4);
//! ```

use std::{
    io::{BufRead, Lines},
    path::Path,
};

use csv::{ReaderBuilder, StringRecordsIntoIter, Trim};

use super::*;

/// Token separator of an edge list
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Separator {
    /// Commas for `*.csv` / `*.csv.gz` files; otherwise commas and whitespace are accepted
    #[default]
    Auto,
    /// Any amount of whitespace
    Whitespace,
    /// Comma-separated values; fields may be quoted, surrounding whitespace is ignored
    Comma,
}

impl Separator {
    /// Resolves [`Separator::Auto`] by the file name of `path`
    pub fn for_path(self, path: &Path) -> Self {
        if self != Separator::Auto {
            return self;
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".csv") || name.ends_with(".csv.gz") {
            Separator::Comma
        } else {
            Separator::Auto
        }
    }

    /// Splits a non-CSV `line` into tokens
    fn split<'a>(&self, line: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            Separator::Whitespace => Box::new(line.split_whitespace()),
            Separator::Auto | Separator::Comma => Box::new(
                line.split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|t| !t.is_empty()),
            ),
        }
    }
}

/// A GraphReader for edge lists and CSV files
#[derive(Debug, Clone)]
pub struct EdgeListReader {
    separator: Separator,
    /// Lines starting with any of these are skipped
    comment_identifiers: Vec<String>,
    skip_header: bool,
    one_indexed: bool,
    number_of_nodes: Option<NumNodes>,
}

impl Default for EdgeListReader {
    fn default() -> Self {
        Self {
            separator: Separator::Auto,
            comment_identifiers: vec!["#".to_string(), "%".to_string()],
            skip_header: false,
            one_indexed: false,
            number_of_nodes: None,
        }
    }
}

impl EdgeListReader {
    /// Creates a new (default) reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the separator
    pub fn separator(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Replaces the comment identifiers by a single one
    pub fn comment_identifier<S: Into<String>>(mut self, c: S) -> Self {
        self.comment_identifiers = vec![c.into()];
        self
    }

    /// Skips the first non-comment line (e.g. a CSV header `src,dst`)
    pub fn skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    /// Interprets ids as 1-based and subtracts one
    pub fn one_indexed(mut self, one_indexed: bool) -> Self {
        self.one_indexed = one_indexed;
        self
    }

    /// Fixes the number of nodes; otherwise it is the largest id plus one
    pub fn number_of_nodes(mut self, n: NumNodes) -> Self {
        self.number_of_nodes = Some(n);
        self
    }

    /// Returns a lazy iterator over the edges of `reader`
    pub fn edges<R: BufRead>(&self, reader: R) -> EdgeListEdges<'_, R> {
        let records = match self.separator {
            Separator::Comma => Records::Csv(
                ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .trim(Trim::All)
                    .from_reader(reader)
                    .into_records(),
            ),
            _ => Records::Lines(reader.lines()),
        };

        EdgeListEdges {
            records,
            line: 0,
            header_pending: self.skip_header,
            settings: self,
        }
    }

    fn read_graph_with<G, R>(&self, reader: R) -> Result<G>
    where
        G: GraphFromScratch,
        R: BufRead,
    {
        match self.number_of_nodes {
            Some(n) => G::try_from_fallible_edges(n, self.edges(reader)),
            None => {
                let edges = self.edges(reader).collect::<Result<Vec<_>>>()?;
                // ids are smaller than `INVALID_NODE`, so this cannot overflow
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

impl<G: GraphFromScratch> GraphReader<G> for EdgeListReader {
    fn try_read_graph<R: BufRead>(&self, reader: R) -> Result<G> {
        self.read_graph_with(reader)
    }

    fn try_read_graph_file<P: AsRef<Path>>(&self, path: P) -> Result<G> {
        let path = path.as_ref();
        let reader = self
            .clone()
            .separator(self.separator.for_path(path));
        reader.read_graph_with(open_file(path)?)
    }
}

/// Trait for creating graphs from an EdgeListReader.
/// Used as shorthand for default EdgeListReader settings
pub trait EdgeListRead: Sized {
    /// Tries to read the graph from a given reader
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self>;

    /// Tries to read the graph from a given (possibly gzipped) file
    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

impl<G> EdgeListRead for G
where
    G: GraphFromScratch,
{
    fn try_read_edge_list<R: BufRead>(reader: R) -> Result<Self> {
        EdgeListReader::default().try_read_graph(reader)
    }

    fn try_read_edge_list_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        EdgeListReader::default().try_read_graph_file(path)
    }
}

/// Source of raw records of an [`EdgeListEdges`]
enum Records<R> {
    Lines(Lines<R>),
    Csv(StringRecordsIntoIter<R>),
}

/// Lazy iterator over the edges of an edge list; see [`EdgeListReader::edges`]
pub struct EdgeListEdges<'a, R> {
    records: Records<R>,
    /// 1-based number of the last line read
    line: usize,
    header_pending: bool,
    settings: &'a EdgeListReader,
}

impl<R: BufRead> EdgeListEdges<'_, R> {
    /// Returns *true* if a record starting with `head` carries no edge
    fn skip_record(&mut self, head: &str) -> bool {
        let head = head.trim();
        if head.is_empty()
            || self
                .settings
                .comment_identifiers
                .iter()
                .any(|c| head.starts_with(c.as_str()))
        {
            return true;
        }

        std::mem::replace(&mut self.header_pending, false)
    }

    /// Parses a single id token
    fn parse_id(&self, token: Option<&str>, name: &str) -> Result<Node> {
        let line = self.line;
        let Some(token) = token else {
            return Err(Error::malformed(
                line,
                format!("premature end of line, missing {name}"),
            ));
        };
        raise_error_unless!(
            !token.is_empty(),
            Error::malformed(line, format!("empty {name}"))
        );

        let id: i64 = token
            .parse()
            .map_err(|_| Error::malformed(line, format!("cannot parse {name} from {token:?}")))?;
        let id = if self.settings.one_indexed { id - 1 } else { id };

        raise_error_unless!(
            (0..INVALID_NODE as i64).contains(&id),
            Error::NodeOutOfRange {
                node: id,
                order: self.settings.number_of_nodes.unwrap_or(INVALID_NODE) as u64,
            }
        );
        Ok(id as Node)
    }

    fn parse_edge<'t>(&self, mut tokens: impl Iterator<Item = &'t str>) -> Result<Edge> {
        let u = self.parse_id(tokens.next(), "source node")?;
        let v = self.parse_id(tokens.next(), "target node")?;
        raise_error_unless!(
            tokens.next().is_none(),
            Error::malformed(self.line, "expected exactly two node ids")
        );

        Ok(Edge(u, v))
    }

    fn next_edge(&mut self) -> Result<Option<Edge>> {
        loop {
            match &mut self.records {
                Records::Lines(lines) => {
                    let Some(line) = lines.next() else {
                        return Ok(None);
                    };
                    let line = line?;
                    self.line += 1;

                    if self.skip_record(&line) {
                        continue;
                    }
                    return self.parse_edge(self.settings.separator.split(&line)).map(Some);
                }
                Records::Csv(records) => {
                    let Some(record) = records.next() else {
                        return Ok(None);
                    };
                    let record = record.map_err(|err| csv_error(err, self.line + 1))?;
                    self.line = record
                        .position()
                        .map_or(self.line + 1, |pos| pos.line() as usize);

                    if self.skip_record(record.get(0).unwrap_or_default()) {
                        continue;
                    }
                    return self.parse_edge(record.iter()).map(Some);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for EdgeListEdges<'_, R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_edge().transpose()
    }
}

/// Maps a CSV error onto [`Error::Io`] or [`Error::MalformedInput`]
fn csv_error(err: csv::Error, line: usize) -> Error {
    let line = err.position().map_or(line, |pos| pos.line() as usize);
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(err) => Error::Io(err),
        _ => Error::malformed(line, reason),
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use super::*;
    use crate::repr::*;
    use flate2::{Compression, write::GzEncoder};
    use itertools::Itertools;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn read(reader: EdgeListReader, input: &str) -> Result<CompressedCsr> {
        reader.try_read_graph(input.as_bytes())
    }

    #[test]
    fn whitespace_and_comments() {
        let graph = read(EdgeListReader::new(), "% header\n# c\n0 1\n  2\t0  \n\n0 1\n").unwrap();
        assert_eq!(graph.order(), 3);
        assert_eq!(graph.edges().collect_vec(), vec![Edge(0, 1), Edge(2, 0)]);

        let graph = read(EdgeListReader::new().number_of_nodes(10), "0 1\n").unwrap();
        assert_eq!(graph.order(), 10);

        let graph = read(EdgeListReader::new(), "").unwrap();
        assert_eq!(graph.order(), 0);
    }

    #[test]
    fn csv_with_header() {
        let reader = EdgeListReader::new()
            .separator(Separator::Comma)
            .skip_header(true);
        let graph = read(reader, "src,dst\n1, 2\n2,0\n").unwrap();
        assert_eq!(graph.edges().collect_vec(), vec![Edge(1, 2), Edge(2, 0)]);

        let err = read(EdgeListReader::new().separator(Separator::Comma), "src,dst\n1,2\n");
        assert!(matches!(err, Err(Error::MalformedInput { line: 1, .. })));

        let err = read(EdgeListReader::new().separator(Separator::Comma), "1,,2\n");
        assert!(matches!(err, Err(Error::MalformedInput { line: 1, .. })));
    }

    #[test]
    fn csv_quotes_crlf_and_comments() {
        let csv = EdgeListReader::new().separator(Separator::Comma);

        let graph = read(csv.clone(), "\"1\",\"2\"\r\n2, 0\r\n").unwrap();
        assert_eq!(graph.edges().collect_vec(), vec![Edge(1, 2), Edge(2, 0)]);

        let graph = read(csv.clone().skip_header(true), "# c\n% d\nsrc,dst\n\n0,1\n").unwrap();
        assert_eq!(graph.edges().collect_vec(), vec![Edge(0, 1)]);

        match read(csv.clone(), "0,1\n# c\n2,x\n") {
            Err(Error::MalformedInput { line: 3, .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }

        let invalid_utf8: Result<CompressedCsr> = csv.try_read_graph(&b"0,1\n\xff,2\n"[..]);
        assert!(matches!(invalid_utf8, Err(Error::MalformedInput { .. })));
    }

    #[test]
    fn one_indexed_ids() {
        let reader = EdgeListReader::new().one_indexed(true);
        let graph = read(reader.clone(), "1 2\n3 3\n").unwrap();
        assert_eq!(graph.edges().collect_vec(), vec![Edge(0, 1), Edge(2, 2)]);

        assert!(matches!(
            read(reader, "0 1\n"),
            Err(Error::NodeOutOfRange { node: -1, .. })
        ));
    }

    #[test]
    fn malformed_lines_report_position() {
        for (input, line) in [
            ("0 1\n1\n", 2),
            ("0 1\n# c\n1 2 3\n", 3),
            ("0 x\n", 1),
            ("0 1\n\n1.5 2\n", 3),
        ] {
            match read(EdgeListReader::new(), input) {
                Err(Error::MalformedInput { line: l, .. }) => assert_eq!(l, line, "{input:?}"),
                other => panic!("unexpected result for {input:?}: {other:?}"),
            }
        }

        assert!(matches!(
            read(EdgeListReader::new(), "0 -3\n"),
            Err(Error::NodeOutOfRange { node: -3, .. })
        ));
        assert!(matches!(
            read(EdgeListReader::new(), "0 4294967296\n"),
            Err(Error::NodeOutOfRange { node: 4_294_967_296, .. })
        ));
        assert!(matches!(
            read(EdgeListReader::new().number_of_nodes(3), "0 3\n"),
            Err(Error::NodeOutOfRange { node: 3, order: 3 })
        ));
    }

    #[test]
    fn separators_by_file_name() {
        assert_eq!(Separator::Auto.for_path(Path::new("a/b.csv")), Separator::Comma);
        assert_eq!(Separator::Auto.for_path(Path::new("b.CSV.gz")), Separator::Comma);
        assert_eq!(Separator::Auto.for_path(Path::new("b.txt")), Separator::Auto);
        assert_eq!(
            Separator::Whitespace.for_path(Path::new("b.csv")),
            Separator::Whitespace
        );
        assert!(is_gzipped(Path::new("edges.csv.gz")));
        assert!(!is_gzipped(Path::new("edges.csv")));
    }

    #[test]
    fn read_plain_and_gzipped_files() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);
        let expected: CsrGraph = crate::gens::RandomGraph::gnm(rng, 200, 1000).unwrap();
        let csv = expected
            .edges()
            .map(|Edge(u, v)| format!("{u},{v}\n"))
            .collect::<String>();

        let dir = tempfile::tempdir().unwrap();

        let plain = dir.path().join("edges.csv");
        std::fs::write(&plain, &csv).unwrap();

        let gzipped = dir.path().join("edges.csv.gz");
        let file = std::fs::File::create(&gzipped).unwrap();
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(csv.as_bytes()).unwrap();
        encoder.finish().unwrap();

        for path in [&plain, &gzipped] {
            let graph: CompressedCsr = EdgeListReader::new()
                .number_of_nodes(200)
                .try_read_graph_file(path)
                .unwrap();
            assert_eq!(CsrGraph::from(&graph), expected);

            let graph = CompressedCsr::try_read_edge_list_file(path).unwrap();
            assert_eq!(graph.size(), expected.number_of_edges());
        }

        assert!(matches!(
            CompressedCsr::try_read_edge_list_file(dir.path().join("missing.csv")),
            Err(Error::Io(_))
        ));
    }
}
