use csv::{ByteRecord, Reader, ReaderBuilder};
use encoding::{DecoderTrap, EncodingRef};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result, RowResult};
use crate::{Headers, Row};

fn decode(data: &ByteRecord, encoding: EncodingRef, path: &Path) -> RowResult {
    let mut row = Row::with_capacity(data.as_slice().len(), data.len());

    for item in data.iter() {
        let field = encoding
            .decode(item, DecoderTrap::Strict)
            .map_err(|reason| Error::Decode {
                path: path.to_path_buf(),
                reason: reason.into_owned(),
            })?;

        row.push_field(&field);
    }

    Ok(row)
}

/// Counts the empty lines at the start of `raw`. When the previous record
/// ended in `\r`, a leading `\n` completes its terminator and is not a line.
fn blank_lines(raw: &[u8], after_cr: bool) -> usize {
    let mut rest = match raw {
        [b'\n', tail @ ..] if after_cr => tail,
        _ => raw,
    };
    let mut count = 0;

    loop {
        rest = match rest {
            [b'\r', b'\n', tail @ ..] | [b'\r', tail @ ..] | [b'\n', tail @ ..] => tail,
            _ => return count,
        };

        count += 1;
    }
}

/// A delimited file loaded for reading. Every line is a row, the first one
/// included, and rows may have different lengths. An empty line is a row
/// with no fields.
pub struct ReaderSource {
    reader: Reader<Cursor<Vec<u8>>>,
    path: PathBuf,
    encoding: EncodingRef,
}

impl ReaderSource {
    /// `path` is only used to report errors.
    pub fn from_bytes<P: AsRef<Path>>(
        data: Vec<u8>,
        path: P,
        encoding: EncodingRef,
    ) -> ReaderSource {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(Cursor::new(data));

        ReaderSource {
            reader,
            path: path.as_ref().to_path_buf(),
            encoding,
        }
    }

    /// Reads the whole file. The handle is closed before this returns.
    pub fn from_path<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> Result<ReaderSource> {
        let data = fs::read(&path)?;

        Ok(ReaderSource::from_bytes(data, path, encoding))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The csv reader drops empty lines, so the bytes each read consumed are
/// inspected to put them back as empty rows.
pub struct IntoIter {
    reader: Reader<Cursor<Vec<u8>>>,
    record: ByteRecord,
    path: PathBuf,
    encoding: EncodingRef,
    consumed: usize,
    after_cr: bool,
    blank: usize,
    pending: Option<RowResult>,
    done: bool,
}

impl Iterator for IntoIter {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.blank > 0 {
            self.blank -= 1;
            return Some(Ok(Row::new()));
        }

        if let Some(row) = self.pending.take() {
            return Some(row);
        }

        if self.done {
            return None;
        }

        match self.reader.read_byte_record(&mut self.record) {
            Ok(more) => {
                let data = self.reader.get_ref().get_ref();
                let end = if more {
                    self.reader.position().byte() as usize
                } else {
                    data.len()
                };
                let raw = data.get(self.consumed..end).unwrap_or(&[]);

                self.blank = blank_lines(raw, self.after_cr);
                self.after_cr = raw.last() == Some(&b'\r');
                self.consumed = end;

                if more {
                    self.pending = Some(decode(&self.record, self.encoding, &self.path));
                } else {
                    self.done = true;
                }

                self.next()
            }
            Err(e) => {
                self.done = true;
                Some(Err(Error::Csv(e)))
            }
        }
    }
}

impl IntoIterator for ReaderSource {
    type Item = RowResult;

    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            reader: self.reader,
            record: ByteRecord::new(),
            path: self.path,
            encoding: self.encoding,
            consumed: 0,
            after_cr: false,
            blank: 0,
            pending: None,
            done: false,
        }
    }
}

/// A whole input file held in memory: the header and the data rows that
/// follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    headers: Headers,
    rows: Vec<Row>,
}

impl RecordTable {
    /// Reads every row of `source`. The file is closed before this returns,
    /// whatever the outcome.
    pub fn read(source: ReaderSource) -> Result<RecordTable> {
        let path = source.path().to_path_buf();
        let rows = source.into_iter().collect::<Result<Vec<Row>>>()?;

        debug!(path = %path.display(), rows = rows.len(), "read input");

        RecordTable::from_rows(rows, &path)
    }

    /// Splits `rows` into header and data rows. Fails if there is no row at
    /// all or if a data row lacks its leading field.
    pub fn from_rows<P: AsRef<Path>>(rows: Vec<Row>, path: P) -> Result<RecordTable> {
        let mut rows = rows.into_iter();

        let headers = match rows.next() {
            Some(row) => Headers::from_row(row),
            None => return Err(Error::EmptyInput(path.as_ref().to_path_buf())),
        };

        let rows: Vec<Row> = rows.collect();

        if let Some(pos) = rows.iter().position(|row| row.is_empty()) {
            return Err(Error::MalformedRow { row: pos + 1 });
        }

        Ok(RecordTable { headers, rows })
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_parts(self) -> (Headers, Vec<Row>) {
        (self.headers, self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::{blank_lines, ReaderSource, RecordTable, Row};
    use crate::error::{Error, ErrorKind, Result};
    use encoding::all::{UTF_8, WINDOWS_1252};

    fn rows(data: &str) -> Vec<Row> {
        ReaderSource::from_bytes(data.as_bytes().to_vec(), "mem.csv", UTF_8)
            .into_iter()
            .collect::<Result<Vec<Row>>>()
            .unwrap()
    }

    #[test]
    fn test_read_table() {
        let source = ReaderSource::from_path("test/assets/addresses.csv", UTF_8).unwrap();
        let table = RecordTable::read(source).unwrap();

        assert_eq!(*table.headers().as_row(), Row::from(vec!["Name", "Address"]));
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows()[0], Row::from(vec!["Alice", "123 Main St"]));
        assert_eq!(
            table.rows()[3],
            Row::from(vec!["Dan", "1 Comma, Quoted Rd"])
        );
    }

    #[test]
    fn test_rows_of_different_length() {
        let source = ReaderSource::from_path("test/assets/ragged.csv", UTF_8).unwrap();
        let table = RecordTable::read(source).unwrap();

        assert_eq!(table.rows()[0], Row::from(vec!["1"]));
        assert_eq!(table.rows()[1], Row::from(vec!["2", "b", "extra"]));
    }

    #[test]
    fn test_header_only() {
        let source = ReaderSource::from_path("test/assets/header_only.csv", UTF_8).unwrap();
        let table = RecordTable::read(source).unwrap();

        assert_eq!(table.headers().as_row().len(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_file() {
        let source = ReaderSource::from_path("test/assets/empty.csv", UTF_8).unwrap();

        match RecordTable::read(source) {
            Err(Error::EmptyInput(path)) => assert!(path.ends_with("empty.csv")),
            other => panic!("expected EmptyInput, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = ReaderSource::from_path("test/assets/does_not_exist.csv", UTF_8)
            .err()
            .unwrap();

        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_row_without_leading_field() {
        let rows = vec![
            Row::from(vec!["a", "b"]),
            Row::from(vec!["1", "2"]),
            Row::new(),
        ];

        match RecordTable::from_rows(rows, "x.csv") {
            Err(Error::MalformedRow { row }) => assert_eq!(row, 2),
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn different_encoding() {
        let source =
            ReaderSource::from_path("test/assets/windows1252/data.csv", WINDOWS_1252).unwrap();
        let table = RecordTable::read(source).unwrap();

        assert_eq!(*table.headers().as_row(), Row::from(vec!["name"]));
        assert_eq!(table.rows()[0], Row::from(vec!["árbol"]));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let source = ReaderSource::from_path("test/assets/windows1252/data.csv", UTF_8).unwrap();

        match RecordTable::read(source) {
            Err(Error::Decode { path, .. }) => assert!(path.ends_with("data.csv")),
            other => panic!("expected Decode, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(blank_lines(b"a,b\n", false), 0);
        assert_eq!(blank_lines(b"\n\na,b\n", false), 2);
        assert_eq!(blank_lines(b"\na,b\r", true), 0);
        assert_eq!(blank_lines(b"\n\r\na,b\r", true), 1);
        assert_eq!(blank_lines(b"\r\r\na", false), 2);
        assert_eq!(blank_lines(b"", true), 0);
    }

    #[test]
    fn test_empty_lines_are_empty_rows() {
        assert_eq!(
            rows("Name,Address\nA,1\n\nB,2\n"),
            vec![
                Row::from(vec!["Name", "Address"]),
                Row::from(vec!["A", "1"]),
                Row::new(),
                Row::from(vec!["B", "2"]),
            ]
        );
        assert_eq!(
            rows("Name,Address\r\nA,1\r\n\r\n\r\nB,2\r\n"),
            vec![
                Row::from(vec!["Name", "Address"]),
                Row::from(vec!["A", "1"]),
                Row::new(),
                Row::new(),
                Row::from(vec!["B", "2"]),
            ]
        );
    }

    #[test]
    fn test_trailing_empty_line() {
        assert_eq!(rows("a\r\n1\r\n").len(), 2);
        assert_eq!(rows("a\n1").len(), 2);
        assert_eq!(
            rows("a\r\n1\r\n\r\n"),
            vec![Row::from(vec!["a"]), Row::from(vec!["1"]), Row::new()]
        );
    }

    #[test]
    fn test_line_breaks_inside_quotes_are_not_empty_lines() {
        assert_eq!(
            rows("a,b\n\"x\n\ny\",2\n3,4\n"),
            vec![
                Row::from(vec!["a", "b"]),
                Row::from(vec!["x\n\ny", "2"]),
                Row::from(vec!["3", "4"]),
            ]
        );
    }

    #[test]
    fn test_empty_line_in_data_is_malformed() {
        let source = ReaderSource::from_bytes(
            b"Name,Address\r\nA,1\r\n\r\nB,2\r\n".to_vec(),
            "mem.csv",
            UTF_8,
        );

        match RecordTable::read(source) {
            Err(Error::MalformedRow { row }) => assert_eq!(row, 2),
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_first_line_is_an_empty_header() {
        let source = ReaderSource::from_bytes(b"\n".to_vec(), "mem.csv", UTF_8);
        let table = RecordTable::read(source).unwrap();

        assert!(table.headers().as_row().is_empty());
        assert!(table.is_empty());
    }
}
