use csv::Terminator;
use encoding::all::UTF_8;
use encoding::EncodingRef;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::{
    error::{Error, Result},
    flush::flush_chunk,
    input::{ReaderSource, RecordTable},
    layout::{OutputLayout, YearMonth},
    Mapping, Replace,
};

/// Rows written to each part.
pub const CHUNK_SIZE: usize = 797;

/// What a finished split produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitSummary {
    /// Data rows read, the header excluded
    pub record_count: usize,
    pub file_count: usize,
    pub output_dir: PathBuf,
    /// Written parts, in order
    pub files: Vec<PathBuf>,
}

impl fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} records into {} files",
            self.record_count, self.file_count
        )
    }
}

/// Number of parts `len` rows are split into.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}

/// Reads a delimited file, rewrites its first column through a mapping and
/// writes it back as several files of at most `chunk_size` data rows, each
/// one starting with the original header.
pub struct Splitter {
    mapping: Mapping,
    chunk_size: usize,
    encoding: EncodingRef,
    terminator: Terminator,
}

impl Splitter {
    pub fn new(mapping: Mapping) -> Splitter {
        Splitter {
            mapping,
            chunk_size: CHUNK_SIZE,
            encoding: UTF_8,
            terminator: Terminator::CRLF,
        }
    }

    pub fn chunk_size(mut self, chunk_size: usize) -> Result<Splitter> {
        if chunk_size == 0 {
            return Err(Error::InvalidChunkSize);
        }

        self.chunk_size = chunk_size;

        Ok(self)
    }

    pub fn encoding(mut self, encoding: EncodingRef) -> Splitter {
        self.encoding = encoding;
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Splitter {
        self.terminator = terminator;
        self
    }

    /// Splits `input` into the directory given by [`OutputLayout`] for
    /// `month`. The directory is created if missing and reused otherwise.
    /// Parts already written stay on disk if a later one fails.
    #[instrument(level = "info", skip(self, input), fields(input = %input.as_ref().display()))]
    pub fn split<P: AsRef<Path>>(&self, input: P, month: YearMonth) -> Result<SplitSummary> {
        let input = input.as_ref();
        let table = RecordTable::read(ReaderSource::from_path(input, self.encoding)?)?;
        let (headers, rows) = table.into_parts();

        let mut replace = Replace::new(rows.into_iter(), &self.mapping);
        let rows: Vec<_> = replace.by_ref().collect();

        info!(
            records = rows.len(),
            replaced = replace.replaced(),
            "applied mapping"
        );

        let layout = OutputLayout::new(input, month);
        fs::create_dir_all(layout.dir())?;

        let mut files = Vec::with_capacity(chunk_count(rows.len(), self.chunk_size));

        for (i, chunk) in rows.chunks(self.chunk_size).enumerate() {
            let path = layout.part(i + 1);

            flush_chunk(&path, &headers, chunk, self.terminator)?;
            files.push(path);
        }

        let summary = SplitSummary {
            record_count: rows.len(),
            file_count: files.len(),
            output_dir: layout.dir().to_path_buf(),
            files,
        };

        info!(
            files = summary.file_count,
            output_dir = %summary.output_dir.display(),
            "{}", summary
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::{chunk_count, Splitter, CHUNK_SIZE};
    use crate::{error::Error, Mapping};

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, CHUNK_SIZE), 0);
        assert_eq!(chunk_count(1, CHUNK_SIZE), 1);
        assert_eq!(chunk_count(797, CHUNK_SIZE), 1);
        assert_eq!(chunk_count(798, CHUNK_SIZE), 2);
        assert_eq!(chunk_count(1600, CHUNK_SIZE), 3);
    }

    #[test]
    fn test_zero_chunk_size() {
        assert!(matches!(
            Splitter::new(Mapping::empty()).chunk_size(0),
            Err(Error::InvalidChunkSize)
        ));
    }
}
