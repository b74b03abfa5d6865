//! Splits a delimited file into fixed size parts, optionally rewriting its
//! leading column through a find/replace table first.
use chrono::NaiveDate;
use std::path::Path;

mod error;
mod flush;
mod headers;
mod input;
mod layout;
mod mapping;
mod replace;
mod split;

pub use error::{Error, ErrorKind, Result, RowResult};
pub use flush::flush_chunk;
pub use headers::{get_field, Headers};
pub use input::{ReaderSource, RecordTable};
pub use layout::{OutputLayout, YearMonth};
pub use mapping::{Mapping, FIND_COLUMN, REPLACE_COLUMN};
pub use replace::{replace_leading, Replace};
pub use split::{chunk_count, SplitSummary, Splitter, CHUNK_SIZE};

pub type Row = csv::StringRecord;

/// Splits `input` using the mapping at `mapping`, if any, naming the output
/// directory after the current month.
pub fn run_split<P, Q>(input: P, mapping: Option<Q>) -> Result<SplitSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_split_in(input, mapping, YearMonth::current())
}

/// Same as [`run_split`] with the date the output directory is named after
/// given explicitly.
pub fn run_split_at<P, Q>(input: P, mapping: Option<Q>, today: NaiveDate) -> Result<SplitSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_split_in(input, mapping, YearMonth::from(today))
}

fn run_split_in<P, Q>(input: P, mapping: Option<Q>, month: YearMonth) -> Result<SplitSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let mapping = Mapping::load(mapping)?;

    Splitter::new(mapping).split(input, month)
}
