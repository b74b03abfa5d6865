use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::Path;
use tracing::debug;

use crate::{error::Result, Headers, Row};

/// Builds a writer with the quoting and line ending used for every part.
fn writer<P: AsRef<Path>>(path: P, terminator: Terminator) -> Result<Writer<File>> {
    Ok(WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(terminator)
        .flexible(true)
        .from_path(path)?)
}

/// Writes `headers` followed by `rows` to `path`, replacing whatever was
/// there. The file is closed when this returns, also on failure.
pub fn flush_chunk<P: AsRef<Path>>(
    path: P,
    headers: &Headers,
    rows: &[Row],
    terminator: Terminator,
) -> Result<()> {
    let path = path.as_ref();
    let mut writer = writer(path, terminator)?;

    writer.write_record(headers.as_row())?;

    for row in rows {
        writer.write_record(row)?;
    }

    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "flushed chunk");

    Ok(())
}
