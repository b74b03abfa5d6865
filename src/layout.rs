//! Where the pieces of a split end up.
//!
//! For an input `<dir>/<base>.<ext>` processed in month `YYYY-MM` the parts
//! are written as `<dir>/YYYY-MM/<base>_split/<base>_part_<N>.csv`, with `N`
//! starting at 1.
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use std::path::{Path, PathBuf};

/// The calendar month a split runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<YearMonth> {
        NaiveDate::from_ymd_opt(year, month, 1).map(YearMonth::from)
    }

    pub fn current() -> YearMonth {
        YearMonth::from(Local::now().date_naive())
    }
}

impl From<NaiveDate> for YearMonth {
    fn from(date: NaiveDate) -> YearMonth {
        YearMonth {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Output directory and file naming for one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    base: String,
    dir: PathBuf,
}

impl OutputLayout {
    pub fn new<P: AsRef<Path>>(input: P, month: YearMonth) -> OutputLayout {
        let input = input.as_ref();
        let base = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent = input.parent().unwrap_or_else(|| Path::new(""));

        let dir = parent
            .join(month.to_string())
            .join(format!("{}_split", base));

        OutputLayout { base, dir }
    }

    /// Input file name without its extension.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the `n`th part, counting from 1.
    pub fn part(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}_part_{}.csv", self.base, n))
    }
}
