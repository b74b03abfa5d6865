//! Find/replace table applied to the leading column of every data row.
use encoding::all::UTF_8;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    get_field, Headers, ReaderSource, Row,
};

pub const FIND_COLUMN: &str = "Find";
pub const REPLACE_COLUMN: &str = "Replace";

/// Exact, case sensitive replacements keyed by the original value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    pairs: HashMap<String, String>,
}

impl Mapping {
    /// A mapping that replaces nothing.
    pub fn empty() -> Mapping {
        Mapping::default()
    }

    /// Loads the mapping at `path` if one was given, otherwise returns an
    /// empty one.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Mapping> {
        match path {
            Some(path) => Mapping::from_path(path),
            None => Ok(Mapping::empty()),
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Mapping> {
        let mapping = Mapping::from_rows(ReaderSource::from_path(&path, UTF_8)?)?;

        info!(
            path = %path.as_ref().display(),
            entries = mapping.len(),
            "loaded mapping"
        );

        Ok(mapping)
    }

    /// Builds the mapping from a stream of rows whose first element is the
    /// header. The header must name both a `Find` and a `Replace` column, in
    /// any order and possibly among others.
    ///
    /// Rows with an empty `Find` are skipped. A later row overrides an earlier
    /// one with the same `Find`.
    pub fn from_rows<I>(rows: I) -> Result<Mapping>
    where
        I: IntoIterator<Item = Result<Row>>,
    {
        let mut rows = rows.into_iter();

        let headers = match rows.next() {
            Some(row) => Headers::from_row(row?),
            None => return Err(Error::MappingFormat { found: Vec::new() }),
        };

        if !headers.contains_key(FIND_COLUMN) || !headers.contains_key(REPLACE_COLUMN) {
            return Err(Error::MappingFormat {
                found: headers.iter().map(String::from).collect(),
            });
        }

        let mut pairs = HashMap::new();

        for row in rows {
            let row = row?;
            let find = get_field(&headers, &row, FIND_COLUMN).unwrap_or("");

            if find.is_empty() {
                continue;
            }

            let replace = get_field(&headers, &row, REPLACE_COLUMN).unwrap_or("");

            if let Some(previous) = pairs.insert(find.to_string(), replace.to_string()) {
                debug!(find, previous = %previous, replace, "mapping entry overridden");
            }
        }

        Ok(Mapping { pairs })
    }

    pub fn get(&self, find: &str) -> Option<&str> {
        self.pairs.get(find).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Mapping
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Mapping {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
