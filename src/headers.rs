use csv::StringRecordIter;
use std::collections::HashMap;

use super::Row;

/// A structure for keeping relationship between the headers and their positions
#[derive(Debug, Clone, PartialEq)]
pub struct Headers {
    indexes: HashMap<String, usize>,
    names: Row,
}

impl Headers {
    /// When a name is repeated the last position wins.
    pub fn from_row(row: Row) -> Headers {
        let indexes = row
            .iter()
            .enumerate()
            .map(|(index, name)| (name.to_string(), index))
            .collect();

        Headers {
            indexes,
            names: row,
        }
    }

    pub fn as_row(&self) -> &Row {
        &self.names
    }

    pub fn contains_key(&self, field: &str) -> bool {
        self.indexes.contains_key(field)
    }

    pub fn iter(&self) -> StringRecordIter<'_> {
        self.names.iter()
    }
}

/// Returns the field of `row` stored under the column `name`, if both exist.
pub fn get_field<'r>(headers: &Headers, row: &'r Row, name: &str) -> Option<&'r str> {
    headers.indexes.get(name).and_then(|&index| row.get(index))
}
