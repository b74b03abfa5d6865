use crate::{Mapping, Row};

/// Rewrites `row`'s leading field through `mapping`. Returns `None` when the
/// field is not a key of the mapping, or there is no leading field.
pub fn replace_leading(mapping: &Mapping, row: &Row) -> Option<Row> {
    let replacement = mapping.get(row.get(0)?)?;
    let mut new_row = Row::with_capacity(row.as_slice().len(), row.len());

    new_row.push_field(replacement);

    for field in row.iter().skip(1) {
        new_row.push_field(field);
    }

    Some(new_row)
}

/// Applies a find/replace mapping to the first column of each row. Other
/// columns pass through untouched.
pub struct Replace<'m, I> {
    iter: I,
    mapping: &'m Mapping,
    replaced: usize,
}

impl<'m, I> Replace<'m, I>
where
    I: Iterator<Item = Row>,
{
    pub fn new(iter: I, mapping: &'m Mapping) -> Replace<'m, I> {
        Replace {
            iter,
            mapping,
            replaced: 0,
        }
    }

    /// How many rows were rewritten so far.
    pub fn replaced(&self) -> usize {
        self.replaced
    }
}

impl<'m, I> Iterator for Replace<'m, I>
where
    I: Iterator<Item = Row>,
{
    type Item = Row;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|row| match replace_leading(self.mapping, &row) {
            Some(new_row) => {
                self.replaced += 1;
                new_row
            }
            None => row,
        })
    }
}
