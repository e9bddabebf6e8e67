//! Weighted random selection over ordered choice tables.

use rand::Rng;
use thiserror::Error;

/// Errors from weighted selection over a choice table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceError {
    /// The table has no entries to choose from.
    #[error("choice table is empty")]
    EmptyTable,

    /// The table carries an entry with a zero weight.
    #[error("choice table contains a non-positive weight")]
    NonPositiveWeight,
}

/// One selectable entry: an item and its integer selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice<T> {
    pub item: T,
    pub weight: u32,
}

impl<T> Choice<T> {
    pub fn new(item: T, weight: u32) -> Self {
        Self { item, weight }
    }
}

/// Draw one entry from `table` with probability `weight / sum(weights)`.
///
/// An empty table is a valid domain outcome ("no choice available") that
/// callers are expected to translate before invoking; reaching this
/// function with one, or with a zero weight, is a configuration defect and
/// is reported as an error rather than defaulted.
pub fn weighted_choice<'a, T, R: Rng>(
    rng: &mut R,
    table: &'a [Choice<T>],
) -> Result<&'a T, ChoiceError> {
    if table.is_empty() {
        return Err(ChoiceError::EmptyTable);
    }

    let mut total: u64 = 0;
    for choice in table {
        if choice.weight == 0 {
            return Err(ChoiceError::NonPositiveWeight);
        }
        total += u64::from(choice.weight);
    }

    let mut point = rng.gen_range(0..total);
    for choice in table {
        let weight = u64::from(choice.weight);
        if point < weight {
            return Ok(&choice.item);
        }
        point -= weight;
    }

    // point < total, so the scan above always terminates on an entry.
    unreachable!("selection point exceeded total weight")
}
