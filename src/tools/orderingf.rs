//! Some utilities to sort floats while keeping track of their original position.
//! Used to rank entities by popularity.

use num_traits::float::*;
use std::cmp;

/// indexed value to keep track of position after sorting
#[derive(Copy, Clone, Debug)]
pub struct IndexedValue<F>(pub usize, pub F);

impl<F> IndexedValue<F> {
    pub fn new(idx: usize, val: F) -> Self {
        IndexedValue::<F>(idx, val)
    }
} // end of impl block for IndexedValue

/// makes a decreasing order on Float by putting Nan at end of sort.
/// rust sorts in Increasing order so we reverse Greater and Less.
/// Equal values compare Equal so a stable sort keeps their initial order.
pub(crate) fn decreasing_sort_nans_last<F: Float>(
    a: &IndexedValue<F>,
    b: &IndexedValue<F>,
) -> cmp::Ordering {
    match (a, b) {
        (x, y) if x.1.is_nan() && y.1.is_nan() => cmp::Ordering::Equal,
        (x, _) if x.1.is_nan() => cmp::Ordering::Greater,
        (_, y) if y.1.is_nan() => cmp::Ordering::Less,
        (_, _) => b.1.partial_cmp(&a.1).unwrap_or(cmp::Ordering::Equal),
    }
} // end of decreasing_sort_nans_last

// end of mod tests
