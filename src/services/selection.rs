use rand::Rng;

use crate::models::IssueRecord;

/// Uniform index in `[0, len)`, `None` for an empty sequence.
pub fn select_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.random_range(0..len))
    }
}

/// Picks one issue uniformly at random.
pub fn select_random<'a, R: Rng + ?Sized>(
    items: &'a [IssueRecord],
    rng: &mut R,
) -> Option<&'a IssueRecord> {
    select_index(items.len(), rng).map(|i| &items[i])
}
