//! Uniform random draw over eligible ids.

use rand::Rng;
use std::collections::HashSet;

/// Ids that may be drawn: inside `candidates` (when given) and outside `exclude`.
///
/// Sorted so the draw depends only on the random index, not on hash order.
pub fn eligible_ids<'a>(
  pool: impl IntoIterator<Item = &'a i64>,
  candidates: Option<&HashSet<i64>>,
  exclude: &HashSet<i64>,
) -> Vec<i64> {
  let mut ids: Vec<i64> = pool
    .into_iter()
    .filter(|id| candidates.is_none_or(|c| c.contains(*id)))
    .filter(|id| !exclude.contains(*id))
    .copied()
    .collect();
  ids.sort_unstable();
  ids.dedup();
  ids
}

/// Remove and return a uniformly chosen id, or `None` when empty.
pub fn take_uniform<R: Rng + ?Sized>(ids: &mut Vec<i64>, rng: &mut R) -> Option<i64> {
  if ids.is_empty() {
    return None;
  }
  let idx = rng.random_range(0..ids.len());
  Some(ids.swap_remove(idx))
}
