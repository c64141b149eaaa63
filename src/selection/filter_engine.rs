//! Candidate set computation from the active filters.
//!
//! Everything here is a pure function of its inputs. The candidate set, the
//! filtered total and the completed-for-filter count are always produced
//! together by [`compute_counts`] so they can never drift apart.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::FilterState;

/// Active filter selections: one favorites dimension and one per tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
  pub favorites: FilterState,
  pub tags: BTreeMap<String, FilterState>,
}

impl FilterSelection {
  /// Every known tag starts at `none`
  pub fn seeded<'a>(tags: impl IntoIterator<Item = &'a String>) -> Self {
    Self {
      favorites: FilterState::None,
      tags: tags.into_iter().map(|t| (t.clone(), FilterState::None)).collect(),
    }
  }

  pub fn cycle_favorites(&mut self) -> FilterState {
    self.favorites = self.favorites.next();
    self.favorites
  }

  /// Advance one tag's state. Unknown tags are left alone and yield `None`.
  pub fn cycle_tag(&mut self, tag: &str) -> Option<FilterState> {
    let state = self.tags.get_mut(tag)?;
    *state = state.next();
    Some(*state)
  }

  pub fn tags_in(&self, wanted: FilterState) -> Vec<&str> {
    self
      .tags
      .iter()
      .filter(|(_, state)| **state == wanted)
      .map(|(tag, _)| tag.as_str())
      .collect()
  }
}

/// Data the candidate set is computed from
#[derive(Debug, Clone, Copy)]
pub struct FilterInputs<'a> {
  /// All corpus ids
  pub universe: &'a HashSet<i64>,
  pub hidden: &'a HashSet<i64>,
  pub favorites: &'a HashSet<i64>,
  pub tag_index: &'a HashMap<String, HashSet<i64>>,
}

/// Candidate set with the counts derived from it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCounts {
  pub candidates: HashSet<i64>,
  pub filtered_total: usize,
  pub completed_for_filter: usize,
}

/// The id range `{1..corpus_size}`. Prefer an explicit id list when ids may have gaps.
pub fn corpus_universe(corpus_size: i64) -> HashSet<i64> {
  (1..=corpus_size.max(0)).collect()
}

/// Ids eligible for a random draw under the current filters.
///
/// Hidden ids are removed before anything else and no filter can bring them
/// back. Included tags combine with OR; so do excluded tags. Tags missing
/// from the index contribute nothing, so including only unknown tags keeps
/// every otherwise eligible id.
pub fn compute_candidate_set(inputs: FilterInputs<'_>, selection: &FilterSelection) -> HashSet<i64> {
  let mut candidates: HashSet<i64> = inputs
    .universe
    .iter()
    .filter(|id| !inputs.hidden.contains(*id))
    .copied()
    .collect();

  match selection.favorites {
    FilterState::Include => candidates.retain(|id| inputs.favorites.contains(id)),
    FilterState::Exclude => candidates.retain(|id| !inputs.favorites.contains(id)),
    FilterState::None => {}
  }

  let included = selection.tags_in(FilterState::Include);
  if let Some(tagged) = union_of_tags(inputs.tag_index, &included) {
    candidates.retain(|id| tagged.contains(id));
  }

  let excluded = selection.tags_in(FilterState::Exclude);
  if let Some(tagged) = union_of_tags(inputs.tag_index, &excluded) {
    candidates.retain(|id| !tagged.contains(id));
  }

  candidates
}

/// Cardinality of the candidate set
pub fn compute_filtered_total(inputs: FilterInputs<'_>, selection: &FilterSelection) -> usize {
  compute_candidate_set(inputs, selection).len()
}

/// Completed ids that also match the active filter
pub fn compute_completed_for_filter(completed: &HashSet<i64>, candidates: &HashSet<i64>) -> usize {
  completed.intersection(candidates).count()
}

/// Candidate set, filtered total and completed-for-filter in one pass
pub fn compute_counts(
  inputs: FilterInputs<'_>,
  selection: &FilterSelection,
  completed: &HashSet<i64>,
) -> FilterCounts {
  let candidates = compute_candidate_set(inputs, selection);
  let completed_for_filter = compute_completed_for_filter(completed, &candidates);
  FilterCounts {
    filtered_total: candidates.len(),
    completed_for_filter,
    candidates,
  }
}

/// Union of ids carrying any of `tags`, or `None` when no listed tag is indexed.
///
/// `None` means "no restriction": an include or exclude list made only of
/// unknown tags leaves the candidates as they were, instead of emptying them.
fn union_of_tags(index: &HashMap<String, HashSet<i64>>, tags: &[&str]) -> Option<HashSet<i64>> {
  let known: Vec<&HashSet<i64>> = tags.iter().filter_map(|t| index.get(*t)).collect();
  if known.is_empty() {
    return None;
  }
  Some(known.into_iter().flatten().copied().collect())
}
