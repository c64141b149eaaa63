pub mod draw;
pub mod filter_engine;

pub use draw::{eligible_ids, take_uniform};
pub use filter_engine::{
  compute_candidate_set, compute_completed_for_filter, compute_counts, compute_filtered_total,
  corpus_universe, FilterCounts, FilterInputs, FilterSelection,
};
