use serde::{Deserialize, Serialize};

/// Tri-state of one filter dimension (favorites, or a single tag).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterState {
  #[default]
  None,
  Include,
  Exclude,
}

impl FilterState {
  /// Cycle order is fixed: none → include → exclude → none
  pub fn next(self) -> Self {
    match self {
      Self::None => Self::Include,
      Self::Include => Self::Exclude,
      Self::Exclude => Self::None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::None => "none",
      Self::Include => "include",
      Self::Exclude => "exclude",
    }
  }
}
