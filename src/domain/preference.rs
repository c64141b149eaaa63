use serde::{Deserialize, Serialize};

/// Stored value of a `user_preferences` row. A question with no row is "normal".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceStatus {
  Favorite,
  Hidden,
}

impl PreferenceStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Favorite => "favorite",
      Self::Hidden => "hidden",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "favorite" => Some(Self::Favorite),
      "hidden" => Some(Self::Hidden),
      _ => None,
    }
  }
}

/// Per-question user preference. At most one flag is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserPreference {
  pub is_favorite: bool,
  pub is_hidden: bool,
}

impl UserPreference {
  pub fn from_status(status: Option<PreferenceStatus>) -> Self {
    match status {
      Some(PreferenceStatus::Favorite) => Self { is_favorite: true, is_hidden: false },
      Some(PreferenceStatus::Hidden) => Self { is_favorite: false, is_hidden: true },
      None => Self::default(),
    }
  }
}
