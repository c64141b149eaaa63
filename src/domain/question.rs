use serde::{Deserialize, Serialize};

use crate::config;

/// A prompt from the read-only corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id: i64,
  pub text: String,
  pub pack: String,
  pub version_added: String,
  /// Labels parsed from the corpus' comma separated tag column
  pub tags: Vec<String>,
}

impl Question {
  pub fn new(id: i64, text: &str, pack: &str, version_added: &str, tags: &[&str]) -> Self {
    Self {
      id,
      text: text.to_string(),
      pack: pack.to_string(),
      version_added: version_added.to_string(),
      tags: tags.iter().map(|t| t.to_string()).collect(),
    }
  }

  /// Sentinel shown when nothing is eligible. Corpus ids start at 1, so id 0 never collides.
  pub fn placeholder() -> Self {
    Self {
      id: config::PLACEHOLDER_QUESTION_ID,
      text: config::PLACEHOLDER_TEXT.to_string(),
      pack: String::new(),
      version_added: String::new(),
      tags: Vec::new(),
    }
  }

  pub fn is_placeholder(&self) -> bool {
    self.id == config::PLACEHOLDER_QUESTION_ID
  }

  /// Tag column value as stored in the corpus
  pub fn tags_column(&self) -> String {
    self.tags.join(",")
  }
}

/// Split a corpus tag column into trimmed, non-empty labels.
pub fn parse_tags(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect()
}
