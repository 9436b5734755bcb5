//! Dynamic matching thresholds keyed on the expected answer's length.
//!
//! Short answers get lenient keyword/structure requirements but need a close
//! textual match; long answers demand more keyword/structure coverage and
//! tolerate a looser textual match.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
  pub keyword: f64,
  pub structure: f64,
  pub similarity: f64,
}

/// Three fixed bands: `len <= short_max`, `len <= medium_max`, longer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ThresholdPolicy {
  pub short_max: usize,
  pub medium_max: usize,
  pub short: Thresholds,
  pub medium: Thresholds,
  pub long: Thresholds,
}

impl Default for ThresholdPolicy {
  fn default() -> Self {
    Self {
      short_max: 3,
      medium_max: 10,
      short: Thresholds { keyword: 0.6, structure: 0.5, similarity: 0.8 },
      medium: Thresholds { keyword: 0.7, structure: 0.6, similarity: 0.75 },
      long: Thresholds { keyword: 0.8, structure: 0.7, similarity: 0.7 },
    }
  }
}

impl ThresholdPolicy {
  /// `expected_len` is the expected answer's length in characters.
  pub fn select(&self, expected_len: usize) -> Thresholds {
    if expected_len <= self.short_max {
      self.short
    } else if expected_len <= self.medium_max {
      self.medium
    } else {
      self.long
    }
  }

  pub fn for_answer(&self, expected: &str) -> Thresholds {
    self.select(expected.chars().count())
  }
}
