//! Scorer configuration (weights, speaking-rate band, thresholds, blend ratios)
//! with optional TOML overrides.
//!
//! Every table and field is optional; missing values fall back to the defaults
//! below. Example:
//!
//! ```toml
//! transliterator = "pinyin"
//!
//! [weights]
//! pronunciation = 0.3
//!
//! [rate]
//! tpm_min = 180.0
//! ```

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::pinyin::TransliteratorKind;
use crate::thresholds::ThresholdPolicy;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
  pub weights: Weights,
  pub rate: RateBand,
  pub thresholds: ThresholdPolicy,
  pub matching: MatchWeights,
  pub accuracy: AccuracyBaseline,
  pub blend: BlendRatios,
  pub transliterator: TransliteratorKind,
}

/// Rubric weights for the weighted total. Expected to sum to 1.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Weights {
  pub pronunciation: f64,
  pub fluency: f64,
  pub accuracy: f64,
  pub comprehension: f64,
  pub confidence: f64,
}

impl Default for Weights {
  fn default() -> Self {
    Self { pronunciation: 0.30, fluency: 0.20, accuracy: 0.25, comprehension: 0.15, confidence: 0.10 }
  }
}

/// Target speaking-rate band (tokens per minute) and the hesitation ratio limit.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RateBand {
  pub tpm_min: f64,
  pub tpm_max: f64,
  pub hesitation_threshold: f64,
}

impl Default for RateBand {
  fn default() -> Self {
    Self { tpm_min: 200.0, tpm_max: 350.0, hesitation_threshold: 0.15 }
  }
}

impl RateBand {
  pub fn contains(&self, tpm: f64) -> bool {
    tpm >= self.tpm_min && tpm <= self.tpm_max
  }
}

/// Per-candidate match blend used by accuracy.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
  pub similarity: f64,
  pub keyword: f64,
  pub structure: f64,
  pub max_keywords: usize,
}

impl Default for MatchWeights {
  fn default() -> Self {
    Self { similarity: 0.5, keyword: 0.3, structure: 0.2, max_keywords: 5 }
  }
}

/// Accuracy fallback when no expected answer is available.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AccuracyBaseline {
  pub empty: f64,
  pub meaningful: f64,
  pub meaningful_min_chars: usize,
  pub length_bonus_cap: f64,
  pub chars_per_bonus_point: f64,
}

impl Default for AccuracyBaseline {
  fn default() -> Self {
    Self { empty: 40.0, meaningful: 70.0, meaningful_min_chars: 5, length_bonus_cap: 20.0, chars_per_bonus_point: 10.0 }
  }
}

/// Share of the fused score taken from the rule-based value; the remainder
/// comes from the semantic signal.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlendRatios {
  pub fluency: f64,
  pub accuracy: f64,
  pub comprehension: f64,
}

impl Default for BlendRatios {
  fn default() -> Self {
    Self { fluency: 0.7, accuracy: 0.8, comprehension: 0.6 }
  }
}

/// Attempt to load `ScorerConfig` from SCORER_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_scorer_config_from_env() -> Option<ScorerConfig> {
  let path = std::env::var("SCORER_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<ScorerConfig>(&s) {
      Ok(cfg) => {
        info!(target: "lesson_scorer", %path, "Loaded scorer config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lesson_scorer", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lesson_scorer", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

/// File config (or defaults) with the SCORER_TRANSLITERATOR override applied.
pub fn resolve_config_from_env() -> ScorerConfig {
  let mut cfg = load_scorer_config_from_env().unwrap_or_default();
  if let Ok(raw) = std::env::var("SCORER_TRANSLITERATOR") {
    match TransliteratorKind::parse(&raw) {
      Some(kind) => cfg.transliterator = kind,
      None => warn!(target: "lesson_scorer", value = %raw, "Unknown SCORER_TRANSLITERATOR; keeping configured value"),
    }
  }
  cfg
}
