//! Blend externally computed semantic signals into a rule-based result.
//!
//! Only fluency, accuracy and comprehension move; pronunciation and confidence
//! stay purely rule-based. Absent signals leave the result untouched.

use tracing::debug;

use crate::config::{BlendRatios, Weights};
use crate::domain::{LlmAnalysis, PerQuestionResult, SemanticSignals};
use crate::scorer::{weighted_total, Scorer};

/// Signal in [0,1] → rounded percentage. Non-finite values count as absent.
fn pct(x: Option<f64>) -> Option<f64> {
  x.filter(|v| v.is_finite()).map(|v| (v.clamp(0.0, 1.0) * 100.0).round())
}

fn blend(rule: f64, keep: f64, signal: f64) -> f64 {
  (keep * rule + (1.0 - keep) * signal).round()
}

pub fn fuse(base: &PerQuestionResult, signals: Option<&SemanticSignals>, ratios: &BlendRatios, weights: &Weights) -> PerQuestionResult {
  let Some(s) = signals else {
    return base.clone();
  };

  let mut out = base.clone();
  let scores = &mut out.scores;

  if let Some(structure) = pct(s.structure_completeness) {
    scores.fluency = blend(scores.fluency, ratios.fluency, structure);
  }
  if let Some(evidence) = pct(s.evidence_quality) {
    scores.accuracy = blend(scores.accuracy, ratios.accuracy, evidence);
  }

  let semantic: Vec<f64> = [pct(s.semantic_relevance), pct(s.direct_answer_probability)]
    .into_iter()
    .flatten()
    .collect();
  if !semantic.is_empty() {
    let avg = (semantic.iter().sum::<f64>() / semantic.len() as f64).round();
    scores.comprehension = blend(scores.comprehension, ratios.comprehension, avg);
  }

  scores.total = weighted_total(scores, weights);
  out.llm_analysis = Some(LlmAnalysis { signals: s.clone() });

  debug!(
    target: "scoring",
    question_id = %out.question_id,
    before = base.scores.total,
    after = out.scores.total,
    "semantic signals fused"
  );
  out
}

impl Scorer {
  pub fn fuse(&self, base: &PerQuestionResult, signals: Option<&SemanticSignals>) -> PerQuestionResult {
    fuse(base, signals, &self.config().blend, &self.config().weights)
  }
}

/// Fuse with the default blend ratios and weights.
pub fn fuse_with_llm(base: &PerQuestionResult, signals: Option<&SemanticSignals>) -> PerQuestionResult {
  fuse(base, signals, &BlendRatios::default(), &Weights::default())
}
