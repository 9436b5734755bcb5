//! Domain models: the question/answer item under evaluation, semantic signals,
//! and the per-question score record.

use serde::{Deserialize, Serialize};

/// One canonical answer or an ordered set of acceptable answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedAnswer {
  One(String),
  Many(Vec<String>),
}

impl ExpectedAnswer {
  pub fn candidates(&self) -> &[String] {
    match self {
      ExpectedAnswer::One(s) => std::slice::from_ref(s),
      ExpectedAnswer::Many(v) => v,
    }
  }
}

impl From<&str> for ExpectedAnswer {
  fn from(s: &str) -> Self { ExpectedAnswer::One(s.to_string()) }
}

impl From<Vec<&str>> for ExpectedAnswer {
  fn from(v: Vec<&str>) -> Self { ExpectedAnswer::Many(v.into_iter().map(str::to_string).collect()) }
}

/// One question/answer exchange. Times are in seconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QAItem {
  #[serde(default)] pub index: u32,
  pub question: String,
  #[serde(default)] pub answer: String,
  #[serde(default)] pub thinking_time: f64,
  #[serde(default)] pub answering_time: f64,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub lesson_id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub step_id: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub expected_answer: Option<ExpectedAnswer>,
  /// Externally computed signals to fuse during session analysis.
  #[serde(default, skip_serializing_if = "Option::is_none")] pub signals: Option<SemanticSignals>,
}

impl QAItem {
  pub fn new(question: &str, answer: &str, thinking_time: f64, answering_time: f64) -> Self {
    Self {
      question: question.to_string(),
      answer: answer.to_string(),
      thinking_time,
      answering_time,
      ..Default::default()
    }
  }

  pub fn with_expected(mut self, expected: impl Into<ExpectedAnswer>) -> Self {
    self.expected_answer = Some(expected.into());
    self
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalFlags {
  #[serde(default)] pub verbosity: Option<bool>,
  #[serde(default)] pub offtopic: Option<bool>,
  #[serde(default)] pub ethics_risk: Option<bool>,
}

/// LLM-derived probabilities in [0, 1]. Only the first four adjust scores.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSignals {
  #[serde(default, skip_serializing_if = "Option::is_none")] pub semantic_relevance: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub direct_answer_probability: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub structure_completeness: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub evidence_quality: Option<f64>,

  #[serde(default, skip_serializing_if = "Option::is_none")] pub conclusion_first_probability: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub coverage_ratio: Option<f64>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")] pub missing_points: Vec<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub flags: Option<SignalFlags>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
  pub thinking_time: f64,
  pub answering_time: f64,
  pub tokens_per_minute: f64,
  pub token_count: usize,
  pub ratio: f64,
}

/// Five rubric dimensions in [0, 100] plus the weighted total.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
  pub pronunciation: f64,
  pub fluency: f64,
  pub accuracy: f64,
  pub comprehension: f64,
  pub confidence: f64,
  pub total: f64,
}

/// Rubric dimensions in their canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
  Pronunciation,
  Fluency,
  Accuracy,
  Comprehension,
  Confidence,
}

impl Dimension {
  pub const ALL: [Dimension; 5] = [
    Dimension::Pronunciation,
    Dimension::Fluency,
    Dimension::Accuracy,
    Dimension::Comprehension,
    Dimension::Confidence,
  ];

  /// Display name shown to learners.
  pub fn label_zh(self) -> &'static str {
    match self {
      Dimension::Pronunciation => "发音",
      Dimension::Fluency => "流畅度",
      Dimension::Accuracy => "准确度",
      Dimension::Comprehension => "理解力",
      Dimension::Confidence => "自信表达",
    }
  }
}

impl Scores {
  pub fn get(&self, d: Dimension) -> f64 {
    match d {
      Dimension::Pronunciation => self.pronunciation,
      Dimension::Fluency => self.fluency,
      Dimension::Accuracy => self.accuracy,
      Dimension::Comprehension => self.comprehension,
      Dimension::Confidence => self.confidence,
    }
  }

  /// Lowest dimension; the earliest in canonical order wins ties.
  pub fn weakest(&self) -> Dimension {
    Dimension::ALL
      .into_iter()
      .fold(Dimension::Pronunciation, |best, d| if self.get(d) < self.get(best) { d } else { best })
  }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LlmAnalysis {
  pub signals: SemanticSignals,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerQuestionResult {
  pub question_id: String,
  pub title: String,
  pub metrics: Metrics,
  pub scores: Scores,
  #[serde(default)] pub notes: String,
  #[serde(default, skip_serializing_if = "Option::is_none")] pub llm_analysis: Option<LlmAnalysis>,
}
