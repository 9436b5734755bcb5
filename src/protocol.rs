//! Public session-level structs (serde ready): the session submitted for
//! analysis and the analysis report returned for it.
//! Keep this small and stable to evolve scorer and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{PerQuestionResult, QAItem};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    #[serde(default)]
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_type: Option<String>,
    pub items: Vec<QAItem>,
}

/// Per-dimension session averages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Radar {
    pub pronunciation: f64,
    pub fluency: f64,
    pub accuracy: f64,
    pub comprehension: f64,
    pub confidence: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub num_questions: usize,
    pub total_seconds: f64,
    pub avg_think: f64,
    pub avg_answer: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_score: f64,
    pub radar: Radar,
    pub totals: Totals,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub overview: Overview,
    pub per_question: Vec<PerQuestionResult>,
    pub recommendations: Vec<String>,
    pub version: String,
}
