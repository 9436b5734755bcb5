//! Whole-session analysis: score each item, fuse its signals, aggregate, recommend.

use tracing::{info, instrument};

use crate::aggregate::aggregate;
use crate::protocol::{AnalysisOutput, SessionInput};
use crate::recommend::recommend;
use crate::scorer::Scorer;

pub const ANALYSIS_VERSION: &str = "core.v1.2.0+rules";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzeError {
  /// A session must contain at least one item.
  #[error("INVALID_INPUT: session has no items")]
  EmptySession,
}

#[instrument(level = "info", skip(scorer, session), fields(session_id = %session.session_id, items = session.items.len()))]
pub fn analyze_session(scorer: &Scorer, session: &SessionInput) -> Result<AnalysisOutput, AnalyzeError> {
  if session.items.is_empty() {
    return Err(AnalyzeError::EmptySession);
  }

  let per: Vec<_> = session
    .items
    .iter()
    .map(|item| {
      let base = scorer.score_one(item);
      scorer.fuse(&base, item.signals.as_ref())
    })
    .collect();

  let overview = aggregate(&per, &session.items);
  let recommendations = recommend(&per, &overview);

  info!(
    target: "scoring",
    session_id = %session.session_id,
    total_score = overview.total_score,
    fused = per.iter().filter(|r| r.llm_analysis.is_some()).count(),
    "session analysed"
  );

  Ok(AnalysisOutput { overview, per_question: per, recommendations, version: ANALYSIS_VERSION.to_string() })
}
