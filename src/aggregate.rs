//! Session overview: rounded averages of per-question scores plus timing totals.

use crate::domain::{PerQuestionResult, QAItem};
use crate::protocol::{Overview, Radar, Totals};

fn avg(values: impl Iterator<Item = f64>) -> f64 {
  let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
  if n == 0 { 0.0 } else { sum / n as f64 }
}

pub fn aggregate(per: &[PerQuestionResult], items: &[QAItem]) -> Overview {
  let mean = |f: fn(&PerQuestionResult) -> f64| avg(per.iter().map(f)).round();

  Overview {
    total_score: mean(|r| r.scores.total),
    radar: Radar {
      pronunciation: mean(|r| r.scores.pronunciation),
      fluency: mean(|r| r.scores.fluency),
      accuracy: mean(|r| r.scores.accuracy),
      comprehension: mean(|r| r.scores.comprehension),
      confidence: mean(|r| r.scores.confidence),
    },
    totals: Totals {
      num_questions: items.len(),
      total_seconds: items.iter().map(|i| i.thinking_time + i.answering_time).sum(),
      avg_think: avg(items.iter().map(|i| i.thinking_time)).round(),
      avg_answer: avg(items.iter().map(|i| i.answering_time)).round(),
    },
  }
}
