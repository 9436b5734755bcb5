//! Short practice tips from the weakest questions and the weakest session dimension.

use crate::domain::{Dimension, PerQuestionResult, Scores};
use crate::protocol::Overview;

const MAX_TIPS: usize = 3;

fn tip_for(question_id: &str, weakest: Dimension) -> String {
  let advice = match weakest {
    Dimension::Pronunciation => "发音需改善：注意声母、韵母和声调的准确性，多听标准发音。",
    Dimension::Fluency => "流畅度不足：减少犹豫，保持自然连贯的语速。",
    Dimension::Accuracy => "准确度待提高：注意正确的句型、语序和词汇使用。",
    Dimension::Comprehension => "理解力需加强：确保完全理解问题后再回答。",
    Dimension::Confidence => "自信表达不足：提高音量，展现更积极的参与意愿。",
  };
  format!("{question_id} {advice}")
}

pub fn recommend(per: &[PerQuestionResult], ov: &Overview) -> Vec<String> {
  let mut worst: Vec<&PerQuestionResult> = per.iter().collect();
  // Stable sort keeps submission order on ties.
  worst.sort_by(|a, b| a.scores.total.total_cmp(&b.scores.total));

  let mut tips: Vec<String> = worst
    .iter()
    .take(2)
    .map(|r| tip_for(&r.question_id, r.scores.weakest()))
    .collect();

  let radar = Scores {
    pronunciation: ov.radar.pronunciation,
    fluency: ov.radar.fluency,
    accuracy: ov.radar.accuracy,
    comprehension: ov.radar.comprehension,
    confidence: ov.radar.confidence,
    total: ov.total_score,
  };
  let weakest = radar.weakest();
  tips.push(format!("整體待強化：{}（平均 {} 分）", weakest.label_zh(), radar.get(weakest)));

  tips.truncate(MAX_TIPS);
  tips
}
