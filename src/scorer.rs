//! Rule-based rubric scoring for a single question/answer pair.
//!
//! Dimensions:
//!   - pronunciation: speaking-rate proxy (no audio reaches this layer)
//!   - fluency: rate band deficit/excess plus hesitation (thinking/answering ratio)
//!   - accuracy: best match against expected answers, or a length/content proxy
//!   - comprehension: direct-answer opening + question keyword coverage
//!   - confidence: answer length + rate stability
//!
//! The scorer is pure: it never fails and always returns bounded scores.

use std::sync::{Arc, OnceLock};

use tracing::{debug, instrument};

use crate::config::{ScorerConfig, Weights};
use crate::domain::{ExpectedAnswer, Metrics, PerQuestionResult, QAItem, Scores};
use crate::pinyin::TextTransliterator;
use crate::text::{detect_script, normalize_for_match, token_count, Script};
use crate::util::{bounded, strip_punctuation};

/// Ordinal / sequencing cues that mark a structured answer.
const SEQUENCE_CUES: &[&str] = &["第一", "其次", "最後", "最后", "首先", "接著", "接着", "1.", "2.", "3."];

/// Extra delimiters (beyond whitespace) used when extracting question keywords.
const KEYWORD_DELIMITERS: &[char] = &['、', '，', '。', ',', '/', ':', '；'];

const SENTENCE_BREAKS: &[char] = &['。', '.', '!', '?'];

/// Speed and timing figures derived from one item.
#[derive(Clone, Debug, PartialEq)]
pub struct Preprocessed {
  pub script: Script,
  pub token_count: usize,
  pub tpm: f64,
  pub ratio: f64,
}

pub fn preprocess(item: &QAItem) -> Preprocessed {
  let script = detect_script(&item.answer);
  let count = token_count(&item.answer);
  let (tpm, ratio) = if item.answering_time > 0.0 {
    (count as f64 / (item.answering_time / 60.0), item.thinking_time / item.answering_time)
  } else {
    (0.0, 0.0)
  };
  Preprocessed { script, token_count: count, tpm, ratio }
}

/// Immutable scoring engine: configuration plus a transliteration capability.
#[derive(Clone)]
pub struct Scorer {
  cfg: ScorerConfig,
  transliterator: Arc<dyn TextTransliterator>,
}

impl Default for Scorer {
  fn default() -> Self {
    Self::from_config(ScorerConfig::default())
  }
}

impl std::fmt::Debug for Scorer {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Scorer").field("cfg", &self.cfg).finish_non_exhaustive()
  }
}

impl Scorer {
  pub fn new(cfg: ScorerConfig, transliterator: Arc<dyn TextTransliterator>) -> Self {
    Self { cfg, transliterator }
  }

  /// Build with the transliterator named by the configuration.
  pub fn from_config(cfg: ScorerConfig) -> Self {
    let transliterator = cfg.transliterator.build();
    Self::new(cfg, transliterator)
  }

  pub fn config(&self) -> &ScorerConfig {
    &self.cfg
  }

  #[instrument(level = "debug", skip(self, item), fields(index = item.index, answer_len = item.answer.len()))]
  pub fn score_one(&self, item: &QAItem) -> PerQuestionResult {
    let pre = preprocess(item);

    let pronunciation = self.pronunciation(pre.tpm);
    let fluency = self.fluency(pre.tpm, pre.ratio);
    let accuracy = self.accuracy(item);
    let comprehension = self.comprehension(&item.question, &item.answer);
    let confidence = self.confidence(pre.token_count, pre.tpm);

    let mut scores = Scores { pronunciation, fluency, accuracy, comprehension, confidence, total: 0.0 };
    scores.total = weighted_total(&scores, &self.cfg.weights);

    debug!(
      target: "scoring",
      index = item.index,
      script = ?pre.script,
      tokens = pre.token_count,
      tpm = pre.tpm,
      total = scores.total,
      "rule-based score computed"
    );

    PerQuestionResult {
      question_id: item.index.to_string(),
      title: item.question.chars().take(16).collect(),
      metrics: Metrics {
        thinking_time: item.thinking_time,
        answering_time: item.answering_time,
        tokens_per_minute: pre.tpm,
        token_count: pre.token_count,
        ratio: pre.ratio,
      },
      scores,
      notes: String::new(),
      llm_analysis: None,
    }
  }

  fn pronunciation(&self, tpm: f64) -> f64 {
    let band = &self.cfg.rate;
    let raw = if band.contains(tpm) {
      85.0
    } else if tpm < band.tpm_min {
      (85.0 - (band.tpm_min - tpm) * 2.0).max(60.0)
    } else {
      (85.0 - (tpm - band.tpm_max) * 1.5).max(60.0)
    };
    bounded(raw)
  }

  fn fluency(&self, tpm: f64, ratio: f64) -> f64 {
    let band = &self.cfg.rate;
    let mut fluency = 100.0;
    if tpm < band.tpm_min {
      fluency -= ((band.tpm_min - tpm) / 20.0).ceil() * 8.0;
    }
    if tpm > band.tpm_max {
      fluency -= ((tpm - band.tpm_max) / 20.0).ceil() * 6.0;
    }
    if ratio > band.hesitation_threshold {
      fluency -= ((ratio - band.hesitation_threshold) / 0.05).ceil() * 10.0;
    }
    bounded(fluency)
  }

  fn accuracy(&self, item: &QAItem) -> f64 {
    match &item.expected_answer {
      Some(expected) => self.accuracy_against(item, expected),
      None => self.accuracy_without_reference(&item.answer),
    }
  }

  /// Length/content proxy; never looks at the question.
  fn accuracy_without_reference(&self, answer: &str) -> f64 {
    let base = &self.cfg.accuracy;
    let len = answer.trim().chars().count();
    let meaningful = len > base.meaningful_min_chars && answer.chars().any(char::is_alphabetic);
    if meaningful {
      bounded(base.meaningful + (len as f64 / base.chars_per_bonus_point).min(base.length_bonus_cap))
    } else {
      base.empty
    }
  }

  fn accuracy_against(&self, item: &QAItem, expected: &ExpectedAnswer) -> f64 {
    let answer_forms = normalize_for_match(&item.answer, self.transliterator.as_ref());
    let answer_lower = item.answer.to_lowercase();
    // Candidate-independent.
    let keyword_ratio = keyword_hit_ratio(&item.question, &item.answer, self.cfg.matching.max_keywords);
    let structured = has_sequence_cues(&item.answer) || opens_with_conclusion(&item.answer);
    let m = &self.cfg.matching;

    let mut best = 0.0_f64;
    for candidate in expected.candidates() {
      if !candidate.trim().is_empty() && candidate.to_lowercase() == answer_lower {
        best = 1.0;
        break;
      }

      let th = self.cfg.thresholds.for_answer(candidate);
      let forms = normalize_for_match(candidate, self.transliterator.as_ref());

      // An empty reference never counts as a textual match.
      let max_similarity = if candidate.trim().is_empty() { 0.0 } else { answer_forms.best_similarity(&forms) };
      let similarity_score = if max_similarity >= th.similarity { 1.0 } else { max_similarity };
      let keyword_score = if keyword_ratio >= th.keyword { 1.0 } else { keyword_ratio };
      let structure_score = if structured { 1.0 } else { 0.5 };

      let score = similarity_score * m.similarity + keyword_score * m.keyword + structure_score * m.structure;
      best = best.max(score);
    }

    bounded(best * 100.0)
  }

  fn comprehension(&self, question: &str, answer: &str) -> f64 {
    let direct = if opens_with_conclusion(answer) { 80.0 } else { 60.0 };
    let relevance = keyword_hit_ratio(question, answer, self.cfg.matching.max_keywords) * 100.0;
    bounded((direct + relevance) / 2.0)
  }

  fn confidence(&self, tokens: usize, tpm: f64) -> f64 {
    let length_score = (tokens as f64 * 2.0).min(100.0);
    let stability = if self.cfg.rate.contains(tpm) { 90.0 } else { 70.0 };
    bounded((length_score + stability) / 2.0)
  }
}

/// `round(Σ weight_i * score_i)` over the five dimensions.
pub fn weighted_total(s: &Scores, w: &Weights) -> f64 {
  (s.pronunciation * w.pronunciation
    + s.fluency * w.fluency
    + s.accuracy * w.accuracy
    + s.comprehension * w.comprehension
    + s.confidence * w.confidence)
    .round()
}

/// Up to `limit` keywords (two or more characters) from the question, in order.
pub fn question_keywords(question: &str, limit: usize) -> Vec<String> {
  strip_punctuation(question)
    .split(|c: char| c.is_whitespace() || KEYWORD_DELIMITERS.contains(&c))
    .filter(|w| w.chars().count() >= 2)
    .take(limit)
    .map(str::to_string)
    .collect()
}

/// Fraction of question keywords found verbatim in the answer; 0.5 when the
/// question yields no keywords.
pub fn keyword_hit_ratio(question: &str, answer: &str, limit: usize) -> f64 {
  let keys = question_keywords(question, limit);
  if keys.is_empty() {
    return 0.5;
  }
  let hits = keys.iter().filter(|k| answer.contains(k.as_str())).count();
  hits as f64 / keys.len() as f64
}

pub fn has_sequence_cues(answer: &str) -> bool {
  SEQUENCE_CUES.iter().any(|cue| answer.contains(cue))
}

/// First two sentence segments joined by a space are non-empty.
/// Segments are split on sentence breaks plus any whitespace that follows.
pub fn opens_with_conclusion(answer: &str) -> bool {
  let mut segments = split_sentences(answer).into_iter().take(2);
  match (segments.next(), segments.next()) {
    (None, _) => false,
    // Joining two segments always inserts a separator.
    (Some(_), Some(_)) => true,
    (Some(first), None) => !first.is_empty(),
  }
}

fn split_sentences(text: &str) -> Vec<&str> {
  let mut out = Vec::new();
  let mut rest = text;
  while let Some(pos) = rest.find(SENTENCE_BREAKS) {
    out.push(&rest[..pos]);
    let break_len = rest[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
    rest = rest[pos + break_len..].trim_start();
  }
  out.push(rest);
  out
}

/// Score with the default configuration and the static transliteration table.
pub fn score_one_rule_only(item: &QAItem) -> PerQuestionResult {
  default_scorer().score_one(item)
}

/// Process-wide scorer built from `ScorerConfig::default()`.
pub fn default_scorer() -> &'static Scorer {
  static DEFAULT: OnceLock<Scorer> = OnceLock::new();
  DEFAULT.get_or_init(Scorer::default)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pinyin::NoTransliteration;

  fn assert_bounded(r: &PerQuestionResult) {
    let s = &r.scores;
    for v in [s.pronunciation, s.fluency, s.accuracy, s.comprehension, s.confidence, s.total] {
      assert!((0.0..=100.0).contains(&v), "out of range: {v} in {s:?}");
    }
  }

  #[test]
  fn identical_chinese_answer_scores_high_accuracy() {
    let item = QAItem::new("请说你好", "你好", 1.0, 2.0).with_expected("你好");
    let r = score_one_rule_only(&item);
    assert!(r.scores.accuracy >= 90.0, "accuracy = {}", r.scores.accuracy);
    assert_bounded(&r);
  }

  #[test]
  fn exact_match_is_full_accuracy_regardless_of_question() {
    for question in ["", "How do you say hello in Chinese?", "介紹一下你自己，包括興趣、工作"] {
      let item = QAItem::new(question, "我是學生", 2.0, 3.0).with_expected("我是學生");
      assert_eq!(score_one_rule_only(&item).scores.accuracy, 100.0, "question = {question:?}");
    }
  }

  #[test]
  fn empty_answer_is_low_but_bounded() {
    let item = QAItem::new("请用中文打招呼", "", 3.0, 0.0).with_expected("你好");
    let r = score_one_rule_only(&item);
    assert!(r.scores.accuracy <= 50.0, "accuracy = {}", r.scores.accuracy);
    assert_eq!(r.metrics.token_count, 0);
    assert_bounded(&r);
  }

  #[test]
  fn zero_timings_do_not_divide_by_zero() {
    let item = QAItem::new("Say something", "test", 0.0, 0.0);
    let r = score_one_rule_only(&item);
    assert_eq!(r.metrics.tokens_per_minute, 0.0);
    assert_eq!(r.metrics.ratio, 0.0);
    // 200 tpm deficit → 10 steps × 8.
    assert_eq!(r.scores.fluency, 20.0);
    assert_eq!(r.scores.pronunciation, 60.0);
    assert_bounded(&r);
  }

  #[test]
  fn best_alternative_wins() {
    let base = QAItem::new("Greet me", "hello", 1.0, 1.0);
    let multi = score_one_rule_only(&base.clone().with_expected(vec!["hi", "hello"]));
    let single = score_one_rule_only(&base.with_expected("hello"));
    assert_eq!(multi.scores.accuracy, single.scores.accuracy);
    assert_eq!(multi.scores.accuracy, 100.0);
  }

  #[test]
  fn accuracy_without_reference_ignores_question() {
    let a = QAItem::new("What is your name?", "My name is Ana and I study Chinese", 1.0, 5.0);
    let b = QAItem { question: "完全不同的問題".into(), ..a.clone() };
    let ra = score_one_rule_only(&a);
    let rb = score_one_rule_only(&b);
    assert_eq!(ra.scores.accuracy, rb.scores.accuracy);
    // 34 chars → 70 + 3.4
    assert!((ra.scores.accuracy - 73.4).abs() < 1e-9);

    let short = QAItem::new("q", "ok", 1.0, 1.0);
    assert_eq!(score_one_rule_only(&short).scores.accuracy, 40.0);
    let digits = QAItem::new("q", "1234567", 1.0, 1.0);
    assert_eq!(score_one_rule_only(&digits).scores.accuracy, 40.0);
  }

  #[test]
  fn empty_expected_string_is_present_but_unmatched() {
    let with_empty = QAItem::new("q", "My name is Ana and I study Chinese", 1.0, 5.0).with_expected("");
    let r = score_one_rule_only(&with_empty);
    // Not the no-reference proxy (73.4); a weak match instead.
    assert!(r.scores.accuracy < 73.4);

    let no_candidates = QAItem::new("q", "anything", 1.0, 1.0).with_expected(Vec::<&str>::new());
    assert_eq!(score_one_rule_only(&no_candidates).scores.accuracy, 0.0);
  }

  #[test]
  fn empty_answer_does_not_match_empty_reference() {
    let empty_ref = score_one_rule_only(&QAItem::new("q", "", 1.0, 1.0).with_expected(""));
    let real_ref = score_one_rule_only(&QAItem::new("q", "", 1.0, 1.0).with_expected("你好"));
    // similarity 0, keyword default 0.5, no structure → 0.3*0.5 + 0.2*0.5
    assert!((empty_ref.scores.accuracy - 25.0).abs() < 1e-9, "accuracy = {}", empty_ref.scores.accuracy);
    assert!(empty_ref.scores.accuracy <= real_ref.scores.accuracy);

    let blank_ref = score_one_rule_only(&QAItem::new("q", "   ", 1.0, 1.0).with_expected("   "));
    assert!(blank_ref.scores.accuracy < 50.0, "accuracy = {}", blank_ref.scores.accuracy);
  }

  #[test]
  fn degenerate_timings_stay_bounded() {
    let times = [0.0, -1.0, -f64::INFINITY, f64::INFINITY, f64::NAN, 1e-300, 1e300, f64::MIN_POSITIVE];
    let answers = ["", "test", "我今天很高兴见到你们", "第一，我喜欢学中文。其次，我喜欢旅行。"];
    for answer in answers {
      for &thinking in &times {
        for &answering in &times {
          let item = QAItem::new("介紹你自己", answer, thinking, answering).with_expected(vec!["我是學生", ""]);
          assert_bounded(&score_one_rule_only(&item));
          let no_ref = QAItem { expected_answer: None, ..item };
          assert_bounded(&score_one_rule_only(&no_ref));
        }
      }
    }
  }

  #[test]
  fn in_band_rate_scores_well() {
    // 5 chars in 1.2 s → 250 tpm.
    let item = QAItem::new("q", "我喜欢中文", 0.0, 1.2);
    let r = score_one_rule_only(&item);
    assert!((r.metrics.tokens_per_minute - 250.0).abs() < 1e-9);
    assert_eq!(r.scores.pronunciation, 85.0);
    assert_eq!(r.scores.fluency, 100.0);
    assert_eq!(r.scores.confidence, (10.0 + 90.0) / 2.0);
  }

  #[test]
  fn fast_speech_and_hesitation_are_penalized() {
    // 10 chars in 1.5 s → 400 tpm, 50 over the band → 3 steps × 6.
    let fast = QAItem::new("q", "我今天很高兴见到你们", 0.0, 1.5);
    let r = score_one_rule_only(&fast);
    assert_eq!(r.scores.fluency, 100.0 - 18.0);
    // 85 - 1.5 × 50 falls under the floor.
    assert_eq!(r.scores.pronunciation, 60.0);

    // Same speed, thinking ratio 1/3 → ceil(0.183/0.05) = 4 steps × 10.
    let hesitant = QAItem { thinking_time: 0.5, ..fast };
    let r = score_one_rule_only(&hesitant);
    assert_eq!(r.scores.fluency, 100.0 - 18.0 - 40.0);
  }

  #[test]
  fn total_is_rounded_weighted_sum() {
    let item = QAItem::new("介紹你自己", "我是學生。我喜歡學中文。", 2.0, 4.0).with_expected(vec!["我是學生", "我是老師"]);
    let r = score_one_rule_only(&item);
    let w = Weights::default();
    let s = &r.scores;
    let expected = (s.pronunciation * 0.30 + s.fluency * 0.20 + s.accuracy * 0.25 + s.comprehension * 0.15 + s.confidence * 0.10).round();
    assert_eq!(s.total, expected);
    assert_eq!(weighted_total(s, &w), s.total);
  }

  #[test]
  fn keywords_and_cues() {
    assert_eq!(question_keywords("What is your favourite food?", 5), vec!["What", "is", "your", "favourite", "food"]);
    assert_eq!(question_keywords("a b c", 5), Vec::<String>::new());
    assert_eq!(keyword_hit_ratio("a b", "anything", 5), 0.5);
    assert_eq!(keyword_hit_ratio("favourite food", "my favourite is rice", 5), 0.5);
    assert!(has_sequence_cues("首先我去了北京"));
    assert!(has_sequence_cues("1. eat 2. sleep"));
    assert!(!has_sequence_cues("just one thing"));
  }

  #[test]
  fn conclusion_first_heuristic() {
    assert!(!opens_with_conclusion(""));
    assert!(opens_with_conclusion("是的"));
    assert!(opens_with_conclusion("."));
    assert!(opens_with_conclusion("Yes. Because I like it!"));
    assert_eq!(split_sentences("A. B!  C"), vec!["A", "B", "C"]);
  }

  #[test]
  fn comprehension_combines_lead_and_keywords() {
    let item = QAItem::new("favourite food", "My favourite food is dumplings", 1.0, 2.0);
    let r = score_one_rule_only(&item);
    assert_eq!(r.scores.comprehension, (80.0 + 100.0) / 2.0);
  }

  #[test]
  fn alternate_config_changes_weights() {
    let mut cfg = ScorerConfig::default();
    cfg.weights = Weights { pronunciation: 0.0, fluency: 0.0, accuracy: 1.0, comprehension: 0.0, confidence: 0.0 };
    let scorer = Scorer::new(cfg, Arc::new(NoTransliteration));
    let item = QAItem::new("q", "你好", 0.0, 0.0).with_expected("你好");
    let r = scorer.score_one(&item);
    assert_eq!(r.scores.total, r.scores.accuracy);
  }

  #[test]
  fn default_scorer_is_shared() {
    assert!(std::ptr::eq(default_scorer(), default_scorer()));
    assert_eq!(default_scorer().config(), &ScorerConfig::default());
  }

  #[test]
  fn result_carries_id_title_and_metrics() {
    let mut item = QAItem::new("一二三四五六七八九十一二三四五六七八", "好", 4.0, 2.0);
    item.index = 7;
    let r = score_one_rule_only(&item);
    assert_eq!(r.question_id, "7");
    assert_eq!(r.title.chars().count(), 16);
    assert_eq!(r.metrics.ratio, 2.0);
    assert_eq!(r.metrics.token_count, 1);
    assert!(r.llm_analysis.is_none());
  }
}
