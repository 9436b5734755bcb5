//! Text normalization, token counting and edit-distance similarity.
//!
//! All lengths are measured in Unicode scalar values so that Han characters,
//! Latin letters and punctuation each count as one unit.

use serde::Serialize;

use crate::pinyin::TextTransliterator;
use crate::util::{is_cjk_unified, strip_punctuation};

/// Coarse script classification, used only to pick a token-counting strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
  /// Contains at least one CJK unified ideograph.
  Logographic,
  Alphabetic,
}

pub fn detect_script(s: &str) -> Script {
  if s.chars().any(is_cjk_unified) { Script::Logographic } else { Script::Alphabetic }
}

/// Logographic text: characters left after removing punctuation and whitespace.
/// Alphabetic text: whitespace-delimited words after removing punctuation.
pub fn token_count(text: &str) -> usize {
  let stripped = strip_punctuation(text);
  match detect_script(text) {
    Script::Logographic => stripped.chars().filter(|c| !c.is_whitespace()).count(),
    Script::Alphabetic => stripped.split_whitespace().count(),
  }
}

/// Classic DP edit distance with unit insert/delete/substitute costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
  let a_chars: Vec<char> = a.chars().collect();
  let b_chars: Vec<char> = b.chars().collect();
  let a_len = a_chars.len();
  let b_len = b_chars.len();

  if a_len == 0 {
    return b_len;
  }
  if b_len == 0 {
    return a_len;
  }

  // Two rolling rows of the full (a_len+1) x (b_len+1) matrix.
  let mut prev: Vec<usize> = (0..=b_len).collect();
  let mut curr = vec![0usize; b_len + 1];

  for i in 1..=a_len {
    curr[0] = i;
    for j in 1..=b_len {
      let cost = if a_chars[i - 1] == b_chars[j - 1] { 0 } else { 1 };
      curr[j] = (prev[j] + 1)
        .min(curr[j - 1] + 1)
        .min(prev[j - 1] + cost);
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  prev[b_len]
}

/// Normalized similarity in [0, 1]: `1 - distance / max_len`; two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
  if a == b {
    return 1.0;
  }
  let max_len = a.chars().count().max(b.chars().count());
  if max_len == 0 {
    return 1.0;
  }
  1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Parallel representations of one text used for tolerant matching.
/// Empty strings mean "representation not available".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchForms {
  pub original: String,
  pub phonetic: String,
  pub latin: String,
}

impl MatchForms {
  /// Best similarity across the three representations. Phonetic and latin
  /// forms only count when both sides have them.
  pub fn best_similarity(&self, other: &MatchForms) -> f64 {
    let original = similarity(&self.original, &other.original);
    let phonetic = paired_similarity(&self.phonetic, &other.phonetic);
    let latin = paired_similarity(&self.latin, &other.latin);
    original.max(phonetic).max(latin)
  }
}

fn paired_similarity(a: &str, b: &str) -> f64 {
  if a.is_empty() || b.is_empty() { 0.0 } else { similarity(a, b) }
}

pub fn normalize_for_match(text: &str, transliterator: &dyn TextTransliterator) -> MatchForms {
  let has_han = text.chars().any(is_cjk_unified);
  let has_latin = text.chars().any(|c| c.is_ascii_alphabetic());

  let phonetic = if has_han {
    transliterator.transliterate(text).map(|p| p.to_lowercase()).unwrap_or_default()
  } else {
    String::new()
  };

  let latin = if has_latin {
    text
      .chars()
      .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
      .collect::<String>()
      .to_lowercase()
  } else {
    String::new()
  };

  MatchForms { original: text.to_lowercase(), phonetic, latin }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::pinyin::{NoTransliteration, TableTransliterator};

  #[test]
  fn script_detection() {
    assert_eq!(detect_script("hello 你"), Script::Logographic);
    assert_eq!(detect_script("hello"), Script::Alphabetic);
    assert_eq!(detect_script(""), Script::Alphabetic);
  }

  #[test]
  fn token_count_is_script_aware() {
    assert_eq!(token_count("我是學生。"), 4);
    assert_eq!(token_count("我 是 學生"), 4);
    assert_eq!(token_count("Hello, my name is Ana!"), 5);
    assert_eq!(token_count("  ...  "), 0);
    assert_eq!(token_count(""), 0);
  }

  #[test]
  fn levenshtein_classic_cases() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("你好吗", "你好马"), 1);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
  }

  #[test]
  fn similarity_properties() {
    assert_eq!(similarity("", ""), 1.0);
    for s in ["a", "你好", "hello world", "x y z"] {
      assert_eq!(similarity(s, s), 1.0);
    }
    let pairs = [("kitten", "sitting"), ("", "abc"), ("你好", "hello"), ("ab", "ba")];
    for (a, b) in pairs {
      assert_eq!(similarity(a, b), similarity(b, a));
      let v = similarity(a, b);
      assert!((0.0..=1.0).contains(&v));
    }
    assert_eq!(similarity("", "你好"), 0.0);
    assert!((similarity("你好吗", "你好马") - 2.0 / 3.0).abs() < 1e-9);
  }

  #[test]
  fn normalize_builds_three_forms() {
    let t = TableTransliterator::default();
    let f = normalize_for_match("你好 Hello!", &t);
    assert_eq!(f.original, "你好 hello!");
    assert_eq!(f.phonetic, "ni hao   h e l l o !");
    assert_eq!(f.latin, " hello");

    let only_latin = normalize_for_match("Hi!", &t);
    assert!(only_latin.phonetic.is_empty());
    assert_eq!(only_latin.latin, "hi");

    let only_han = normalize_for_match("你好", &NoTransliteration);
    assert!(only_han.phonetic.is_empty());
    assert!(only_han.latin.is_empty());
  }

  #[test]
  fn phonetic_form_rescues_homophone_typos() {
    let t = TableTransliterator::default();
    let expected = normalize_for_match("你好嗎", &t);
    let answer = normalize_for_match("你好吗", &t);
    let direct = similarity(&answer.original, &expected.original);
    assert!(answer.best_similarity(&expected) >= direct);
  }
}
