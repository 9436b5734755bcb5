//! Small utility helpers used across modules.

/// True only for the base CJK Unified Ideographs block (U+4E00..U+9FFF).
/// Script detection keys off this block alone.
pub fn is_cjk_unified(ch: char) -> bool {
  ('\u{4E00}'..='\u{9FFF}').contains(&ch)
}

/// Remove every character that is not a letter, digit or whitespace.
pub fn strip_punctuation(s: &str) -> String {
  s.chars().filter(|c| c.is_alphanumeric() || c.is_whitespace()).collect()
}

/// Clamp into the rubric range [0, 100]. NaN collapses to 0.
pub fn bounded(x: f64) -> f64 {
  if x.is_nan() { 0.0 } else { x.clamp(0.0, 100.0) }
}
