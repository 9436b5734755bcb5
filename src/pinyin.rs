//! Hanzi → phonetic transliteration used as one of the match representations.
//!
//! Example (table):
//!   输入: "你好嗎"
//!   输出: "ni hao ma"
//!
//! Every transliterator emits one space-separated token per mapped syllable or
//! per unmapped character, so two transliterations of similar sentences line up
//! token by token under edit distance.
use std::{collections::HashMap, sync::Arc};

use pinyin::ToPinyin;
use serde::Deserialize;

/// Capability interface: turn logographic text into a phonetic projection.
///
/// Returning `None` means "no phonetic representation"; the scorer then skips
/// that representation entirely.
pub trait TextTransliterator: Send + Sync {
    fn transliterate(&self, text: &str) -> Option<String>;
}

/// Which transliterator the scorer should be built with.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransliteratorKind {
    #[default]
    Table,
    Pinyin,
    None,
}

impl TransliteratorKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Some(Self::Table),
            "pinyin" => Some(Self::Pinyin),
            "none" | "off" | "disabled" => Some(Self::None),
            _ => None,
        }
    }

    pub fn build(self) -> Arc<dyn TextTransliterator> {
        match self {
            Self::Table => Arc::new(TableTransliterator::default()),
            Self::Pinyin => Arc::new(PinyinTransliterator),
            Self::None => Arc::new(NoTransliteration),
        }
    }
}

/// Small static lookup table (toneless). Entries may span several characters;
/// the longest entry starting at each position wins.
pub struct TableTransliterator {
    table: HashMap<&'static str, &'static str>,
    longest: usize,
}

const SEED_TABLE: &[(&str, &str)] = &[
    ("你", "ni"),
    ("好", "hao"),
    ("嗎", "ma"),
    ("我", "wo"),
    ("是", "shi"),
    ("學生", "xuesheng"),
    ("老師", "laoshi"),
    ("謝謝", "xiexie"),
    ("請", "qing"),
    ("吃", "chi"),
    ("喝", "he"),
    ("去", "qu"),
    ("來", "lai"),
    ("看", "kan"),
];

impl TableTransliterator {
    pub fn new(entries: &[(&'static str, &'static str)]) -> Self {
        let table: HashMap<_, _> = entries.iter().copied().collect();
        let longest = table.keys().map(|k| k.chars().count()).max().unwrap_or(1);
        Self { table, longest }
    }
}

impl Default for TableTransliterator {
    fn default() -> Self {
        Self::new(SEED_TABLE)
    }
}

impl TextTransliterator for TableTransliterator {
    fn transliterate(&self, text: &str) -> Option<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens: Vec<String> = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let max_span = self.longest.min(chars.len() - i);
            let hit = (1..=max_span).rev().find_map(|span| {
                let key: String = chars[i..i + span].iter().collect();
                self.table.get(key.as_str()).map(|py| (span, *py))
            });
            match hit {
                Some((span, py)) => {
                    tokens.push(py.to_string());
                    i += span;
                }
                None => {
                    // Absent entries pass through unchanged.
                    tokens.push(chars[i].to_string());
                    i += 1;
                }
            }
        }
        Some(tokens.join(" "))
    }
}

/// Full toneless Hanyu Pinyin backed by the `pinyin` crate.
///
/// Converts per character (no word segmentation), so polyphonic characters use
/// their default reading. Non-Chinese characters are copied as-is.
pub struct PinyinTransliterator;

impl TextTransliterator for PinyinTransliterator {
    fn transliterate(&self, text: &str) -> Option<String> {
        let tokens: Vec<String> = text
            .chars()
            .map(|ch| match ch.to_pinyin() {
                Some(py) => py.plain().to_string(),
                None => ch.to_string(),
            })
            .collect();
        Some(tokens.join(" "))
    }
}

/// Disabled transliteration: the phonetic representation is never produced.
pub struct NoTransliteration;

impl TextTransliterator for NoTransliteration {
    fn transliterate(&self, _text: &str) -> Option<String> {
        None
    }
}
