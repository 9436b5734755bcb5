//! Rule-based answer scoring for spoken/typed language-learning exercises.
//!
//! A question/answer pair (plus optional expected answers) becomes five rubric
//! scores (pronunciation, fluency, accuracy, comprehension, confidence) and a
//! weighted total, optionally blended with externally computed semantic signals.
//!
//! ```
//! use lesson_scorer::{fuse_with_llm, score_one_rule_only, QAItem};
//!
//! let item = QAItem::new("请说你好", "你好", 1.0, 2.0).with_expected("你好");
//! let result = score_one_rule_only(&item);
//! assert!(result.scores.accuracy >= 90.0);
//! assert_eq!(fuse_with_llm(&result, None), result);
//! ```

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod domain;
pub mod fusion;
pub mod pinyin;
pub mod protocol;
pub mod recommend;
pub mod scorer;
pub mod telemetry;
pub mod text;
pub mod thresholds;
mod util;

pub use aggregate::aggregate;
pub use analysis::{analyze_session, AnalyzeError, ANALYSIS_VERSION};
pub use config::ScorerConfig;
pub use domain::{ExpectedAnswer, PerQuestionResult, QAItem, Scores, SemanticSignals};
pub use fusion::fuse_with_llm;
pub use pinyin::{TextTransliterator, TransliteratorKind};
pub use protocol::{AnalysisOutput, Overview, SessionInput};
pub use recommend::recommend;
pub use scorer::{score_one_rule_only, Scorer};
pub use text::{detect_script, similarity, token_count, Script};
pub use util::strip_punctuation;
