//! Lesson Scorer · session analysis driver
//!
//! Reads one session document (JSON) and prints the analysis report (JSON).
//!
//! Usage:
//!   lesson-scorer session.json
//!   cat session.json | lesson-scorer
//!
//! Important env variables:
//!   SCORER_CONFIG_PATH     : path to TOML config (weights, bands, thresholds, blend ratios)
//!   SCORER_TRANSLITERATOR  : "table" (default), "pinyin" or "none"
//!   LOG_LEVEL              : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT             : "pretty" (default) or "json"

use std::io::Read;

use tracing::{info, instrument};

use lesson_scorer::config::resolve_config_from_env;
use lesson_scorer::{analyze_session, telemetry, Scorer, SessionInput};

#[instrument(level = "info", skip_all)]
fn read_input(path: Option<&str>) -> std::io::Result<String> {
  match path {
    Some(p) => std::fs::read_to_string(p),
    None => {
      let mut buf = String::new();
      std::io::stdin().read_to_string(&mut buf)?;
      Ok(buf)
    }
  }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let cfg = resolve_config_from_env();
  info!(target: "lesson_scorer", transliterator = ?cfg.transliterator, "Scorer configured");
  let scorer = Scorer::from_config(cfg);

  let path = std::env::args().nth(1);
  let raw = read_input(path.as_deref())?;
  let session: SessionInput = serde_json::from_str(&raw)?;
  info!(target: "lesson_scorer", source = path.as_deref().unwrap_or("stdin"), items = session.items.len(), "Session loaded");

  let report = analyze_session(&scorer, &session)?;
  println!("{}", serde_json::to_string_pretty(&report)?);
  Ok(())
}
