//! Single-line JSON log output.
//!
//! Each record is rendered as one JSON object with exactly four fields:
//! `level`, `message`, `timestamp` (unix seconds as a float) and `module`.

use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use log::Record;
use serde_json::json;

/// Render one log record as a single JSON line.
pub fn json_formatter(record: &Record) -> String {
    let created = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    format_fields(
        record.level().as_str(),
        &record.args().to_string(),
        created,
        record.module_path().unwrap_or_else(|| record.target()),
    )
}

fn format_fields(level: &str, message: &str, created: f64, module: &str) -> String {
    json!({
        "level": level,
        "message": message,
        "timestamp": created,
        "module": module,
    })
    .to_string()
}

/// Install env_logger with the JSON line format. Filtering is still
/// controlled through `RUST_LOG`, defaulting to `info`.
pub fn init() {
    init_from_env(env_logger::Env::default().default_filter_or("info"));
}

pub fn init_from_env(env: env_logger::Env) {
    env_logger::Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{}", json_formatter(record)))
        .init();
}
