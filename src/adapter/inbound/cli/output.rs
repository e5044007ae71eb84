//! Terminal output for CLI handlers.
//!
//! Every helper honors the global flags: JSON mode emits one
//! `{"type", "payload"}` object per line on stdout, quiet mode drops
//! everything but warnings and errors.

use std::fmt::Display;
use std::sync::{OnceLock, RwLock};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

/// Output flags shared by every handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// `-v` count.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static OUTPUT: OnceLock<RwLock<OutputConfig>> = OnceLock::new();

fn cell() -> &'static RwLock<OutputConfig> {
    OUTPUT.get_or_init(|| RwLock::new(OutputConfig::default()))
}

fn current() -> OutputConfig {
    match cell().read() {
        Ok(config) => *config,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Install the flags parsed from the command line.
pub fn configure(config: OutputConfig) {
    match cell().write() {
        Ok(mut slot) => *slot = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

fn json_line(kind: &str, payload: Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// JSON line in JSON mode, `human` otherwise unless quiet.
fn emit(kind: &str, payload: impl FnOnce() -> Value, human: impl FnOnce()) {
    let config = current();
    if config.json {
        json_line(kind, payload());
    } else if !config.quiet {
        human();
    }
}

pub fn header(version: &str) {
    emit(
        "header",
        || json!({ "app": env!("CARGO_PKG_NAME"), "version": version }),
        || {
            println!("{} {}", env!("CARGO_PKG_NAME").bold(), version.dimmed());
            println!();
        },
    );
}

/// A labeled value, label column padded to 16.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        || json!({ "label": label, "value": value }),
        || println!("  {:<16} {value}", label.dimmed()),
    );
}

pub fn section(title: &str) {
    emit(
        "section",
        || json!({ "title": title }),
        || println!("\n{}", title.bold()),
    );
}

pub fn success(message: &str) {
    emit(
        "success",
        || json!({ "message": message }),
        || println!("  {} {message}", "✓".green()),
    );
}

pub fn note(message: &str) {
    emit(
        "note",
        || json!({ "message": message }),
        || println!("  {}", message.dimmed()),
    );
}

/// Shown even in quiet mode.
pub fn warning(message: &str) {
    if is_json() {
        json_line("warning", json!({ "message": message }));
    } else {
        println!("  {} {message}", "⚠".yellow());
    }
}

/// Always written to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", "×".red());
    }
}

/// Rows as a table, or one JSON array under `kind`.
pub fn table<T: Tabled + Serialize>(kind: &str, rows: &[T]) {
    emit(
        kind,
        || json!(rows),
        || {
            if rows.is_empty() {
                return;
            }
            for line in Table::new(rows).to_string().lines() {
                println!("  {line}");
            }
        },
    );
}

/// A whole result object. JSON mode only.
pub fn payload<T: Serialize>(kind: &str, value: &T) {
    if is_json() {
        json_line(kind, json!(value));
    }
}

/// Cyan outside JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.to_string().cyan().to_string()
    }
}
