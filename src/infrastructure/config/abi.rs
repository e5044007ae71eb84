//! Startup check of the deployed contract's JSON ABI.
//!
//! Accepts either a bare ABI array or a build artifact with an `abi` field.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConfigError, Result};

/// Functions the orchestrator calls.
pub const REQUIRED_FUNCTIONS: [&str; 5] = [
    "getBetSlip",
    "getProxiedBet",
    "updateBetSlipStatus",
    "recordProxiedBetPlaced",
    "recordProxiedBetSold",
];

/// Events the poller queries. Each must carry the slip id as its first,
/// indexed `uint256` input.
pub const REQUIRED_EVENTS: [&str; 2] = ["BetSlipCreated", "BetSlipSellingStateUpdate"];

#[derive(Debug, Deserialize)]
struct AbiItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    indexed: bool,
}

/// # Errors
///
/// Returns [`ConfigError::Abi`] when the file is unreadable, is not an ABI,
/// or lacks an entry the orchestrator depends on.
pub fn check_abi_file(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Abi {
        path: display.clone(),
        reason: e.to_string(),
    })?;
    check_abi(&content).map_err(|reason| ConfigError::Abi { path: display, reason }.into())
}

/// Validate ABI JSON text, returning the first problem found.
///
/// # Errors
///
/// Returns a description of the missing or malformed entry.
pub fn check_abi(content: &str) -> std::result::Result<(), String> {
    let value: Value = serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;
    let entries = match value {
        Value::Object(mut artifact) => artifact
            .remove("abi")
            .ok_or_else(|| "object has no 'abi' field".to_string())?,
        array @ Value::Array(_) => array,
        _ => return Err("expected an ABI array".into()),
    };
    let items: Vec<AbiItem> = serde_json::from_value(entries).map_err(|e| format!("malformed ABI: {e}"))?;

    for name in REQUIRED_FUNCTIONS {
        if !items.iter().any(|i| i.kind == "function" && i.name == name) {
            return Err(format!("missing function '{name}'"));
        }
    }
    for name in REQUIRED_EVENTS {
        let event = items
            .iter()
            .find(|i| i.kind == "event" && i.name == name)
            .ok_or_else(|| format!("missing event '{name}'"))?;
        match event.inputs.first() {
            Some(first) if first.indexed && first.kind == "uint256" => {}
            _ => return Err(format!("event '{name}' must start with an indexed uint256 slip id")),
        }
    }
    Ok(())
}
