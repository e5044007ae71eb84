//! Handler for the `check` command.
//!
//! Runs each readiness check in turn and reports every failure instead of
//! stopping at the first one.

use super::command::ConfigPathArg;
use super::output;
use crate::adapter::outbound::sqlite::database::connection::connect;
use crate::error::{ConfigError, Result};
use crate::infrastructure::config::Config;

/// Pool store reachable and migrated.
fn check_database(config: &Config) -> bool {
    match connect(&config.pool_store.database_url) {
        Ok(_) => {
            output::success(&format!("Pool store {}", config.pool_store.database_url));
            true
        }
        Err(e) => {
            output::error(&format!("Pool store {}: {e}", config.pool_store.database_url));
            false
        }
    }
}

fn check_run_fields(config: &Config) -> bool {
    match config.validate_for_run() {
        Ok(()) => {
            output::success("Required run settings present");
            true
        }
        Err(e) => {
            output::error(&e.to_string());
            false
        }
    }
}

#[cfg(feature = "chain")]
async fn check_rpc(config: &Config) -> bool {
    use crate::adapter::outbound::chain::AlloyChainClient;
    use crate::port::outbound::chain::ChainClient;

    if config.chain.rpc_url.trim().is_empty() {
        output::warning("No RPC URL configured, skipping chain checks");
        return false;
    }
    let client = match AlloyChainClient::read_only(&config.chain) {
        Ok(client) => client,
        Err(e) => {
            output::error(&format!("Chain client: {e}"));
            return false;
        }
    };
    let chain_id = match client.chain_id().await {
        Ok(id) => id,
        Err(e) => {
            output::error(&format!("RPC {}: {e}", config.chain.rpc_url));
            return false;
        }
    };
    if let Some(expected) = config.chain.chain_id {
        if expected != chain_id {
            output::error(&format!("RPC reports chain {chain_id}, config expects {expected}"));
            return false;
        }
    }
    match client.latest_block().await {
        Ok(head) => {
            output::success(&format!("RPC chain {chain_id} at block {head}"));
            true
        }
        Err(e) => {
            output::error(&format!("RPC {}: {e}", config.chain.rpc_url));
            false
        }
    }
}

#[cfg(not(feature = "chain"))]
async fn check_rpc(_config: &Config) -> bool {
    output::warning("Built without the `chain` feature, skipping chain checks");
    true
}

/// Validate configuration, ABI, pool store and RPC connectivity.
///
/// # Errors
///
/// Fails when the configuration cannot be loaded or any check fails.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Configuration");
    let config = Config::load(&args.config)?;
    output::success(&format!("Loaded {}", args.config.display()));
    output::field("Marketplaces", config.registry.len());
    if let Some(abi) = &config.chain.abi_path {
        output::success(&format!("Contract ABI {abi} exposes every required entry"));
    }

    let mut failures = 0;
    if !check_run_fields(&config) {
        failures += 1;
    }

    output::section("Pool store");
    if !check_database(&config) {
        failures += 1;
    }

    output::section("Chain");
    if !check_rpc(&config).await {
        failures += 1;
    }

    if failures > 0 {
        return Err(ConfigError::Other(format!("{failures} check(s) failed")).into());
    }
    output::section("Ready");
    output::success("All checks passed");
    Ok(())
}
