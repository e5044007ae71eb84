//! Handler for the `run` command.

use super::command::RunArgs;
use super::output;
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Load configuration for a foreground run, applying CLI overrides.
///
/// # Errors
///
/// Fails when the file cannot be read or a required field is missing.
pub fn load(args: &RunArgs) -> Result<Config> {
    let mut config = Config::load(&args.config)?;
    if args.dry_run {
        config.executor.dry_run = true;
    }
    if args.start_block.is_some() {
        config.chain.start_block = args.start_block;
    }
    config.validate_for_run()?;
    Ok(config)
}

/// Shown when orders are simulated.
const DRY_RUN_NOTICE: &str = "Dry run: buy and sell orders are simulated and nothing is written on-chain";

fn print_summary(config: &Config) {
    output::header(env!("CARGO_PKG_VERSION"));
    output::field("Contract", &config.chain.contract_address);
    output::field("RPC", &config.chain.rpc_url);
    output::field("Adapter", &config.marketplace.base_url);
    output::field("Strategy", config.optimizer.default_strategy);
    output::field("Marketplaces", config.registry.len());
    output::field("Pool store", &config.pool_store.database_url);
    if config.executor.dry_run {
        output::warning(DRY_RUN_NOTICE);
    }
}

/// Run the event poller until Ctrl+C.
///
/// # Errors
///
/// Returns configuration, wiring and poller initialization failures.
#[cfg(feature = "chain")]
pub async fn execute(args: &RunArgs) -> Result<()> {
    use tokio::sync::watch;
    use tracing::info;

    use crate::infrastructure::bootstrap;

    let config = load(args)?;
    config.init_logging();
    print_summary(&config);

    let services = bootstrap::build_services(&config)?;
    let chain = bootstrap::connect_chain(&config)?;
    let poller = bootstrap::build_poller(&config, &services, chain);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut task = tokio::spawn(poller.run(shutdown_rx));
    output::success("Polling for bet slip events (Ctrl+C to stop)");

    tokio::select! {
        joined = &mut task => return flatten(joined),
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
            output::note("Shutting down");
        }
    }

    let _ = shutdown_tx.send(true);
    flatten(task.await)
}

/// Without the chain adapter there is nothing to poll.
///
/// # Errors
///
/// Always fails.
#[cfg(not(feature = "chain"))]
pub async fn execute(args: &RunArgs) -> Result<()> {
    let config = load(args)?;
    print_summary(&config);
    Err(crate::error::ConfigError::Other("run requires the `chain` feature".to_string()).into())
}

#[cfg(feature = "chain")]
fn flatten(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(std::io::Error::other(e).into()),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn dry_run_flag_relaxes_key_requirement() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [chain]
            rpc_url = "http://localhost:8545"
            contract_address = "0x633D59F15e588c4a5D8F2E35e4d65041191517AA"
            "#,
        );
        let args = RunArgs {
            config: path,
            dry_run: true,
            start_block: Some(99),
        };
        let config = load(&args).unwrap();
        assert!(config.executor.dry_run);
        assert_eq!(config.chain.start_block, Some(99));
    }

    #[test]
    fn dry_run_notice_covers_both_order_kinds() {
        assert!(DRY_RUN_NOTICE.contains("buy and sell"));
        assert!(!DRY_RUN_NOTICE.contains("no orders"));
    }

    #[test]
    fn missing_rpc_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "");
        let args = RunArgs {
            config: path,
            dry_run: true,
            start_block: None,
        };
        assert!(load(&args).is_err());
    }
}
