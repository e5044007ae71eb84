//! Command-line interface definitions.
//!
//! The long-running `run` command drives the event poller. The remaining
//! commands expose single pieces of the pipeline for operators: offline
//! quotes, allocation previews, one-off slip processing and readiness
//! checks.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{MarketId, MarketplaceId, Side, Strategy};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Prediction-market bet router
#[derive(Parser, Debug)]
#[command(name = "bet-router")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the bet contract and route every new slip (foreground)
    Run(RunArgs),

    /// Preview an allocation across registered pools
    Optimize(OptimizeArgs),

    /// Quote an LMSR purchase from raw reserves, no I/O
    Quote(QuoteArgs),

    /// Validate configuration, contract ABI, pool store and RPC
    Check(ConfigPathArg),

    /// Run the buy or sell flow for one bet slip
    Process(ProcessArgs),
}

/// Shared argument struct for commands that only need a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Allocate and log, but place no orders and write nothing on-chain.
    #[arg(long)]
    pub dry_run: bool,

    /// First block to process when no cursor is stored.
    #[arg(long)]
    pub start_block: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct OptimizeArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Target pool as `<marketplace_id>:<market_id>`. Repeat for each pool.
    #[arg(long = "pool", required = true, value_parser = parse_target)]
    pub pools: Vec<(MarketplaceId, MarketId)>,

    /// Budget in whole collateral units.
    #[arg(long)]
    pub amount: f64,

    /// Side to buy (a or b).
    #[arg(long, default_value = "a")]
    pub side: Side,

    /// Strategy override; defaults to `optimizer.default_strategy`.
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Run every applicable strategy plus the best single pool.
    #[arg(long, conflicts_with = "strategy")]
    pub compare: bool,
}

#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Initial liquidity backing side A.
    #[arg(long)]
    pub liquidity_a: f64,

    /// Initial liquidity backing side B.
    #[arg(long)]
    pub liquidity_b: f64,

    /// Outstanding side-A shares.
    #[arg(long, default_value_t = 0.0)]
    pub supply_a: f64,

    /// Outstanding side-B shares.
    #[arg(long, default_value_t = 0.0)]
    pub supply_b: f64,

    /// Collateral to spend.
    #[arg(long)]
    pub amount: f64,

    /// Side to buy (a or b).
    #[arg(long, default_value = "a")]
    pub side: Side,

    /// Worst-case subsidy as a fraction of total liquidity.
    #[arg(long)]
    pub max_loss_fraction: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct ProcessArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Bet slip id.
    #[arg(long)]
    pub slip: u64,

    /// Run the sell flow instead of the buy flow.
    #[arg(long)]
    pub sell: bool,

    /// Allocate and log, but place no orders and write nothing on-chain.
    #[arg(long)]
    pub dry_run: bool,
}

fn parse_target(value: &str) -> Result<(MarketplaceId, MarketId), String> {
    let (marketplace, market) = value
        .split_once(':')
        .ok_or_else(|| format!("expected <marketplace_id>:<market_id>, got '{value}'"))?;
    let marketplace = marketplace
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid marketplace id '{marketplace}': {e}"))?;
    let market = market
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid market id '{market}': {e}"))?;
    Ok((MarketplaceId::new(marketplace), MarketId::new(market)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults() {
        let cli = Cli::try_parse_from(["bet-router", "run"]).unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG));
            assert!(!args.dry_run);
            assert_eq!(args.start_block, None);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_run_with_options() {
        let cli = Cli::try_parse_from([
            "bet-router",
            "run",
            "-c",
            "prod.toml",
            "--dry-run",
            "--start-block",
            "1200",
        ])
        .unwrap();
        if let Commands::Run(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("prod.toml"));
            assert!(args.dry_run);
            assert_eq!(args.start_block, Some(1200));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_optimize_collects_pools() {
        let cli = Cli::try_parse_from([
            "bet-router",
            "optimize",
            "--pool",
            "2:10",
            "--pool",
            "3:20",
            "--amount",
            "100",
            "--side",
            "b",
            "--strategy",
            "ternary",
        ])
        .unwrap();
        if let Commands::Optimize(args) = cli.command {
            assert_eq!(
                args.pools,
                vec![
                    (MarketplaceId::new(2), MarketId::new(10)),
                    (MarketplaceId::new(3), MarketId::new(20)),
                ]
            );
            assert_eq!(args.amount, 100.0);
            assert_eq!(args.side, Side::B);
            assert_eq!(args.strategy, Some(Strategy::Ternary));
            assert!(!args.compare);
        } else {
            panic!("Expected Optimize command");
        }
    }

    #[test]
    fn test_optimize_requires_pool() {
        let result = Cli::try_parse_from(["bet-router", "optimize", "--amount", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_optimize_rejects_malformed_pool() {
        let result = Cli::try_parse_from(["bet-router", "optimize", "--pool", "2-10", "--amount", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_compare_conflicts_with_strategy() {
        let result = Cli::try_parse_from([
            "bet-router",
            "optimize",
            "--pool",
            "2:10",
            "--amount",
            "10",
            "--strategy",
            "grid",
            "--compare",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quote_defaults_supply_to_zero() {
        let cli = Cli::try_parse_from([
            "bet-router",
            "quote",
            "--liquidity-a",
            "400",
            "--liquidity-b",
            "600",
            "--amount",
            "25",
        ])
        .unwrap();
        if let Commands::Quote(args) = cli.command {
            assert_eq!(args.supply_a, 0.0);
            assert_eq!(args.supply_b, 0.0);
            assert_eq!(args.side, Side::A);
            assert_eq!(args.max_loss_fraction, None);
        } else {
            panic!("Expected Quote command");
        }
    }

    #[test]
    fn test_process_sell() {
        let cli = Cli::try_parse_from(["bet-router", "process", "--slip", "7", "--sell"]).unwrap();
        if let Commands::Process(args) = cli.command {
            assert_eq!(args.slip, 7);
            assert!(args.sell);
            assert!(!args.dry_run);
        } else {
            panic!("Expected Process command");
        }
    }

    #[test]
    fn test_check_config_path() {
        let cli = Cli::try_parse_from(["bet-router", "check", "--config", "other.toml"]).unwrap();
        if let Commands::Check(args) = cli.command {
            assert_eq!(args.config, PathBuf::from("other.toml"));
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_unknown_command_fails() {
        let result = Cli::try_parse_from(["bet-router", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_side_fails() {
        let result = Cli::try_parse_from([
            "bet-router",
            "quote",
            "--liquidity-a",
            "1",
            "--liquidity-b",
            "1",
            "--amount",
            "1",
            "--side",
            "c",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand() {
        let result = Cli::try_parse_from(["bet-router"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_command() {
        let cli = Cli::try_parse_from(["bet-router", "run", "--json", "--quiet", "-vv"]).unwrap();
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_global_flags_mixed_position() {
        let cli = Cli::try_parse_from(["bet-router", "--json", "run", "--dry-run", "-v"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 1);
        if let Commands::Run(args) = cli.command {
            assert!(args.dry_run);
        } else {
            panic!("Expected Run command");
        }
    }
}
