use clap::Parser;

use bet_router::adapter::inbound::cli::command::{Cli, ColorChoice, Commands};
use bet_router::adapter::inbound::cli::output::{self, OutputConfig};
use bet_router::adapter::inbound::cli::{check, optimize, process, quote, run};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    let result = match &cli.command {
        Commands::Run(args) => run::execute(args).await,
        Commands::Optimize(args) => optimize::execute(args).await,
        Commands::Quote(args) => quote::execute(args),
        Commands::Check(args) => check::execute(args).await,
        Commands::Process(args) => process::execute(args).await,
    };

    if let Err(e) = result {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
