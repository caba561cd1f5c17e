//! segparse command-line entry point

use anyhow::Result;
use clap::Parser;
use segparse_cli::commands::Commands;

/// Parse short text with a finite-state grammar over ambiguous tokens
#[derive(Debug, Parser)]
#[command(name = "segparse", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
