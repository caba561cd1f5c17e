//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use segparse_core::domain::breaks::BREAK_STRATEGY_NAMES;
use segparse_core::TokenizationStrategy;

pub mod parse;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Parse sentences with a grammar described in a TOML file
    Parse(parse::ParseArgs),

    /// Check that a parser description loads
    Validate(validate::ValidateArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List tokenization and break strategies
    Strategies,

    /// List available output formats
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Parse(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::List { subcommand } => {
                print!("{}", subcommand.render());
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Listing text for this subcommand
    pub fn render(&self) -> String {
        let mut out = String::new();
        match self {
            ListCommands::Strategies => {
                out.push_str("Tokenization strategies:\n");
                for strategy in TokenizationStrategy::ALL {
                    out.push_str(&format!(
                        "  {:<32} {}\n",
                        strategy.name(),
                        strategy.description()
                    ));
                }
                out.push_str("\nBreak strategies:\n");
                for name in BREAK_STRATEGY_NAMES {
                    out.push_str(&format!("  {name}\n"));
                }
            }
            ListCommands::Formats => {
                out.push_str("Output formats:\n");
                out.push_str("  text      One parse tree per line\n");
                out.push_str("  json      Parses with leaves and metadata as a JSON array\n");
                out.push_str("  markdown  Numbered list of sentences and their parses\n");
            }
        }
        out
    }
}
