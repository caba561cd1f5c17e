//! Validate command implementation

use anyhow::Result;
use clap::Args;
use segparse_api::SentenceParser;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Parser description to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating parser description: {}", self.config.display());

        match SentenceParser::from_file(&self.config) {
            Ok(parser) => {
                print!("{}", summary(&parser));
                Ok(())
            }
            Err(e) => {
                println!("✗ Description is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}

/// What a loaded parser is made of
fn summary(parser: &SentenceParser) -> String {
    let config = parser.config();
    let categories: Vec<String> = parser
        .categories()
        .iter()
        .map(|c| {
            if c.can_guess() {
                format!("?{}", c.name())
            } else {
                c.name().to_string()
            }
        })
        .collect();

    let mut out = String::from("✓ Description is valid!\n");
    out.push_str(&format!("  Categories: {}\n", categories.join(", ")));
    out.push_str(&format!("  Rules: {}\n", parser.parser().grammar().len()));
    for rule in parser.parser().grammar().rules() {
        out.push_str(&format!("    {rule}\n"));
    }
    out.push_str(&format!("  Lexicons: {}\n", config.lexicons.len()));
    for lexicon in &config.lexicons {
        out.push_str(&format!(
            "    {} ({:?}) -> {}\n",
            lexicon.display_name(),
            lexicon.kind,
            lexicon.category
        ));
    }
    out.push_str(&format!("  Strategy: {}\n", config.options.strategy));
    out
}
