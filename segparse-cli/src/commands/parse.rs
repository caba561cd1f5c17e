//! Parse command implementation

use crate::error::CliError;
use crate::input::{resolve_patterns, FileReader};
use crate::output::{JsonFormatter, MarkdownFormatter, OutputFormatter, TextFormatter};
use anyhow::{Context, Result};
use clap::Args;
use segparse_api::SentenceParser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Arguments for the parse command
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Parser description (categories, grammar, lexicons)
    #[arg(short, long, value_name = "FILE", env = "SEGPARSE_CONFIG")]
    pub config: PathBuf,

    /// Input files or patterns, one sentence per line (default: stdin)
    #[arg(short, long, value_name = "FILE/PATTERN")]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress log output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One parse tree per line
    Text,
    /// JSON array of sentences with parses and metadata
    Json,
    /// Markdown formatted output
    Markdown,
}

impl ParseArgs {
    /// Execute the parse command
    pub fn execute(&self) -> Result<()> {
        self.init_logging();

        log::info!("Loading parser from {}", self.config.display());
        let parser = SentenceParser::from_file(&self.config)
            .map_err(|e| CliError::ConfigError(e.to_string()))
            .with_context(|| format!("Failed to load {}", self.config.display()))?;
        log::debug!("{parser:?}");

        let sentences = self.read_sentences()?;
        if sentences.is_empty() {
            return Err(CliError::NoInput.into());
        }
        log::info!("Parsing {} sentences", sentences.len());

        let outputs = parser.parse_batch(&sentences);

        let mut formatter = self.formatter()?;
        for output in &outputs {
            formatter.format_output(output)?;
        }
        formatter.finish()?;

        let parsed = outputs.iter().filter(|o| !o.parses.is_empty()).count();
        log::info!("Parsed {parsed} of {} sentences", outputs.len());
        Ok(())
    }

    fn read_sentences(&self) -> Result<Vec<String>> {
        if self.input.is_empty() {
            log::debug!("Reading sentences from stdin");
            return FileReader::read_sentences_from(io::stdin().lock());
        }

        let mut sentences = Vec::new();
        for path in resolve_patterns(&self.input)? {
            log::debug!("Reading {}", path.display());
            sentences.extend(FileReader::read_sentences(&path)?);
        }
        Ok(sentences)
    }

    fn formatter(&self) -> Result<Box<dyn OutputFormatter>> {
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                Ok(self.format.formatter(BufWriter::new(file)))
            }
            None => Ok(self.format.formatter(io::stdout())),
        }
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A second init in the same process is harmless
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}

impl OutputFormat {
    /// Formatter for this format writing to `writer`
    pub fn formatter<W>(self, writer: W) -> Box<dyn OutputFormatter>
    where
        W: io::Write + Send + Sync + 'static,
    {
        match self {
            OutputFormat::Text => Box::new(TextFormatter::new(writer)),
            OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
            OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
        }
    }
}
