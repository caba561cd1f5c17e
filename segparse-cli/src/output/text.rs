//! Plain text output formatter

use super::OutputFormatter;
use anyhow::Result;
use segparse_api::Output;
use std::io::{self, Write};

/// Plain text formatter - one parse tree per line
///
/// Sentences without a parse are reported with a `#` comment line so the
/// output stays line-aligned with nothing lost silently.
pub struct TextFormatter<W: Write> {
    writer: W,
}

impl<W: Write> TextFormatter<W> {
    /// Create a new text formatter
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl TextFormatter<io::Stdout> {
    /// Create a formatter that writes to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send + Sync> OutputFormatter for TextFormatter<W> {
    fn format_output(&mut self, output: &Output) -> Result<()> {
        if output.parses.is_empty() {
            writeln!(self.writer, "# no parse: {}", output.sentence)?;
        }
        for parse in &output.parses {
            writeln!(self.writer, "{}", parse.tree)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
