//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use segparse_api::Output;
use std::io::Write;

/// Markdown formatter - a numbered section per sentence
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    sentence_count: usize,
    parsed_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sentence_count: 0,
            parsed_count: 0,
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for MarkdownFormatter<W> {
    fn format_output(&mut self, output: &Output) -> Result<()> {
        self.sentence_count += 1;
        writeln!(self.writer, "{}. {}", self.sentence_count, output.sentence)?;

        if output.parses.is_empty() {
            writeln!(self.writer, "   - *no parse*")?;
            return Ok(());
        }

        self.parsed_count += 1;
        for parse in &output.parses {
            write!(self.writer, "   - `{}`", parse.tree)?;
            if let Some(extra) = &parse.unparsed_post_input {
                write!(self.writer, " (unparsed: {extra})")?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(
            self.writer,
            "*Parsed sentences: {} of {}*",
            self.parsed_count, self.sentence_count
        )?;
        self.writer.flush()?;
        Ok(())
    }
}
