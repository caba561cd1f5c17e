//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use segparse_api::Output;
use std::io::Write;

/// JSON formatter - outputs all sentences as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    outputs: Vec<Output>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            outputs: Vec::new(),
        }
    }
}

impl<W: Write + Send + Sync> OutputFormatter for JsonFormatter<W> {
    fn format_output(&mut self, output: &Output) -> Result<()> {
        self.outputs.push(output.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.outputs)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::outputs;

    #[test]
    fn test_json_output() {
        let mut buffer = Vec::new();
        {
            let mut formatter = JsonFormatter::new(&mut buffer);
            for output in outputs(&["the boy", "boy"]) {
                formatter.format_output(&output).unwrap();
            }
            formatter.finish().unwrap();
        }

        let parsed: Vec<Output> = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].parses[0].key, "(NP det noun)");
        assert_eq!(parsed[0].parses[0].leaves[1].text, "boy");
        assert!(parsed[1].parses.is_empty());
    }
}
