//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Reads sentences, one per line
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    /// Non-blank, trimmed lines of a file
    pub fn read_sentences(path: &Path) -> Result<Vec<String>> {
        Ok(split_sentences(&Self::read_text(path)?))
    }

    /// Non-blank, trimmed lines of a reader
    pub fn read_sentences_from(mut reader: impl Read) -> Result<Vec<String>> {
        let mut buffer = String::new();
        reader
            .read_to_string(&mut buffer)
            .context("Failed to read standard input")?;
        Ok(split_sentences(&buffer))
    }
}

fn split_sentences(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
