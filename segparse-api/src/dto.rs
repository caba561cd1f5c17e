//! Data Transfer Objects for API

use crate::error::{ApiError, Result};
use segparse_core::{Parse, ParseError, ParseNode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

/// Input source for batch parsing, one sentence per line
pub enum Input {
    /// Raw text string
    Text(String),
    /// File path
    File(PathBuf),
    /// Raw bytes (UTF-8)
    Bytes(Vec<u8>),
    /// Reader
    Reader(Box<dyn Read + Send>),
}

impl std::fmt::Debug for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Input::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Input::File(path) => f.debug_tuple("File").field(path).finish(),
            Input::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            Input::Reader(_) => f.debug_tuple("Reader").field(&"<dyn Read>").finish(),
        }
    }
}

impl Input {
    /// Create input from text
    pub fn from_text(text: impl Into<String>) -> Self {
        Input::Text(text.into())
    }

    /// Create input from file path
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Input::File(path.into())
    }

    /// Create input from bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }

    /// Create input from a reader
    pub fn from_reader<R: Read + Send + 'static>(reader: R) -> Self {
        Input::Reader(Box::new(reader))
    }

    /// Read the text content from the input
    pub fn read_text(self) -> Result<String> {
        match self {
            Input::Text(text) => Ok(text),
            Input::File(path) => fs::read_to_string(&path).map_err(ApiError::Io),
            Input::Bytes(bytes) => String::from_utf8(bytes).map_err(ApiError::Utf8),
            Input::Reader(mut reader) => {
                let mut buffer = String::new();
                reader.read_to_string(&mut buffer).map_err(ApiError::Io)?;
                Ok(buffer)
            }
        }
    }

    /// Non-blank lines of the input, trimmed
    pub fn read_sentences(self) -> Result<Vec<String>> {
        Ok(self
            .read_text()?
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

/// One leaf of a parse tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafDTO {
    /// Grammar label of the leaf
    pub label: String,
    /// Category name, absent for literals
    pub category: Option<String>,
    /// Matched input text
    pub text: String,
    /// Start codepoint offset
    pub start: usize,
    /// End codepoint offset (exclusive)
    pub end: usize,
    /// Accepted on a guess rather than a lexicon match
    pub guessed: bool,
    /// Attributes recorded on the matched span
    pub attributes: BTreeMap<String, String>,
}

impl LeafDTO {
    fn from_node(node: &ParseNode) -> Result<Self> {
        let ParseNode::Leaf {
            label,
            category,
            source,
        } = node
        else {
            return Err(ParseError::DetachedLeaf {
                label: node.label().to_string(),
            }
            .into());
        };
        let substring = source.substring().ok_or_else(|| ParseError::DetachedLeaf {
            label: label.to_string(),
        })?;

        Ok(Self {
            label: label.to_string(),
            category: category.as_ref().map(|c| c.name().to_string()),
            text: substring.text().to_string(),
            start: substring.start(),
            end: substring.end(),
            guessed: source.is_guessed(),
            attributes: substring.attributes(),
        })
    }
}

/// One parse of a sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseDTO {
    /// Bracketed tree rendering
    pub tree: String,
    /// Tree shape without leaf text
    pub key: String,
    /// Root category
    pub category: Option<String>,
    /// Leaves in input order
    pub leaves: Vec<LeafDTO>,
    /// Input from the first leaf through the last
    pub parsed_input: Option<String>,
    /// Input skipped before the first leaf
    pub unparsed_prior_input: Option<String>,
    /// Input left after the last leaf
    pub unparsed_post_input: Option<String>,
    /// Whether any leaf was guessed
    pub has_guesses: bool,
}

impl ParseDTO {
    /// Convert a core parse
    pub fn from_parse(parse: &Parse) -> Result<Self> {
        let leaves = parse
            .leaves()
            .into_iter()
            .map(LeafDTO::from_node)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            tree: parse.to_string(),
            key: parse.parse_key(),
            category: parse.category().map(|c| c.name().to_string()),
            leaves,
            parsed_input: parse.parsed_input().map(|s| s.text().to_string()),
            unparsed_prior_input: parse.unparsed_prior_input().map(|s| s.text().to_string()),
            unparsed_post_input: parse.unparsed_post_input().map(|s| s.text().to_string()),
            has_guesses: parse.has_guesses(),
        })
    }
}

/// Timing and counts for one sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of parses kept
    pub parse_count: usize,
    /// Characters in the sentence
    pub total_chars: usize,
    /// Processing time in microseconds
    pub processing_time_us: u64,
}

/// Parses of one sentence with metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// The input sentence
    pub sentence: String,
    /// Maximal parses; empty when nothing was accepted
    pub parses: Vec<ParseDTO>,
    /// Processing metadata
    pub metadata: Metadata,
}

impl Output {
    /// An output without parses
    pub fn empty(sentence: impl Into<String>) -> Self {
        let sentence = sentence.into();
        Self {
            metadata: Metadata {
                parse_count: 0,
                total_chars: sentence.chars().count(),
                processing_time_us: 0,
            },
            sentence,
            parses: Vec::new(),
        }
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
