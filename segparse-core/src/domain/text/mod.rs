//! Input text model
//!
//! [`StringWrapper`] owns one input string, its codepoints and its lazily
//! computed break table. [`SubString`] values are interned views over it,
//! keyed by codepoint range, that accumulate lexical definitions.

mod substring;
mod wrapper;

pub use substring::{SubString, NORMALIZED_ATTRIBUTE};
pub use wrapper::StringWrapper;
