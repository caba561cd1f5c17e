//! Token boundary search
//!
//! A [`TokenPointer`] finds where a token ends by consulting a lexicon over
//! candidate spans in the order its [`TokenizationStrategy`] prescribes.

mod pointer;
mod strategy;

pub use pointer::TokenPointer;
pub use strategy::TokenizationStrategy;
