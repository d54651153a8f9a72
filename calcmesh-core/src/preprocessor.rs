//! # Token Preprocessor
//!
//! Sits between the tokenizer and the analyzer:
//!
//! ```text
//! Expression → Tokenizer → Preprocessor → Analyzer → AST
//! ```
//!
//! The tokenizer keeps whitespace so spans cover the whole input; the analyzer
//! only wants significant tokens, which is what [`TokenPreprocessor`] yields.

use crate::tokenizer::token::{Token, TokenSpan};

/// A trait for preprocessing different types of input
pub trait Preprocessor<T, U = T> {
    /// Process the input of type T and return the processed result
    fn process(&self, input: T) -> U;
}

/// Token-specific preprocessor implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenPreprocessor;

impl TokenPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor<Vec<TokenSpan>> for TokenPreprocessor {
    fn process(&self, input: Vec<TokenSpan>) -> Vec<TokenSpan> {
        input
            .into_iter()
            .filter(|span| !matches!(span.token, Token::Whitespace(_)))
            .collect()
    }
}
