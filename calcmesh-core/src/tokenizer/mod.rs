//! # Tokenizer Component
//!
//! Lexical analysis of arithmetic expressions: raw text becomes a stream of
//! positioned tokens for the analyzer.
//!
//! ## Component Structure
//!
//! * [`token`]: Core token types and tokenizer implementation
//! * [`symbol`]: Operators and parentheses
//! * [`literal`]: Integer and decimal literals
//! * [`whitespace`]: Whitespace runs
//!
//! ## Integration Points
//!
//! 1. **Input**: Raw expression text
//! 2. **Processing**: [`Tokenizer::tokenize`](token::Tokenizer::tokenize)
//! 3. **Output**: Stream of [`TokenSpan`](token::TokenSpan) objects
//! 4. **Next Stage**: [`crate::preprocessor`] drops whitespace, then the
//!    [`crate::analyzer`] builds the AST
//!
//! ## Usage Example
//!
//! ```rust
//! use calcmesh_core::tokenizer::token::{Token, Tokenizer};
//!
//! let tokens = Tokenizer::new().tokenize("(3 + 5) * 2").unwrap();
//! assert_eq!(tokens[0].token.to_string(), "(");
//! assert!(matches!(tokens[1].token, Token::Number(n) if n == 3.0));
//! ```

pub mod literal;
pub mod symbol;
pub mod token;
pub mod whitespace;
