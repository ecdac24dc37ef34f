//! ebnfc-lex - Lexical Scanner
//!
//! The scanner turns an in-memory byte buffer into a stream of [`Token`]s:
//! identifiers, symbols, and typed constants. It is deliberately stateful
//! and pull-based; callers fetch one token at a time and may push the most
//! recent token back with [`Scanner::unget_token`], which is the primitive
//! every backtracking consumer in the toolkit is built on.
//!
//! Layering, bottom to top:
//!
//! - [`cursor::Cursor`] - a byte cursor with line tracking and a one-step
//!   shadow position for `unget`.
//! - [`Scanner`] - character-level operations (comment elision, leading
//!   whitespace skip) and the tokenizer itself, split across the
//!   `scanner` submodules by token family.
//! - matchers - `match_*` / `peek_*` / `require_*` helpers layered on
//!   `get_token`, each of which tests one token and ungets it on a miss.
//!
//! Comment handling is configurable through [`Dialect`]: the default
//! dialect elides `/* ... */` block comments and `// ...` line comments,
//! and consumers such as an INI parser can swap in `;` / `#` line comments
//! with block comments disabled. Elided comment text accumulates in a
//! buffer the caller can inspect, so hosts can attach the comment block
//! preceding a token to whatever that token introduces.

pub mod cursor;
pub mod dialect;
mod matchers;
mod props;
pub mod scanner;
pub mod token;

pub use dialect::{Dialect, ScannerConfig};
pub use scanner::Scanner;
pub use token::{ConstValue, Token, TokenKind};
