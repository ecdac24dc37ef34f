//! ebnfc-util - Shared Foundation Types
//!
//! This crate provides the small pieces the rest of the toolkit builds on:
//!
//! - [`span`] - source locations (`offset`, `line`, `column`) and their
//!   `line:column` rendering, used in every diagnostic message.
//! - [`diagnostic`] - the diagnostic value type and the LIFO error stack a
//!   scanner owns. Errors accumulate most-recent-on-top; parse failures
//!   report the top of the stack.
//! - [`error`] - the typed error enums returned by the public entry points
//!   (grammar compilation, AST parsing, INI parsing).
//! - [`tree`] - a generic indented tree printer used to render AST dumps.
//!
//! Everything here is single-threaded by design. Diagnostics are plain
//! values, not channels or sinks, and an `ErrorStack` lives and dies with
//! the scanner that owns it.

pub mod diagnostic;
pub mod error;
pub mod span;
pub mod tree;

pub use diagnostic::{Diagnostic, ErrorStack, Level};
pub use error::{GrammarError, IniError, ParseError};
pub use span::Location;
pub use tree::render_tree;
