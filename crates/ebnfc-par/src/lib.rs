//! ebnfc-par - Grammar Compiler and Combinator Engine
//!
//! An EBNF grammar text is itself parsed, into a graph of parser
//! combinators; that graph then drives a recursive-descent parse of
//! arbitrary input into an abstract syntax tree.
//!
//! The pieces, bottom up:
//!
//! - [`ast`] - the result tree: a tagged [`AstNode`](ast::AstNode) whose
//!   leaves keep the token that produced them.
//! - [`node`] - one combinator node: literal, sequence, alternative,
//!   option, repetition, by-name reference, or a host-supplied custom
//!   rule. Nodes live in an arena and refer to each other by
//!   [`NodeId`](node::NodeId), so the rule graph may be cyclic through
//!   references while structural children stay a plain DAG.
//! - [`rules`] - the [`RuleTable`](rules::RuleTable): the arena plus the
//!   name-to-node map that makes up one grammar.
//! - [`engine`] - the `parse_at` recursive walk implementing the shared
//!   parse contract (consume on success, restore the scanner exactly on
//!   failure).
//! - [`grammar`] - the single-pass compiler from EBNF text to a
//!   `RuleTable`.
//! - [`driver`] - the [`Ast`](driver::Ast) entry point owning a compiled
//!   table, a root combinator and the host's custom rules.
//!
//! Grammar notation accepted by the compiler:
//!
//! ```text
//! <expr>  ::= <var> ">" <num>          // reference, literal, sequence
//! <item>  ::= "a" | "b"                // ordered alternative
//! <list>  ::= "(" {<item>} ")"         // zero or more
//! <opt>   ::= [ "-" ] <num>           // optional
//! <many>  ::= "x"+                     // one or more
//! ```

pub mod ast;
pub mod driver;
mod edge_cases;
pub mod engine;
pub mod grammar;
pub mod node;
pub mod rules;

pub use ast::AstNode;
pub use driver::Ast;
pub use engine::ParseContext;
pub use grammar::Grammar;
pub use node::{custom_rule, Combinator, CustomRule, NodeId, NodeKind};
pub use rules::RuleTable;
