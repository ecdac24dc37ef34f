//! The AST driver.
//!
//! [`Ast`] owns a compiled rule table and a root combinator, and is the
//! only stateful glue between a scanner and the combinator graph: nodes
//! carry no mutable parse state and receive the scanner through the
//! driver on every call. Host-injected productions (for example "a
//! variable reference is any identifier token") are registered with
//! [`Ast::add_custom`] and shadow any grammar rule of the same name.

use ebnfc_lex::Scanner;
use ebnfc_util::ParseError;

use crate::ast::AstNode;
use crate::engine::ParseContext;
use crate::node::{CustomRule, NodeId};
use crate::rules::RuleTable;

/// Owns a rule table and drives its root combinator over input.
///
/// # Examples
///
/// ```
/// use ebnfc_par::{Ast, Grammar};
///
/// let table = Grammar::parse("g.bnf", b"<s> ::= \"on\" | \"off\"").unwrap();
/// let ast = Ast::from_rule(table, "s").unwrap();
/// let tree = ast.parse("input", b"off").unwrap();
/// assert_eq!(tree.render(), "off");
/// ```
pub struct Ast {
    table: RuleTable,
    root: NodeId,
}

impl Ast {
    /// Uses `root` (any node of `table`) as the root combinator.
    pub fn new(table: RuleTable, root: NodeId) -> Self {
        Self { table, root }
    }

    /// Uses the named rule as the root combinator.
    pub fn from_rule(table: RuleTable, root: &str) -> Result<Self, ParseError> {
        match table.get(root) {
            Some(id) => Ok(Self { table, root: id }),
            None => Err(ParseError::UndefinedRule(root.to_string())),
        }
    }

    /// Inserts or replaces the rule entry `name` with a host-supplied
    /// production.
    pub fn add_custom(&mut self, name: &str, rule: Box<dyn CustomRule>) -> NodeId {
        self.table.set_custom(name, rule)
    }

    /// Looks up a rule entry by name.
    pub fn try_get(&self, name: &str) -> Option<NodeId> {
        self.table.get(name)
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Parses `input`, driving the root combinator until end of input.
    pub fn parse(&self, file: &str, input: &[u8]) -> Result<AstNode, ParseError> {
        let mut scanner = Scanner::new(file, input);
        self.parse_stream(&mut scanner)
    }

    /// Like [`Ast::parse`], over a caller-owned scanner.
    ///
    /// Each iteration fetches one token and runs the root combinator on
    /// it; a root failure reports the scanner's topmost error if one was
    /// pushed (a missing rule, a custom rule's diagnostic), otherwise the
    /// deepest unmet expectation. When the root matches more than once
    /// before end of input, the results are collected into a group.
    pub fn parse_stream(&self, scanner: &mut Scanner<'_>) -> Result<AstNode, ParseError> {
        let mut ctx = ParseContext::new();
        let mut results = Vec::new();
        loop {
            let token = scanner.get_token(false);
            if token.is_eof() {
                break;
            }
            match self.table.parse_at(self.root, &mut ctx, scanner, &token) {
                Some(node) => results.push(node),
                None => return Err(Self::rejection(scanner, &ctx, &token)),
            }
            if let Some(message) = scanner.get_error() {
                return Err(ParseError::Rejected(message));
            }
        }
        // The final fetch can still report, e.g. an unterminated block
        // comment at end of input.
        if let Some(message) = scanner.get_error() {
            return Err(ParseError::Rejected(message));
        }

        if results.is_empty() {
            Err(ParseError::NoMatch)
        } else if results.len() == 1 {
            Ok(results.remove(0))
        } else {
            Ok(AstNode::group(results))
        }
    }

    fn rejection(
        scanner: &Scanner<'_>,
        ctx: &ParseContext,
        token: &ebnfc_lex::Token,
    ) -> ParseError {
        if let Some(message) = scanner.get_error() {
            return ParseError::Rejected(message);
        }
        let message = match ctx.failure() {
            Some(missing) => missing.to_string(),
            None => format!("Unexpected token {} : at {}", token.text(), scanner.location()),
        };
        ParseError::Rejected(message)
    }
}
