//! Combinator nodes.
//!
//! Every grammar fragment is one [`Combinator`] stored in the rule
//! table's arena and addressed by [`NodeId`]. Structural children
//! (sequence, alternative, option, repetition) hold plain ids into the
//! same arena and form a DAG; cycles between rules arise only through
//! [`NodeKind::Ref`], whose target is looked up by name at parse time and
//! cached.

use std::cell::Cell;
use std::fmt;

use ebnfc_lex::{Scanner, Token};

use crate::ast::AstNode;

/// Index of a combinator in its rule table's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A host-supplied production, reachable like any named rule.
///
/// On a miss the implementation must leave the scanner positioned before
/// `token` (a rule that only inspects `token` satisfies this for free;
/// one that consumed further tokens must unget back to `token.start`).
pub trait CustomRule {
    /// Name shown when the rule table is printed.
    fn name(&self) -> &str;

    fn parse(&self, scanner: &mut Scanner<'_>, token: &Token) -> Option<AstNode>;
}

/// Builds a [`CustomRule`] from a closure over the current token.
///
/// # Examples
///
/// ```
/// use ebnfc_par::{custom_rule, AstNode};
/// use ebnfc_lex::TokenKind;
///
/// let var = custom_rule("var", |token| {
///     (token.kind == TokenKind::Identifier).then(|| AstNode::from_token(token.clone()))
/// });
/// assert_eq!(var.name(), "var");
/// ```
pub fn custom_rule<F>(name: impl Into<String>, f: F) -> Box<dyn CustomRule>
where
    F: Fn(&Token) -> Option<AstNode> + 'static,
{
    struct TokenRule<F> {
        name: String,
        f: F,
    }
    impl<F> CustomRule for TokenRule<F>
    where
        F: Fn(&Token) -> Option<AstNode>,
    {
        fn name(&self) -> &str {
            &self.name
        }
        fn parse(&self, _scanner: &mut Scanner<'_>, token: &Token) -> Option<AstNode> {
            (self.f)(token)
        }
    }
    Box::new(TokenRule {
        name: name.into(),
        f,
    })
}

/// The variant payload of one combinator.
pub enum NodeKind {
    /// Matches a token whose lexeme equals the text.
    Literal(String),
    /// Ordered conjunction.
    Seq(Vec<NodeId>),
    /// Ordered first-match disjunction.
    Alt(Vec<NodeId>),
    /// Zero or one.
    Opt(NodeId),
    /// Zero or more, greedy.
    Star(NodeId),
    /// One or more, greedy.
    Plus(NodeId),
    /// By-name reference into the rule table, bound on first use.
    Ref {
        target: String,
        resolved: Cell<Option<NodeId>>,
    },
    /// Host-supplied production.
    Custom(Box<dyn CustomRule>),
}

/// One combinator: an optional defined-name (set when the node is the
/// body of a named rule) and its variant.
pub struct Combinator {
    pub(crate) name: Option<String>,
    pub(crate) kind: NodeKind,
}

impl Combinator {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self { name: None, kind }
    }

    /// The name this combinator was registered under, if any.
    pub fn defined_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.kind {
            NodeKind::Literal(s) => format!("Literal({s:?})"),
            NodeKind::Seq(c) => format!("Seq({} children)", c.len()),
            NodeKind::Alt(c) => format!("Alt({} children)", c.len()),
            NodeKind::Opt(_) => "Opt".to_string(),
            NodeKind::Star(_) => "Star".to_string(),
            NodeKind::Plus(_) => "Plus".to_string(),
            NodeKind::Ref { target, .. } => format!("Ref(<{target}>)"),
            NodeKind::Custom(rule) => format!("Custom(*{}*)", rule.name()),
        };
        match &self.name {
            Some(name) => write!(f, "Combinator({name}: {kind})"),
            None => write!(f, "Combinator({kind})"),
        }
    }
}
