//! The result tree.
//!
//! Leaves wrap the token that produced them, so every node can point back
//! into the source for diagnostics. Sequences and repetitions emit
//! [`AstNode::Group`], whose children preserve source order.

use ebnfc_lex::{ConstValue, Token, TokenKind};
use ebnfc_util::render_tree;

/// One node of the syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    Identifier(Token),
    Symbol(Token),
    /// A numeric constant.
    Num(Token),
    /// A string constant.
    Str(Token),
    /// Any other constant (bool, null).
    Const(Token),
    /// Interior node; children in source order.
    Group(Vec<AstNode>),
}

impl AstNode {
    /// Classifies a token into the matching leaf variant.
    pub fn from_token(token: Token) -> Self {
        match token.kind {
            TokenKind::Symbol => AstNode::Symbol(token),
            TokenKind::Const => match token.value {
                Some(ConstValue::Str(_)) => AstNode::Str(token),
                Some(ConstValue::Bool(_)) | Some(ConstValue::Null) => AstNode::Const(token),
                _ => AstNode::Num(token),
            },
            _ => AstNode::Identifier(token),
        }
    }

    pub fn group(children: Vec<AstNode>) -> Self {
        AstNode::Group(children)
    }

    /// The originating token, for leaves.
    pub fn token(&self) -> Option<&Token> {
        match self {
            AstNode::Identifier(t)
            | AstNode::Symbol(t)
            | AstNode::Num(t)
            | AstNode::Str(t)
            | AstNode::Const(t) => Some(t),
            AstNode::Group(_) => None,
        }
    }

    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Group(children) => children,
            _ => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, AstNode::Group(_))
    }

    /// Display label: the token text for leaves, `(Group)` for interiors.
    pub fn label(&self) -> String {
        match self.token() {
            Some(t) => t.text(),
            None => "(Group)".to_string(),
        }
    }

    /// Leaf tokens in source order.
    pub fn leaves(&self) -> Vec<&Token> {
        match self {
            AstNode::Group(children) => children.iter().flat_map(|c| c.leaves()).collect(),
            _ => self.token().into_iter().collect(),
        }
    }

    /// Renders the tree as an indented dump, one node per line.
    pub fn render(&self) -> String {
        render_tree(self, |n| n.children().iter().collect(), |n| n.label())
    }
}
