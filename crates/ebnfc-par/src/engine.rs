//! The combinator engine.
//!
//! Every variant shares one parse contract. A node is handed the scanner
//! and the already-consumed first token of the attempt:
//!
//! - on success it returns the emitted node, with the scanner sitting
//!   after the last token it consumed; a zero-width success (an option or
//!   repetition that matched nothing) leaves the scanner restored to
//!   before the given token;
//! - on failure it returns `None` and restores the scanner to exactly
//!   before the given token.
//!
//! That restoration guarantee is what makes unbounded backtracking across
//! alternatives work: an alternative that fails leaves no trace. Failures
//! are ordinary control flow, not errors; the only diagnostics pushed
//! here are an unresolvable rule reference and whatever a custom rule
//! reports.
//!
//! The [`ParseContext`] records the furthest literal expectation that
//! went unmet, which becomes the reported message when the root as a
//! whole rejects the input.

use ebnfc_lex::{Scanner, Token};

use crate::ast::AstNode;
use crate::node::{NodeId, NodeKind};
use crate::rules::RuleTable;

/// Per-parse bookkeeping shared by every node of one attempt.
#[derive(Debug, Default)]
pub struct ParseContext {
    furthest_offset: usize,
    furthest_message: Option<String>,
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The failure message of the deepest miss, e.g. `Missing '>'`.
    pub fn failure(&self) -> Option<&str> {
        self.furthest_message.as_deref()
    }

    /// Byte offset of the deepest miss.
    pub fn failure_offset(&self) -> Option<usize> {
        self.furthest_message.as_ref().map(|_| self.furthest_offset)
    }

    fn record_miss(&mut self, offset: usize, expected: &str) {
        if self.furthest_message.is_none() || offset >= self.furthest_offset {
            self.furthest_offset = offset;
            self.furthest_message = Some(format!("Missing '{expected}'"));
        }
    }
}

impl RuleTable {
    /// Runs the combinator `id` against `token`, per the parse contract.
    pub fn parse_at(
        &self,
        id: NodeId,
        ctx: &mut ParseContext,
        scanner: &mut Scanner<'_>,
        token: &Token,
    ) -> Option<AstNode> {
        match &self.node(id).kind {
            NodeKind::Literal(text) => {
                if token.matches(text) {
                    Some(AstNode::Identifier(token.clone()))
                } else {
                    ctx.record_miss(token.start, text);
                    scanner.unget_token(token);
                    None
                }
            }

            NodeKind::Seq(children) => match children.as_slice() {
                [] => {
                    scanner.unget_token(token);
                    Some(AstNode::group(Vec::new()))
                }
                // A one-element sequence is transparent, the same
                // collapse the printer applies.
                [only] => self.parse_at(*only, ctx, scanner, token),
                children => {
                    let mut emitted = Vec::with_capacity(children.len());
                    let mut current = token.clone();
                    for (i, &child) in children.iter().enumerate() {
                        if i > 0 {
                            current = scanner.get_token(false);
                        }
                        match self.parse_at(child, ctx, scanner, &current) {
                            Some(node) => emitted.push(node),
                            None => {
                                // The failing child restored itself;
                                // rewind the whole attempt to before the
                                // first token.
                                scanner.unget_token(token);
                                return None;
                            }
                        }
                    }
                    Some(AstNode::group(emitted))
                }
            },

            NodeKind::Alt(children) => {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        // The failed sibling restored the stream; step
                        // past the token again and verify it is the one
                        // this attempt was given.
                        let again = scanner.get_token(false);
                        debug_assert_eq!(&again, token);
                    }
                    if let Some(node) = self.parse_at(child, ctx, scanner, token) {
                        return Some(node);
                    }
                }
                scanner.unget_token(token);
                None
            }

            NodeKind::Opt(child) => match self.parse_at(*child, ctx, scanner, token) {
                Some(node) => Some(node),
                // The child restored the scanner; report an empty match.
                None => Some(AstNode::group(Vec::new())),
            },

            NodeKind::Star(child) => {
                let child = *child;
                let mut emitted = Vec::new();
                let mut current = token.clone();
                loop {
                    match self.parse_at(child, ctx, scanner, &current) {
                        Some(node) => {
                            if scanner.offset() <= current.start {
                                // Zero-width match; stop so greed cannot
                                // loop forever.
                                break;
                            }
                            emitted.push(node);
                        }
                        None => break,
                    }
                    current = scanner.get_token(false);
                }
                Some(AstNode::group(emitted))
            }

            NodeKind::Plus(child) => {
                let child = *child;
                let first = self.parse_at(child, ctx, scanner, token)?;
                let mut emitted = vec![first];
                if scanner.offset() > token.start {
                    loop {
                        let current = scanner.get_token(false);
                        match self.parse_at(child, ctx, scanner, &current) {
                            Some(node) => {
                                if scanner.offset() <= current.start {
                                    break;
                                }
                                emitted.push(node);
                            }
                            None => break,
                        }
                    }
                }
                Some(AstNode::group(emitted))
            }

            NodeKind::Ref { target, resolved } => {
                let body = match resolved.get() {
                    Some(body) => body,
                    None => match self.get(target).filter(|&id| !self.is_empty_rule(id)) {
                        Some(body) => {
                            resolved.set(Some(body));
                            body
                        }
                        None => {
                            scanner.set_error(format!(
                                "Rule <{}> is referenced but never defined : at {}",
                                target,
                                scanner.location()
                            ));
                            scanner.unget_token(token);
                            return None;
                        }
                    },
                };
                self.parse_at(body, ctx, scanner, token)
            }

            NodeKind::Custom(rule) => match rule.parse(scanner, token) {
                Some(node) => Some(node),
                None => {
                    ctx.record_miss(token.start, rule.name());
                    scanner.unget_token(token);
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::custom_rule;
    use ebnfc_lex::TokenKind;
    use std::cell::Cell;

    fn literal(table: &mut RuleTable, text: &str) -> NodeId {
        table.alloc(NodeKind::Literal(text.into()))
    }

    /// Runs `id` the way the driver would: fetch the first token, parse.
    fn run(table: &RuleTable, id: NodeId, src: &str) -> (Option<AstNode>, usize) {
        let mut scanner = Scanner::new("test", src.as_bytes());
        let token = scanner.get_token(false);
        let mut ctx = ParseContext::new();
        let result = table.parse_at(id, &mut ctx, &mut scanner, &token);
        (result, scanner.offset())
    }

    #[test]
    fn test_literal_match_and_miss() {
        let mut table = RuleTable::new();
        let lit = literal(&mut table, "a");
        let (hit, _) = run(&table, lit, "a");
        assert!(matches!(hit.unwrap(), AstNode::Identifier(t) if t.lexeme == "a"));
        let (miss, offset) = run(&table, lit, "b");
        assert!(miss.is_none());
        // Restored to before the rejected token.
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_seq_backtracks_to_first_token() {
        let mut table = RuleTable::new();
        let a = literal(&mut table, "a");
        let b = literal(&mut table, "b");
        let seq = table.alloc(NodeKind::Seq(vec![a, b]));

        let (hit, _) = run(&table, seq, "a b");
        assert_eq!(hit.unwrap().children().len(), 2);

        // Fails on the second child; the scanner must be back before `a`.
        let (miss, offset) = run(&table, seq, "a c");
        assert!(miss.is_none());
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_alt_first_match_wins() {
        let mut table = RuleTable::new();
        let a1 = literal(&mut table, "a");
        let a2 = literal(&mut table, "a");
        let b = literal(&mut table, "b");
        let alt = table.alloc(NodeKind::Alt(vec![a1, b, a2]));

        let mut scanner = Scanner::new("test", b"a");
        let token = scanner.get_token(false);
        let mut ctx = ParseContext::new();
        let node = table.parse_at(alt, &mut ctx, &mut scanner, &token).unwrap();
        // Emitted by the first alternative, wrapping the same token.
        assert_eq!(node.token().unwrap(), &token);

        let (hit, _) = run(&table, alt, "b");
        assert!(hit.is_some());
        let (miss, offset) = run(&table, alt, "c");
        assert!(miss.is_none());
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_alt_of_seqs_backtracks() {
        // ( "x" "y" ) | ( "x" "z" ) on input `x z` must reach the second
        // alternative with the stream intact.
        let mut table = RuleTable::new();
        let x1 = literal(&mut table, "x");
        let y = literal(&mut table, "y");
        let x2 = literal(&mut table, "x");
        let z = literal(&mut table, "z");
        let s1 = table.alloc(NodeKind::Seq(vec![x1, y]));
        let s2 = table.alloc(NodeKind::Seq(vec![x2, z]));
        let alt = table.alloc(NodeKind::Alt(vec![s1, s2]));

        let (hit, _) = run(&table, alt, "x z");
        let leaves: Vec<_> = hit
            .unwrap()
            .leaves()
            .iter()
            .map(|t| t.lexeme.clone())
            .collect();
        assert_eq!(leaves, ["x", "z"]);
    }

    #[test]
    fn test_opt_never_fails() {
        let mut table = RuleTable::new();
        let a = literal(&mut table, "a");
        let opt = table.alloc(NodeKind::Opt(a));

        let (hit, _) = run(&table, opt, "a");
        assert!(matches!(hit.unwrap(), AstNode::Identifier(_)));

        let (empty, offset) = run(&table, opt, "b");
        assert_eq!(empty.unwrap(), AstNode::group(Vec::new()));
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_star_is_greedy() {
        let mut table = RuleTable::new();
        let a = literal(&mut table, "a");
        let star = table.alloc(NodeKind::Star(a));

        let (hit, _) = run(&table, star, "a a a b");
        assert_eq!(hit.unwrap().children().len(), 3);

        let (empty, offset) = run(&table, star, "b");
        assert_eq!(empty.unwrap().children().len(), 0);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_star_stops_after_unmatched_token() {
        let mut table = RuleTable::new();
        let a = literal(&mut table, "a");
        let star = table.alloc(NodeKind::Star(a));

        let mut scanner = Scanner::new("test", b"a a b");
        let token = scanner.get_token(false);
        let mut ctx = ParseContext::new();
        table.parse_at(star, &mut ctx, &mut scanner, &token).unwrap();
        // Positioned before `b`.
        assert_eq!(scanner.get_token(false).lexeme, "b");
    }

    #[test]
    fn test_plus_requires_one() {
        let mut table = RuleTable::new();
        let x = literal(&mut table, "x");
        let plus = table.alloc(NodeKind::Plus(x));

        let (hit, _) = run(&table, plus, "x x x x");
        assert_eq!(hit.unwrap().children().len(), 4);

        let (miss, offset) = run(&table, plus, "y");
        assert!(miss.is_none());
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_plus_equivalent_to_seq_of_first_and_star() {
        // The leaf sequence of `c+` equals that of `c {c}`.
        let mut table = RuleTable::new();
        let x1 = literal(&mut table, "x");
        let plus = table.alloc(NodeKind::Plus(x1));
        let x2 = literal(&mut table, "x");
        let x3 = literal(&mut table, "x");
        let star = table.alloc(NodeKind::Star(x3));
        let seq = table.alloc(NodeKind::Seq(vec![x2, star]));

        let (p, _) = run(&table, plus, "x x x");
        let (s, _) = run(&table, seq, "x x x");
        let plus_leaves: Vec<_> = p.unwrap().leaves().iter().map(|t| t.lexeme.clone()).collect();
        let seq_leaves: Vec<_> = s.unwrap().leaves().iter().map(|t| t.lexeme.clone()).collect();
        assert_eq!(plus_leaves, seq_leaves);
    }

    #[test]
    fn test_ref_resolution_and_cycle() {
        // <list> ::= "a" [<list>] , a right-recursive cycle through Ref.
        let mut table = RuleTable::new();
        let rule = table.add_rule("list").unwrap();
        let a = literal(&mut table, "a");
        let r = table.alloc(NodeKind::Ref {
            target: "list".into(),
            resolved: Cell::new(None),
        });
        let opt = table.alloc(NodeKind::Opt(r));
        table.push_child(rule, a);
        table.push_child(rule, opt);

        let (hit, _) = run(&table, rule, "a a a");
        let leaves: Vec<_> = hit
            .unwrap()
            .leaves()
            .iter()
            .map(|t| t.lexeme.clone())
            .collect();
        assert_eq!(leaves, ["a", "a", "a"]);
    }

    #[test]
    fn test_ref_to_missing_rule_is_fatal() {
        let mut table = RuleTable::new();
        let r = table.alloc(NodeKind::Ref {
            target: "ghost".into(),
            resolved: Cell::new(None),
        });

        let mut scanner = Scanner::new("test", b"a");
        let token = scanner.get_token(false);
        let mut ctx = ParseContext::new();
        assert!(table.parse_at(r, &mut ctx, &mut scanner, &token).is_none());
        assert!(scanner.get_error().unwrap().contains("<ghost>"));
    }

    #[test]
    fn test_ref_to_empty_placeholder_is_fatal() {
        let mut table = RuleTable::new();
        table.add_rule("pending").unwrap();
        let r = table.alloc(NodeKind::Ref {
            target: "pending".into(),
            resolved: Cell::new(None),
        });

        let mut scanner = Scanner::new("test", b"a");
        let token = scanner.get_token(false);
        let mut ctx = ParseContext::new();
        assert!(table.parse_at(r, &mut ctx, &mut scanner, &token).is_none());
        assert!(scanner.has_errors());
    }

    #[test]
    fn test_custom_rule_in_graph() {
        let mut table = RuleTable::new();
        let var = table.set_custom(
            "var",
            custom_rule("var", |t| {
                (t.kind == TokenKind::Identifier).then(|| AstNode::from_token(t.clone()))
            }),
        );
        let (hit, _) = run(&table, var, "alpha");
        assert!(matches!(hit.unwrap(), AstNode::Identifier(_)));
        let (miss, offset) = run(&table, var, "42");
        assert!(miss.is_none());
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_furthest_miss_reported() {
        // ( "x" ">" ) failing at `>` reports the deeper expectation.
        let mut table = RuleTable::new();
        let x = literal(&mut table, "x");
        let gt = literal(&mut table, ">");
        let seq = table.alloc(NodeKind::Seq(vec![x, gt]));

        let mut scanner = Scanner::new("test", b"x 100");
        let token = scanner.get_token(false);
        let mut ctx = ParseContext::new();
        assert!(table.parse_at(seq, &mut ctx, &mut scanner, &token).is_none());
        assert_eq!(ctx.failure(), Some("Missing '>'"));
    }
}
