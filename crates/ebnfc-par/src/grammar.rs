//! The grammar compiler: EBNF text in, rule table out.
//!
//! A grammar document is itself scanned with the default dialect and
//! compiled in a single pass. Three states drive the compile, one rule
//! per logical line:
//!
//! - **Global** - expect the `<` that opens a rule name.
//! - **Left** - read the name up to `>`, register (or reuse an empty
//!   placeholder for) the rule, push it on the construction stack.
//! - **Right** - require `::=`, compile the body until end of line, pop.
//!
//! Inside a body, `|` upgrades the sequence built so far into an
//! alternative; `<name>` becomes a by-name reference (creating an empty
//! placeholder for names not seen yet); `[`, `{` and `(` open option,
//! repetition and grouping brackets that must close on the same line;
//! string constants become literals; and a `*` or `+` on the same line
//! wraps the element just produced.
//!
//! The first scanner or shape error aborts the compile. No rule is left
//! behind with partial content that a later definition could not
//! legitimately extend.

use std::cell::Cell;

use ebnfc_lex::{ConstValue, Scanner, Token};
use ebnfc_util::GrammarError;

use crate::node::{NodeId, NodeKind};
use crate::rules::RuleTable;

/// Compiles grammar documents.
///
/// # Examples
///
/// ```
/// use ebnfc_par::Grammar;
///
/// let table = Grammar::parse("demo.bnf", b"<item> ::= \"a\" | \"b\"").unwrap();
/// assert_eq!(table.to_string(), "<item>\t\t::= \"a\" | \"b\"");
/// ```
pub struct Grammar;

impl Grammar {
    /// Compiles `input` into a rule table, failing with the first
    /// scanner or grammar error.
    pub fn parse(file: &str, input: &[u8]) -> Result<RuleTable, GrammarError> {
        Compiler::new(file, input).run()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Global,
    Left,
    Right,
}

struct Compiler<'a> {
    scanner: Scanner<'a>,
    table: RuleTable,
    state: State,
    stack: Vec<NodeId>,
}

impl<'a> Compiler<'a> {
    fn new(file: &str, input: &'a [u8]) -> Self {
        Self {
            scanner: Scanner::new(file, input),
            table: RuleTable::new(),
            state: State::Global,
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<RuleTable, GrammarError> {
        loop {
            if let Some(message) = self.scanner.get_error() {
                return Err(GrammarError::Compile(message));
            }
            let token = self.scanner.get_token(false);
            if token.is_eof() {
                break;
            }
            let ok = match self.state {
                State::Global => self.parse_global(&token),
                State::Left => self.parse_left(&token),
                State::Right => self.parse_right(&token),
            };
            if !ok {
                let message = self
                    .scanner
                    .get_error()
                    .unwrap_or_else(|| "grammar compile failed".to_string());
                return Err(GrammarError::Compile(message));
            }
        }
        if let Some(message) = self.scanner.get_error() {
            return Err(GrammarError::Compile(message));
        }
        if self.table.is_empty() {
            return Err(GrammarError::Empty(self.scanner.file().to_string()));
        }
        Ok(self.table)
    }

    fn parse_global(&mut self, token: &Token) -> bool {
        if !token.matches_symbol('<') {
            self.scanner.set_error(format!(
                "BNF line should start with '<' : {}",
                self.scanner.file_location()
            ));
            return false;
        }
        self.scanner.unget_token(token);
        self.state = State::Left;
        true
    }

    fn parse_left(&mut self, token: &Token) -> bool {
        if !token.matches_symbol('<') {
            self.scanner.set_error(format!(
                "BNF line should start with '<' : {}",
                self.scanner.file_location()
            ));
            return false;
        }
        let Some(name) = self.read_rule_name(None) else {
            return false;
        };

        match self.table.add_rule(&name) {
            Some(id) => {
                self.stack.push(id);
                self.state = State::Right;
                true
            }
            None => {
                self.scanner.set_error(format!(
                    "BNF rule name {} repeated : {}",
                    name,
                    self.scanner.file_location()
                ));
                false
            }
        }
    }

    fn parse_right(&mut self, token: &Token) -> bool {
        let line = token.line;
        if !(token.matches("::") && self.scanner.match_symbol_char('=')) {
            self.scanner.set_error(format!(
                "BNF rule must split by '::=' operator : {}",
                self.scanner.file_location()
            ));
            return false;
        }

        let Some(&root) = self.stack.last() else {
            self.scanner.set_error(format!(
                "BNF rule body without a rule : {}",
                self.scanner.file_location()
            ));
            return false;
        };

        if self.scanner.is_end_of_line(line) {
            self.scanner.set_error(format!(
                "Unexpected end of line : {}",
                self.scanner.file_location()
            ));
            return false;
        }
        let first = self.scanner.get_token(false);
        if !self.parse_group_into(root, first, line, None) {
            return false;
        }

        self.stack.pop();
        self.state = State::Global;
        true
    }

    /// Reads the `name` of `<name>` after the `<` has been consumed,
    /// concatenating token text up to the closing `>`. With a line
    /// bound, crossing it is an error.
    fn read_rule_name(&mut self, line: Option<u32>) -> Option<String> {
        let mut name = String::new();
        loop {
            let t = self.scanner.get_token(false);
            if t.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input in rule name : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            if t.matches_symbol('>') {
                break;
            }
            if let Some(line) = line {
                if t.line != line {
                    self.scanner.set_error(format!(
                        "Unexpected end of line : {}",
                        self.scanner.file_location()
                    ));
                    return None;
                }
            }
            name.push_str(&t.text());
        }
        if name.is_empty() {
            self.scanner.set_error(format!(
                "BNF rule name cannot be empty : {}",
                self.scanner.file_location()
            ));
            return None;
        }
        Some(name)
    }

    /// Compiles a body into `target` (an empty sequence). With
    /// `close == None` the body runs to end of line; otherwise it runs to
    /// the closing bracket, which must sit on the same line.
    fn parse_group_into(
        &mut self,
        target: NodeId,
        first: Token,
        line: u32,
        close: Option<char>,
    ) -> bool {
        if !self.table.is_empty_rule(target) {
            self.scanner.set_error(format!(
                "Group node must be empty before parse : {}",
                self.scanner.file_location()
            ));
            return false;
        }

        let mut alt: Option<NodeId> = None;
        let mut current = target;
        let mut token = first;
        loop {
            // A failed element already pushed the precise diagnostic.
            let Some(element) = self.parse_element(&token, line) else {
                return false;
            };
            self.table.push_child(current, element);

            match close {
                Some(close_char) => {
                    if self.scanner.match_symbol_char(close_char) {
                        break;
                    }
                    if self.scanner.is_end_of_line(line) {
                        self.scanner.set_error(format!(
                            "Unexpected end of line in group : {}",
                            self.scanner.file_location()
                        ));
                        return false;
                    }
                }
                None => {
                    if self.scanner.is_end_of_line(line) {
                        break;
                    }
                }
            }

            if self.scanner.match_symbol_char('|') {
                current = self.begin_alternative(target, &mut alt);
                if self.scanner.is_end_of_line(line) {
                    self.scanner.set_error(format!(
                        "Unexpected end of line after '|' : {}",
                        self.scanner.file_location()
                    ));
                    return false;
                }
            }

            token = self.scanner.get_token(false);
            if token.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input in rule body : {}",
                    self.scanner.file_location()
                ));
                return false;
            }
        }
        true
    }

    /// Handles a `|`: on first sight the children built so far move into
    /// a fresh sequence that becomes the first alternative; afterwards
    /// each `|` opens a new alternative. Returns the sequence new
    /// elements should go into.
    fn begin_alternative(&mut self, target: NodeId, alt: &mut Option<NodeId>) -> NodeId {
        let alt_id = match *alt {
            Some(alt_id) => alt_id,
            None => {
                let prior = self.table.take_children(target);
                let first_alt = self.table.alloc(NodeKind::Seq(prior));
                let alt_id = self.table.alloc(NodeKind::Alt(vec![first_alt]));
                self.table.push_child(target, alt_id);
                *alt = Some(alt_id);
                alt_id
            }
        };
        let next = self.table.alloc(NodeKind::Seq(Vec::new()));
        self.table.push_child(alt_id, next);
        next
    }

    /// Compiles one body element, dispatching on its first token, then
    /// applies a trailing `*` or `+` found on the same line.
    fn parse_element(&mut self, token: &Token, line: u32) -> Option<NodeId> {
        let element = if token.matches_symbol('<') {
            let name = self.read_rule_name(Some(line))?;
            // A reference to a name not seen yet registers an empty
            // placeholder for a later definition to fill.
            if self.table.get(&name).is_none() {
                self.table.add_rule(&name);
            }
            self.table.alloc(NodeKind::Ref {
                target: name,
                resolved: Cell::new(None),
            })
        } else if token.matches_symbol('[') {
            let inner = self.parse_bracket_group(line, ']')?;
            self.table.alloc(NodeKind::Opt(inner))
        } else if token.matches_symbol('{') {
            let inner = self.parse_bracket_group(line, '}')?;
            self.table.alloc(NodeKind::Star(inner))
        } else if token.matches_symbol('(') {
            let group = self.table.alloc(NodeKind::Seq(Vec::new()));
            let first = self.scanner.get_token(false);
            if first.is_eof() || first.line != line {
                self.scanner.set_error(format!(
                    "Unexpected end of line in group : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            if !self.parse_group_into(group, first, line, Some(')')) {
                return None;
            }
            group
        } else if let Some(ConstValue::Str(text)) = &token.value {
            self.table.alloc(NodeKind::Literal(text.clone()))
        } else {
            self.scanner.set_error(format!(
                "Invalid rule element {} : {}",
                token.text(),
                self.scanner.file_location()
            ));
            return None;
        };

        // Trailing * or +, only when still on the source line.
        let after = self.scanner.get_token(true);
        if !after.is_eof() && after.line == line {
            if after.matches_symbol('*') {
                return Some(self.table.alloc(NodeKind::Star(element)));
            }
            if after.matches_symbol('+') {
                return Some(self.table.alloc(NodeKind::Plus(element)));
            }
        }
        self.scanner.unget_token(&after);
        Some(element)
    }

    /// Compiles the inside of `[ ... ]` or `{ ... }`: a plain element
    /// sequence, closed on the same line.
    fn parse_bracket_group(&mut self, line: u32, close: char) -> Option<NodeId> {
        let group = self.table.alloc(NodeKind::Seq(Vec::new()));
        loop {
            if self.scanner.match_symbol_char(close) {
                break;
            }
            if self.scanner.is_end_of_line(line) {
                self.scanner.set_error(format!(
                    "Unexpected end of line in group : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            let token = self.scanner.get_token(false);
            let element = self.parse_element(&token, line)?;
            self.table.push_child(group, element);
        }
        Some(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(src: &str) -> RuleTable {
        Grammar::parse("test.bnf", src.as_bytes()).unwrap()
    }

    fn compile_err(src: &str) -> String {
        match Grammar::parse("test.bnf", src.as_bytes()) {
            Err(e) => e.to_string(),
            Ok(table) => panic!("expected failure, compiled:\n{table}"),
        }
    }

    #[test]
    fn test_single_literal_rule() {
        let table = compile("<s> ::= \"x\"");
        assert_eq!(table.to_string(), "<s>\t\t::= \"x\"");
    }

    #[test]
    fn test_sequence_rule() {
        let table = compile("<expr> ::= <var> \">\" <num>");
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.to_string(),
            "<expr>\t\t::= ( <var> \">\" <num> )\n<var>\t\t::= \n<num>\t\t::= "
        );
    }

    #[test]
    fn test_alternatives() {
        let table = compile("<item> ::= \"a\" | \"b\" | \"c\"");
        assert_eq!(table.to_string(), "<item>\t\t::= \"a\" | \"b\" | \"c\"");
    }

    #[test]
    fn test_alternative_of_sequences() {
        let table = compile("<r> ::= \"a\" \"b\" | \"c\"");
        assert_eq!(table.to_string(), "<r>\t\t::= ( \"a\" \"b\" ) | \"c\"");
    }

    #[test]
    fn test_option_and_star_brackets() {
        let table = compile("<r> ::= [ \"-\" ] { \"d\" }");
        assert_eq!(table.to_string(), "<r>\t\t::= ( [ \"-\" ] { \"d\" } )");
    }

    #[test]
    fn test_postfix_star_and_plus() {
        let table = compile("<r> ::= \"x\"+ \"y\"*");
        assert_eq!(table.to_string(), "<r>\t\t::= ( \"x\"+ { \"y\" } )");
    }

    #[test]
    fn test_nested_group_with_postfix() {
        let table = compile("<r> ::= ( \"a\" \"b\" )+");
        assert_eq!(table.to_string(), "<r>\t\t::= ( \"a\" \"b\" )+");
    }

    #[test]
    fn test_multiline_rules_and_forward_refs() {
        let table = compile("<a> ::= <b> \"x\"\n<b> ::= \"y\"");
        assert_eq!(
            table.to_string(),
            "<a>\t\t::= ( <b> \"x\" )\n<b>\t\t::= \"y\""
        );
    }

    #[test]
    fn test_comments_in_grammar() {
        let table = compile("// leading note\n<a> ::= \"x\" // trailing\n/* block */ <b> ::= \"y\"");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_rule_names_with_dashes() {
        let table = compile("<name-part> ::= \"n\"");
        assert!(table.get("name-part").is_some());
    }

    #[test]
    fn test_duplicate_rule_is_error() {
        let err = compile_err("<a> ::= \"x\"\n<a> ::= \"y\"");
        assert!(err.contains("repeated"));
    }

    #[test]
    fn test_forward_ref_then_definition_is_not_duplicate() {
        let table = compile("<a> ::= <b>\n<b> ::= \"y\"");
        assert!(!table.is_empty_rule(table.get("b").unwrap()));
    }

    #[test]
    fn test_missing_angle_is_error() {
        let err = compile_err("a ::= \"x\"");
        assert!(err.contains("should start with '<'"));
    }

    #[test]
    fn test_missing_defines_operator_is_error() {
        let err = compile_err("<a> = \"x\"");
        assert!(err.contains("'::='"));
    }

    #[test]
    fn test_empty_rule_name_is_error() {
        let err = compile_err("<> ::= \"x\"");
        assert!(err.contains("cannot be empty"));
    }

    #[test]
    fn test_empty_body_is_error() {
        let err = compile_err("<a> ::=\n<b> ::= \"x\"");
        assert!(err.contains("end of line"));
    }

    #[test]
    fn test_invalid_element_is_error() {
        let err = compile_err("<a> ::= 42");
        assert!(err.contains("Invalid rule element"));
    }

    #[test]
    fn test_unclosed_bracket_is_error() {
        let err = compile_err("<a> ::= [ \"x\"\n<b> ::= \"y\"");
        assert!(err.contains("end of line"));
    }

    #[test]
    fn test_error_mentions_file_and_position() {
        let err = compile_err("<a> ::= 42");
        assert!(err.contains("file: 'test.bnf' position : "));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let src = "<a> ::= ( \"x\" \"y\" ) | <b>\n<b> ::= { \"z\" }";
        let printed = compile(src).to_string();
        let reprinted = compile(&printed).to_string();
        assert_eq!(printed, reprinted);
    }
}
