//! The INI state machine.
//!
//! Parsing walks three scopes: the file (expecting section headers), a
//! section (expecting `key = value` and `+key = value` lines, or the
//! next header), and a section item (expecting one value, possibly a
//! nested map or list). Scalars run to the end of the line or to the
//! `)` `]` `,` that closes the surrounding structure.

use ebnfc_lex::{Dialect, Scanner, ScannerConfig, Token, TokenKind};
use ebnfc_util::IniError;

use crate::{IniFile, IniItem, IniSection, IniValue};

pub(crate) fn parse(file: &str, input: &[u8]) -> Result<IniFile, IniError> {
    let config = ScannerConfig::with_dialect(Dialect::ini());
    let scanner = Scanner::with_config(file, input, config);
    IniParser { scanner }.run()
}

struct IniParser<'a> {
    scanner: Scanner<'a>,
}

impl<'a> IniParser<'a> {
    fn run(mut self) -> Result<IniFile, IniError> {
        let mut file = IniFile::default();
        let mut current: Option<String> = None;

        loop {
            if let Some(message) = self.scanner.get_error() {
                return Err(IniError::Parse(message));
            }
            let token = self.scanner.get_token(false);
            if token.is_eof() {
                break;
            }

            let ok = if token.matches_symbol('[') && current.is_some() {
                // A new header closes the current section scope.
                self.begin_section(&mut file, &mut current)
            } else if let Some(section) = &current {
                self.section_item(&mut file, section.clone(), &token)
            } else if token.matches_symbol('[') {
                self.begin_section(&mut file, &mut current)
            } else {
                self.scanner.set_error(format!(
                    "Item outside of any section : {}",
                    self.scanner.file_location()
                ));
                false
            };

            if !ok {
                let message = self
                    .scanner
                    .get_error()
                    .unwrap_or_else(|| "ini parse failed".to_string());
                return Err(IniError::Parse(message));
            }
        }
        if let Some(message) = self.scanner.get_error() {
            return Err(IniError::Parse(message));
        }
        Ok(file)
    }

    /// Reads a `[Name]` header; the `[` is already consumed.
    fn begin_section(&mut self, file: &mut IniFile, current: &mut Option<String>) -> bool {
        let mut name = String::new();
        loop {
            let token = self.scanner.get_token(true);
            if token.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input in section header : {}",
                    self.scanner.file_location()
                ));
                return false;
            }
            if token.matches_symbol(']') {
                break;
            }
            name.push_str(&token.text());
        }
        if name.is_empty() {
            self.scanner.set_error(format!(
                "Ini section name is empty : {}",
                self.scanner.file_location()
            ));
            return false;
        }
        if !file.add_section(IniSection::new(&name)) {
            self.scanner.set_error(format!(
                "Ini section {} already added : {}",
                name,
                self.scanner.file_location()
            ));
            return false;
        }
        *current = Some(name);
        true
    }

    /// Compiles one `key = value` or `+key = value` line of `section`.
    fn section_item(&mut self, file: &mut IniFile, section: String, token: &Token) -> bool {
        let is_list = token.matches_symbol('+');
        let first = if is_list {
            let t = self.scanner.get_token(true);
            if t.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input : {}",
                    self.scanner.file_location()
                ));
                return false;
            }
            t
        } else {
            token.clone()
        };

        let Some(key) = self.read_key(first, '=') else {
            return false;
        };

        let value_token = self.scanner.get_token(false);
        if value_token.is_eof() {
            self.scanner.set_error(format!(
                "Unexpected end of input : {}",
                self.scanner.file_location()
            ));
            return false;
        }
        // A failed value already pushed the precise diagnostic.
        let Some(value) = self.parse_value(&value_token) else {
            return false;
        };

        let Some(section) = file.section_mut(&section) else {
            self.scanner.set_error(format!(
                "Unknown section {} : {}",
                section,
                self.scanner.file_location()
            ));
            return false;
        };
        let items = section.items_mut();
        if is_list {
            match items.entry(key.clone()).or_insert_with(|| IniItem::List(Vec::new())) {
                IniItem::List(values) => {
                    values.push(value);
                    true
                }
                IniItem::Single(_) => {
                    self.scanner.set_error(format!(
                        "Section item {} already added as a single value : {}",
                        key,
                        self.scanner.file_location()
                    ));
                    false
                }
            }
        } else {
            if items.contains_key(&key) {
                self.scanner.set_error(format!(
                    "Section item {} already added : {}",
                    key,
                    self.scanner.file_location()
                ));
                return false;
            }
            items.insert(key, IniItem::Single(value));
            true
        }
    }

    /// Concatenates key tokens up to the `stop` symbol, which is
    /// consumed. Constants are not valid key material.
    fn read_key(&mut self, first: Token, stop: char) -> Option<String> {
        let mut key = String::new();
        let mut token = first;
        while !token.matches_symbol(stop) {
            if token.kind == TokenKind::Const {
                self.scanner.set_error(format!(
                    "Item name cannot be a constant : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            key.push_str(&token.text());
            token = self.scanner.get_token(true);
            if token.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
        }
        if key.is_empty() {
            self.scanner.set_error(format!(
                "Item name is empty : {}",
                self.scanner.file_location()
            ));
            return None;
        }
        Some(key)
    }

    /// Parses one value starting at `token`: a `( ... )` map, a
    /// `[ ... ]` list, or a scalar.
    fn parse_value(&mut self, token: &Token) -> Option<IniValue> {
        if token.matches_symbol('(') {
            return self.parse_map();
        }
        if token.matches_symbol('[') {
            return self.parse_list();
        }
        self.parse_scalar(token)
    }

    fn parse_map(&mut self) -> Option<IniValue> {
        let mut map = crate::FxIndexMap::default();
        loop {
            let token = self.scanner.get_token(false);
            if token.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input in map value : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            if token.matches_symbol(')') {
                break;
            }
            if token.matches_symbol(',') {
                continue;
            }

            let key = self.read_key(token, '=')?;
            let value_token = self.scanner.get_token(false);
            if value_token.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input in map value : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            let value = self.parse_value(&value_token)?;
            if map.contains_key(&key) {
                self.scanner.set_error(format!(
                    "Repeated key {} in map value : {}",
                    key,
                    self.scanner.file_location()
                ));
                return None;
            }
            map.insert(key, value);
        }
        Some(IniValue::Map(map))
    }

    fn parse_list(&mut self) -> Option<IniValue> {
        let mut values = Vec::new();
        loop {
            let token = self.scanner.get_token(false);
            if token.is_eof() {
                self.scanner.set_error(format!(
                    "Unexpected end of input in list value : {}",
                    self.scanner.file_location()
                ));
                return None;
            }
            if token.matches_symbol(']') {
                break;
            }
            if token.matches_symbol(',') {
                continue;
            }
            values.push(self.parse_value(&token)?);
        }
        Some(IniValue::List(values))
    }

    /// A scalar: one constant, or a run of identifier tokens on one
    /// line. The `)` `]` `,` closers of a surrounding structure end the
    /// scalar and stay in the stream.
    fn parse_scalar(&mut self, token: &Token) -> Option<IniValue> {
        match token.kind {
            TokenKind::Const => {
                let text = match &token.value {
                    Some(ebnfc_lex::ConstValue::Str(s)) => s.clone(),
                    _ => token.text(),
                };
                Some(IniValue::Scalar(text))
            }
            TokenKind::Identifier | TokenKind::Symbol => {
                let line = token.line;
                let mut content = token.text();
                loop {
                    let next = self.scanner.get_token(true);
                    if next.is_eof() {
                        break;
                    }
                    if next.line != line
                        || next.matches_symbol(')')
                        || next.matches_symbol(']')
                        || next.matches_symbol(',')
                    {
                        self.scanner.unget_token(&next);
                        break;
                    }
                    if next.kind != TokenKind::Identifier {
                        self.scanner.set_error(format!(
                            "Invalid token in scalar value : {}",
                            self.scanner.file_location()
                        ));
                        return None;
                    }
                    content.push_str(&next.lexeme);
                }
                Some(IniValue::Scalar(content))
            }
            TokenKind::Eof => {
                self.scanner.set_error(format!(
                    "Unexpected end of input in value : {}",
                    self.scanner.file_location()
                ));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(src: &str) -> IniFile {
        IniFile::parse("test.ini", src.as_bytes()).unwrap()
    }

    fn parse_err(src: &str) -> String {
        IniFile::parse("test.ini", src.as_bytes()).unwrap_err().to_string()
    }

    #[test]
    fn test_scalar_item() {
        let ini = parse_ok("[S]\nk = 1\n");
        assert_eq!(ini.section("S").unwrap().item("k").unwrap().scalar(), Some("1"));
    }

    #[test]
    fn test_full_document() {
        let ini = parse_ok("[S]\nk = 1\n+l = a\n+l = b\nm = (x=1, y=[2,3])\n");
        assert_eq!(ini.len(), 1);
        let s = ini.section("S").unwrap();
        assert_eq!(s.len(), 3);

        assert_eq!(s.item("k").unwrap().scalar(), Some("1"));

        let l = s.item("l").unwrap().list().unwrap();
        assert_eq!(
            l,
            &[IniValue::Scalar("a".into()), IniValue::Scalar("b".into())]
        );

        let m = s.item("m").unwrap().single().unwrap().as_map().unwrap();
        assert_eq!(m.get("x").unwrap().as_scalar(), Some("1"));
        let y = m.get("y").unwrap().as_list().unwrap();
        assert_eq!(
            y,
            &[IniValue::Scalar("2".into()), IniValue::Scalar("3".into())]
        );
    }

    #[test]
    fn test_multiple_sections() {
        let ini = parse_ok("[A]\nx = 1\n[B]\nx = 2\n");
        assert_eq!(ini.len(), 2);
        assert_eq!(ini.section("A").unwrap().item("x").unwrap().scalar(), Some("1"));
        assert_eq!(ini.section("B").unwrap().item("x").unwrap().scalar(), Some("2"));
    }

    #[test]
    fn test_comments() {
        let ini = parse_ok("; file note\n[S] ; section note\nk = v # trailing\n# full line\n");
        assert_eq!(ini.section("S").unwrap().item("k").unwrap().scalar(), Some("v"));
    }

    #[test]
    fn test_slash_star_is_not_a_comment() {
        // The INI dialect has no block comments; `/` is key material.
        let ini = parse_ok("[S]\nk = a\n");
        assert!(ini.section("S").is_some());
        let ini = IniFile::parse("test.ini", b"[S]\nx/y = v\n").unwrap();
        assert_eq!(ini.section("S").unwrap().item("x/y").unwrap().scalar(), Some("v"));
    }

    #[test]
    fn test_multi_token_scalar_concatenates() {
        let ini = parse_ok("[S]\nk = a b c\n");
        assert_eq!(ini.section("S").unwrap().item("k").unwrap().scalar(), Some("abc"));
    }

    #[test]
    fn test_string_value() {
        let ini = parse_ok("[S]\nk = \"hello world\"\n");
        assert_eq!(
            ini.section("S").unwrap().item("k").unwrap().scalar(),
            Some("hello world")
        );
    }

    #[test]
    fn test_nested_map_in_list() {
        let ini = parse_ok("[S]\nk = [(a=1), (a=2)]\n");
        let list = ini.section("S").unwrap().item("k").unwrap().single().unwrap();
        let list = list.as_list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].as_map().unwrap().get("a").unwrap().as_scalar(), Some("2"));
    }

    #[test]
    fn test_keys_with_dashes() {
        let ini = parse_ok("[S]\nretry-count = 3\n");
        assert_eq!(
            ini.section("S").unwrap().item("retry-count").unwrap().scalar(),
            Some("3")
        );
    }

    #[test]
    fn test_duplicate_section_is_error() {
        let err = parse_err("[S]\n[S]\n");
        assert!(err.contains("already added"));
    }

    #[test]
    fn test_duplicate_scalar_key_is_error() {
        let err = parse_err("[S]\nk = 1\nk = 2\n");
        assert!(err.contains("already added"));
    }

    #[test]
    fn test_plus_on_single_item_is_error() {
        let err = parse_err("[S]\nk = 1\n+k = 2\n");
        assert!(err.contains("single value"));
    }

    #[test]
    fn test_item_outside_section_is_error() {
        let err = parse_err("k = 1\n");
        assert!(err.contains("outside of any section"));
    }

    #[test]
    fn test_const_key_is_error() {
        let err = parse_err("[S]\n42 = x\n");
        assert!(err.contains("cannot be a constant"));
    }

    #[test]
    fn test_unterminated_map_is_error() {
        let err = parse_err("[S]\nk = (a=1\n");
        assert!(err.contains("end of input"));
    }

    #[test]
    fn test_empty_document() {
        let ini = parse_ok("");
        assert!(ini.is_empty());
    }

    #[test]
    fn test_error_location_format() {
        let err = parse_err("[S]\n42 = x\n");
        assert!(err.contains("file: 'test.ini' position : "));
    }
}
