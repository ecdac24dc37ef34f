//! Property tests for the scanner laws.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Scanner, Token};

    fn scan_all(src: &str) -> Vec<Token> {
        let mut scanner = Scanner::new("prop", src.as_bytes());
        let mut out = Vec::new();
        loop {
            let t = scanner.get_token(false);
            if t.is_eof() {
                return out;
            }
            out.push(t);
        }
    }

    /// A source made of simple tokens joined by single spaces.
    fn token_soup() -> impl Strategy<Value = Vec<String>> {
        let word = prop_oneof![
            "[a-z_][a-z0-9_]{0,8}".prop_map(|s| s),
            "[0-9]{1,6}".prop_map(|s| s),
            prop_oneof![
                Just("(".to_string()),
                Just(")".to_string()),
                Just(";".to_string()),
                Just("=".to_string()),
                Just("|".to_string()),
            ],
        ];
        prop::collection::vec(word, 0..12)
    }

    proptest! {
        /// Round-trip: after unget, the same token comes back.
        #[test]
        fn prop_unget_round_trip(words in token_soup()) {
            let src = words.join(" ");
            let mut scanner = Scanner::new("prop", src.as_bytes());
            loop {
                let t = scanner.get_token(false);
                scanner.unget_token(&t);
                let again = scanner.get_token(false);
                prop_assert_eq!(&t, &again);
                if t.is_eof() {
                    break;
                }
            }
        }

        /// Whitespace between tokens does not change the stream.
        #[test]
        fn prop_whitespace_invariance(
            words in token_soup(),
            pad in prop::collection::vec(prop_oneof![
                Just(" "), Just("  "), Just("\t"), Just("\n"), Just(" \t "),
            ], 0..16),
        ) {
            let tight = words.join(" ");
            let mut loose = String::new();
            for (i, w) in words.iter().enumerate() {
                loose.push_str(pad.get(i).copied().unwrap_or("   "));
                loose.push_str(w);
                loose.push(' ');
            }
            prop_assert_eq!(scan_all(&tight), scan_all(&loose));
        }

        /// Comments outside literals are invisible to the token stream.
        #[test]
        fn prop_comment_transparency(words in token_soup()) {
            let plain = words.join(" ");
            let commented = words
                .iter()
                .map(|w| format!("/* c */ {w}"))
                .collect::<Vec<_>>()
                .join(" // tail\n");
            prop_assert_eq!(scan_all(&plain), scan_all(&commented));
        }

        /// After a full scan the line counter is 1 + newline count.
        #[test]
        fn prop_line_count(words in token_soup(), breaks in 0usize..4) {
            let mut src = words.join(" ");
            for _ in 0..breaks {
                src.push_str("\nmore");
            }
            let mut scanner = Scanner::new("prop", src.as_bytes());
            while !scanner.get_token(false).is_eof() {}
            let newlines = src.bytes().filter(|&b| b == b'\n').count() as u32;
            prop_assert_eq!(scanner.line(), 1 + newlines);
        }
    }
}
