//! Command-line tokenization.
//!
//! The tokenizer is deliberately dumb: it splits on unquoted whitespace,
//! strips double quotes, and spots the literal `--` marker. It never fails —
//! an unterminated quote simply consumes the remainder of the input. Real
//! alias/kind classification needs the symbol model and is deferred to the
//! matcher.
//!
//! ```text
//! one two "three four"  --  -x
//! └─┬┘└┬┘ └────┬─────┘  ┬   ┬
//! Unknown    Unknown    │   Argument (everything after the marker)
//!                EndOfArguments
//! ```

use crate::{Token, TokenKind};

/// Tokenize a raw command line.
///
/// Quoting rules: a double-quoted span becomes one token with the quotes
/// stripped; backslashes inside quotes are literal, so a trailing backslash
/// before the closing quote survives (Windows-style paths); an explicitly
/// quoted empty string is preserved as an empty token.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut saw_quotes = false;
    let mut after_marker = false;

    for c in input.chars() {
        if in_quotes {
            if c == '"' {
                in_quotes = false;
            } else {
                current.push(c);
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                saw_quotes = true;
            }
            c if c.is_whitespace() => {
                if !current.is_empty() || saw_quotes {
                    push_token(&mut tokens, std::mem::take(&mut current), saw_quotes, &mut after_marker);
                    saw_quotes = false;
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() || saw_quotes {
        push_token(&mut tokens, current, saw_quotes, &mut after_marker);
    }
    tokens
}

/// Tokenize a pre-split argument vector; each element is one token verbatim.
pub fn tokenize_vec<S: AsRef<str>>(args: &[S]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut after_marker = false;
    for arg in args {
        push_token(&mut tokens, arg.as_ref().to_string(), false, &mut after_marker);
    }
    tokens
}

fn push_token(tokens: &mut Vec<Token>, text: String, quoted: bool, after_marker: &mut bool) {
    let kind = if *after_marker {
        TokenKind::Argument
    } else if !quoted && text == "--" {
        *after_marker = true;
        TokenKind::EndOfArguments
    } else {
        TokenKind::Unknown
    };
    tokens.push(Token::new(text, kind));
}

#[cfg(test)]
mod tokenizer_tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn splits_on_runs_of_whitespace() {
        let tokens = tokenize("one two\tthree   four ");
        assert_eq!(texts(&tokens), vec!["one", "two", "three", "four"]);
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Unknown));
    }

    #[test]
    fn quoted_span_is_one_token_with_trailing_backslash_kept() {
        let tokens = tokenize(r#"rm -r "c:\temp files\""#);
        assert_eq!(texts(&tokens), vec!["rm", "-r", r"c:\temp files\"]);
    }

    #[test]
    fn quoted_empty_string_is_preserved() {
        let tokens = tokenize(r#"-o "" trailing"#);
        assert_eq!(texts(&tokens), vec!["-o", "", "trailing"]);
    }

    #[test]
    fn end_of_arguments_marks_the_rest_as_arguments() {
        let tokens = tokenize("-o -- -x --y");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Unknown,
                TokenKind::EndOfArguments,
                TokenKind::Argument,
                TokenKind::Argument,
            ]
        );
    }

    #[test]
    fn quoted_double_dash_is_literal() {
        let tokens = tokenize(r#""--" -x"#);
        assert_eq!(tokens[0].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
    }

    #[test]
    fn unterminated_quote_consumes_the_remainder() {
        let tokens = tokenize(r#"copy "a b c"#);
        assert_eq!(texts(&tokens), vec!["copy", "a b c"]);
    }

    #[test]
    fn vector_form_is_verbatim() {
        let tokens = tokenize_vec(&["a b", "--", "-x"]);
        assert_eq!(texts(&tokens), vec!["a b", "--", "-x"]);
        assert_eq!(tokens[1].kind, TokenKind::EndOfArguments);
        assert_eq!(tokens[2].kind, TokenKind::Argument);
    }
}
