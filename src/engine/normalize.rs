//! Root-command normalization.
//!
//! When the model defines exactly one top-level command, the three common
//! invocation shapes must parse identically:
//!
//! ```text
//! the-command -x 1          (bare invocation)
//! /usr/bin/the-command -x 1 (full executable path; `.exe` suffix tolerated)
//! -x 1                      (root name omitted entirely)
//! ```
//!
//! The first token is compared by its trailing path segment, case-insensitively
//! and with an optional executable suffix stripped. On a match it is replaced
//! by the command's canonical name; otherwise the name is prepended.

use crate::symbol::SymbolModel;
use crate::{Token, TokenKind};

pub(crate) fn normalize_root(mut tokens: Vec<Token>, model: &SymbolModel) -> Vec<Token> {
    let mut commands = model
        .root_ids()
        .iter()
        .copied()
        .filter(|&id| model.node(id).is_command());
    let root = match (commands.next(), commands.next()) {
        (Some(id), None) => id,
        _ => return tokens,
    };
    let name = model.node(root).name.clone();

    match tokens.first() {
        Some(first) if first.kind == TokenKind::Unknown && invokes(&first.text, &name) => {
            tokens[0] = Token::new(name, TokenKind::Unknown);
        }
        _ => tokens.insert(0, Token::new(name, TokenKind::Unknown)),
    }
    tokens
}

/// Does `text` invoke the command named `name`? Compares the trailing path
/// segment, minus an executable suffix, case-insensitively.
fn invokes(text: &str, name: &str) -> bool {
    let segment = regex!(r"[^/\\]*$")
        .find(text)
        .map(|m| m.as_str())
        .unwrap_or(text);
    let segment = regex!(r"(?i)\.exe$").replace(segment, "");
    segment.eq_ignore_ascii_case(name)
}

#[cfg(test)]
mod normalize_tests {
    use super::*;
    use crate::engine::tokenizer::tokenize;
    use crate::symbol::{Symbol, SymbolModel};

    fn model() -> SymbolModel {
        SymbolModel::from_roots(vec![Symbol::command("the-command")]).unwrap()
    }

    fn first_texts(input: &str) -> Vec<String> {
        normalize_root(tokenize(input), &model())
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn bare_path_and_omitted_invocations_normalize_identically() {
        let expected = vec!["the-command".to_string(), "-x".into()];
        assert_eq!(first_texts("the-command -x"), expected);
        assert_eq!(first_texts("THE-COMMAND -x"), expected);
        assert_eq!(first_texts("/usr/local/bin/the-command -x"), expected);
        assert_eq!(first_texts(r"C:\tools\The-Command.exe -x"), expected);
        assert_eq!(first_texts("-x"), expected);
    }

    #[test]
    fn no_single_root_command_means_no_normalization() {
        let options_only = SymbolModel::from_roots(vec![Symbol::option("-o")]).unwrap();
        let tokens = normalize_root(tokenize("-o"), &options_only);
        assert_eq!(tokens.len(), 1);

        let two_commands =
            SymbolModel::from_roots(vec![Symbol::command("one"), Symbol::command("two")]).unwrap();
        let tokens = normalize_root(tokenize("one"), &two_commands);
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn empty_input_still_applies_the_root() {
        let tokens = normalize_root(Vec::new(), &model());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "the-command");
    }
}
