//! Completion suggestions.
//!
//! Given a finished [`ParseResult`] and a cursor position, compute the
//! candidate strings a shell completion would offer. The engine:
//!
//! 1. finds the partial token under the cursor (end of input if omitted),
//! 2. re-parses the input truncated before that token — this is the partial
//!    parse the matcher is built to support,
//! 3. locates the nearest applied symbol in that parse,
//! 4. unions the alphabetized, de-duplicated aliases of its non-hidden
//!    defined children with the values of its rule's suggestion sources
//!    (callbacks receive the partial text), and
//! 5. filters to entries prefix-matching the partial text.
//!
//! The computation is pure: it never mutates the result and may be repeated
//! at any number of positions.

use std::collections::BTreeSet;

use crate::result::ParseResult;

pub fn suggest(result: &ParseResult, position: Option<usize>) -> Vec<String> {
    let raw = result.raw_input();
    let mut pos = position.unwrap_or(raw.len()).min(raw.len());
    while pos > 0 && !raw.is_char_boundary(pos) {
        pos -= 1;
    }
    let upto = &raw[..pos];
    let (head, partial) = split_partial(upto);

    let scoped = result.reparse(head);
    let mut candidates: BTreeSet<String> = BTreeSet::new();

    match scoped.last_applied() {
        Some(applied) => {
            for child in applied.symbol().children() {
                if !child.is_hidden() {
                    candidates.extend(child.aliases().iter().cloned());
                }
            }
            let rule = &scoped.model().node(applied.symbol().id()).rule;
            candidates.extend(rule.suggestion_values(partial));
        }
        None => {
            for root in scoped.model().roots() {
                if !root.is_hidden() {
                    candidates.extend(root.aliases().iter().cloned());
                }
            }
        }
    }

    candidates
        .into_iter()
        .filter(|candidate| candidate.starts_with(partial))
        .collect()
}

/// Split the text before the cursor into everything up to the last
/// whitespace run and the trailing partial token.
fn split_partial(upto: &str) -> (&str, &str) {
    match upto.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        Some((i, c)) => {
            let cut = i + c.len_utf8();
            (&upto[..cut], &upto[cut..])
        }
        None => ("", upto),
    }
}

#[cfg(test)]
mod suggest_tests {
    use super::split_partial;

    #[test]
    fn partial_token_extraction() {
        assert_eq!(split_partial("the-command -x"), ("the-command ", "-x"));
        assert_eq!(split_partial("the-command "), ("the-command ", ""));
        assert_eq!(split_partial("the"), ("", "the"));
        assert_eq!(split_partial(""), ("", ""));
    }
}
