//! Post-walk validation.
//!
//! Once the walk is done, the applied tree is checked exactly once, depth
//! first, and the findings become the [`Diagnostic`](crate::Diagnostic) list
//! of the result:
//!
//! - each node's rule is re-checked against its effective arguments (the
//!   captured list, or the injected default);
//! - a command that defines subcommands but had none applied raises a
//!   required-command diagnostic;
//! - unmatched tokens become diagnostics only when the innermost applied
//!   command treats unmatched tokens as errors.
//!
//! Structured [`ArgError`](crate::ArgError)s are rendered through the
//! [`Messages`](crate::Messages) catalog here; this is the only place parse
//! problems are turned into text.

use crate::engine::applied::{AppliedNode, NodeIx, effective_arguments};
use crate::messages::Messages;
use crate::result::{AppliedId, Diagnostic};
use crate::rule::ArgError;
use crate::symbol::SymbolModel;
use crate::{Token, TokenKind};

pub(crate) fn collect_diagnostics(
    model: &SymbolModel,
    nodes: &[AppliedNode],
    roots: &[NodeIx],
    unmatched: &[Token],
    messages: &dyn Messages,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for &root in roots {
        visit(model, nodes, root, messages, &mut out);
    }

    let strict = nodes
        .iter()
        .rev()
        .find(|n| model.node(n.symbol).is_command())
        .map(|n| model.node(n.symbol).treats_unmatched_as_errors())
        .unwrap_or(false);
    if strict {
        for token in unmatched {
            let message = match token.kind {
                TokenKind::Option => messages.unrecognized_option(&token.text),
                _ => messages.unrecognized_command_or_argument(&token.text),
            };
            out.push(Diagnostic { message, token: token.clone(), applied: None });
        }
    }
    out
}

fn visit(
    model: &SymbolModel,
    nodes: &[AppliedNode],
    ix: NodeIx,
    messages: &dyn Messages,
    out: &mut Vec<Diagnostic>,
) {
    let node = &nodes[ix];
    let data = model.node(node.symbol);
    let kind = if data.is_command() { TokenKind::Command } else { TokenKind::Option };

    if let Some(err) = data.rule.check(&effective_arguments(node, data)) {
        let display = if data.is_command() { data.name.as_str() } else { node.trigger.as_str() };
        out.push(Diagnostic {
            message: render(err, display, data.is_command(), messages),
            token: Token::new(node.trigger.clone(), kind),
            applied: Some(AppliedId(ix)),
        });
    }

    if data.is_command() {
        let defines_subcommands = data
            .children
            .iter()
            .any(|&c| model.node(c).is_command());
        let applied_subcommand = node
            .children
            .iter()
            .any(|&c| model.node(nodes[c].symbol).is_command());
        if defines_subcommands && !applied_subcommand {
            out.push(Diagnostic {
                message: messages.required_command_not_provided(&data.name),
                token: Token::new(node.trigger.clone(), kind),
                applied: Some(AppliedId(ix)),
            });
        }
    }

    for &child in &node.children {
        visit(model, nodes, child, messages, out);
    }
}

fn render(err: ArgError, display: &str, is_command: bool, messages: &dyn Messages) -> String {
    match err {
        ArgError::MissingRequired => messages.required_argument_missing(display, is_command),
        ArgError::TooMany { max, actual } => messages.too_many_arguments(display, max, actual),
        ArgError::NotInAllowedSet { value, allowed } => {
            messages.unrecognized_argument(&value, &allowed)
        }
        ArgError::FileMissing { path } => messages.file_does_not_exist(&path),
        ArgError::Custom(message) => message,
    }
}
