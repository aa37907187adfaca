//! Applied-symbol records.
//!
//! An [`AppliedNode`] is the match-time record that a symbol was invoked.
//! Nodes live in a flat arena (`Vec<AppliedNode>`) owned by the matcher while
//! a parse runs and by the [`ParseResult`](crate::ParseResult) afterward;
//! children are arena indices, so the applied tree needs no parent pointers
//! and no cycles. Nodes are append-only during their one parse and frozen
//! once the result is assembled.

use crate::symbol::SymbolData;

/// Arena index of an applied node. Public callers see the opaque
/// [`AppliedId`](crate::AppliedId) wrapper instead.
pub(crate) type NodeIx = usize;

#[derive(Debug, Clone)]
pub(crate) struct AppliedNode {
    pub symbol: crate::symbol::SymbolId,
    /// The literal text that triggered this application.
    pub trigger: String,
    /// Captured argument tokens, in arrival order. Defaults are injected
    /// lazily by [`effective_arguments`], never stored here.
    pub args: Vec<String>,
    pub children: Vec<NodeIx>,
    /// Whether the symbol may currently capture another argument. Options
    /// clear this after one capture and need respecification by alias;
    /// commands keep it set.
    pub accepting: bool,
}

impl AppliedNode {
    pub fn new(symbol: crate::symbol::SymbolId, trigger: &str) -> Self {
        AppliedNode {
            symbol,
            trigger: trigger.to_string(),
            args: Vec::new(),
            children: Vec::new(),
            accepting: true,
        }
    }
}

/// The captured arguments with the rule's default injected when nothing was
/// captured. Validation and all public accessors see this view.
pub(crate) fn effective_arguments(node: &AppliedNode, data: &SymbolData) -> Vec<String> {
    if node.args.is_empty() {
        if let Some(default) = &data.rule.default {
            return vec![default()];
        }
    }
    node.args.clone()
}
