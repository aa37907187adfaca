//! Parse results.
//!
//! A [`ParseResult`] is the immutable bundle a parse produces: the consumed
//! tokens, the applied-symbol tree, unmatched and unparsed tokens, and the
//! diagnostics. Diagnostics are computed once at construction and never
//! mutated; the result exposes no API for extending the applied tree.
//!
//! Navigation happens through [`AppliedRef`] handles, which pair the result
//! with an arena index. Alias lookup accepts the raw form or the
//! prefix-stripped form (`get("o")` finds `-o`).

use std::any::Any;
use std::sync::Arc;

use crate::api::{Parser, ParserFlags};
use crate::engine::{AppliedNode, MatchOutcome, NodeIx, collect_diagnostics, effective_arguments};
use crate::messages::Messages;
use crate::Token;
use crate::symbol::{SymbolData, SymbolModel, SymbolRef};

/// Opaque handle to one applied symbol inside a particular result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedId(pub(crate) NodeIx);

/// One parse-time finding. Never an exception: diagnostics accumulate and the
/// caller decides rendering and exit-code policy.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Message rendered through the catalog in effect at parse time.
    pub message: String,
    /// The token the finding is about.
    pub token: Token,
    pub(crate) applied: Option<AppliedId>,
}

impl Diagnostic {
    /// The applied symbol that raised this diagnostic, if any.
    pub fn applied_id(&self) -> Option<AppliedId> {
        self.applied
    }
}

pub struct ParseResult {
    model: Arc<SymbolModel>,
    flags: ParserFlags,
    messages: Arc<dyn Messages>,
    raw_input: String,
    tokens: Vec<Token>,
    nodes: Vec<AppliedNode>,
    roots: Vec<NodeIx>,
    unmatched: Vec<Token>,
    unparsed: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl std::fmt::Debug for ParseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParseResult")
            .field("diagram", &self.diagram())
            .field("unparsed", &self.unparsed)
            .field("diagnostics", &self.diagnostics.len())
            .finish()
    }
}

impl ParseResult {
    pub(crate) fn assemble(
        model: Arc<SymbolModel>,
        flags: ParserFlags,
        messages: Arc<dyn Messages>,
        raw_input: String,
        outcome: MatchOutcome,
    ) -> ParseResult {
        let diagnostics = collect_diagnostics(
            &model,
            &outcome.nodes,
            &outcome.roots,
            &outcome.unmatched,
            messages.as_ref(),
        );
        ParseResult {
            model,
            flags,
            messages,
            raw_input,
            tokens: outcome.tokens,
            nodes: outcome.nodes,
            roots: outcome.roots,
            unmatched: outcome.unmatched,
            unparsed: outcome.unparsed,
            diagnostics,
        }
    }

    /// Tokens as consumed by the walk (after normalization, delimiter
    /// splitting, and unbundling).
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens no symbol claimed.
    pub fn unmatched_tokens(&self) -> &[Token] {
        &self.unmatched
    }

    /// Tokens after the `--` marker; never parsed, never diagnosed.
    pub fn unparsed_tokens(&self) -> &[Token] {
        &self.unparsed
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The original input line (token vectors are re-joined with spaces).
    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    /// Top-level applied symbols, in application order.
    pub fn applied(&self) -> Vec<AppliedRef<'_>> {
        self.roots.iter().map(|&ix| self.handle(ix)).collect()
    }

    /// Look up a top-level applied symbol by raw or prefix-stripped alias.
    pub fn get(&self, alias: &str) -> Option<AppliedRef<'_>> {
        self.roots
            .iter()
            .copied()
            .find(|&ix| self.data(ix).has_alias(alias))
            .map(|ix| self.handle(ix))
    }

    pub fn has_symbol(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    /// The most deeply nested applied command, if any command was applied.
    pub fn applied_command(&self) -> Option<AppliedRef<'_>> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| self.model.node(n.symbol).is_command())
            .map(|(ix, _)| self.handle(ix))
    }

    /// Resolve a diagnostic's applied-symbol reference.
    pub fn applied_by_id(&self, id: AppliedId) -> AppliedRef<'_> {
        self.handle(id.0)
    }

    /// Deterministic bracketed trace of the applied tree, with unmatched
    /// tokens appended after a `???-->` marker.
    ///
    /// ```text
    /// [ the-command [ -x <one> ] [ -y ] <two> <three> ]   ???--> stray
    /// ```
    pub fn diagram(&self) -> String {
        let mut out = String::new();
        for (i, &root) in self.roots.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            self.diagram_node(root, &mut out);
        }
        if !self.unmatched.is_empty() {
            out.push_str("   ???--> ");
            let stray: Vec<&str> = self.unmatched.iter().map(|t| t.text.as_str()).collect();
            out.push_str(&stray.join(" "));
        }
        out
    }

    fn diagram_node(&self, ix: NodeIx, out: &mut String) {
        let node = &self.nodes[ix];
        out.push_str("[ ");
        out.push_str(&node.trigger);
        for &child in &node.children {
            out.push(' ');
            self.diagram_node(child, out);
        }
        for arg in effective_arguments(node, self.data(ix)) {
            out.push_str(" <");
            out.push_str(&arg);
            out.push('>');
        }
        out.push_str(" ]");
    }

    /// Re-parse a prefix of the input with the same model, flags, and
    /// catalog. Used by the suggestion engine for partial parses.
    pub(crate) fn reparse(&self, input: &str) -> ParseResult {
        Parser::from_parts(self.model.clone(), self.flags, self.messages.clone()).parse(input)
    }

    pub(crate) fn model(&self) -> &SymbolModel {
        &self.model
    }

    pub(crate) fn last_applied(&self) -> Option<AppliedRef<'_>> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(self.handle(self.nodes.len() - 1))
        }
    }

    fn handle(&self, ix: NodeIx) -> AppliedRef<'_> {
        AppliedRef { result: self, ix }
    }

    fn data(&self, ix: NodeIx) -> &SymbolData {
        self.model.node(self.nodes[ix].symbol)
    }
}

// --- Applied-symbol handle ---------------------------------------------------

/// A navigation handle over one applied symbol.
#[derive(Clone, Copy)]
pub struct AppliedRef<'a> {
    result: &'a ParseResult,
    ix: NodeIx,
}

impl<'a> AppliedRef<'a> {
    fn node(&self) -> &'a AppliedNode {
        &self.result.nodes[self.ix]
    }

    fn data(&self) -> &'a SymbolData {
        self.result.data(self.ix)
    }

    pub fn id(&self) -> AppliedId {
        AppliedId(self.ix)
    }

    /// Canonical symbol name.
    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    /// The literal text that triggered this application.
    pub fn trigger(&self) -> &'a str {
        &self.node().trigger
    }

    pub fn is_command(&self) -> bool {
        self.data().is_command()
    }

    pub fn has_alias(&self, text: &str) -> bool {
        self.data().has_alias(text)
    }

    /// The defined symbol this application refers to.
    pub fn symbol(&self) -> SymbolRef<'a> {
        SymbolRef::new(self.result.model(), self.node().symbol)
    }

    /// Captured argument strings, with the rule's default injected when
    /// nothing was captured.
    pub fn arguments(&self) -> Vec<String> {
        effective_arguments(self.node(), self.data())
    }

    /// The typed value for this symbol, per the value-lookup contract:
    /// the rule's materializer when present; otherwise `true` for an empty
    /// capture, the single string for single-argument arities, and the whole
    /// string list for the rest.
    pub fn value(&self) -> Result<Box<dyn Any + Send + Sync>, String> {
        let args = self.arguments();
        if let Some(materializer) = &self.data().rule.materializer {
            return materializer(&args);
        }
        if args.is_empty() {
            return Ok(Box::new(true));
        }
        if self.data().rule.arity.max == Some(1) {
            return Ok(Box::new(args[0].clone()));
        }
        Ok(Box::new(args))
    }

    pub fn children(&self) -> Vec<AppliedRef<'a>> {
        self.node()
            .children
            .iter()
            .map(|&ix| AppliedRef { result: self.result, ix })
            .collect()
    }

    /// Look up an applied child by raw or prefix-stripped alias.
    pub fn get(&self, alias: &str) -> Option<AppliedRef<'a>> {
        self.node()
            .children
            .iter()
            .copied()
            .find(|&ix| self.result.data(ix).has_alias(alias))
            .map(|ix| AppliedRef { result: self.result, ix })
    }

    pub fn has_symbol(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }
}

impl std::fmt::Debug for AppliedRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppliedRef")
            .field("name", &self.name())
            .field("trigger", &self.trigger())
            .field("arguments", &self.arguments())
            .field("children", &self.node().children.len())
            .finish()
    }
}
