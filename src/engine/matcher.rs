//! The token-matching walk.
//!
//! This module is the operational core of the engine. It consumes the token
//! stream left to right, exactly once, maintaining an explicit stack of
//! currently active applied symbols (most recent last). Every token is
//! resolved through a fixed decision order, which is what keeps the grammar
//! deterministic despite its ambiguity:
//!
//! ```text
//! token ──┬─ `--`             -> remainder becomes unparsed, walk halts
//!         ├─ `-x=v` / `-x:v`  -> split into alias + argument, re-enqueued
//!         ├─ classify          (Command / Option / Argument vs. the model)
//!         ├─ `-xyz`           -> unbundle into -x -y -z (all-or-nothing)
//!         ├─ root alias       -> activate/respecify a root symbol
//!         ├─ active symbols   -> offered most-recent-first:
//!         │     1. already-applied children (innermost wins)
//!         │     2. own argument slot (append, re-validate, roll back)
//!         │     3. new or repeated child alias
//!         └─ otherwise        -> unmatched
//! ```
//!
//! The argument step is the only backtracking in the engine: the capture list
//! is extended by one token, the rule re-checked, and the list truncated again
//! if the rule now fails. A failed match is routine control flow, never an
//! error.
//!
//! ## Debugging
//!
//! Set `ARGOT_DEBUG_PARSE=1` to print classification, capture, backtrack, and
//! unbundling traces to stderr.

use std::collections::{HashSet, VecDeque};

use crate::api::ParserFlags;
use crate::engine::applied::{AppliedNode, NodeIx};
use crate::engine::normalize::normalize_root;
use crate::symbol::{SymbolId, SymbolModel};
use crate::{Token, TokenKind};

/// Everything the walk produces; assembled into a `ParseResult` by the caller.
pub(crate) struct MatchOutcome {
    /// Tokens as actually consumed, after normalization, delimiter splitting,
    /// and unbundling.
    pub tokens: Vec<Token>,
    pub nodes: Vec<AppliedNode>,
    pub roots: Vec<NodeIx>,
    pub unmatched: Vec<Token>,
    pub unparsed: Vec<Token>,
}

pub(crate) struct Matcher<'m> {
    model: &'m SymbolModel,
    flags: ParserFlags,
    nodes: Vec<AppliedNode>,
    roots: Vec<NodeIx>,
    /// Activation history; offered most-recent-first. May contain repeats.
    active: Vec<NodeIx>,
    tokens: Vec<Token>,
    unmatched: Vec<Token>,
    unparsed: Vec<Token>,
    debug: bool,
}

impl<'m> Matcher<'m> {
    pub fn new(model: &'m SymbolModel, flags: ParserFlags) -> Self {
        Matcher {
            model,
            flags,
            nodes: Vec::new(),
            roots: Vec::new(),
            active: Vec::new(),
            tokens: Vec::new(),
            unmatched: Vec::new(),
            unparsed: Vec::new(),
            debug: std::env::var_os("ARGOT_DEBUG_PARSE").is_some(),
        }
    }

    pub fn run(mut self, raw: Vec<Token>) -> MatchOutcome {
        let mut queue: VecDeque<Token> = normalize_root(raw, self.model).into();

        while let Some(token) = queue.pop_front() {
            if token.kind == TokenKind::EndOfArguments {
                self.tokens.push(token);
                self.unparsed.extend(queue.drain(..));
                break;
            }
            if let Some((head, value)) = self.split_delimited(&token) {
                if self.debug {
                    eprintln!(
                        "[delimiter] {:?} -> {:?} + {:?}",
                        token.text, head.text, value.text
                    );
                }
                queue.push_front(value);
                queue.push_front(head);
                continue;
            }
            let token = self.classify(token);
            if self.try_unbundle(&token, &mut queue) {
                continue;
            }
            self.tokens.push(token.clone());
            self.place(token);
        }

        MatchOutcome {
            tokens: self.tokens,
            nodes: self.nodes,
            roots: self.roots,
            unmatched: self.unmatched,
            unparsed: self.unparsed,
        }
    }

    /// Refine `Unknown` tokens against the model's alias indexes.
    fn classify(&self, token: Token) -> Token {
        if token.kind != TokenKind::Unknown {
            return token;
        }
        let kind = if self.model.is_command_alias(&token.text) {
            TokenKind::Command
        } else if self.model.is_option_alias(&token.text) {
            TokenKind::Option
        } else if token.text.starts_with('-') && token.text != "-" {
            TokenKind::Option
        } else if self.flags.contains(ParserFlags::SLASH_PREFIX) && token.text.starts_with('/') {
            TokenKind::Option
        } else {
            TokenKind::Argument
        };
        if self.debug {
            eprintln!("[classify] {:?} -> {:?}", token.text, kind);
        }
        Token::new(token.text, kind)
    }

    /// Split `-x=v`, `-x:v`, `--long=v`, `--long:v` (and `/x:v` when the
    /// slash prefix is enabled) into an alias token plus one argument token.
    fn split_delimited(&self, token: &Token) -> Option<(Token, Token)> {
        if !self.flags.contains(ParserFlags::SPLIT_DELIMITERS) {
            return None;
        }
        if token.kind != TokenKind::Unknown {
            return None;
        }
        let caps = regex!(r"^(--?[^=:]+|/[^=:]+)[=:](.*)$").captures(&token.text)?;
        let head = caps.get(1).unwrap().as_str();
        if head.starts_with('/') && !self.flags.contains(ParserFlags::SLASH_PREFIX) {
            return None;
        }
        Some((
            Token::new(head, TokenKind::Unknown),
            Token::new(caps.get(2).unwrap().as_str(), TokenKind::Argument),
        ))
    }

    /// Expand a single-dash cluster into per-character options, but only when
    /// every character is an alias in the current command context and the
    /// cluster is not itself a known alias. All or nothing: a partially valid
    /// cluster stays intact and is matched as a whole.
    fn try_unbundle(&mut self, token: &Token, queue: &mut VecDeque<Token>) -> bool {
        if !self.flags.contains(ParserFlags::UNBUNDLE) || token.kind != TokenKind::Option {
            return false;
        }
        let text = &token.text;
        if !text.starts_with('-') || text.starts_with("--") || text.chars().count() <= 2 {
            return false;
        }
        let context = self.context_symbols();
        if context
            .iter()
            .any(|&sid| self.model.node(sid).has_raw_alias(text))
        {
            return false;
        }
        let cluster: Vec<String> = text[1..].chars().map(|c| format!("-{c}")).collect();
        let all_valid = cluster.iter().all(|alias| {
            context
                .iter()
                .any(|&sid| self.model.node(sid).has_raw_alias(alias))
        });
        if !all_valid {
            if self.debug {
                eprintln!("[unbundle] {text:?} kept intact");
            }
            return false;
        }
        if self.debug {
            eprintln!("[unbundle] {:?} -> {:?}", text, cluster);
        }
        for alias in cluster.iter().rev() {
            queue.push_front(Token::new(alias.clone(), TokenKind::Option));
        }
        true
    }

    /// Symbols that aliases are resolved against at the current position: the
    /// innermost applied command's defined children, or the root set when no
    /// command has been applied.
    fn context_symbols(&self) -> Vec<SymbolId> {
        match self.innermost_command() {
            Some(ix) => self.model.node(self.nodes[ix].symbol).children.clone(),
            None => self.model.root_ids().to_vec(),
        }
    }

    /// The most recently applied command, which is also the deepest one.
    fn innermost_command(&self) -> Option<NodeIx> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| self.model.node(n.symbol).is_command())
            .map(|(ix, _)| ix)
    }

    /// Route one classified token to its destination.
    fn place(&mut self, token: Token) {
        // Root aliases take precedence unless some active symbol is still
        // mid-respecification (it was just specified and can capture more).
        if !self.any_active_mid_respecification() && self.try_root(&token) {
            return;
        }

        let mut tried: HashSet<NodeIx> = HashSet::new();
        let history = self.active.clone();
        for &ix in history.iter().rev() {
            if !tried.insert(ix) {
                continue;
            }
            if let Some(took) = self.try_take(ix, &token) {
                self.active.push(took);
                return;
            }
        }

        if self.try_root(&token) {
            return;
        }
        if self.debug {
            eprintln!("[unmatched] {:?}", token.text);
        }
        self.unmatched.push(token);
    }

    fn any_active_mid_respecification(&self) -> bool {
        self.nodes.iter().any(|n| {
            n.accepting
                && self
                    .model
                    .node(n.symbol)
                    .rule
                    .arity
                    .has_capacity(n.args.len())
        })
    }

    /// Activate a root-level symbol, or respecify one that is already applied.
    fn try_root(&mut self, token: &Token) -> bool {
        let root = self
            .model
            .root_ids()
            .iter()
            .copied()
            .find(|&sid| self.model.node(sid).has_raw_alias(&token.text));
        let Some(sid) = root else {
            return false;
        };

        if let Some(&ix) = self.roots.iter().find(|&&ix| self.nodes[ix].symbol == sid) {
            if self.debug {
                eprintln!("[respecify] root {:?}", token.text);
            }
            self.nodes[ix].accepting = true;
            self.active.push(ix);
            return true;
        }
        let ix = self.apply(sid, &token.text);
        self.roots.push(ix);
        self.active.push(ix);
        true
    }

    fn apply(&mut self, symbol: SymbolId, trigger: &str) -> NodeIx {
        if self.debug {
            eprintln!(
                "[apply] {:?} as {:?}",
                trigger,
                self.model.node(symbol).name
            );
        }
        self.nodes.push(AppliedNode::new(symbol, trigger));
        self.nodes.len() - 1
    }

    /// Offer `token` to the applied symbol at `ix`. Resolution order: applied
    /// children (innermost wins), own argument slot, then a new or repeated
    /// child alias. Returns the node that consumed the token.
    fn try_take(&mut self, ix: NodeIx, token: &Token) -> Option<NodeIx> {
        let children = self.nodes[ix].children.clone();
        for &child in children.iter().rev() {
            if let Some(took) = self.try_take(child, token) {
                return Some(took);
            }
        }

        if token.kind == TokenKind::Argument && self.nodes[ix].accepting {
            let symbol = self.nodes[ix].symbol;
            self.nodes[ix].args.push(token.text.clone());
            let valid = self
                .model
                .node(symbol)
                .rule
                .check(&self.nodes[ix].args)
                .is_none();
            if valid {
                if !self.model.node(symbol).is_command() {
                    self.nodes[ix].accepting = false;
                }
                if self.debug {
                    eprintln!(
                        "[capture] {:?} <- {:?}",
                        self.model.node(symbol).name,
                        token.text
                    );
                }
                return Some(ix);
            }
            self.nodes[ix].args.pop();
            if self.debug {
                eprintln!(
                    "[backtrack] {:?} rejected {:?}",
                    self.model.node(symbol).name,
                    token.text
                );
            }
        }

        self.try_child_alias(ix, token)
    }

    fn try_child_alias(&mut self, ix: NodeIx, token: &Token) -> Option<NodeIx> {
        let symbol = self.nodes[ix].symbol;
        let applied_children = self.nodes[ix].children.clone();

        // A repeated alias respecifies the existing application, re-enabling
        // argument capture.
        if let Some(&child) = applied_children.iter().find(|&&c| {
            self.model
                .node(self.nodes[c].symbol)
                .has_raw_alias(&token.text)
        }) {
            if self.debug {
                eprintln!("[respecify] {:?}", token.text);
            }
            self.nodes[child].accepting = true;
            return Some(child);
        }

        let def = self
            .model
            .node(symbol)
            .children
            .iter()
            .copied()
            .find(|&c| self.model.node(c).has_raw_alias(&token.text))?;

        // One subcommand per parent: once any subcommand is applied, a
        // differently named one no longer matches here.
        if self.model.node(def).is_command()
            && applied_children
                .iter()
                .any(|&c| self.model.node(self.nodes[c].symbol).is_command())
        {
            return None;
        }

        let child = self.apply(def, &token.text);
        self.nodes[ix].children.push(child);
        Some(child)
    }
}
