//! The symbol model: the caller-authored definition tree.
//!
//! Parsing is split into two phases, mirroring the usual compile-then-run
//! shape of this engine:
//!
//! 1. **Build** (this module): [`Symbol`] builders are assembled into a
//!    [`SymbolModel`] — an arena of nodes addressed by [`SymbolId`], children
//!    as owned id lists, parent as an index-only back-reference. Construction
//!    validates the configuration contract and is the only fatal stratum.
//! 2. **Run** (see `engine/matcher.rs`): the immutable model is consulted by
//!    any number of concurrent parses; nothing here mutates after `build`.
//!
//! ## Invariants
//!
//! - Every symbol has at least one alias; aliases are non-blank and unique
//!   among siblings. Violations fail [`SymbolModel::from_roots`].
//! - `SymbolId` indexes `SymbolModel::nodes`; ids never dangle because the
//!   arena is append-only during construction and frozen afterward.
//! - The canonical name is the longest raw alias with its prefix stripped,
//!   ties broken by declaration order.

use std::collections::HashSet;

use thiserror::Error;

use crate::rule::{ArgumentRule, Arity};

/// Symbol identifier (index into the model's node arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub(crate) usize);

/// Fatal configuration errors, reported once at model construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("symbol defines no aliases")]
    NoAliases,
    #[error("alias is empty or whitespace: {0:?}")]
    BlankAlias(String),
    #[error("duplicate alias among siblings: {0:?}")]
    DuplicateAlias(String),
    #[error("symbol model has no root symbols")]
    EmptyModel,
    #[error("invalid arity for {name:?}: min {min} exceeds max {max}")]
    InvalidArity { name: String, min: usize, max: usize },
}

/// Command/Option distinction, with command-only behavior attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SymbolKind {
    /// Independently invocable; keeps capturing arguments across multiple
    /// arrivals and decides whether unmatched tokens become diagnostics.
    Command { treat_unmatched_as_errors: bool },
    /// Accepts further arguments only after being respecified by alias.
    Option,
}

/// One node in the built model.
pub(crate) struct SymbolData {
    /// Aliases exactly as typed, prefixes included.
    pub raw_aliases: Vec<String>,
    /// Longest raw alias, prefix stripped; ties by declaration order.
    pub name: String,
    /// Empty description means hidden from help and completion.
    pub description: String,
    pub rule: ArgumentRule,
    pub kind: SymbolKind,
    pub children: Vec<SymbolId>,
    /// Index-only back-reference; never used for ownership.
    pub parent: Option<SymbolId>,
}

impl SymbolData {
    pub fn is_command(&self) -> bool {
        matches!(self.kind, SymbolKind::Command { .. })
    }

    pub fn is_hidden(&self) -> bool {
        self.description.is_empty()
    }

    pub fn treats_unmatched_as_errors(&self) -> bool {
        matches!(self.kind, SymbolKind::Command { treat_unmatched_as_errors: true })
    }

    /// Match against an alias exactly as typed.
    pub fn has_raw_alias(&self, text: &str) -> bool {
        self.raw_aliases.iter().any(|a| a == text)
    }

    /// Match against the raw alias or the alias with its leading prefix
    /// (`--`, `-`, `/`) stripped. Case-sensitive.
    pub fn has_alias(&self, text: &str) -> bool {
        self.raw_aliases
            .iter()
            .any(|a| a == text || strip_prefix(a) == text)
    }
}

/// Strip a single leading `--`, `-`, or `/` prefix.
pub(crate) fn strip_prefix(alias: &str) -> &str {
    if let Some(rest) = alias.strip_prefix("--") {
        rest
    } else if let Some(rest) = alias.strip_prefix('-') {
        rest
    } else if let Some(rest) = alias.strip_prefix('/') {
        rest
    } else {
        alias
    }
}

/// Split an alias specification: `"-o|--one"` and `"-o --one"` both yield
/// two aliases.
fn split_aliases(spec: &str) -> Vec<String> {
    spec.split(|c: char| c == '|' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

// --- Builder -----------------------------------------------------------------

/// A symbol definition under construction. Turned into an arena node by
/// [`SymbolModel::from_roots`].
#[derive(Debug)]
pub struct Symbol {
    kind: SymbolKind,
    aliases: Vec<String>,
    description: String,
    rule: ArgumentRule,
    children: Vec<Symbol>,
}

impl Symbol {
    /// A command. A single `aliases` string may encode several aliases
    /// separated by `|` or whitespace.
    pub fn command(aliases: &str) -> Symbol {
        Symbol {
            kind: SymbolKind::Command { treat_unmatched_as_errors: true },
            aliases: split_aliases(aliases),
            description: String::new(),
            rule: ArgumentRule::default(),
            children: Vec::new(),
        }
    }

    /// An option. Alias encoding is the same as for [`Symbol::command`].
    pub fn option(aliases: &str) -> Symbol {
        Symbol {
            kind: SymbolKind::Option,
            aliases: split_aliases(aliases),
            description: String::new(),
            rule: ArgumentRule::default(),
            children: Vec::new(),
        }
    }

    /// Attach a description. Symbols without one are hidden from help and
    /// completion.
    pub fn describe(mut self, text: &str) -> Symbol {
        self.description = text.to_string();
        self
    }

    pub fn rule(mut self, rule: ArgumentRule) -> Symbol {
        self.rule = rule;
        self
    }

    /// Shorthand for replacing only the arity of the current rule.
    pub fn arity(mut self, arity: Arity) -> Symbol {
        self.rule.arity = arity;
        self
    }

    /// Add one alias verbatim, without `|`/whitespace splitting.
    pub fn alias(mut self, alias: &str) -> Symbol {
        self.aliases.push(alias.to_string());
        self
    }

    pub fn child(mut self, child: Symbol) -> Symbol {
        self.children.push(child);
        self
    }

    /// Whether unmatched trailing tokens under this command become
    /// diagnostics. Defaults to true; ignored for options.
    pub fn treat_unmatched_as_errors(mut self, yes: bool) -> Symbol {
        if let SymbolKind::Command { ref mut treat_unmatched_as_errors } = self.kind {
            *treat_unmatched_as_errors = yes;
        }
        self
    }
}

// --- Model -------------------------------------------------------------------

/// The immutable, caller-authored definition tree. Built once, then shared
/// (typically behind an `Arc`) across unlimited concurrent parses.
pub struct SymbolModel {
    nodes: Vec<SymbolData>,
    roots: Vec<SymbolId>,
    /// Raw aliases of every command in the tree, for token classification.
    command_aliases: HashSet<String>,
    /// Raw aliases of every option in the tree.
    option_aliases: HashSet<String>,
}

impl std::fmt::Debug for SymbolModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolModel")
            .field("symbols", &self.nodes.len())
            .field("roots", &self.roots.len())
            .finish()
    }
}

impl SymbolModel {
    /// Build and validate a model from root symbol definitions.
    pub fn from_roots(roots: Vec<Symbol>) -> Result<SymbolModel, ModelError> {
        if roots.is_empty() {
            return Err(ModelError::EmptyModel);
        }

        let mut model = SymbolModel {
            nodes: Vec::new(),
            roots: Vec::new(),
            command_aliases: HashSet::new(),
            option_aliases: HashSet::new(),
        };

        let mut seen_root_aliases: HashSet<String> = HashSet::new();
        for root in roots {
            check_sibling_aliases(&root.aliases, &mut seen_root_aliases)?;
            let id = model.insert(root, None)?;
            model.roots.push(id);
        }
        Ok(model)
    }

    fn insert(&mut self, builder: Symbol, parent: Option<SymbolId>) -> Result<SymbolId, ModelError> {
        if builder.aliases.is_empty() {
            return Err(ModelError::NoAliases);
        }
        for alias in &builder.aliases {
            if alias.trim().is_empty() {
                return Err(ModelError::BlankAlias(alias.clone()));
            }
        }

        let name = canonical_name(&builder.aliases);
        if let (min, Some(max)) = (builder.rule.arity.min, builder.rule.arity.max) {
            if min > max {
                return Err(ModelError::InvalidArity { name, min, max });
            }
        }

        let id = SymbolId(self.nodes.len());
        let alias_index = match builder.kind {
            SymbolKind::Command { .. } => &mut self.command_aliases,
            SymbolKind::Option => &mut self.option_aliases,
        };
        alias_index.extend(builder.aliases.iter().cloned());

        self.nodes.push(SymbolData {
            raw_aliases: builder.aliases,
            name,
            description: builder.description,
            rule: builder.rule,
            kind: builder.kind,
            children: Vec::new(),
            parent,
        });

        let mut seen: HashSet<String> = HashSet::new();
        let mut child_ids = Vec::with_capacity(builder.children.len());
        for child in builder.children {
            check_sibling_aliases(&child.aliases, &mut seen)?;
            child_ids.push(self.insert(child, Some(id))?);
        }
        self.nodes[id.0].children = child_ids;
        Ok(id)
    }

    pub(crate) fn node(&self, id: SymbolId) -> &SymbolData {
        &self.nodes[id.0]
    }

    pub(crate) fn root_ids(&self) -> &[SymbolId] {
        &self.roots
    }

    pub(crate) fn is_command_alias(&self, text: &str) -> bool {
        self.command_aliases.contains(text)
    }

    pub(crate) fn is_option_alias(&self, text: &str) -> bool {
        self.option_aliases.contains(text)
    }

    /// Root symbols, for external help rendering and traversal.
    pub fn roots(&self) -> Vec<SymbolRef<'_>> {
        self.roots.iter().map(|&id| SymbolRef { model: self, id }).collect()
    }
}

fn check_sibling_aliases(
    aliases: &[String],
    seen: &mut HashSet<String>,
) -> Result<(), ModelError> {
    for alias in aliases {
        if !seen.insert(alias.clone()) {
            return Err(ModelError::DuplicateAlias(alias.clone()));
        }
    }
    Ok(())
}

fn canonical_name(aliases: &[String]) -> String {
    let mut longest = aliases[0].as_str();
    for alias in &aliases[1..] {
        if alias.len() > longest.len() {
            longest = alias;
        }
    }
    strip_prefix(longest).to_string()
}

// --- Read-only traversal handle ---------------------------------------------

/// A navigation handle over one symbol in a built model.
#[derive(Clone, Copy)]
pub struct SymbolRef<'a> {
    model: &'a SymbolModel,
    id: SymbolId,
}

impl<'a> SymbolRef<'a> {
    pub(crate) fn new(model: &'a SymbolModel, id: SymbolId) -> Self {
        SymbolRef { model, id }
    }

    fn data(&self) -> &'a SymbolData {
        self.model.node(self.id)
    }

    pub fn id(&self) -> SymbolId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.data().name
    }

    pub fn aliases(&self) -> &'a [String] {
        &self.data().raw_aliases
    }

    pub fn description(&self) -> &'a str {
        &self.data().description
    }

    pub fn is_command(&self) -> bool {
        self.data().is_command()
    }

    pub fn is_hidden(&self) -> bool {
        self.data().is_hidden()
    }

    pub fn arity(&self) -> Arity {
        self.data().rule.arity
    }

    pub fn has_alias(&self, text: &str) -> bool {
        self.data().has_alias(text)
    }

    pub fn children(&self) -> Vec<SymbolRef<'a>> {
        self.data()
            .children
            .iter()
            .map(|&id| SymbolRef { model: self.model, id })
            .collect()
    }

    pub fn parent(&self) -> Option<SymbolRef<'a>> {
        self.data().parent.map(|id| SymbolRef { model: self.model, id })
    }
}

impl std::fmt::Debug for SymbolRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolRef")
            .field("name", &self.name())
            .field("aliases", &self.aliases())
            .finish()
    }
}

#[cfg(test)]
mod symbol_tests {
    use super::*;

    #[test]
    fn alias_specs_split_on_pipe_and_whitespace() {
        assert_eq!(split_aliases("-o|--one"), vec!["-o", "--one"]);
        assert_eq!(split_aliases("-o --one"), vec!["-o", "--one"]);
        assert_eq!(split_aliases("install"), vec!["install"]);
    }

    #[test]
    fn canonical_name_is_longest_alias_prefix_stripped() {
        let model = SymbolModel::from_roots(vec![Symbol::option("-o|--one")]).unwrap();
        let root = model.roots()[0];
        assert_eq!(root.name(), "one");

        // Ties keep the earlier declaration.
        let model = SymbolModel::from_roots(vec![Symbol::option("-a|-b")]).unwrap();
        assert_eq!(model.roots()[0].name(), "a");
    }

    #[test]
    fn has_alias_matches_raw_and_stripped_forms() {
        let model = SymbolModel::from_roots(vec![Symbol::option("-o|--one")]).unwrap();
        let opt = model.roots()[0];
        for alias in ["o", "-o", "one", "--one"] {
            assert!(opt.has_alias(alias), "expected alias match for {alias:?}");
        }
        assert!(!opt.has_alias("O"), "alias matching is case-sensitive");
        assert!(!opt.has_alias("two"));
    }

    #[test]
    fn construction_rejects_malformed_definitions() {
        assert_eq!(
            SymbolModel::from_roots(vec![]).unwrap_err(),
            ModelError::EmptyModel
        );
        assert_eq!(
            SymbolModel::from_roots(vec![Symbol::option("")]).unwrap_err(),
            ModelError::NoAliases
        );
        assert_eq!(
            SymbolModel::from_roots(vec![Symbol::option("-o").alias("  ")]).unwrap_err(),
            ModelError::BlankAlias("  ".into())
        );
        assert_eq!(
            SymbolModel::from_roots(vec![
                Symbol::option("-o"),
                Symbol::option("-o|--other"),
            ])
            .unwrap_err(),
            ModelError::DuplicateAlias("-o".into())
        );
        assert_eq!(
            SymbolModel::from_roots(vec![
                Symbol::command("top")
                    .child(Symbol::option("-x"))
                    .child(Symbol::option("-x")),
            ])
            .unwrap_err(),
            ModelError::DuplicateAlias("-x".into())
        );
        assert_eq!(
            SymbolModel::from_roots(vec![
                Symbol::option("-n").arity(Arity::new(3, Some(1))),
            ])
            .unwrap_err(),
            ModelError::InvalidArity { name: "n".into(), min: 3, max: 1 }
        );
    }

    #[test]
    fn same_alias_allowed_at_different_levels() {
        // `-x` on a parent and on its child command is legal; only siblings
        // must be unique.
        let model = SymbolModel::from_roots(vec![
            Symbol::command("outer")
                .child(Symbol::option("-x"))
                .child(Symbol::command("inner").child(Symbol::option("-x"))),
        ]);
        assert!(model.is_ok());
    }

    #[test]
    fn classification_indexes_cover_the_whole_tree() {
        let model = SymbolModel::from_roots(vec![
            Symbol::command("outer").child(Symbol::command("inner").child(Symbol::option("--deep"))),
        ])
        .unwrap();
        assert!(model.is_command_alias("inner"));
        assert!(model.is_option_alias("--deep"));
        assert!(!model.is_command_alias("--deep"));
    }
}
