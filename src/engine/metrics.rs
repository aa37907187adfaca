//! Parse run metrics.
//!
//! A small set of structs for observing what a parse did and how long each
//! stage took. Metrics are opt-in: the plain [`Parser::parse`](crate::Parser)
//! path allocates none of this; [`Parser::parse_verbose`](crate::Parser)
//! collects it for debugging and the demo binary's run report.

use std::time::Duration;

/// Stage timings for one parse run.
#[derive(Debug, Default, Clone)]
pub struct ParseMetrics {
    /// Total elapsed time, tokenization through diagnostics.
    pub total: Duration,
    pub tokenize: Duration,
    /// The token walk (classification, unbundling, matching).
    pub matching: Duration,
    /// Result assembly, including diagnostic collection.
    pub validate: Duration,
}

/// A compact per-node summary used in verbose reports.
#[derive(Debug, Clone)]
pub struct AppliedSummary {
    pub name: String,
    /// The literal text that triggered the application.
    pub trigger: String,
    /// Nesting depth below the applied roots.
    pub depth: usize,
    /// Number of captured arguments.
    pub arguments: usize,
}

/// Additional details returned by `parse_verbose`.
#[derive(Debug, Default, Clone)]
pub struct ParseDetails {
    pub metrics: ParseMetrics,
    /// Tokens consumed by the walk, after splitting and unbundling.
    pub token_count: usize,
    pub applied: Vec<AppliedSummary>,
    pub unmatched: Vec<String>,
    pub unparsed: Vec<String>,
    pub diagnostics: Vec<String>,
}
