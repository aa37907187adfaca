//! Parsing engine.
//!
//! This module ties the parsing pipeline together. The public entry points
//! live in `api.rs` (see [`Parser`](crate::Parser)); this module owns the
//! stages between raw input and an assembled result:
//!
//! ```text
//! symbol model ───────────────┐
//!                             │
//! input ── tokenize ──────────┼─ normalize_root    (normalize.rs)
//!          (tokenizer.rs)     │
//!                             v
//!                     Matcher::run (matcher.rs)
//!                       - split delimiters, classify tokens
//!                       - unbundle single-dash clusters
//!                       - route tokens through the active-symbol stack
//!                       - capture arguments with rollback
//!                             │
//!                             v
//!                  collect_diagnostics (validate.rs)
//!                       - re-check every applied rule
//!                       - required-subcommand check
//!                       - unmatched-token policy
//!                             │
//!                             v
//!                        ParseResult
//! ```
//!
//! ## Responsibilities by module
//!
//! - `tokenizer.rs`: whitespace/quote splitting and the `--` marker. No
//!   failure states.
//! - `normalize.rs`: makes bare, full-path, and name-omitted invocations of a
//!   single root command parse identically.
//! - `applied.rs`: the applied-node arena shared by matcher and result.
//! - `matcher.rs`: the deterministic left-to-right walk with single-token
//!   backtracking. The hardest part of the engine.
//! - `validate.rs`: turns the finished applied tree plus unmatched tokens
//!   into diagnostics, rendered through the message catalog.
//! - `metrics.rs`: opt-in timing/debug data for verbose runs.
//!
//! ## Debugging
//!
//! Set `ARGOT_DEBUG_PARSE=1` to print classification, capture, backtrack, and
//! unbundling traces.

#[path = "engine/applied.rs"]
mod applied;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/tokenizer.rs"]
mod tokenizer;
#[path = "engine/validate.rs"]
mod validate;

pub use metrics::{AppliedSummary, ParseDetails, ParseMetrics};
pub use tokenizer::{tokenize, tokenize_vec};

pub(crate) use applied::{AppliedNode, NodeIx, effective_arguments};
pub(crate) use matcher::{MatchOutcome, Matcher};
pub(crate) use validate::collect_diagnostics;
