//! Public parsing API.
//!
//! A [`Parser`] pairs an immutable [`SymbolModel`](crate::SymbolModel) with
//! behavior flags and a message catalog. The model sits behind an `Arc`, so a
//! parser (or several) can serve unlimited concurrent parses; each call
//! allocates its own applied tree and returns a frozen
//! [`ParseResult`](crate::ParseResult).
//!
//! The two entry points are equivalent: `parse` tokenizes the string itself,
//! `parse_tokens` accepts a caller-tokenized vector, and both must yield the
//! same result for equivalent input.

use std::sync::Arc;
use std::time::Instant;

use crate::Token;
use crate::engine::{
    AppliedSummary, Matcher, ParseDetails, ParseMetrics, tokenize, tokenize_vec,
};
use crate::messages::{DefaultMessages, Messages};
use crate::result::{AppliedRef, ParseResult};
use crate::symbol::SymbolModel;

bitflags::bitflags! {
    /// Togglable matcher behaviors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParserFlags: u8 {
        /// Split `-xyz` into `-x -y -z` when every character is a valid
        /// single-character alias in the current command context.
        const UNBUNDLE         = 1 << 0;
        /// Split `-x=v`, `-x:v`, `--long=v`, `--long:v` into alias plus
        /// argument before matching.
        const SPLIT_DELIMITERS = 1 << 1;
        /// Treat `/x`-style tokens as options (Windows convention).
        const SLASH_PREFIX     = 1 << 2;
    }
}

impl Default for ParserFlags {
    fn default() -> Self {
        ParserFlags::UNBUNDLE | ParserFlags::SPLIT_DELIMITERS
    }
}

/// The parsing front end: symbol model + flags + message catalog.
pub struct Parser {
    model: Arc<SymbolModel>,
    flags: ParserFlags,
    messages: Arc<dyn Messages>,
}

impl Parser {
    pub fn new(model: impl Into<Arc<SymbolModel>>) -> Parser {
        Parser {
            model: model.into(),
            flags: ParserFlags::default(),
            messages: Arc::new(DefaultMessages),
        }
    }

    pub(crate) fn from_parts(
        model: Arc<SymbolModel>,
        flags: ParserFlags,
        messages: Arc<dyn Messages>,
    ) -> Parser {
        Parser { model, flags, messages }
    }

    pub fn with_flags(mut self, flags: ParserFlags) -> Parser {
        self.flags = flags;
        self
    }

    /// Replace the diagnostic message catalog.
    pub fn with_messages(mut self, messages: impl Messages + 'static) -> Parser {
        self.messages = Arc::new(messages);
        self
    }

    pub fn model(&self) -> &Arc<SymbolModel> {
        &self.model
    }

    pub fn flags(&self) -> ParserFlags {
        self.flags
    }

    /// Parse a raw command line (the library tokenizes).
    pub fn parse(&self, input: &str) -> ParseResult {
        self.run(tokenize(input), input.to_string())
    }

    /// Parse a caller-tokenized argument vector.
    pub fn parse_tokens<S: AsRef<str>>(&self, args: &[S]) -> ParseResult {
        let raw = args
            .iter()
            .map(|a| a.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        self.run(tokenize_vec(args), raw)
    }

    fn run(&self, tokens: Vec<Token>, raw_input: String) -> ParseResult {
        let outcome = Matcher::new(&self.model, self.flags).run(tokens);
        ParseResult::assemble(
            self.model.clone(),
            self.flags,
            self.messages.clone(),
            raw_input,
            outcome,
        )
    }

    /// Parse and collect stage timings plus a compact run summary. The plain
    /// [`Parser::parse`] path does not allocate any of this.
    pub fn parse_verbose(&self, input: &str) -> VerboseParse {
        let total_start = Instant::now();

        let stage = Instant::now();
        let tokens = tokenize(input);
        let tokenize_elapsed = stage.elapsed();

        let stage = Instant::now();
        let outcome = Matcher::new(&self.model, self.flags).run(tokens);
        let matching = stage.elapsed();

        let stage = Instant::now();
        let result = ParseResult::assemble(
            self.model.clone(),
            self.flags,
            self.messages.clone(),
            input.to_string(),
            outcome,
        );
        let validate = stage.elapsed();

        let mut applied = Vec::new();
        for root in result.applied() {
            summarize(root, 0, &mut applied);
        }
        let details = ParseDetails {
            metrics: ParseMetrics {
                total: total_start.elapsed(),
                tokenize: tokenize_elapsed,
                matching,
                validate,
            },
            token_count: result.tokens().len(),
            applied,
            unmatched: result
                .unmatched_tokens()
                .iter()
                .map(|t| t.text.clone())
                .collect(),
            unparsed: result
                .unparsed_tokens()
                .iter()
                .map(|t| t.text.clone())
                .collect(),
            diagnostics: result
                .diagnostics()
                .iter()
                .map(|d| d.message.clone())
                .collect(),
        };
        VerboseParse { result, details }
    }
}

fn summarize(applied: AppliedRef<'_>, depth: usize, out: &mut Vec<AppliedSummary>) {
    out.push(AppliedSummary {
        name: applied.name().to_string(),
        trigger: applied.trigger().to_string(),
        depth,
        arguments: applied.arguments().len(),
    });
    for child in applied.children() {
        summarize(child, depth + 1, out);
    }
}

/// Result from [`Parser::parse_verbose`].
#[derive(Debug)]
pub struct VerboseParse {
    pub result: ParseResult,
    pub details: ParseDetails,
}

/// Parse `input` against `model` with default flags and messages.
pub fn parse(model: impl Into<Arc<SymbolModel>>, input: &str) -> ParseResult {
    Parser::new(model).parse(input)
}

/// Parse a caller-tokenized vector against `model` with default flags and
/// messages.
pub fn parse_tokens<S: AsRef<str>>(
    model: impl Into<Arc<SymbolModel>>,
    args: &[S],
) -> ParseResult {
    Parser::new(model).parse_tokens(args)
}
