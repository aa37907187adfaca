extern crate self as argot;

#[macro_use]
mod macros;
mod api;
mod engine;
mod messages;
mod result;
mod rule;
mod suggest;
mod symbol;


pub use api::{Parser, ParserFlags, VerboseParse, parse, parse_tokens};
pub use engine::{AppliedSummary, ParseDetails, ParseMetrics, tokenize, tokenize_vec};
pub use messages::{DefaultMessages, Messages};
pub use result::{AppliedId, AppliedRef, Diagnostic, ParseResult};
pub use rule::{ArgError, ArgumentRule, Arity, SuggestionSource, materialize, validators};
pub use suggest::suggest;
pub use symbol::{ModelError, Symbol, SymbolId, SymbolModel, SymbolRef};

// --- Core token types --------------------------------------------------------

/// How a token participates in the grammar.
///
/// The tokenizer only ever produces `Unknown`, `Argument` (after the `--`
/// marker), and `EndOfArguments`; the matcher refines `Unknown` into
/// `Argument`, `Option`, or `Command` against the symbol model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A plain value token, candidate for argument capture.
    Argument,
    /// An option-shaped token (`-x`, `--long`, optionally `/x`).
    Option,
    /// A token matching a command alias.
    Command,
    /// The literal `--` marker; halts structural parsing.
    EndOfArguments,
    /// Not yet classified against a symbol model.
    Unknown,
}

/// A single command-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text, with quotes already stripped.
    pub text: String,
    pub kind: TokenKind,
}

impl Token {
    pub(crate) fn new(text: impl Into<String>, kind: TokenKind) -> Self {
        Token { text: text.into(), kind }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
