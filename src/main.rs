mod debug_report;

use std::io::{self, IsTerminal, Read};

use argot::{
    ArgumentRule, Arity, ModelError, Parser, SuggestionSource, Symbol, SymbolModel, materialize,
    suggest, validators,
};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let model = match demo_model() {
        Ok(model) => model,
        Err(err) => {
            eprintln!("error: demo model failed to build: {err}");
            std::process::exit(1);
        }
    };

    let parser = Parser::new(model);
    let run = parser.parse_verbose(&config.input);
    debug_report::print_run(&config.input, &run, config.color);

    if let Some(position) = config.cursor {
        let candidates = suggest(&run.result, Some(position));
        debug_report::print_suggestions(position, &candidates, config.color);
    }
}

struct CliConfig {
    input: String,
    cursor: Option<usize>,
    color: bool,
}

/// The binary's own command line, parsed with the library it ships.
fn cli_model() -> Result<SymbolModel, ModelError> {
    SymbolModel::from_roots(vec![
        Symbol::option("-i|--input")
            .describe("Command line to parse")
            .arity(Arity::EXACTLY_ONE),
        Symbol::option("--cursor")
            .describe("Byte position for completion suggestions")
            .rule(
                ArgumentRule::new(Arity::EXACTLY_ONE)
                    .with_materializer(materialize::single::<usize>()),
            ),
        Symbol::option("--color").describe("Force ANSI color output"),
        Symbol::option("--no-color").describe("Disable ANSI color output"),
        Symbol::option("-h|--help").describe("Show this help message"),
        Symbol::option("-V|--version").describe("Print version information"),
    ])
}

fn parse_args() -> Result<CliConfig, String> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let model = cli_model().map_err(|err| format!("error: {err}"))?;
    let result = Parser::new(model).parse_tokens(&argv);

    if result.has_symbol("help") {
        print!("{}", help_text());
        std::process::exit(0);
    }
    if result.has_symbol("version") {
        println!("argot {}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }
    if let Some(diagnostic) = result.diagnostics().first() {
        return Err(format!("error: {}", diagnostic.message));
    }

    let mut color = io::stdout().is_terminal();
    if result.has_symbol("color") {
        color = true;
    }
    if result.has_symbol("no-color") {
        color = false;
    }

    let cursor = match result.get("cursor") {
        Some(applied) => {
            let value = applied
                .value()
                .map_err(|err| format!("error: --cursor: {err}"))?;
            value.downcast_ref::<usize>().copied()
        }
        None => None,
    };

    // With an options-only model, plain words land in the unmatched list;
    // treat them (and anything after `--`) as the input line.
    let mut input = result
        .get("input")
        .map(|applied| applied.arguments().join(" "))
        .unwrap_or_default();
    if input.trim().is_empty() {
        let stray: Vec<String> = result
            .unmatched_tokens()
            .iter()
            .chain(result.unparsed_tokens())
            .map(|t| t.text.clone())
            .collect();
        input = stray.join(" ");
    }
    if input.trim().is_empty() {
        input = read_stdin_input()?;
    }
    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, cursor, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer.trim_end().to_string())
}

/// The model the input line is parsed against: a small package-manager-style
/// CLI exercising subcommands, arity, defaults, allowed values, and
/// suggestion sources.
fn demo_model() -> Result<SymbolModel, ModelError> {
    SymbolModel::from_roots(vec![
        Symbol::command("pkg")
            .describe("Demo package manager")
            .child(Symbol::option("-v|--verbose").describe("Verbose output"))
            .child(
                Symbol::command("install")
                    .describe("Install packages")
                    .arity(Arity::ONE_OR_MORE)
                    .child(Symbol::option("-f|--force").describe("Reinstall even if present"))
                    .child(
                        Symbol::option("--registry").describe("Registry to install from").rule(
                            ArgumentRule::new(Arity::EXACTLY_ONE)
                                .with_default(|| "https://registry.example".to_string()),
                        ),
                    ),
            )
            .child(
                Symbol::command("remove")
                    .describe("Remove installed packages")
                    .arity(Arity::ONE_OR_MORE),
            )
            .child(
                Symbol::command("search")
                    .describe("Search the registry")
                    .arity(Arity::EXACTLY_ONE)
                    .child(
                        Symbol::option("--format").describe("Output format").rule(
                            ArgumentRule::new(Arity::EXACTLY_ONE)
                                .with_validator(validators::allowed_values(["table", "json"]))
                                .with_suggestions(SuggestionSource::Static(vec![
                                    "table".to_string(),
                                    "json".to_string(),
                                ])),
                        ),
                    ),
            ),
    ])
}

fn help_text() -> String {
    format!(
        "argot {version}

Backtracking command-line parsing engine, demo CLI.
Parses the input line against a built-in `pkg` symbol model and prints the
applied-symbol tree, diagnostics, and stage timings.

Usage:
  argot [OPTIONS] [--] <input...>
  argot [OPTIONS] --input <line>

Options:
  -i, --input <line>     Command line to parse. If omitted, remaining
                         arguments are used, then stdin.
  --cursor <byte>        Also print completion suggestions at this position.
  --color                Force ANSI color output.
  --no-color             Disable ANSI color output.
  -h, --help             Show this help message.
  -V, --version          Print version information.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION")
    )
}
