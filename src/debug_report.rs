use argot::VerboseParse;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
    pub const RED: &str = "\x1b[31m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(input: &str, run: &VerboseParse, color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.bold(palette.paint(format!("⚙  Parsing: \"{input}\""), ansi::CYAN))
    );

    println!("\n{}", palette.paint("━━━ Applied symbols ━━━", ansi::GRAY));
    if run.details.applied.is_empty() {
        println!("  {}", palette.dim("(nothing applied)"));
    }
    for summary in &run.details.applied {
        let indent = "  ".repeat(summary.depth + 1);
        let args = if summary.arguments > 0 {
            palette.dim(format!(" ({} arg(s))", summary.arguments))
        } else {
            String::new()
        };
        println!(
            "{indent}{}{}  {}",
            palette.paint(&summary.name, ansi::GREEN),
            args,
            palette.dim(format!("via \"{}\"", summary.trigger)),
        );
    }

    println!("\n{}", palette.paint("━━━ Diagram ━━━", ansi::GRAY));
    println!("  {}", run.result.diagram());

    if !run.details.unmatched.is_empty() {
        println!("\n{}", palette.paint("━━━ Unmatched ━━━", ansi::GRAY));
        println!("  {}", palette.paint(run.details.unmatched.join(" "), ansi::YELLOW));
    }
    if !run.details.unparsed.is_empty() {
        println!("\n{}", palette.paint("━━━ Unparsed (after --) ━━━", ansi::GRAY));
        println!("  {}", palette.dim(run.details.unparsed.join(" ")));
    }

    if !run.details.diagnostics.is_empty() {
        println!("\n{}", palette.paint("━━━ Diagnostics ━━━", ansi::GRAY));
        for message in &run.details.diagnostics {
            println!("  {}", palette.paint(message, ansi::RED));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    let metrics = &run.details.metrics;
    println!(
        "  tokens: {}  tokenize: {:?}  matching: {:?}  validate: {:?}  total: {:?}",
        run.details.token_count, metrics.tokenize, metrics.matching, metrics.validate, metrics.total,
    );
}

pub fn print_suggestions(position: usize, candidates: &[String], color: bool) {
    let palette = ansi::Palette::new(color);
    println!(
        "\n{}",
        palette.paint(format!("━━━ Suggestions at byte {position} ━━━"), ansi::GRAY)
    );
    if candidates.is_empty() {
        println!("  {}", palette.dim("(none)"));
    }
    for candidate in candidates {
        println!("  {}", palette.paint(candidate, ansi::CYAN));
    }
}
