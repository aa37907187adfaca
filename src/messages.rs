//! The diagnostic message catalog.
//!
//! Parse-time problems are structured [`ArgError`](crate::ArgError) values;
//! this trait turns them into user-facing text when a
//! [`ParseResult`](crate::ParseResult) is assembled. The catalog is an
//! explicit value threaded into the [`Parser`](crate::Parser) — there is no
//! process-global state to override. Implement the trait (all methods have
//! defaults) and pass it via `Parser::with_messages` to reword or localize.

/// Wording for every diagnostic category the engine can raise.
pub trait Messages: Send + Sync {
    /// A symbol's arity minimum was not met. Commands and options use
    /// different wording.
    fn required_argument_missing(&self, name: &str, is_command: bool) -> String {
        if is_command {
            format!("Required argument missing for command: {name}")
        } else {
            format!("Required argument missing for option: {name}")
        }
    }

    /// A symbol's arity maximum was exceeded.
    fn too_many_arguments(&self, name: &str, max: usize, actual: usize) -> String {
        format!("{name} accepts at most {max} argument(s) but {actual} were provided")
    }

    /// An argument fell outside a fixed allowed set.
    fn unrecognized_argument(&self, value: &str, allowed: &[String]) -> String {
        format!(
            "Argument '{value}' not recognized. Must be one of: {}",
            allowed
                .iter()
                .map(|a| format!("'{a}'"))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }

    /// An option-shaped token matched nothing.
    fn unrecognized_option(&self, alias: &str) -> String {
        format!("Option '{alias}' is not recognized")
    }

    /// A command defines subcommands but none was applied.
    fn required_command_not_provided(&self, name: &str) -> String {
        format!("Required command was not provided for: {name}")
    }

    /// A plain token matched nothing under a command that treats unmatched
    /// tokens as errors.
    fn unrecognized_command_or_argument(&self, token: &str) -> String {
        format!("Unrecognized command or argument '{token}'")
    }

    /// A path argument named a missing file.
    fn file_does_not_exist(&self, path: &str) -> String {
        format!("File does not exist: {path}")
    }
}

/// The stock English catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {}

#[cfg(test)]
mod messages_tests {
    use super::*;

    struct Terse;

    impl Messages for Terse {
        fn required_argument_missing(&self, name: &str, _is_command: bool) -> String {
            format!("{name}: argument required")
        }
    }

    #[test]
    fn command_and_option_wording_differ() {
        let m = DefaultMessages;
        let for_command = m.required_argument_missing("push", true);
        let for_option = m.required_argument_missing("-x", false);
        assert!(for_command.contains("command"));
        assert!(for_option.contains("option"));
        assert_ne!(for_command, for_option);
    }

    #[test]
    fn overrides_replace_only_what_they_define() {
        let m = Terse;
        assert_eq!(m.required_argument_missing("-x", false), "-x: argument required");
        // Untouched categories keep the stock wording.
        assert_eq!(
            m.unrecognized_command_or_argument("blob"),
            DefaultMessages.unrecognized_command_or_argument("blob")
        );
    }

    #[test]
    fn unrecognized_argument_lists_allowed_values() {
        let rendered =
            DefaultMessages.unrecognized_argument("three", &["one".into(), "two".into()]);
        assert!(rendered.contains("'three'"));
        assert!(rendered.contains("'one', 'two'"));
    }
}
