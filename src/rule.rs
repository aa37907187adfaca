//! Argument rules: arity, validation, defaults, materialization, suggestions.
//!
//! Every symbol carries exactly one [`ArgumentRule`] describing what the
//! matcher may capture for it. The rule is consulted twice:
//!
//! - **During the walk**: after each tentatively captured argument the rule is
//!   re-checked; a failure rolls the capture back (the matcher's single-token
//!   backtracking step).
//! - **After the walk**: the final captured list (with a lazily injected
//!   default, if any) is checked once more to produce diagnostics.
//!
//! Rule failures are plain [`ArgError`] values, rendered into user-facing text
//! by the [`Messages`](crate::Messages) catalog at result construction. They
//! are never panics.

use std::any::Any;
use std::collections::BTreeSet;

// --- Arity -------------------------------------------------------------------

/// Minimum/maximum argument-token count a rule accepts.
///
/// `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    pub const ZERO: Arity = Arity { min: 0, max: Some(0) };
    pub const ZERO_OR_ONE: Arity = Arity { min: 0, max: Some(1) };
    pub const EXACTLY_ONE: Arity = Arity { min: 1, max: Some(1) };
    pub const ZERO_OR_MORE: Arity = Arity { min: 0, max: None };
    pub const ONE_OR_MORE: Arity = Arity { min: 1, max: None };

    /// A custom arity. Bounds are validated at model construction
    /// (`SymbolModel` rejects `min > max`).
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Arity { min, max }
    }

    /// True if a symbol holding `captured` arguments may take another one.
    pub(crate) fn has_capacity(&self, captured: usize) -> bool {
        self.max.map_or(true, |max| captured < max)
    }
}

impl Default for Arity {
    fn default() -> Self {
        Arity::ZERO
    }
}

// --- Rule failures -----------------------------------------------------------

/// Structured rule failure, produced by arity checks and validators.
///
/// Rendering into a message happens later, through the catalog; keeping the
/// category structured lets callers match on it and lets the catalog localize
/// the wording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// Fewer arguments captured than the arity minimum.
    MissingRequired,
    /// More arguments captured than the arity maximum.
    TooMany { max: usize, actual: usize },
    /// An argument fell outside a fixed allowed set.
    NotInAllowedSet { value: String, allowed: Vec<String> },
    /// A path argument named a file that does not exist.
    FileMissing { path: String },
    /// Failure from a caller-supplied validator, already worded.
    Custom(String),
}

// --- Closure types -----------------------------------------------------------

/// A validator inspects the captured arguments and either accepts them or
/// yields a hard error. Validators short-circuit: the first failure wins.
pub type Validator = Box<dyn Fn(&[String]) -> Result<(), ArgError> + Send + Sync>;

/// Lazily evaluated default value, consulted only when nothing was captured.
pub type DefaultSupplier = Box<dyn Fn() -> String + Send + Sync>;

/// Turns the captured argument strings into a typed, type-erased value.
pub type Materializer =
    Box<dyn Fn(&[String]) -> Result<Box<dyn Any + Send + Sync>, String> + Send + Sync>;

/// Where completion values for an argument position come from.
pub enum SuggestionSource {
    /// A fixed list of candidate values.
    Static(Vec<String>),
    /// A callback evaluated against the partial token under the cursor.
    Dynamic(Box<dyn Fn(&str) -> Vec<String> + Send + Sync>),
}

impl std::fmt::Debug for SuggestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionSource::Static(values) => f.debug_tuple("Static").field(values).finish(),
            SuggestionSource::Dynamic(_) => f.debug_tuple("Dynamic").field(&"<function>").finish(),
        }
    }
}

// --- ArgumentRule ------------------------------------------------------------

/// What a symbol may capture: arity bounds, an ordered validator list, an
/// optional lazy default, an optional materializer, and suggestion sources.
pub struct ArgumentRule {
    pub arity: Arity,
    pub(crate) validators: Vec<Validator>,
    pub(crate) default: Option<DefaultSupplier>,
    pub(crate) materializer: Option<Materializer>,
    pub(crate) suggestions: Vec<SuggestionSource>,
}

impl std::fmt::Debug for ArgumentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentRule")
            .field("arity", &self.arity)
            .field("validators", &self.validators.len())
            .field("default", &self.default.is_some())
            .field("materializer", &self.materializer.is_some())
            .field("suggestions", &self.suggestions)
            .finish()
    }
}

impl Default for ArgumentRule {
    fn default() -> Self {
        ArgumentRule::new(Arity::ZERO)
    }
}

impl ArgumentRule {
    pub fn new(arity: Arity) -> Self {
        ArgumentRule {
            arity,
            validators: Vec::new(),
            default: None,
            materializer: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_validator(
        mut self,
        validator: impl Fn(&[String]) -> Result<(), ArgError> + Send + Sync + 'static,
    ) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn with_default(mut self, supplier: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.default = Some(Box::new(supplier));
        self
    }

    pub fn with_materializer(
        mut self,
        materializer: impl Fn(&[String]) -> Result<Box<dyn Any + Send + Sync>, String>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        self.materializer = Some(Box::new(materializer));
        self
    }

    pub fn with_suggestions(mut self, source: SuggestionSource) -> Self {
        self.suggestions.push(source);
        self
    }

    /// Compose two rules. Validators run in sequence (left first, first
    /// failure wins), suggestion sources are unioned, and the default value
    /// and materializer are first-non-null with left preferred. The left
    /// arity is kept.
    pub fn and(mut self, other: ArgumentRule) -> ArgumentRule {
        self.validators.extend(other.validators);
        self.suggestions.extend(other.suggestions);
        if self.default.is_none() {
            self.default = other.default;
        }
        if self.materializer.is_none() {
            self.materializer = other.materializer;
        }
        self
    }

    /// Check `args` against the arity bounds and then each validator in
    /// order. Returns the first failure, if any.
    pub(crate) fn check(&self, args: &[String]) -> Option<ArgError> {
        if args.len() < self.arity.min {
            return Some(ArgError::MissingRequired);
        }
        if let Some(max) = self.arity.max {
            if args.len() > max {
                return Some(ArgError::TooMany { max, actual: args.len() });
            }
        }
        for validator in &self.validators {
            if let Err(err) = validator(args) {
                return Some(err);
            }
        }
        None
    }

    /// Evaluate every suggestion source against `partial`.
    pub(crate) fn suggestion_values(&self, partial: &str) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for source in &self.suggestions {
            match source {
                SuggestionSource::Static(values) => out.extend(values.iter().cloned()),
                SuggestionSource::Dynamic(f) => out.extend(f(partial)),
            }
        }
        out
    }
}

// --- Stock validators --------------------------------------------------------

/// Validators shipped with the engine.
pub mod validators {
    use super::ArgError;

    /// Every captured argument must be one of `allowed`.
    pub fn allowed_values<S: Into<String>>(
        allowed: impl IntoIterator<Item = S>,
    ) -> impl Fn(&[String]) -> Result<(), ArgError> + Send + Sync {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        move |args: &[String]| {
            for arg in args {
                if !allowed.contains(arg) {
                    return Err(ArgError::NotInAllowedSet {
                        value: arg.clone(),
                        allowed: allowed.clone(),
                    });
                }
            }
            Ok(())
        }
    }

    /// Every captured argument must name an existing file.
    pub fn file_exists() -> impl Fn(&[String]) -> Result<(), ArgError> + Send + Sync {
        |args: &[String]| {
            for arg in args {
                if !std::path::Path::new(arg).exists() {
                    return Err(ArgError::FileMissing { path: arg.clone() });
                }
            }
            Ok(())
        }
    }

    /// Wrap a plain string-error predicate into a validator.
    pub fn custom(
        f: impl Fn(&[String]) -> Result<(), String> + Send + Sync,
    ) -> impl Fn(&[String]) -> Result<(), ArgError> + Send + Sync {
        move |args: &[String]| f(args).map_err(ArgError::Custom)
    }
}

// --- Stock materializers -----------------------------------------------------

/// Materializers shipped with the engine.
pub mod materialize {
    use std::any::Any;
    use std::str::FromStr;

    /// Parse the single captured argument into `T`.
    pub fn single<T>() -> impl Fn(&[String]) -> Result<Box<dyn Any + Send + Sync>, String> + Send + Sync
    where
        T: FromStr + Any + Send + Sync,
        T::Err: std::fmt::Display,
    {
        |args: &[String]| {
            let raw = args
                .first()
                .ok_or_else(|| "no argument to materialize".to_string())?;
            raw.parse::<T>()
                .map(|value| Box::new(value) as Box<dyn Any + Send + Sync>)
                .map_err(|err| format!("could not parse {raw:?}: {err}"))
        }
    }
}

#[cfg(test)]
mod rule_tests {
    use super::*;

    #[test]
    fn arity_bounds() {
        let cases: Vec<(Arity, usize, bool)> = vec![
            (Arity::ZERO, 0, true),
            (Arity::ZERO, 1, false),
            (Arity::EXACTLY_ONE, 0, false),
            (Arity::EXACTLY_ONE, 1, true),
            (Arity::EXACTLY_ONE, 2, false),
            (Arity::ZERO_OR_ONE, 1, true),
            (Arity::ZERO_OR_ONE, 2, false),
            (Arity::ZERO_OR_MORE, 0, true),
            (Arity::ZERO_OR_MORE, 9, true),
            (Arity::ONE_OR_MORE, 0, false),
            (Arity::ONE_OR_MORE, 3, true),
        ];

        for (arity, count, expect_ok) in cases {
            let rule = ArgumentRule::new(arity);
            let args: Vec<String> = (0..count).map(|i| format!("a{i}")).collect();
            let outcome = rule.check(&args);
            assert_eq!(
                outcome.is_none(),
                expect_ok,
                "arity {arity:?} with {count} args gave {outcome:?}"
            );
        }
    }

    #[test]
    fn validators_short_circuit_in_order() {
        let rule = ArgumentRule::new(Arity::ZERO_OR_MORE)
            .with_validator(|_| Err(ArgError::Custom("first".into())))
            .with_validator(|_| Err(ArgError::Custom("second".into())));

        assert_eq!(rule.check(&[]), Some(ArgError::Custom("first".into())));
    }

    #[test]
    fn allowed_values_reports_offender() {
        let rule = ArgumentRule::new(Arity::ZERO_OR_MORE)
            .with_validator(validators::allowed_values(["one", "two"]));

        assert_eq!(rule.check(&["one".into()]), None);
        assert_eq!(
            rule.check(&["three".into()]),
            Some(ArgError::NotInAllowedSet {
                value: "three".into(),
                allowed: vec!["one".into(), "two".into()],
            })
        );
    }

    #[test]
    fn and_prefers_left_default_and_materializer() {
        let left = ArgumentRule::new(Arity::EXACTLY_ONE).with_default(|| "left".to_string());
        let right = ArgumentRule::new(Arity::ZERO)
            .with_default(|| "right".to_string())
            .with_validator(|_| Err(ArgError::Custom("right validator".into())));

        let combined = left.and(right);
        assert_eq!(combined.arity, Arity::EXACTLY_ONE);
        assert_eq!((combined.default.as_ref().unwrap())(), "left");
        // The right-hand validator still runs.
        assert_eq!(
            combined.check(&["x".into()]),
            Some(ArgError::Custom("right validator".into()))
        );
    }

    #[test]
    fn and_takes_right_default_when_left_has_none() {
        let combined =
            ArgumentRule::new(Arity::ZERO_OR_ONE).and(ArgumentRule::default().with_default(|| "right".to_string()));
        assert_eq!((combined.default.as_ref().unwrap())(), "right");
    }

    #[test]
    fn suggestion_sources_union() {
        let rule = ArgumentRule::new(Arity::EXACTLY_ONE)
            .with_suggestions(SuggestionSource::Static(vec!["beta".into(), "alpha".into()]))
            .with_suggestions(SuggestionSource::Dynamic(Box::new(|partial| {
                vec![format!("{partial}-dyn")]
            })));

        let values: Vec<String> = rule.suggestion_values("a").into_iter().collect();
        assert_eq!(values, vec!["a-dyn".to_string(), "alpha".into(), "beta".into()]);
    }

    #[test]
    fn materialize_single_parses_and_reports() {
        let m = materialize::single::<u32>();
        let ok = m(&["42".into()]).unwrap();
        assert_eq!(ok.downcast_ref::<u32>(), Some(&42));

        let err = m(&["nope".into()]).unwrap_err();
        assert!(err.contains("nope"), "unexpected error: {err}");
    }
}
