//! Error types for flag definition, parsing and lookup.

use thiserror::Error;

/// Errors produced by a [`FlagSet`](crate::FlagSet).
///
/// `HelpRequested` is a control-flow signal rather than a failure: it is
/// returned when `-h`/`--help` appears and no flag by that name is defined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlagError {
    /// Flag name is empty.
    #[error("flag name cannot be empty")]
    EmptyName,
    /// Flag name starts with a dash.
    #[error("invalid flag name: {0}")]
    InvalidName(String),
    /// Shorthand is not an ASCII alphanumeric character.
    #[error("invalid shorthand {shorthand:?} for flag --{name}")]
    InvalidShorthand { name: String, shorthand: char },
    /// A flag with this name already exists in the set.
    #[error("{set} flag redefined: {name}")]
    Redefined { set: String, name: String },
    /// The shorthand is already used by another flag in the set.
    #[error("unable to redefine {shorthand:?} shorthand in {set:?} flagset: it's already used for {existing:?} flag")]
    ShorthandRedefined {
        set: String,
        shorthand: char,
        existing: String,
    },
    /// `--name` did not match any defined flag.
    #[error("unknown flag: --{0}")]
    UnknownFlag(String),
    /// `-x` did not match any defined shorthand.
    #[error("unknown shorthand flag: {shorthand:?} in {token}")]
    UnknownShorthand { shorthand: char, token: String },
    /// A value-taking flag was the last token.
    #[error("flag needs an argument: {0}")]
    MissingValue(String),
    /// The raw value could not be converted to the flag's type.
    #[error("invalid argument {value:?} for {flag:?} flag: {reason}")]
    InvalidValue {
        value: String,
        flag: String,
        reason: String,
    },
    /// Lookup of a flag that is not defined in the set.
    #[error("flag accessed but not defined: {0}")]
    NotDefined(String),
    /// Lookup with a getter for the wrong type.
    #[error("trying to get {expected} value of flag of type {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    /// `-h` or `--help` was given without a flag of that name.
    #[error("help requested")]
    HelpRequested,
}

impl FlagError {
    /// Returns `true` for the `-h`/`--help` signal.
    pub fn is_help(&self) -> bool {
        matches!(self, FlagError::HelpRequested)
    }
}
