//! Flag definitions and typed flag values.
//!
//! A [`Flag`] couples a long name and an optional single-character shorthand
//! with a typed [`FlagValue`]. The value starts out equal to the default and
//! is replaced (or, for string slices, accumulated) as occurrences are parsed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FlagError;

/// Kind of value a flag accepts.
///
/// # Examples
///
/// ```
/// use cmdtree_flags::{Flag, FlagKind};
///
/// let flag = Flag::int("jobs", Some('j'), 4, "parallel jobs");
/// assert_eq!(flag.kind(), FlagKind::Int);
/// assert!(flag.kind().takes_value());
/// assert!(!FlagKind::Bool.takes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagKind {
    /// Switch; present means `true`.
    Bool,
    /// Signed integer.
    Int,
    /// Free-form string.
    String,
    /// Repeatable, comma-separated strings.
    StringSlice,
}

impl FlagKind {
    /// Returns `true` if the flag consumes a value token when none is attached.
    pub fn takes_value(self) -> bool {
        !matches!(self, FlagKind::Bool)
    }

    /// Type label shown in usage listings (empty for booleans).
    pub fn type_label(self) -> &'static str {
        match self {
            FlagKind::Bool => "",
            FlagKind::Int => "int",
            FlagKind::String => "string",
            FlagKind::StringSlice => "strings",
        }
    }
}

/// A typed flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
    String(String),
    StringSlice(Vec<String>),
}

impl FlagValue {
    /// The kind this value belongs to.
    pub fn kind(&self) -> FlagKind {
        match self {
            FlagValue::Bool(_) => FlagKind::Bool,
            FlagValue::Int(_) => FlagKind::Int,
            FlagValue::String(_) => FlagKind::String,
            FlagValue::StringSlice(_) => FlagKind::StringSlice,
        }
    }

    /// Returns `true` for the zero value of the kind (`false`, `0`, `""`, `[]`).
    pub fn is_zero(&self) -> bool {
        match self {
            FlagValue::Bool(b) => !b,
            FlagValue::Int(n) => *n == 0,
            FlagValue::String(s) => s.is_empty(),
            FlagValue::StringSlice(v) => v.is_empty(),
        }
    }
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Bool(b) => write!(f, "{b}"),
            FlagValue::Int(n) => write!(f, "{n}"),
            FlagValue::String(s) => write!(f, "{s}"),
            FlagValue::StringSlice(v) => write!(f, "[{}]", v.join(",")),
        }
    }
}

/// A single flag definition together with its current value.
///
/// Use the constructors [`boolean`](Flag::boolean), [`int`](Flag::int),
/// [`string`](Flag::string) and [`string_slice`](Flag::string_slice), then
/// chain [`deprecated`](Flag::deprecated) or [`hidden`](Flag::hidden) if
/// needed.
///
/// # Examples
///
/// ```
/// use cmdtree_flags::{Flag, FlagValue};
///
/// let author = Flag::string("author", Some('a'), "YOUR NAME", "author name");
/// assert_eq!(author.name, "author");
/// assert_eq!(author.shorthand, Some('a'));
/// assert_eq!(author.value, FlagValue::String("YOUR NAME".into()));
/// assert!(!author.changed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    /// Long name, without leading dashes.
    pub name: String,
    /// Single-character shorthand, without the leading dash.
    pub shorthand: Option<char>,
    /// One-line help text.
    pub usage: String,
    /// Current value.
    pub value: FlagValue,
    /// Default value, as rendered in usage listings.
    pub default: FlagValue,
    /// Set once the flag has been seen on a command line.
    pub changed: bool,
    /// Deprecation notice; deprecated flags still parse but are not listed.
    pub deprecated: Option<String>,
    /// Hidden flags parse but are not listed.
    pub hidden: bool,
}

impl Flag {
    fn new(name: &str, shorthand: Option<char>, default: FlagValue, usage: &str) -> Self {
        Self {
            name: name.to_string(),
            shorthand,
            usage: usage.to_string(),
            value: default.clone(),
            default,
            changed: false,
            deprecated: None,
            hidden: false,
        }
    }

    /// Creates a boolean switch.
    pub fn boolean(name: &str, shorthand: Option<char>, default: bool, usage: &str) -> Self {
        Self::new(name, shorthand, FlagValue::Bool(default), usage)
    }

    /// Creates an integer flag.
    pub fn int(name: &str, shorthand: Option<char>, default: i64, usage: &str) -> Self {
        Self::new(name, shorthand, FlagValue::Int(default), usage)
    }

    /// Creates a string flag.
    pub fn string(name: &str, shorthand: Option<char>, default: &str, usage: &str) -> Self {
        Self::new(name, shorthand, FlagValue::String(default.to_string()), usage)
    }

    /// Creates a repeatable string flag; values may also be comma-separated.
    pub fn string_slice(
        name: &str,
        shorthand: Option<char>,
        default: &[&str],
        usage: &str,
    ) -> Self {
        let default = default.iter().map(|s| s.to_string()).collect();
        Self::new(name, shorthand, FlagValue::StringSlice(default), usage)
    }

    /// Marks the flag as deprecated with the given notice.
    pub fn deprecated(mut self, notice: &str) -> Self {
        self.deprecated = Some(notice.to_string());
        self
    }

    /// Hides the flag from usage listings.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The kind of value this flag accepts.
    pub fn kind(&self) -> FlagKind {
        self.default.kind()
    }

    /// Returns `true` if the flag is listed in usage output.
    pub fn is_listed(&self) -> bool {
        !self.hidden && self.deprecated.is_none()
    }

    /// Display form used in error messages, e.g. `-a, --author`.
    pub fn display_name(&self) -> String {
        match self.shorthand {
            Some(c) => format!("-{c}, --{}", self.name),
            None => format!("--{}", self.name),
        }
    }

    /// Applies one raw occurrence of the flag.
    ///
    /// Booleans accept `true`/`false`/`1`/`0`; slices append comma-separated
    /// items, replacing the default on the first occurrence.
    pub fn set(&mut self, raw: &str) -> Result<(), FlagError> {
        let invalid = |reason: String| FlagError::InvalidValue {
            value: raw.to_string(),
            flag: self.display_name(),
            reason,
        };
        let value = match self.kind() {
            FlagKind::Bool => match raw {
                "true" | "1" | "t" | "T" | "TRUE" | "True" => FlagValue::Bool(true),
                "false" | "0" | "f" | "F" | "FALSE" | "False" => FlagValue::Bool(false),
                _ => return Err(invalid("expected a boolean".to_string())),
            },
            FlagKind::Int => match raw.parse::<i64>() {
                Ok(n) => FlagValue::Int(n),
                Err(err) => return Err(invalid(err.to_string())),
            },
            FlagKind::String => FlagValue::String(raw.to_string()),
            FlagKind::StringSlice => {
                let mut items = match (&self.value, self.changed) {
                    (FlagValue::StringSlice(existing), true) => existing.clone(),
                    _ => Vec::new(),
                };
                items.extend(raw.split(',').map(str::to_string));
                FlagValue::StringSlice(items)
            }
        };
        self.value = value;
        self.changed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_int_rejects_garbage() {
        let mut flag = Flag::int("jobs", Some('j'), 1, "jobs");

        assert!(flag.set("8").is_ok());
        assert_eq!(flag.value, FlagValue::Int(8));

        let err = flag.set("eight").unwrap_err();
        assert!(matches!(err, FlagError::InvalidValue { .. }));
        assert_eq!(flag.value, FlagValue::Int(8));
    }

    #[test]
    fn test_string_slice_replaces_default_then_accumulates() {
        let mut flag = Flag::string_slice("tag", Some('t'), &["default"], "tags");

        flag.set("a,b").unwrap();
        flag.set("c").unwrap();

        assert_eq!(
            flag.value,
            FlagValue::StringSlice(vec!["a".into(), "b".into(), "c".into()])
        );
    }

    #[test]
    fn test_is_listed_excludes_hidden_and_deprecated() {
        assert!(Flag::boolean("a", None, false, "").is_listed());
        assert!(!Flag::boolean("a", None, false, "").hidden().is_listed());
        assert!(!Flag::boolean("a", None, false, "")
            .deprecated("use --b")
            .is_listed());
    }
}
