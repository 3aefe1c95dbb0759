//! Flag definition validation.
//!
//! Catches malformed names, bad shorthands and redefinitions before a flag
//! is added to a set.

use crate::{Flag, FlagError};

/// Validates `flag` against the flags already present in the set `set`.
///
/// # Examples
///
/// ```
/// use cmdtree_flags::{Flag, FlagError, validate_flag};
///
/// let existing = vec![Flag::boolean("verbose", Some('v'), false, "")];
///
/// assert!(validate_flag("app", &existing, &Flag::boolean("quiet", Some('q'), false, "")).is_ok());
///
/// let err = validate_flag("app", &existing, &Flag::boolean("version", Some('v'), false, ""))
///     .unwrap_err();
/// assert!(matches!(err, FlagError::ShorthandRedefined { .. }));
/// ```
pub fn validate_flag(set: &str, existing: &[Flag], flag: &Flag) -> Result<(), FlagError> {
    if flag.name.trim().is_empty() {
        return Err(FlagError::EmptyName);
    }
    if flag.name.starts_with('-') || flag.name.contains('=') || flag.name.contains(' ') {
        return Err(FlagError::InvalidName(flag.name.clone()));
    }

    if let Some(c) = flag.shorthand {
        if !c.is_ascii_alphanumeric() {
            return Err(FlagError::InvalidShorthand {
                name: flag.name.clone(),
                shorthand: c,
            });
        }
    }

    for other in existing {
        if other.name == flag.name {
            return Err(FlagError::Redefined {
                set: set.to_string(),
                name: flag.name.clone(),
            });
        }
        if flag.shorthand.is_some() && other.shorthand == flag.shorthand {
            return Err(FlagError::ShorthandRedefined {
                set: set.to_string(),
                shorthand: flag.shorthand.unwrap_or_default(),
                existing: other.name.clone(),
            });
        }
    }

    Ok(())
}
