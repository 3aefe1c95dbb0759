//! Flag sets and flag-token classification.
//!
//! This crate provides the flag handling used by command trees:
//!
//! - [`Flag`] — a long name, optional shorthand, typed [`FlagValue`] and
//!   usage text.
//! - [`FlagSet`] — an ordered collection of flags that parses argument
//!   tokens, answers typed lookups, renders usage listings and can merge the
//!   definitions of another set.
//! - [`strip_flags`] / [`positional_indices`] — separate positional tokens
//!   from flag tokens for subcommand routing.
//!
//! Definition checks live in [`validate_flag`].
//!
//! # Example
//!
//! ```
//! use cmdtree_flags::*;
//!
//! let mut flags = FlagSet::new("mycli");
//! flags
//!     .bool_p("verbose", 'v', false, "Enable verbose output")
//!     .int_p("port", 'p', 8080, "Port to listen on");
//!
//! let args: Vec<String> = ["-v", "serve", "-p", "9000"].iter().map(|s| s.to_string()).collect();
//! assert_eq!(strip_flags(&args, &flags), vec!["serve"]);
//!
//! flags.parse(&args).unwrap();
//! assert!(flags.get_bool("verbose").unwrap());
//! assert_eq!(flags.get_int("port").unwrap(), 9000);
//! assert_eq!(flags.args(), ["serve"]);
//! ```

mod classify;
mod error;
mod set;
mod types;
mod validate;

pub use classify::{positional_indices, strip_flags};
pub use error::FlagError;
pub use set::FlagSet;
pub use types::*;
pub use validate::validate_flag;
