//! Command trees with scoped flags, subcommand resolution and usage output.
//!
//! This crate organises a command-line program as a tree of commands:
//!
//! - [`CommandTree`] — an arena of [`Command`]s addressed by [`CommandId`]
//!   handles. Registration, tree-shape queries and per-command flag scopes
//!   (global, local and effective flag sets) live here.
//! - [`CommandTree::resolve`] — walks the tree along an argument vector and
//!   returns a [`Resolution`]: the command to run with its residual arguments,
//!   or a request to show help.
//! - [`CommandTree::usage`] — renders a command's usage through an inherited
//!   usage function or template, or the default layout in the configured
//!   [`OutputFormat`].
//! - [`CommandTree::execute_from`] — resolve, parse flags and run in one go.
//!
//! Behaviour that is shared by the whole tree is configured with
//! [`Settings`], which can be loaded from YAML.
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//!
//! use cmdtree_core::*;
//!
//! let mut tree = CommandTree::new();
//! let root = tree.insert(Command::new("app").with_short("An example app"));
//! let greet = tree.insert(
//!     Command::new("greet [name]")
//!         .with_short("Print a greeting")
//!         .with_run(|inv| {
//!             let name = inv.flags().get_string("name")?;
//!             writeln!(inv.out(), "hello, {name}")?;
//!             Ok(())
//!         }),
//! );
//! tree.add_command(root, &[greet]);
//! tree.global_flags(root).bool_p("verbose", 'v', false, "Enable verbose output");
//! tree.local_flags(greet).string_p("name", 'n', "world", "Who to greet");
//!
//! let args: Vec<String> = ["app", "greet", "-n", "Ada"].iter().map(|s| s.to_string()).collect();
//! let mut out = Vec::new();
//! tree.execute_from(root, &args, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "hello, Ada\n");
//!
//! assert_eq!(tree.command_path(greet), "app greet");
//! assert_eq!(tree.use_line(greet), "app greet [name] [flags]");
//! ```

mod command;
mod error;
mod execute;
mod output;
mod resolve;
mod scope;
mod settings;
mod tree;
mod usage;

pub use cmdtree_flags::{Flag, FlagError, FlagKind, FlagSet, FlagValue};
pub use command::{Command, Invocation, RunFn, UsageFn};
pub use error::{BoxError, CommandError, ObjectKind, Result};
pub use output::{OutputFormat, format_usage};
pub use resolve::Resolution;
pub use settings::Settings;
pub use tree::{CommandId, CommandTree};
pub use usage::{FlagEntry, SubcommandEntry, UsageView, render_template, render_usage};
