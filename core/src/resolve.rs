//! Subcommand resolution.
//!
//! Resolution walks the tree from a root command, one name token per level.
//! At each level flag tokens are skipped with the classifier, using the
//! current command's effective flags to tell which flags swallow a value.

use cmdtree_flags::positional_indices;
use tracing::debug;

use crate::error::{CommandError, Result};
use crate::tree::{CommandId, CommandTree};

/// Outcome of a successful resolution.
///
/// `Help` is not an error: it asks the caller to show usage for `command`
/// instead of running it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Run `command`; `args` still contains its flag tokens.
    Run { command: CommandId, args: Vec<String> },
    /// The help token appeared where a subcommand name was expected.
    Help { command: CommandId },
}

impl Resolution {
    pub fn command(&self) -> CommandId {
        match self {
            Resolution::Run { command, .. } | Resolution::Help { command } => *command,
        }
    }

    /// Residual arguments; always empty for `Help`.
    pub fn args(&self) -> &[String] {
        match self {
            Resolution::Run { args, .. } => args,
            Resolution::Help { .. } => &[],
        }
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Resolution::Help { .. })
    }
}

impl CommandTree {
    /// Finds the command `args` addresses, starting at `root`.
    ///
    /// `args[0]` must be `root`'s name (the program name). Each following
    /// positional token selects a child, until no positional token is left
    /// or the help token is reached.
    ///
    /// # Errors
    ///
    /// [`CommandError::EmptyArguments`] for an empty vector, and
    /// [`CommandError::NotFound`] naming the first token that matches no
    /// command.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_core::{Command, CommandTree, Resolution};
    ///
    /// let mut tree = CommandTree::new();
    /// let root = tree.insert(Command::new("prog"));
    /// let test = tree.insert(Command::new("test").with_run(|_| Ok(())));
    /// tree.add_command(root, &[test]);
    ///
    /// let args: Vec<String> = ["prog", "test", "-v"].iter().map(|s| s.to_string()).collect();
    /// let resolution = tree.resolve(root, &args).unwrap();
    /// assert_eq!(resolution, Resolution::Run { command: test, args: vec!["-v".into()] });
    /// ```
    pub fn resolve(&self, root: CommandId, args: &[String]) -> Result<Resolution> {
        if args.is_empty() {
            return Err(CommandError::EmptyArguments);
        }
        self.resolve_from(root, args)
    }

    fn resolve_from(&self, id: CommandId, args: &[String]) -> Result<Resolution> {
        let Some(first) = args.first() else {
            return Err(CommandError::EmptyArguments);
        };
        if first != self.name(id) {
            return Err(CommandError::command_not_found(first));
        }

        let rest = &args[1..];
        let flags = self.collect_effective(id);
        let positions = positional_indices(rest, &flags);

        let Some(&index) = positions.first() else {
            debug!(command = %self.command_path(id), "resolved");
            return Ok(Resolution::Run {
                command: id,
                args: rest.to_vec(),
            });
        };

        let token = &rest[index];
        if *token == self.settings().help_command {
            debug!(command = %self.command_path(id), "help requested");
            return Ok(Resolution::Help { command: id });
        }
        if self.settings().leaf_arguments && !self.has_subcommands(id) {
            debug!(command = %self.command_path(id), "resolved with positional arguments");
            return Ok(Resolution::Run {
                command: id,
                args: rest.to_vec(),
            });
        }

        let Some(child) = self.find_child(id, token) else {
            return Err(CommandError::command_not_found(token));
        };
        debug!(
            command = %self.command_path(id),
            subcommand = %token,
            "descending into subcommand"
        );
        self.resolve_from(child, &descend(rest, index))
    }
}

/// Moves the token at `index` to the front, keeping the order of the rest.
fn descend(rest: &[String], index: usize) -> Vec<String> {
    let mut next = Vec::with_capacity(rest.len());
    next.push(rest[index].clone());
    next.extend_from_slice(&rest[..index]);
    next.extend_from_slice(&rest[index + 1..]);
    next
}
