//! Command definitions and the invocation handed to run behaviours.

use std::fmt;
use std::io::Write;
use std::rc::Rc;

use cmdtree_flags::FlagSet;

use crate::error::{BoxError, Result};
use crate::tree::{CommandId, CommandTree};

/// Behaviour executed when a command is the resolution target.
pub type RunFn = Rc<dyn Fn(&mut Invocation<'_>) -> std::result::Result<(), BoxError>>;

/// Replacement for the default usage output of a command and its descendants.
pub type UsageFn = Rc<dyn Fn(&CommandTree, CommandId, &mut dyn Write) -> Result<()>>;

/// A command definition, before or after it is inserted into a
/// [`CommandTree`].
///
/// The `synopsis` is the name token optionally followed by a hint of the
/// arguments the command takes, e.g. `"clone <repo> [dir]"`.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Command;
///
/// let cmd = Command::new("clone <repo> [dir]")
///     .with_short("Clone a repository")
///     .with_run(|_inv| Ok(()));
///
/// assert_eq!(cmd.name(), "clone");
/// assert!(cmd.is_runnable());
/// assert!(!Command::new("remote").is_runnable());
/// ```
#[derive(Clone, Default)]
pub struct Command {
    /// Name token plus optional argument hint.
    pub synopsis: String,
    /// One-line description shown in parent listings.
    pub short: String,
    /// Full description shown at the top of the command's usage.
    pub long: String,
    /// Example invocations.
    pub example: String,
    run: Option<RunFn>,
    usage_fn: Option<UsageFn>,
    usage_template: Option<String>,
}

impl Command {
    pub fn new(synopsis: &str) -> Self {
        Self {
            synopsis: synopsis.to_string(),
            ..Default::default()
        }
    }

    pub fn with_short(mut self, short: &str) -> Self {
        self.short = short.to_string();
        self
    }

    pub fn with_long(mut self, long: &str) -> Self {
        self.long = long.to_string();
        self
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = example.to_string();
        self
    }

    /// Attaches the run behaviour, making the command runnable.
    pub fn with_run<F>(mut self, run: F) -> Self
    where
        F: Fn(&mut Invocation<'_>) -> std::result::Result<(), BoxError> + 'static,
    {
        self.run = Some(Rc::new(run));
        self
    }

    /// Overrides usage output for this command and, unless they override it
    /// again, its descendants.
    pub fn with_usage_fn<F>(mut self, usage: F) -> Self
    where
        F: Fn(&CommandTree, CommandId, &mut dyn Write) -> Result<()> + 'static,
    {
        self.usage_fn = Some(Rc::new(usage));
        self
    }

    /// Sets a `{{placeholder}}` usage template for this command and its
    /// descendants.
    pub fn with_usage_template(mut self, template: &str) -> Self {
        self.usage_template = Some(template.to_string());
        self
    }

    /// The synopsis up to the first space.
    pub fn name(&self) -> &str {
        match self.synopsis.find(' ') {
            Some(i) => &self.synopsis[..i],
            None => &self.synopsis,
        }
    }

    pub fn is_runnable(&self) -> bool {
        self.run.is_some()
    }

    pub(crate) fn run_fn(&self) -> Option<RunFn> {
        self.run.clone()
    }

    pub(crate) fn usage_fn(&self) -> Option<UsageFn> {
        self.usage_fn.clone()
    }

    pub(crate) fn usage_template(&self) -> Option<&str> {
        self.usage_template.as_deref()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("synopsis", &self.synopsis)
            .field("short", &self.short)
            .field("long", &self.long)
            .field("example", &self.example)
            .field("runnable", &self.run.is_some())
            .field("usage_fn", &self.usage_fn.is_some())
            .field("usage_template", &self.usage_template)
            .finish()
    }
}

/// Context of a single command execution.
pub struct Invocation<'a> {
    pub(crate) tree: &'a CommandTree,
    pub(crate) command: CommandId,
    pub(crate) args: &'a [String],
    pub(crate) out: &'a mut dyn Write,
}

impl<'a> Invocation<'a> {
    /// The tree the command belongs to.
    pub fn tree(&self) -> &'a CommandTree {
        self.tree
    }

    /// The executing command.
    pub fn command(&self) -> CommandId {
        self.command
    }

    /// Positional arguments left after flag parsing.
    pub fn args(&self) -> &'a [String] {
        self.args
    }

    /// The command's effective flags, holding the values just parsed.
    pub fn flags(&self) -> &'a FlagSet {
        self.tree.parsed_flags(self.command)
    }

    /// Space-joined path from the root to the executing command.
    pub fn command_path(&self) -> String {
        self.tree.command_path(self.command)
    }

    /// Destination for command output.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }
}
