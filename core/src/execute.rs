//! Command execution: resolve, parse flags, run.

use std::io::Write;
use std::path::Path;

use tracing::{debug, error};

use crate::command::Invocation;
use crate::error::{CommandError, Result};
use crate::resolve::Resolution;
use crate::tree::{CommandId, CommandTree};

impl CommandTree {
    /// Runs the command addressed by the process arguments, writing output to
    /// stdout.
    ///
    /// With `normalize_program_name` set, `argv[0]` is reduced to its file
    /// name (without an `.exe` suffix) so it matches the root command's name.
    ///
    /// # Errors
    ///
    /// See [`execute_from`](Self::execute_from).
    pub fn execute(&mut self, root: CommandId) -> Result<()> {
        let mut args: Vec<String> = std::env::args().collect();
        if self.settings().normalize_program_name {
            if let Some(first) = args.first_mut() {
                *first = program_name(first);
            }
        }
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.execute_from(root, &args, &mut out)
    }

    /// Resolves `args` from `root`, parses the target's flags and runs it.
    ///
    /// The help token, `-h`/`--help`, and targets without a run behaviour
    /// print usage instead of running. Flag notices such as deprecations are
    /// printed before the command runs.
    ///
    /// # Errors
    ///
    /// Resolution and flag errors, usage rendering failures, and
    /// [`CommandError::Run`] when the run behaviour fails.
    pub fn execute_from(
        &mut self,
        root: CommandId,
        args: &[String],
        out: &mut dyn Write,
    ) -> Result<()> {
        let resolution = self.resolve(root, args).inspect_err(|err| {
            error!(%err, "command resolution failed");
        })?;

        let (id, rest) = match resolution {
            Resolution::Help { command } => return self.usage(command, out),
            Resolution::Run { command, args } => (command, args),
        };

        match self.parse_flags(id, &rest) {
            Ok(Some(notice)) => out.write_all(notice.as_bytes())?,
            Ok(None) => {}
            Err(err) if err.is_help() => return self.usage(id, out),
            Err(err) => {
                error!(command = %self.command_path(id), %err, "flag parsing failed");
                return Err(err);
            }
        }

        let Some(run) = self.command(id).run_fn() else {
            debug!(command = %self.command_path(id), "not runnable, showing usage");
            return self.usage(id, out);
        };

        let positional = self.parsed_flags(id).args().to_vec();
        debug!(command = %self.command_path(id), args = ?positional, "running command");
        let mut invocation = Invocation {
            tree: self,
            command: id,
            args: &positional,
            out,
        };
        run(&mut invocation).map_err(|source| {
            let command = self.command_path(id);
            error!(%command, %source, "command failed");
            CommandError::Run { command, source }
        })
    }
}

/// File name of `arg0` without an `.exe` suffix.
fn program_name(arg0: &str) -> String {
    let name = Path::new(arg0)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| arg0.to_string());
    match name.strip_suffix(".exe") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => name,
    }
}
