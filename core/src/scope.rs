//! Per-command flag visibility: global, local and effective flag sets.
//!
//! Every command owns a local set and an effective set. Global flags are
//! stored once per tree, in the root command's scope, and every descendant
//! reaches them by walking its parent handles. The effective set is rebuilt
//! from local and global definitions on every access, so it never lags behind
//! newly defined flags or values parsed at another command.

use std::collections::BTreeSet;

use cmdtree_flags::FlagSet;
use tracing::{debug, info};

use crate::error::Result;
use crate::tree::{CommandId, CommandTree};

#[derive(Debug, Clone)]
pub(crate) struct FlagScope {
    /// Only meaningful while the command is a root.
    pub(crate) global: FlagSet,
    pub(crate) local: FlagSet,
    pub(crate) effective: FlagSet,
    pub(crate) error_buf: Vec<u8>,
}

impl FlagScope {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            global: FlagSet::new(name),
            local: FlagSet::new(name),
            effective: FlagSet::new(name),
            error_buf: Vec::new(),
        }
    }

    /// Detaches the global set, leaving an empty one with the same name.
    pub(crate) fn take_global(&mut self) -> FlagSet {
        let name = self.global.name().to_string();
        std::mem::replace(&mut self.global, FlagSet::new(&name))
    }

    fn rebuild_effective(&mut self, global: &FlagSet) {
        let FlagScope {
            local, effective, ..
        } = self;
        effective.clear_merged();
        effective.add_flag_set(local);
        effective.add_flag_set(global);
    }
}

impl CommandTree {
    /// The command whose global set `id` shares: the root of its tree.
    ///
    /// A root resolves to itself. The lookup is recomputed on every call, so
    /// it stays correct when a subtree is later registered under a new parent.
    pub fn inherit_global(&self, id: CommandId) -> CommandId {
        match self.parent(id) {
            Some(parent) => self.inherit_global(parent),
            None => id,
        }
    }

    /// Flags visible to `id` and every command in its tree.
    pub fn global_flags(&mut self, id: CommandId) -> &mut FlagSet {
        let owner = self.inherit_global(id);
        &mut self.nodes[owner.index()].scope.global
    }

    /// Flags visible only to `id`.
    pub fn local_flags(&mut self, id: CommandId) -> &mut FlagSet {
        &mut self.nodes[id.index()].scope.local
    }

    /// The set used to parse `id`'s arguments.
    ///
    /// Rebuilt on every call: flags defined directly on it shadow local
    /// flags, which shadow global flags.
    ///
    /// # Panics
    ///
    /// Panics if a local or global flag reuses a shorthand already taken by a
    /// differently named flag it would merge with.
    pub fn effective_flags(&mut self, id: CommandId) -> &mut FlagSet {
        let owner = self.inherit_global(id);
        let global = self.nodes[owner.index()].scope.global.clone();
        let scope = &mut self.nodes[id.index()].scope;
        scope.rebuild_effective(&global);
        &mut scope.effective
    }

    /// Read-only view of the global set shared by `id`.
    pub fn global_flag_set(&self, id: CommandId) -> &FlagSet {
        &self.nodes[self.inherit_global(id).index()].scope.global
    }

    /// Read-only view of `id`'s local set.
    pub fn local_flag_set(&self, id: CommandId) -> &FlagSet {
        &self.nodes[id.index()].scope.local
    }

    /// A freshly merged copy of `id`'s effective flags, leaving the stored
    /// set untouched.
    pub fn collect_effective(&self, id: CommandId) -> FlagSet {
        let scope = &self.nodes[id.index()].scope;
        let mut set = scope.effective.clone();
        set.clear_merged();
        set.add_flag_set(&scope.local);
        set.add_flag_set(self.global_flag_set(id));
        set
    }

    /// The stored effective set as left by the last parse.
    pub(crate) fn parsed_flags(&self, id: CommandId) -> &FlagSet {
        &self.nodes[id.index()].scope.effective
    }

    /// Parses `args` into `id`'s effective flags.
    ///
    /// Parsed values are written back to the local or global set that owns
    /// each flag, so a global flag parsed here is readable from every command
    /// of the tree. Values parsed before an error are kept.
    ///
    /// Returns diagnostic text the flag set produced without failing (such as
    /// deprecation notices); callers print it as information.
    ///
    /// # Errors
    ///
    /// The flag set's parse error, wrapped in
    /// [`CommandError::Flag`](crate::CommandError::Flag).
    pub fn parse_flags(&mut self, id: CommandId, args: &[String]) -> Result<Option<String>> {
        let owner = self.inherit_global(id);
        self.effective_flags(id);

        let scope = &mut self.nodes[id.index()].scope;
        let before = scope.error_buf.len();
        let result = scope.effective.parse(args);
        let diagnostics = scope.effective.take_output();
        scope.error_buf.extend_from_slice(&diagnostics);

        let FlagScope {
            local, effective, ..
        } = &mut *scope;
        let updated_local = local.absorb_where(&*effective, |name| effective.is_merged(name));
        let local_names: BTreeSet<String> =
            local.flags().iter().map(|f| f.name.clone()).collect();
        let parsed = effective.clone();
        let grown = scope.error_buf.len() > before;
        let notice = grown
            .then(|| String::from_utf8_lossy(&scope.error_buf[before..]).into_owned());

        let updated_global = self.nodes[owner.index()]
            .scope
            .global
            .absorb_where(&parsed, |name| {
                parsed.is_merged(name) && !local_names.contains(name)
            });
        debug!(
            command = %self.command_path(id),
            updated_local,
            updated_global,
            "parsed flags"
        );

        result?;
        if let Some(text) = &notice {
            info!(command = %self.command_path(id), "{}", text.trim_end());
        }
        Ok(notice)
    }

    /// Everything the flag sets of `id` wrote to their diagnostic output.
    pub fn flag_error_output(&self, id: CommandId) -> &[u8] {
        &self.nodes[id.index()].scope.error_buf
    }

    /// Any listed flag in the effective set.
    pub fn has_available_flags(&self, id: CommandId) -> bool {
        self.collect_effective(id).has_available_flags()
    }

    pub fn has_available_local_flags(&self, id: CommandId) -> bool {
        self.local_flag_set(id).has_available_flags()
    }

    pub fn has_available_global_flags(&self, id: CommandId) -> bool {
        self.global_flag_set(id).has_available_flags()
    }
}
