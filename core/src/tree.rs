//! Command tree arena: registration and tree-shape queries.
//!
//! Commands live in a flat arena and refer to each other through
//! [`CommandId`] handles. The parent link is a plain handle, set once when
//! the parent registers the child; children are kept in insertion order.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::command::Command;
use crate::scope::FlagScope;
use crate::settings::Settings;

/// Handle of a command inside a [`CommandTree`].
///
/// Handles are only meaningful for the tree that issued them; using one with
/// another tree panics or addresses an unrelated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommandId(usize);

impl CommandId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) command: Command,
    pub(crate) parent: Option<CommandId>,
    pub(crate) children: Vec<CommandId>,
    pub(crate) scope: FlagScope,
}

/// An arena of commands wired into one or more trees.
///
/// The tree is single-threaded: run behaviours are reference counted, so the
/// type is neither `Send` nor `Sync`. Build the tree completely before the
/// first resolution.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree};
///
/// let mut tree = CommandTree::new();
/// let root = tree.insert(Command::new("root"));
/// let a = tree.insert(Command::new("a"));
/// let b = tree.insert(Command::new("b <file>"));
/// tree.add_command(root, &[a]);
/// tree.add_command(a, &[b]);
///
/// assert_eq!(tree.command_path(b), "root a b");
/// assert_eq!(tree.root(b), root);
/// assert_eq!(tree.find_child(a, "b"), Some(b));
/// assert_eq!(tree.find_child(root, "b"), None);
/// ```
#[derive(Debug, Default)]
pub struct CommandTree {
    pub(crate) nodes: Vec<Node>,
    settings: Settings,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            nodes: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Adds a command to the arena as a parentless node.
    ///
    /// The command's global, local and effective flag sets are created here.
    pub fn insert(&mut self, command: Command) -> CommandId {
        let id = CommandId(self.nodes.len());
        let scope = FlagScope::new(command.name());
        self.nodes.push(Node {
            command,
            parent: None,
            children: Vec::new(),
            scope,
        });
        id
    }

    /// Number of commands in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registers `children` under `parent`, in order.
    ///
    /// Global flags a child defined while it was still parentless are moved
    /// into the global set of the tree it joins.
    ///
    /// # Panics
    ///
    /// Panics, before changing anything, if a child is `parent` itself, is
    /// listed twice, already has a parent, or is an ancestor of `parent`.
    pub fn add_command(&mut self, parent: CommandId, children: &[CommandId]) {
        for (i, &child) in children.iter().enumerate() {
            if child == parent {
                panic!("Command can't be a child of itself");
            }
            if children[..i].contains(&child) {
                panic!("command `{}` listed twice", self.name(child));
            }
            if let Some(existing) = self.nodes[child.0].parent {
                panic!(
                    "command `{}` is already registered under `{}`",
                    self.name(child),
                    self.command_path(existing)
                );
            }
            if self.is_ancestor(child, parent) {
                panic!(
                    "command `{}` is an ancestor of `{}`",
                    self.name(child),
                    self.command_path(parent)
                );
            }
        }

        let root = self.root(parent);
        for &child in children {
            self.nodes[child.0].parent = Some(parent);
            self.nodes[parent.0].children.push(child);
            debug!(
                parent = %self.command_path(parent),
                child = %self.name(child),
                "registered subcommand"
            );

            let dormant = self.nodes[child.0].scope.take_global();
            for flag in dormant.flags() {
                if let Err(err) = self.nodes[root.0].scope.global.add_flag(flag.clone()) {
                    warn!(flag = %flag.name, %err, "dropping global flag defined before registration");
                }
            }
        }
    }

    fn is_ancestor(&self, candidate: CommandId, of: CommandId) -> bool {
        let mut current = self.nodes[of.0].parent;
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    pub fn command(&self, id: CommandId) -> &Command {
        &self.nodes[id.0].command
    }

    /// Mutable access to descriptive fields.
    pub fn command_mut(&mut self, id: CommandId) -> &mut Command {
        &mut self.nodes[id.0].command
    }

    pub fn name(&self, id: CommandId) -> &str {
        self.nodes[id.0].command.name()
    }

    pub fn parent(&self, id: CommandId) -> Option<CommandId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: CommandId) -> &[CommandId] {
        &self.nodes[id.0].children
    }

    pub fn has_parent(&self, id: CommandId) -> bool {
        self.nodes[id.0].parent.is_some()
    }

    pub fn has_subcommands(&self, id: CommandId) -> bool {
        !self.nodes[id.0].children.is_empty()
    }

    /// Walks parent links to the command with no parent.
    pub fn root(&self, id: CommandId) -> CommandId {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current
    }

    /// Names from the root down to `id`, joined by spaces.
    pub fn command_path(&self, id: CommandId) -> String {
        match self.parent(id) {
            Some(parent) => format!("{} {}", self.command_path(parent), self.name(id)),
            None => self.name(id).to_string(),
        }
    }

    /// First direct child named `name`.
    pub fn find_child(&self, id: CommandId, name: &str) -> Option<CommandId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.name(child) == name)
    }

    pub fn is_runnable(&self, id: CommandId) -> bool {
        self.command(id).is_runnable()
    }

    /// Runnable, or has at least one available descendant.
    pub fn is_available(&self, id: CommandId) -> bool {
        self.is_runnable(id) || self.has_available_subcommands(id)
    }

    pub fn has_available_subcommands(&self, id: CommandId) -> bool {
        self.children(id)
            .iter()
            .any(|&child| self.is_available(child))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (CommandTree, CommandId, CommandId, CommandId, CommandId) {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let a = tree.insert(Command::new("a"));
        let b = tree.insert(Command::new("b"));
        let c = tree.insert(Command::new("c [args]"));
        tree.add_command(root, &[a]);
        tree.add_command(a, &[b]);
        tree.add_command(b, &[c]);
        (tree, root, a, b, c)
    }

    #[test]
    fn test_command_path() {
        let (tree, root, a, b, c) = chain();
        assert_eq!(tree.command_path(root), "root");
        assert_eq!(tree.command_path(a), "root a");
        assert_eq!(tree.command_path(b), "root a b");
        assert_eq!(tree.command_path(c), "root a b c");
    }

    #[test]
    fn test_root_walks_every_level() {
        let (tree, root, a, b, c) = chain();
        for id in [root, a, b, c] {
            assert_eq!(tree.root(id), root);
        }
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let ids: Vec<CommandId> = ["zeta", "alpha", "mid"]
            .iter()
            .map(|n| tree.insert(Command::new(n)))
            .collect();
        tree.add_command(root, &ids);

        let names: Vec<&str> = tree.children(root).iter().map(|&c| tree.name(c)).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert!(tree.has_subcommands(root));
        assert!(!tree.has_parent(root));
        assert_eq!(tree.parent(ids[0]), Some(root));
    }

    #[test]
    fn test_find_child_first_match_wins() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let first = tree.insert(Command::new("dup one"));
        let second = tree.insert(Command::new("dup two"));
        tree.add_command(root, &[first, second]);

        assert_eq!(tree.find_child(root, "dup"), Some(first));
        assert_eq!(tree.find_child(root, "missing"), None);
    }

    #[test]
    fn test_availability() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let router = tree.insert(Command::new("router"));
        let dead = tree.insert(Command::new("dead"));
        let leaf = tree.insert(Command::new("leaf").with_run(|_| Ok(())));
        tree.add_command(root, &[router, dead]);
        tree.add_command(router, &[leaf]);

        assert!(tree.is_runnable(leaf));
        assert!(tree.is_available(leaf));
        assert!(!tree.is_runnable(router));
        assert!(tree.is_available(router));
        assert!(!tree.is_available(dead));
        assert!(tree.has_available_subcommands(root));
        assert!(!tree.has_available_subcommands(dead));
    }

    #[test]
    #[should_panic(expected = "Command can't be a child of itself")]
    fn test_self_registration_panics() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        tree.add_command(root, &[root]);
    }

    #[test]
    fn test_self_registration_leaves_tree_untouched() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let child = tree.insert(Command::new("child"));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            tree.add_command(root, &[child, root]);
        }));

        assert!(result.is_err());
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.parent(child), None);
    }

    #[test]
    #[should_panic(expected = "already registered under `root`")]
    fn test_second_parent_panics() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let other = tree.insert(Command::new("other"));
        let child = tree.insert(Command::new("child"));
        tree.add_command(root, &[child]);
        tree.add_command(other, &[child]);
    }

    #[test]
    #[should_panic(expected = "is an ancestor of")]
    fn test_cycle_panics() {
        let (mut tree, root, _, _, c) = chain();
        tree.add_command(c, &[root]);
    }
}
