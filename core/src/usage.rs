//! Usage rendering.
//!
//! Usage output is built in two steps. [`CommandTree::usage_view`] collects
//! everything shown about a command into a serialisable [`UsageView`]; the
//! view is then rendered with the default layout ([`render_usage`]), a
//! `{{placeholder}}` template ([`render_template`]) or a structured format
//! (see [`format_usage`](crate::format_usage)).

use std::io::Write;
use std::rc::Rc;
use std::sync::LazyLock;

use cmdtree_flags::{Flag, FlagSet, FlagValue};
use regex::Regex;
use serde::Serialize;
use tracing::error;

use crate::command::UsageFn;
use crate::error::{CommandError, Result};
use crate::output::{OutputFormat, format_usage};
use crate::tree::{CommandId, CommandTree};

/// A subcommand as listed in its parent's usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubcommandEntry {
    pub name: String,
    pub short: String,
}

/// A listed flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlagEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shorthand: Option<char>,
    /// Value type label, empty for booleans.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value_type: String,
    /// Default value, omitted when it is the zero value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FlagValue>,
    pub usage: String,
}

impl FlagEntry {
    fn from_flag(flag: &Flag) -> Self {
        Self {
            name: flag.name.clone(),
            shorthand: flag.shorthand,
            value_type: flag.kind().type_label().to_string(),
            default: (!flag.default.is_zero()).then(|| flag.default.clone()),
            usage: flag.usage.clone(),
        }
    }
}

/// Everything usage output shows about one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageView {
    pub name: String,
    pub command_path: String,
    pub short: String,
    pub long: String,
    pub example: String,
    pub runnable: bool,
    pub use_line: String,
    /// Available subcommands, in registration order.
    pub subcommands: Vec<SubcommandEntry>,
    pub local_flags: Vec<FlagEntry>,
    pub global_flags: Vec<FlagEntry>,
    /// Aligned listing of `local_flags`.
    #[serde(skip)]
    pub local_flag_usages: String,
    /// Aligned listing of `global_flags`.
    #[serde(skip)]
    pub global_flag_usages: String,
}

impl UsageView {
    pub fn has_available_subcommands(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// `name   short` lines for the available subcommands, names padded to
    /// a common width.
    pub fn command_listing(&self) -> String {
        let width = self
            .subcommands
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0);
        let mut out = String::new();
        for sub in &self.subcommands {
            let line = format!("  {:<width$}   {}", sub.name, sub.short, width = width);
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }
}

/// Renders the default usage layout.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree, render_usage};
///
/// let mut tree = CommandTree::new();
/// let root = tree.insert(Command::new("app").with_long("An example app."));
/// let serve = tree.insert(Command::new("serve").with_short("Start").with_run(|_| Ok(())));
/// tree.add_command(root, &[serve]);
///
/// let text = render_usage(&tree.usage_view(root));
/// assert!(text.starts_with("An example app.\n\nUsage:\n  app [command]\n"));
/// assert!(text.contains("Available Commands:\n  serve   Start\n"));
/// ```
pub fn render_usage(view: &UsageView) -> String {
    let mut sections: Vec<String> = Vec::new();

    let description = if view.long.is_empty() {
        &view.short
    } else {
        &view.long
    };
    if !description.is_empty() {
        sections.push(description.trim_end().to_string());
    }

    let mut usage = String::from("Usage:");
    if view.runnable {
        usage.push_str(&format!("\n  {}", view.use_line));
    }
    if view.has_available_subcommands() {
        usage.push_str(&format!("\n  {} [command]", view.command_path));
    }
    if view.runnable || view.has_available_subcommands() {
        sections.push(usage);
    }

    if !view.example.is_empty() {
        sections.push(format!("Examples:\n{}", view.example.trim_end()));
    }
    if view.has_available_subcommands() {
        sections.push(format!(
            "Available Commands:\n{}",
            view.command_listing().trim_end()
        ));
    }
    if !view.local_flag_usages.is_empty() {
        sections.push(format!("Local Flags:\n{}", view.local_flag_usages.trim_end()));
    }
    if !view.global_flag_usages.is_empty() {
        sections.push(format!(
            "Global Flags:\n{}",
            view.global_flag_usages.trim_end()
        ));
    }
    if view.has_available_subcommands() {
        sections.push(format!(
            "Use \"{} [command] --help\" for more information about a command.",
            view.command_path
        ));
    }

    if sections.is_empty() {
        return String::new();
    }
    let mut out = sections.join("\n\n");
    out.push('\n');
    out
}

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-z_]+)\s*\}\}").expect("static regex must compile")
});

/// Substitutes `{{placeholder}}` markers in `template` with view fields.
///
/// Known placeholders: `name`, `command_path`, `short`, `long`, `example`,
/// `use_line`, `commands`, `local_flags` and `global_flags`. The last three
/// expand to the aligned listings used by the default layout.
///
/// # Errors
///
/// [`CommandError::Template`] naming the first unknown placeholder.
///
/// # Examples
///
/// ```
/// use cmdtree_core::{Command, CommandTree, render_template};
///
/// let mut tree = CommandTree::new();
/// let root = tree.insert(Command::new("app").with_short("Does things"));
/// let view = tree.usage_view(root);
///
/// assert_eq!(render_template("{{name}}: {{ short }}", &view).unwrap(), "app: Does things");
/// assert!(render_template("{{nope}}", &view).is_err());
/// ```
pub fn render_template(template: &str, view: &UsageView) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&template[last..whole.start()]);
        let value = match key.as_str() {
            "name" => view.name.clone(),
            "command_path" => view.command_path.clone(),
            "short" => view.short.clone(),
            "long" => view.long.clone(),
            "example" => view.example.clone(),
            "use_line" => view.use_line.clone(),
            "commands" => view.command_listing(),
            "local_flags" => view.local_flag_usages.clone(),
            "global_flags" => view.global_flag_usages.clone(),
            other => {
                return Err(CommandError::Template(format!(
                    "unknown placeholder `{other}`"
                )));
            }
        };
        out.push_str(&value);
        last = whole.end();
    }
    out.push_str(&template[last..]);
    Ok(out)
}

fn listing(set: &FlagSet, sort: bool) -> (Vec<FlagEntry>, String) {
    let mut set = set.clone();
    set.set_sort_flags(sort);

    let mut listed: Vec<&Flag> = set.flags().iter().filter(|f| f.is_listed()).collect();
    if sort {
        listed.sort_by(|a, b| a.name.cmp(&b.name));
    }
    let entries = listed.into_iter().map(FlagEntry::from_flag).collect();
    (entries, set.flag_usages())
}

impl CommandTree {
    /// The first line of a command's usage: parent path plus synopsis.
    pub fn use_line(&self, id: CommandId) -> String {
        let synopsis = &self.command(id).synopsis;
        let mut line = match self.parent(id) {
            Some(parent) => format!("{} {}", self.command_path(parent), synopsis),
            None => synopsis.clone(),
        };
        if self.has_available_flags(id) && !line.contains("[flags]") {
            line.push_str(" [flags]");
        }
        line
    }

    /// Collects the data shown in `id`'s usage.
    pub fn usage_view(&self, id: CommandId) -> UsageView {
        let command = self.command(id);
        let sort = self.settings().sort_flags;
        let (local_flags, local_flag_usages) = listing(self.local_flag_set(id), sort);
        let (global_flags, global_flag_usages) = listing(self.global_flag_set(id), sort);

        let subcommands = self
            .children(id)
            .iter()
            .filter(|&&child| self.is_available(child))
            .map(|&child| SubcommandEntry {
                name: self.name(child).to_string(),
                short: self.command(child).short.clone(),
            })
            .collect();

        UsageView {
            name: command.name().to_string(),
            command_path: self.command_path(id),
            short: command.short.clone(),
            long: command.long.clone(),
            example: command.example.clone(),
            runnable: command.is_runnable(),
            use_line: self.use_line(id),
            subcommands,
            local_flags,
            global_flags,
            local_flag_usages,
            global_flag_usages,
        }
    }

    /// Template set on `id` or its nearest ancestor.
    pub fn usage_template(&self, id: CommandId) -> Option<&str> {
        self.command(id).usage_template().or_else(|| {
            self.parent(id)
                .and_then(|parent| self.usage_template(parent))
        })
    }

    /// Usage function set on `id` or its nearest ancestor, else the default.
    ///
    /// The default renders the inherited template when the configured format
    /// is text and a template exists, and the configured format otherwise.
    pub fn usage_func(&self, id: CommandId) -> UsageFn {
        if let Some(custom) = self.command(id).usage_fn() {
            return custom;
        }
        if let Some(parent) = self.parent(id) {
            return self.usage_func(parent);
        }
        Rc::new(default_usage)
    }

    /// Writes `id`'s usage to `out`.
    ///
    /// # Errors
    ///
    /// Whatever the usage function returns; the failure is also logged.
    pub fn usage(&self, id: CommandId, out: &mut dyn Write) -> Result<()> {
        let usage_fn = self.usage_func(id);
        usage_fn(self, id, out).inspect_err(|err| {
            error!(command = %self.command_path(id), %err, "usage rendering failed");
        })
    }
}

fn default_usage(tree: &CommandTree, id: CommandId, out: &mut dyn Write) -> Result<()> {
    let view = tree.usage_view(id);
    let format = tree.settings().usage_format;
    let text = match (format, tree.usage_template(id)) {
        (OutputFormat::Text, Some(template)) => render_template(template, &view)?,
        _ => format_usage(&view, format)?,
    };
    out.write_all(text.as_bytes())?;
    if !text.is_empty() && !text.ends_with('\n') {
        out.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Command;

    fn sample() -> (CommandTree, CommandId, CommandId, CommandId) {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root").with_long("Root of everything."));
        let child = tree.insert(
            Command::new("child <name>")
                .with_short("A child")
                .with_example("  root child ada")
                .with_run(|_| Ok(())),
        );
        let hidden = tree.insert(Command::new("router"));
        tree.add_command(root, &[child, hidden]);
        tree.global_flags(root)
            .string_p("config", 'c', "", "config file");
        tree.local_flags(child).bool_p("verbose", 'v', false, "say more");
        (tree, root, child, hidden)
    }

    fn render(tree: &CommandTree, id: CommandId) -> String {
        let mut buf = Vec::new();
        tree.usage(id, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_use_line() {
        let (tree, root, child, _) = sample();
        assert_eq!(tree.use_line(child), "root child <name> [flags]");
        assert_eq!(tree.use_line(root), "root [flags]");

        let mut bare = CommandTree::new();
        let alone = bare.insert(Command::new("alone [flags] <x>"));
        bare.local_flags(alone).bool("x", false, "");
        assert_eq!(bare.use_line(alone), "alone [flags] <x>");
    }

    #[test]
    fn test_use_line_without_flags() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root"));
        let child = tree.insert(Command::new("child"));
        tree.add_command(root, &[child]);
        assert_eq!(tree.use_line(child), "root child");
    }

    #[test]
    fn test_view_lists_available_subcommands_only() {
        let (tree, root, _, _) = sample();
        let view = tree.usage_view(root);
        assert_eq!(
            view.subcommands,
            vec![SubcommandEntry {
                name: "child".into(),
                short: "A child".into()
            }]
        );
        assert!(!view.runnable);
        assert!(view.local_flags.is_empty());
        assert_eq!(view.global_flags.len(), 1);
        assert_eq!(view.global_flags[0].value_type, "string");
    }

    #[test]
    fn test_default_layout_for_root() {
        let (tree, root, _, _) = sample();
        let expected = "\
Root of everything.

Usage:
  root [command]

Available Commands:
  child   A child

Global Flags:
  -c, --config string   config file

Use \"root [command] --help\" for more information about a command.
";
        assert_eq!(render(&tree, root), expected);
    }

    #[test]
    fn test_default_layout_for_leaf() {
        let (tree, _, child, _) = sample();
        let expected = "\
A child

Usage:
  root child <name> [flags]

Examples:
  root child ada

Local Flags:
  -v, --verbose   say more

Global Flags:
  -c, --config string   config file
";
        assert_eq!(render(&tree, child), expected);
    }

    #[test]
    fn test_template_is_inherited() {
        let (mut tree, root, child, _) = sample();
        let custom = tree.insert(
            Command::new("templated").with_usage_template("{{command_path}} :: {{use_line}}"),
        );
        tree.add_command(root, &[custom]);
        let grandchild = tree.insert(Command::new("leaf").with_run(|_| Ok(())));
        tree.add_command(custom, &[grandchild]);

        assert_eq!(tree.usage_template(child), None);
        assert_eq!(
            tree.usage_template(grandchild),
            Some("{{command_path}} :: {{use_line}}")
        );
        assert_eq!(
            render(&tree, grandchild),
            "root templated leaf :: root templated leaf [flags]\n"
        );
    }

    #[test]
    fn test_unknown_placeholder_is_template_error() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root").with_usage_template("{{bogus}}"));
        let mut buf = Vec::new();
        let err = tree.usage(root, &mut buf).unwrap_err();
        assert!(matches!(err, CommandError::Template(ref msg) if msg.contains("bogus")));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_usage_fn_is_inherited() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root").with_usage_fn(|tree, id, out| {
            writeln!(out, "custom usage for {}", tree.command_path(id))?;
            Ok(())
        }));
        let child = tree.insert(Command::new("child"));
        let overridden = tree.insert(Command::new("other").with_usage_fn(|_, _, out| {
            writeln!(out, "other")?;
            Ok(())
        }));
        tree.add_command(root, &[child, overridden]);

        assert_eq!(render(&tree, child), "custom usage for root child\n");
        assert_eq!(render(&tree, overridden), "other\n");
    }

    #[test]
    fn test_json_format_from_settings() {
        let (mut tree, _, child, _) = sample();
        tree.settings_mut().usage_format = OutputFormat::Json;

        let value: serde_json::Value = serde_json::from_str(&render(&tree, child)).unwrap();
        assert_eq!(value["command_path"], "root child");
        assert_eq!(value["runnable"], true);
        assert_eq!(value["local_flags"][0]["name"], "verbose");
        assert_eq!(value["local_flags"][0]["shorthand"], "v");
        assert!(value.get("local_flag_usages").is_none());
    }

    #[test]
    fn test_unsorted_flags_keep_definition_order() {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("root").with_run(|_| Ok(())));
        tree.local_flags(root)
            .bool("zeta", false, "")
            .bool("alpha", false, "");

        let names = |tree: &CommandTree| -> Vec<String> {
            tree.usage_view(root)
                .local_flags
                .into_iter()
                .map(|f| f.name)
                .collect()
        };
        assert_eq!(names(&tree), vec!["alpha", "zeta"]);

        tree.settings_mut().sort_flags = false;
        assert_eq!(names(&tree), vec!["zeta", "alpha"]);
        assert!(tree.usage_view(root).local_flag_usages.starts_with("      --zeta"));
    }
}
