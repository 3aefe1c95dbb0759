//! Output formats for usage views.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::usage::{FlagEntry, UsageView, render_usage};

/// Supported usage output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The default help layout.
    #[default]
    Text,
    Json,
    Yaml,
    Markdown,
}

/// Formats a usage view in the requested output format.
///
/// # Errors
///
/// Serialization failures for the JSON and YAML formats.
pub fn format_usage(view: &UsageView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_usage(view)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(view)?),
        OutputFormat::Markdown => Ok(view_to_markdown(view)),
    }
}

fn view_to_markdown(view: &UsageView) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", view.command_path));

    let description = if view.long.is_empty() {
        &view.short
    } else {
        &view.long
    };
    if !description.is_empty() {
        out.push_str(&format!("{}\n\n", description.trim_end()));
    }

    if view.runnable || view.has_available_subcommands() {
        out.push_str("## Usage\n\n```\n");
        if view.runnable {
            out.push_str(&format!("{}\n", view.use_line));
        }
        if view.has_available_subcommands() {
            out.push_str(&format!("{} [command]\n", view.command_path));
        }
        out.push_str("```\n\n");
    }

    if !view.example.is_empty() {
        out.push_str("## Examples\n\n```\n");
        out.push_str(&format!("{}\n", view.example.trim_end()));
        out.push_str("```\n\n");
    }

    if view.has_available_subcommands() {
        out.push_str("## Subcommands\n\n");
        out.push_str("| Subcommand | Description |\n");
        out.push_str("|------------|-------------|\n");
        for sub in &view.subcommands {
            out.push_str(&format!("| `{}` | {} |\n", sub.name, sub.short));
        }
        out.push('\n');
    }

    flag_table(&mut out, "Local Flags", &view.local_flags);
    flag_table(&mut out, "Global Flags", &view.global_flags);

    out
}

fn flag_table(out: &mut String, title: &str, flags: &[FlagEntry]) {
    if flags.is_empty() {
        return;
    }
    out.push_str(&format!("## {title}\n\n"));
    out.push_str("| Flag | Type | Default | Description |\n");
    out.push_str("|------|------|---------|-------------|\n");
    for flag in flags {
        let name = match flag.shorthand {
            Some(c) => format!("-{c}, --{}", flag.name),
            None => format!("--{}", flag.name),
        };
        let default = flag
            .default
            .as_ref()
            .map(|d| format!("`{d}`"))
            .unwrap_or_default();
        out.push_str(&format!(
            "| `{name}` | {} | {default} | {} |\n",
            flag.value_type, flag.usage
        ));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, CommandTree};

    fn view() -> UsageView {
        let mut tree = CommandTree::new();
        let root = tree.insert(Command::new("app").with_short("An app"));
        let serve = tree.insert(
            Command::new("serve [addr]")
                .with_short("Start the server")
                .with_run(|_| Ok(())),
        );
        tree.add_command(root, &[serve]);
        tree.global_flags(root).bool_p("verbose", 'v', false, "say more");
        tree.local_flags(serve).int_p("port", 'p', 8080, "port to bind");
        tree.usage_view(serve)
    }

    #[test]
    fn test_format_names_are_lowercase() {
        let format: OutputFormat = serde_yaml::from_str("markdown").unwrap();
        assert_eq!(format, OutputFormat::Markdown);
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), "\"json\"");
        assert_eq!(OutputFormat::default(), OutputFormat::Text);
    }

    #[test]
    fn test_text_matches_default_layout() {
        let view = view();
        assert_eq!(
            format_usage(&view, OutputFormat::Text).unwrap(),
            render_usage(&view)
        );
    }

    #[test]
    fn test_yaml_output() {
        let yaml = format_usage(&view(), OutputFormat::Yaml).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(value["command_path"].as_str(), Some("app serve"));
        assert_eq!(value["local_flags"][0]["default"].as_i64(), Some(8080));
        assert_eq!(value["global_flags"][0]["name"].as_str(), Some("verbose"));
    }

    #[test]
    fn test_markdown_tables() {
        let md = format_usage(&view(), OutputFormat::Markdown).unwrap();
        assert!(md.starts_with("# app serve\n\nStart the server\n\n"));
        assert!(md.contains("```\napp serve [addr] [flags]\n```"));
        assert!(md.contains("## Local Flags"));
        assert!(md.contains("| `-p, --port` | int | `8080` | port to bind |"));
        assert!(md.contains("| `-v, --verbose` |  |  | say more |"));
        assert!(!md.contains("## Subcommands"));
    }
}
