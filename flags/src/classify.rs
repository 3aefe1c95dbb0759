//! Flag-token classification for subcommand routing.
//!
//! Routing needs to know which tokens are positional without actually
//! parsing flag values. The classifier uses the flag definitions only to
//! decide whether a bare `--name` or `-x` swallows the following token.

use crate::FlagSet;

/// Returns the indices of positional tokens in `tokens`.
///
/// - `--name=value` and `-xvalue` are single flag tokens.
/// - `--name` and `-x` (or a boolean cluster ending in `x`) consume the
///   next token when the flag is defined in `flags` and takes a value.
/// - Unknown flags never consume the next token.
/// - `--` ends routing; nothing after it is positional for routing.
/// - A lone `-` is skipped.
///
/// # Examples
///
/// ```
/// use cmdtree_flags::{FlagSet, positional_indices};
///
/// let mut flags = FlagSet::new("app");
/// flags.string_p("config", 'c', "", "config file").bool_p("verbose", 'v', false, "");
///
/// let tokens: Vec<String> = ["-c", "app.yml", "-v", "serve", "--", "x"]
///     .iter().map(|s| s.to_string()).collect();
/// assert_eq!(positional_indices(&tokens, &flags), vec![3]);
/// ```
pub fn positional_indices(tokens: &[String], flags: &FlagSet) -> Vec<usize> {
    let mut positional = Vec::new();
    let mut index = 0;

    while index < tokens.len() {
        let token = tokens[index].as_str();
        index += 1;

        if token == "--" {
            break;
        }
        if token == "-" {
            continue;
        }
        if let Some(body) = token.strip_prefix("--") {
            if !body.contains('=') && long_takes_value(body, flags) {
                index += 1;
            }
            continue;
        }
        if let Some(shorts) = token.strip_prefix('-') {
            if short_cluster_consumes_next(shorts, flags) {
                index += 1;
            }
            continue;
        }
        positional.push(index - 1);
    }

    positional
}

/// Returns the positional tokens of `tokens`, in order.
///
/// # Examples
///
/// ```
/// use cmdtree_flags::{FlagSet, strip_flags};
///
/// let mut flags = FlagSet::new("app");
/// flags.string_p("name", 'n', "", "");
///
/// let tokens: Vec<String> = ["-n", "ada", "greet", "--loud", "twice"]
///     .iter().map(|s| s.to_string()).collect();
/// assert_eq!(strip_flags(&tokens, &flags), vec!["greet", "twice"]);
/// ```
pub fn strip_flags(tokens: &[String], flags: &FlagSet) -> Vec<String> {
    positional_indices(tokens, flags)
        .into_iter()
        .map(|i| tokens[i].clone())
        .collect()
}

fn long_takes_value(name: &str, flags: &FlagSet) -> bool {
    flags
        .lookup(name)
        .is_some_and(|flag| flag.kind().takes_value())
}

/// A cluster consumes the next token only if it ends at a value-taking
/// shorthand with nothing attached.
fn short_cluster_consumes_next(shorts: &str, flags: &FlagSet) -> bool {
    for (pos, c) in shorts.char_indices() {
        let Some(flag) = flags.lookup_shorthand(c) else {
            return false;
        };
        if flag.kind().takes_value() {
            return pos + c.len_utf8() == shorts.len();
        }
    }
    false
}
