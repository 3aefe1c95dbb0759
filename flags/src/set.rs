//! Named, ordered flag sets with interspersed command-line parsing.
//!
//! A [`FlagSet`] owns flag definitions and their values, parses argument
//! tokens into them, and collects positional arguments. Parse errors and
//! deprecation notices are also written to the set's diagnostic output buffer
//! so callers can surface them after the fact.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::FlagError;
use crate::types::{Flag, FlagKind, FlagValue};
use crate::validate::validate_flag;

/// A collection of flags plus the positional arguments left by the last parse.
///
/// # Examples
///
/// ```
/// use cmdtree_flags::FlagSet;
///
/// let mut set = FlagSet::new("greet");
/// set.string_p("name", 'n', "world", "who to greet")
///     .bool_p("loud", 'l', false, "shout");
///
/// let args: Vec<String> = ["-nAda", "--loud", "extra"].iter().map(|s| s.to_string()).collect();
/// set.parse(&args).unwrap();
///
/// assert_eq!(set.get_string("name").unwrap(), "Ada");
/// assert!(set.get_bool("loud").unwrap());
/// assert_eq!(set.args(), ["extra"]);
/// ```
#[derive(Debug, Clone)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
    merged: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
    sort_flags: bool,
    output: Vec<u8>,
}

impl Default for FlagSet {
    fn default() -> Self {
        Self::new("")
    }
}

impl FlagSet {
    /// Creates an empty set. `name` appears in diagnostics.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            flags: Vec::new(),
            merged: BTreeSet::new(),
            args: Vec::new(),
            parsed: false,
            sort_flags: true,
            output: Vec::new(),
        }
    }

    /// Name of the set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Controls whether [`flag_usages`](Self::flag_usages) sorts by name
    /// (default) or keeps definition order.
    pub fn set_sort_flags(&mut self, sort: bool) {
        self.sort_flags = sort;
    }

    /// Adds a validated flag definition.
    ///
    /// # Errors
    ///
    /// Returns the [`validate_flag`] error if the flag is malformed or clashes
    /// with an existing name or shorthand.
    pub fn add_flag(&mut self, flag: Flag) -> Result<(), FlagError> {
        validate_flag(&self.name, &self.flags, &flag)?;
        self.flags.push(flag);
        Ok(())
    }

    /// Adds a flag definition, panicking on an invalid or clashing definition.
    ///
    /// # Panics
    ///
    /// Panics if [`add_flag`](Self::add_flag) would fail. Flag definitions
    /// are fixed by the program, so a clash is a programming error.
    pub fn define(&mut self, flag: Flag) -> &mut Self {
        if let Err(err) = self.add_flag(flag) {
            panic!("{err}");
        }
        self
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> &mut Self {
        self.define(Flag::boolean(name, None, default, usage))
    }

    pub fn bool_p(&mut self, name: &str, short: char, default: bool, usage: &str) -> &mut Self {
        self.define(Flag::boolean(name, Some(short), default, usage))
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> &mut Self {
        self.define(Flag::int(name, None, default, usage))
    }

    pub fn int_p(&mut self, name: &str, short: char, default: i64, usage: &str) -> &mut Self {
        self.define(Flag::int(name, Some(short), default, usage))
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> &mut Self {
        self.define(Flag::string(name, None, default, usage))
    }

    pub fn string_p(&mut self, name: &str, short: char, default: &str, usage: &str) -> &mut Self {
        self.define(Flag::string(name, Some(short), default, usage))
    }

    pub fn string_slice(&mut self, name: &str, default: &[&str], usage: &str) -> &mut Self {
        self.define(Flag::string_slice(name, None, default, usage))
    }

    pub fn string_slice_p(
        &mut self,
        name: &str,
        short: char,
        default: &[&str],
        usage: &str,
    ) -> &mut Self {
        self.define(Flag::string_slice(name, Some(short), default, usage))
    }

    /// All flags in definition order.
    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    /// Finds a flag by long name.
    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Finds a flag by shorthand.
    pub fn lookup_shorthand(&self, shorthand: char) -> Option<&Flag> {
        self.flags.iter().find(|f| f.shorthand == Some(shorthand))
    }

    /// Returns `true` if the set defines any flag at all.
    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }

    /// Returns `true` if any flag would appear in usage output.
    pub fn has_available_flags(&self) -> bool {
        self.flags.iter().any(Flag::is_listed)
    }

    /// Returns `true` if the named flag was set on a parsed command line.
    pub fn changed(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|f| f.changed)
    }

    /// Sets a flag value programmatically, as if parsed.
    ///
    /// # Errors
    ///
    /// [`FlagError::NotDefined`] for unknown names, or the conversion error.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), FlagError> {
        let flag = self
            .flags
            .iter_mut()
            .find(|f| f.name == name)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))?;
        flag.set(value)
    }

    fn value_of(&self, name: &str) -> Result<&FlagValue, FlagError> {
        self.lookup(name)
            .map(|f| &f.value)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))
    }

    pub fn get_string(&self, name: &str) -> Result<String, FlagError> {
        match self.value_of(name)? {
            FlagValue::String(s) => Ok(s.clone()),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, FlagError> {
        match self.value_of(name)? {
            FlagValue::Bool(b) => Ok(*b),
            other => Err(mismatch("bool", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i64, FlagError> {
        match self.value_of(name)? {
            FlagValue::Int(n) => Ok(*n),
            other => Err(mismatch("int", other)),
        }
    }

    pub fn get_string_slice(&self, name: &str) -> Result<Vec<String>, FlagError> {
        match self.value_of(name)? {
            FlagValue::StringSlice(v) => Ok(v.clone()),
            other => Err(mismatch("stringSlice", other)),
        }
    }

    /// Positional arguments collected by the last [`parse`](Self::parse).
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Returns `true` once [`parse`](Self::parse) has been called.
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Diagnostic text written so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drains the diagnostic buffer.
    pub fn take_output(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    fn emit(&mut self, text: &str) {
        self.output.extend_from_slice(text.as_bytes());
        if !text.ends_with('\n') {
            self.output.push(b'\n');
        }
    }

    /// Parses `args`, interleaving flags and positional arguments.
    ///
    /// Values parsed before an error are kept. On error the message and the
    /// usage listing are also written to the output buffer (`--help` writes
    /// only the listing).
    ///
    /// # Errors
    ///
    /// Unknown flags, missing or invalid values, and
    /// [`FlagError::HelpRequested`].
    pub fn parse(&mut self, args: &[String]) -> Result<(), FlagError> {
        self.parsed = true;
        self.args.clear();

        let result = self.parse_args(args);
        if let Err(err) = &result {
            if !err.is_help() {
                self.emit(&err.to_string());
            }
            let usage = format!("Usage of {}:\n{}", self.name, self.flag_usages());
            self.emit(&usage);
        }
        result
    }

    fn parse_args(&mut self, args: &[String]) -> Result<(), FlagError> {
        let mut next = 0;
        while next < args.len() {
            let token = &args[next];
            next += 1;

            if token == "--" {
                self.args.extend(args[next..].iter().cloned());
                break;
            }
            if let Some(body) = token.strip_prefix("--") {
                next = self.parse_long(body, args, next)?;
            } else if token.len() > 1 && token.starts_with('-') {
                next = self.parse_short(token, args, next)?;
            } else {
                self.args.push(token.clone());
            }
        }
        Ok(())
    }

    fn parse_long(&mut self, body: &str, args: &[String], mut next: usize) -> Result<usize, FlagError> {
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let Some(index) = self.flags.iter().position(|f| f.name == name) else {
            if name == "help" {
                return Err(FlagError::HelpRequested);
            }
            return Err(FlagError::UnknownFlag(name.to_string()));
        };

        let value = match inline {
            Some(value) => value.to_string(),
            None if !self.flags[index].kind().takes_value() => "true".to_string(),
            None => match args.get(next) {
                Some(value) => {
                    next += 1;
                    value.clone()
                }
                None => return Err(FlagError::MissingValue(format!("--{name}"))),
            },
        };
        self.apply(index, &value)?;
        Ok(next)
    }

    fn parse_short(&mut self, token: &str, args: &[String], mut next: usize) -> Result<usize, FlagError> {
        let shorts = &token[1..];
        for (pos, c) in shorts.char_indices() {
            let Some(index) = self.flags.iter().position(|f| f.shorthand == Some(c)) else {
                if c == 'h' {
                    return Err(FlagError::HelpRequested);
                }
                return Err(FlagError::UnknownShorthand {
                    shorthand: c,
                    token: token.to_string(),
                });
            };
            let rest = &shorts[pos + c.len_utf8()..];

            if let Some(value) = rest.strip_prefix('=') {
                self.apply(index, value)?;
                return Ok(next);
            }
            if !self.flags[index].kind().takes_value() {
                self.apply(index, "true")?;
                continue;
            }
            let value = if !rest.is_empty() {
                rest.to_string()
            } else if let Some(value) = args.get(next) {
                next += 1;
                value.clone()
            } else {
                return Err(FlagError::MissingValue(format!("{c:?} in {token}")));
            };
            self.apply(index, &value)?;
            return Ok(next);
        }
        Ok(next)
    }

    fn apply(&mut self, index: usize, value: &str) -> Result<(), FlagError> {
        self.flags[index].set(value)?;
        let flag = &self.flags[index];
        debug!(set = %self.name, flag = %flag.name, value = %flag.value, "flag set");
        if let Some(notice) = flag.deprecated.clone() {
            let text = format!("Flag --{} has been deprecated, {notice}", flag.name);
            self.emit(&text);
        }
        Ok(())
    }

    /// Renders the aligned usage listing of every listed flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdtree_flags::FlagSet;
    ///
    /// let mut set = FlagSet::new("app");
    /// set.string_p("author", 'a', "YOUR NAME", "author name")
    ///     .bool("dry-run", false, "print only");
    ///
    /// let usages = set.flag_usages();
    /// assert!(usages.contains("-a, --author string"));
    /// assert!(usages.contains("(default \"YOUR NAME\")"));
    /// assert!(usages.contains("    --dry-run"));
    /// ```
    pub fn flag_usages(&self) -> String {
        let mut listed: Vec<&Flag> = self.flags.iter().filter(|f| f.is_listed()).collect();
        if self.sort_flags {
            listed.sort_by(|a, b| a.name.cmp(&b.name));
        }

        let lefts: Vec<String> = listed
            .iter()
            .map(|flag| {
                let mut left = match flag.shorthand {
                    Some(c) => format!("  -{c}, --{}", flag.name),
                    None => format!("      --{}", flag.name),
                };
                let label = flag.kind().type_label();
                if !label.is_empty() {
                    left.push(' ');
                    left.push_str(label);
                }
                left
            })
            .collect();
        let width = lefts.iter().map(String::len).max().unwrap_or(0);

        let mut out = String::new();
        for (flag, left) in listed.iter().zip(&lefts) {
            out.push_str(&format!("{left:<width$}   {}", flag.usage));
            if !flag.default.is_zero() {
                match &flag.default {
                    FlagValue::String(s) => out.push_str(&format!(" (default {s:?})")),
                    other => out.push_str(&format!(" (default {other})")),
                }
            }
            out.push('\n');
        }
        out
    }

    /// Merges definitions from `other` whose names are absent here.
    ///
    /// `other` is left untouched. Merged entries are tracked so a later
    /// [`clear_merged`](Self::clear_merged) can drop them again.
    ///
    /// # Panics
    ///
    /// Panics if a merged flag's shorthand is already used by a different
    /// flag of this set. Routing and parsing would otherwise disagree about
    /// which flag the shorthand selects.
    pub fn add_flag_set(&mut self, other: &FlagSet) {
        for flag in &other.flags {
            if self.lookup(&flag.name).is_some() {
                continue;
            }
            if let Some(c) = flag.shorthand {
                if let Some(existing) = self.lookup_shorthand(c) {
                    panic!(
                        "{}",
                        FlagError::ShorthandRedefined {
                            set: self.name.clone(),
                            shorthand: c,
                            existing: existing.name.clone(),
                        }
                    );
                }
            }
            debug!(set = %self.name, flag = %flag.name, "merged flag");
            self.merged.insert(flag.name.clone());
            self.flags.push(flag.clone());
        }
    }

    /// Drops every flag added by [`add_flag_set`](Self::add_flag_set).
    pub fn clear_merged(&mut self) {
        let merged = std::mem::take(&mut self.merged);
        self.flags.retain(|f| !merged.contains(&f.name));
    }

    /// Returns `true` if the named flag was merged in rather than defined here.
    pub fn is_merged(&self, name: &str) -> bool {
        self.merged.contains(name)
    }

    /// Copies the values of flags changed in `parsed` into same-named,
    /// same-kind flags of this set for which `keep` returns `true`.
    ///
    /// Returns the number of flags updated.
    pub fn absorb_where(&mut self, parsed: &FlagSet, keep: impl Fn(&str) -> bool) -> usize {
        let mut updated = 0;
        for flag in &mut self.flags {
            if !keep(&flag.name) {
                continue;
            }
            let Some(source) = parsed.lookup(&flag.name) else {
                continue;
            };
            if source.changed && source.kind() == flag.kind() {
                flag.value = source.value.clone();
                flag.changed = true;
                updated += 1;
            }
        }
        updated
    }

}

fn mismatch(expected: &'static str, actual: &FlagValue) -> FlagError {
    let actual = match actual.kind() {
        FlagKind::Bool => "bool",
        FlagKind::Int => "int",
        FlagKind::String => "string",
        FlagKind::StringSlice => "stringSlice",
    };
    FlagError::TypeMismatch { expected, actual }
}
