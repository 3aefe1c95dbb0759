use std::io::Write;

use cmdtree_core::{BoxError, Command, CommandId, CommandTree, Invocation, Settings};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const ROOT_NAME: &str = "cmdtree-demo";

fn main() {
    init_logging();

    let result = load_settings().and_then(|settings| {
        let (mut tree, root) = build_tree(settings);
        tree.execute(root).map_err(|err| err.to_string())
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Reads settings from the file named by `CMDTREE_CONFIG`, if any.
fn load_settings() -> Result<Settings, String> {
    match std::env::var_os("CMDTREE_CONFIG") {
        Some(path) => {
            debug!(path = %path.to_string_lossy(), "loading settings");
            Settings::load(&path)
                .map_err(|e| format!("Failed to load {}: {e}", path.to_string_lossy()))
        }
        None => Ok(Settings::default()),
    }
}

fn build_tree(settings: Settings) -> (CommandTree, CommandId) {
    let mut tree = CommandTree::with_settings(settings);

    let root = tree.insert(
        Command::new(ROOT_NAME)
            .with_short("Demonstration of a cmdtree command tree")
            .with_long(
                "cmdtree-demo shows subcommand routing, global and local flags,\n\
                 and usage output built with cmdtree.",
            ),
    );
    let greet = tree.insert(
        Command::new("greet")
            .with_short("Print a greeting")
            .with_example("  cmdtree-demo greet --name Ada --times 2")
            .with_run(run_greet),
    );
    let echo = tree.insert(
        Command::new("echo [words]...")
            .with_short("Print the arguments given after --")
            .with_example("  cmdtree-demo echo --tag a,b -- hello world")
            .with_run(run_echo),
    );
    let config = tree.insert(Command::new("config").with_short("Inspect settings"));
    let show = tree.insert(
        Command::new("show")
            .with_short("Print the active settings as YAML")
            .with_run(run_config_show),
    );
    let commands = tree.insert(
        Command::new("commands")
            .with_short("List every command of the tree")
            .with_run(run_commands),
    );
    let version = tree.insert(
        Command::new("version")
            .with_short("Print the version")
            .with_run(|inv| {
                writeln!(inv.out(), "{ROOT_NAME} {PACKAGE_VERSION}")?;
                Ok(())
            }),
    );

    tree.add_command(root, &[greet, echo, config, commands, version]);
    tree.add_command(config, &[show]);

    tree.global_flags(root)
        .bool_p("verbose", 'v', false, "Print extra detail");
    tree.local_flags(greet)
        .string_p("name", 'n', "world", "Who to greet")
        .int("times", 1, "How many times to greet")
        .bool_p("shout", 's', false, "Upper-case the greeting");
    tree.local_flags(echo)
        .string_slice_p("tag", 't', &[], "Tags to prefix, comma separated");

    (tree, root)
}

fn run_greet(inv: &mut Invocation<'_>) -> Result<(), BoxError> {
    let flags = inv.flags();
    let name = flags.get_string("name")?;
    let times = flags.get_int("times")?;
    let shout = flags.get_bool("shout")?;
    let verbose = flags.get_bool("verbose")?;

    if times < 0 {
        return Err(format!("--times must not be negative, got {times}").into());
    }
    if verbose {
        writeln!(inv.out(), "greeting {name} {times} time(s)")?;
    }

    let mut greeting = format!("Hello, {name}!");
    if shout {
        greeting = greeting.to_uppercase();
    }
    for _ in 0..times {
        writeln!(inv.out(), "{greeting}")?;
    }
    Ok(())
}

fn run_echo(inv: &mut Invocation<'_>) -> Result<(), BoxError> {
    let tags = inv.flags().get_string_slice("tag")?;
    let words = inv.args().join(" ");
    if tags.is_empty() {
        writeln!(inv.out(), "{words}")?;
    } else {
        writeln!(inv.out(), "[{}] {words}", tags.join(","))?;
    }
    Ok(())
}

fn run_config_show(inv: &mut Invocation<'_>) -> Result<(), BoxError> {
    let yaml = serde_yaml::to_string(inv.tree().settings())?;
    inv.out().write_all(yaml.as_bytes())?;
    Ok(())
}

fn run_commands(inv: &mut Invocation<'_>) -> Result<(), BoxError> {
    let tree = inv.tree();
    let root = tree.root(inv.command());
    let verbose = inv.flags().get_bool("verbose")?;

    let mut pending = vec![root];
    while let Some(id) = pending.pop() {
        let path = tree.command_path(id);
        if verbose {
            let marker = if tree.is_runnable(id) { "run" } else { "-" };
            writeln!(inv.out(), "{path}  ({marker})")?;
        } else {
            writeln!(inv.out(), "{path}")?;
        }
        pending.extend(tree.children(id).iter().rev());
    }
    Ok(())
}
