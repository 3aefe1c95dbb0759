use std::fs;
use std::process::{Command, Output};

fn run_demo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmdtree-demo"))
        .args(args)
        .env_remove("CMDTREE_CONFIG")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cmdtree-demo")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

// ---------------------------------------------------------------------------
// Usage output
// ---------------------------------------------------------------------------

#[test]
fn no_arguments_prints_root_usage() {
    let output = run_demo(&[]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Usage:\n  cmdtree-demo [command]\n"));
    assert!(text.contains("Available Commands:\n"));
    assert!(text.contains("  greet      Print a greeting\n"));
    assert!(text.contains("Global Flags:\n  -v, --verbose   Print extra detail\n"));
}

#[test]
fn help_token_prints_subcommand_usage() {
    let output = run_demo(&["config", "help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.starts_with("Inspect settings\n\nUsage:\n  cmdtree-demo config [command]\n"));
    assert!(text.contains("  show   Print the active settings as YAML\n"));
}

#[test]
fn help_flag_prints_leaf_usage() {
    let output = run_demo(&["greet", "--help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Usage:\n  cmdtree-demo greet [flags]\n"));
    assert!(text.contains("Examples:\n  cmdtree-demo greet --name Ada --times 2\n"));
    assert!(text.contains("  -n, --name string   Who to greet (default \"world\")\n"));
}

// ---------------------------------------------------------------------------
// Running commands
// ---------------------------------------------------------------------------

#[test]
fn greet_with_local_and_global_flags() {
    let output = run_demo(&["-v", "greet", "--name", "Ada", "--times", "2"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout(&output),
        "greeting Ada 2 time(s)\nHello, Ada!\nHello, Ada!\n"
    );
}

#[test]
fn echo_receives_arguments_after_double_dash() {
    let output = run_demo(&["echo", "-t", "a,b", "--", "hello", "world"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "[a,b] hello world\n");
}

#[test]
fn commands_lists_tree_in_order() {
    let output = run_demo(&["commands"]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "cmdtree-demo\n\
         cmdtree-demo greet\n\
         cmdtree-demo echo\n\
         cmdtree-demo config\n\
         cmdtree-demo config show\n\
         cmdtree-demo commands\n\
         cmdtree-demo version\n"
    );
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn unknown_command_exits_with_error() {
    let output = run_demo(&["nope"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: Command not found: nope"));
}

#[test]
fn unknown_flag_exits_with_error() {
    let output = run_demo(&["greet", "--bogus"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown flag: --bogus"));
}

#[test]
fn run_failure_names_command() {
    let output = run_demo(&["greet", "--times", "-1"]);
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("command `cmdtree-demo greet` failed"));
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

#[test]
fn settings_file_switches_usage_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmdtree.yml");
    fs::write(&path, "usage_format: json\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cmdtree-demo"))
        .args(["greet", "help"])
        .env("CMDTREE_CONFIG", &path)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run cmdtree-demo");
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["command_path"], "cmdtree-demo greet");
    assert_eq!(view["runnable"], true);
    assert_eq!(view["local_flags"][0]["name"], "name");
}

#[test]
fn config_show_prints_loaded_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cmdtree.yml");
    fs::write(&path, "help_command: aide\nsort_flags: false\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cmdtree-demo"))
        .args(["config", "show"])
        .env("CMDTREE_CONFIG", &path)
        .output()
        .expect("failed to run cmdtree-demo");
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("help_command: aide\n"));
    assert!(text.contains("sort_flags: false\n"));
    assert!(text.contains("usage_format: text\n"));
}

#[test]
fn missing_settings_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_cmdtree-demo"))
        .args(["version"])
        .env("CMDTREE_CONFIG", dir.path().join("absent.yml"))
        .output()
        .expect("failed to run cmdtree-demo");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load"));
}
