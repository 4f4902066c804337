//! External command execution.
//!
//! Runs the transpiler, bundler and script minifier with captured output.
//! Stderr of successful runs is forwarded to the log (minus filtered noise);
//! failed runs become errors carrying the tool's diagnostics.

use crate::log;
use anyhow::{Context, Result};
use regex::Regex;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
    sync::OnceLock,
};

// ============================================================================
// Macros
// ============================================================================

/// Run a configured command with extra arguments appended.
///
/// # Examples
/// ```ignore
/// // In the project root
/// exec!(root; &config.scripts.bundle; entry, "-o", output)?;
///
/// // With a custom filter
/// exec!(filter=&BABEL_FILTER; root; &config.scripts.transpile; src)?;
/// ```
#[macro_export]
macro_rules! exec {
    (filter=$filter:expr; $root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::exec(
            Some($root),
            &$crate::utils::exec::internal::to_cmd_vec($cmd),
            &$crate::utils::exec::internal::filter_args(&[$($crate::utils::exec::internal::to_os($arg)),*]),
            $filter,
        )
    };
    ($root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::exec!(filter=&$crate::utils::exec::EMPTY_FILTER; $root; $cmd; $($arg),*)
    };
}

// ============================================================================
// Argument Conversion
// ============================================================================

#[doc(hidden)]
pub mod internal {
    use std::ffi::OsString;

    #[inline]
    pub fn to_os<S: Into<OsString>>(s: S) -> OsString {
        s.into()
    }

    pub trait ToCmd {
        fn to_cmd(self) -> Vec<OsString>;
    }

    impl<const N: usize> ToCmd for [&str; N] {
        fn to_cmd(self) -> Vec<OsString> {
            self.into_iter().map(OsString::from).collect()
        }
    }

    impl ToCmd for &[String] {
        fn to_cmd(self) -> Vec<OsString> {
            self.iter().map(OsString::from).collect()
        }
    }

    impl ToCmd for &Vec<String> {
        fn to_cmd(self) -> Vec<OsString> {
            self.iter().map(OsString::from).collect()
        }
    }

    #[inline]
    pub fn to_cmd_vec<C: ToCmd>(cmd: C) -> Vec<OsString> {
        cmd.to_cmd()
    }

    /// Drop empty args so optional flags can be passed as `""`.
    pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
        args.iter().filter(|a| !a.is_empty()).cloned().collect()
    }
}

// ============================================================================
// Command Execution
// ============================================================================

/// Execute a command and capture its output.
///
/// # Errors
/// Returns error if the command cannot be spawned or exits non-zero.
pub fn exec(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    log_output(&name, &output, filter)?;
    Ok(output)
}

fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let (program, leading) = cmd.split_first().context("Empty command")?;
    let name = program.to_string_lossy().into_owned();

    let mut command = Command::new(program);
    command.args(leading).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

// ============================================================================
// Output Filtering
// ============================================================================

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ANSI pattern"));
    re.replace_all(s, "")
}

/// Line prefixes to drop from tool output.
pub struct FilterRule {
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// The lines of `output` that survive the filter, ANSI codes preserved.
    fn keep<'a>(&self, output: &'a str) -> Vec<&'a str> {
        output
            .lines()
            .filter(|line| !self.should_skip(strip_ansi(line).trim()))
            .collect()
    }

    fn log(&self, name: &str, output: &str) {
        let lines = self.keep(output);
        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

fn log_output(name: &str, output: &Output, filter: &'static FilterRule) -> Result<()> {
    if !output.status.success() {
        anyhow::bail!(format_error(name, output, filter));
    }

    // On success only stderr (warnings) is interesting.
    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());

    Ok(())
}

fn format_error(name: &str, output: &Output, filter: &'static FilterRule) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}\n", output.status);
    msg.push_str(&filter.keep(stderr.trim()).join("\n"));

    let stdout = stdout.trim();
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout);
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::internal::*;
    use super::*;

    #[test]
    fn test_to_cmd_vec() {
        let cmd = to_cmd_vec(["babel", "--presets"]);
        assert_eq!(cmd, vec![OsString::from("babel"), OsString::from("--presets")]);

        let configured = vec!["uglifyjs".to_string()];
        assert_eq!(to_cmd_vec(&configured), vec![OsString::from("uglifyjs")]);
    }

    #[test]
    fn test_filter_args() {
        let args = [OsString::from("a"), OsString::from(""), OsString::from("b")];
        assert_eq!(filter_args(&args), vec![OsString::from("a"), OsString::from("b")]);
    }

    #[test]
    fn test_prepare_empty() {
        assert!(prepare(None, &[], &[]).is_err());
    }

    #[test]
    fn test_prepare_splits_program() {
        let cmd = to_cmd_vec(["browserify", "--debug"]);
        let (name, command) = prepare(None, &cmd, &[OsString::from("main.js")]).unwrap();
        assert_eq!(name, "browserify");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["--debug", "main.js"]);
    }

    #[test]
    fn test_filter_rule_keep() {
        let filter = FilterRule::new(&["WARN:"]);
        let kept = filter.keep("WARN: noisy\nreal problem\n\n\x1b[33mWARN:\x1b[0m colored");
        assert_eq!(kept, vec!["real problem"]);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_ansi("\x1b[1;32mBold\x1b[0m text"), "Bold text");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();

        let ok = exec(
            Some(dir.path()),
            &to_cmd_vec(["sh", "-c"]),
            &[OsString::from("echo done")],
            &EMPTY_FILTER,
        )
        .unwrap();
        assert_eq!(String::from_utf8_lossy(&ok.stdout).trim(), "done");

        let err = exec(
            Some(dir.path()),
            &to_cmd_vec(["sh", "-c"]),
            &[OsString::from("echo 'SyntaxError: unexpected token' >&2; exit 3")],
            &EMPTY_FILTER,
        )
        .unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Command `sh` failed"));
        assert!(msg.contains("SyntaxError: unexpected token"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failure_keeps_json_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let err = exec(
            Some(dir.path()),
            &to_cmd_vec(["sh", "-c"]),
            &[OsString::from(r#"echo '{"error":"Cannot find module ./missing"}'; exit 1"#)],
            &EMPTY_FILTER,
        )
        .unwrap_err();
        assert!(format!("{err}").contains("Cannot find module ./missing"));
    }
}
