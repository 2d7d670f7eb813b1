//! Running external programs, and the `dotnet` toolchain in particular.

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `-1` when the process was terminated by a signal.
    pub code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Run `program` with `args` in `cwd` and capture its output.
///
/// A non-zero exit is reported through [`CommandOutput::code`], not as an
/// error. Failing to start the process is an error.
pub fn run_command(program: &str, args: &[String], cwd: &Path) -> Result<CommandOutput> {
    tracing::debug!("Running `{} {}` in {}", program, args.join(" "), cwd.display());

    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| Error::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        code: output.status.code().unwrap_or(-1),
    })
}

/// Arguments of a `dotnet publish` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishArgs<'a> {
    pub configuration: &'a str,
    pub framework: &'a str,
    pub output: &'a Path,
    pub version: &'a str,
    pub max_cpu_count: usize,
}

/// The dotnet SDK command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    program: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolchain {
    pub fn new() -> Self {
        Self::with_program("dotnet")
    }

    /// Use a different executable in place of `dotnet`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn clean_args(configuration: &str, framework: &str) -> Vec<String> {
        vec![
            "clean".into(),
            format!("--configuration={configuration}"),
            format!("--framework={framework}"),
        ]
    }

    pub fn restore_args() -> Vec<String> {
        vec!["restore".into(), "--no-cache".into()]
    }

    pub fn publish_args(args: &PublishArgs<'_>) -> Vec<String> {
        vec![
            "publish".into(),
            "--nologo".into(),
            "--no-restore".into(),
            format!("--configuration={}", args.configuration),
            format!("--framework={}", args.framework),
            format!("-p:PublishDir={}", args.output.display()),
            format!("-p:Version={}", args.version),
            format!("-maxcpucount:{}", args.max_cpu_count),
        ]
    }

    pub fn clean(&self, cwd: &Path, configuration: &str, framework: &str) -> Result<CommandOutput> {
        self.run(cwd, Self::clean_args(configuration, framework))
    }

    pub fn restore(&self, cwd: &Path) -> Result<CommandOutput> {
        self.run(cwd, Self::restore_args())
    }

    pub fn publish(&self, cwd: &Path, args: &PublishArgs<'_>) -> Result<CommandOutput> {
        self.run(cwd, Self::publish_args(args))
    }

    /// Run one toolchain step, turning a non-zero exit into an error.
    fn run(&self, cwd: &Path, args: Vec<String>) -> Result<CommandOutput> {
        let command = format!("{} {}", self.program, args.join(" "));
        tracing::info!("Running `{command}`");

        let output = run_command(&self.program, &args, cwd)?;
        if output.success() {
            return Ok(output);
        }

        tracing::info!("{}", output.stdout);
        tracing::error!("{}", output.stderr);
        Err(Error::ToolchainFailure {
            command,
            code: output.code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_publish_args() {
        let output = PathBuf::from("/tmp/out");
        let args = Toolchain::publish_args(&PublishArgs {
            configuration: "Release",
            framework: "net5.0",
            output: &output,
            version: "1.2.0.0",
            max_cpu_count: 4,
        });

        assert_eq!(
            args.join(" "),
            "publish --nologo --no-restore --configuration=Release --framework=net5.0 \
             -p:PublishDir=/tmp/out -p:Version=1.2.0.0 -maxcpucount:4"
        );
    }

    #[test]
    fn test_clean_and_restore_args() {
        assert_eq!(
            Toolchain::clean_args("Debug", "netstandard2.1").join(" "),
            "clean --configuration=Debug --framework=netstandard2.1"
        );
        assert_eq!(Toolchain::restore_args().join(" "), "restore --no-cache");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command("jprm-definitely-not-installed", &[], dir.path());
        assert!(matches!(result, Err(Error::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = run_command("echo", &["hello".to_string()], dir.path()).unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[cfg(unix)]
    #[test]
    fn test_toolchain_failure() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain::with_program("false");

        let result = toolchain.restore(dir.path());

        match result {
            Err(Error::ToolchainFailure { command, code, .. }) => {
                assert_eq!(command, "false restore --no-cache");
                assert_ne!(code, 0);
            }
            other => panic!("expected ToolchainFailure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_toolchain_success() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain::with_program("true");
        assert!(toolchain.clean(dir.path(), "Release", "net5.0").unwrap().success());
    }
}
