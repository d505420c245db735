use std::{
    fmt, io,
    io::Read,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
    thread,
};

use anyhow::{Context, Result};
use serde::Serialize;

const DEFAULT_MAX_CAPTURE_BYTES: usize = 1024 * 1024;

/// Exit code reported when a tool cannot be started, as a POSIX shell does.
pub const COMMAND_NOT_FOUND_CODE: i32 = 127;

#[derive(Debug, Clone)]
pub struct RunOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// A fully resolved external tool call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.to_path_buf(),
        }
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Execute a program and capture stdout/stderr.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned or the I/O streams cannot
/// be read entirely.
pub fn run_command(invocation: &ToolInvocation) -> Result<RunOutput> {
    let mut command = configured_command(invocation);
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let program = &invocation.program;
    let mut child = command
        .spawn()
        .with_context(|| format!("failed to start {program}"))?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow::anyhow!("stdout missing for {program}"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow::anyhow!("stderr missing for {program}"))?;
    let stdout_handle =
        thread::spawn(move || read_to_string_limited(stdout, DEFAULT_MAX_CAPTURE_BYTES));
    let stderr_handle =
        thread::spawn(move || read_to_string_limited(stderr, DEFAULT_MAX_CAPTURE_BYTES));

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for {program}"))?;
    let (mut stdout, stdout_truncated) = stdout_handle
        .join()
        .map_err(|_| anyhow::anyhow!("stdout thread panicked"))??;
    let (mut stderr, stderr_truncated) = stderr_handle
        .join()
        .map_err(|_| anyhow::anyhow!("stderr thread panicked"))??;
    if stdout_truncated {
        stdout.push_str("\n[...truncated...]\n");
    }
    if stderr_truncated {
        stderr.push_str("\n[...truncated...]\n");
    }
    Ok(RunOutput {
        code: exit_code(status),
        stdout,
        stderr,
    })
}

/// Execute a program with inherited stdio so the tool talks to the terminal directly.
///
/// # Errors
///
/// Returns an error when the program cannot be spawned.
pub fn run_command_passthrough(invocation: &ToolInvocation) -> Result<RunOutput> {
    let mut command = configured_command(invocation);
    command.stdin(Stdio::inherit());
    command.stdout(Stdio::inherit());
    command.stderr(Stdio::inherit());

    let status = command
        .status()
        .with_context(|| format!("failed to start {}", invocation.program))?;
    Ok(RunOutput {
        code: exit_code(status),
        stdout: String::new(),
        stderr: String::new(),
    })
}

/// True when `err` stems from the program not existing on disk or on `PATH`.
#[must_use]
pub fn is_not_found(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
    })
}

fn configured_command(invocation: &ToolInvocation) -> Command {
    let mut command = Command::new(&invocation.program);
    command.args(&invocation.args);
    command.current_dir(&invocation.cwd);
    command
}

// Shell-style: a child killed by a signal reports 128 + signal.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    -1
}

fn read_to_string_limited(mut reader: impl Read, limit: usize) -> Result<(String, bool)> {
    let mut buffer = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];
    loop {
        let read = reader.read(&mut chunk)?;
        if read == 0 {
            break;
        }
        append_limited(&mut buffer, &chunk[..read], limit, &mut truncated);
    }
    Ok((String::from_utf8_lossy(&buffer).to_string(), truncated))
}

// Keeps the most recent `limit` bytes.
fn append_limited(buffer: &mut Vec<u8>, chunk: &[u8], limit: usize, truncated: &mut bool) {
    if limit == 0 {
        return;
    }
    if buffer.len().saturating_add(chunk.len()) <= limit {
        buffer.extend_from_slice(chunk);
        return;
    }
    *truncated = true;
    let old_len = buffer.len();
    let excess = old_len.saturating_add(chunk.len()).saturating_sub(limit);
    if excess >= old_len {
        buffer.clear();
        let drop_from_chunk = excess.saturating_sub(old_len).min(chunk.len());
        buffer.extend_from_slice(&chunk[drop_from_chunk..]);
    } else {
        buffer.drain(0..excess);
        buffer.extend_from_slice(chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> ToolInvocation {
        ToolInvocation::new(
            "/bin/sh",
            vec!["-c".to_string(), script.to_string()],
            Path::new("."),
        )
    }

    #[cfg(unix)]
    #[test]
    fn run_command_captures_output_and_status_unix() -> Result<()> {
        let output = run_command(&sh("printf out && printf err >&2; exit 7"))?;
        assert_eq!(output.code, 7);
        assert_eq!(output.stdout, "out");
        assert_eq!(output.stderr, "err");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn run_command_passthrough_returns_status_unix() -> Result<()> {
        let output = run_command_passthrough(&sh("exit 3"))?;
        assert_eq!(output.code, 3);
        assert!(output.stdout.is_empty());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn signal_exit_maps_to_128_plus_signal_unix() -> Result<()> {
        let output = run_command(&sh("kill -9 $$"))?;
        assert_eq!(output.code, 137);
        Ok(())
    }

    #[test]
    fn missing_program_is_reported_as_not_found() {
        let invocation = ToolInvocation::new(
            "pyship-definitely-not-a-real-tool",
            Vec::new(),
            Path::new("."),
        );
        let err = run_command(&invocation).expect_err("spawn should fail");
        assert!(is_not_found(&err));
    }

    #[test]
    fn append_limited_keeps_the_tail() {
        let mut buffer = b"abcd".to_vec();
        let mut truncated = false;
        append_limited(&mut buffer, b"efgh", 6, &mut truncated);
        assert!(truncated);
        assert_eq!(buffer, b"cdefgh");
    }

    #[test]
    fn invocation_display_joins_argv() {
        let invocation = ToolInvocation::new(
            "twine",
            vec!["upload".to_string(), "dist/a.whl".to_string()],
            Path::new("."),
        );
        assert_eq!(invocation.to_string(), "twine upload dist/a.whl");
    }
}
