use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail, eyre};
use futures::channel::oneshot;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

/// The result of an external tool that ran to completion.
#[derive(Debug)]
pub struct ToolRun {
    pub status: ExitStatus,
    pub stderr: String,
    /// Time from just before the spawn until the exit was observed.
    pub elapsed: Duration,
}

impl ToolRun {
    /// The last `lines` lines of stderr, which is where ffmpeg puts the actual error.
    pub fn stderr_tail(&self, lines: usize) -> String {
        let all: Vec<&str> = self.stderr.trim().lines().collect();
        all[all.len().saturating_sub(lines)..].join("\n")
    }
}

/// A launched tool. Resolves once, when the child has exited.
///
/// Dropping this does not kill the child, it just discards the result.
#[derive(Debug)]
pub struct PendingRun {
    program: String,
    receiver: oneshot::Receiver<std::io::Result<ToolRun>>,
}

impl PendingRun {
    pub async fn wait(self) -> Result<ToolRun> {
        let result = self.receiver.await.map_err(|_| {
            eyre!(
                "exit watcher for {} stopped before the process exited",
                self.program
            )
        })?;
        result.wrap_err_with(|| format!("failed waiting for {}", self.program))
    }
}

fn tool_name(program: &Path) -> String {
    program
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| program.display().to_string())
}

/// Starts `program` without waiting for it.
///
/// A background task waits for the exit and hands the [`ToolRun`] over to the returned
/// [`PendingRun`]. The exit code is captured but not judged here.
pub fn spawn_tool<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> Result<PendingRun> {
    let name = tool_name(program);
    let started = Instant::now();
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .wrap_err_with(|| format!("failed to run {name}"))?;
    debug!(tool = %name, pid = child.id(), "spawned");

    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        let result = child.wait_with_output().await.map(|output| ToolRun {
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            elapsed: started.elapsed(),
        });
        // Nobody listening anymore is fine, the process has finished either way.
        let _ = sender.send(result);
    });

    Ok(PendingRun {
        program: name,
        receiver,
    })
}

/// Runs `program` to completion and returns its stdout. A nonzero exit is an error.
pub async fn run_tool_output<S: AsRef<OsStr>>(program: &Path, args: &[S]) -> Result<Vec<u8>> {
    let name = tool_name(program);
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .wrap_err_with(|| format!("failed to run {name}"))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{name} failed: {}", stderr.trim());
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    const SH: &str = "/bin/sh";

    #[tokio::test]
    async fn test_pending_run_resolves_after_exit() -> Result<()> {
        let outer = Instant::now();
        let pending = spawn_tool(Path::new(SH), &["-c", "sleep 0.2"])?;
        let run = pending.wait().await?;
        let wall = outer.elapsed();

        assert!(run.status.success());
        assert!(run.elapsed >= Duration::from_millis(200));
        assert!(run.elapsed <= wall);
        Ok(())
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_captured_not_raised() -> Result<()> {
        let run = spawn_tool(Path::new(SH), &["-c", "echo broken >&2; exit 3"])?
            .wait()
            .await?;
        assert_eq!(run.status.code(), Some(3));
        assert_eq!(run.stderr_tail(1), "broken");
        Ok(())
    }

    #[tokio::test]
    async fn test_spawn_missing_program_fails() {
        let result = spawn_tool(Path::new("/definitely/not/here/ffmpeg"), &["-version"]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_tool_output() -> Result<()> {
        let stdout = run_tool_output(Path::new(SH), &["-c", "printf hello"]).await?;
        assert_eq!(stdout, b"hello");

        let err = run_tool_output(Path::new(SH), &["-c", "echo nope >&2; exit 1"])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
        Ok(())
    }

    #[test]
    fn test_stderr_tail() {
        let run = ToolRun {
            status: std::process::Command::new(SH)
                .arg("-c")
                .arg("true")
                .status()
                .unwrap(),
            stderr: "one\ntwo\nthree\n".to_string(),
            elapsed: Duration::ZERO,
        };
        assert_eq!(run.stderr_tail(2), "two\nthree");
        assert_eq!(run.stderr_tail(10), "one\ntwo\nthree");
    }
}
