//! Units of work and the shell-backed implementation.

use std::io::Write;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

/// A unit of work run under the host's control. The work writes its
/// line-oriented output to the console it is given; the host decides what
/// that console is wired to, and may decorate it before the work starts.
#[async_trait]
pub trait Work: Send {
    async fn run(&mut self, console: &mut (dyn Write + Send)) -> anyhow::Result<()>;
}

/// Work that runs a shell command (sh on Unix, PowerShell on Windows) and
/// streams the child's stdout and stderr into the console line by line while
/// the child runs. A non-zero exit status is a failure.
pub struct ShellWork {
    command: String,
}

impl ShellWork {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Work for ShellWork {
    async fn run(&mut self, console: &mut (dyn Write + Send)) -> anyhow::Result<()> {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("powershell.exe");
            c.arg("-NoLogo").arg("-NoProfile").arg("-Command").arg(&self.command);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.command);
            c
        };
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        debug!("spawning shell work: {}", self.command);
        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn shell command '{}'", self.command))?;
        let stdout = child.stdout.take().expect("stdout is piped");
        let stderr = child.stderr.take().expect("stderr is piped");
        let mut out_lines = BufReader::new(stdout).lines();
        let mut err_lines = BufReader::new(stderr).lines();

        let mut out_done = false;
        let mut err_done = false;
        while !(out_done && err_done) {
            tokio::select! {
                line = out_lines.next_line(), if !out_done => {
                    match line.context("reading command stdout")? {
                        Some(l) => writeln!(console, "{}", l)?,
                        None => out_done = true,
                    }
                }
                line = err_lines.next_line(), if !err_done => {
                    match line.context("reading command stderr")? {
                        Some(l) => writeln!(console, "{}", l)?,
                        None => err_done = true,
                    }
                }
            }
        }

        let status = child.wait().await.context("waiting for shell command")?;
        if !status.success() {
            anyhow::bail!(
                "shell command '{}' exited with code {:?}",
                self.command,
                status.code()
            );
        }
        Ok(())
    }
}
