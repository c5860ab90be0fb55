//! Remote validation: invoke the target tool against a scratch config and
//! classify the result. This is the sole gate in front of a commit.

use crate::error::ProvisionError;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::debug;
use wait_timeout::ChildExt;

/// Hard deadline for one validation command. The per-tool commands already
/// carry short connect/read timeouts; this bounds a wedged binary.
pub const VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

/// An external validation invocation: program, arguments and the
/// environment overrides that point the tool at the scratch config.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

/// Run the validation command for `tool`/`remote` unless `skip` is set.
///
/// Non-zero exit, timeout and spawn failure all classify as
/// `ValidationFailed`; the diagnostic carries the command's combined
/// stdout+stderr when there is any, so the user sees the tool's own words
/// rather than a generic failure.
pub fn validate(
    spec: &CommandSpec,
    tool: &str,
    remote: &str,
    skip: bool,
) -> Result<(), ProvisionError> {
    if skip {
        debug!(tool, remote, "validation skipped by request");
        return Ok(());
    }
    run_checked(spec, VALIDATION_TIMEOUT).map_err(|diagnostic| {
        ProvisionError::ValidationFailed {
            tool: tool.to_string(),
            remote: remote.to_string(),
            diagnostic,
        }
    })
}

/// Run a command to completion within `timeout`. Ok on exit status zero;
/// otherwise the combined captured output (or a description of what went
/// wrong) as the error value.
fn run_checked(spec: &CommandSpec, timeout: Duration) -> Result<(), String> {
    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .envs(spec.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program = %spec.program, args = ?spec.args, "running validation command");
    let mut child = command
        .spawn()
        .map_err(|e| format!("failed to run {}: {}", spec.program, e))?;

    // Drain both pipes off-thread so a chatty child cannot block on a full
    // pipe while we wait on it.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    match child.wait_timeout(timeout) {
        Ok(Some(status)) => {
            let mut combined = join_output(stdout);
            combined.extend(join_output(stderr));
            if status.success() {
                Ok(())
            } else if combined.is_empty() {
                Err(format!("{} exited with {}", spec.program, status))
            } else {
                Err(String::from_utf8_lossy(&combined).into_owned())
            }
        }
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            let _ = (join_output(stdout), join_output(stderr));
            Err(format!(
                "{} did not finish within {}s and was terminated",
                spec.program,
                timeout.as_secs()
            ))
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            Err(format!("failed waiting for {}: {}", spec.program, e))
        }
    }
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        buf
    })
}

fn join_output(handle: JoinHandle<Vec<u8>>) -> Vec<u8> {
    handle.join().unwrap_or_default()
}
