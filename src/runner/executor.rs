//! @ai:module:intent Run one tool invocation under resource limits and a watchdog
//! @ai:module:layer infrastructure
//! @ai:module:public_api RunExecutor, RunOutcome
//! @ai:module:depends_on runner::limits, runner::watchdog, runner::interrupt, paths
//! @ai:module:stateless true

use crate::error::{BenchError, Result};
use crate::paths::expand_path;
use crate::runner::interrupt::Interrupt;
use crate::runner::limits::{children_cpu_time, ResourceLimits};
use crate::runner::watchdog::Watchdog;
use std::io::Read;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};

/// @ai:intent Everything observed about one finished tool run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Exit code, or the negated signal number when the tool was killed by a signal
    pub exit_code: i32,
    /// Interleaved stdout and stderr
    pub output: String,
    pub cpu_time: Duration,
    pub wall_time: Duration,
}

/// @ai:intent Spawns tools, waits for them and measures their resource use
#[derive(Debug, Clone)]
pub struct RunExecutor {
    grace: Duration,
}

impl RunExecutor {
    /// @ai:intent Executor whose watchdog allows `grace` beyond the CPU limit
    /// @ai:effects pure
    pub fn new(grace: Duration) -> Self {
        Self { grace }
    }

    /// @ai:intent Run a command line to completion and capture its merged output
    /// @ai:pre args[0] is the tool executable
    /// @ai:post the child has been reaped; cpu_time covers only this child
    /// @ai:effects process:spawn, process:kill, clock:read
    pub async fn execute(
        &self,
        args: &[String],
        limits: &ResourceLimits,
        interrupt: &mut Interrupt,
    ) -> Result<RunOutcome> {
        let args: Vec<String> = args.iter().map(|arg| expand_path(arg)).collect();
        let (program, rest) = args.split_first().ok_or_else(|| BenchError::Launch {
            program: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line"),
        })?;

        tracing::debug!("Running command line: {}", args.join(" "));

        let (mut reader, writer) = std::io::pipe()?;

        let mut cmd = Command::new(program);
        cmd.args(rest)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .kill_on_drop(true);

        #[cfg(unix)]
        {
            cmd.process_group(0);

            let limits = limits.clone();
            // SAFETY: the closure only calls setrlimit, which is async-signal-safe.
            unsafe {
                cmd.pre_exec(move || limits.apply());
            }
        }

        let cpu_before = children_cpu_time();
        let started = Instant::now();

        let spawned = cmd.spawn();
        // Our copies of the write end must be closed or the reader never sees EOF.
        drop(cmd);

        let mut child = spawned.map_err(|source| BenchError::Launch {
            program: program.clone(),
            source,
        })?;

        let pid = child.id();
        let mut drain = tokio::task::spawn_blocking(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf).map(|_| buf)
        });

        // Armed until the tool is reaped and every writer of the pipe is gone.
        let mut watchdog = Watchdog::arm(limits, self.grace);
        let mut reaped: Option<(ExitStatus, Duration, Duration)> = None;
        let mut output: Option<Vec<u8>> = None;

        while reaped.is_none() || output.is_none() {
            tokio::select! {
                status = child.wait(), if reaped.is_none() => {
                    let status = status?;
                    reaped = Some((
                        status,
                        started.elapsed(),
                        children_cpu_time().saturating_sub(cpu_before),
                    ));
                }
                drained = &mut drain, if output.is_none() => {
                    let bytes = drained
                        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;
                    output = Some(bytes);
                }
                _ = watchdog.expired() => {
                    tracing::warn!(
                        "{} is still running after its CPU limit plus {}s, killing it.",
                        program,
                        self.grace.as_secs()
                    );
                    watchdog.cancel();
                    kill_group(pid, &mut child);
                }
                _ = interrupt.triggered() => {
                    watchdog.cancel();
                    kill_group(pid, &mut child);
                    if reaped.is_none() {
                        let _ = child.wait().await;
                    }
                    if output.is_none() {
                        let _ = drain.await;
                    }
                    return Err(BenchError::Interrupted);
                }
            }
        }

        let (status, wall_time, cpu_time) = reaped.ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "tool was never reaped")
        })?;
        let output = output.unwrap_or_default();

        Ok(RunOutcome {
            exit_code: exit_code(status),
            output: String::from_utf8_lossy(&output).into_owned(),
            cpu_time,
            wall_time,
        })
    }
}

/// @ai:intent SIGKILL the tool and anything it spawned
/// @ai:pre pid was taken at spawn; the group outlives a reaped leader
/// @ai:effects process:kill
fn kill_group(pid: Option<u32>, child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        // SAFETY: kill has no memory-safety preconditions.
        unsafe {
            libc::kill(-(pid as libc::pid_t), libc::SIGKILL);
        }
    }

    if let Err(e) = child.start_kill() {
        tracing::debug!("Kill after group kill failed: {}", e);
    }
}

/// @ai:intent Map an exit status to the harness convention (negative for signals)
/// @ai:effects pure
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }

    -1
}
