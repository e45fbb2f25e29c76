//! @ai:module:intent Locate the benchmarked tool and determine its version
//! @ai:module:layer infrastructure
//! @ai:module:public_api find_executable, probe_version
//! @ai:module:stateless true

use crate::error::{BenchError, Result};
use crate::tools::Tool;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// @ai:intent Check that a path is a regular file with an execute bit
/// @ai:effects fs:read
fn is_executable(path: &Path) -> bool {
    let Ok(metadata) = std::fs::metadata(path) else {
        return false;
    };

    if !metadata.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        true
    }
}

/// @ai:intent Find an executable on PATH, then in ".", then at the fallback path
/// @ai:post Err(ToolNotFound) names the program when nothing qualifies
/// @ai:effects fs:read, env:read
pub fn find_executable(program: &str, fallback: Option<&str>) -> Result<String> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let mut dirs: Vec<PathBuf> = std::env::split_paths(&path_var).collect();
    dirs.push(PathBuf::from("."));

    for dir in dirs {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            tracing::debug!("Found {} at {}.", program, candidate.display());
            return Ok(candidate.to_string_lossy().into_owned());
        }
    }

    if let Some(fallback) = fallback {
        if is_executable(Path::new(fallback)) {
            tracing::debug!("Using fallback executable {} for {}.", fallback, program);
            return Ok(fallback.to_string());
        }
    }

    Err(BenchError::ToolNotFound {
        program: program.to_string(),
    })
}

/// @ai:intent Run a command and capture stdout, optionally with stderr merged in
/// @ai:post None when the command fails to start or outlives `limit`; the child is killed then
/// @ai:effects process:spawn
async fn capture(
    program: &str,
    args: &[&str],
    merge_stderr: bool,
    limit: Duration,
) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(limit, output).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::debug!("Version probe {} failed: {}", program, e);
            return None;
        }
        Err(_) => {
            tracing::warn!(
                "Version probe {} did not finish within {}s.",
                program,
                limit.as_secs()
            );
            return None;
        }
    };

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if merge_stderr {
        text.push_str(&String::from_utf8_lossy(&output.stderr));
    }

    Some(text)
}

/// @ai:intent Extract the revision from `svn info` output
/// @ai:effects pure
fn svn_revision(info: &str) -> Option<String> {
    info.lines()
        .find_map(|line| line.strip_prefix("Revision: "))
        .map(|rev| format!("r{}", rev.trim()))
}

/// @ai:intent Best-effort version string of the tool for report headers
/// @ai:post empty when the version cannot be determined
/// @ai:effects process:spawn
pub async fn probe_version(tool: Tool, executable: &str) -> String {
    let version = match tool {
        Tool::Cbmc | Tool::Satabs => capture(executable, &["--version"], false, PROBE_TIMEOUT)
            .await
            .map(|out| out.trim().to_string()),
        Tool::Wolverine => capture(executable, &["--version"], false, PROBE_TIMEOUT)
            .await
            .and_then(|out| out.split_whitespace().nth(1).map(str::to_string)),
        Tool::Blast => capture(executable, &[], true, PROBE_TIMEOUT)
            .await
            .map(|out| out.chars().skip(6).take(3).collect::<String>()),
        Tool::Cpachecker => capture("svn", &["info", executable], false, PROBE_TIMEOUT)
            .await
            .and_then(|out| svn_revision(&out)),
        Tool::Acsar => None,
    };

    version.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_executable_on_path() {
        let found = find_executable("sh", None).unwrap();
        assert!(found.ends_with("/sh"));
    }

    #[test]
    fn test_missing_tool_is_not_found() {
        let err = find_executable("verify_bench_nonexistent_tool_xyz", None).unwrap_err();
        assert!(matches!(err, BenchError::ToolNotFound { ref program } if program == "verify_bench_nonexistent_tool_xyz"));
        assert_eq!(
            err.to_string(),
            "Could not find verify_bench_nonexistent_tool_xyz executable"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_fallback_requires_execute_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let script = temp.path().join("cpa.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();
        let fallback = script.to_str().unwrap();

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(find_executable("verify_bench_nonexistent_cpa", Some(fallback)).is_err());

        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(
            find_executable("verify_bench_nonexistent_cpa", Some(fallback)).unwrap(),
            fallback
        );
    }

    #[test]
    fn test_svn_revision() {
        let info = "Path: cpachecker\nURL: https://svn.example.org/cpachecker\nRevision: 4711\n";
        assert_eq!(svn_revision(info).as_deref(), Some("r4711"));
        assert_eq!(svn_revision("Path: x\n"), None);
    }

    #[tokio::test]
    async fn test_probe_version_failure_is_empty() {
        assert_eq!(probe_version(Tool::Cbmc, "/nonexistent/cbmc").await, "");
        assert_eq!(probe_version(Tool::Acsar, "acsar").await, "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hanging_probe_is_abandoned() {
        let started = std::time::Instant::now();
        let out = capture("sh", &["-c", "sleep 30"], false, Duration::from_millis(300)).await;

        assert_eq!(out, None);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_capture_merges_stderr_on_request() {
        let script = ["-c", "echo out; echo err 1>&2"];
        let out = capture("sh", &script, false, PROBE_TIMEOUT).await;
        assert_eq!(out.as_deref(), Some("out\n"));

        let out = capture("sh", &script, true, PROBE_TIMEOUT).await;
        assert_eq!(out.as_deref(), Some("out\nerr\n"));
    }
}
