//! @ai:module:intent CPAchecker result classification
//! @ai:module:layer domain
//! @ai:module:stateless true

use super::Status;
use crate::runner::{ResourceLimits, RunOutcome};

/// @ai:intent Map a CPAchecker run to a status
/// @ai:post a SIGKILL after (nearly) the whole CPU budget is a timeout, not a kill
/// @ai:effects pure
pub(super) fn classify(outcome: &RunOutcome, limits: &ResourceLimits) -> Status {
    // at or above 99% of the limit, compared in whole milliseconds
    let used = outcome.cpu_time.as_millis() * 100;
    let exhausted = limits
        .cpu_seconds()
        .is_some_and(|limit| used >= u128::from(limit) * 1000 * 99);

    if outcome.exit_code == -9 && exhausted {
        Status::Timeout
    } else {
        status_from_output(outcome.exit_code, &outcome.output)
    }
}

fn is_out_of_memory(line: &str) -> bool {
    line.contains("java.lang.OutOfMemoryError")
        || line.contains("std::bad_alloc")
        || line.contains("Cannot allocate memory")
        || line.starts_with("out of memory")
}

fn status_from_output(exit_code: i32, output: &str) -> Status {
    let mut status = match exit_code {
        0 => None,
        -6 => Some(Status::AbortedByMathsat),
        -9 => Some(Status::KilledBySignal9),
        143 => Some(Status::Killed),
        code => Some(Status::Error(Some(code))),
    };

    for line in output.lines() {
        if is_out_of_memory(line) {
            status = Some(Status::OutOfMemory);
        } else if line.contains("SIGSEGV") {
            status = Some(Status::SegmentationFault);
        } else if (exit_code == 0 || exit_code == 1) && line.contains("Exception") {
            status = Some(Status::Exception);
        } else if status.is_none() {
            if let Some(result) = line.strip_prefix("Verification result: ") {
                let result = result.trim();
                status = Some(if result.starts_with("SAFE") {
                    Status::Safe
                } else if result.starts_with("UNSAFE") {
                    Status::Unsafe
                } else {
                    Status::Unknown
                });
            }
        }

        if status.is_none() && line.starts_with("#Test cases computed:") {
            status = Some(Status::Ok);
        }
    }

    status.unwrap_or(Status::Unknown)
}
