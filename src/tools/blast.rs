//! @ai:module:intent BLAST result classification
//! @ai:module:layer domain
//! @ai:module:stateless true

use super::Status;
use crate::runner::RunOutcome;

/// @ai:intent Map a BLAST run to a status; the last matching line wins
/// @ai:effects pure
pub(super) fn classify(outcome: &RunOutcome) -> Status {
    let code = outcome.exit_code;

    outcome
        .output
        .lines()
        .filter_map(|line| {
            if line.starts_with("Error found! The system is unsafe :-(") {
                Some(Status::Unsafe)
            } else if line.starts_with("No error found.  The system is safe :-)") {
                Some(Status::Safe)
            } else if code == 2 && line.starts_with("Fatal error: out of memory.") {
                Some(Status::OutOfMemory)
            } else if code == 2
                && line.starts_with("Ack! The gremlins again!: Sys_error(\"Broken pipe\")")
            {
                Some(Status::Timeout)
            } else {
                None
            }
        })
        .last()
        .unwrap_or(Status::Unknown)
}
