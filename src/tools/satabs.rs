//! @ai:module:intent SatAbs and Wolverine result classification
//! @ai:module:layer domain
//! @ai:module:stateless true

use super::Status;
use crate::runner::RunOutcome;

/// @ai:intent Map a SatAbs-family run to a status
/// @ai:pre wolverine selects the Wolverine exit-code conventions
/// @ai:effects pure
pub(super) fn classify(outcome: &RunOutcome, wolverine: bool) -> Status {
    let output = outcome.output.as_str();
    let code = outcome.exit_code;

    if output.contains("VERIFICATION SUCCESSFUL") {
        expect_exit(code, 0);
        Status::Safe
    } else if output.contains("VERIFICATION FAILED") {
        expect_exit(code, 10);
        Status::Unsafe
    } else if code == -9 {
        Status::Timeout
    } else if code == -6 || (wolverine && code == 6 && output.contains("Out of memory")) {
        Status::OutOfMemory
    } else if code == parsing_error_code(wolverine) && output.contains("PARSING ERROR") {
        Status::ParsingError
    } else {
        Status::Failure
    }
}

fn parsing_error_code(wolverine: bool) -> i32 {
    if wolverine {
        6
    } else {
        1
    }
}

fn expect_exit(actual: i32, expected: i32) {
    if actual != expected {
        tracing::warn!(
            "Verdict in tool output does not match exit code {} (expected {}).",
            actual,
            expected
        );
    }
}
