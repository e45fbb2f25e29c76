//! @ai:module:intent ACSAR source preparation and result classification
//! @ai:module:layer domain
//! @ai:module:stateless true

use super::Status;
use crate::runner::RunOutcome;
use std::io::Write;
use std::path::Path;
use tempfile::TempPath;

/// Output markers checked in order; the first match decides.
const MARKERS: &[(&str, Status)] = &[
    ("syntax error", Status::SyntaxError),
    ("runtime error", Status::RuntimeError),
    (
        "can not be used as a root procedure because it is not defined",
        Status::NoMain,
    ),
    (
        "For Error Location <<ERROR_LOCATION>>: I don't Know ",
        Status::Timeout,
    ),
    ("received signal 6", Status::Abort),
    ("received signal 11", Status::Segfault),
    ("received signal 15", Status::Killed),
    (
        "Error Location <<ERROR_LOCATION>> is reachable via the following path",
        Status::Unsafe,
    ),
];

/// @ai:intent Rewrite error labels into the single label ACSAR searches for
/// @ai:effects pure
pub(super) fn rewrite_error_labels(content: &str) -> String {
    content
        .replace("ERROR;", "ERROR_LOCATION;")
        .replace("ERROR:", "ERROR_LOCATION:")
        .replace("errorFn();", "goto ERROR_LOCATION; ERROR_LOCATION:;")
}

/// @ai:intent Write the rewritten source to a scratch file beside the original
/// @ai:post the returned path deletes the file when dropped
/// @ai:effects fs:read, fs:write
pub(super) fn prepare_source(source: &str) -> std::io::Result<TempPath> {
    let content = std::fs::read_to_string(source)?;
    let path = Path::new(source);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix(&format!("{stem}."))
        .suffix("_acsar.c")
        .tempfile_in(dir)?;
    file.write_all(rewrite_error_labels(&content).as_bytes())?;
    file.flush()?;

    Ok(file.into_temp_path())
}

/// @ai:intent Map an ACSAR run to a status by its output markers
/// @ai:effects pure
pub(super) fn classify(outcome: &RunOutcome) -> Status {
    MARKERS
        .iter()
        .find(|(marker, _)| outcome.output.contains(marker))
        .map(|(_, status)| *status)
        .unwrap_or(Status::Safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{outcome, Tool};
    use tempfile::TempDir;

    #[test]
    fn test_rewrite_error_labels() {
        let source = "if (x) goto ERROR;\nERROR: return;\nerrorFn();\n";
        assert_eq!(
            rewrite_error_labels(source),
            "if (x) goto ERROR_LOCATION;\nERROR_LOCATION: return;\ngoto ERROR_LOCATION; ERROR_LOCATION:;\n"
        );
    }

    #[test]
    fn test_markers_in_order() {
        assert_eq!(
            classify(&outcome(0, "syntax error\nreceived signal 11")),
            Status::SyntaxError
        );
        assert_eq!(
            classify(&outcome(0, "main can not be used as a root procedure because it is not defined")),
            Status::NoMain
        );
        assert_eq!(
            classify(&outcome(0, "For Error Location <<ERROR_LOCATION>>: I don't Know \n")),
            Status::Timeout
        );
        assert_eq!(classify(&outcome(0, "received signal 6")), Status::Abort);
        assert_eq!(classify(&outcome(0, "received signal 15")), Status::Killed);
        assert_eq!(
            classify(&outcome(
                0,
                "Error Location <<ERROR_LOCATION>> is reachable via the following path"
            )),
            Status::Unsafe
        );
        assert_eq!(classify(&outcome(0, "done")), Status::Safe);
    }

    #[test]
    fn test_scratch_file_lives_beside_source_and_is_removed() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("loop.c");
        std::fs::write(&source, "ERROR: ;\n").unwrap();

        let invocation = Tool::Acsar
            .prepare("acsar", &[], source.to_str().unwrap())
            .unwrap();

        let scratch = invocation.scratch_path().unwrap().to_path_buf();
        assert_eq!(scratch.parent(), Some(temp.path()));
        assert!(scratch.to_string_lossy().ends_with("_acsar.c"));
        assert_eq!(
            std::fs::read_to_string(&scratch).unwrap(),
            "ERROR_LOCATION: ;\n"
        );
        assert_eq!(invocation.args[1], "--file");
        assert_eq!(invocation.args[2], scratch.to_string_lossy());
        assert_eq!(&invocation.args[3..], ["--mainproc", "main"]);

        drop(invocation);
        assert!(!scratch.exists());
    }

    #[test]
    fn test_existing_mainproc_is_kept() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("entry.c");
        std::fs::write(&source, "").unwrap();

        let options = vec!["--mainproc".to_string(), "entry".to_string()];
        let invocation = Tool::Acsar
            .prepare("acsar", &options, source.to_str().unwrap())
            .unwrap();
        assert_eq!(&invocation.args[3..], ["--mainproc", "entry"]);
    }

    #[test]
    fn test_unreadable_source_fails_preparation() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.c");
        assert!(Tool::Acsar
            .prepare("acsar", &[], missing.to_str().unwrap())
            .is_err());
    }
}
