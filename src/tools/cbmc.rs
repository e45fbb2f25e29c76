//! @ai:module:intent CBMC result classification from its XML user interface output
//! @ai:module:layer domain
//! @ai:module:stateless true

use super::Status;
use crate::runner::RunOutcome;
use quick_xml::events::Event;
use quick_xml::Reader;

pub(super) fn fallback_path() -> Option<&'static str> {
    match std::env::consts::ARCH {
        "x86_64" => Some("lib/native/x86_64-linux/cbmc"),
        "x86" => Some("lib/native/x86-linux/cbmc"),
        _ => None,
    }
}

/// Fields of the CBMC XML report the classifier looks at.
#[derive(Debug, Default, PartialEq)]
struct CbmcReport {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Clone, Copy)]
enum Field {
    Status,
    Reason,
}

/// @ai:intent Pull `cprover-status` and the failure reason out of a CBMC XML report
/// @ai:post Err when the document is not well-formed
fn parse_report(xml: &str) -> Result<CbmcReport, String> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut report = CbmcReport::default();
    let mut capture: Option<Field> = None;
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => {
                if path.is_empty() && seen_root {
                    return Err("multiple root elements".to_string());
                }
                seen_root = true;

                path.push(String::from_utf8_lossy(start.name().as_ref()).into_owned());
                let current: Vec<&str> = path.iter().map(String::as_str).collect();

                capture = match current.as_slice() {
                    [_, "cprover-status"] if report.status.is_none() => {
                        report.status = Some(String::new());
                        Some(Field::Status)
                    }
                    [_, "goto_trace", "failure", "reason"] if report.reason.is_none() => {
                        report.reason = Some(String::new());
                        Some(Field::Reason)
                    }
                    _ => None,
                };
            }
            Event::Empty(_) => {
                if path.is_empty() {
                    if seen_root {
                        return Err("multiple root elements".to_string());
                    }
                    seen_root = true;
                }
            }
            Event::End(_) => {
                path.pop();
                capture = None;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| e.to_string())?;
                append(&mut report, capture, &text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                append(&mut report, capture, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err("no root element".to_string());
    }
    if !path.is_empty() {
        return Err(format!("unclosed element <{}>", path.join("/")));
    }

    Ok(report)
}

fn append(report: &mut CbmcReport, capture: Option<Field>, text: &str) {
    let target = match capture {
        Some(Field::Status) => report.status.as_mut(),
        Some(Field::Reason) => report.reason.as_mut(),
        None => None,
    };

    if let Some(target) = target {
        target.push_str(text);
    }
}

/// @ai:intent Map a CBMC run to a status
/// @ai:effects pure
pub(super) fn classify(outcome: &RunOutcome, options: &[String]) -> Status {
    match outcome.exit_code {
        0 | 10 => classify_report(outcome, options),
        -9 => Status::Timeout,
        134 => Status::Aborted,
        137 => Status::KilledBySignal9,
        143 => Status::Killed,
        code => Status::Error(Some(code)),
    }
}

fn classify_report(outcome: &RunOutcome, options: &[String]) -> Status {
    // an empty tag name cannot be parsed
    let xml = outcome
        .output
        .replace("<>", "<emptyTag>")
        .replace("</>", "</emptyTag>");

    let report = match parse_report(&xml) {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!("Error parsing CBMC output: {}", e);
            return Status::Error(None);
        }
    };

    match report.status.as_deref().map(str::trim) {
        Some("FAILURE") => {
            if outcome.exit_code != 10 {
                tracing::warn!(
                    "CBMC reported FAILURE but exited with code {}.",
                    outcome.exit_code
                );
            }

            let reason = report.reason.unwrap_or_default();
            if reason.contains("unwinding assertion") {
                Status::Unknown
            } else {
                Status::Unsafe
            }
        }
        Some("SUCCESS") => {
            if outcome.exit_code != 0 {
                tracing::warn!(
                    "CBMC reported SUCCESS but exited with code {}.",
                    outcome.exit_code
                );
            }

            if options.iter().any(|o| o == "--no-unwinding-assertions") {
                Status::Unknown
            } else {
                Status::Safe
            }
        }
        _ => Status::Error(None),
    }
}
