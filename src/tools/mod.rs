//! @ai:module:intent Supported verification tools: invocation and result classification
//! @ai:module:layer domain
//! @ai:module:public_api Tool, Status, Invocation
//! @ai:module:depends_on runner
//! @ai:module:stateless true

mod acsar;
mod blast;
mod cbmc;
mod cpachecker;
mod satabs;

use crate::runner::{ResourceLimits, RunOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tempfile::TempPath;

/// @ai:intent Verification tool a benchmark runs, fixed when the definition loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Cbmc,
    Satabs,
    Wolverine,
    Acsar,
    Cpachecker,
    Blast,
}

/// @ai:intent Verdict or failure category of one run, as shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Safe,
    Unsafe,
    Unknown,
    Timeout,
    OutOfMemory,
    /// Generic error, optionally carrying the tool's exit code
    Error(Option<i32>),
    Aborted,
    AbortedByMathsat,
    Abort,
    Killed,
    KilledBySignal9,
    ParsingError,
    SyntaxError,
    RuntimeError,
    NoMain,
    Segfault,
    SegmentationFault,
    Exception,
    Failure,
    Ok,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Safe => write!(f, "SAFE"),
            Status::Unsafe => write!(f, "UNSAFE"),
            Status::Unknown => write!(f, "UNKNOWN"),
            Status::Timeout => write!(f, "TIMEOUT"),
            Status::OutOfMemory => write!(f, "OUT OF MEMORY"),
            Status::Error(None) => write!(f, "ERROR"),
            Status::Error(Some(code)) => write!(f, "ERROR ({code})"),
            Status::Aborted => write!(f, "ABORTED"),
            Status::AbortedByMathsat => write!(f, "ABORTED (probably by Mathsat)"),
            Status::Abort => write!(f, "ABORT"),
            Status::Killed => write!(f, "KILLED"),
            Status::KilledBySignal9 => write!(f, "KILLED BY SIGNAL 9"),
            Status::ParsingError => write!(f, "PARSING ERROR"),
            Status::SyntaxError => write!(f, "SYNTAX ERROR"),
            Status::RuntimeError => write!(f, "RUNTIME ERROR"),
            Status::NoMain => write!(f, "NO MAIN"),
            Status::Segfault => write!(f, "SEGFAULT"),
            Status::SegmentationFault => write!(f, "SEGMENTATION FAULT"),
            Status::Exception => write!(f, "EXCEPTION"),
            Status::Failure => write!(f, "FAILURE"),
            Status::Ok => write!(f, "OK"),
        }
    }
}

/// @ai:intent Command line for one run, plus any scratch file it depends on
/// @ai:invariant the scratch file is deleted when the invocation is dropped
#[derive(Debug)]
pub struct Invocation {
    /// Full argument vector, executable first
    pub args: Vec<String>,
    /// Options after tool-specific additions, as seen by the classifier
    pub options: Vec<String>,
    scratch: Option<TempPath>,
}

impl Invocation {
    fn plain(executable: &str, options: Vec<String>, source: &str) -> Self {
        let mut args = Vec::with_capacity(options.len() + 2);
        args.push(executable.to_string());
        args.extend(options.iter().cloned());
        args.push(source.to_string());

        Self {
            args,
            options,
            scratch: None,
        }
    }

    pub fn scratch_path(&self) -> Option<&std::path::Path> {
        self.scratch.as_deref()
    }
}

/// @ai:intent Append an option unless it is already present
/// @ai:effects pure
fn with_option(options: &[String], extra: &[&str]) -> Vec<String> {
    let mut options = options.to_vec();

    if let Some(first) = extra.first() {
        if !options.iter().any(|option| option == first) {
            options.extend(extra.iter().map(|s| s.to_string()));
        }
    }

    options
}

impl Tool {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Cbmc => "CBMC",
            Tool::Satabs => "SatAbs",
            Tool::Wolverine => "WOLVERINE",
            Tool::Acsar => "ACSAR",
            Tool::Cpachecker => "CPAchecker",
            Tool::Blast => "BLAST",
        }
    }

    /// @ai:intent Executable name searched on PATH
    pub fn program(&self) -> &'static str {
        match self {
            Tool::Cbmc => "cbmc",
            Tool::Satabs => "satabs",
            Tool::Wolverine => "wolverine",
            Tool::Acsar => "acsar",
            Tool::Cpachecker => "cpachecker",
            Tool::Blast => "pblast.opt",
        }
    }

    /// @ai:intent Path tried when the executable is not on PATH
    pub fn fallback_path(&self) -> Option<&'static str> {
        match self {
            Tool::Cbmc => cbmc::fallback_path(),
            Tool::Cpachecker => Some("scripts/cpa.sh"),
            _ => None,
        }
    }

    /// @ai:intent Whether this tool's output carries the metrics named by columns
    pub fn extracts_columns(&self) -> bool {
        matches!(self, Tool::Cpachecker)
    }

    /// @ai:intent Build the argument vector for one source file
    /// @ai:post ACSAR gets a preprocessed scratch copy next to the source
    /// @ai:effects fs:read, fs:write (ACSAR only)
    pub fn prepare(
        &self,
        executable: &str,
        options: &[String],
        source: &str,
    ) -> std::io::Result<Invocation> {
        let invocation = match self {
            Tool::Cbmc => Invocation::plain(executable, with_option(options, &["--xml-ui"]), source),
            Tool::Cpachecker => {
                Invocation::plain(executable, with_option(options, &["-stats"]), source)
            }
            Tool::Acsar => {
                let scratch = acsar::prepare_source(source)?;
                let options = with_option(options, &["--mainproc", "main"]);

                let mut args = vec![
                    executable.to_string(),
                    "--file".to_string(),
                    scratch.to_string_lossy().into_owned(),
                ];
                args.extend(options.iter().cloned());

                Invocation {
                    args,
                    options,
                    scratch: Some(scratch),
                }
            }
            Tool::Satabs | Tool::Wolverine | Tool::Blast => {
                Invocation::plain(executable, options.to_vec(), source)
            }
        };

        Ok(invocation)
    }

    /// @ai:intent Derive the status of a finished run from its exit code and output
    /// @ai:effects pure
    pub fn classify(
        &self,
        outcome: &RunOutcome,
        options: &[String],
        limits: &ResourceLimits,
    ) -> Status {
        match self {
            Tool::Cbmc => cbmc::classify(outcome, options),
            Tool::Satabs => satabs::classify(outcome, false),
            Tool::Wolverine => satabs::classify(outcome, true),
            Tool::Acsar => acsar::classify(outcome),
            Tool::Cpachecker => cpachecker::classify(outcome, limits),
            Tool::Blast => blast::classify(outcome),
        }
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "cbmc" => Ok(Tool::Cbmc),
            "satabs" => Ok(Tool::Satabs),
            "wolverine" => Ok(Tool::Wolverine),
            "acsar" => Ok(Tool::Acsar),
            "cpachecker" => Ok(Tool::Cpachecker),
            "blast" => Ok(Tool::Blast),
            other => Err(format!("unknown tool {other:?}")),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
pub(crate) fn outcome(exit_code: i32, output: &str) -> RunOutcome {
    use std::time::Duration;

    RunOutcome {
        exit_code,
        output: output.to_string(),
        cpu_time: Duration::from_millis(100),
        wall_time: Duration::from_millis(120),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_status_display_strings() {
        assert_eq!(Status::OutOfMemory.to_string(), "OUT OF MEMORY");
        assert_eq!(Status::Error(None).to_string(), "ERROR");
        assert_eq!(Status::Error(Some(3)).to_string(), "ERROR (3)");
        assert_eq!(
            Status::AbortedByMathsat.to_string(),
            "ABORTED (probably by Mathsat)"
        );
        assert_eq!(Status::KilledBySignal9.to_string(), "KILLED BY SIGNAL 9");
    }

    #[test]
    fn test_tool_names_deserialize_lowercase() {
        #[derive(Deserialize)]
        struct Holder {
            tool: Tool,
        }

        let holder: Holder = toml::from_str("tool = \"cpachecker\"").unwrap();
        assert_eq!(holder.tool, Tool::Cpachecker);
        assert!(toml::from_str::<Holder>("tool = \"CPAchecker\"").is_err());
    }

    #[test]
    fn test_tool_from_name() {
        assert_eq!("wolverine".parse::<Tool>(), Ok(Tool::Wolverine));
        assert_eq!("blast".parse::<Tool>(), Ok(Tool::Blast));
        assert!("CBMC".parse::<Tool>().is_err());
    }

    #[test]
    fn test_cbmc_appends_xml_ui_once() {
        let invocation = Tool::Cbmc
            .prepare("cbmc", &strings(&["--unwind", "3"]), "a.c")
            .unwrap();
        assert_eq!(
            invocation.args,
            strings(&["cbmc", "--unwind", "3", "--xml-ui", "a.c"])
        );

        let invocation = Tool::Cbmc
            .prepare("cbmc", &strings(&["--xml-ui"]), "a.c")
            .unwrap();
        assert_eq!(invocation.args, strings(&["cbmc", "--xml-ui", "a.c"]));
    }

    #[test]
    fn test_cpachecker_appends_stats() {
        let invocation = Tool::Cpachecker
            .prepare("cpa.sh", &strings(&["-config", "x.properties"]), "b.c")
            .unwrap();
        assert_eq!(
            invocation.args,
            strings(&["cpa.sh", "-config", "x.properties", "-stats", "b.c"])
        );
        assert_eq!(invocation.options.last().map(String::as_str), Some("-stats"));
    }

    #[test]
    fn test_plain_tools_pass_options_through() {
        let invocation = Tool::Blast
            .prepare("pblast.opt", &strings(&["-craig", "2"]), "c.c")
            .unwrap();
        assert_eq!(
            invocation.args,
            strings(&["pblast.opt", "-craig", "2", "c.c"])
        );
        assert!(invocation.scratch_path().is_none());
    }

    #[test]
    fn test_only_cpachecker_extracts_columns() {
        assert!(Tool::Cpachecker.extracts_columns());
        assert!(!Tool::Cbmc.extracts_columns());
        assert!(!Tool::Blast.extracts_columns());
    }
}
