//! @ai:module:intent Configuration structs for the benchmark harness
//! @ai:module:layer infrastructure
//! @ai:module:public_api HarnessConfig, RunConfig, OutputConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// @ai:intent Main configuration threaded through every harness component
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// @ai:intent Run configuration for benchmark execution
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Only run the sub-test with this name, skip all others
    #[serde(default)]
    pub test_filter: Option<String>,
    /// Wall-clock seconds granted beyond the CPU limit before the watchdog kills a run
    #[serde(default = "default_watchdog_grace")]
    pub watchdog_grace_secs: u64,
    /// Substrings marking a source file as expected to contain a bug
    #[serde(default = "default_bug_substrings")]
    pub bug_substrings: Vec<String>,
}

/// @ai:intent Output configuration for report artifacts
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_time_precision")]
    pub time_precision: usize,
    /// Use the date only (not date and time) in result file names
    #[serde(default = "default_use_only_date")]
    pub use_only_date: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            test_filter: None,
            watchdog_grace_secs: default_watchdog_grace(),
            bug_substrings: default_bug_substrings(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            time_precision: default_time_precision(),
            use_only_date: default_use_only_date(),
        }
    }
}

fn default_watchdog_grace() -> u64 {
    10
}

fn default_bug_substrings() -> Vec<String> {
    vec!["bug".to_string(), "unsafe".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./test/results/")
}

fn default_time_precision() -> usize {
    2
}

fn default_use_only_date() -> bool {
    true
}

impl HarnessConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

impl RunConfig {
    /// @ai:intent Check whether a sub-test is selected by the test filter
    /// @ai:effects pure
    pub fn selects(&self, test_name: Option<&str>) -> bool {
        match &self.test_filter {
            None => true,
            Some(wanted) => test_name == Some(wanted.as_str()),
        }
    }

    /// @ai:intent Grace period added to the CPU limit for the watchdog
    /// @ai:effects pure
    pub fn watchdog_grace(&self) -> Duration {
        Duration::from_secs(self.watchdog_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_layout() {
        let config = HarnessConfig::default();
        assert_eq!(config.output.output_dir, PathBuf::from("./test/results/"));
        assert_eq!(config.output.time_precision, 2);
        assert!(config.output.use_only_date);
        assert_eq!(config.run.watchdog_grace(), Duration::from_secs(10));
        assert_eq!(config.run.bug_substrings, vec!["bug", "unsafe"]);
    }

    #[test]
    fn test_filter_selects_all_when_empty() {
        let run = RunConfig::default();
        assert!(run.selects(Some("predicate")));
        assert!(run.selects(None));
    }

    #[test]
    fn test_filter_selects_named_test_only() {
        let run = RunConfig {
            test_filter: Some("predicate".to_string()),
            ..Default::default()
        };
        assert!(run.selects(Some("predicate")));
        assert!(!run.selects(Some("explicit")));
        assert!(!run.selects(None));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("harness.toml");
        std::fs::write(&path, "[output]\ntime_precision = 3\n").unwrap();

        let config = HarnessConfig::load(&path).unwrap();
        assert_eq!(config.output.time_precision, 3);
        assert_eq!(config.output.output_dir, PathBuf::from("./test/results/"));
        assert_eq!(config.run.watchdog_grace_secs, 10);
    }
}
