//! @ai:module:intent Correctness statistics over all runs of a harness invocation
//! @ai:module:layer application
//! @ai:module:public_api Statistics
//! @ai:module:stateless false

use crate::tools::Status;

/// @ai:intent Running verdict counters, compared against file-name expectations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    bug_substrings: Vec<String>,
    pub total: u32,
    pub correct_safe: u32,
    pub correct_unsafe: u32,
    pub unknown: u32,
    /// Reported SAFE for a file expected to contain a bug (false negative)
    pub wrong_safe: u32,
    /// Reported UNSAFE for a file expected to be bug-free (false positive)
    pub wrong_unsafe: u32,
}

impl Statistics {
    /// @ai:intent Empty counters; a file is expected buggy when its name contains a substring
    /// @ai:effects pure
    pub fn new(bug_substrings: &[String]) -> Self {
        Self {
            bug_substrings: bug_substrings.iter().map(|s| s.to_lowercase()).collect(),
            ..Default::default()
        }
    }

    /// @ai:intent Whether a file is expected to contain a bug, judged by its name
    /// @ai:effects pure
    pub fn expects_bug(&self, file: &str) -> bool {
        let file = file.to_lowercase();
        self.bug_substrings.iter().any(|s| file.contains(s.as_str()))
    }

    /// @ai:intent Count one result
    /// @ai:post exactly one of the five outcome counters is incremented
    pub fn add_result(&mut self, file: &str, status: Status) {
        self.total += 1;
        let buggy = self.expects_bug(file);

        match (status, buggy) {
            (Status::Safe, false) => self.correct_safe += 1,
            (Status::Safe, true) => self.wrong_safe += 1,
            (Status::Unsafe, true) => self.correct_unsafe += 1,
            (Status::Unsafe, false) => self.wrong_unsafe += 1,
            _ => self.unknown += 1,
        }
    }

    pub fn correct(&self) -> u32 {
        self.correct_safe + self.correct_unsafe
    }

    /// @ai:intent Summary block printed at the end of a run
    /// @ai:effects pure
    pub fn render_summary(&self) -> String {
        [
            format!("\nStatistics:{:>13} Files", self.total),
            format!("    correct:        {:>4}", self.correct()),
            format!("    unknown:        {:>4}", self.unknown),
            format!(
                "    false negatives:{:>4}        (file is unsafe, result is safe)",
                self.wrong_safe
            ),
            format!(
                "    false positives:{:>4}        (file is safe, result is unsafe)",
                self.wrong_unsafe
            ),
            String::new(),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn defaults() -> Vec<String> {
        vec!["bug".to_string(), "unsafe".to_string()]
    }

    #[test]
    fn test_counts_against_file_name() {
        let mut stats = Statistics::new(&defaults());
        stats.add_result("a.c", Status::Safe);
        stats.add_result("a_bug.c", Status::Safe);
        stats.add_result("b_UNSAFE.c", Status::Unsafe);
        stats.add_result("c.c", Status::Unsafe);
        stats.add_result("d.c", Status::Timeout);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.correct_safe, 1);
        assert_eq!(stats.wrong_safe, 1);
        assert_eq!(stats.correct_unsafe, 1);
        assert_eq!(stats.wrong_unsafe, 1);
        assert_eq!(stats.unknown, 1);
    }

    #[test]
    fn test_order_does_not_matter() {
        let results = [
            ("x_bug.c", Status::Unsafe),
            ("y.c", Status::Safe),
            ("z.c", Status::Error(Some(1))),
            ("w_bug.c", Status::Safe),
        ];

        let mut forward = Statistics::new(&defaults());
        for (file, status) in results {
            forward.add_result(file, status);
        }

        let mut backward = Statistics::new(&defaults());
        for (file, status) in results.iter().rev() {
            backward.add_result(file, *status);
        }

        assert_eq!(forward, backward);
        assert_eq!(forward.render_summary(), backward.render_summary());
    }

    #[test]
    fn test_render_summary_layout() {
        let mut stats = Statistics::new(&defaults());
        stats.add_result("a.c", Status::Safe);
        stats.add_result("a_bug.c", Status::Safe);

        let expected = "\nStatistics:            2 Files\n\
                        \x20   correct:           1\n\
                        \x20   unknown:           0\n\
                        \x20   false negatives:   1        (file is unsafe, result is safe)\n\
                        \x20   false positives:   0        (file is safe, result is unsafe)\n";
        assert_eq!(stats.render_summary(), expected);
        assert_eq!(stats.render_summary(), expected);
    }

    #[test]
    fn test_custom_substrings_are_case_insensitive() {
        let stats = Statistics::new(&["Faulty".to_string()]);
        assert!(stats.expects_bug("programs/FAULTY_loop.c"));
        assert!(!stats.expects_bug("programs/a_bug.c"));
    }
}
