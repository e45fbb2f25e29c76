//! @ai:module:intent Plain-text results table formatting
//! @ai:module:layer infrastructure
//! @ai:module:public_api TextTable, benchmark_header, test_info, skipped_entry, end_line
//! @ai:module:stateless true

use crate::definition::{ColumnSpec, WorkItem};
use crate::sysinfo::SystemInfo;
use std::fmt::Write as FmtWrite;

const KEY_WIDTH: usize = 20;
const MIN_FILE_WIDTH: usize = 20;
const STATUS_WIDTH: usize = 8;
const TIME_WIDTH: usize = 11;
const MIN_COLUMN_WIDTH: usize = 8;

/// @ai:intent Benchmark facts shown at the top of the text report
#[derive(Debug, Clone)]
pub struct BenchmarkHeader<'a> {
    pub name: &'a str,
    pub date: &'a str,
    pub tool: &'a str,
    pub version: &'a str,
    pub memlimit: Option<&'a str>,
    pub timelimit: Option<&'a str>,
    pub system: &'a SystemInfo,
}

fn simple_line() -> String {
    format!("{}\n\n", "-".repeat(60))
}

/// @ai:intent Benchmark and system information blocks
/// @ai:effects pure
pub fn benchmark_header(header: &BenchmarkHeader<'_>) -> String {
    let mut output = String::new();

    writeln!(output, "   BENCHMARK INFORMATION").unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "benchmark:", header.name).unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "date:", header.date).unwrap();
    writeln!(
        output,
        "{:<KEY_WIDTH$}{} {}",
        "tool:", header.tool, header.version
    )
    .unwrap();
    if let Some(memlimit) = header.memlimit {
        writeln!(output, "{:<KEY_WIDTH$}{}", "memlimit:", memlimit).unwrap();
    }
    if let Some(timelimit) = header.timelimit {
        writeln!(output, "{:<KEY_WIDTH$}{}", "timelimit:", timelimit).unwrap();
    }
    output.push_str(&simple_line());

    let system = header.system;
    writeln!(output, "   SYSTEM INFORMATION").unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "os:", system.os).unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "cpu:", system.cpu_model).unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "- cores:", system.cores).unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "- max frequency:", system.frequency).unwrap();
    writeln!(output, "{:<KEY_WIDTH$}{}", "ram:", system.ram).unwrap();
    output.push_str(&simple_line());

    output
}

/// @ai:intent Column layout of one sub-test's table
#[derive(Debug, Clone)]
pub struct TextTable {
    file_width: usize,
    column_widths: Vec<usize>,
    titles: Vec<String>,
}

impl TextTable {
    /// @ai:intent Size the file column to the longest file name of the sub-test
    /// @ai:effects pure
    pub fn new(work_items: &[WorkItem], columns: &[ColumnSpec]) -> Self {
        let longest = work_items
            .iter()
            .map(|item| item.file.chars().count())
            .max()
            .unwrap_or(0)
            .max(MIN_FILE_WIDTH);

        Self {
            file_width: longest + 4,
            column_widths: columns
                .iter()
                .map(|c| c.title.chars().count().max(MIN_COLUMN_WIDTH) + 2)
                .collect(),
            titles: columns.iter().map(|c| c.title.clone()).collect(),
        }
    }

    /// Width of the file-name column, shared with the terminal output.
    pub fn file_width(&self) -> usize {
        self.file_width
    }

    /// @ai:intent One table row; `values` pairs with the table's columns
    /// @ai:effects pure
    pub fn line(&self, file: &str, status: &str, cpu: &str, wall: &str, values: &[&str]) -> String {
        let mut line = format!(
            "{:<fw$}{:<STATUS_WIDTH$}{:>TIME_WIDTH$}{:>TIME_WIDTH$}",
            file,
            status,
            cpu,
            wall,
            fw = self.file_width
        );

        for (value, width) in values.iter().zip(&self.column_widths) {
            write!(line, "{:>width$}", value, width = *width).unwrap();
        }

        line
    }

    pub fn title_line(&self) -> String {
        let titles: Vec<&str> = self.titles.iter().map(String::as_str).collect();
        self.line("sourcefile", "status", "cpu time", "wall time", &titles)
    }

    /// @ai:intent Dashed rule as wide as the title line
    pub fn rule(&self) -> String {
        format!("{}\n", "-".repeat(self.title_line().chars().count()))
    }
}

/// @ai:intent Block introducing a sub-test: name, options and table header
/// @ai:effects pure
pub fn test_info(
    name: Option<&str>,
    number: usize,
    total: usize,
    options: &str,
    table: &TextTable,
) -> String {
    let mut output = String::from("\n\n");

    if let Some(name) = name {
        writeln!(output, "{name}").unwrap();
    }
    writeln!(output, "test {number} of {total} with options: {options}\n").unwrap();
    writeln!(output, "{}", table.title_line()).unwrap();
    output.push_str(&table.rule());

    output
}

/// @ai:intent Entry written for a sub-test excluded by the test filter
/// @ai:effects pure
pub fn skipped_entry(name: Option<&str>, number: usize, total: usize) -> String {
    let mut output = String::from("\n\n");

    if let Some(name) = name {
        writeln!(output, "{name}").unwrap();
    }
    writeln!(output, "test {number} of {total}: skipped").unwrap();

    output
}

/// @ai:intent Closing rule and totals line of a sub-test
/// @ai:effects pure
pub fn end_line(table: &TextTable, number: usize, files: usize, cpu: &str, wall: &str) -> String {
    let summary = if files == 1 {
        format!("test {number} consisted of 1 sourcefile.")
    } else {
        format!("test {number} consisted of {files} sourcefiles.")
    };

    format!(
        "{}{}\n",
        table.rule(),
        table.line(&summary, "done", cpu, wall, &[])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items(files: &[&str]) -> Vec<WorkItem> {
        files
            .iter()
            .map(|f| WorkItem {
                file: f.to_string(),
                options: Vec::new(),
            })
            .collect()
    }

    fn column(title: &str) -> ColumnSpec {
        ColumnSpec {
            text: title.to_string(),
            title: title.to_string(),
            digits: None,
        }
    }

    #[test]
    fn test_row_layout() {
        let table = TextTable::new(&items(&["a.c"]), &[column("refinements")]);
        assert_eq!(table.file_width(), 24);

        let line = table.line("a.c", "SAFE", "1.25", "1.30", &["12"]);
        assert_eq!(
            line,
            format!("{}{}{}{}{}", "a.c".to_string() + &" ".repeat(21), "SAFE    ", "       1.25", "       1.30", "           12")
        );
    }

    #[test]
    fn test_long_file_names_widen_the_table() {
        let long = "programs/very/deep/directory/loop_bug.c";
        let table = TextTable::new(&items(&["a.c", long]), &[]);
        assert_eq!(table.file_width(), long.len() + 4);
    }

    #[test]
    fn test_title_line_and_rule() {
        let table = TextTable::new(&items(&["a.c"]), &[column("time")]);
        let title = table.title_line();
        assert!(title.starts_with("sourcefile"));
        assert!(title.ends_with("      time"));
        assert_eq!(table.rule().trim_end().len(), title.len());
    }

    #[test]
    fn test_test_info_block() {
        let table = TextTable::new(&items(&["a.c"]), &[]);
        let info = test_info(Some("predicate"), 1, 2, "-noout", &table);
        let expected = format!(
            "\n\npredicate\ntest 1 of 2 with options: -noout\n\n{}\n{}",
            table.title_line(),
            table.rule()
        );
        assert_eq!(info, expected);
    }

    #[test]
    fn test_skipped_and_end_lines() {
        assert_eq!(skipped_entry(None, 2, 3), "\n\ntest 2 of 3: skipped\n");
        assert_eq!(
            skipped_entry(Some("explicit"), 2, 3),
            "\n\nexplicit\ntest 2 of 3: skipped\n"
        );

        let table = TextTable::new(&items(&["a.c"]), &[]);
        let end = end_line(&table, 1, 1, "0.50", "0.60");
        assert!(end.starts_with(&table.rule()));
        assert!(end.contains("test 1 consisted of 1 sourcefile."));
        assert!(end.ends_with("done           0.50       0.60\n"));

        let end = end_line(&table, 3, 4, "0.50", "0.60");
        assert!(end.contains("test 3 consisted of 4 sourcefiles."));
    }

    #[test]
    fn test_benchmark_header() {
        let system = SystemInfo {
            os: "Linux 6.1.0 x86_64".to_string(),
            cpu_model: "Xeon".to_string(),
            cores: "8".to_string(),
            frequency: "2600 MHz".to_string(),
            ram: "16367756 kB".to_string(),
        };
        let header = benchmark_header(&BenchmarkHeader {
            name: "predicate",
            date: "2026-10-19",
            tool: "CPAchecker",
            version: "r4711",
            memlimit: Some("1500 MB"),
            timelimit: None,
            system: &system,
        });

        let dashes = "-".repeat(60);
        let expected = format!(
            "   BENCHMARK INFORMATION\n\
             benchmark:          predicate\n\
             date:               2026-10-19\n\
             tool:               CPAchecker r4711\n\
             memlimit:           1500 MB\n\
             {dashes}\n\n   SYSTEM INFORMATION\n\
             os:                 Linux 6.1.0 x86_64\n\
             cpu:                Xeon\n\
             - cores:            8\n\
             - max frequency:    2600 MHz\n\
             ram:                16367756 kB\n\
             {dashes}\n\n"
        );
        assert_eq!(header, expected);
    }
}
