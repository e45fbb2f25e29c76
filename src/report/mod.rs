//! @ai:module:intent Result reporting: terminal progress, text/CSV/XML reports, per-run logs
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputHandler, RunResult, TextTable, XmlReport

pub mod csv_report;
pub mod text_report;
pub mod xml_report;

pub use text_report::{BenchmarkHeader, TextTable};
pub use xml_report::{XmlReport, XmlSourceFile};

use crate::columns::ColumnValue;
use crate::config::HarnessConfig;
use crate::definition::{
    flatten_options, merge_options, BenchmarkDefinition, ColumnSpec, OptionPair, SubTest,
};
use crate::metrics::Statistics;
use crate::sysinfo::SystemInfo;
use crate::tools::Status;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// @ai:intent Everything reported about one finished run
#[derive(Debug, Clone)]
pub struct RunResult {
    pub file: String,
    pub status: Status,
    pub cpu_time: Duration,
    pub wall_time: Duration,
    /// Merged tool output, written to the per-run log
    pub output: String,
    /// Exact argument vector the tool was started with
    pub args: Vec<String>,
    pub columns: Vec<ColumnValue>,
}

/// @ai:intent Date stamp used in result file names
/// @ai:effects pure
pub fn benchmark_date(now: DateTime<Local>, use_only_date: bool) -> String {
    if use_only_date {
        now.format("%Y-%m-%d").to_string()
    } else {
        now.format("%y-%m-%d.%H%M").to_string()
    }
}

fn options_text(options: &[OptionPair]) -> String {
    flatten_options(options).join(" ")
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn append_file(path: &Path, content: &str) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to append to {}", path.display()))
}

/// Sub-test currently being reported.
struct TestState {
    number: usize,
    name: Option<String>,
    files: usize,
    table: TextTable,
    xml: XmlReport,
}

/// @ai:intent Writes all report artifacts of one benchmark and folds results into statistics
pub struct OutputHandler {
    output_dir: PathBuf,
    log_dir: PathBuf,
    name: String,
    date: String,
    tool: &'static str,
    options: Vec<OptionPair>,
    columns: Vec<ColumnSpec>,
    total_tests: usize,
    precision: usize,
    header_attributes: Vec<(String, String)>,
    system: SystemInfo,
    current: Option<TestState>,
    statistics: Statistics,
}

impl OutputHandler {
    /// @ai:intent Create the result directories and write report headers
    /// @ai:post the text report and the CSV files of selected sub-tests exist, overwritten
    /// @ai:effects fs:write
    pub fn new(
        definition: &BenchmarkDefinition,
        version: &str,
        system: SystemInfo,
        config: &HarnessConfig,
        statistics: Statistics,
    ) -> Result<Self> {
        let date = benchmark_date(Local::now(), config.output.use_only_date);
        let output_dir = config.output.output_dir.clone();
        let log_dir = output_dir.join(format!("{}.{}.logfiles", definition.name, date));

        std::fs::create_dir_all(&log_dir)
            .with_context(|| format!("Failed to create {}", log_dir.display()))?;

        let memlimit = definition.limits.memory_mib().map(|mib| format!("{mib} MB"));
        let timelimit = definition.limits.cpu_seconds().map(|secs| format!("{secs} s"));
        let tool = definition.tool.display_name();

        let mut header_attributes = vec![
            ("benchmarkname".to_string(), definition.name.clone()),
            ("date".to_string(), date.clone()),
            ("tool".to_string(), tool.to_string()),
            ("version".to_string(), version.to_string()),
        ];
        if let Some(memlimit) = &memlimit {
            header_attributes.push(("memlimit".to_string(), memlimit.clone()));
        }
        if let Some(timelimit) = &timelimit {
            header_attributes.push(("timelimit".to_string(), timelimit.clone()));
        }

        let handler = Self {
            output_dir,
            log_dir,
            name: definition.name.clone(),
            date,
            tool,
            options: definition.options.clone(),
            columns: definition.columns.clone(),
            total_tests: definition.sub_tests.len(),
            precision: config.output.time_precision,
            header_attributes,
            system,
            current: None,
            statistics,
        };

        let header = text_report::benchmark_header(&BenchmarkHeader {
            name: &handler.name,
            date: &handler.date,
            tool: handler.tool,
            version,
            memlimit: memlimit.as_deref(),
            timelimit: timelimit.as_deref(),
            system: &handler.system,
        });
        write_file(&handler.file_name(None, "txt"), &header)?;

        let csv_header = csv_report::header_line(&handler.columns);
        for test in &definition.sub_tests {
            if config.run.selects(test.name.as_deref()) {
                write_file(&handler.file_name(test.name.as_deref(), "csv"), &csv_header)?;
            }
        }

        Ok(handler)
    }

    /// @ai:intent Path of a result file: `<name>.<date>.results[.<test>].<ext>`
    pub fn file_name(&self, test: Option<&str>, extension: &str) -> PathBuf {
        let mut file = format!("{}.{}.results.", self.name, self.date);
        if let Some(test) = test {
            file.push_str(test);
            file.push('.');
        }
        file.push_str(extension);

        self.output_dir.join(file)
    }

    fn log_file_name(&self, test: Option<&str>, source: &str) -> PathBuf {
        let base = Path::new(source)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());

        match test {
            Some(test) => self.log_dir.join(format!("{test}.{base}.log")),
            None => self.log_dir.join(format!("{base}.log")),
        }
    }

    fn format_time(&self, time: Duration) -> String {
        format!("{:.*}", self.precision, time.as_secs_f64())
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    /// @ai:intent Report a sub-test that the test filter excluded
    /// @ai:effects fs:write, io:stdout
    pub fn skip_test(&mut self, number: usize, test: &SubTest) -> Result<()> {
        println!("\nskipping test{}", quoted(test.name.as_deref()));

        let entry = text_report::skipped_entry(test.name.as_deref(), number, self.total_tests);
        append_file(&self.file_name(None, "txt"), &entry)
    }

    /// @ai:intent Announce a sub-test and start its table and XML document
    /// @ai:effects fs:write, io:stdout
    pub fn before_test(&mut self, number: usize, test: &SubTest) -> Result<()> {
        if test.work_items.len() == 1 {
            tracing::debug!("test {} consists of 1 sourcefile.", number);
        } else {
            tracing::debug!(
                "test {} consists of {} sourcefiles.",
                number,
                test.work_items.len()
            );
        }

        println!("\nrunning test{}", quoted(test.name.as_deref()));

        let options = options_text(&merge_options(&self.options, &test.options, &[]));
        let table = TextTable::new(&test.work_items, &self.columns);

        let mut attributes = self.header_attributes.clone();
        attributes.push(("options".to_string(), options.clone()));
        if let Some(name) = &test.name {
            attributes.push(("name".to_string(), name.clone()));
        }
        let titles: Vec<String> = self.columns.iter().map(|c| c.title.clone()).collect();
        let xml = XmlReport::new(attributes, self.system.clone(), &titles);

        let info = text_report::test_info(
            test.name.as_deref(),
            number,
            self.total_tests,
            &options,
            &table,
        );
        append_file(&self.file_name(None, "txt"), &info)?;

        self.current = Some(TestState {
            number,
            name: test.name.clone(),
            files: test.work_items.len(),
            table,
            xml,
        });

        Ok(())
    }

    /// @ai:intent Print the time and file name before a run starts
    /// @ai:effects io:stdout
    pub fn before_run(&self, file: &str, options: &[String]) {
        tracing::debug!(
            "I'm running '{} {} {}'.",
            self.tool,
            options.join(" "),
            file
        );

        let width = self
            .current
            .as_ref()
            .map(|state| state.table.file_width())
            .unwrap_or(0);

        print!("{}   {:<width$}", Local::now().format("%H:%M:%S"), file);
        let _ = std::io::stdout().flush();
    }

    /// @ai:intent Record a finished run in every report and in the statistics
    /// @ai:pre before_test was called for the enclosing sub-test
    /// @ai:effects fs:write, io:stdout
    pub fn after_run(&mut self, result: &RunResult, file_options: &[OptionPair]) -> Result<()> {
        let cpu = self.format_time(result.cpu_time);
        let wall = self.format_time(result.wall_time);
        let status = result.status.to_string();
        let values: Vec<&str> = result.columns.iter().map(|c| c.value.as_str()).collect();

        let test_name = self
            .current
            .as_ref()
            .context("Run reported outside of a test")?
            .name
            .clone();

        let log = format!(
            "{}\n\n\n{}\n\n\n{}",
            result.args.join(" "),
            "-".repeat(80),
            result.output
        );
        write_file(&self.log_file_name(test_name.as_deref(), &result.file), &log)?;

        println!("{:<8}{:>8}{:>8}", status, cpu, wall);

        let mut xml_columns = vec![
            ("status".to_string(), status.clone()),
            ("cputime".to_string(), cpu.clone()),
            ("walltime".to_string(), wall.clone()),
        ];
        xml_columns.extend(
            result
                .columns
                .iter()
                .map(|c| (c.title.clone(), c.value.clone())),
        );
        let state = self
            .current
            .as_mut()
            .context("Run reported outside of a test")?;
        state.xml.add_source_file(XmlSourceFile {
            name: result.file.clone(),
            options: (!file_options.is_empty()).then(|| options_text(file_options)),
            columns: xml_columns,
        });

        let row = format!(
            "{}\n",
            state.table.line(&result.file, &status, &cpu, &wall, &values)
        );

        append_file(&self.file_name(None, "txt"), &row)?;
        append_file(
            &self.file_name(test_name.as_deref(), "csv"),
            &csv_report::row_line(&result.file, &status, &cpu, &wall, &values),
        )?;

        self.statistics.add_result(&result.file, result.status);
        Ok(())
    }

    /// @ai:intent Close a sub-test: write its XML document and totals line
    /// @ai:effects fs:write
    pub fn after_test(&mut self, cpu_time: Duration, wall_time: Duration) -> Result<()> {
        let cpu = self.format_time(cpu_time);
        let wall = self.format_time(wall_time);

        let mut state = self
            .current
            .take()
            .context("Test finished without being started")?;

        state.xml.set_time(cpu.clone(), wall.clone());
        let xml = state.xml.render()?;
        write_file(&self.file_name(state.name.as_deref(), "xml"), &xml)?;

        let end = text_report::end_line(&state.table, state.number, state.files, &cpu, &wall);
        append_file(&self.file_name(None, "txt"), &end)
    }

    /// @ai:intent Print the statistics summary
    /// @ai:effects io:stdout
    pub fn after_benchmark(&self) {
        println!("{}", self.statistics.render_summary());
    }
}

fn quoted(name: Option<&str>) -> String {
    name.map(|name| format!(" '{name}'")).unwrap_or_default()
}
