//! @ai:module:intent Run every sub-test of a benchmark definition and report results
//! @ai:module:layer application
//! @ai:module:public_api BenchmarkRunner
//! @ai:module:depends_on definition, runner, tools, columns, report, metrics
//! @ai:module:stateless false

use crate::columns::{extract_columns, missing_columns};
use crate::config::HarnessConfig;
use crate::definition::{flatten_options, merge_options, BenchmarkDefinition, SubTest, WorkItem};
use crate::error::BenchError;
use crate::metrics::Statistics;
use crate::report::{OutputHandler, RunResult};
use crate::runner::{children_cpu_time, Interrupt, RunExecutor};
use crate::sysinfo::SystemInfo;
use crate::tools::Status;
use crate::toolchain;
use anyhow::Result;
use std::time::{Duration, Instant};

/// @ai:intent Drives one benchmark: sub-tests in order, work items sequentially
pub struct BenchmarkRunner<'a> {
    definition: &'a BenchmarkDefinition,
    config: &'a HarnessConfig,
    executable: String,
    executor: RunExecutor,
}

impl<'a> BenchmarkRunner<'a> {
    /// @ai:intent Resolve the tool executable for a definition
    /// @ai:post Err(ToolNotFound) when the tool is neither on PATH nor at its fallback
    /// @ai:effects fs:read, env:read
    pub fn new(definition: &'a BenchmarkDefinition, config: &'a HarnessConfig) -> Result<Self> {
        let tool = definition.tool;
        let executable = toolchain::find_executable(tool.program(), tool.fallback_path())?;

        Ok(Self::with_executable(definition, config, executable))
    }

    /// @ai:intent Runner using an explicit executable path
    /// @ai:effects pure
    pub fn with_executable(
        definition: &'a BenchmarkDefinition,
        config: &'a HarnessConfig,
        executable: String,
    ) -> Self {
        Self {
            definition,
            config,
            executable,
            executor: RunExecutor::new(config.run.watchdog_grace()),
        }
    }

    /// @ai:intent Run the benchmark and return its statistics
    /// @ai:post Err(BenchError::Interrupted) when the operator interrupted a run
    /// @ai:effects process:spawn, fs:write, io:stdout
    pub async fn run(&self, interrupt: &mut Interrupt) -> Result<Statistics> {
        let definition = self.definition;

        if definition.sub_tests.len() == 1 {
            tracing::debug!("I'm benchmarking {} consisting of 1 test.", definition.name);
        } else {
            tracing::debug!(
                "I'm benchmarking {} consisting of {} tests.",
                definition.name,
                definition.sub_tests.len()
            );
        }

        let version = toolchain::probe_version(definition.tool, &self.executable).await;
        let mut handler = OutputHandler::new(
            definition,
            &version,
            SystemInfo::collect(),
            self.config,
            Statistics::new(&self.config.run.bug_substrings),
        )?;

        for (index, test) in definition.sub_tests.iter().enumerate() {
            let number = index + 1;

            if !self.config.run.selects(test.name.as_deref()) {
                handler.skip_test(number, test)?;
                continue;
            }

            self.run_test(number, test, &mut handler, interrupt).await?;
        }

        handler.after_benchmark();
        Ok(handler.statistics().clone())
    }

    async fn run_test(
        &self,
        number: usize,
        test: &SubTest,
        handler: &mut OutputHandler,
        interrupt: &mut Interrupt,
    ) -> Result<()> {
        let cpu_before = children_cpu_time();
        let started = Instant::now();

        handler.before_test(number, test)?;

        for item in &test.work_items {
            let options = flatten_options(&merge_options(
                &self.definition.options,
                &test.options,
                &item.options,
            ));
            handler.before_run(&item.file, &options);

            let result = self.run_item(item, &options, interrupt).await?;
            handler.after_run(&result, &item.options)?;
        }

        handler.after_test(
            children_cpu_time().saturating_sub(cpu_before),
            started.elapsed(),
        )
    }

    /// @ai:intent Prepare, execute and classify one work item
    /// @ai:post preparation failures become an ERROR result instead of aborting
    async fn run_item(
        &self,
        item: &WorkItem,
        options: &[String],
        interrupt: &mut Interrupt,
    ) -> Result<RunResult> {
        let tool = self.definition.tool;

        let invocation = match tool.prepare(&self.executable, options, &item.file) {
            Ok(invocation) => invocation,
            Err(e) => {
                tracing::warn!("Cannot prepare {} for {}: {}", item.file, tool, e);
                return Ok(RunResult {
                    file: item.file.clone(),
                    status: Status::Error(None),
                    cpu_time: Duration::ZERO,
                    wall_time: Duration::ZERO,
                    output: e.to_string(),
                    args: Vec::new(),
                    columns: missing_columns(&self.definition.columns),
                });
            }
        };

        let outcome = self
            .executor
            .execute(&invocation.args, &self.definition.limits, interrupt)
            .await?;

        tracing::debug!("My subprocess returned returncode {}.", outcome.exit_code);

        let status = tool.classify(&outcome, &invocation.options, &self.definition.limits);
        let columns = if tool.extracts_columns() {
            extract_columns(&self.definition.columns, &outcome.output)
        } else {
            missing_columns(&self.definition.columns)
        };

        Ok(RunResult {
            file: item.file.clone(),
            status,
            cpu_time: outcome.cpu_time,
            wall_time: outcome.wall_time,
            output: outcome.output,
            args: invocation.args.clone(),
            columns,
        })
    }
}

/// @ai:intent Whether an error chain ends in an operator interrupt
/// @ai:effects pure
pub fn is_interrupted(error: &anyhow::Error) -> bool {
    matches!(error.downcast_ref::<BenchError>(), Some(BenchError::Interrupted))
}
