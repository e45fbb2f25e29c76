//! @ai:module:intent Benchmark harness for software verification tools
//! @ai:module:layer application
//! @ai:module:public_api benchmark, config, definition, runner, tools, metrics, report, toolchain

pub mod benchmark;
pub mod columns;
pub mod config;
pub mod definition;
pub mod error;
pub mod fileset;
pub mod metrics;
pub mod paths;
pub mod report;
pub mod runner;
pub mod sysinfo;
pub mod toolchain;
pub mod tools;

pub use benchmark::{is_interrupted, BenchmarkRunner};
pub use config::HarnessConfig;
pub use definition::{BenchmarkDefinition, DefinitionLoader};
pub use error::BenchError;
pub use metrics::Statistics;
pub use runner::{Interrupt, RunExecutor, RunOutcome};
pub use tools::{Status, Tool};
