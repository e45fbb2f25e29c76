//! @ai:module:intent Benchmark definition types: options, sub-tests, work items, columns
//! @ai:module:layer domain
//! @ai:module:public_api BenchmarkDefinition, DefinitionFile, SubTest, WorkItem, OptionPair, ColumnSpec
//! @ai:module:stateless true

use crate::fileset::FileSetDecl;
use crate::runner::ResourceLimits;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};

/// @ai:intent A named tool option with an optional value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPair {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl OptionPair {
    /// @ai:intent Create an option without a value
    /// @ai:effects pure
    pub fn flag(name: &str) -> Self {
        Self {
            name: name.to_string(),
            value: None,
        }
    }

    /// @ai:intent Create an option carrying a value
    /// @ai:effects pure
    pub fn with_value(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: Some(value.to_string()),
        }
    }
}

/// @ai:intent Concatenate global, sub-test and file options, keeping repeats
/// @ai:effects pure
pub fn merge_options(
    global: &[OptionPair],
    test: &[OptionPair],
    file: &[OptionPair],
) -> Vec<OptionPair> {
    global.iter().chain(test).chain(file).cloned().collect()
}

/// @ai:intent Turn option pairs into a flat argument list, dropping absent values
/// @ai:effects pure
pub fn flatten_options(options: &[OptionPair]) -> Vec<String> {
    let mut args = Vec::with_capacity(options.len() * 2);

    for option in options {
        args.push(option.name.clone());

        if let Some(value) = &option.value {
            args.push(value.clone());
        }
    }

    args
}

/// @ai:intent One source file to run, with the options of its file-set block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub file: String,
    pub options: Vec<OptionPair>,
}

/// @ai:intent A metric to pull out of tool output and show as a report column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub text: String,
    pub title: String,
    pub digits: Option<usize>,
}

/// @ai:intent A named group of work items sharing options
#[derive(Debug, Clone)]
pub struct SubTest {
    pub name: Option<String>,
    pub work_items: Vec<WorkItem>,
    pub options: Vec<OptionPair>,
}

/// @ai:intent Fully resolved benchmark definition, immutable after load
#[derive(Debug, Clone)]
pub struct BenchmarkDefinition {
    pub name: String,
    pub tool: Tool,
    pub limits: ResourceLimits,
    pub options: Vec<OptionPair>,
    pub sub_tests: Vec<SubTest>,
    pub columns: Vec<ColumnSpec>,
}

/// @ai:intent TOML representation of a benchmark definition file
#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionFile {
    pub tool: Tool,
    /// Address-space limit in MiB
    #[serde(default)]
    pub memlimit: Option<u64>,
    /// CPU-time limit in seconds
    #[serde(default)]
    pub timelimit: Option<u64>,
    #[serde(default, rename = "option")]
    pub options: Vec<OptionPair>,
    #[serde(default)]
    pub sourcefiles: Vec<FileSetDecl>,
    #[serde(default, rename = "test")]
    pub tests: Vec<SubTestDecl>,
    #[serde(default, rename = "column")]
    pub columns: Vec<ColumnDecl>,
}

/// @ai:intent TOML representation of a `test` block
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubTestDecl {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "option")]
    pub options: Vec<OptionPair>,
    #[serde(default)]
    pub sourcefiles: Vec<FileSetDecl>,
}

/// @ai:intent TOML representation of a `column` block
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDecl {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub digits: Option<usize>,
}

impl From<ColumnDecl> for ColumnSpec {
    fn from(decl: ColumnDecl) -> Self {
        let title = decl.title.unwrap_or_else(|| decl.text.clone());
        Self {
            text: decl.text,
            title,
            digits: decl.digits,
        }
    }
}
