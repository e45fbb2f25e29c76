//! @ai:module:intent Loader for benchmark definitions (TOML, or the classic XML layout)
//! @ai:module:layer infrastructure
//! @ai:module:public_api DefinitionLoader
//! @ai:module:depends_on definition::xml, fileset, runner::limits
//! @ai:module:stateless true

use crate::definition::model::{BenchmarkDefinition, DefinitionFile, SubTest};
use crate::definition::xml;
use crate::error::{BenchError, Result};
use crate::fileset::resolve_file_sets;
use crate::runner::ResourceLimits;
use std::path::Path;

/// @ai:intent Loads benchmark definitions and resolves their file-sets
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// @ai:intent Create a new definition loader
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Read and resolve a benchmark definition file
    /// @ai:pre path points to a TOML definition, or an XML one when it ends in `.xml`
    /// @ai:post work items of every sub-test are resolved; the result is read-only
    /// @ai:effects fs:read
    pub fn load(&self, path: &Path) -> Result<BenchmarkDefinition> {
        tracing::debug!("I'm loading the benchmark {}.", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| BenchError::DefinitionRead {
            path: path.to_path_buf(),
            source,
        })?;

        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));

        let file: DefinitionFile = if is_xml {
            xml::parse_definition(&content).map_err(|message| BenchError::DefinitionXml {
                path: path.to_path_buf(),
                message,
            })?
        } else {
            toml::from_str(&content).map_err(|source| BenchError::DefinitionParse {
                path: path.to_path_buf(),
                source,
            })?
        };

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::resolve(name, file))
    }

    /// @ai:intent Turn a parsed definition file into the resolved model
    /// @ai:effects fs:read
    pub fn resolve(name: String, file: DefinitionFile) -> BenchmarkDefinition {
        tracing::debug!("The tool to be benchmarked is {:?}.", file.tool);

        let limits = ResourceLimits::from_definition(file.memlimit, file.timelimit);
        let global_items = resolve_file_sets(&file.sourcefiles);

        let sub_tests = file
            .tests
            .into_iter()
            .map(|test| {
                let mut work_items = global_items.clone();
                work_items.extend(resolve_file_sets(&test.sourcefiles));

                SubTest {
                    name: test.name,
                    work_items,
                    options: test.options,
                }
            })
            .collect();

        let columns = file
            .columns
            .into_iter()
            .map(|decl| {
                let column = decl.into();
                tracing::debug!("Column loaded from definition: {:?}", column);
                column
            })
            .collect();

        BenchmarkDefinition {
            name,
            tool: file.tool,
            limits,
            options: file.options,
            sub_tests,
            columns,
        }
    }
}

impl Default for DefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::model::OptionPair;
    use crate::runner::LimitKind;
    use crate::tools::Tool;
    use tempfile::TempDir;

    fn write_programs(dir: &Path) {
        for name in ["a.c", "a_bug.c", "b.c"] {
            std::fs::write(dir.join(name), "").unwrap();
        }
    }

    #[test]
    fn test_load_full_definition() {
        let temp = TempDir::new().unwrap();
        write_programs(temp.path());
        let root = temp.path().to_str().unwrap();

        let content = format!(
            r#"
tool = "cpachecker"
memlimit = 1500
timelimit = 60

[[option]]
name = "-config"
value = "config/predicateAnalysis.properties"

[[sourcefiles]]
include = ["{root}/a.c"]

[[test]]
name = "explicit"

[[test.option]]
name = "-noout"

[[test.sourcefiles]]
include = ["{root}/*bug*.c", "{root}/b.c"]

[[test.sourcefiles.option]]
name = "-spec"
value = "unreach.spc"

[[test]]

[[column]]
text = "Total time"
title = "total"
digits = 2

[[column]]
text = "Number of refinements"
"#
        );

        let path = temp.path().join("predicate.toml");
        std::fs::write(&path, content).unwrap();

        let definition = DefinitionLoader::new().load(&path).unwrap();

        assert_eq!(definition.name, "predicate");
        assert_eq!(definition.tool, Tool::Cpachecker);
        assert_eq!(
            definition.limits.get(LimitKind::AddressSpace).map(|l| l.soft),
            Some(1500 * 1024 * 1024)
        );
        assert_eq!(
            definition.limits.get(LimitKind::CpuTime).map(|l| l.hard),
            Some(60)
        );
        assert_eq!(definition.options.len(), 1);

        assert_eq!(definition.sub_tests.len(), 2);
        let explicit = &definition.sub_tests[0];
        assert_eq!(explicit.name.as_deref(), Some("explicit"));
        assert_eq!(explicit.options, vec![OptionPair::flag("-noout")]);
        let files: Vec<_> = explicit.work_items.iter().map(|w| w.file.as_str()).collect();
        assert_eq!(
            files,
            vec![
                format!("{root}/a.c"),
                format!("{root}/a_bug.c"),
                format!("{root}/b.c"),
            ]
        );
        assert!(explicit.work_items[0].options.is_empty());
        assert_eq!(
            explicit.work_items[2].options,
            vec![OptionPair::with_value("-spec", "unreach.spc")]
        );

        let unnamed = &definition.sub_tests[1];
        assert_eq!(unnamed.name, None);
        assert_eq!(unnamed.work_items.len(), 1);

        assert_eq!(definition.columns.len(), 2);
        assert_eq!(definition.columns[0].title, "total");
        assert_eq!(definition.columns[1].title, "Number of refinements");
        assert_eq!(definition.columns[1].digits, None);
    }

    #[test]
    fn test_minimal_definition_has_no_limits() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.toml");
        std::fs::write(&path, "tool = \"cbmc\"\n").unwrap();

        let definition = DefinitionLoader::new().load(&path).unwrap();
        assert_eq!(definition.tool, Tool::Cbmc);
        assert!(definition.limits.is_empty());
        assert!(definition.sub_tests.is_empty());
        assert!(definition.columns.is_empty());
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "tool = \"frama-c\"\n").unwrap();

        let err = DefinitionLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, BenchError::DefinitionParse { .. }));
    }

    #[test]
    fn test_load_xml_definition() {
        let temp = TempDir::new().unwrap();
        write_programs(temp.path());
        let root = temp.path().to_str().unwrap();

        let content = format!(
            r#"<?xml version="1.0"?>
<benchmark tool="cpachecker" timelimit="900">
  <option name="-config">config/explicitAnalysis.properties</option>
  <test name="bugs">
    <sourcefiles>
      <include>{root}/*.c</include>
      <exclude>{root}/b.c</exclude>
    </sourcefiles>
  </test>
</benchmark>
"#
        );
        let path = temp.path().join("explicit.xml");
        std::fs::write(&path, content).unwrap();

        let definition = DefinitionLoader::new().load(&path).unwrap();
        assert_eq!(definition.name, "explicit");
        assert_eq!(definition.tool, Tool::Cpachecker);
        assert_eq!(definition.limits.cpu_seconds(), Some(900));
        assert_eq!(
            definition.options,
            vec![OptionPair::with_value(
                "-config",
                "config/explicitAnalysis.properties"
            )]
        );

        let files: Vec<_> = definition.sub_tests[0]
            .work_items
            .iter()
            .map(|w| w.file.clone())
            .collect();
        assert_eq!(files, vec![format!("{root}/a.c"), format!("{root}/a_bug.c")]);
    }

    #[test]
    fn test_malformed_xml_definition_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.xml");
        std::fs::write(&path, "<benchmark tool=\"cbmc\"><test>").unwrap();

        let err = DefinitionLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, BenchError::DefinitionXml { .. }));
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let temp = TempDir::new().unwrap();
        let err = DefinitionLoader::new()
            .load(&temp.path().join("missing.toml"))
            .unwrap_err();
        assert!(matches!(err, BenchError::DefinitionRead { .. }));
    }
}
