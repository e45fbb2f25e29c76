//! @ai:module:intent Read benchmark definitions written in the classic XML layout
//! @ai:module:layer infrastructure
//! @ai:module:public_api parse_definition
//! @ai:module:depends_on definition::model, fileset, tools
//! @ai:module:stateless true
//!
//! Layout: a root element with `tool`, `memlimit` and `timelimit` attributes,
//! holding `option`, `sourcefiles`, `test` and `columns` children.

use crate::definition::model::{ColumnDecl, DefinitionFile, OptionPair, SubTestDecl};
use crate::fileset::FileSetDecl;
use crate::tools::Tool;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::str::FromStr;

/// Parsed element with its attributes, text and children.
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, String> {
        let mut attributes = Vec::new();

        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value().map_err(|e| e.to_string())?;
            attributes.push((key, value.into_owned()));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            ..Default::default()
        })
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Trimmed text content, `None` when empty.
    fn text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

fn parse_tree(xml: &str) -> Result<Element, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err("multiple root elements".to_string());
                }
                stack.push(Element::from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => return Err("multiple root elements".to_string()),
                }
            }
            Event::End(_) => {
                let element = stack.pop().ok_or("unbalanced closing tag")?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&text.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }

    root.ok_or_else(|| "no root element".to_string())
}

fn options(parent: &Element) -> Vec<OptionPair> {
    parent
        .children("option")
        .map(|option| OptionPair {
            name: option.attribute("name").unwrap_or_default().to_string(),
            value: option.text().map(str::to_string),
        })
        .collect()
}

fn texts(parent: &Element, name: &str) -> Vec<String> {
    parent
        .children(name)
        .filter_map(Element::text)
        .map(str::to_string)
        .collect()
}

fn file_sets(parent: &Element) -> Vec<FileSetDecl> {
    parent
        .children("sourcefiles")
        .map(|block| FileSetDecl {
            include: texts(block, "include"),
            includesfile: texts(block, "includesfile"),
            exclude: texts(block, "exclude"),
            options: options(block),
        })
        .collect()
}

fn number<T: FromStr>(element: &Element, key: &str) -> Result<Option<T>, String> {
    element
        .attribute(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| format!("attribute {key}={value:?} is not a number"))
        })
        .transpose()
}

/// @ai:intent Parse an XML definition into the same declaration types the TOML format uses
/// @ai:post Err names the first malformed construct
/// @ai:effects pure
pub fn parse_definition(xml: &str) -> Result<DefinitionFile, String> {
    let root = parse_tree(xml)?;

    let tool = root
        .attribute("tool")
        .ok_or("missing tool attribute")?
        .parse::<Tool>()?;

    let tests = root
        .children("test")
        .map(|test| SubTestDecl {
            name: test.attribute("name").map(str::to_string),
            options: options(test),
            sourcefiles: file_sets(test),
        })
        .collect();

    let mut columns = Vec::new();
    for column in root.children("columns").flat_map(|c| c.children("column")) {
        columns.push(ColumnDecl {
            text: column.text().unwrap_or_default().to_string(),
            title: column.attribute("title").map(str::to_string),
            digits: number(column, "numberOfDigits")?,
        });
    }

    Ok(DefinitionFile {
        tool,
        memlimit: number(&root, "memlimit")?,
        timelimit: number(&root, "timelimit")?,
        options: options(&root),
        sourcefiles: file_sets(&root),
        tests,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFINITION: &str = r#"<?xml version="1.0"?>
<!DOCTYPE benchmark SYSTEM "benchmark.dtd">
<benchmark tool="cbmc" memlimit="1500" timelimit="60">
  <option name="--unwind">5</option>
  <option name="--no-unwinding-assertions"/>
  <sourcefiles>
    <include>programs/*.c</include>
  </sourcefiles>
  <test name="ssh">
    <option name="--32"></option>
    <sourcefiles>
      <includesfile>lists/ssh.set</includesfile>
      <exclude>programs/s3_srvr_1a.c</exclude>
      <option name="--function">main</option>
    </sourcefiles>
  </test>
  <test/>
  <columns>
    <column title="total" numberOfDigits="2">Total time</column>
    <column>Number of refinements</column>
  </columns>
</benchmark>
"#;

    #[test]
    fn test_parse_classic_layout() {
        let file = parse_definition(DEFINITION).unwrap();

        assert_eq!(file.tool, Tool::Cbmc);
        assert_eq!(file.memlimit, Some(1500));
        assert_eq!(file.timelimit, Some(60));
        assert_eq!(
            file.options,
            vec![
                OptionPair::with_value("--unwind", "5"),
                OptionPair::flag("--no-unwinding-assertions"),
            ]
        );
        assert_eq!(file.sourcefiles.len(), 1);
        assert_eq!(file.sourcefiles[0].include, vec!["programs/*.c"]);

        assert_eq!(file.tests.len(), 2);
        let ssh = &file.tests[0];
        assert_eq!(ssh.name.as_deref(), Some("ssh"));
        assert_eq!(ssh.options, vec![OptionPair::flag("--32")]);
        assert_eq!(ssh.sourcefiles[0].includesfile, vec!["lists/ssh.set"]);
        assert_eq!(ssh.sourcefiles[0].exclude, vec!["programs/s3_srvr_1a.c"]);
        assert_eq!(
            ssh.sourcefiles[0].options,
            vec![OptionPair::with_value("--function", "main")]
        );
        assert_eq!(file.tests[1].name, None);

        assert_eq!(file.columns.len(), 2);
        assert_eq!(file.columns[0].text, "Total time");
        assert_eq!(file.columns[0].title.as_deref(), Some("total"));
        assert_eq!(file.columns[0].digits, Some(2));
        assert_eq!(file.columns[1].title, None);
    }

    #[test]
    fn test_limits_are_optional() {
        let file = parse_definition(r#"<benchmark tool="blast"/>"#).unwrap();
        assert_eq!(file.tool, Tool::Blast);
        assert_eq!(file.memlimit, None);
        assert!(file.tests.is_empty());
        assert!(file.columns.is_empty());
    }

    #[test]
    fn test_rejects_bad_definitions() {
        assert!(parse_definition(r#"<benchmark memlimit="1"/>"#)
            .unwrap_err()
            .contains("tool"));
        assert!(parse_definition(r#"<benchmark tool="spin"/>"#)
            .unwrap_err()
            .contains("unknown tool"));
        assert!(parse_definition(r#"<benchmark tool="cbmc" timelimit="ten"/>"#)
            .unwrap_err()
            .contains("timelimit"));
        assert!(parse_definition(r#"<benchmark tool="cbmc"><test>"#).is_err());
        assert!(parse_definition("").is_err());
    }
}
