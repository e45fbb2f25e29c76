//! @ai:module:intent Per-sub-test XML results document
//! @ai:module:layer infrastructure
//! @ai:module:public_api XmlReport, XmlSourceFile
//! @ai:module:stateless false

use crate::sysinfo::SystemInfo;
use anyhow::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

/// @ai:intent One `sourcefile` element with its column values
#[derive(Debug, Clone, PartialEq)]
pub struct XmlSourceFile {
    pub name: String,
    pub options: Option<String>,
    /// (title, value) pairs, starting with status, cputime and walltime
    pub columns: Vec<(String, String)>,
}

/// @ai:intent XML document for one sub-test, filled in as runs complete
#[derive(Debug, Clone)]
pub struct XmlReport {
    attributes: Vec<(String, String)>,
    system: SystemInfo,
    column_titles: Vec<String>,
    files: Vec<XmlSourceFile>,
    time: Option<(String, String)>,
}

impl XmlReport {
    /// @ai:intent Start a document with the root attributes and column titles
    /// @ai:effects pure
    pub fn new(attributes: Vec<(String, String)>, system: SystemInfo, titles: &[String]) -> Self {
        let mut column_titles = vec![
            "status".to_string(),
            "cputime".to_string(),
            "walltime".to_string(),
        ];
        column_titles.extend(titles.iter().cloned());

        Self {
            attributes,
            system,
            column_titles,
            files: Vec::new(),
            time: None,
        }
    }

    pub fn add_source_file(&mut self, file: XmlSourceFile) {
        self.files.push(file);
    }

    pub fn set_time(&mut self, cputime: String, walltime: String) {
        self.time = Some((cputime, walltime));
    }

    /// @ai:intent Serialize the document with two-space indentation
    /// @ai:effects pure
    pub fn render(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", None, None)))?;

        let root = BytesStart::new("test").with_attributes(
            self.attributes
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        );
        writer.write_event(Event::Start(root))?;

        writer.write_event(Event::Start(BytesStart::new("systeminfo")))?;
        writer.write_event(Event::Empty(
            BytesStart::new("os").with_attributes([("name", self.system.os.as_str())]),
        ))?;
        writer.write_event(Event::Empty(BytesStart::new("cpu").with_attributes([
            ("model", self.system.cpu_model.as_str()),
            ("cores", self.system.cores.as_str()),
            ("frequency", self.system.frequency.as_str()),
        ])))?;
        writer.write_event(Event::Empty(
            BytesStart::new("ram").with_attributes([("size", self.system.ram.as_str())]),
        ))?;
        writer.write_event(Event::End(BytesEnd::new("systeminfo")))?;

        writer.write_event(Event::Start(BytesStart::new("columns")))?;
        for title in &self.column_titles {
            writer.write_event(Event::Empty(
                BytesStart::new("column").with_attributes([("title", title.as_str())]),
            ))?;
        }
        writer.write_event(Event::End(BytesEnd::new("columns")))?;

        for file in &self.files {
            let mut start = BytesStart::new("sourcefile");
            start.push_attribute(("name", file.name.as_str()));
            if let Some(options) = &file.options {
                start.push_attribute(("options", options.as_str()));
            }
            writer.write_event(Event::Start(start))?;

            for (title, value) in &file.columns {
                writer.write_event(Event::Empty(
                    BytesStart::new("column")
                        .with_attributes([("title", title.as_str()), ("value", value.as_str())]),
                ))?;
            }

            writer.write_event(Event::End(BytesEnd::new("sourcefile")))?;
        }

        if let Some((cputime, walltime)) = &self.time {
            writer.write_event(Event::Empty(BytesStart::new("time").with_attributes([
                ("cputime", cputime.as_str()),
                ("walltime", walltime.as_str()),
            ])))?;
        }

        writer.write_event(Event::End(BytesEnd::new("test")))?;

        let mut xml = String::from_utf8(writer.into_inner())?;
        xml.push('\n');
        Ok(xml)
    }
}
