//! # Tool Registry
//!
//! Galaxy's `tool_conf.xml`: a `toolbox` of named `section`s, each listing the descriptor
//! files of its tools. Sections are matched by name; their id (and the directory under
//! `tools/` holding their descriptors) is the name without spaces, lower-cased.

use crate::{
    constants::SCRIPT_METADATA_EXTENSION,
    core::xml::{self, XmlElement, XmlError},
    models::IntegrationConfig,
};
use std::collections::BTreeMap;
use thiserror::Error;

const TOOLBOX_TAG: &str = "toolbox";
const SECTION_TAG: &str = "section";
const TOOL_TAG: &str = "tool";

/// Errors raised while reading or planning the registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A script is placed in a section the config does not declare.
    #[error("Script '{script}' references section '{section}', which is not declared")]
    MalformedRegistrySection {
        /// The undeclared section name.
        section: String,
        /// The script placed in it.
        script: String,
    },
    /// The document is not a `toolbox`.
    #[error("Registry root element must be <toolbox>, found <{found}>")]
    UnexpectedRoot {
        /// The root element actually found.
        found: String,
    },
    /// A `section` element has no `name`.
    #[error("Registry section without a 'name' attribute")]
    UnnamedSection,
    /// The document itself is not well-formed.
    #[error("Failed to parse registry document: {0}")]
    Xml(#[from] XmlError),
}

/// Turns a section name into its id: `"OTU Picking"` -> `"otupicking"`.
pub fn section_id(section_name: &str) -> String {
    section_name.replace(' ', "").to_lowercase()
}

/// Registry path of a script's descriptor, relative to Galaxy's `tools/` directory.
/// A trailing metadata extension on `script_id` is ignored.
pub fn tool_file(section_name: &str, script_id: &str) -> String {
    let stem = script_id
        .strip_suffix(&format!(".{}", SCRIPT_METADATA_EXTENSION))
        .unwrap_or(script_id);
    format!("{}/{}.xml", section_id(section_name), stem)
}

/// The registry document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    root: XmlElement,
}

impl Default for Registry {
    /// A fresh registry holding only Galaxy's stock upload tool.
    fn default() -> Self {
        let root = XmlElement::new(TOOLBOX_TAG).with_child(
            XmlElement::new(SECTION_TAG)
                .with_attr("name", "Get Data")
                .with_attr("id", "getext")
                .with_child(XmlElement::new(TOOL_TAG).with_attr("file", "data_source/upload.xml")),
        );
        Self { root }
    }
}

impl Registry {
    /// Parses an existing registry document.
    pub fn parse(text: &str) -> Result<Self, RegistryError> {
        let root = xml::parse_document(text)?;
        if root.name != TOOLBOX_TAG {
            return Err(RegistryError::UnexpectedRoot { found: root.name });
        }
        if root
            .elements()
            .any(|e| e.name == SECTION_TAG && e.attr("name").is_none())
        {
            return Err(RegistryError::UnnamedSection);
        }
        Ok(Self { root })
    }

    /// Serializes the registry, comments included.
    pub fn to_xml_string(&self) -> String {
        xml::to_pretty_string(&self.root)
    }

    /// Section names, in document order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections().filter_map(|s| s.attr("name")).collect()
    }

    /// Tool files listed under the named section.
    pub fn tool_files(&self, section_name: &str) -> Vec<&str> {
        self.sections()
            .find(|s| s.attr("name") == Some(section_name))
            .map(|s| {
                s.elements()
                    .filter(|t| t.name == TOOL_TAG)
                    .filter_map(|t| t.attr("file"))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adds every script of `script_ids` to the named section, creating the section at the
    /// end of the toolbox when needed. Entries already present are left alone.
    ///
    /// Returns the number of entries added.
    pub fn merge_section<S: AsRef<str>>(&mut self, section_name: &str, script_ids: &[S]) -> usize {
        let position = self
            .root
            .elements()
            .position(|e| e.name == SECTION_TAG && e.attr("name") == Some(section_name));

        let section = match position {
            Some(idx) => match self.root.elements_mut().nth(idx) {
                Some(section) => section,
                None => return 0,
            },
            None => {
                log::debug!("Creating registry section '{}'", section_name);
                self.root.push_child(
                    XmlElement::new(SECTION_TAG)
                        .with_attr("name", section_name)
                        .with_attr("id", section_id(section_name)),
                );
                match self.root.elements_mut().last() {
                    Some(section) => section,
                    None => return 0,
                }
            }
        };

        let mut added = 0;
        for script_id in script_ids {
            let file = tool_file(section_name, script_id.as_ref());
            let exists = section
                .elements()
                .any(|t| t.name == TOOL_TAG && t.attr("file") == Some(file.as_str()));
            if !exists {
                section.push_child(XmlElement::new(TOOL_TAG).with_attr("file", file));
                added += 1;
            }
        }
        added
    }

    /// Merges a whole `section -> scripts` plan, in plan order.
    pub fn merge(&mut self, plan: &[(String, Vec<String>)]) -> usize {
        plan.iter()
            .map(|(section, scripts)| self.merge_section(section, scripts))
            .sum()
    }

    fn sections(&self) -> impl Iterator<Item = &XmlElement> {
        self.root.elements().filter(|e| e.name == SECTION_TAG)
    }
}

/// Groups the integrated scripts by section, following the section order of `config`.
///
/// Every declared section appears in the plan, even when empty, so the registry lists
/// it. A script whose section is not declared is rejected.
pub fn plan_sections<S: AsRef<str>>(
    config: &IntegrationConfig,
    integrated: &[S],
) -> Result<Vec<(String, Vec<String>)>, RegistryError> {
    let mut by_section: BTreeMap<&str, Vec<String>> = config
        .sections
        .iter()
        .map(|s| (s.as_str(), Vec::new()))
        .collect();

    for script in integrated {
        let script = script.as_ref();
        let Some(placement) = config.scripts.get(script) else {
            continue;
        };
        let entries = by_section
            .get_mut(placement.section.as_str())
            .ok_or_else(|| RegistryError::MalformedRegistrySection {
                section: placement.section.clone(),
                script: script.to_string(),
            })?;
        entries.push(script.to_string());
    }

    Ok(config
        .sections
        .iter()
        .map(|s| {
            let scripts = by_section.remove(s.as_str()).unwrap_or_default();
            (s.clone(), scripts)
        })
        .collect())
}

/// Checks that every configured script lands in a declared section.
pub fn validate_config(config: &IntegrationConfig) -> Result<(), RegistryError> {
    let ids: Vec<&str> = config.scripts.keys().map(String::as_str).collect();
    plan_sections(config, &ids).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScriptPlacement;

    fn config() -> IntegrationConfig {
        let mut scripts = BTreeMap::new();
        for (id, section) in [("script1", "Section 1"), ("script2", "Section 1"), ("script3", "Section 2")] {
            scripts.insert(
                id.to_string(),
                ScriptPlacement {
                    section: section.to_string(),
                    remove: vec![],
                },
            );
        }
        IntegrationConfig {
            sections: vec!["Section 1".to_string(), "Section 2".to_string()],
            scripts,
        }
    }

    #[test]
    fn test_section_id_and_tool_file() {
        assert_eq!(section_id("OTU Picking"), "otupicking");
        assert_eq!(tool_file("OTU Picking", "pick_otus"), "otupicking/pick_otus.xml");
        assert_eq!(tool_file("Section 1", "pick_otus.toml"), "section1/pick_otus.xml");
    }

    #[test]
    fn test_default_registry() {
        let registry = Registry::default();
        assert_eq!(
            registry.to_xml_string(),
            concat!(
                "<?xml version=\"1.0\" ?>\n",
                "<toolbox>\n",
                "\t<section id=\"getext\" name=\"Get Data\">\n",
                "\t\t<tool file=\"data_source/upload.xml\"/>\n",
                "\t</section>\n",
                "</toolbox>\n",
            )
        );
    }

    #[test]
    fn test_merge_creates_sections_in_order() {
        let mut registry = Registry::default();
        let plan = plan_sections(&config(), &["script3", "script1", "script2"]).unwrap();
        assert_eq!(registry.merge(&plan), 3);
        assert_eq!(registry.section_names(), vec!["Get Data", "Section 1", "Section 2"]);
        assert_eq!(
            registry.tool_files("Section 1"),
            vec!["section1/script1.xml", "section1/script2.xml"]
        );
        assert_eq!(registry.tool_files("Section 2"), vec!["section2/script3.xml"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut registry = Registry::default();
        let plan = plan_sections(&config(), &["script1", "script3"]).unwrap();
        registry.merge(&plan);
        let once = registry.clone();
        assert_eq!(registry.merge(&plan), 0);
        assert_eq!(registry, once);
    }

    #[test]
    fn test_merge_appends_to_existing_section() {
        let doc = r#"<?xml version="1.0"?>
<toolbox>
  <section name="Section 1" id="section1">
    <tool file="section1/script1.xml"/>
    <tool file="section1/legacy.xml"/>
  </section>
</toolbox>"#;
        let mut registry = Registry::parse(doc).unwrap();
        assert_eq!(registry.merge_section("Section 1", &["script1", "script2"]), 1);
        assert_eq!(
            registry.tool_files("Section 1"),
            vec!["section1/script1.xml", "section1/legacy.xml", "section1/script2.xml"]
        );
    }

    #[test]
    fn test_merge_keeps_commented_out_tools() {
        let doc = concat!(
            "<toolbox><section name=\"Get Data\" id=\"getext\">",
            "<tool file=\"data_source/upload.xml\"/>",
            "<!-- <tool file=\"data_source/ucsc.xml\"/> -->",
            "</section></toolbox>",
        );
        let mut registry = Registry::parse(doc).unwrap();
        assert_eq!(registry.merge_section("Section 1", &["script1"]), 1);
        let text = registry.to_xml_string();
        assert!(text.contains("\t\t<!-- <tool file=\"data_source/ucsc.xml\"/> -->\n"));
        assert_eq!(registry.tool_files("Get Data"), vec!["data_source/upload.xml"]);

        // Written out and read back, the comment is still there and nothing else changes.
        let reread = Registry::parse(&text).unwrap();
        assert_eq!(reread, registry);
    }

    #[test]
    fn test_parse_accepts_cdata() {
        let doc = "<toolbox><label text=\"x\"><![CDATA[a <b>]]></label></toolbox>";
        assert!(Registry::parse(doc).is_ok());
    }

    #[test]
    fn test_plan_keeps_empty_sections() {
        let plan = plan_sections(&config(), &["script1"]).unwrap();
        assert_eq!(
            plan,
            vec![
                ("Section 1".to_string(), vec!["script1".to_string()]),
                ("Section 2".to_string(), vec![]),
            ]
        );
    }

    #[test]
    fn test_plan_rejects_undeclared_section() {
        let mut config = config();
        config.scripts.insert(
            "rogue".to_string(),
            ScriptPlacement {
                section: "Nowhere".to_string(),
                remove: vec![],
            },
        );
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MalformedRegistrySection { ref section, ref script }
                if section == "Nowhere" && script == "rogue"
        ));
    }

    #[test]
    fn test_parse_rejects_foreign_documents() {
        assert!(matches!(
            Registry::parse("<tool id='x'/>"),
            Err(RegistryError::UnexpectedRoot { .. })
        ));
        assert!(matches!(
            Registry::parse("<toolbox><section id='x'/></toolbox>"),
            Err(RegistryError::UnnamedSection)
        ));
        assert!(matches!(Registry::parse("<toolbox>"), Err(RegistryError::Xml(_))));
    }
}
