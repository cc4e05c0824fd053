//! The indexed command record and its placeholder metadata

use std::collections::HashMap;
use std::path::PathBuf;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Attribute map attached to one placeholder (`validation`, `placeholder`, `desc`)
pub type Attributes = HashMap<String, String>;

/// Placeholder name -> attributes
pub type Metadata = HashMap<String, Attributes>;

/// One parsed recipe
///
/// Built only by the parser, read by search and resolution, replaced wholesale
/// when the index is rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub title: String,
    pub description: String,
    pub content: String,
    /// One entry per placeholder occurrence in `content`, in order.
    /// Duplicates are kept on purpose: resolution skips names it already has.
    pub variables: Vec<String>,
    #[serde(default)]
    pub markdown_file: PathBuf,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub ai_generated: bool,
}

impl Command {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            content: String::new(),
            variables: Vec::new(),
            markdown_file: PathBuf::new(),
            metadata: Metadata::new(),
            ai_generated: false,
        }
    }

    /// Look up one attribute of a placeholder
    pub fn attribute(&self, variable: &str, key: &str) -> Option<&str> {
        self.metadata
            .get(variable)
            .and_then(|attrs| attrs.get(key))
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Parsed `validation` attribute for a placeholder, if any
    pub fn validation(&self, variable: &str) -> Option<Validation> {
        self.attribute(variable, "validation").and_then(Validation::parse)
    }
}

/// A `validation="<kind> <data>"` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Input must match the whole pattern
    Regex(String),
    /// Mime-type pattern for a file path. Declared in the dialect but not enforced.
    File(String),
    Other { kind: String, data: String },
}

lazy_static::lazy_static! {
    static ref VALIDATION_RE: Regex = Regex::new(r"^([A-Za-z]+) (.+)$").expect("valid validation pattern");
}

impl Validation {
    pub fn parse(raw: &str) -> Option<Self> {
        let caps = VALIDATION_RE.captures(raw)?;
        let kind = caps.get(1)?.as_str();
        let data = caps.get(2)?.as_str().to_string();
        Some(match kind {
            "regex" => Validation::Regex(data),
            "file" => Validation::File(data),
            other => Validation::Other {
                kind: other.to_string(),
                data,
            },
        })
    }
}
