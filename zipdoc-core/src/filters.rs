//! Which files go through which filter
//!
//! The host decides per file whether to call the encode or decode
//! operation. The mapping is plain data: two ordered rule lists, one per
//! direction, each rule pairing a glob pattern with a named filter. The
//! first matching rule wins.

use std::path::{Component, Path};

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::core::archive::TranscodeMode;
use crate::core::error::{Result, ZipDocError};
use crate::transcode::TranscodeOptions;

/// Document formats that are ZIP archives underneath.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "docx", "docm", "dotx", "dotm", "xlsx", "xlsm", "pptx", "pptm", "odt", "ods", "odp", "odg",
];

/// Named transform a rule can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterName {
    /// Produce the stored form
    ZipdocEncode,
    /// Produce the compressed form
    ZipdocDecode,
}

impl FilterName {
    pub fn mode(self) -> TranscodeMode {
        match self {
            FilterName::ZipdocEncode => TranscodeMode::ToStored,
            FilterName::ZipdocDecode => TranscodeMode::ToCompressed,
        }
    }
}

/// Which way content is moving relative to the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Working copy -> repository (commit, add)
    Encode,
    /// Repository -> working copy (checkout, update, archive)
    Decode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRule {
    pub pattern: String,
    pub filter: FilterName,
}

impl FilterRule {
    pub fn new(pattern: impl Into<String>, filter: FilterName) -> Self {
        Self {
            pattern: pattern.into(),
            filter,
        }
    }
}

/// Serializable configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub encode: Vec<FilterRule>,
    pub decode: Vec<FilterRule>,
    pub options: TranscodeOptions,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let rules = |filter: FilterName| -> Vec<FilterRule> {
            DEFAULT_EXTENSIONS
                .iter()
                .map(|ext| FilterRule::new(format!("**/*.{}", ext), filter))
                .collect()
        };
        Self {
            encode: rules(FilterName::ZipdocEncode),
            decode: rules(FilterName::ZipdocDecode),
            options: TranscodeOptions::default(),
        }
    }
}

impl FilterConfig {
    /// No rules at all; nothing is filtered.
    pub fn empty() -> Self {
        Self {
            encode: Vec::new(),
            decode: Vec::new(),
            options: TranscodeOptions::default(),
        }
    }

    pub fn compile(&self) -> Result<FilterSet> {
        FilterSet::compile(self)
    }
}

/// Compiled form of [`FilterConfig`].
#[derive(Debug, Clone)]
pub struct FilterSet {
    encode: Vec<(Pattern, FilterName)>,
    decode: Vec<(Pattern, FilterName)>,
    options: TranscodeOptions,
}

impl FilterSet {
    pub fn compile(config: &FilterConfig) -> Result<Self> {
        Ok(Self {
            encode: compile_rules(&config.encode)?,
            decode: compile_rules(&config.decode)?,
            options: config.options,
        })
    }

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    /// Mode selected for `path` (relative to the repository root), if any.
    pub fn resolve(&self, direction: Direction, path: &Path) -> Option<TranscodeMode> {
        let rules = match direction {
            Direction::Encode => &self.encode,
            Direction::Decode => &self.decode,
        };
        let path = slash_path(path);
        let opts = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        rules
            .iter()
            .find(|(pattern, _)| pattern.matches_with(&path, opts))
            .map(|(_, name)| name.mode())
    }
}

fn compile_rules(rules: &[FilterRule]) -> Result<Vec<(Pattern, FilterName)>> {
    rules
        .iter()
        .map(|rule| {
            let pattern = normalize_pattern(&rule.pattern);
            Pattern::new(&pattern)
                .map(|p| (p, rule.filter))
                .map_err(|source| ZipDocError::InvalidPattern {
                    pattern: rule.pattern.clone(),
                    source,
                })
        })
        .collect()
}

/// Accept Mercurial-style `**.docx` by rewriting it to `**/*.docx`.
fn normalize_pattern(pattern: &str) -> String {
    match pattern.strip_prefix("**") {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => format!("**/*{}", rest),
        _ => pattern.to_string(),
    }
}

/// `/`-joined relative path, independent of the host separator.
fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
