use crate::error::{CliError, Result};
use docsearch::engine::config::HighlightPolicy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePageConfig {
    pub search_input_id: Option<String>,
    pub section_class: Option<String>,
    pub sidebar_class: Option<String>,
    pub default_fragment: Option<String>,
    pub track_fragment_changes: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSearchConfig {
    pub marker_class: Option<String>,
    pub highlight_policy: Option<HighlightPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileBackToTopConfig {
    pub threshold: Option<f64>,
    pub label: Option<String>,
    pub glyph: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub page: Option<FilePageConfig>,
    pub search: Option<FileSearchConfig>,
    pub back_to_top: Option<FileBackToTopConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
