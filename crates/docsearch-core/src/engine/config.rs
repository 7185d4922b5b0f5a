use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How highlight markers from a previous query are treated by a new search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightPolicy {
    /// Every marker is removed before the new query is applied, so markers always
    /// reflect exactly the current query.
    #[default]
    Recompute,
    /// Markers are only removed by an explicit clear; markers from earlier queries
    /// survive in sections that stay visible.
    Retain,
}

pub const DEFAULT_SEARCH_INPUT_ID: &str = "search-input";
pub const DEFAULT_SECTION_CLASS: &str = "section";
pub const DEFAULT_SIDEBAR_CLASS: &str = "sidebar";
pub const DEFAULT_FRAGMENT: &str = "#section-0";
pub const DEFAULT_BACK_TO_TOP_THRESHOLD: f64 = 300.0;
pub const DEFAULT_BACK_TO_TOP_LABEL: &str = "Back to top";
pub const DEFAULT_BACK_TO_TOP_GLYPH: &str = "\u{2191}";
pub const DEFAULT_MARKER_CLASS: &str = "search-match";

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub search_input_id: String,
    pub section_class: String,
    pub sidebar_class: String,
    pub default_fragment: String,
    pub back_to_top_threshold: f64,
    pub back_to_top_label: String,
    pub back_to_top_glyph: String,
    pub marker_class: String,
    pub highlight_policy: HighlightPolicy,
    pub track_fragment_changes: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            search_input_id: DEFAULT_SEARCH_INPUT_ID.to_string(),
            section_class: DEFAULT_SECTION_CLASS.to_string(),
            sidebar_class: DEFAULT_SIDEBAR_CLASS.to_string(),
            default_fragment: DEFAULT_FRAGMENT.to_string(),
            back_to_top_threshold: DEFAULT_BACK_TO_TOP_THRESHOLD,
            back_to_top_label: DEFAULT_BACK_TO_TOP_LABEL.to_string(),
            back_to_top_glyph: DEFAULT_BACK_TO_TOP_GLYPH.to_string(),
            marker_class: DEFAULT_MARKER_CLASS.to_string(),
            highlight_policy: HighlightPolicy::default(),
            track_fragment_changes: false,
        }
    }
}

/// Builds a [`ControllerConfig`], falling back to the page's conventional hooks
/// for every parameter that is not set explicitly.
#[derive(Default)]
pub struct ControllerConfigBuilder {
    search_input_id: Option<String>,
    section_class: Option<String>,
    sidebar_class: Option<String>,
    default_fragment: Option<String>,
    back_to_top_threshold: Option<f64>,
    back_to_top_label: Option<String>,
    back_to_top_glyph: Option<String>,
    marker_class: Option<String>,
    highlight_policy: Option<HighlightPolicy>,
    track_fragment_changes: Option<bool>,
}

impl ControllerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_input_id(mut self, id: impl Into<String>) -> Self {
        self.search_input_id = Some(id.into());
        self
    }
    pub fn section_class(mut self, class: impl Into<String>) -> Self {
        self.section_class = Some(class.into());
        self
    }
    pub fn sidebar_class(mut self, class: impl Into<String>) -> Self {
        self.sidebar_class = Some(class.into());
        self
    }
    pub fn default_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.default_fragment = Some(fragment.into());
        self
    }
    pub fn back_to_top_threshold(mut self, threshold: f64) -> Self {
        self.back_to_top_threshold = Some(threshold);
        self
    }
    pub fn back_to_top_label(mut self, label: impl Into<String>) -> Self {
        self.back_to_top_label = Some(label.into());
        self
    }
    pub fn back_to_top_glyph(mut self, glyph: impl Into<String>) -> Self {
        self.back_to_top_glyph = Some(glyph.into());
        self
    }
    pub fn marker_class(mut self, class: impl Into<String>) -> Self {
        self.marker_class = Some(class.into());
        self
    }
    pub fn highlight_policy(mut self, policy: HighlightPolicy) -> Self {
        self.highlight_policy = Some(policy);
        self
    }
    pub fn track_fragment_changes(mut self, enabled: bool) -> Self {
        self.track_fragment_changes = Some(enabled);
        self
    }

    pub fn build(self) -> Result<ControllerConfig, ConfigError> {
        let defaults = ControllerConfig::default();

        let search_input_id = self.search_input_id.unwrap_or(defaults.search_input_id);
        require_token("search_input_id", &search_input_id)?;
        let section_class = self.section_class.unwrap_or(defaults.section_class);
        require_token("section_class", &section_class)?;
        let sidebar_class = self.sidebar_class.unwrap_or(defaults.sidebar_class);
        require_token("sidebar_class", &sidebar_class)?;
        let marker_class = self.marker_class.unwrap_or(defaults.marker_class);
        require_token("marker_class", &marker_class)?;

        let default_fragment = self.default_fragment.unwrap_or(defaults.default_fragment);
        if !default_fragment.is_empty() && !is_named_fragment(&default_fragment) {
            return Err(ConfigError::InvalidParameter {
                name: "default_fragment",
                reason: format!("'{}' is not of the form '#name'", default_fragment),
            });
        }

        let back_to_top_threshold = self
            .back_to_top_threshold
            .unwrap_or(defaults.back_to_top_threshold);
        if !back_to_top_threshold.is_finite() || back_to_top_threshold < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "back_to_top_threshold",
                reason: format!("expected a finite, non-negative offset, got {}", back_to_top_threshold),
            });
        }

        Ok(ControllerConfig {
            search_input_id,
            section_class,
            sidebar_class,
            default_fragment,
            back_to_top_threshold,
            back_to_top_label: self.back_to_top_label.unwrap_or(defaults.back_to_top_label),
            back_to_top_glyph: self.back_to_top_glyph.unwrap_or(defaults.back_to_top_glyph),
            marker_class,
            highlight_policy: self.highlight_policy.unwrap_or(defaults.highlight_policy),
            track_fragment_changes: self
                .track_fragment_changes
                .unwrap_or(defaults.track_fragment_changes),
        })
    }
}

/// `true` for `#name`; the bare `#` is not a named fragment.
pub fn is_named_fragment(href: &str) -> bool {
    href.len() > 1 && href.starts_with('#')
}

fn require_token(name: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::MissingParameter(name));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidParameter {
            name,
            reason: format!("'{}' must not contain whitespace", value),
        });
    }
    Ok(())
}
