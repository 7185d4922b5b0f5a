use docsearch::engine::config::{self as core_config, HighlightPolicy};

/// Values used for every setting that neither the command line nor the
/// configuration file provides.
pub struct DefaultsConfig {
    pub search_input_id: String,
    pub section_class: String,
    pub sidebar_class: String,
    pub default_fragment: String,
    pub track_fragment_changes: bool,
    pub marker_class: String,
    pub highlight_policy: HighlightPolicy,
    pub back_to_top_threshold: f64,
    pub back_to_top_label: String,
    pub back_to_top_glyph: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            search_input_id: core_config::DEFAULT_SEARCH_INPUT_ID.to_string(),
            section_class: core_config::DEFAULT_SECTION_CLASS.to_string(),
            sidebar_class: core_config::DEFAULT_SIDEBAR_CLASS.to_string(),
            default_fragment: core_config::DEFAULT_FRAGMENT.to_string(),
            track_fragment_changes: false,
            marker_class: core_config::DEFAULT_MARKER_CLASS.to_string(),
            highlight_policy: HighlightPolicy::Recompute,
            back_to_top_threshold: core_config::DEFAULT_BACK_TO_TOP_THRESHOLD,
            back_to_top_label: core_config::DEFAULT_BACK_TO_TOP_LABEL.to_string(),
            back_to_top_glyph: core_config::DEFAULT_BACK_TO_TOP_GLYPH.to_string(),
        }
    }
}
