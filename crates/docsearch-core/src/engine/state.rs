use crate::core::models::ids::NodeId;
use serde::Serialize;

/// What a single search (or clear) did to the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSummary {
    /// The folded query that was applied; empty after a clear.
    pub query: String,
    pub visible: Vec<NodeId>,
    pub hidden: Vec<NodeId>,
    pub markers_inserted: usize,
    pub markers_removed: usize,
}

impl SearchSummary {
    pub fn is_cleared(&self) -> bool {
        self.query.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct SectionState {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text_length: usize,
    pub visible: bool,
    pub markers: usize,
}

/// The observable state of a page at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageSnapshot {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_link: Option<String>,
    pub back_to_top_shown: bool,
    pub scroll_offset: f64,
    pub sections: Vec<SectionState>,
}

impl PageSnapshot {
    pub fn visible_sections(&self) -> impl Iterator<Item = &SectionState> {
        self.sections.iter().filter(|section| section.visible)
    }

    pub fn total_markers(&self) -> usize {
        self.sections.iter().map(|section| section.markers).sum()
    }
}
