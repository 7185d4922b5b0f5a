use crate::core::models::ids::NodeId;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Smooth,
}

/// Vertical alignment of an element scrolled into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBlock {
    #[default]
    Start,
    Center,
    End,
    Nearest,
}

/// A scroll the controller asked the host to perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollRequest {
    ToOffset {
        top: f64,
        behavior: ScrollBehavior,
    },
    IntoView {
        target: NodeId,
        element_id: String,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    },
}

/// The environment a page lives in: it knows the location and the scroll
/// position, and it performs the scrolls the controller requests.
pub trait PageHost {
    /// The current location fragment including the leading `#`, or an empty
    /// string when the location has none.
    fn fragment(&self) -> &str;

    /// The current vertical scroll offset in pixels.
    fn scroll_offset(&self) -> f64;

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    fn scroll_into_view(
        &mut self,
        target: NodeId,
        element_id: &str,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    );
}

/// An in-memory [`PageHost`].
///
/// Every scroll request is recorded. Smooth scrolls complete immediately. An
/// element scrolled into view moves the offset to its position from the layout
/// table when one was registered; otherwise the offset is left unchanged.
#[derive(Debug, Clone, Default)]
pub struct SimulatedViewport {
    fragment: String,
    offset: f64,
    layout: HashMap<String, f64>,
    requests: Vec<ScrollRequest>,
}

impl SimulatedViewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = fragment.into();
        self
    }

    pub fn with_scroll_offset(mut self, offset: f64) -> Self {
        self.offset = offset.max(0.0);
        self
    }

    /// Registers the document offset of the element with the given id.
    pub fn with_layout(mut self, element_id: impl Into<String>, top: f64) -> Self {
        self.layout.insert(element_id.into(), top);
        self
    }

    pub fn set_fragment(&mut self, fragment: impl Into<String>) {
        self.fragment = fragment.into();
    }

    /// Moves the viewport as a user scroll would; this is not a request.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
    }

    pub fn requests(&self) -> &[ScrollRequest] {
        &self.requests
    }

    pub fn last_request(&self) -> Option<&ScrollRequest> {
        self.requests.last()
    }

    pub fn take_requests(&mut self) -> Vec<ScrollRequest> {
        std::mem::take(&mut self.requests)
    }
}

impl PageHost for SimulatedViewport {
    fn fragment(&self) -> &str {
        &self.fragment
    }

    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.offset = top.max(0.0);
        self.requests.push(ScrollRequest::ToOffset { top, behavior });
    }

    fn scroll_into_view(
        &mut self,
        target: NodeId,
        element_id: &str,
        behavior: ScrollBehavior,
        block: ScrollBlock,
    ) {
        if let Some(&top) = self.layout.get(element_id) {
            self.offset = top.max(0.0);
        }
        self.requests.push(ScrollRequest::IntoView {
            target,
            element_id: element_id.to_string(),
            behavior,
            block,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::document::Document;

    #[test]
    fn scroll_to_moves_offset_and_records_request() {
        let mut viewport = SimulatedViewport::new().with_scroll_offset(640.0);
        viewport.scroll_to(0.0, ScrollBehavior::Smooth);

        assert_eq!(viewport.scroll_offset(), 0.0);
        assert_eq!(
            viewport.last_request(),
            Some(&ScrollRequest::ToOffset {
                top: 0.0,
                behavior: ScrollBehavior::Smooth
            })
        );
    }

    #[test]
    fn scroll_into_view_uses_layout_when_known() {
        let mut doc = Document::new();
        let target = doc.create_element("section");
        let mut viewport = SimulatedViewport::new().with_layout("section-2", 1800.0);

        viewport.scroll_into_view(target, "section-2", ScrollBehavior::Smooth, ScrollBlock::Start);
        assert_eq!(viewport.scroll_offset(), 1800.0);

        viewport.scroll_into_view(target, "unplaced", ScrollBehavior::Smooth, ScrollBlock::Start);
        assert_eq!(viewport.scroll_offset(), 1800.0);
        assert_eq!(viewport.take_requests().len(), 2);
        assert!(viewport.requests().is_empty());
    }

    #[test]
    fn user_scroll_is_not_a_request() {
        let mut viewport = SimulatedViewport::new();
        viewport.set_scroll_offset(-20.0);
        assert_eq!(viewport.scroll_offset(), 0.0);
        assert!(viewport.requests().is_empty());
    }
}
