use crate::core::models::ids::NodeId;

/// An event delivered by the host to the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// The value of the search input changed.
    Input { value: String },
    /// The page was scrolled; the new offset is read from the host.
    Scroll,
    /// A node was activated (clicked). The handler walks up from `target`.
    Click { target: NodeId },
    /// The location fragment changed without a page load.
    FragmentChange,
}

/// What a handler did with an event that the host needs to know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// The host must not perform its default action (e.g. following a link).
    pub default_prevented: bool,
}

impl EventOutcome {
    pub fn proceed() -> Self {
        Self::default()
    }

    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
        }
    }
}
