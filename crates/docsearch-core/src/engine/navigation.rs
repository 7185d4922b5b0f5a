use super::config::is_named_fragment;
use crate::core::models::document::{Document, DocumentError};
use crate::core::models::ids::NodeId;

pub(crate) const ACTIVE_CLASS: &str = "active";
const ANCHOR_TAG: &str = "a";

/// Anchors inside every sidebar container, in document order and without duplicates.
pub(crate) fn navigation_links(doc: &Document, sidebar_class: &str) -> Vec<NodeId> {
    let mut links = Vec::new();
    for sidebar in doc.elements_by_class(sidebar_class) {
        for link in doc.descendants(sidebar) {
            let is_anchor = doc
                .element(link)
                .is_ok_and(|element| element.tag() == ANCHOR_TAG);
            if is_anchor && !links.contains(&link) {
                links.push(link);
            }
        }
    }
    links
}

/// The link matching the current fragment, falling back to `default_fragment`
/// when the location has no fragment. Only the first match counts.
pub(crate) fn select_active(
    doc: &Document,
    links: &[NodeId],
    fragment: &str,
    default_fragment: &str,
) -> Option<NodeId> {
    let wanted = if fragment.is_empty() {
        default_fragment
    } else {
        fragment
    };
    if wanted.is_empty() {
        return None;
    }
    links.iter().copied().find(|link| {
        doc.element(*link)
            .is_ok_and(|element| element.href() == Some(wanted))
    })
}

/// Clears the active class from every link and sets it on `active` only.
pub(crate) fn apply_active(
    doc: &mut Document,
    links: &[NodeId],
    active: Option<NodeId>,
) -> Result<(), DocumentError> {
    for &link in links {
        doc.element_mut(link)?.remove_class(ACTIVE_CLASS);
    }
    if let Some(link) = active {
        doc.element_mut(link)?.add_class(ACTIVE_CLASS);
    }
    Ok(())
}

/// The nearest anchor at or above `node` whose `href` points into the page,
/// together with that `href`.
pub(crate) fn same_page_anchor(doc: &Document, node: NodeId) -> Option<(NodeId, String)> {
    let anchor = doc.closest(node, |element| {
        element.tag() == ANCHOR_TAG && element.href().is_some_and(|href| href.starts_with('#'))
    })?;
    let href = doc.element(anchor).ok()?.href()?.to_string();
    Some((anchor, href))
}

/// The element a `#name` fragment refers to, if the page has one.
pub(crate) fn fragment_target(doc: &Document, href: &str) -> Option<NodeId> {
    if !is_named_fragment(href) {
        return None;
    }
    doc.element_by_id(&href[1..])
}
