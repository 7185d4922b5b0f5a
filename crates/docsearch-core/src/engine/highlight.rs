use crate::core::models::document::{Document, DocumentError};
use crate::core::models::ids::NodeId;
use crate::core::models::node::Element;
use crate::core::utils::matching::{find_ignore_case, split_by_ranges};

pub(crate) const MARKER_TAG: &str = "mark";

/// Only marks carrying the controller's class are highlight markers; author
/// written `<mark>` elements are content.
pub(crate) fn is_marker(element: &Element, marker_class: &str) -> bool {
    element.tag() == MARKER_TAG && element.has_class(marker_class)
}

/// Wraps every occurrence of `query` in the text below `container` in a marker.
///
/// Each matching text node is replaced in place by a run of plain text and
/// marker siblings. Text already inside a marker is left alone, so markers
/// never nest. Returns the number of markers inserted.
pub(crate) fn apply_markers(
    doc: &mut Document,
    container: NodeId,
    query: &str,
    marker_class: &str,
) -> Result<usize, DocumentError> {
    let leaves = doc.text_leaves_where(container, |element| is_marker(element, marker_class));
    let mut inserted = 0;

    for leaf in leaves {
        let text = doc.text(leaf)?.to_owned();
        let ranges = find_ignore_case(&text, query);
        if ranges.is_empty() {
            continue;
        }
        let Some(parent) = doc.parent(leaf) else {
            continue;
        };

        let mut pieces = Vec::with_capacity(ranges.len() * 2 + 1);
        for (piece, matched) in split_by_ranges(&text, &ranges) {
            if matched {
                let marker = doc.create_element(MARKER_TAG);
                doc.element_mut(marker)?.set_attribute("class", marker_class);
                let content = doc.create_text(piece);
                doc.append_child(marker, content)?;
                pieces.push(marker);
                inserted += 1;
            } else {
                pieces.push(doc.create_text(piece));
            }
        }

        doc.replace_with_many(parent, leaf, &pieces)?;
        doc.remove(leaf)?;
    }
    Ok(inserted)
}

/// Unwraps every marker below `container` and merges the text it split, which
/// restores the tree as it was before highlighting. Returns the number of
/// markers removed.
pub(crate) fn remove_markers(
    doc: &mut Document,
    container: NodeId,
    marker_class: &str,
) -> Result<usize, DocumentError> {
    let markers = marker_ids(doc, container, marker_class);
    let mut parents: Vec<NodeId> = Vec::new();

    for marker in &markers {
        let Some(parent) = doc.parent(*marker) else {
            continue;
        };
        let children = doc.children(*marker).to_vec();
        doc.replace_with_many(parent, *marker, &children)?;
        doc.remove(*marker)?;
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    for parent in parents {
        if doc.contains(parent) {
            doc.normalize(parent)?;
        }
    }
    Ok(markers.len())
}

pub(crate) fn count_markers(doc: &Document, container: NodeId, marker_class: &str) -> usize {
    marker_ids(doc, container, marker_class).len()
}

fn marker_ids(doc: &Document, container: NodeId, marker_class: &str) -> Vec<NodeId> {
    doc.descendants(container)
        .filter(|id| {
            doc.element(*id)
                .is_ok_and(|element| is_marker(element, marker_class))
        })
        .collect()
}
