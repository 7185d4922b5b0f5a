use super::ids::NodeId;
use super::node::{Element, Node, NodeKind};
use slotmap::SlotMap;
use thiserror::Error;

/// Elements whose text is not rendered prose and must never be searched or highlighted.
const RAW_TEXT_TAGS: [&str; 2] = ["script", "style"];

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DocumentError {
    #[error("Node {0:?} does not exist in this document")]
    UnknownNode(NodeId),
    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("Node {0:?} is not a text node")]
    NotText(NodeId),
    #[error("Cannot insert node {child:?} into its own descendant {parent:?}")]
    Cycle { parent: NodeId, child: NodeId },
    #[error("Node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("The document root cannot be moved or removed")]
    RootImmutable,
}

/// A rendered page held as an arena-backed tree.
///
/// Every node lives in a single slot map and is addressed by [`NodeId`]. The
/// document owns exactly one root node of kind [`NodeKind::Document`]; all
/// other nodes are either attached somewhere below it or detached (freshly
/// created, or taken out with [`Document::detach`]).
#[derive(Debug, Clone)]
pub struct Document {
    nodes: SlotMap<NodeId, Node>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document containing only its root node.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new(NodeKind::Document));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes stored in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DocumentError> {
        self.nodes.get_mut(id).ok_or(DocumentError::UnknownNode(id))
    }

    fn node_ref(&self, id: NodeId) -> Result<&Node, DocumentError> {
        self.nodes.get(id).ok_or(DocumentError::UnknownNode(id))
    }

    pub fn element(&self, id: NodeId) -> Result<&Element, DocumentError> {
        self.node_ref(id)?
            .as_element()
            .ok_or(DocumentError::NotAnElement(id))
    }

    pub fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DocumentError> {
        self.node_mut(id)?
            .as_element_mut()
            .ok_or(DocumentError::NotAnElement(id))
    }

    pub fn text(&self, id: NodeId) -> Result<&str, DocumentError> {
        self.node_ref(id)?.as_text().ok_or(DocumentError::NotText(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of a node, or an empty slice for an unknown id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_inclusive_ancestor(self.root, id)
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes
            .insert(Node::new(NodeKind::Element(Element::new(tag))))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Text(text.into())))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(NodeKind::Comment(text.into())))
    }

    pub fn create_doctype(&mut self, declaration: impl Into<String>) -> NodeId {
        self.nodes
            .insert(Node::new(NodeKind::Doctype(declaration.into())))
    }

    /// Returns `true` when `ancestor` is `node` itself or lies on its parent chain.
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Takes a node (and its subtree) out of its parent. Detached nodes stay in
    /// the arena and can be re-inserted.
    pub fn detach(&mut self, id: NodeId) -> Result<(), DocumentError> {
        if id == self.root {
            return Err(DocumentError::RootImmutable);
        }
        let parent = self.node_ref(id)?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|child| *child != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.node_ref(parent)?;
        self.node_ref(child)?;
        if child == self.root {
            return Err(DocumentError::RootImmutable);
        }
        if self.is_inclusive_ancestor(child, parent) {
            return Err(DocumentError::Cycle { parent, child });
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DocumentError> {
        self.check_insertable(parent, child)?;
        self.detach(child)?;
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Appends a freshly created node without validation. The caller guarantees
    /// that `child` is detached and is not an ancestor of `parent`.
    pub(crate) fn push_fresh_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return;
        };
        parent_node.children.push(child);
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
        }
    }

    /// Inserts `child` immediately before `reference`, which must be a child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: NodeId,
    ) -> Result<(), DocumentError> {
        self.check_insertable(parent, child)?;
        if child == reference {
            return Ok(());
        }
        self.child_index(parent, reference)?;
        self.detach(child)?;
        let index = self.child_index(parent, reference)?;
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Puts `replacement` in the position `old` occupied under `parent` and detaches `old`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        replacement: NodeId,
        old: NodeId,
    ) -> Result<(), DocumentError> {
        self.replace_with_many(parent, old, &[replacement])
    }

    /// Replaces `old` by a run of sibling nodes, in order. Used to splice a text
    /// node into text and marker pieces without an intermediate wrapper.
    pub fn replace_with_many(
        &mut self,
        parent: NodeId,
        old: NodeId,
        replacements: &[NodeId],
    ) -> Result<(), DocumentError> {
        self.child_index(parent, old)?;
        for &replacement in replacements {
            if replacement != old {
                self.check_insertable(parent, replacement)?;
            }
        }
        for &replacement in replacements {
            if replacement != old {
                self.detach(replacement)?;
            }
        }
        let index = self.child_index(parent, old)?;
        let siblings = &mut self.node_mut(parent)?.children;
        siblings.splice(index..=index, replacements.iter().copied());
        for &replacement in replacements {
            self.node_mut(replacement)?.parent = Some(parent);
        }
        if !replacements.contains(&old) {
            self.node_mut(old)?.parent = None;
        }
        Ok(())
    }

    /// Detaches a node and frees it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), DocumentError> {
        self.detach(id)?;
        let subtree: Vec<NodeId> = std::iter::once(id).chain(self.descendants(id)).collect();
        for node in subtree {
            self.nodes.remove(node);
        }
        Ok(())
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Result<usize, DocumentError> {
        self.node_ref(parent)?
            .children
            .iter()
            .position(|c| *c == child)
            .ok_or(DocumentError::NotAChild { parent, child })
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<(), DocumentError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Text(existing) => {
                *existing = text.into();
                Ok(())
            }
            _ => Err(DocumentError::NotText(id)),
        }
    }

    /// Pre-order iterator over every node below `id` (excluding `id`).
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Concatenated text of every text node below `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Ok(text) = self.text(id) {
            return text.to_string();
        }
        let mut content = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.nodes.get(node).and_then(Node::as_text) {
                content.push_str(text);
            }
        }
        content
    }

    /// Collects the text-bearing leaves under a container, in document order.
    ///
    /// Subtrees rooted at `script`/`style` are skipped, as are subtrees for which
    /// `skip` returns `true`. The walk only reads the tree; callers mutate it
    /// afterwards through the returned handles.
    pub fn text_leaves_where<F>(&self, container: NodeId, skip: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        let mut leaves = Vec::new();
        let mut stack: Vec<NodeId> = self.children(container).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            match &node.kind {
                NodeKind::Text(_) => leaves.push(id),
                NodeKind::Element(element) => {
                    if RAW_TEXT_TAGS.contains(&element.tag()) || skip(element) {
                        continue;
                    }
                    stack.extend(node.children.iter().rev().copied());
                }
                _ => {}
            }
        }
        leaves
    }

    pub fn text_leaves(&self, container: NodeId) -> Vec<NodeId> {
        self.text_leaves_where(container, |_| false)
    }

    /// Every element below `scope` (inclusive) matching `predicate`, in document order.
    pub fn find_elements<F>(&self, scope: NodeId, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        std::iter::once(scope)
            .chain(self.descendants(scope))
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .and_then(Node::as_element)
                    .is_some_and(&predicate)
            })
            .collect()
    }

    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.descendants(self.root).find(|id| {
            self.nodes
                .get(*id)
                .and_then(Node::as_element)
                .is_some_and(|element| element.id() == Some(element_id))
        })
    }

    pub fn elements_by_class(&self, class: &str) -> Vec<NodeId> {
        self.find_elements(self.root, |element| element.has_class(class))
    }

    pub fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.find_elements(scope, |element| element.tag().eq_ignore_ascii_case(tag))
    }

    /// Nearest inclusive ancestor element of `id` matching `predicate`.
    pub fn closest<F>(&self, id: NodeId, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Element) -> bool,
    {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            if node.as_element().is_some_and(&predicate) {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// The `body` element, or the document root for fragments without one.
    pub fn body(&self) -> NodeId {
        self.descendants(self.root)
            .find(|id| {
                self.nodes
                    .get(*id)
                    .and_then(Node::as_element)
                    .is_some_and(|element| element.tag() == "body")
            })
            .unwrap_or(self.root)
    }

    /// Merges adjacent text nodes and drops empty ones throughout the subtree of `id`.
    pub fn normalize(&mut self, id: NodeId) -> Result<(), DocumentError> {
        self.node_ref(id)?;
        let containers: Vec<NodeId> = std::iter::once(id)
            .chain(self.descendants(id))
            .filter(|node| !self.children(*node).is_empty())
            .collect();

        for container in containers {
            let children = std::mem::take(&mut self.node_mut(container)?.children);
            let mut merged: Vec<NodeId> = Vec::with_capacity(children.len());
            let mut freed: Vec<NodeId> = Vec::new();

            for child in children {
                let Some(text) = self.nodes.get(child).and_then(Node::as_text) else {
                    merged.push(child);
                    continue;
                };
                if text.is_empty() {
                    freed.push(child);
                    continue;
                }
                let previous_text = merged
                    .last()
                    .copied()
                    .filter(|prev| self.nodes.get(*prev).is_some_and(Node::is_text));
                match previous_text {
                    Some(previous) => {
                        let text = text.to_string();
                        if let NodeKind::Text(existing) = &mut self.node_mut(previous)?.kind {
                            existing.push_str(&text);
                        }
                        freed.push(child);
                    }
                    None => merged.push(child),
                }
            }

            self.node_mut(container)?.children = merged;
            for node in freed {
                self.nodes.remove(node);
            }
        }
        Ok(())
    }
}

pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.doc.nodes.get(id) {
            self.stack.extend(node.children.iter().rev().copied());
        }
        Some(id)
    }
}
