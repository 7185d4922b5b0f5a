use super::document::Document;
use super::ids::NodeId;

/// Cursor-style construction of a [`Document`].
///
/// Elements are opened and closed like tags in a page; text, comments and
/// attributes always apply to the innermost open element.
pub struct DocumentBuilder {
    document: Document,
    open: Vec<NodeId>,
    last_opened: Option<NodeId>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    pub fn new() -> Self {
        let document = Document::new();
        let root = document.root();
        Self {
            document,
            open: vec![root],
            last_opened: None,
        }
    }

    fn current(&self) -> NodeId {
        self.open
            .last()
            .copied()
            .unwrap_or_else(|| self.document.root())
    }

    pub fn doctype(&mut self, declaration: &str) -> &mut Self {
        let node = self.document.create_doctype(declaration);
        self.document.push_fresh_child(self.current(), node);
        self
    }

    /// Opens a new element as the last child of the current one.
    pub fn open(&mut self, tag: &str) -> &mut Self {
        let node = self.document.create_element(tag);
        self.document.push_fresh_child(self.current(), node);
        self.open.push(node);
        self.last_opened = Some(node);
        self
    }

    /// Sets an attribute on the innermost open element. Ignored at the root.
    pub fn attr(&mut self, name: &str, value: &str) -> &mut Self {
        let current = self.current();
        if let Ok(element) = self.document.element_mut(current) {
            element.set_attribute(name, value);
        }
        self
    }

    pub fn text(&mut self, text: &str) -> &mut Self {
        let node = self.document.create_text(text);
        self.document.push_fresh_child(self.current(), node);
        self
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        let node = self.document.create_comment(text);
        self.document.push_fresh_child(self.current(), node);
        self
    }

    /// Closes the innermost open element. The root is never closed.
    pub fn close(&mut self) -> &mut Self {
        if self.open.len() > 1 {
            self.open.pop();
        }
        self
    }

    /// Shorthand for an element holding a single text node.
    pub fn leaf(&mut self, tag: &str, attributes: &[(&str, &str)], text: &str) -> &mut Self {
        self.open(tag);
        for (name, value) in attributes {
            self.attr(name, value);
        }
        if !text.is_empty() {
            self.text(text);
        }
        self.close()
    }

    /// Id of the most recently opened element.
    pub fn last_opened(&self) -> Option<NodeId> {
        self.last_opened
    }

    pub fn build(self) -> Document {
        self.document
    }
}
