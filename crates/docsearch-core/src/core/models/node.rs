use super::ids::NodeId;

/// The payload carried by a node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The single root of a document.
    Document,
    /// A `<!DOCTYPE ...>` declaration; the string is everything after `DOCTYPE`.
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

/// A node stored in the document arena.
///
/// Parent and child links are kept as [`NodeId`] keys; the owning
/// [`Document`](super::document::Document) is responsible for keeping both
/// directions consistent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match &mut self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }
}

/// An HTML element: a lower-case tag name and its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
            .map(|attr| attr.value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place so that source
    /// order is kept stable for serialisation.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|attr| attr.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self
            .attributes
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))?;
        Some(self.attributes.remove(index).value)
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn href(&self) -> Option<&str> {
        self.attribute("href")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class")
            .unwrap_or("")
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Adds a class token. Returns `false` if the token was already present.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        let joined = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attribute("class", joined);
        true
    }

    /// Removes every occurrence of a class token. Returns `false` if it was absent.
    pub fn remove_class(&mut self, class: &str) -> bool {
        if !self.has_class(class) {
            return false;
        }
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = remaining.join(" ");
        self.set_attribute("class", joined);
        true
    }

    /// Reads a single declaration from the inline `style` attribute.
    pub fn style_property(&self, property: &str) -> Option<String> {
        parse_style(self.attribute("style")?)
            .into_iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value)
    }

    /// Writes a single declaration into the inline `style` attribute, leaving
    /// every other declaration untouched.
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut declarations = self.attribute("style").map(parse_style).unwrap_or_default();
        declarations.retain(|(name, _)| !name.eq_ignore_ascii_case(property));
        declarations.push((property.to_ascii_lowercase(), value.to_string()));
        let style = declarations
            .iter()
            .map(|(name, value)| format!("{}: {};", name, value))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute("style", style);
    }

    /// Whether the inline style hides the element (`display: none`).
    pub fn is_display_none(&self) -> bool {
        self.style_property("display")
            .is_some_and(|value| value.eq_ignore_ascii_case("none"))
    }
}

fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_are_lowercased() {
        assert_eq!(Element::new("SECTION").tag(), "section");
    }

    #[test]
    fn set_attribute_replaces_existing_value_in_place() {
        let mut element = Element::new("a");
        element.set_attribute("href", "#a");
        element.set_attribute("id", "x");
        element.set_attribute("HREF", "#b");

        assert_eq!(element.href(), Some("#b"));
        assert_eq!(element.attributes()[0].name, "href");
        assert_eq!(element.attributes().len(), 2);
    }

    #[test]
    fn add_and_remove_class_keep_other_tokens() {
        let mut element = Element::new("a");
        element.set_attribute("class", "nav  link");

        assert!(element.add_class("active"));
        assert!(!element.add_class("active"));
        assert_eq!(element.attribute("class"), Some("nav  link active"));

        assert!(element.remove_class("active"));
        assert!(!element.remove_class("active"));
        assert_eq!(element.attribute("class"), Some("nav link"));
        assert!(element.has_class("nav"));
    }

    #[test]
    fn set_style_property_preserves_other_declarations() {
        let mut element = Element::new("section");
        element.set_attribute("style", "color: red; display:none");

        element.set_style_property("display", "block");

        assert_eq!(element.style_property("color").as_deref(), Some("red"));
        assert_eq!(element.style_property("display").as_deref(), Some("block"));
        assert!(!element.is_display_none());
        assert_eq!(element.attribute("style"), Some("color: red; display: block;"));
    }

    #[test]
    fn display_none_is_detected_case_insensitively() {
        let mut element = Element::new("div");
        element.set_attribute("style", "DISPLAY: None");
        assert!(element.is_display_none());
    }

    #[test]
    fn missing_style_reports_no_property() {
        let element = Element::new("div");
        assert_eq!(element.style_property("display"), None);
        assert!(!element.is_display_none());
    }
}
