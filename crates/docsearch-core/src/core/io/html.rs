use super::entities::{self, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
use crate::core::io::traits::DocumentFile;
use crate::core::models::document::Document;
use crate::core::models::ids::NodeId;
use crate::core::models::node::NodeKind;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: HtmlParseErrorKind,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HtmlParseErrorKind {
    #[error("Comment is never closed with '-->'")]
    UnterminatedComment,
    #[error("Markup declaration is never closed with '>'")]
    UnterminatedDeclaration,
    #[error("Tag '<{0}' is never closed with '>'")]
    UnterminatedTag(String),
    #[error("Quoted value of attribute '{0}' is never closed")]
    UnterminatedAttribute(String),
}

/// Reader and writer for rendered HTML pages.
///
/// The reader is deliberately tolerant: it does not implement the full HTML
/// tree-construction algorithm, only what is needed for generated pages.
/// Unmatched end tags are ignored, end tags close every element opened after
/// their match, and elements still open at the end of input are closed.
pub struct HtmlFile;

impl DocumentFile for HtmlFile {
    type Error = HtmlError;

    fn read_from(reader: &mut impl BufRead) -> Result<Document, Self::Error> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        HtmlReader::new(&source).run()
    }

    fn write_to(document: &Document, writer: &mut impl Write) -> Result<(), Self::Error> {
        for &child in document.children(document.root()) {
            write_node(document, child, writer, false)?;
        }
        Ok(())
    }
}

struct HtmlReader<'a> {
    src: &'a str,
    pos: usize,
    doc: Document,
    open: Vec<NodeId>,
}

impl<'a> HtmlReader<'a> {
    fn new(src: &'a str) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            src,
            pos: 0,
            doc,
            open: vec![root],
        }
    }

    fn error(&self, at: usize, kind: HtmlParseErrorKind) -> HtmlError {
        let line = self.src[..at].matches('\n').count() + 1;
        HtmlError::Parse { line, kind }
    }

    fn unterminated_tag(&self, at: usize, name: &str) -> HtmlError {
        self.error(at, HtmlParseErrorKind::UnterminatedTag(name.to_string()))
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn run(mut self) -> Result<Document, HtmlError> {
        let src = self.src;
        while self.pos < src.len() {
            let rest = &src[self.pos..];
            let next = rest.chars().nth(1);
            if rest.starts_with("<!--") {
                self.read_comment()?;
            } else if rest.starts_with("<!") {
                self.read_declaration()?;
            } else if rest.starts_with("</") && rest[2..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.read_end_tag()?;
            } else if rest.starts_with('<') && next.is_some_and(|c| c.is_ascii_alphabetic()) {
                self.read_start_tag()?;
            } else {
                self.read_text();
            }
        }
        Ok(self.doc)
    }

    fn read_comment(&mut self) -> Result<(), HtmlError> {
        let body_start = self.pos + 4;
        let end = self.src[body_start..]
            .find("-->")
            .ok_or_else(|| self.error(self.pos, HtmlParseErrorKind::UnterminatedComment))?;
        let comment = self.doc.create_comment(&self.src[body_start..body_start + end]);
        self.doc.push_fresh_child(self.current(), comment);
        self.pos = body_start + end + 3;
        Ok(())
    }

    fn read_declaration(&mut self) -> Result<(), HtmlError> {
        let body_start = self.pos + 2;
        let end = self.src[body_start..]
            .find('>')
            .ok_or_else(|| self.error(self.pos, HtmlParseErrorKind::UnterminatedDeclaration))?;
        let body = &self.src[body_start..body_start + end];
        let node = match body.get(..7) {
            Some(keyword) if keyword.eq_ignore_ascii_case("doctype") => {
                self.doc.create_doctype(body[7..].trim())
            }
            _ => self.doc.create_comment(body),
        };
        self.doc.push_fresh_child(self.current(), node);
        self.pos = body_start + end + 1;
        Ok(())
    }

    fn read_end_tag(&mut self) -> Result<(), HtmlError> {
        let start = self.pos;
        let end = self.src[start..].find('>').ok_or_else(|| {
            self.error(
                start,
                HtmlParseErrorKind::UnterminatedTag(format!("/{}", tag_name_at(self.src, start + 2))),
            )
        })?;
        let name = tag_name_at(self.src, start + 2).to_ascii_lowercase();
        self.close_element(&name);
        self.pos = start + end + 1;
        Ok(())
    }

    fn close_element(&mut self, name: &str) {
        let matching = self.open.iter().skip(1).rposition(|id| {
            self.doc
                .element(*id)
                .is_ok_and(|element| element.tag() == name)
        });
        if let Some(index) = matching {
            self.open.truncate(index + 1);
        }
    }

    fn read_start_tag(&mut self) -> Result<(), HtmlError> {
        let src = self.src;
        let tag_start = self.pos;
        let name = tag_name_at(src, tag_start + 1).to_ascii_lowercase();

        let element = self.doc.create_element(&name);
        let mut i = tag_start + 1 + name.len();
        let mut self_closing = false;

        loop {
            i = skip_whitespace(src, i);
            let rest = &src[i..];
            if rest.is_empty() {
                return Err(self.unterminated_tag(tag_start, &name));
            }
            if rest.starts_with("/>") {
                self_closing = true;
                i += 2;
                break;
            }
            if rest.starts_with('>') {
                i += 1;
                break;
            }
            if rest.starts_with('/') {
                i += 1;
                continue;
            }

            let attr_len = rest
                .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
                .unwrap_or(rest.len());
            let attr_len = attr_len.max(rest.chars().next().map_or(1, char::len_utf8));
            let attr_name = rest[..attr_len].to_ascii_lowercase();
            i = skip_whitespace(src, i + attr_len);

            let mut value = String::new();
            if src[i..].starts_with('=') {
                i = skip_whitespace(src, i + 1);
                let rest = &src[i..];
                match rest.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let close = rest[1..].find(quote).ok_or_else(|| {
                            self.error(
                                tag_start,
                                HtmlParseErrorKind::UnterminatedAttribute(attr_name.clone()),
                            )
                        })?;
                        value = entities::decode(&rest[1..1 + close]);
                        i += close + 2;
                    }
                    Some(_) => {
                        let len = rest
                            .find(|c: char| c.is_whitespace() || c == '>')
                            .unwrap_or(rest.len());
                        value = entities::decode(&rest[..len]);
                        i += len;
                    }
                    None => return Err(self.unterminated_tag(tag_start, &name)),
                }
            }

            if let Ok(el) = self.doc.element_mut(element) {
                if el.attribute(&attr_name).is_none() {
                    el.set_attribute(&attr_name, value);
                }
            }
        }

        self.doc.push_fresh_child(self.current(), element);
        self.pos = i;

        if VOID_ELEMENTS.contains(name.as_str()) || self_closing {
            return Ok(());
        }
        if RAW_TEXT_ELEMENTS.contains(name.as_str()) {
            self.read_raw_text(element, &name);
            return Ok(());
        }
        self.open.push(element);
        Ok(())
    }

    /// Consumes everything up to `</name ...>` as a single undecoded text node.
    fn read_raw_text(&mut self, element: NodeId, name: &str) {
        let src = self.src;
        let closing = format!("</{}", name);
        let rest = &src[self.pos..];
        let content_len = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());
        if content_len > 0 {
            let text = self.doc.create_text(&rest[..content_len]);
            self.doc.push_fresh_child(element, text);
        }
        let after = self.pos + content_len;
        self.pos = match src[after..].find('>') {
            Some(gt) if content_len < rest.len() => after + gt + 1,
            _ => src.len(),
        };
    }

    fn read_text(&mut self) {
        let src = self.src;
        let rest = &src[self.pos..];
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let len = rest[first..].find('<').map_or(rest.len(), |p| p + first);
        let decoded = entities::decode(&rest[..len]);
        self.pos += len;

        let current = self.current();
        let previous = self.doc.children(current).last().copied();
        if let Some(previous) = previous {
            if let Ok(existing) = self.doc.text(previous) {
                let merged = format!("{}{}", existing, decoded);
                if self.doc.set_text(previous, merged).is_ok() {
                    return;
                }
            }
        }
        let text = self.doc.create_text(decoded);
        self.doc.push_fresh_child(current, text);
    }
}

fn tag_name_at(src: &str, start: usize) -> &str {
    let rest = &src[start..];
    let len = rest
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    &rest[..len]
}

fn skip_whitespace(src: &str, from: usize) -> usize {
    let rest = &src[from..];
    from + (rest.len() - rest.trim_start().len())
}

fn write_node(
    doc: &Document,
    id: NodeId,
    out: &mut impl Write,
    raw_text: bool,
) -> io::Result<()> {
    let Some(node) = doc.node(id) else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Document => {
            for &child in node.children() {
                write_node(doc, child, out, false)?;
            }
        }
        NodeKind::Doctype(declaration) => write!(out, "<!DOCTYPE {}>", declaration)?,
        NodeKind::Comment(comment) => write!(out, "<!--{}-->", comment)?,
        NodeKind::Text(text) if raw_text => out.write_all(text.as_bytes())?,
        NodeKind::Text(text) => out.write_all(entities::escape_text(text).as_bytes())?,
        NodeKind::Element(element) => {
            write!(out, "<{}", element.tag())?;
            for attr in element.attributes() {
                if attr.value.is_empty() {
                    write!(out, " {}", attr.name)?;
                } else {
                    write!(
                        out,
                        " {}=\"{}\"",
                        attr.name,
                        entities::escape_attribute(&attr.value)
                    )?;
                }
            }
            out.write_all(b">")?;
            if VOID_ELEMENTS.contains(element.tag()) {
                return Ok(());
            }
            let raw = RAW_TEXT_ELEMENTS.contains(element.tag());
            for &child in node.children() {
                write_node(doc, child, out, raw)?;
            }
            write!(out, "</{}>", element.tag())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANUAL_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>mlp-train manual</title>
    <style>.section > p { color: #333; }</style>
</head>
<body>
    <div class="search-box"><input type="text" id="search-input" placeholder="Search..."></div>
    <nav class="sidebar">
        <ul>
            <li><a href="#section-0">Installation</a></li>
            <li><a href="#section-1">Active learning</a></li>
        </ul>
    </nav>
    <!-- generated content -->
    <section id="section-0" class="section"><h1>Installation</h1><p>Use <code>pip</code> &amp; conda.</p></section>
    <section id="section-1" class="section"><h1>Active learning</h1><p>Train with 5 &lt; n &gt; 2.</p></section>
    <script>if (a < b && c > d) { scroll(); }</script>
</body>
</html>"##;

    fn parse(src: &str) -> Document {
        HtmlFile::read_from_str(src).unwrap()
    }

    #[test]
    fn reads_manual_page_structure() {
        let doc = parse(MANUAL_PAGE);

        let sections = doc.elements_by_class("section");
        assert_eq!(sections.len(), 2);
        assert_eq!(doc.text_content(sections[0]), "InstallationUse pip & conda.");
        assert_eq!(doc.text_content(sections[1]), "Active learningTrain with 5 < n > 2.");

        let input = doc.element_by_id("search-input").unwrap();
        assert_eq!(doc.element(input).unwrap().attribute("placeholder"), Some("Search..."));
        assert!(doc.children(input).is_empty());

        let sidebar = doc.elements_by_class("sidebar")[0];
        assert_eq!(doc.elements_by_tag(sidebar, "a").len(), 2);
        assert_eq!(doc.element(doc.body()).unwrap().tag(), "body");
    }

    #[test]
    fn round_trips_a_canonical_page_byte_for_byte() {
        let doc = parse(MANUAL_PAGE);
        let written = HtmlFile::write_to_string(&doc).unwrap();
        assert_eq!(written, MANUAL_PAGE);
    }

    #[test]
    fn script_content_is_raw_text() {
        let doc = parse(MANUAL_PAGE);
        let script = doc.elements_by_tag(doc.root(), "script")[0];
        assert_eq!(
            doc.text_content(script),
            "if (a < b && c > d) { scroll(); }"
        );
    }

    #[test]
    fn attributes_accept_single_unquoted_and_boolean_forms() {
        let doc = parse("<input id=q type='text' disabled value=\"a &quot;b&quot;\">");
        let input = doc.element_by_id("q").unwrap();
        let element = doc.element(input).unwrap();
        assert_eq!(element.attribute("type"), Some("text"));
        assert_eq!(element.attribute("disabled"), Some(""));
        assert_eq!(element.attribute("value"), Some("a \"b\""));
    }

    #[test]
    fn duplicate_attributes_keep_the_first_value() {
        let doc = parse("<p id=\"a\" id=\"b\">x</p>");
        assert!(doc.element_by_id("a").is_some());
        assert!(doc.element_by_id("b").is_none());
    }

    #[test]
    fn self_closing_syntax_does_not_open_an_element() {
        let doc = parse("<div><span/>after</div>");
        let div = doc.elements_by_tag(doc.root(), "div")[0];
        let span = doc.elements_by_tag(doc.root(), "span")[0];
        assert!(doc.children(span).is_empty());
        assert_eq!(doc.children(div).len(), 2);
    }

    #[test]
    fn stray_and_mismatched_end_tags_are_tolerated() {
        let doc = parse("<div><p>one</span>two</div>three</p>");
        let div = doc.elements_by_tag(doc.root(), "div")[0];
        assert_eq!(doc.text_content(div), "onetwo");
        assert_eq!(doc.parent(div), Some(doc.root()));
        let last = *doc.children(doc.root()).last().unwrap();
        assert_eq!(doc.text(last).unwrap(), "three");
    }

    #[test]
    fn unclosed_elements_are_closed_at_end_of_input() {
        let doc = parse("<section class=\"section\"><p>dangling");
        let section = doc.elements_by_class("section")[0];
        assert_eq!(doc.text_content(section), "dangling");
    }

    #[test]
    fn lone_angle_brackets_are_text() {
        let doc = parse("<p>a < b and 3<4</p>");
        let p = doc.elements_by_tag(doc.root(), "p")[0];
        assert_eq!(doc.children(p).len(), 1);
        assert_eq!(doc.text_content(p), "a < b and 3<4");
    }

    #[test]
    fn unterminated_comment_reports_its_line() {
        let err = HtmlFile::read_from_str("<p>x</p>\n<!-- open").unwrap_err();
        match err {
            HtmlError::Parse { line, kind } => {
                assert_eq!(line, 2);
                assert_eq!(kind, HtmlParseErrorKind::UnterminatedComment);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unterminated_tag_and_attribute_are_errors() {
        assert!(matches!(
            HtmlFile::read_from_str("<p class=\"x"),
            Err(HtmlError::Parse {
                kind: HtmlParseErrorKind::UnterminatedAttribute(_),
                ..
            })
        ));
        assert!(matches!(
            HtmlFile::read_from_str("<p class"),
            Err(HtmlError::Parse {
                kind: HtmlParseErrorKind::UnterminatedTag(_),
                ..
            })
        ));
    }

    #[test]
    fn writer_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let p = doc.create_element("p");
        doc.element_mut(p).unwrap().set_attribute("title", "a \"q\" & b");
        doc.append_child(doc.root(), p).unwrap();
        let text = doc.create_text("x < y & z");
        doc.append_child(p, text).unwrap();

        let written = HtmlFile::write_to_string(&doc).unwrap();
        assert_eq!(
            written,
            "<p title=\"a &quot;q&quot; &amp; b\">x &lt; y &amp; z</p>"
        );
    }

    #[test]
    fn named_references_decode_and_write_back_without_double_escaping() {
        let doc = parse("<p>Energy &le; 1 &eacute;V &lambda; &amp; more</p>");
        let p = doc.elements_by_tag(doc.root(), "p")[0];
        assert_eq!(doc.text_content(p), "Energy \u{2264} 1 \u{e9}V \u{3bb} & more");

        let written = HtmlFile::write_to_string(&doc).unwrap();
        assert_eq!(written, "<p>Energy \u{2264} 1 \u{e9}V \u{3bb} &amp; more</p>");

        let reread = parse(&written);
        let p = reread.elements_by_tag(reread.root(), "p")[0];
        assert_eq!(reread.text_content(p), "Energy \u{2264} 1 \u{e9}V \u{3bb} & more");
    }

    #[test]
    fn read_and_write_through_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, MANUAL_PAGE).unwrap();

        let doc = HtmlFile::read_from_path(&path).unwrap();
        let out = dir.path().join("out.html");
        HtmlFile::write_to_path(&doc, &out).unwrap();

        assert_eq!(std::fs::read_to_string(out).unwrap(), MANUAL_PAGE);
    }
}
