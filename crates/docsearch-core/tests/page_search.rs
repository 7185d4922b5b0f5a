use docsearch::core::io::html::HtmlFile;
use docsearch::core::io::traits::DocumentFile;
use docsearch::core::models::document::Document;
use docsearch::engine::config::{ControllerConfig, ControllerConfigBuilder, HighlightPolicy};
use docsearch::engine::controller::PageSearchController;
use docsearch::engine::events::PageEvent;
use docsearch::engine::host::{PageHost, ScrollBehavior, ScrollRequest, SimulatedViewport};
use docsearch::engine::progress::ProgressReporter;
use docsearch::workflows::session::{self, ClickTarget, Script, ScriptStep};

const MANUAL: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>mlp-train manual</title>
<style>.section { padding: 1em; }</style>
</head>
<body>
<header><input type="text" id="search-input" placeholder="Search..."></header>
<nav class="sidebar">
<ul>
<li><a href="#section-0">Alpha potential</a></li>
<li><a href="#section-1">Beta training</a></li>
<li><a href="#section-2">Gamma</a></li>
</ul>
</nav>
<main>
<div class="section" id="section-0"><h2>Section 0</h2><p>alpha potential</p></div>
<div class="section" id="section-1"><h2>Section 1</h2><p>beta training</p></div>
<div class="section" id="section-2"><h2>Section 2</h2><p>gamma alpha beta</p></div>
<div class="section" id="section-3"><h2>Section 3</h2><p>Literal a.b here, <code>aXb</code> there.</p></div>
</main>
<a href="#missing-id">Broken</a>
<a href="#">Top</a>
<script>document.addEventListener('DOMContentLoaded', function() { alpha(); });</script>
</body>
</html>
"##;

fn load() -> Document {
    HtmlFile::read_from_str(MANUAL).unwrap()
}

fn controller(host: SimulatedViewport) -> PageSearchController<SimulatedViewport> {
    PageSearchController::initialize(load(), host, ControllerConfig::default()).unwrap()
}

fn visibility(controller: &PageSearchController<SimulatedViewport>) -> Vec<bool> {
    controller
        .snapshot()
        .sections
        .iter()
        .map(|section| section.visible)
        .collect()
}

fn section_html(controller: &PageSearchController<SimulatedViewport>, id: &str) -> String {
    let doc = controller.document();
    let section = doc.element_by_id(id).unwrap();
    let mut fragment = Document::new();
    let copy = copy_subtree(doc, section, &mut fragment);
    let root = fragment.root();
    fragment.append_child(root, copy).unwrap();
    HtmlFile::write_to_string(&fragment).unwrap()
}

fn copy_subtree(
    from: &Document,
    node: docsearch::core::models::ids::NodeId,
    into: &mut Document,
) -> docsearch::core::models::ids::NodeId {
    use docsearch::core::models::node::NodeKind;
    let copy = match &from.node(node).unwrap().kind {
        NodeKind::Element(element) => {
            let id = into.create_element(element.tag());
            for attribute in element.attributes() {
                into.element_mut(id)
                    .unwrap()
                    .set_attribute(&attribute.name, attribute.value.as_str());
            }
            id
        }
        NodeKind::Text(text) => into.create_text(text.as_str()),
        NodeKind::Comment(text) => into.create_comment(text.as_str()),
        NodeKind::Doctype(text) => into.create_doctype(text.as_str()),
        NodeKind::Document => into.create_element("div"),
    };
    for &child in from.children(node) {
        let child_copy = copy_subtree(from, child, into);
        into.append_child(copy, child_copy).unwrap();
    }
    copy
}

#[test]
fn search_shows_exactly_the_sections_containing_the_query() {
    let mut controller = controller(SimulatedViewport::new());

    controller.search("alpha").unwrap();

    assert_eq!(visibility(&controller), vec![true, false, true, false]);
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.sections[0].markers, 1);
    assert_eq!(snapshot.sections[2].markers, 1);
    assert_eq!(snapshot.sections[1].markers, 0);
}

#[test]
fn visibility_follows_case_insensitive_containment_for_many_queries() {
    let mut controller = controller(SimulatedViewport::new());

    for query in ["ALPHA", "Beta", "section", "tion 2", "potential", "zzz", "a.b", "X"] {
        controller.search(query).unwrap();
        let folded = query.to_lowercase();
        let expected: Vec<bool> = controller
            .sections()
            .into_iter()
            .map(|section| {
                controller
                    .document()
                    .text_content(section)
                    .to_lowercase()
                    .contains(&folded)
            })
            .collect();
        assert_eq!(visibility(&controller), expected, "query {:?}", query);
    }
}

#[test]
fn query_metacharacters_are_plain_text() {
    let mut controller = controller(SimulatedViewport::new());

    controller.search("a.b").unwrap();

    assert_eq!(visibility(&controller), vec![false, false, false, true]);
    assert_eq!(controller.snapshot().sections[3].markers, 1);
    assert!(section_html(&controller, "section-3").contains("<code>aXb</code>"));
}

#[test]
fn clearing_restores_the_exact_section_markup() {
    let mut controller = controller(SimulatedViewport::new());
    let before = section_html(&controller, "section-2");

    controller.search("a").unwrap();
    controller.search("beta").unwrap();
    controller.clear_search().unwrap();

    let after = section_html(&controller, "section-2");
    assert_eq!(
        after,
        before.replace(
            "<div class=\"section\" id=\"section-2\">",
            "<div class=\"section\" id=\"section-2\" style=\"display: block;\">"
        )
    );
}

#[test]
fn clear_then_empty_search_yield_identical_state() {
    let mut cleared = controller(SimulatedViewport::new());
    cleared.search("gamma").unwrap();
    cleared.clear_search().unwrap();

    let mut emptied = controller(SimulatedViewport::new());
    emptied.search("gamma").unwrap();
    emptied.search("").unwrap();

    assert_eq!(cleared.snapshot(), emptied.snapshot());
    assert_eq!(
        HtmlFile::write_to_string(cleared.document()).unwrap(),
        HtmlFile::write_to_string(emptied.document()).unwrap()
    );
    assert!(cleared.snapshot().sections.iter().all(|s| s.visible && s.markers == 0));
}

#[test]
fn successive_queries_never_nest_markers() {
    let mut controller = controller(SimulatedViewport::new());

    for query in ["alpha", "alp", "alpha", "a"] {
        controller.search(query).unwrap();
    }

    let html = HtmlFile::write_to_string(controller.document()).unwrap();
    assert!(!html.contains("<mark class=\"search-match\"><mark"));
    assert!(!html.contains("search-match\">a</mark></mark>"));
}

#[test]
fn retained_markers_still_never_nest() {
    let config = ControllerConfigBuilder::new()
        .highlight_policy(HighlightPolicy::Retain)
        .build()
        .unwrap();
    let mut controller =
        PageSearchController::initialize(load(), SimulatedViewport::new(), config).unwrap();

    controller.search("alpha").unwrap();
    controller.search("alpha").unwrap();
    controller.search("lph").unwrap();

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.sections[0].markers, 1);
    assert_eq!(snapshot.sections[2].markers, 1);
}

#[test]
fn script_text_is_never_highlighted() {
    let mut controller = controller(SimulatedViewport::new());
    controller.search("alpha").unwrap();

    let html = HtmlFile::write_to_string(controller.document()).unwrap();
    assert!(html.contains("function() { alpha(); }"));
}

#[test]
fn fragment_marks_only_the_matching_link_active() {
    let controller = controller(SimulatedViewport::new().with_fragment("#section-1"));

    let active: Vec<String> = controller
        .navigation_links()
        .into_iter()
        .filter_map(|link| {
            let element = controller.document().element(link).unwrap();
            element
                .has_class("active")
                .then(|| element.href().unwrap_or_default().to_string())
        })
        .collect();
    assert_eq!(active, vec!["#section-1".to_string()]);
}

#[test]
fn empty_fragment_falls_back_to_the_first_section_link() {
    let controller = controller(SimulatedViewport::new());
    assert_eq!(controller.snapshot().active_link.as_deref(), Some("#section-0"));

    let page = "<nav class=\"sidebar\"><a href=\"#section-1\">one</a></nav>";
    let without_default = PageSearchController::initialize(
        HtmlFile::read_from_str(page).unwrap(),
        SimulatedViewport::new(),
        ControllerConfig::default(),
    )
    .unwrap();
    assert!(without_default.snapshot().active_link.is_none());
}

#[test]
fn back_to_top_follows_the_scroll_offset() {
    let mut controller = controller(SimulatedViewport::new());
    assert!(!controller.is_back_to_top_shown());

    controller.host_mut().set_scroll_offset(301.0);
    controller.dispatch(PageEvent::Scroll).unwrap();
    assert!(controller.is_back_to_top_shown());

    controller.host_mut().set_scroll_offset(0.0);
    controller.dispatch(PageEvent::Scroll).unwrap();
    assert!(!controller.is_back_to_top_shown());

    controller.host_mut().set_scroll_offset(1200.0);
    controller.dispatch(PageEvent::Scroll).unwrap();
    let button = controller.back_to_top();
    controller.dispatch(PageEvent::Click { target: button }).unwrap();
    assert_eq!(
        controller.host().last_request(),
        Some(&ScrollRequest::ToOffset {
            top: 0.0,
            behavior: ScrollBehavior::Smooth
        })
    );
    assert_eq!(controller.host().scroll_offset(), 0.0);
}

#[test]
fn missing_anchor_target_prevents_navigation_without_error() {
    let mut controller = controller(SimulatedViewport::new());
    let broken = controller
        .document()
        .find_elements(controller.document().root(), |e| {
            e.href() == Some("#missing-id")
        })[0];

    let outcome = controller.dispatch(PageEvent::Click { target: broken }).unwrap();

    assert!(outcome.default_prevented);
    assert!(controller.host().requests().is_empty());
    assert_eq!(controller.host().fragment(), "");
}

#[test]
fn bare_fragment_link_keeps_its_default_action() {
    let mut controller = controller(SimulatedViewport::new());
    let top = controller
        .document()
        .find_elements(controller.document().root(), |e| e.href() == Some("#"))[0];

    let outcome = controller.dispatch(PageEvent::Click { target: top }).unwrap();

    assert!(!outcome.default_prevented);
    assert!(controller.host().requests().is_empty());
}

#[test]
fn page_round_trips_through_the_controller_and_back() {
    let mut controller = controller(SimulatedViewport::new());
    controller.search("beta").unwrap();
    let written = HtmlFile::write_to_string(controller.document()).unwrap();

    let reloaded = HtmlFile::read_from_str(&written).unwrap();
    let controller = PageSearchController::initialize(
        reloaded,
        SimulatedViewport::new(),
        ControllerConfig::default(),
    )
    .unwrap();
    let snapshot = controller.snapshot();

    assert_eq!(
        snapshot.sections.iter().map(|s| s.visible).collect::<Vec<_>>(),
        vec![false, true, true, false]
    );
    assert_eq!(snapshot.total_markers(), 2);
}

#[test]
fn replay_script_drives_the_full_page() {
    let script: Script = toml::from_str(
        r##"
        [[steps]]
        action = "type"
        text = "gamma"

        [[steps]]
        action = "scroll"
        offset = 500.0

        [[steps]]
        action = "click"
        target = { kind = "link", href = "#section-2" }

        [[steps]]
        action = "navigate"
        fragment = "#section-2"
        "##,
    )
    .unwrap();
    let host = SimulatedViewport::new().with_layout("section-2", 1400.0);
    let config = ControllerConfigBuilder::new()
        .track_fragment_changes(true)
        .build()
        .unwrap();

    let outcome = session::run(load(), host, config, &script, &ProgressReporter::new()).unwrap();

    assert_eq!(outcome.snapshot.visible_sections().count(), 1);
    assert_eq!(outcome.snapshot.scroll_offset, 1400.0);
    assert!(outcome.snapshot.back_to_top_shown);
    assert_eq!(outcome.snapshot.active_link.as_deref(), Some("#section-2"));
    assert!(outcome.steps[2].default_prevented);
    assert_eq!(
        outcome.steps[3].step,
        ScriptStep::Navigate {
            fragment: "#section-2".to_string()
        }
    );
    assert!(!matches!(
        outcome.steps[2].step,
        ScriptStep::Click {
            target: ClickTarget::BackToTop
        }
    ));
}

#[test]
fn character_references_are_searched_as_the_characters_they_name() {
    let page = concat!(
        "<div class=\"section\" id=\"section-0\"><p>Energy &le; 1 &eacute;V &lambda;</p></div>",
        "<div class=\"section\" id=\"section-1\"><p>plain text</p></div>"
    );
    let mut controller = PageSearchController::initialize(
        HtmlFile::read_from_str(page).unwrap(),
        SimulatedViewport::new(),
        ControllerConfig::default(),
    )
    .unwrap();

    controller.search("\u{2264}").unwrap();
    assert_eq!(visibility(&controller), vec![true, false]);
    assert_eq!(controller.snapshot().sections[0].markers, 1);

    controller.search("\u{c9}V").unwrap();
    assert_eq!(visibility(&controller), vec![true, false]);

    controller.search("le;").unwrap();
    assert_eq!(visibility(&controller), vec![false, false]);

    controller.clear_search().unwrap();
    let html = HtmlFile::write_to_string(controller.document()).unwrap();
    assert!(html.contains("Energy \u{2264} 1 \u{e9}V \u{3bb}"));
    assert!(!html.contains("&amp;le;"));
}
