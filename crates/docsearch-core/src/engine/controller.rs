use super::config::{ControllerConfig, HighlightPolicy, is_named_fragment};
use super::error::EngineError;
use super::events::{EventOutcome, PageEvent};
use super::highlight;
use super::host::{PageHost, ScrollBehavior, ScrollBlock};
use super::navigation::{self, ACTIVE_CLASS};
use super::state::{PageSnapshot, SearchSummary, SectionState};
use crate::core::models::document::Document;
use crate::core::models::ids::NodeId;
use crate::core::utils::matching::{contains_ignore_case, fold_case};
use tracing::{debug, trace};

const BACK_TO_TOP_CLASS: &str = "back-to-top";
const SHOWN_CLASS: &str = "show";
const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Drives search filtering, highlighting, navigation state, the back-to-top
/// control and anchor scrolling for one page.
///
/// The controller owns the page and its host for its whole lifetime, so a page
/// can only ever be initialized once. Every handler takes `&mut self` and runs
/// to completion; the host delivers events one at a time through
/// [`dispatch`](Self::dispatch).
#[derive(Debug)]
pub struct PageSearchController<H: PageHost> {
    document: Document,
    host: H,
    config: ControllerConfig,
    search_input: Option<NodeId>,
    back_to_top: NodeId,
    query: String,
}

impl<H: PageHost> PageSearchController<H> {
    /// Wires the controller into the page.
    ///
    /// Records the search input if the page has one, marks the navigation link
    /// for the current fragment, appends the back-to-top button to the body and
    /// evaluates its visibility for the current scroll offset.
    pub fn initialize(
        mut document: Document,
        host: H,
        config: ControllerConfig,
    ) -> Result<Self, EngineError> {
        let search_input = document.element_by_id(&config.search_input_id);
        if search_input.is_none() {
            debug!(
                id = %config.search_input_id,
                "Page has no search input; input events will be ignored."
            );
        }

        let back_to_top = create_back_to_top(&mut document, &config)?;

        let mut controller = Self {
            document,
            host,
            config,
            search_input,
            back_to_top,
            query: String::new(),
        };
        controller.highlight_current_nav()?;
        controller.update_back_to_top()?;
        debug!(
            sections = controller.sections().len(),
            "Page search controller initialized."
        );
        Ok(controller)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The folded query currently applied; empty when no filter is active.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_input(&self) -> Option<NodeId> {
        self.search_input
    }

    pub fn back_to_top(&self) -> NodeId {
        self.back_to_top
    }

    /// Gives the page and the host back, e.g. to write the page out.
    pub fn into_parts(self) -> (Document, H) {
        (self.document, self.host)
    }

    pub fn sections(&self) -> Vec<NodeId> {
        self.document.elements_by_class(&self.config.section_class)
    }

    pub fn navigation_links(&self) -> Vec<NodeId> {
        navigation::navigation_links(&self.document, &self.config.sidebar_class)
    }

    /// Filters the sections by `raw_query` and highlights every occurrence in
    /// the sections that remain visible. An empty query clears the search.
    pub fn search(&mut self, raw_query: &str) -> Result<SearchSummary, EngineError> {
        let query = fold_case(raw_query);
        if query.is_empty() {
            return self.clear_search();
        }

        let marker_class = self.config.marker_class.clone();
        let mut summary = SearchSummary {
            query: query.clone(),
            ..SearchSummary::default()
        };

        for section in self.sections() {
            if self.config.highlight_policy == HighlightPolicy::Recompute {
                summary.markers_removed +=
                    highlight::remove_markers(&mut self.document, section, &marker_class)?;
            }

            if contains_ignore_case(&self.document.text_content(section), &query) {
                self.set_visible(section, true)?;
                summary.markers_inserted +=
                    highlight::apply_markers(&mut self.document, section, &query, &marker_class)?;
                summary.visible.push(section);
            } else {
                self.set_visible(section, false)?;
                summary.hidden.push(section);
            }
        }

        debug!(
            query = %query,
            visible = summary.visible.len(),
            hidden = summary.hidden.len(),
            markers = summary.markers_inserted,
            "Applied search."
        );
        self.query = query;
        Ok(summary)
    }

    /// Shows every section and removes every highlight marker. Idempotent.
    pub fn clear_search(&mut self) -> Result<SearchSummary, EngineError> {
        let marker_class = self.config.marker_class.clone();
        let mut summary = SearchSummary::default();

        for section in self.sections() {
            self.set_visible(section, true)?;
            summary.markers_removed +=
                highlight::remove_markers(&mut self.document, section, &marker_class)?;
            summary.visible.push(section);
        }

        debug!(
            sections = summary.visible.len(),
            markers_removed = summary.markers_removed,
            "Cleared search."
        );
        self.query.clear();
        Ok(summary)
    }

    /// Marks the navigation link for the host's current fragment as active and
    /// every other link as inactive. Returns the active link, if any.
    pub fn highlight_current_nav(&mut self) -> Result<Option<NodeId>, EngineError> {
        let links = self.navigation_links();
        let active = navigation::select_active(
            &self.document,
            &links,
            self.host.fragment(),
            &self.config.default_fragment,
        );
        navigation::apply_active(&mut self.document, &links, active)?;
        trace!(
            fragment = self.host.fragment(),
            links = links.len(),
            active = active.is_some(),
            "Updated navigation state."
        );
        Ok(active)
    }

    /// The currently active navigation link.
    pub fn active_link(&self) -> Option<NodeId> {
        self.navigation_links().into_iter().find(|link| {
            self.document
                .element(*link)
                .is_ok_and(|element| element.has_class(ACTIVE_CLASS))
        })
    }

    /// Shows the back-to-top control when the scroll offset is past the
    /// threshold and hides it otherwise. Returns whether it is shown.
    pub fn update_back_to_top(&mut self) -> Result<bool, EngineError> {
        let offset = self.host.scroll_offset();
        let shown = offset > self.config.back_to_top_threshold;
        let button = self.document.element_mut(self.back_to_top)?;
        if shown {
            button.add_class(SHOWN_CLASS);
        } else {
            button.remove_class(SHOWN_CLASS);
        }
        trace!(offset, shown, "Evaluated back-to-top visibility.");
        Ok(shown)
    }

    pub fn is_back_to_top_shown(&self) -> bool {
        self.document
            .element(self.back_to_top)
            .is_ok_and(|element| element.has_class(SHOWN_CLASS))
    }

    /// Requests a smooth scroll to the top of the page.
    pub fn scroll_to_top(&mut self) {
        debug!("Scrolling to top.");
        self.host.scroll_to(0.0, ScrollBehavior::Smooth);
    }

    /// Handles activation of a same-page link.
    ///
    /// For `#name` the default navigation is suppressed and, when an element
    /// with that id exists, a smooth scroll aligning it to the top is requested.
    /// A missing target does nothing further. The bare `#` and any other
    /// `href` are left to the host.
    pub fn smooth_scroll(&mut self, href: &str) -> EventOutcome {
        if !is_named_fragment(href) {
            return EventOutcome::proceed();
        }
        match navigation::fragment_target(&self.document, href) {
            Some(target) => {
                debug!(href, "Scrolling to anchor target.");
                self.host.scroll_into_view(
                    target,
                    &href[1..],
                    ScrollBehavior::Smooth,
                    ScrollBlock::Start,
                );
            }
            None => trace!(href, "Anchor target not found; ignoring."),
        }
        EventOutcome::prevented()
    }

    /// Single delegated entry point for every host event.
    pub fn dispatch(&mut self, event: PageEvent) -> Result<EventOutcome, EngineError> {
        trace!(?event, "Dispatching page event.");
        match event {
            PageEvent::Input { value } => {
                if self.search_input.is_some() {
                    self.search(&value)?;
                }
                Ok(EventOutcome::proceed())
            }
            PageEvent::Scroll => {
                self.update_back_to_top()?;
                Ok(EventOutcome::proceed())
            }
            PageEvent::Click { target } => self.handle_click(target),
            PageEvent::FragmentChange => {
                if self.config.track_fragment_changes {
                    self.highlight_current_nav()?;
                }
                Ok(EventOutcome::proceed())
            }
        }
    }

    fn handle_click(&mut self, target: NodeId) -> Result<EventOutcome, EngineError> {
        if !self.document.contains(target) {
            return Ok(EventOutcome::proceed());
        }
        if self.document.is_inclusive_ancestor(self.back_to_top, target) {
            self.scroll_to_top();
            self.settle_scroll()?;
            return Ok(EventOutcome::proceed());
        }
        let Some((_, href)) = navigation::same_page_anchor(&self.document, target) else {
            return Ok(EventOutcome::proceed());
        };
        let outcome = self.smooth_scroll(&href);
        self.settle_scroll()?;
        Ok(outcome)
    }

    // A host emits a scroll event once a requested scroll has moved the page.
    fn settle_scroll(&mut self) -> Result<(), EngineError> {
        let should_show = self.host.scroll_offset() > self.config.back_to_top_threshold;
        if self.is_back_to_top_shown() != should_show {
            self.update_back_to_top()?;
        }
        Ok(())
    }

    fn set_visible(&mut self, section: NodeId, visible: bool) -> Result<(), EngineError> {
        let display = if visible { "block" } else { "none" };
        self.document
            .element_mut(section)?
            .set_style_property("display", display);
        Ok(())
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let marker_class = &self.config.marker_class;
        let sections = self
            .sections()
            .into_iter()
            .enumerate()
            .map(|(index, section)| {
                let element = self.document.element(section).ok();
                SectionState {
                    index,
                    id: element.and_then(|e| e.id()).map(str::to_string),
                    title: self.section_title(section),
                    text_length: self.document.text_content(section).chars().count(),
                    visible: !element.is_some_and(|e| e.is_display_none()),
                    markers: highlight::count_markers(&self.document, section, marker_class),
                }
            })
            .collect();

        let active_link = self.active_link().and_then(|link| {
            self.document
                .element(link)
                .ok()
                .and_then(|element| element.href())
                .map(str::to_string)
        });

        PageSnapshot {
            query: self.query.clone(),
            active_link,
            back_to_top_shown: self.is_back_to_top_shown(),
            scroll_offset: self.host.scroll_offset(),
            sections,
        }
    }

    fn section_title(&self, section: NodeId) -> Option<String> {
        let heading = self.document.descendants(section).find(|id| {
            self.document
                .element(*id)
                .is_ok_and(|element| HEADING_TAGS.contains(&element.tag()))
        })?;
        let title = self.document.text_content(heading).trim().to_string();
        (!title.is_empty()).then_some(title)
    }
}

fn create_back_to_top(
    document: &mut Document,
    config: &ControllerConfig,
) -> Result<NodeId, EngineError> {
    let button = document.create_element("button");
    {
        let element = document.element_mut(button)?;
        element.set_attribute("class", BACK_TO_TOP_CLASS);
        element.set_attribute("aria-label", config.back_to_top_label.as_str());
    }
    let glyph = document.create_text(config.back_to_top_glyph.as_str());
    document.append_child(button, glyph)?;
    let body = document.body();
    document.append_child(body, button)?;
    Ok(button)
}
