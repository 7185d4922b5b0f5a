use crate::core::models::document::Document;
use crate::core::models::ids::NodeId;
use crate::engine::config::ControllerConfig;
use crate::engine::controller::PageSearchController;
use crate::engine::error::EngineError;
use crate::engine::events::{EventOutcome, PageEvent};
use crate::engine::host::SimulatedViewport;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::PageSnapshot;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Something the user clicks on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ClickTarget {
    /// The element with this `id`.
    Element { id: String },
    /// The first anchor in the page with exactly this `href`.
    Link { href: String },
    /// The generated back-to-top button.
    BackToTop,
}

impl fmt::Display for ClickTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClickTarget::Element { id } => write!(f, "element '#{}'", id),
            ClickTarget::Link { href } => write!(f, "link '{}'", href),
            ClickTarget::BackToTop => write!(f, "back-to-top button"),
        }
    }
}

/// One user interaction in a replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum ScriptStep {
    /// Sets the search field to `text`.
    Type { text: String },
    /// Empties the search field.
    Clear,
    /// Scrolls the page to a vertical offset.
    Scroll { offset: f64 },
    Click { target: ClickTarget },
    /// Changes the location fragment without reloading.
    Navigate { fragment: String },
}

impl fmt::Display for ScriptStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStep::Type { text } => write!(f, "type \"{}\"", text),
            ScriptStep::Clear => write!(f, "clear search"),
            ScriptStep::Scroll { offset } => write!(f, "scroll to {}", offset),
            ScriptStep::Click { target } => write!(f, "click {}", target),
            ScriptStep::Navigate { fragment } => write!(f, "navigate to '{}'", fragment),
        }
    }
}

/// A replay script as stored on disk: an ordered list of `[[steps]]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<ScriptStep>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Step {step}: could not find {target} in the page")]
    UnresolvedTarget { step: usize, target: ClickTarget },

    #[error("Step {step}: {reason}")]
    InvalidStep { step: usize, reason: String },

    #[error("Controller error: {source}")]
    Engine {
        #[from]
        source: EngineError,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub index: usize,
    pub step: ScriptStep,
    pub default_prevented: bool,
    /// Scroll requests the controller issued while handling this step.
    pub scroll_requests: usize,
}

#[derive(Debug)]
pub struct SessionOutcome {
    pub snapshot: PageSnapshot,
    pub steps: Vec<StepRecord>,
    pub controller: PageSearchController<SimulatedViewport>,
}

impl SessionOutcome {
    /// The page as left by the interaction, ready to be written out.
    pub fn into_document(self) -> Document {
        self.controller.into_parts().0
    }
}

#[instrument(skip_all, name = "replay_workflow")]
pub fn run(
    document: Document,
    host: SimulatedViewport,
    config: ControllerConfig,
    script: &Script,
    reporter: &ProgressReporter,
) -> Result<SessionOutcome, SessionError> {
    reporter.report(Progress::ReplayStart {
        total_steps: script.steps.len() as u64,
    });
    info!("Initializing controller for replay of {} step(s).", script.steps.len());

    let mut controller = PageSearchController::initialize(document, host, config)?;
    let mut records = Vec::with_capacity(script.steps.len());

    for (index, step) in script.steps.iter().enumerate() {
        reporter.report(Progress::StepStart {
            index,
            description: step.to_string(),
        });
        let requests_before = controller.host().requests().len();

        let outcome = apply_step(&mut controller, index, step)?;

        let scroll_requests = controller.host().requests().len() - requests_before;
        if outcome.default_prevented {
            reporter.report(Progress::Message(format!(
                "Step {}: default navigation prevented",
                index + 1
            )));
        }
        debug!(
            step = index,
            action = %step,
            default_prevented = outcome.default_prevented,
            scroll_requests,
            "Step applied."
        );
        records.push(StepRecord {
            index,
            step: step.clone(),
            default_prevented: outcome.default_prevented,
            scroll_requests,
        });
        reporter.report(Progress::StepFinish { index });
    }

    let snapshot = controller.snapshot();
    reporter.report(Progress::ReplayFinish);
    info!(
        "Replay complete. {} of {} section(s) visible.",
        snapshot.visible_sections().count(),
        snapshot.sections.len()
    );

    Ok(SessionOutcome {
        snapshot,
        steps: records,
        controller,
    })
}

fn apply_step(
    controller: &mut PageSearchController<SimulatedViewport>,
    index: usize,
    step: &ScriptStep,
) -> Result<EventOutcome, SessionError> {
    let outcome = match step {
        ScriptStep::Type { text } => controller.dispatch(PageEvent::Input {
            value: text.clone(),
        })?,
        ScriptStep::Clear => controller.dispatch(PageEvent::Input {
            value: String::new(),
        })?,
        ScriptStep::Scroll { offset } => {
            if !offset.is_finite() {
                return Err(SessionError::InvalidStep {
                    step: index,
                    reason: format!("scroll offset must be finite, got {}", offset),
                });
            }
            controller.host_mut().set_scroll_offset(*offset);
            controller.dispatch(PageEvent::Scroll)?
        }
        ScriptStep::Click { target } => {
            let node = resolve_target(controller, target).ok_or_else(|| {
                SessionError::UnresolvedTarget {
                    step: index,
                    target: target.clone(),
                }
            })?;
            controller.dispatch(PageEvent::Click { target: node })?
        }
        ScriptStep::Navigate { fragment } => {
            if !fragment.is_empty() && !fragment.starts_with('#') {
                return Err(SessionError::InvalidStep {
                    step: index,
                    reason: format!("fragment '{}' must start with '#'", fragment),
                });
            }
            controller.host_mut().set_fragment(fragment.as_str());
            controller.dispatch(PageEvent::FragmentChange)?
        }
    };
    Ok(outcome)
}

fn resolve_target(
    controller: &PageSearchController<SimulatedViewport>,
    target: &ClickTarget,
) -> Option<NodeId> {
    let doc = controller.document();
    match target {
        ClickTarget::Element { id } => doc.element_by_id(id),
        ClickTarget::Link { href } => doc
            .find_elements(doc.root(), |element| {
                element.tag() == "a" && element.href() == Some(href.as_str())
            })
            .into_iter()
            .next(),
        ClickTarget::BackToTop => Some(controller.back_to_top()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::html::HtmlFile;
    use crate::core::io::traits::DocumentFile;
    use crate::engine::host::{PageHost, ScrollRequest};
    use std::sync::{Arc, Mutex};

    const PAGE: &str = concat!(
        "<html><body>",
        "<input id=\"search-input\">",
        "<nav class=\"sidebar\"><a href=\"#section-0\">Intro</a><a href=\"#section-1\">Usage</a></nav>",
        "<div class=\"section\" id=\"section-0\"><h2>Intro</h2><p>alpha potential</p></div>",
        "<div class=\"section\" id=\"section-1\"><h2>Usage</h2><p>beta training</p></div>",
        "</body></html>"
    );

    fn page() -> Document {
        HtmlFile::read_from_str(PAGE).unwrap()
    }

    fn script(toml_text: &str) -> Script {
        toml::from_str(toml_text).unwrap()
    }

    #[test]
    fn script_steps_parse_from_toml() {
        let parsed = script(
            r##"
            [[steps]]
            action = "type"
            text = "alpha"

            [[steps]]
            action = "click"
            target = { kind = "link", href = "#section-1" }

            [[steps]]
            action = "click"
            target = { kind = "back-to-top" }

            [[steps]]
            action = "scroll"
            offset = 420.0
            "##,
        );

        assert_eq!(parsed.steps.len(), 4);
        assert_eq!(
            parsed.steps[1],
            ScriptStep::Click {
                target: ClickTarget::Link {
                    href: "#section-1".to_string()
                }
            }
        );
        assert_eq!(
            parsed.steps[2],
            ScriptStep::Click {
                target: ClickTarget::BackToTop
            }
        );
    }

    #[test]
    fn replay_applies_steps_in_order() {
        let script = Script {
            steps: vec![
                ScriptStep::Type {
                    text: "Alpha".to_string(),
                },
                ScriptStep::Scroll { offset: 640.0 },
                ScriptStep::Click {
                    target: ClickTarget::Link {
                        href: "#section-1".to_string(),
                    },
                },
            ],
        };

        let outcome = run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(outcome.snapshot.query, "alpha");
        assert_eq!(outcome.snapshot.visible_sections().count(), 1);
        assert!(outcome.snapshot.back_to_top_shown);
        assert_eq!(outcome.steps.len(), 3);
        assert!(outcome.steps[2].default_prevented);
        assert_eq!(outcome.steps[2].scroll_requests, 1);
        assert!(matches!(
            outcome.controller.host().last_request(),
            Some(ScrollRequest::IntoView { element_id, .. }) if element_id == "section-1"
        ));
    }

    #[test]
    fn clear_step_restores_every_section() {
        let script = Script {
            steps: vec![
                ScriptStep::Type {
                    text: "beta".to_string(),
                },
                ScriptStep::Clear,
            ],
        };

        let outcome = run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(outcome.snapshot.query, "");
        assert_eq!(outcome.snapshot.visible_sections().count(), 2);
        assert_eq!(outcome.snapshot.total_markers(), 0);
    }

    #[test]
    fn back_to_top_click_returns_to_the_top() {
        let script = Script {
            steps: vec![
                ScriptStep::Scroll { offset: 900.0 },
                ScriptStep::Click {
                    target: ClickTarget::BackToTop,
                },
            ],
        };

        let outcome = run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(outcome.controller.host().scroll_offset(), 0.0);
        assert!(!outcome.snapshot.back_to_top_shown);
    }

    #[test]
    fn unresolved_click_target_is_an_error() {
        let script = Script {
            steps: vec![ScriptStep::Click {
                target: ClickTarget::Element {
                    id: "nowhere".to_string(),
                },
            }],
        };

        let result = run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &ProgressReporter::new(),
        );

        match result {
            Err(SessionError::UnresolvedTarget { step, target }) => {
                assert_eq!(step, 0);
                assert_eq!(target.to_string(), "element '#nowhere'");
            }
            other => panic!("expected unresolved target, got {:?}", other),
        }
    }

    #[test]
    fn malformed_navigation_fragment_is_rejected() {
        let script = Script {
            steps: vec![ScriptStep::Navigate {
                fragment: "section-1".to_string(),
            }],
        };

        let result = run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &ProgressReporter::new(),
        );

        assert!(matches!(result, Err(SessionError::InvalidStep { step: 0, .. })));
    }

    #[test]
    fn progress_is_reported_for_every_step() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));
        let script = Script {
            steps: vec![ScriptStep::Clear, ScriptStep::Scroll { offset: 10.0 }],
        };

        run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &reporter,
        )
        .unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(events[0], Progress::ReplayStart { total_steps: 2 }));
        let finished = events
            .iter()
            .filter(|event| matches!(event, Progress::StepFinish { .. }))
            .count();
        assert_eq!(finished, 2);
        assert!(matches!(events.last(), Some(Progress::ReplayFinish)));
    }

    #[test]
    fn replayed_page_can_be_written_back() {
        let script = Script {
            steps: vec![ScriptStep::Type {
                text: "alpha".to_string(),
            }],
        };

        let outcome = run(
            page(),
            SimulatedViewport::new(),
            ControllerConfig::default(),
            &script,
            &ProgressReporter::new(),
        )
        .unwrap();
        let html = HtmlFile::write_to_string(&outcome.into_document()).unwrap();

        assert!(html.contains("<mark class=\"search-match\">alpha</mark>"));
        assert!(html.contains("style=\"display: none;\""));
        assert!(html.contains("<button class=\"back-to-top\" aria-label=\"Back to top\">"));
    }
}
