use crate::cli::{ConfigArgs, InspectArgs};
use crate::config::builder::{CommandOverrides, build_controller_config};
use crate::error::{CliError, Result};
use docsearch::{
    core::io::{html::HtmlFile, traits::DocumentFile},
    core::models::document::Document,
    engine::{controller::PageSearchController, host::SimulatedViewport},
};
use tracing::{info, warn};

/// What `inspect` found on a page.
#[derive(Debug, Default, PartialEq)]
pub struct PageInventory {
    pub has_search_input: bool,
    /// `(id, title)` for every section, in document order.
    pub sections: Vec<(Option<String>, Option<String>)>,
    /// `(href, is_active)` for every navigation link.
    pub links: Vec<(String, bool)>,
    /// Same-page `href`s whose target id does not exist.
    pub broken_anchors: Vec<String>,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let config_args = ConfigArgs {
        config: args.config.clone(),
        ..ConfigArgs::default()
    };
    let config = build_controller_config(&config_args, CommandOverrides::default())?;

    info!("Loading page from {:?}", &args.input);
    let document = HtmlFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
        path: args.input.clone(),
        source: e.into(),
    })?;

    let controller = PageSearchController::initialize(document, SimulatedViewport::new(), config)?;
    let inventory = take_inventory(&controller);

    println!(
        "Search input: {}",
        if inventory.has_search_input {
            "present"
        } else {
            "missing"
        }
    );
    println!("Sections ({}):", inventory.sections.len());
    for (id, title) in &inventory.sections {
        println!(
            "  {:<16} {}",
            id.as_deref().unwrap_or("-"),
            title.as_deref().unwrap_or("")
        );
    }
    println!("Navigation links ({}):", inventory.links.len());
    for (href, active) in &inventory.links {
        println!("  {} {}", if *active { "*" } else { " " }, href);
    }

    if inventory.broken_anchors.is_empty() {
        info!("Every same-page anchor resolves to an element.");
    } else {
        for href in &inventory.broken_anchors {
            warn!("Anchor '{}' has no target in the page.", href);
        }
        println!(
            "Warning: {} anchor(s) point at missing targets.",
            inventory.broken_anchors.len()
        );
    }

    Ok(())
}

fn take_inventory(controller: &PageSearchController<SimulatedViewport>) -> PageInventory {
    let document = controller.document();
    let active = controller.active_link();

    let sections = controller
        .snapshot()
        .sections
        .into_iter()
        .map(|section| (section.id, section.title))
        .collect();

    let links = controller
        .navigation_links()
        .into_iter()
        .filter_map(|link| {
            let href = document.element(link).ok()?.href()?.to_string();
            Some((href, Some(link) == active))
        })
        .collect();

    PageInventory {
        has_search_input: controller.search_input().is_some(),
        sections,
        links,
        broken_anchors: broken_anchors(document),
    }
}

fn broken_anchors(document: &Document) -> Vec<String> {
    let mut broken = Vec::new();
    for anchor in document.elements_by_tag(document.root(), "a") {
        let Some(href) = document.element(anchor).ok().and_then(|e| e.href()) else {
            continue;
        };
        let Some(name) = href.strip_prefix('#') else {
            continue;
        };
        let is_broken = !name.is_empty() && document.element_by_id(name).is_none();
        if is_broken && !broken.iter().any(|seen| seen == href) {
            broken.push(href.to_string());
        }
    }
    broken
}
