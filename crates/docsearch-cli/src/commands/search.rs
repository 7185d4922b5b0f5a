use crate::cli::SearchArgs;
use crate::config::builder::{CommandOverrides, build_config};
use crate::error::{CliError, Result};
use crate::report;
use docsearch::{
    core::io::{html::HtmlFile, traits::DocumentFile},
    engine::{controller::PageSearchController, host::SimulatedViewport},
};
use tracing::{debug, info, warn};

pub fn run(args: SearchArgs) -> Result<()> {
    let config = build_config(
        &args.input,
        args.output.as_deref(),
        &args.config,
        CommandOverrides::default(),
    )?;

    info!("Loading page from {:?}", &config.input_path);
    let document =
        HtmlFile::read_from_path(&config.input_path).map_err(|e| CliError::FileParsing {
            path: config.input_path.clone(),
            source: e.into(),
        })?;
    debug!("Page parsed into {} node(s).", document.len());

    let mut controller =
        PageSearchController::initialize(document, SimulatedViewport::new(), config.controller)?;
    if controller.search_input().is_none() {
        warn!(
            "Page has no element with id '{}'; searching it anyway.",
            controller.config().search_input_id
        );
    }
    if controller.sections().is_empty() {
        warn!(
            "Page has no elements with class '{}'; nothing can be filtered.",
            controller.config().section_class
        );
    }

    let summary = controller.search(&args.query)?;
    if summary.is_cleared() {
        info!("Empty query; every section is shown and no highlights remain.");
    } else {
        info!(
            "Query {:?} matched {} of {} section(s) with {} highlight(s).",
            summary.query,
            summary.visible.len(),
            summary.visible.len() + summary.hidden.len(),
            summary.markers_inserted
        );
    }

    report::emit(&controller.snapshot(), args.format, args.report.as_deref())?;
    if let Some(path) = &args.report {
        println!("Section report written to: {}", path.display());
    }

    if let Some(output_path) = &config.output_path {
        let (document, _) = controller.into_parts();
        HtmlFile::write_to_path(&document, output_path).map_err(|e| CliError::FileParsing {
            path: output_path.clone(),
            source: e.into(),
        })?;
        println!("Highlighted page written to: {}", output_path.display());
    }

    Ok(())
}
