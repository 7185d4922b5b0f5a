use crate::cli::ReplayArgs;
use crate::config::builder::{CommandOverrides, build_config};
use crate::error::{CliError, Result};
use crate::report;
use crate::utils::{parser, progress::CliProgressHandler};
use docsearch::{
    core::io::{html::HtmlFile, traits::DocumentFile},
    engine::{host::SimulatedViewport, progress::ProgressReporter},
    workflows::session::{self, Script},
};
use std::path::Path;
use tracing::{debug, info, warn};

pub fn run(args: ReplayArgs) -> Result<()> {
    let config = build_config(
        &args.input,
        args.output.as_deref(),
        &args.config,
        CommandOverrides {
            track_fragment_changes: args.track_fragment_changes,
        },
    )?;

    info!("Loading interaction script from {:?}", &args.script);
    let script = load_script(&args.script)?;
    if script.steps.is_empty() {
        warn!("Script contains no steps; only the initial page state will be reported.");
    }

    info!("Loading page from {:?}", &config.input_path);
    let document =
        HtmlFile::read_from_path(&config.input_path).map_err(|e| CliError::FileParsing {
            path: config.input_path.clone(),
            source: e.into(),
        })?;

    let host = build_viewport(&args)?;
    debug!("Simulated viewport: {:?}", host);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Replaying {} step(s)...", script.steps.len());
    let outcome = session::run(document, host, config.controller, &script, &reporter)?;

    for record in &outcome.steps {
        info!(
            "Step {}: {}{}{}",
            record.index + 1,
            record.step,
            if record.default_prevented {
                " (default prevented)"
            } else {
                ""
            },
            if record.scroll_requests > 0 {
                format!(", {} scroll request(s)", record.scroll_requests)
            } else {
                String::new()
            }
        );
    }

    report::emit(&outcome.snapshot, args.format, None)?;

    if let Some(output_path) = &config.output_path {
        let document = outcome.into_document();
        HtmlFile::write_to_path(&document, output_path).map_err(|e| CliError::FileParsing {
            path: output_path.clone(),
            source: e.into(),
        })?;
        println!("Final page written to: {}", output_path.display());
    }

    Ok(())
}

fn load_script(path: &Path) -> Result<Script> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

fn build_viewport(args: &ReplayArgs) -> Result<SimulatedViewport> {
    let mut host = SimulatedViewport::new();

    if let Some(fragment) = &args.fragment {
        let fragment =
            parser::parse_fragment(fragment).map_err(|e| CliError::Argument(e.to_string()))?;
        host = host.with_fragment(fragment);
    }

    if let Some(offset) = args.scroll_offset {
        if !offset.is_finite() || offset < 0.0 {
            return Err(CliError::Argument(format!(
                "Scroll offset must be a non-negative number, got {}",
                offset
            )));
        }
        host = host.with_scroll_offset(offset);
    }

    for entry in &args.layout {
        let (id, top) =
            parser::parse_assignment(entry).map_err(|e| CliError::Argument(e.to_string()))?;
        let top = parser::parse_offset(top)
            .map_err(|e| CliError::Argument(format!("--layout {}: {}", id, e)))?;
        host = host.with_layout(id, top);
    }

    Ok(host)
}
