use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use docsearch::engine::config::{ControllerConfig, ControllerConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Command-line switches that are specific to one subcommand.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandOverrides {
    pub track_fragment_changes: bool,
}

pub fn build_config(
    input: &Path,
    output: Option<&Path>,
    args: &ConfigArgs,
    overrides: CommandOverrides,
) -> Result<AppConfig> {
    Ok(AppConfig {
        input_path: input.to_path_buf(),
        output_path: output.map(PathBuf::from),
        controller: build_controller_config(args, overrides)?,
    })
}

/// Merges command-line flags, `--set` values, the configuration file and the
/// defaults, in that order of precedence.
pub fn build_controller_config(
    args: &ConfigArgs,
    overrides: CommandOverrides,
) -> Result<ControllerConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, &args.set_values)?;

    let page = file_config.page.unwrap_or_default();
    let search = file_config.search.unwrap_or_default();
    let back_to_top = file_config.back_to_top.unwrap_or_default();

    let highlight_policy = args
        .highlight_policy
        .map(Into::into)
        .or(search.highlight_policy)
        .unwrap_or(defaults.highlight_policy);
    let back_to_top_threshold = args
        .back_to_top_threshold
        .or(back_to_top.threshold)
        .unwrap_or(defaults.back_to_top_threshold);
    let track_fragment_changes = overrides.track_fragment_changes
        || page
            .track_fragment_changes
            .unwrap_or(defaults.track_fragment_changes);

    let config = ControllerConfigBuilder::new()
        .search_input_id(page.search_input_id.unwrap_or(defaults.search_input_id))
        .section_class(page.section_class.unwrap_or(defaults.section_class))
        .sidebar_class(page.sidebar_class.unwrap_or(defaults.sidebar_class))
        .default_fragment(page.default_fragment.unwrap_or(defaults.default_fragment))
        .track_fragment_changes(track_fragment_changes)
        .marker_class(search.marker_class.unwrap_or(defaults.marker_class))
        .highlight_policy(highlight_policy)
        .back_to_top_threshold(back_to_top_threshold)
        .back_to_top_label(back_to_top.label.unwrap_or(defaults.back_to_top_label))
        .back_to_top_glyph(back_to_top.glyph.unwrap_or(defaults.back_to_top_glyph))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    debug!("Resolved controller configuration: {:?}", config);
    Ok(config)
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for assignment in set_values {
        let (key, value) =
            parser::parse_assignment(assignment).map_err(|e| CliError::Config(e.to_string()))?;
        let invalid = |e: parser::ParseError| CliError::Config(format!("{}: {}", key, e));

        match key {
            "page.search-input-id" => {
                config.page.get_or_insert_with(Default::default).search_input_id =
                    Some(value.to_string());
            }
            "page.section-class" => {
                config.page.get_or_insert_with(Default::default).section_class =
                    Some(value.to_string());
            }
            "page.sidebar-class" => {
                config.page.get_or_insert_with(Default::default).sidebar_class =
                    Some(value.to_string());
            }
            "page.default-fragment" => {
                config.page.get_or_insert_with(Default::default).default_fragment =
                    Some(parser::parse_fragment(value).map_err(invalid)?);
            }
            "page.track-fragment-changes" => {
                config
                    .page
                    .get_or_insert_with(Default::default)
                    .track_fragment_changes = Some(parser::parse_bool(value).map_err(invalid)?);
            }
            "search.marker-class" => {
                config.search.get_or_insert_with(Default::default).marker_class =
                    Some(value.to_string());
            }
            "search.highlight-policy" => {
                config
                    .search
                    .get_or_insert_with(Default::default)
                    .highlight_policy = Some(parser::parse_policy(value).map_err(invalid)?);
            }
            "back-to-top.threshold" => {
                config.back_to_top.get_or_insert_with(Default::default).threshold =
                    Some(parser::parse_offset(value).map_err(invalid)?);
            }
            "back-to-top.label" => {
                config.back_to_top.get_or_insert_with(Default::default).label =
                    Some(value.to_string());
            }
            "back-to-top.glyph" => {
                config.back_to_top.get_or_insert_with(Default::default).glyph =
                    Some(value.to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
