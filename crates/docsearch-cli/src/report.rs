use crate::cli::ReportFormat;
use crate::error::{CliError, Result};
use docsearch::engine::state::{PageSnapshot, SectionState};
use serde::Serialize;
use std::fmt::{self, Write};
use std::path::Path;

/// Renders a page snapshot in the requested format.
pub fn render(snapshot: &PageSnapshot, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => render_text(snapshot),
        ReportFormat::Csv => render_csv(snapshot),
        ReportFormat::Toml => Ok(toml::to_string(snapshot)?),
    }
}

/// Writes the report to `path`, or to stdout when no path is given.
pub fn emit(snapshot: &PageSnapshot, format: ReportFormat, path: Option<&Path>) -> Result<()> {
    let report = render(snapshot, format)?;
    match path {
        Some(path) => std::fs::write(path, report)?,
        None => print!("{}", report),
    }
    Ok(())
}

fn render_text(snapshot: &PageSnapshot) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, snapshot).map_err(|e| CliError::Other(e.into()))?;
    Ok(out)
}

fn write_text(out: &mut impl Write, snapshot: &PageSnapshot) -> fmt::Result {
    let query = if snapshot.query.is_empty() {
        "(none)"
    } else {
        snapshot.query.as_str()
    };
    let back_to_top = if snapshot.back_to_top_shown {
        "shown"
    } else {
        "hidden"
    };

    writeln!(out, "Query:        {}", query)?;
    writeln!(
        out,
        "Sections:     {} of {} visible, {} marker(s)",
        snapshot.visible_sections().count(),
        snapshot.sections.len(),
        snapshot.total_markers()
    )?;
    writeln!(
        out,
        "Active link:  {}",
        snapshot.active_link.as_deref().unwrap_or("(none)")
    )?;
    writeln!(
        out,
        "Back to top:  {} (offset {})",
        back_to_top, snapshot.scroll_offset
    )?;

    if !snapshot.sections.is_empty() {
        writeln!(out)?;
    }
    for section in &snapshot.sections {
        writeln!(
            out,
            "  {} {:<16} {:>3} marker(s)  {}",
            if section.visible { "+" } else { "-" },
            section.id.as_deref().unwrap_or("-"),
            section.markers,
            section.title.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

/// One CSV record per section. Every column is always present so that rows
/// stay aligned with the header.
#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct SectionRow<'a> {
    index: usize,
    id: Option<&'a str>,
    title: Option<&'a str>,
    text_length: usize,
    visible: bool,
    markers: usize,
}

impl<'a> From<&'a SectionState> for SectionRow<'a> {
    fn from(section: &'a SectionState) -> Self {
        Self {
            index: section.index,
            id: section.id.as_deref(),
            title: section.title.as_deref(),
            text_length: section.text_length,
            visible: section.visible,
            markers: section.markers,
        }
    }
}

fn render_csv(snapshot: &PageSnapshot) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for section in &snapshot.sections {
        writer.serialize(SectionRow::from(section))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CliError::Other(e.into()))
}
