//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, builder::Builder, settings::Style};

use qmc_core::grid::display_value;
use qmc_core::{NodeRole, Row};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Node role text, colored by health when `color` is set.
pub fn paint_role(role: Option<NodeRole>, text: &str, color: bool) -> String {
    if !color {
        return text.to_owned();
    }
    match role {
        Some(NodeRole::Master) => text.green().bold().to_string(),
        Some(NodeRole::Replica) => text.cyan().to_string(),
        Some(NodeRole::Waiting) => text.yellow().to_string(),
        Some(NodeRole::Detached | NodeRole::Unreachable) => text.red().to_string(),
        Some(NodeRole::Unknown) | None => text.dimmed().to_string(),
    }
}

/// Section heading for multi-part table output.
pub fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().underline().to_string()
    } else {
        text.to_owned()
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
        structured => render_structured(structured, data),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted string.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Plain => Ok(id_fn(data)),
        structured => render_structured(structured, data),
    }
}

/// Render untyped grid rows with the given `(header, key)` columns.
pub fn render_rows(
    format: &OutputFormat,
    rows: &[Row],
    columns: &[(&str, &str)],
    id_key: &str,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(rows_table(rows, columns)),
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|row| display_value(row.get(id_key)))
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_structured(structured, rows),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Table of grid rows; cells render through `display_value`.
pub fn rows_table(rows: &[Row], columns: &[(&str, &str)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|(header, _)| (*header).to_owned()));
    for row in rows {
        builder.push_record(columns.iter().map(|(_, key)| display_value(row.get(*key))));
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Two-column key/value table for detail views.
pub fn detail_table<'a>(pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut builder = Builder::default();
    for (key, value) in pairs {
        builder.push_record([key.to_owned(), value]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_structured<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(|e| CliError::Render(e.to_string())),
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string())),
        _ => serde_json::to_string_pretty(data).map_err(|e| CliError::Render(e.to_string())),
    }
}
