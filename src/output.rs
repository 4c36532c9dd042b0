//! Rendering of result rows to a CSV file or the console.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::PaperRow;

/// Errors raised while writing results
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("cannot write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("cannot write CSV to {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("console output failed: {0}")]
    Console(#[from] io::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Console rendering used when no output file is given
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `column: value` line per row
    #[default]
    Plain,
    /// Boxed table
    Table,
    /// One JSON object per line
    Json,
}

/// Write rows as CSV (header first, `\n` line endings) into any writer
pub fn write_csv_to<W: Write>(rows: &[PaperRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(PaperRow::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write rows to `path` as CSV, replacing any existing file
pub fn write_csv(rows: &[PaperRow], path: &Path) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    write_csv_to(rows, file).map_err(|source| OutputError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// One line per row listing every column
pub fn render_plain(rows: &[PaperRow]) -> String {
    rows.iter()
        .map(|row| {
            PaperRow::HEADERS
                .iter()
                .zip(row.fields())
                .map(|(header, value)| format!("{}: {}", header, value))
                .collect::<Vec<_>>()
                .join(" | ")
        })
        .map(|line| line + "\n")
        .collect()
}

/// Rows as a boxed table
pub fn render_table(rows: &[PaperRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(PaperRow::HEADERS);

    for row in rows {
        table.add_row(row.fields());
    }

    table.to_string()
}

/// One JSON object per line
pub fn render_json(rows: &[PaperRow]) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&serde_json::to_string(row)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write rows to `out` in the given console format
pub fn print_rows<W: Write>(
    rows: &[PaperRow],
    format: OutputFormat,
    out: &mut W,
) -> Result<(), OutputError> {
    let rendered = match format {
        OutputFormat::Table => {
            if rows.is_empty() {
                String::new()
            } else {
                render_table(rows) + "\n"
            }
        }
        OutputFormat::Json => render_json(rows)?,
        OutputFormat::Plain => render_plain(rows),
    };

    out.write_all(rendered.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Send rows to `destination` as CSV, or to stdout when there is none
pub fn emit(
    rows: &[PaperRow],
    destination: Option<&Path>,
    format: OutputFormat,
) -> Result<(), OutputError> {
    match destination {
        Some(path) => write_csv(rows, path),
        None => print_rows(rows, format, &mut io::stdout().lock()),
    }
}
