use crate::domain::{ports::OutputWriter, report::ComparisonRun};
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use self::{html::HtmlWriter, json::JsonWriter, text::TextWriter};

pub mod html;
pub mod json;
pub mod text;

/// Register available writers - OCP: add new ones without touching main.rs
pub fn all_writers(show_unchanged: bool) -> Vec<Box<dyn OutputWriter>> {
    vec![
        Box::new(TextWriter::new(show_unchanged)),
        Box::new(JsonWriter),
        Box::new(HtmlWriter { show_unchanged }),
    ]
}

pub fn writer_for(format: &str, show_unchanged: bool) -> Option<Box<dyn OutputWriter>> {
    match format {
        "text" | "txt" => Some(Box::new(TextWriter::new(show_unchanged))),
        "json" => Some(Box::new(JsonWriter)),
        "html" => Some(Box::new(HtmlWriter { show_unchanged })),
        _ => None,
    }
}

/// Writes the run to `<dir>/<run_id>.<ext>` via the chosen writer
pub fn write_to_file(writer: &dyn OutputWriter, run: &ComparisonRun, dir: &Path) -> Result<PathBuf> {
    // Ensure the output directory exists
    fs::create_dir_all(dir)?;

    let content = writer.format(run)?;
    let path = dir.join(format!("{}.{}", run.run_id, writer.extension()));
    fs::write(&path, &content)?;
    Ok(path)
}
