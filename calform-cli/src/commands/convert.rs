use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calform_core::config::CalFormConfig;
use calform_core::file_io::{self, STDOUT_PATH};
use calform_core::{CalendarHeader, ExportFormat, Form};
use chrono::Utc;
use owo_colors::OwoColorize;

/// Upload a CSV and export it without any prompts.
pub fn run(
    config: &CalFormConfig,
    input: &Path,
    header: CalendarHeader,
    format: ExportFormat,
    output: Option<PathBuf>,
    open_after: bool,
) -> Result<()> {
    let rows = file_io::load_rows(input)
        .with_context(|| format!("Could not import {}", input.display()))?;

    let mut form = Form::new(header);
    let count = form.import_rows(rows).len();

    let contents = form
        .export(format, Utc::now())
        .with_context(|| format!("Could not export {} as {}", input.display(), format))?;

    let path = output.unwrap_or_else(|| super::default_output_path(config, format, &form.header));
    file_io::save(&path, &contents)
        .with_context(|| format!("Could not write {}", path.display()))?;

    if path.as_os_str() == STDOUT_PATH {
        return Ok(());
    }

    println!(
        "{}",
        format!("  Saved {} items to {}", count, path.display()).green()
    );

    if open_after {
        open::that(&path).with_context(|| format!("Could not open {}", path.display()))?;
    }

    Ok(())
}
