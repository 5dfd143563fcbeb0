use std::path::Path;

use anyhow::{Context, Result};
use calform_core::csv::header_row;
use calform_core::file_io::{self, STDOUT_PATH};
use owo_colors::OwoColorize;

/// Write a CSV with only the header row, ready to be filled in and uploaded.
pub fn run(output: Option<&Path>) -> Result<()> {
    let path = output.unwrap_or(Path::new(STDOUT_PATH));
    let contents = format!("{}\r\n", header_row());

    file_io::save(path, &contents)
        .with_context(|| format!("Could not write {}", path.display()))?;

    if path.as_os_str() != STDOUT_PATH {
        println!("{}", format!("  Wrote template to {}", path.display()).green());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calform_core::csv::parse_csv;

    #[test]
    fn template_has_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.csv");
        run(Some(&path)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("Type,Summary,Start,End,"));
        assert!(contents.ends_with("End Condition,End Value\r\n"));
        assert!(parse_csv(&contents).unwrap().is_empty());
    }
}
