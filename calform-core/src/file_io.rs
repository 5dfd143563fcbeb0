//! Writing exports to disk and reading uploaded files.

use std::io::Write;
use std::path::Path;

use crate::csv::parse_csv;
use crate::error::{CalFormError, CalFormResult};
use crate::export::ExportFormat;
use crate::fields::ItemFields;
use crate::form::CalendarHeader;

/// Path value meaning "write to standard output"
pub const STDOUT_PATH: &str = "-";

/// File name for an export: the slugified calendar name, or `calendar`.
pub fn default_file_name(format: ExportFormat, header: &CalendarHeader) -> String {
    let base = slug::slugify(header.name.trim());
    let base = if base.is_empty() { "calendar".to_string() } else { base };
    format!("{}.{}", base, format.extension())
}

/// Write serialized output, creating parent directories as needed.
pub fn save(path: &Path, contents: &str) -> CalFormResult<()> {
    if path.as_os_str() == STDOUT_PATH {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "saved export");
    Ok(())
}

/// Read an uploaded file into item fields. Only CSV uploads are supported.
pub fn load_rows(path: &Path) -> CalFormResult<Vec<ItemFields>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        None | Some("csv") => {
            let content = std::fs::read_to_string(path)?;
            parse_csv(&content)
        }
        Some("ics") | Some("ical") | Some("ifb") => Err(CalFormError::IcsImportUnsupported),
        Some(_) => Err(CalFormError::UnsupportedImport(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(name: &str) -> CalendarHeader {
        CalendarHeader {
            name: name.to_string(),
            time_zone: "UTC".to_string(),
        }
    }

    #[test]
    fn default_file_name_uses_slug() {
        assert_eq!(
            default_file_name(ExportFormat::Ics, &header("Team Offsite 2025!")),
            "team-offsite-2025.ics"
        );
        assert_eq!(default_file_name(ExportFormat::Text, &header("")), "calendar.txt");
        assert_eq!(default_file_name(ExportFormat::Json, &header("  ")), "calendar.json");
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/calendar.csv");
        save(&path, "Type\r\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Type\r\n");
    }

    #[test]
    fn load_rows_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.CSV");
        std::fs::write(&path, "VEVENT,Swim,2025-07-01T07:00\n").unwrap();
        let rows = load_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].summary, "Swim");
    }

    #[test]
    fn ics_upload_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calendar.ics");
        std::fs::write(&path, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();
        assert!(matches!(load_rows(&path), Err(CalFormError::IcsImportUnsupported)));
    }

    #[test]
    fn other_uploads_are_rejected() {
        let path = Path::new("notes.xlsx");
        assert!(matches!(load_rows(path), Err(CalFormError::UnsupportedImport(_))));
    }

    #[test]
    fn missing_csv_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        assert!(matches!(load_rows(&path), Err(CalFormError::Io(_))));
    }
}
