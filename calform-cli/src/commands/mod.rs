pub mod config;
pub mod convert;
pub mod new;
pub mod template;

use std::path::PathBuf;

use calform_core::config::CalFormConfig;
use calform_core::file_io::default_file_name;
use calform_core::{CalendarHeader, ExportFormat};

/// Header for a new form: flags first, then config, then the system zone.
pub fn resolve_header(
    config: &CalFormConfig,
    name: Option<String>,
    tz: Option<String>,
) -> CalendarHeader {
    CalendarHeader {
        name: name
            .or_else(|| config.calendar_name.clone())
            .unwrap_or_default(),
        time_zone: tz
            .or_else(|| config.time_zone.clone())
            .unwrap_or_else(system_time_zone),
    }
}

pub fn system_time_zone() -> String {
    match iana_time_zone::get_timezone() {
        Ok(tz) => tz,
        Err(e) => {
            tracing::warn!(error = %e, "could not detect the system time zone, using UTC");
            "UTC".to_string()
        }
    }
}

/// Where an export goes when no path was given
pub fn default_output_path(
    config: &CalFormConfig,
    format: ExportFormat,
    header: &CalendarHeader,
) -> PathBuf {
    config.output_dir().join(default_file_name(format, header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_win_over_config() {
        let config = CalFormConfig {
            calendar_name: Some("Config".to_string()),
            time_zone: Some("Asia/Tokyo".to_string()),
            ..Default::default()
        };

        let header = resolve_header(&config, Some("Flag".into()), Some("UTC".into()));
        assert_eq!(header.name, "Flag");
        assert_eq!(header.time_zone, "UTC");

        let header = resolve_header(&config, None, None);
        assert_eq!(header.name, "Config");
        assert_eq!(header.time_zone, "Asia/Tokyo");
    }

    #[test]
    fn default_output_path_uses_output_dir_and_slug() {
        let config = CalFormConfig {
            output_dir: PathBuf::from("/tmp/exports"),
            ..Default::default()
        };
        let header = CalendarHeader {
            name: "Book Club".to_string(),
            time_zone: String::new(),
        };
        assert_eq!(
            default_output_path(&config, ExportFormat::Json, &header),
            PathBuf::from("/tmp/exports/book-club.json")
        );
    }
}
