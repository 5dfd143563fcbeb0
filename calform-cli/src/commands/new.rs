use std::path::{Path, PathBuf};

use anyhow::Result;
use calform_core::config::CalFormConfig;
use calform_core::file_io::{self, STDOUT_PATH};
use calform_core::{CalFormError, CalendarHeader, ExportFormat, Field, Form, ItemKind};
use chrono::Utc;
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;

use crate::prompt;
use crate::render::{ItemLine, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Add(ItemKind),
    EditHeader,
    Edit,
    Remove,
    Import,
    Export,
    Quit,
}

impl Action {
    fn label(&self) -> String {
        match self {
            Action::Add(kind) => format!("Add {}", kind.label()),
            Action::EditHeader => "Edit calendar name and time zone".to_string(),
            Action::Edit => "Edit an item".to_string(),
            Action::Remove => "Remove an item".to_string(),
            Action::Import => "Import a CSV file".to_string(),
            Action::Export => "Export".to_string(),
            Action::Quit => "Quit".to_string(),
        }
    }
}

/// Menu entries that make sense for the current form.
fn available_actions(form: &Form) -> Vec<Action> {
    let mut actions: Vec<Action> = ItemKind::ALL.iter().map(|k| Action::Add(*k)).collect();
    if !form.items().is_empty() {
        actions.extend([Action::Edit, Action::Remove, Action::Export]);
    }
    actions.extend([Action::Import, Action::EditHeader, Action::Quit]);
    actions
}

struct Session<'a> {
    config: &'a CalFormConfig,
    form: Form,
    /// Changed since the last successful export
    dirty: bool,
}

pub fn run(config: &CalFormConfig, header: CalendarHeader, from_csv: Option<&Path>) -> Result<()> {
    let header = prompt::header_form(&header)?;
    let mut session = Session {
        config,
        form: Form::new(header),
        dirty: false,
    };

    if let Some(path) = from_csv {
        session.import_csv(path);
    }

    loop {
        println!();
        println!("{}", session.form.render());
        println!();

        let actions = available_actions(&session.form);
        let labels: Vec<String> = actions.iter().map(Action::label).collect();
        let choice = Select::new()
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        match actions[choice] {
            Action::Add(kind) => session.add(kind)?,
            Action::EditHeader => {
                session.form.header = prompt::header_form(&session.form.header)?;
                session.dirty = true;
            }
            Action::Edit => session.edit()?,
            Action::Remove => session.remove()?,
            Action::Import => {
                let path: String = Input::new()
                    .with_prompt("CSV file to import")
                    .interact_text()?;
                session.import_csv(Path::new(path.trim()));
            }
            Action::Export => session.export()?,
            Action::Quit => {
                if session.confirm_quit()? {
                    break;
                }
            }
        }
    }

    Ok(())
}

impl Session<'_> {
    fn add(&mut self, kind: ItemKind) -> Result<()> {
        let index = self.form.add_item(kind);
        if let Some(minutes) = self.config.default_alarm_minutes {
            if kind != ItemKind::Journal {
                self.form.set_field(index, Field::Alarm, minutes.to_string())?;
            }
        }

        let fields = prompt::item_form(self.form.fields(index)?)?;
        self.form.replace_fields(index, fields)?;
        self.dirty = true;

        println!("{}", format!("  Added item [{index}]").green());
        Ok(())
    }

    fn edit(&mut self) -> Result<()> {
        let index = self.pick_item("Edit which item?")?;
        let fields = prompt::item_form(self.form.fields(index)?)?;
        self.form.replace_fields(index, fields)?;
        self.dirty = true;
        Ok(())
    }

    fn remove(&mut self) -> Result<()> {
        let index = self.pick_item("Remove which item?")?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove item [{index}]?"))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }

        let removed = self.form.remove_item(index)?;
        self.dirty = true;
        println!("{}", format!("  Removed: {}", removed.summary).yellow());
        Ok(())
    }

    fn pick_item(&self, prompt: &str) -> Result<usize> {
        let entries: Vec<(usize, String)> = self
            .form
            .items()
            .iter()
            .map(|(index, _, fields)| (index, ItemLine { index, fields }.render()))
            .collect();
        let labels: Vec<&str> = entries.iter().map(|(_, label)| label.as_str()).collect();

        let selection = Select::new()
            .with_prompt(prompt)
            .items(&labels)
            .default(0)
            .interact()?;

        Ok(entries[selection].0)
    }

    /// Import problems are reported and the session carries on.
    fn import_csv(&mut self, path: &Path) {
        match file_io::load_rows(path) {
            Ok(rows) => {
                let count = self.form.import_rows(rows).len();
                if count > 0 {
                    self.dirty = true;
                }
                println!(
                    "{}",
                    format!("  Imported {} items from {}", count, path.display()).green()
                );
            }
            Err(e @ CalFormError::IcsImportUnsupported) => {
                println!("  {}", e.to_string().yellow());
            }
            Err(e) => {
                eprintln!(
                    "  {}",
                    format!("Could not import {}: {}", path.display(), e).red()
                );
            }
        }
    }

    fn export(&mut self) -> Result<()> {
        let default_format = ExportFormat::ALL
            .iter()
            .position(|f| *f == self.config.default_format)
            .unwrap_or(0);
        let labels: Vec<String> = ExportFormat::ALL
            .iter()
            .map(|f| format!("{} (.{})", f, f.extension()))
            .collect();
        let selection = Select::new()
            .with_prompt("Format")
            .items(&labels)
            .default(default_format)
            .interact()?;
        let format = ExportFormat::ALL[selection];

        let contents = match self.form.export(format, Utc::now()) {
            Ok(contents) => contents,
            Err(e) => {
                eprintln!("  {}", format!("Export failed: {e}").red());
                return Ok(());
            }
        };

        let default_path = super::default_output_path(self.config, format, &self.form.header);
        let path: String = Input::new()
            .with_prompt("Save to (- for stdout)")
            .with_initial_text(default_path.display().to_string())
            .interact_text()?;
        let path = PathBuf::from(path.trim());

        if let Err(e) = file_io::save(&path, &contents) {
            eprintln!(
                "  {}",
                format!("Could not write {}: {}", path.display(), e).red()
            );
            return Ok(());
        }
        self.dirty = false;

        if path.as_os_str() == STDOUT_PATH {
            return Ok(());
        }
        println!("{}", format!("  Saved to {}", path.display()).green());

        let open_now = Confirm::new()
            .with_prompt("Open it now?")
            .default(false)
            .interact()?;
        if open_now {
            if let Err(e) = open::that(&path) {
                eprintln!(
                    "  {}",
                    format!("Could not open {}: {}", path.display(), e).red()
                );
            }
        }

        Ok(())
    }

    fn confirm_quit(&self) -> Result<bool> {
        if !self.dirty || self.form.items().is_empty() {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt("Quit without exporting? Items are not kept between sessions")
            .default(false)
            .interact()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_form_offers_only_adding_and_importing() {
        let actions = available_actions(&Form::default());
        assert_eq!(
            actions,
            vec![
                Action::Add(ItemKind::Event),
                Action::Add(ItemKind::Todo),
                Action::Add(ItemKind::Journal),
                Action::Import,
                Action::EditHeader,
                Action::Quit,
            ]
        );
    }

    #[test]
    fn items_unlock_edit_remove_and_export() {
        let mut form = Form::default();
        let index = form.add_item(ItemKind::Todo);
        let actions = available_actions(&form);
        assert!(actions.contains(&Action::Edit));
        assert!(actions.contains(&Action::Remove));
        assert!(actions.contains(&Action::Export));

        form.remove_item(index).unwrap();
        assert!(!available_actions(&form).contains(&Action::Export));
    }

    #[test]
    fn action_labels_name_the_kind() {
        assert_eq!(Action::Add(ItemKind::Journal).label(), "Add journal entry");
        assert_eq!(Action::Add(ItemKind::Todo).label(), "Add todo");
    }

    #[test]
    fn import_notice_for_ics_keeps_session_going() {
        let dir = tempfile::tempdir().unwrap();
        let ics = dir.path().join("calendar.ics");
        std::fs::write(&ics, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();
        let csv = dir.path().join("items.csv");
        std::fs::write(&csv, "VEVENT,Swim,2025-07-01T07:00\n").unwrap();

        let config = CalFormConfig::default();
        let mut session = Session {
            config: &config,
            form: Form::default(),
            dirty: false,
        };

        session.import_csv(&ics);
        assert!(session.form.items().is_empty());
        assert!(!session.dirty);

        session.import_csv(&csv);
        assert_eq!(session.form.items().len(), 1);
        assert!(session.dirty);
    }
}
