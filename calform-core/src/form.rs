//! The calendar form: a header plus one subform per item.

use chrono::{DateTime, Utc};

use crate::collect::collect;
use crate::error::{CalFormError, CalFormResult};
use crate::export::ExportFormat;
use crate::fields::{Field, ItemFields};
use crate::item::{CalendarItem, ItemKind};
use crate::store::ItemStore;

/// Calendar-wide settings entered once per form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarHeader {
    /// Calendar display name (X-WR-CALNAME); empty for none
    pub name: String,
    /// IANA time zone applied to every item at export; empty for floating times
    pub time_zone: String,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    pub header: CalendarHeader,
    items: ItemStore,
}

impl Form {
    pub fn new(header: CalendarHeader) -> Self {
        Form {
            header,
            items: ItemStore::new(),
        }
    }

    pub fn items(&self) -> &ItemStore {
        &self.items
    }

    /// Append a blank subform and return its index.
    pub fn add_item(&mut self, kind: ItemKind) -> usize {
        self.items.add(ItemFields::new(kind))
    }

    pub fn add_fields(&mut self, fields: ItemFields) -> usize {
        self.items.add(fields)
    }

    pub fn remove_item(&mut self, index: usize) -> CalFormResult<ItemFields> {
        self.items.remove(index).ok_or(CalFormError::NoSuchItem(index))
    }

    pub fn fields(&self, index: usize) -> CalFormResult<&ItemFields> {
        self.items.get(index).ok_or(CalFormError::NoSuchItem(index))
    }

    pub fn field(&self, index: usize, field: Field) -> CalFormResult<&str> {
        Ok(self.fields(index)?.get(field))
    }

    pub fn set_field(
        &mut self,
        index: usize,
        field: Field,
        value: impl Into<String>,
    ) -> CalFormResult<()> {
        let fields = self
            .items
            .get_mut(index)
            .ok_or(CalFormError::NoSuchItem(index))?;
        fields.set(field, value);
        Ok(())
    }

    /// Replace every field of an item at once, keeping its id.
    pub fn replace_fields(&mut self, index: usize, fields: ItemFields) -> CalFormResult<()> {
        let slot = self
            .items
            .get_mut(index)
            .ok_or(CalFormError::NoSuchItem(index))?;
        *slot = fields;
        Ok(())
    }

    /// Read the current values of one item.
    pub fn collect(&self, index: usize) -> CalFormResult<CalendarItem> {
        let id = self.items.id(index).ok_or(CalFormError::NoSuchItem(index))?;
        let fields = self.fields(index)?;
        Ok(collect(id, fields))
    }

    /// Collect every live item in form order.
    pub fn collect_all(&self) -> Vec<CalendarItem> {
        self.items
            .iter()
            .map(|(_, id, fields)| collect(id, fields))
            .collect()
    }

    /// Append one item per row. Returns the indices of the new items.
    pub fn import_rows(&mut self, rows: Vec<ItemFields>) -> Vec<usize> {
        let indices: Vec<usize> = rows.into_iter().map(|f| self.items.add(f)).collect();
        tracing::info!(count = indices.len(), "imported items");
        indices
    }

    /// Serialize every live item.
    pub fn export(&self, format: ExportFormat, generated_at: DateTime<Utc>) -> CalFormResult<String> {
        format.serialize(&self.header, &self.collect_all(), generated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> Form {
        Form::new(CalendarHeader {
            name: "Home".to_string(),
            time_zone: "UTC".to_string(),
        })
    }

    #[test]
    fn add_item_appends_blank_subform() {
        let mut form = form();
        let index = form.add_item(ItemKind::Todo);
        assert_eq!(form.field(index, Field::Type).unwrap(), "VTODO");
        assert_eq!(form.field(index, Field::Summary).unwrap(), "");
        assert_eq!(form.items().len(), 1);
    }

    #[test]
    fn set_field_then_collect() {
        let mut form = form();
        let index = form.add_item(ItemKind::Event);
        form.set_field(index, Field::Summary, "Dentist").unwrap();
        form.set_field(index, Field::Start, "2025-05-02T08:30").unwrap();
        let item = form.collect(index).unwrap();
        assert_eq!(item.summary, "Dentist");
        assert_eq!(item.id, form.items().id(index).unwrap());
    }

    #[test]
    fn removed_items_are_not_collected() {
        let mut form = form();
        let a = form.add_item(ItemKind::Event);
        let b = form.add_item(ItemKind::Event);
        form.set_field(a, Field::Summary, "keep").unwrap();
        form.set_field(b, Field::Summary, "drop").unwrap();
        form.remove_item(b).unwrap();

        let summaries: Vec<_> = form.collect_all().into_iter().map(|i| i.summary).collect();
        assert_eq!(summaries, vec!["keep"]);
        assert!(matches!(form.collect(b), Err(CalFormError::NoSuchItem(_))));
        assert!(matches!(form.set_field(b, Field::Summary, "x"), Err(CalFormError::NoSuchItem(_))));
    }

    #[test]
    fn removed_items_are_not_exported() {
        let mut form = form();
        let a = form.add_item(ItemKind::Event);
        form.set_field(a, Field::Summary, "Gone").unwrap();
        form.set_field(a, Field::Start, "2025-05-02T08:30").unwrap();
        form.remove_item(a).unwrap();

        let ics = form.export(ExportFormat::Ics, Utc::now()).unwrap();
        assert!(!ics.contains("BEGIN:VEVENT"));
        assert!(!ics.contains("Gone"));
    }

    #[test]
    fn import_rows_appends_after_existing_items() {
        let mut form = form();
        form.add_item(ItemKind::Event);
        let indices = form.import_rows(vec![
            ItemFields::from_row(&["VTODO", "a"]),
            ItemFields::from_row(&["VJOURNAL", "b"]),
        ]);
        assert_eq!(indices, vec![1, 2]);
        assert_eq!(form.items().len(), 3);
    }

    #[test]
    fn replace_fields_keeps_id() {
        let mut form = form();
        let a = form.add_item(ItemKind::Event);
        let id = form.items().id(a);
        form.replace_fields(a, ItemFields::from_row(&["VTODO", "new"])).unwrap();
        assert_eq!(form.items().id(a), id);
        assert_eq!(form.field(a, Field::Summary).unwrap(), "new");
    }
}
