//! In-memory item store.
//!
//! Items live in numbered slots. Removing an item empties its slot instead of
//! compacting the list, so an index handed out by `add` keeps referring to the
//! same item (or to nothing) for the lifetime of the store.

use crate::fields::ItemFields;
use crate::item::ItemId;

#[derive(Debug, Clone)]
struct StoredItem {
    id: ItemId,
    fields: ItemFields,
}

#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    slots: Vec<Option<StoredItem>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item with a freshly generated id and return its index.
    pub fn add(&mut self, fields: ItemFields) -> usize {
        let id = ItemId::new();
        self.slots.push(Some(StoredItem { id, fields }));
        let index = self.slots.len() - 1;
        tracing::debug!(index, %id, "added item");
        index
    }

    pub fn get(&self, index: usize) -> Option<&ItemFields> {
        self.slot(index).map(|item| &item.fields)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ItemFields> {
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .map(|item| &mut item.fields)
    }

    pub fn id(&self, index: usize) -> Option<ItemId> {
        self.slot(index).map(|item| item.id)
    }

    /// Empty the slot at `index`, returning the fields it held.
    pub fn remove(&mut self, index: usize) -> Option<ItemFields> {
        let removed = self.slots.get_mut(index).and_then(Option::take)?;
        tracing::debug!(index, id = %removed.id, "removed item");
        Some(removed.fields)
    }

    /// Live items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ItemId, &ItemFields)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item.id, &item.fields)))
    }

    /// Number of live items
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, index: usize) -> Option<&StoredItem> {
        self.slots.get(index).and_then(Option::as_ref)
    }
}
