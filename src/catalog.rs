use crate::errors::TrackerError;
use crate::models::{ChoreDefinition, ItemId, RewardDefinition, SortOrder};
use std::cmp::Ordering;
use tracing::debug;

/// A named definition with a positive point value.
pub trait CatalogItem: Clone {
    /// Singular label used in errors and logs.
    const KIND: &'static str;

    fn build(id: ItemId, name: String, value: u32) -> Self;
    fn id(&self) -> ItemId;
    fn name(&self) -> &str;
    fn value(&self) -> u32;
    fn set(&mut self, name: String, value: u32);
}

impl CatalogItem for ChoreDefinition {
    const KIND: &'static str = "chore";

    fn build(id: ItemId, name: String, points: u32) -> Self {
        Self { id, name, points }
    }

    fn id(&self) -> ItemId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> u32 {
        self.points
    }

    fn set(&mut self, name: String, points: u32) {
        self.name = name;
        self.points = points;
    }
}

impl CatalogItem for RewardDefinition {
    const KIND: &'static str = "reward";

    fn build(id: ItemId, name: String, cost: u32) -> Self {
        Self { id, name, cost }
    }

    fn id(&self) -> ItemId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> u32 {
        self.cost
    }

    fn set(&mut self, name: String, cost: u32) {
        self.name = name;
        self.cost = cost;
    }
}

/// Definitions of one kind in insertion order, plus the id of the single
/// item currently open for editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog<T> {
    items: Vec<T>,
    editing: Option<ItemId>,
    next_id: ItemId,
}

impl<T: CatalogItem> Default for Catalog<T> {
    fn default() -> Self {
        Self::from_items(Vec::new())
    }
}

impl<T: CatalogItem> Catalog<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        let next_id = items.iter().map(T::id).max().map_or(1, |id| id.saturating_add(1));
        Self {
            items,
            editing: None,
            next_id,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn lookup(&self, id: ItemId) -> Result<&T, TrackerError> {
        self.get(id).ok_or_else(|| TrackerError::not_found(T::KIND, id))
    }

    pub fn add(&mut self, name: &str, value: i64) -> Result<T, TrackerError> {
        let (name, value) = validate::<T>(name, value)?;
        let id = self.next_id;
        self.next_id = id.saturating_add(1);
        let item = T::build(id, name, value);
        self.items.push(item.clone());
        debug!(kind = T::KIND, id, value, "catalog item added");
        Ok(item)
    }

    pub fn update(&mut self, id: ItemId, name: &str, value: i64) -> Result<T, TrackerError> {
        let (name, value) = validate::<T>(name, value)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| TrackerError::not_found(T::KIND, id))?;
        item.set(name, value);
        Ok(item.clone())
    }

    pub fn remove(&mut self, id: ItemId) -> Result<T, TrackerError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| TrackerError::not_found(T::KIND, id))?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        Ok(self.items.remove(index))
    }

    /// Sorted copy of the definitions. Equal values keep insertion order.
    pub fn list(&self, order: SortOrder) -> Vec<T> {
        let mut sorted = self.items.clone();
        match order {
            SortOrder::ValueAscending => sorted.sort_by_key(T::value),
            SortOrder::ValueDescending => sorted.sort_by(|a, b| b.value().cmp(&a.value())),
            SortOrder::Alphabetical => sorted.sort_by(|a, b| compare_names(a.name(), b.name())),
        }
        sorted
    }

    pub fn editing(&self) -> Option<ItemId> {
        self.editing
    }

    /// Opens `id` for editing, closing whichever item was open before.
    pub fn begin_edit(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.lookup(id)?;
        self.editing = Some(id);
        Ok(())
    }

    pub fn cancel_edit(&mut self, id: ItemId) -> Result<(), TrackerError> {
        self.lookup(id)?;
        if self.editing == Some(id) {
            self.editing = None;
        }
        Ok(())
    }

    /// Applies an edit to the open item. On a validation failure the item
    /// stays open so the user can correct it.
    pub fn save_edit(&mut self, id: ItemId, name: &str, value: i64) -> Result<T, TrackerError> {
        if self.editing != Some(id) {
            self.lookup(id)?;
            return Err(TrackerError::NotEditing { kind: T::KIND, id });
        }
        let item = self.update(id, name, value)?;
        self.editing = None;
        Ok(item)
    }
}

fn validate<T: CatalogItem>(name: &str, value: i64) -> Result<(String, u32), TrackerError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TrackerError::validation(format!("{} name is required", T::KIND)));
    }
    match u32::try_from(value) {
        Ok(value) if value > 0 => Ok((name.to_string(), value)),
        _ => Err(TrackerError::validation(format!(
            "{} value must be a positive whole number, got {value}",
            T::KIND
        ))),
    }
}

// Case-insensitive first so "apple" sorts next to "Apple", then by the exact
// text to keep the order total.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
