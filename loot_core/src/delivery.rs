use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use loot_schema::{CatalogItemId, LootEntry, RecipientId, PACKAGE_MAX_STACK, PACKAGE_NAMESPACE};
use thiserror::Error;

use crate::catalog::ItemCatalog;

/// The recipient's inventory had no room; the entry is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("inventory of recipient {recipient} has no room for {entry}")]
pub struct InventoryFull {
    pub recipient: RecipientId,
    pub entry: LootEntry,
}

/// Host inventory the engine delivers loot into.
pub trait InventorySink {
    fn try_insert(&mut self, recipient: RecipientId, entry: LootEntry) -> Result<(), InventoryFull>;

    /// Spawn the entry in the world at the recipient's location.
    fn drop_at_recipient(&mut self, recipient: RecipientId, entry: LootEntry);

    /// Remove one unit of `item` from the recipient, false when they hold none.
    fn take_one(&mut self, recipient: RecipientId, item: &CatalogItemId) -> bool;
}

/// How a batch of entries reached the recipient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub inserted: usize,
    pub dropped: usize,
}

impl DeliveryReport {
    pub fn total(&self) -> usize {
        self.inserted + self.dropped
    }
}

/// Hand every entry to the inventory, dropping at the recipient's feet on
/// overflow. Nothing is discarded.
pub fn deliver(
    sink: &mut dyn InventorySink,
    recipient: RecipientId,
    entries: Vec<LootEntry>,
) -> DeliveryReport {
    let mut report = DeliveryReport::default();
    for entry in entries {
        match sink.try_insert(recipient, entry) {
            Ok(()) => report.inserted += 1,
            Err(InventoryFull { entry, .. }) => {
                tracing::warn!(
                    target: "loot_packages::engine",
                    %recipient,
                    item = %entry.item,
                    quantity = entry.quantity(),
                    "delivery.dropped_in_world"
                );
                sink.drop_at_recipient(recipient, entry);
                report.dropped += 1;
            }
        }
    }
    report
}

/// Slot-based inventory kept in memory.
///
/// Inserts are all-or-nothing: an entry that does not fit entirely is
/// rejected so it can be dropped whole. Per-item stack sizes come from the
/// attached catalog when it knows the item; package items stack to
/// [`PACKAGE_MAX_STACK`] otherwise.
#[derive(Clone)]
pub struct MemoryInventory {
    slot_count: usize,
    stack_limit: u32,
    catalog: Option<Arc<dyn ItemCatalog>>,
    slots: HashMap<RecipientId, Vec<(CatalogItemId, u32)>>,
    dropped: Vec<(RecipientId, LootEntry)>,
}

impl fmt::Debug for MemoryInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryInventory")
            .field("slot_count", &self.slot_count)
            .field("stack_limit", &self.stack_limit)
            .field("has_catalog", &self.catalog.is_some())
            .field("slots", &self.slots)
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl Default for MemoryInventory {
    fn default() -> Self {
        Self::new(36, 64)
    }
}

impl MemoryInventory {
    pub fn new(slot_count: usize, stack_limit: u32) -> Self {
        Self {
            slot_count,
            stack_limit: stack_limit.max(1),
            catalog: None,
            slots: HashMap::new(),
            dropped: Vec::new(),
        }
    }

    /// Take per-item stack sizes from the host catalog.
    pub fn with_catalog(mut self, catalog: Arc<dyn ItemCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Largest stack one slot holds for `item`.
    pub fn stack_limit_for(&self, item: &CatalogItemId) -> u32 {
        let known = self
            .catalog
            .as_ref()
            .and_then(|catalog| catalog.lookup(item))
            .map(|entry| entry.max_stack_size);
        let limit = match known {
            Some(max_stack_size) => max_stack_size,
            None if item.namespace() == PACKAGE_NAMESPACE => PACKAGE_MAX_STACK,
            None => self.stack_limit,
        };
        limit.clamp(1, self.stack_limit)
    }

    /// Put items straight into the recipient's inventory, ignoring capacity.
    pub fn give(&mut self, recipient: RecipientId, item: CatalogItemId, count: u32) {
        self.slots.entry(recipient).or_default().push((item, count));
    }

    pub fn count_of(&self, recipient: RecipientId, item: &CatalogItemId) -> u32 {
        self.slots
            .get(&recipient)
            .map(|slots| {
                slots
                    .iter()
                    .filter(|(id, _)| id == item)
                    .map(|(_, count)| *count)
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn used_slots(&self, recipient: RecipientId) -> usize {
        self.slots.get(&recipient).map(Vec::len).unwrap_or(0)
    }

    pub fn dropped(&self) -> &[(RecipientId, LootEntry)] {
        &self.dropped
    }

    /// Every item held or dropped for the recipient, in insertion order.
    pub fn received(&self, recipient: RecipientId) -> Vec<(CatalogItemId, u32)> {
        let held = self.slots.get(&recipient).cloned().unwrap_or_default();
        let dropped = self
            .dropped
            .iter()
            .filter(|(owner, _)| *owner == recipient)
            .map(|(_, entry)| (entry.item.clone(), entry.quantity()));
        held.into_iter().chain(dropped).collect()
    }

    fn room_for(&self, recipient: RecipientId, item: &CatalogItemId) -> u64 {
        let limit = u64::from(self.stack_limit_for(item));
        let slots = self.slots.get(&recipient);
        let used = slots.map(Vec::len).unwrap_or(0);
        let partial: u64 = slots
            .map(|slots| {
                slots
                    .iter()
                    .filter(|(id, _)| id == item)
                    .map(|(_, count)| limit.saturating_sub(u64::from(*count)))
                    .sum()
            })
            .unwrap_or(0);
        partial + (self.slot_count.saturating_sub(used) as u64) * limit
    }
}

impl InventorySink for MemoryInventory {
    fn try_insert(&mut self, recipient: RecipientId, entry: LootEntry) -> Result<(), InventoryFull> {
        if self.room_for(recipient, &entry.item) < u64::from(entry.quantity()) {
            return Err(InventoryFull { recipient, entry });
        }
        let limit = self.stack_limit_for(&entry.item);
        let slots = self.slots.entry(recipient).or_default();
        let mut remaining = entry.quantity();
        for (id, count) in slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if *id == entry.item && *count < limit {
                let moved = remaining.min(limit - *count);
                *count += moved;
                remaining -= moved;
            }
        }
        while remaining > 0 {
            let moved = remaining.min(limit);
            slots.push((entry.item.clone(), moved));
            remaining -= moved;
        }
        Ok(())
    }

    fn drop_at_recipient(&mut self, recipient: RecipientId, entry: LootEntry) {
        self.dropped.push((recipient, entry));
    }

    fn take_one(&mut self, recipient: RecipientId, item: &CatalogItemId) -> bool {
        let Some(slots) = self.slots.get_mut(&recipient) else {
            return false;
        };
        let Some(index) = slots.iter().position(|(id, count)| id == item && *count > 0) else {
            return false;
        };
        slots[index].1 -= 1;
        if slots[index].1 == 0 {
            slots.remove(index);
        }
        true
    }
}
