use std::collections::BTreeMap;

use loot_schema::{CatalogItemId, PackageCategory, PACKAGE_MAX_STACK};
use parking_lot::RwLock;

/// Metadata the host reports for one catalog item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    /// Largest stack the host allows; 0 marks an item that cannot be held.
    pub max_stack_size: u32,
}

impl CatalogItem {
    pub fn new(id: CatalogItemId, max_stack_size: u32) -> Self {
        Self { id, max_stack_size }
    }
}

/// Read access to the host's item registry.
pub trait ItemCatalog: Send + Sync {
    /// Every item the host currently knows about.
    fn items(&self) -> Vec<CatalogItem>;

    /// Metadata for one item, `None` when the host does not know it.
    fn lookup(&self, id: &CatalogItemId) -> Option<CatalogItem>;
}

/// Catalog entries for the package items themselves, one per category.
pub fn package_items() -> impl Iterator<Item = CatalogItem> {
    PackageCategory::ALL
        .into_iter()
        .map(|category| CatalogItem::new(category.package_item_id(), PACKAGE_MAX_STACK))
}

/// In-memory catalog for hosts that mirror their registry, and for tests.
///
/// Items can be registered after construction to model late registration.
#[derive(Debug, Default)]
pub struct StaticCatalog {
    items: RwLock<BTreeMap<CatalogItemId, u32>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: impl IntoIterator<Item = CatalogItem>) -> Self {
        let catalog = Self::new();
        for item in items {
            catalog.register(item.id, item.max_stack_size);
        }
        catalog
    }

    /// Insert or replace an item.
    pub fn register(&self, id: CatalogItemId, max_stack_size: u32) {
        self.items.write().insert(id, max_stack_size);
    }

    pub fn unregister(&self, id: &CatalogItemId) -> bool {
        self.items.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl ItemCatalog for StaticCatalog {
    fn items(&self) -> Vec<CatalogItem> {
        self.items
            .read()
            .iter()
            .map(|(id, stack)| CatalogItem::new(id.clone(), *stack))
            .collect()
    }

    fn lookup(&self, id: &CatalogItemId) -> Option<CatalogItem> {
        self.items
            .read()
            .get(id)
            .map(|stack| CatalogItem::new(id.clone(), *stack))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_visible_to_lookups() {
        let catalog = StaticCatalog::new();
        assert!(catalog.is_empty());
        catalog.register(CatalogItemId::builtin("stick"), 64);
        catalog.register(CatalogItemId::builtin("stick"), 32);
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.lookup(&CatalogItemId::builtin("stick")),
            Some(CatalogItem::new(CatalogItemId::builtin("stick"), 32))
        );
        assert!(catalog.unregister(&CatalogItemId::builtin("stick")));
        assert!(catalog.lookup(&CatalogItemId::builtin("stick")).is_none());
    }

    #[test]
    fn package_items_stack_to_sixteen() {
        let catalog = StaticCatalog::from_items(package_items());
        assert_eq!(catalog.len(), PackageCategory::ALL.len());
        for category in PackageCategory::ALL {
            let item = catalog.lookup(&category.package_item_id()).unwrap();
            assert_eq!(item.max_stack_size, 16);
            assert_eq!(PackageCategory::from_package_item(&item.id), Ok(category));
        }
    }

    #[test]
    fn items_are_listed_in_id_order() {
        let catalog = StaticCatalog::from_items([
            CatalogItem::new(CatalogItemId::builtin("stick"), 64),
            CatalogItem::new(CatalogItemId::builtin("diamond"), 64),
        ]);
        let paths: Vec<String> = catalog
            .items()
            .into_iter()
            .map(|item| item.id.path().to_string())
            .collect();
        assert_eq!(paths, vec!["diamond", "stick"]);
    }
}
