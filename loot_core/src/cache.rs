use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use loot_schema::CatalogItemId;
use parking_lot::RwLock;

use crate::catalog::{CatalogItem, ItemCatalog};
use crate::config::NamespacePolicy;
use crate::eligibility::EligibilityFilter;

/// Immutable snapshot of the catalog items allowed in sampled loot.
#[derive(Debug, Clone, Default)]
pub struct EligibleItemPool {
    items: Vec<CatalogItem>,
    generation: u64,
}

impl EligibleItemPool {
    pub fn new(items: Vec<CatalogItem>, generation: u64) -> Self {
        Self { items, generation }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &CatalogItemId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Build counter of the cache that produced this snapshot, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Lazily built, explicitly invalidated view of the eligible catalog items.
///
/// Readers only ever see a fully built pool: a build runs to completion and
/// is then published by swapping the snapshot reference.
#[derive(Debug)]
pub struct CatalogCache {
    filter: EligibilityFilter,
    policy: NamespacePolicy,
    snapshot: RwLock<Option<Arc<EligibleItemPool>>>,
    builds: AtomicU64,
}

impl CatalogCache {
    pub fn new(filter: EligibilityFilter, policy: NamespacePolicy) -> Self {
        Self {
            filter,
            policy,
            snapshot: RwLock::new(None),
            builds: AtomicU64::new(0),
        }
    }

    /// Current snapshot, building it first when absent or invalidated.
    pub fn eligible_items(&self, catalog: &dyn ItemCatalog) -> Arc<EligibleItemPool> {
        if let Some(pool) = self.snapshot.read().as_ref() {
            return Arc::clone(pool);
        }
        let mut slot = self.snapshot.write();
        // Another reader may have finished a build while we waited.
        if let Some(pool) = slot.as_ref() {
            return Arc::clone(pool);
        }
        let pool = Arc::new(self.build(catalog));
        *slot = Some(Arc::clone(&pool));
        pool
    }

    /// Drop the snapshot; the next read rebuilds from the catalog.
    pub fn invalidate(&self) {
        let previous = self.snapshot.write().take();
        tracing::debug!(
            target: "loot_packages::catalog",
            generation = previous.map(|pool| pool.generation()).unwrap_or(0),
            "catalog_cache.invalidated"
        );
    }

    /// Build and publish a fresh snapshot regardless of staleness.
    pub fn rebuild(&self, catalog: &dyn ItemCatalog) -> Arc<EligibleItemPool> {
        let pool = Arc::new(self.build(catalog));
        *self.snapshot.write() = Some(Arc::clone(&pool));
        pool
    }

    pub fn is_built(&self) -> bool {
        self.snapshot.read().is_some()
    }

    /// Number of builds performed so far.
    pub fn build_count(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }

    fn build(&self, catalog: &dyn ItemCatalog) -> EligibleItemPool {
        let all = catalog.items();
        let scanned = all.len();
        let items: Vec<CatalogItem> = all
            .into_iter()
            .filter(|item| self.policy.admits(&item.id) && self.filter.is_eligible(item))
            .collect();
        let generation = self.builds.fetch_add(1, Ordering::Relaxed) + 1;

        if items.is_empty() {
            tracing::warn!(
                target: "loot_packages::catalog",
                scanned,
                generation,
                "catalog_cache.empty"
            );
        } else {
            tracing::info!(
                target: "loot_packages::catalog",
                scanned,
                eligible = items.len(),
                generation,
                "catalog_cache.built"
            );
        }
        EligibleItemPool::new(items, generation)
    }
}
