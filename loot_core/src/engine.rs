use std::sync::Arc;

use loot_schema::{CatalogItemId, LootEntry, PackageCategory, RecipientId, UnknownCategory};
use parking_lot::Mutex;
use thiserror::Error;

use crate::cache::{CatalogCache, EligibleItemPool};
use crate::catalog::ItemCatalog;
use crate::config::{LootConfig, StarterGrantMode};
use crate::delivery::{deliver, DeliveryReport, InventorySink};
use crate::eligibility::EligibilityFilter;
use crate::grants::{GrantTracker, TagStorage};
use crate::policy::PackagePolicies;
use crate::quantity::QuantityHeuristic;
use crate::random::{source_from_seed, RandomSource};

/// Result of handling a "recipient joined" signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Starter grants are switched off in the configuration.
    Disabled,
    AlreadyGranted,
    Granted {
        entries: Vec<LootEntry>,
        report: DeliveryReport,
    },
}

impl JoinOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, JoinOutcome::Granted { .. })
    }
}

/// A package that was consumed and delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOpened {
    pub recipient: RecipientId,
    pub category: PackageCategory,
    pub entries: Vec<LootEntry>,
    pub report: DeliveryReport,
    /// Chat line shown to the recipient.
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("recipient {recipient} holds no {category}")]
    PackageNotHeld {
        recipient: RecipientId,
        category: PackageCategory,
    },
    #[error(transparent)]
    UnknownPackage(#[from] UnknownCategory),
}

/// Entry point tying the catalog cache, policies and grant ledger together.
///
/// Shared across threads; the only mutable state is the catalog snapshot and
/// the random source, each behind its own lock.
pub struct LootEngine {
    config: Arc<LootConfig>,
    catalog: Arc<dyn ItemCatalog>,
    cache: CatalogCache,
    policies: PackagePolicies,
    grants: GrantTracker,
    rng: Mutex<Box<dyn RandomSource + Send>>,
}

impl LootEngine {
    pub fn new(config: Arc<LootConfig>, catalog: Arc<dyn ItemCatalog>) -> Self {
        let cache = CatalogCache::new(
            EligibilityFilter::default(),
            config.namespace_policy.clone(),
        );
        let rng = source_from_seed(config.rng_seed);
        Self {
            config,
            catalog,
            cache,
            policies: PackagePolicies::new(QuantityHeuristic),
            grants: GrantTracker::default(),
            rng: Mutex::new(rng),
        }
    }

    pub fn with_random_source(mut self, rng: Box<dyn RandomSource + Send>) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// Host finished registering items: build the pool ahead of first use.
    pub fn setup_complete(&self) -> Arc<EligibleItemPool> {
        self.cache.rebuild(self.catalog.as_ref())
    }

    /// Host catalog changed after startup: rebuild now so the next
    /// generation call reads a ready snapshot.
    pub fn catalog_changed(&self) -> Arc<EligibleItemPool> {
        self.cache.rebuild(self.catalog.as_ref())
    }

    pub fn eligible_items(&self) -> Arc<EligibleItemPool> {
        self.cache.eligible_items(self.catalog.as_ref())
    }

    /// Generate loot using the engine's shared random source.
    pub fn generate(&self, category: PackageCategory) -> Vec<LootEntry> {
        // A cold pool is built before the rng lock is taken.
        let pool = PackagePolicies::samples_catalog(category).then(|| self.eligible_items());
        let mut rng = self.rng.lock();
        self.policies.generate(category, &mut **rng, || {
            pool.unwrap_or_else(|| self.eligible_items())
        })
    }

    /// Generate loot with a caller-provided random source.
    pub fn generate_with(
        &self,
        category: PackageCategory,
        rng: &mut dyn RandomSource,
    ) -> Vec<LootEntry> {
        self.policies
            .generate(category, rng, || self.eligible_items())
    }

    pub fn has_received_starter(&self, storage: &dyn TagStorage, recipient: RecipientId) -> bool {
        self.grants.has_received_starter(storage, recipient)
    }

    /// Grant the starter bundle once per recipient.
    ///
    /// The flag is written only after delivery was handed to the inventory.
    pub fn on_recipient_joined(
        &self,
        recipient: RecipientId,
        storage: &mut dyn TagStorage,
        inventory: &mut dyn InventorySink,
    ) -> JoinOutcome {
        if !self.config.give_starter_package {
            tracing::debug!(
                target: "loot_packages::grants",
                %recipient,
                "starter_grant.skipped=disabled"
            );
            return JoinOutcome::Disabled;
        }
        if self.grants.has_received_starter(storage, recipient) {
            tracing::debug!(
                target: "loot_packages::grants",
                %recipient,
                "starter_grant.skipped=already_granted"
            );
            return JoinOutcome::AlreadyGranted;
        }

        let entries = match self.config.starter_grant {
            StarterGrantMode::Loot => self.generate(PackageCategory::StarterSurvival),
            StarterGrantMode::Package => vec![LootEntry::single(
                PackageCategory::StarterSurvival.package_item_id(),
            )],
        };
        let report = deliver(inventory, recipient, entries.clone());
        self.grants.mark_received_starter(storage, recipient);

        tracing::info!(
            target: "loot_packages::grants",
            %recipient,
            mode = ?self.config.starter_grant,
            inserted = report.inserted,
            dropped = report.dropped,
            "starter_grant.delivered"
        );
        JoinOutcome::Granted { entries, report }
    }

    /// Consume one package of `category` and deliver its contents.
    pub fn on_package_activated(
        &self,
        recipient: RecipientId,
        category: PackageCategory,
        inventory: &mut dyn InventorySink,
    ) -> Result<PackageOpened, ActivationError> {
        if !inventory.take_one(recipient, &category.package_item_id()) {
            return Err(ActivationError::PackageNotHeld {
                recipient,
                category,
            });
        }

        let entries = self.generate(category);
        debug_assert!(!entries.is_empty(), "{category} generated no loot");
        let report = deliver(inventory, recipient, entries.clone());

        tracing::info!(
            target: "loot_packages::engine",
            %recipient,
            category = category.key(),
            items = entries.len(),
            inserted = report.inserted,
            dropped = report.dropped,
            "package.opened"
        );
        Ok(PackageOpened {
            recipient,
            category,
            entries,
            report,
            message: category.opened_message(),
        })
    }

    /// Activation keyed by the package item the host saw being used.
    pub fn activate_package_item(
        &self,
        recipient: RecipientId,
        item: &CatalogItemId,
        inventory: &mut dyn InventorySink,
    ) -> Result<PackageOpened, ActivationError> {
        let category = PackageCategory::from_package_item(item)?;
        self.on_package_activated(recipient, category, inventory)
    }
}

impl std::fmt::Debug for LootEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LootEngine")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("grants", &self.grants)
            .finish_non_exhaustive()
    }
}
