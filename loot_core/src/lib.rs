//! Loot package engine.
//!
//! Filters the host item catalog down to an eligible pool, generates loot
//! for each [`PackageCategory`], and grants a one-time starter bundle per
//! recipient. [`LootEngine`] is the entry point; [`LootPackagesPlugin`]
//! wires it into a Bevy [`App`](bevy::app::App) driven by host events.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod delivery;
pub mod eligibility;
mod engine;
pub mod grants;
mod plugin;
pub mod policy;
pub mod quantity;
pub mod random;

pub use cache::{CatalogCache, EligibleItemPool};
pub use catalog::{CatalogItem, ItemCatalog, StaticCatalog};
pub use config::{
    load_loot_config_from_env, LootConfig, LootConfigError, LootConfigMetadata, NamespaceMode,
    NamespacePolicy, StarterGrantMode,
};
pub use delivery::{deliver, DeliveryReport, InventoryFull, InventorySink, MemoryInventory};
pub use eligibility::EligibilityFilter;
pub use engine::{ActivationError, JoinOutcome, LootEngine, PackageOpened};
pub use grants::{GrantTracker, MemoryTagStorage, TagStorage};
pub use plugin::{
    build_headless_app, build_headless_app_from_env, handle_package_activated,
    handle_recipient_joined, refresh_catalog_cache, warm_catalog_cache, CatalogChanged,
    HostInventory, HostTagStorage, LootEngineHandle, LootPackagesPlugin, LootTelemetry,
    PackageActivated, RecipientJoined,
};
pub use policy::{BiomeTheme, PackagePolicies};
pub use quantity::{QuantityClass, QuantityHeuristic};
pub use random::{EntropyRandom, RandomSource, ScriptedRandom, SeededRandom};

pub use loot_schema::{CatalogItemId, LootEntry, PackageCategory, RecipientId};

/// Run one frame of the loot systems: catalog refresh, joins, activations.
pub fn run_frame(app: &mut bevy::app::App) {
    app.update();
}
