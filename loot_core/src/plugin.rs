//! Bevy wiring for hosts that deliver join/activation signals as events.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::sync::Arc;

use bevy::prelude::*;
use loot_schema::{PackageCategory, RecipientId};

use crate::catalog::ItemCatalog;
use crate::config::load_loot_config_from_env;
use crate::delivery::InventorySink;
use crate::delivery::DeliveryReport;
use crate::engine::{JoinOutcome, LootEngine, PackageOpened};
use crate::grants::TagStorage;

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipientJoined {
    pub recipient: RecipientId,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageActivated {
    pub recipient: RecipientId,
    pub category: PackageCategory,
}

/// Host registered or removed items after startup.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogChanged;

#[derive(Resource, Debug, Clone)]
pub struct LootEngineHandle(pub Arc<LootEngine>);

/// Host persistent tag storage exposed to the loot systems.
#[derive(Resource, Debug)]
pub struct HostTagStorage<S>(pub S);

/// Host inventory exposed to the loot systems.
#[derive(Resource, Debug)]
pub struct HostInventory<I>(pub I);

/// Running counters of what the loot systems did.
#[derive(Resource, Debug, Default)]
pub struct LootTelemetry {
    pub starter_grants: u32,
    pub packages_opened: u32,
    pub opened_by_category: BTreeMap<PackageCategory, u32>,
    pub activations_rejected: u32,
    /// Entries placed in inventories, starter grants included.
    pub entries_inserted: usize,
    /// Entries dropped in the world for lack of room.
    pub entries_dropped: usize,
    /// Most recent opening only; replaced on every activation.
    pub last_opened: Option<PackageOpened>,
}

impl LootTelemetry {
    pub fn opened(&self, category: PackageCategory) -> u32 {
        self.opened_by_category.get(&category).copied().unwrap_or(0)
    }

    fn record_delivery(&mut self, report: &DeliveryReport) {
        self.entries_inserted += report.inserted;
        self.entries_dropped += report.dropped;
    }

    fn record_opened(&mut self, opened: PackageOpened) {
        self.packages_opened += 1;
        *self.opened_by_category.entry(opened.category).or_default() += 1;
        self.record_delivery(&opened.report);
        self.last_opened = Some(opened);
    }
}

pub struct LootPackagesPlugin<S, I> {
    engine: Arc<LootEngine>,
    _host: PhantomData<fn() -> (S, I)>,
}

impl<S, I> LootPackagesPlugin<S, I> {
    pub fn new(engine: Arc<LootEngine>) -> Self {
        Self {
            engine,
            _host: PhantomData,
        }
    }
}

impl<S, I> Plugin for LootPackagesPlugin<S, I>
where
    S: TagStorage + Send + Sync + 'static,
    I: InventorySink + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        app.insert_resource(LootEngineHandle(Arc::clone(&self.engine)))
            .init_resource::<LootTelemetry>()
            .add_event::<RecipientJoined>()
            .add_event::<PackageActivated>()
            .add_event::<CatalogChanged>()
            .add_systems(Startup, warm_catalog_cache)
            .add_systems(
                Update,
                (
                    refresh_catalog_cache,
                    handle_recipient_joined::<S, I>,
                    handle_package_activated::<I>,
                )
                    .chain(),
            );
    }
}

/// Construct an [`App`] with the loot systems and the given host collaborators.
pub fn build_headless_app<S, I>(engine: Arc<LootEngine>, storage: S, inventory: I) -> App
where
    S: TagStorage + Send + Sync + 'static,
    I: InventorySink + Send + Sync + 'static,
{
    let mut app = App::new();
    app.insert_resource(HostTagStorage(storage))
        .insert_resource(HostInventory(inventory))
        .add_plugins(MinimalPlugins)
        .add_plugins(LootPackagesPlugin::<S, I>::new(engine));
    app
}

/// Like [`build_headless_app`], with the configuration read through
/// `LOOT_CONFIG_PATH` and its source recorded as a resource.
pub fn build_headless_app_from_env<S, I>(
    catalog: Arc<dyn ItemCatalog>,
    storage: S,
    inventory: I,
) -> App
where
    S: TagStorage + Send + Sync + 'static,
    I: InventorySink + Send + Sync + 'static,
{
    let (config, metadata) = load_loot_config_from_env();
    let engine = Arc::new(LootEngine::new(config, catalog));
    let mut app = build_headless_app(engine, storage, inventory);
    app.insert_resource(metadata);
    app
}

/// Host setup is complete once startup runs; build the pool eagerly.
pub fn warm_catalog_cache(engine: Res<LootEngineHandle>) {
    engine.0.setup_complete();
}

pub fn refresh_catalog_cache(
    engine: Res<LootEngineHandle>,
    mut events: EventReader<CatalogChanged>,
) {
    // Any number of changes in one frame needs a single rebuild.
    if events.read().count() > 0 {
        engine.0.catalog_changed();
    }
}

pub fn handle_recipient_joined<S, I>(
    engine: Res<LootEngineHandle>,
    mut events: EventReader<RecipientJoined>,
    mut storage: ResMut<HostTagStorage<S>>,
    mut inventory: ResMut<HostInventory<I>>,
    mut telemetry: ResMut<LootTelemetry>,
) where
    S: TagStorage + Send + Sync + 'static,
    I: InventorySink + Send + Sync + 'static,
{
    for event in events.read() {
        let outcome = engine
            .0
            .on_recipient_joined(event.recipient, &mut storage.0, &mut inventory.0);
        if let JoinOutcome::Granted { report, .. } = &outcome {
            telemetry.starter_grants += 1;
            telemetry.record_delivery(report);
        }
    }
}

pub fn handle_package_activated<I>(
    engine: Res<LootEngineHandle>,
    mut events: EventReader<PackageActivated>,
    mut inventory: ResMut<HostInventory<I>>,
    mut telemetry: ResMut<LootTelemetry>,
) where
    I: InventorySink + Send + Sync + 'static,
{
    for event in events.read() {
        match engine
            .0
            .on_package_activated(event.recipient, event.category, &mut inventory.0)
        {
            Ok(opened) => telemetry.record_opened(opened),
            Err(err) => {
                tracing::warn!(
                    target: "loot_packages::engine",
                    recipient = %event.recipient,
                    category = event.category.key(),
                    error = %err,
                    "package.activation_rejected"
                );
                telemetry.activations_rejected += 1;
            }
        }
    }
}
