mod common;

use std::sync::Arc;

use bevy::prelude::Events;
use loot_core::{
    build_headless_app, build_headless_app_from_env, run_frame, CatalogChanged, CatalogItemId,
    HostInventory, HostTagStorage, ItemCatalog, LootConfig, LootConfigMetadata, LootEngine,
    LootTelemetry, MemoryInventory, MemoryTagStorage, PackageActivated, PackageCategory,
    RecipientId, RecipientJoined, SeededRandom, StarterGrantMode,
};

fn send<E: bevy::prelude::Event>(app: &mut bevy::app::App, event: E) {
    app.world.resource_mut::<Events<E>>().send(event);
}

#[test]
fn join_then_activate_through_events() {
    common::init_tracing();
    let engine = Arc::new(
        LootEngine::new(
            Arc::new(LootConfig {
                starter_grant: StarterGrantMode::Package,
                ..LootConfig::default()
            }),
            common::sample_catalog(),
        )
        .with_random_source(Box::new(SeededRandom::seeded(64))),
    );
    let mut app = build_headless_app(
        Arc::clone(&engine),
        MemoryTagStorage::new(),
        MemoryInventory::default(),
    );
    run_frame(&mut app);

    let recipient = RecipientId(3);
    send(&mut app, RecipientJoined { recipient });
    run_frame(&mut app);

    let package = PackageCategory::StarterSurvival.package_item_id();
    assert_eq!(
        app.world
            .resource::<HostInventory<MemoryInventory>>()
            .0
            .count_of(recipient, &package),
        1
    );

    send(
        &mut app,
        PackageActivated {
            recipient,
            category: PackageCategory::StarterSurvival,
        },
    );
    run_frame(&mut app);

    let telemetry = app.world.resource::<LootTelemetry>();
    assert_eq!(telemetry.starter_grants, 1);
    assert_eq!(telemetry.packages_opened, 1);
    assert_eq!(telemetry.opened(PackageCategory::StarterSurvival), 1);
    assert_eq!(telemetry.activations_rejected, 0);
    let opened = telemetry.last_opened.as_ref().expect("opening recorded");
    assert_eq!(opened.recipient, recipient);
    assert_eq!(
        telemetry.entries_inserted + telemetry.entries_dropped,
        1 + opened.entries.len()
    );

    let inventory = &app.world.resource::<HostInventory<MemoryInventory>>().0;
    assert_eq!(inventory.count_of(recipient, &package), 0);
    for entry in &opened.entries {
        assert!(inventory.count_of(recipient, &entry.item) >= entry.quantity());
    }
}

#[test]
fn catalog_change_event_refreshes_the_pool() {
    common::init_tracing();
    let catalog = common::sample_catalog();
    let engine = Arc::new(LootEngine::new(
        Arc::new(LootConfig::default()),
        Arc::clone(&catalog) as Arc<dyn ItemCatalog>,
    ));
    let mut app = build_headless_app(
        Arc::clone(&engine),
        MemoryTagStorage::new(),
        MemoryInventory::default(),
    );
    run_frame(&mut app);
    let netherite = CatalogItemId::builtin("netherite_ingot");
    assert!(!engine.eligible_items().contains(&netherite));

    catalog.register(netherite.clone(), 64);
    assert!(!engine.eligible_items().contains(&netherite));

    send(&mut app, CatalogChanged);
    run_frame(&mut app);
    assert!(engine.cache().is_built());
    assert_eq!(engine.cache().build_count(), 2);
    assert!(engine.eligible_items().contains(&netherite));
    engine.generate(PackageCategory::Mystery);
    assert_eq!(engine.cache().build_count(), 2);
}

#[test]
fn telemetry_stays_bounded_over_many_openings() {
    common::init_tracing();
    let engine = Arc::new(
        LootEngine::new(Arc::new(LootConfig::default()), common::sample_catalog())
            .with_random_source(Box::new(SeededRandom::seeded(65))),
    );
    let mut app = build_headless_app(
        engine,
        MemoryTagStorage::new(),
        MemoryInventory::new(4, 64),
    );
    run_frame(&mut app);

    let recipient = RecipientId(19);
    let package = PackageCategory::Treasure.package_item_id();
    let rounds = 200;
    for _ in 0..rounds {
        app.world
            .resource_mut::<HostInventory<MemoryInventory>>()
            .0
            .give(recipient, package.clone(), 1);
        send(
            &mut app,
            PackageActivated {
                recipient,
                category: PackageCategory::Treasure,
            },
        );
        run_frame(&mut app);
    }
    send(
        &mut app,
        PackageActivated {
            recipient,
            category: PackageCategory::Treasure,
        },
    );
    run_frame(&mut app);

    let telemetry = app.world.resource::<LootTelemetry>();
    assert_eq!(telemetry.packages_opened, rounds);
    assert_eq!(telemetry.opened(PackageCategory::Treasure), rounds);
    assert_eq!(telemetry.opened(PackageCategory::Mystery), 0);
    assert_eq!(telemetry.activations_rejected, 1);
    assert_eq!(telemetry.opened_by_category.len(), 1);
    assert!(telemetry.entries_dropped > 0);
    let dropped = app.world.resource::<HostInventory<MemoryInventory>>().0.dropped().len();
    assert_eq!(telemetry.entries_dropped, dropped);
}

#[test]
fn app_from_env_records_config_source() {
    common::init_tracing();
    common::ensure_test_config();
    let mut app = build_headless_app_from_env(
        common::sample_catalog(),
        MemoryTagStorage::new(),
        MemoryInventory::default(),
    );
    run_frame(&mut app);

    assert!(!app.world.resource::<LootConfigMetadata>().is_builtin());

    send(&mut app, RecipientJoined { recipient: RecipientId(77) });
    run_frame(&mut app);
    let storage = &app.world.resource::<HostTagStorage<MemoryTagStorage>>().0;
    let inventory = &app.world.resource::<HostInventory<MemoryInventory>>().0;
    let package = PackageCategory::StarterSurvival.package_item_id();
    assert_eq!(inventory.count_of(RecipientId(77), &package), 1);
    assert!(loot_core::GrantTracker::default().has_received_starter(storage, RecipientId(77)));
}
