#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Once};

use loot_core::{
    CatalogItem, CatalogItemId, LootConfig, LootEngine, SeededRandom, StaticCatalog,
};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();
static CONFIG_ENV: Once = Once::new();

pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("loot_packages=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Point `LOOT_CONFIG_PATH` at the shared test config, once per binary.
pub fn ensure_test_config() {
    CONFIG_ENV.call_once(|| {
        let config_path = fixture_path("test_loot_config.json");
        debug_assert!(
            config_path.exists(),
            "missing test loot config at {}",
            config_path.display()
        );
        std::env::set_var(loot_core::config::LOOT_CONFIG_PATH_ENV, &config_path);
    });
}

/// A slice of the vanilla catalog plus a few administrative and modded items.
pub fn sample_catalog() -> Arc<StaticCatalog> {
    let mut items: Vec<CatalogItem> = [
        ("diamond", 64),
        ("emerald", 64),
        ("gold_ingot", 64),
        ("iron_ingot", 64),
        ("stick", 64),
        ("torch", 64),
        ("bread", 64),
        ("oak_planks", 64),
        ("cobblestone", 64),
        ("iron_sword", 1),
        ("diamond_pickaxe", 1),
        ("ender_pearl", 16),
        ("snowball", 16),
        ("barrier", 64),
        ("command_block", 64),
        ("debug_stick", 1),
        ("bedrock", 64),
        ("air", 64),
    ]
    .into_iter()
    .map(|(path, stack)| CatalogItem::new(CatalogItemId::builtin(path), stack))
    .collect();
    items.push(CatalogItem::new(
        CatalogItemId::new("iron_spellbooks", "scroll"),
        1,
    ));
    items.push(CatalogItem::new(
        CatalogItemId::new("othermod", "mystery_gizmo"),
        64,
    ));
    Arc::new(StaticCatalog::from_items(items))
}

pub fn seeded_engine(config: LootConfig, seed: u64) -> LootEngine {
    LootEngine::new(Arc::new(config), sample_catalog())
        .with_random_source(Box::new(SeededRandom::seeded(seed)))
}
