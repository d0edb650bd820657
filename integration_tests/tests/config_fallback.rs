mod common;

use loot_core::config::LOOT_CONFIG_PATH_ENV;
use loot_core::{load_loot_config_from_env, LootConfig, LootConfigError};

// Single test: this binary owns LOOT_CONFIG_PATH and changes it in sequence.
#[test]
fn unusable_config_files_fall_back_to_builtin() {
    common::init_tracing();

    let malformed = common::fixture_path("malformed_loot_config.json");
    assert!(matches!(
        LootConfig::from_file(&malformed),
        Err(LootConfigError::Parse { .. })
    ));
    std::env::set_var(LOOT_CONFIG_PATH_ENV, &malformed);
    let (config, metadata) = load_loot_config_from_env();
    assert!(metadata.is_builtin());
    assert_eq!(*config, *LootConfig::builtin());

    let missing = common::fixture_path("no_such_loot_config.json");
    std::env::set_var(LOOT_CONFIG_PATH_ENV, &missing);
    let (config, metadata) = load_loot_config_from_env();
    assert!(metadata.is_builtin());
    assert!(metadata.path().is_none());
    assert_eq!(*config, *LootConfig::builtin());

    std::env::remove_var(LOOT_CONFIG_PATH_ENV);
    let (config, metadata) = load_loot_config_from_env();
    assert!(metadata.is_builtin());
    assert_eq!(*config, *LootConfig::builtin());
}
