//! Shared value types for the loot package engine.
//!
//! Everything here is plain data: catalog identifiers, generated loot
//! entries, recipients and the closed set of package categories.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace of the host's own built-in items.
pub const BUILTIN_NAMESPACE: &str = "minecraft";

/// Namespace owning the package items and the persistent grant flag.
pub const PACKAGE_NAMESPACE: &str = "lootpackages";

/// Maximum stack size of every package item.
pub const PACKAGE_MAX_STACK: u32 = 16;

/// Identifier of an item in the host catalog, `namespace:path`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CatalogItemId {
    namespace: String,
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemIdError {
    #[error("item id is empty")]
    Empty,
    #[error("item id {0:?} has an empty namespace or path")]
    MissingPart(String),
    #[error("item id {id:?} contains invalid character {ch:?}")]
    InvalidCharacter { id: String, ch: char },
}

impl CatalogItemId {
    /// Build an id from already-validated parts.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// Shorthand for an item in the built-in namespace.
    pub fn builtin(path: impl Into<String>) -> Self {
        Self::new(BUILTIN_NAMESPACE, path)
    }

    /// Parse `namespace:path`; a bare path lands in the built-in namespace.
    pub fn parse(raw: &str) -> Result<Self, ItemIdError> {
        if raw.is_empty() {
            return Err(ItemIdError::Empty);
        }
        let (namespace, path) = match raw.split_once(':') {
            Some((namespace, path)) => (namespace, path),
            None => (BUILTIN_NAMESPACE, raw),
        };
        if namespace.is_empty() || path.is_empty() {
            return Err(ItemIdError::MissingPart(raw.to_string()));
        }
        let valid_namespace = |ch: char| {
            ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '-' | '.')
        };
        if let Some(ch) = namespace.chars().find(|ch| !valid_namespace(*ch)) {
            return Err(ItemIdError::InvalidCharacter {
                id: raw.to_string(),
                ch,
            });
        }
        if let Some(ch) = path
            .chars()
            .find(|ch| !(valid_namespace(*ch) || *ch == '/'))
        {
            return Err(ItemIdError::InvalidCharacter {
                id: raw.to_string(),
                ch,
            });
        }
        Ok(Self::new(namespace, path))
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_builtin(&self) -> bool {
        self.namespace == BUILTIN_NAMESPACE
    }

    /// Lower-cased path used for keyword matching.
    pub fn normalized_path(&self) -> String {
        self.path.to_ascii_lowercase()
    }

    /// Human readable name, `iron_sword` becomes `Iron Sword`.
    pub fn display_name(&self) -> String {
        self.path
            .rsplit('/')
            .next()
            .unwrap_or(&self.path)
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CatalogItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for CatalogItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CatalogItemId {
    type Error = ItemIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CatalogItemId> for String {
    fn from(value: CatalogItemId) -> Self {
        value.to_string()
    }
}

/// Identity of a loot recipient as reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecipientId(pub u64);

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One generated `(item, quantity)` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: CatalogItemId,
    pub quantity: NonZeroU32,
}

impl LootEntry {
    /// Quantities below one are raised to one.
    pub fn new(item: CatalogItemId, quantity: u32) -> Self {
        Self {
            item,
            quantity: NonZeroU32::new(quantity).unwrap_or(NonZeroU32::MIN),
        }
    }

    pub fn single(item: CatalogItemId) -> Self {
        Self::new(item, 1)
    }

    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }
}

impl fmt::Display for LootEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.item, self.quantity)
    }
}

/// The closed set of package flavors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageCategory {
    StarterSurvival,
    DungeonLoot,
    Treasure,
    NetherLoot,
    EndLoot,
    MobDrop,
    BiomeSpecific,
    Mystery,
    DeepDark,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown package category {0:?}")]
pub struct UnknownCategory(pub String);

impl PackageCategory {
    pub const ALL: [PackageCategory; 9] = [
        PackageCategory::StarterSurvival,
        PackageCategory::DungeonLoot,
        PackageCategory::Treasure,
        PackageCategory::NetherLoot,
        PackageCategory::EndLoot,
        PackageCategory::MobDrop,
        PackageCategory::BiomeSpecific,
        PackageCategory::Mystery,
        PackageCategory::DeepDark,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PackageCategory::StarterSurvival => "Starter Survival Package",
            PackageCategory::DungeonLoot => "Dungeon Loot Package",
            PackageCategory::Treasure => "Treasure Package",
            PackageCategory::NetherLoot => "Nether Loot Package",
            PackageCategory::EndLoot => "End Loot Package",
            PackageCategory::MobDrop => "Mob Drop Package",
            PackageCategory::BiomeSpecific => "Biome Package",
            PackageCategory::Mystery => "Mystery Package",
            PackageCategory::DeepDark => "Deep Dark Package",
        }
    }

    /// Stable snake_case key, matches the serde representation.
    pub fn key(&self) -> &'static str {
        match self {
            PackageCategory::StarterSurvival => "starter_survival",
            PackageCategory::DungeonLoot => "dungeon_loot",
            PackageCategory::Treasure => "treasure",
            PackageCategory::NetherLoot => "nether_loot",
            PackageCategory::EndLoot => "end_loot",
            PackageCategory::MobDrop => "mob_drop",
            PackageCategory::BiomeSpecific => "biome_specific",
            PackageCategory::Mystery => "mystery",
            PackageCategory::DeepDark => "deep_dark",
        }
    }

    fn package_path(&self) -> &'static str {
        match self {
            PackageCategory::StarterSurvival => "starter_survival_package",
            PackageCategory::DungeonLoot => "dungeon_loot_package",
            PackageCategory::Treasure => "treasure_package",
            PackageCategory::NetherLoot => "nether_loot_package",
            PackageCategory::EndLoot => "end_loot_package",
            PackageCategory::MobDrop => "mob_drop_package",
            PackageCategory::BiomeSpecific => "biome_package",
            PackageCategory::Mystery => "mystery_package",
            PackageCategory::DeepDark => "deep_dark_package",
        }
    }

    /// Catalog id of the unopened package item for this category.
    pub fn package_item_id(&self) -> CatalogItemId {
        CatalogItemId::new(PACKAGE_NAMESPACE, self.package_path())
    }

    /// Resolve the category a package item opens into.
    pub fn from_package_item(item: &CatalogItemId) -> Result<Self, UnknownCategory> {
        if item.namespace() == PACKAGE_NAMESPACE {
            if let Some(category) = Self::ALL
                .iter()
                .find(|category| category.package_path() == item.path())
            {
                return Ok(*category);
            }
        }
        Err(UnknownCategory(item.to_string()))
    }

    pub fn tooltip(&self) -> [&'static str; 2] {
        match self {
            PackageCategory::StarterSurvival => [
                "Basic tools, food, and supplies",
                "Perfect for new adventurers",
            ],
            PackageCategory::DungeonLoot => [
                "Enchanted gear and rare materials",
                "Found in dark underground places",
            ],
            PackageCategory::Treasure => [
                "Valuable gems and precious items",
                "Buried treasure and riches",
            ],
            PackageCategory::NetherLoot => [
                "Fiery materials from the Nether",
                "Gold, magma, and flame-touched gear",
            ],
            PackageCategory::EndLoot => [
                "Mysterious items from the End",
                "Ender pearls and otherworldly gear",
            ],
            PackageCategory::MobDrop => [
                "Materials dropped by creatures",
                "Bones, strings, and mob essences",
            ],
            PackageCategory::BiomeSpecific => [
                "Resources from various biomes",
                "Forest, desert, ocean, and more",
            ],
            PackageCategory::Mystery => ["???", "Anything could be inside!"],
            PackageCategory::DeepDark => [
                "Relics of the ancient cities",
                "Sculk, echo shards, and silence",
            ],
        }
    }

    /// Full tooltip as shown on the item, including the usage hint.
    pub fn tooltip_lines(&self) -> Vec<&'static str> {
        let [first, second] = self.tooltip();
        vec![first, second, "", "Right-click to open"]
    }

    pub fn opened_message(&self) -> String {
        format!("Opened {}!", self.label())
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PackageCategory {
    type Err = UnknownCategory;

    /// Accepts the snake_case key or the display label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|category| {
                category.key().eq_ignore_ascii_case(needle)
                    || category.label().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}
