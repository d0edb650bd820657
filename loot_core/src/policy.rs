//! Per-category generation policies.
//!
//! Every category is a fixed script of steps. Entries come out in the order
//! the steps are declared; only quantities, gates and choices are random.

use std::sync::Arc;

use ahash::AHashSet;
use loot_schema::{CatalogItemId, LootEntry, PackageCategory};

use crate::cache::EligibleItemPool;
use crate::quantity::QuantityHeuristic;
use crate::random::RandomSource;

/// Entry produced when mystery generation finds nothing to sample.
pub const MYSTERY_FALLBACK: (&str, u32) = ("diamond", 1);

/// Draw attempts allowed per wanted mystery item before giving up on
/// duplicates.
const MYSTERY_DRAW_ATTEMPTS_PER_ITEM: usize = 64;

/// Themes a biome package can roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BiomeTheme {
    Jungle,
    Desert,
    Snowy,
    Ocean,
    Forest,
    Mountain,
}

impl BiomeTheme {
    pub const ALL: [BiomeTheme; 6] = [
        BiomeTheme::Jungle,
        BiomeTheme::Desert,
        BiomeTheme::Snowy,
        BiomeTheme::Ocean,
        BiomeTheme::Forest,
        BiomeTheme::Mountain,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BiomeTheme::Jungle => "jungle",
            BiomeTheme::Desert => "desert",
            BiomeTheme::Snowy => "snowy",
            BiomeTheme::Ocean => "ocean",
            BiomeTheme::Forest => "forest",
            BiomeTheme::Mountain => "mountain",
        }
    }

    pub fn sample(rng: &mut dyn RandomSource) -> Self {
        Self::ALL[rng.pick_index(Self::ALL.len())]
    }
}

/// Accumulates entries for one generation call.
struct LootScript<'r> {
    rng: &'r mut dyn RandomSource,
    entries: Vec<LootEntry>,
}

impl<'r> LootScript<'r> {
    fn new(rng: &'r mut dyn RandomSource) -> Self {
        Self {
            rng,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, path: &str, min: u32, max: u32) {
        let quantity = self.rng.range_inclusive(min, max);
        self.entries
            .push(LootEntry::new(CatalogItemId::builtin(path), quantity));
    }

    fn add_one(&mut self, path: &str) {
        self.entries
            .push(LootEntry::single(CatalogItemId::builtin(path)));
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.rng.chance(probability)
    }

    fn add_if(&mut self, probability: f32, path: &str, min: u32, max: u32) {
        if self.chance(probability) {
            self.add(path, min, max);
        }
    }

    fn add_one_if(&mut self, probability: f32, path: &str) {
        if self.chance(probability) {
            self.add_one(path);
        }
    }

    fn choose<'c>(&mut self, candidates: &[&'c str]) -> &'c str {
        candidates[self.rng.pick_index(candidates.len())]
    }

    fn add_choice(&mut self, candidates: &[&str], min: u32, max: u32) {
        let path = self.choose(candidates);
        self.add(path, min, max);
    }

    fn add_one_of(&mut self, candidates: &[&str]) {
        let path = self.choose(candidates);
        self.add_one(path);
    }

    fn finish(self) -> Vec<LootEntry> {
        self.entries
    }
}

/// Dispatches a category to its generation script.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackagePolicies {
    quantity: QuantityHeuristic,
}

impl PackagePolicies {
    pub fn new(quantity: QuantityHeuristic) -> Self {
        Self { quantity }
    }

    /// Whether `category` draws from the eligible pool rather than a fixed
    /// table.
    pub fn samples_catalog(category: PackageCategory) -> bool {
        matches!(category, PackageCategory::Mystery)
    }

    /// Generate the loot for `category`.
    ///
    /// `pool` is only invoked for catalog-sampled categories, so the catalog
    /// cache is never touched for the fixed tables.
    pub fn generate<F>(
        &self,
        category: PackageCategory,
        rng: &mut dyn RandomSource,
        pool: F,
    ) -> Vec<LootEntry>
    where
        F: FnOnce() -> Arc<EligibleItemPool>,
    {
        match category {
            PackageCategory::StarterSurvival => starter_survival(rng),
            PackageCategory::DungeonLoot => dungeon_loot(rng),
            PackageCategory::Treasure => treasure(rng),
            PackageCategory::NetherLoot => nether_loot(rng),
            PackageCategory::EndLoot => end_loot(rng),
            PackageCategory::MobDrop => mob_drop(rng),
            PackageCategory::BiomeSpecific => {
                let theme = BiomeTheme::sample(rng);
                tracing::info!(
                    target: "loot_packages::engine",
                    theme = theme.label(),
                    "biome_package.theme"
                );
                self.biome_loot(theme, rng)
            }
            PackageCategory::Mystery => self.mystery_loot(&pool(), rng),
            PackageCategory::DeepDark => deep_dark(rng),
        }
    }

    /// Fixed script for one biome theme.
    pub fn biome_loot(&self, theme: BiomeTheme, rng: &mut dyn RandomSource) -> Vec<LootEntry> {
        let mut loot = LootScript::new(rng);
        match theme {
            BiomeTheme::Jungle => {
                loot.add("melon_slice", 8, 16);
                loot.add("bamboo", 16, 32);
                loot.add("cocoa_beans", 4, 8);
                loot.add("jungle_log", 8, 24);
            }
            BiomeTheme::Desert => {
                loot.add("sand", 16, 48);
                loot.add("cactus", 4, 8);
                loot.add("gold_nugget", 8, 16);
                loot.add("dead_bush", 2, 5);
            }
            BiomeTheme::Snowy => {
                loot.add("packed_ice", 8, 16);
                loot.add("snowball", 16, 32);
                loot.add("rabbit_hide", 3, 6);
                loot.add("spruce_log", 8, 24);
            }
            BiomeTheme::Ocean => {
                loot.add("prismarine", 8, 24);
                loot.add("kelp", 12, 24);
                loot.add_one_if(0.1, "trident");
                loot.add("cod", 4, 8);
            }
            BiomeTheme::Forest => {
                loot.add("oak_log", 12, 28);
                loot.add("apple", 6, 12);
                loot.add("sweet_berries", 8, 16);
                loot.add("mushroom_stew", 2, 4);
            }
            BiomeTheme::Mountain => {
                loot.add("stone", 16, 32);
                loot.add("coal", 8, 16);
                loot.add("iron_ore", 3, 6);
                loot.add("emerald", 1, 3);
            }
        }
        loot.finish()
    }

    /// Random distinct items from the eligible pool, with the fixed fallback
    /// when the pool is empty.
    pub fn mystery_loot(
        &self,
        pool: &EligibleItemPool,
        rng: &mut dyn RandomSource,
    ) -> Vec<LootEntry> {
        if pool.is_empty() {
            tracing::warn!(
                target: "loot_packages::engine",
                generation = pool.generation(),
                "mystery_package.pool_empty"
            );
            return vec![mystery_fallback()];
        }

        let target = rng.range_inclusive(2, 5) as usize;
        let wanted = target.min(pool.len());
        let max_attempts = wanted * MYSTERY_DRAW_ATTEMPTS_PER_ITEM;
        let mut chosen: AHashSet<&CatalogItemId> = AHashSet::with_capacity(wanted);
        let mut entries = Vec::with_capacity(wanted);
        let mut attempts = 0;

        while entries.len() < wanted && attempts < max_attempts {
            attempts += 1;
            let Some(item) = pool.get(rng.pick_index(pool.len())) else {
                continue;
            };
            if !chosen.insert(&item.id) {
                continue;
            }
            let quantity = self.quantity.sample_mystery_quantity(item, rng);
            entries.push(LootEntry::new(item.id.clone(), quantity));
        }

        if entries.len() < wanted {
            tracing::debug!(
                target: "loot_packages::engine",
                wanted,
                drawn = entries.len(),
                attempts,
                "mystery_package.draws_exhausted"
            );
        }
        if entries.is_empty() {
            entries.push(mystery_fallback());
        }
        entries
    }
}

pub fn mystery_fallback() -> LootEntry {
    let (path, quantity) = MYSTERY_FALLBACK;
    LootEntry::new(CatalogItemId::builtin(path), quantity)
}

fn starter_survival(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    loot.add_one_of(&[
        "wooden_pickaxe",
        "wooden_axe",
        "wooden_shovel",
        "stone_pickaxe",
        "stone_axe",
        "stone_shovel",
    ]);
    let foods = [
        "bread",
        "apple",
        "cooked_beef",
        "cooked_porkchop",
        "cooked_chicken",
    ];
    for _ in 0..2 {
        loot.add_choice(&foods, 4, 12);
    }
    loot.add("torch", 16, 32);
    loot.add_one("crafting_table");
    loot.add_choice(&["wheat_seeds", "beetroot_seeds", "carrot", "potato"], 2, 5);
    if loot.chance(0.5) {
        loot.add_one_of(&[
            "leather_helmet",
            "leather_chestplate",
            "leather_leggings",
            "leather_boots",
        ]);
    }
    loot.add("oak_planks", 16, 48);
    loot.finish()
}

fn dungeon_loot(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    // TODO: roll enchantments once the inventory collaborator can carry item data.
    loot.add_one_of(&["iron_sword", "iron_pickaxe", "iron_helmet", "iron_chestplate"]);
    loot.add_choice(&["gold_ingot", "lapis_lazuli", "redstone"], 2, 7);
    loot.add_choice(
        &["glowstone_dust", "redstone", "spider_eye", "golden_carrot"],
        1,
        3,
    );
    loot.add_one_if(0.3, "music_disc_cat");
    loot.add("bone", 3, 7);
    loot.add("string", 1, 4);
    loot.finish()
}

fn treasure(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    loot.add("diamond", 1, 3);
    loot.add("emerald", 2, 5);
    loot.add("gold_ingot", 3, 8);
    loot.add_one_if(0.4, "heart_of_the_sea");
    loot.add_if(0.6, "nautilus_shell", 1, 3);
    loot.add_one("map");
    loot.add_one("compass");
    loot.add_one_of(&["diamond_sword", "diamond_pickaxe", "bow"]);
    loot.finish()
}

fn nether_loot(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    loot.add("gold_block", 1, 3);
    loot.add_if(0.2, "netherite_scrap", 1, 2);
    loot.add("magma_cream", 2, 5);
    loot.add("ghast_tear", 1, 2);
    loot.add("blaze_rod", 1, 3);
    loot.add("fire_charge", 3, 7);
    loot.add("blackstone", 8, 24);
    loot.add_if(0.3, "crying_obsidian", 1, 3);
    loot.add_if(0.4, "chain", 2, 5);
    loot.finish()
}

fn end_loot(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    loot.add_one_if(0.1, "elytra");
    loot.add_if(0.3, "shulker_shell", 1, 2);
    loot.add("ender_pearl", 4, 12);
    loot.add("chorus_fruit", 6, 16);
    loot.add("chorus_flower", 1, 3);
    loot.add_one_of(&["diamond_sword", "diamond_pickaxe", "diamond_chestplate"]);
    loot.add("end_stone", 16, 32);
    loot.add("end_rod", 4, 8);
    loot.add("experience_bottle", 5, 15);
    loot.finish()
}

fn mob_drop(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    let drops = [
        "blaze_rod",
        "phantom_membrane",
        "spider_eye",
        "slime_ball",
        "ghast_tear",
        "ender_pearl",
        "bone",
        "string",
        "gunpowder",
    ];
    for _ in 0..3 {
        loot.add_choice(&drops, 1, 4);
    }
    if loot.chance(0.2) {
        loot.add_one_of(&["iron_sword", "bow", "iron_helmet"]);
    }
    loot.add_if(0.3, "cobweb", 2, 5);
    loot.finish()
}

fn deep_dark(rng: &mut dyn RandomSource) -> Vec<LootEntry> {
    let mut loot = LootScript::new(rng);
    loot.add("echo_shard", 2, 5);
    loot.add("sculk", 8, 24);
    loot.add_if(0.4, "sculk_sensor", 1, 2);
    loot.add_one_if(0.2, "sculk_catalyst");
    loot.add_if(0.3, "disc_fragment_5", 1, 3);
    loot.add_choice(&["candle", "amethyst_shard", "glow_ink_sac"], 2, 6);
    loot.add_one_if(0.15, "recovery_compass");
    loot.finish()
}
