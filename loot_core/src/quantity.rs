use crate::catalog::CatalogItem;
use crate::random::RandomSource;

pub const GEAR_KEYWORDS: &[&str] = &[
    "sword",
    "pickaxe",
    "axe",
    "shovel",
    "hoe",
    "helmet",
    "chestplate",
    "leggings",
    "boots",
    "elytra",
    "shield",
];
pub const BUILDING_KEYWORDS: &[&str] = &["block", "plank", "log", "stone", "dirt", "sand"];
pub const REFINED_KEYWORDS: &[&str] = &["ingot", "gem", "nugget"];
pub const FOOD_KEYWORDS: &[&str] = &["bread", "cooked", "food"];

/// Quantity bracket an item falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityClass {
    Unstackable,
    Gear,
    Building,
    Refined,
    Food,
    Other,
}

impl QuantityClass {
    /// Inclusive range before the stack-size cap applied to [`QuantityClass::Other`].
    pub fn range(&self) -> (u32, u32) {
        match self {
            QuantityClass::Unstackable | QuantityClass::Gear => (1, 1),
            QuantityClass::Building => (16, 64),
            QuantityClass::Refined => (4, 16),
            QuantityClass::Food => (2, 12),
            QuantityClass::Other => (1, 8),
        }
    }
}

/// Best-effort mapping from an item's name to a plausible stack count.
///
/// Rules are checked in order and the first match wins, so `iron_pickaxe`
/// is gear even though it also contains `axe`, and `gold_block` is a
/// building material rather than refined.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuantityHeuristic;

impl QuantityHeuristic {
    pub fn classify(&self, item: &CatalogItem) -> QuantityClass {
        if item.max_stack_size <= 1 {
            return QuantityClass::Unstackable;
        }
        let name = item.id.normalized_path();
        let matches = |keywords: &[&str]| keywords.iter().any(|keyword| name.contains(keyword));
        if matches(GEAR_KEYWORDS) {
            QuantityClass::Gear
        } else if matches(BUILDING_KEYWORDS) {
            QuantityClass::Building
        } else if matches(REFINED_KEYWORDS) {
            QuantityClass::Refined
        } else if matches(FOOD_KEYWORDS) {
            QuantityClass::Food
        } else {
            QuantityClass::Other
        }
    }

    /// Sample a quantity, always at least 1.
    pub fn sample_quantity(&self, item: &CatalogItem, rng: &mut dyn RandomSource) -> u32 {
        let class = self.classify(item);
        let (min, max) = class.range();
        let amount = match class {
            QuantityClass::Unstackable | QuantityClass::Gear => 1,
            QuantityClass::Other => rng.range_inclusive(min, max).min(item.max_stack_size),
            _ => rng.range_inclusive(min, max),
        };
        amount.max(1)
    }

    /// Smaller amounts used for catalog-sampled mystery loot.
    pub fn sample_mystery_quantity(&self, item: &CatalogItem, rng: &mut dyn RandomSource) -> u32 {
        (self.sample_quantity(item, rng) / 2 + 1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use loot_schema::CatalogItemId;

    fn item(path: &str, stack: u32) -> CatalogItem {
        CatalogItem::new(CatalogItemId::builtin(path), stack)
    }

    #[test]
    fn classification_follows_rule_order() {
        let heuristic = QuantityHeuristic;
        assert_eq!(heuristic.classify(&item("totem_of_undying", 1)), QuantityClass::Unstackable);
        assert_eq!(heuristic.classify(&item("iron_pickaxe", 64)), QuantityClass::Gear);
        assert_eq!(heuristic.classify(&item("oak_log", 64)), QuantityClass::Building);
        assert_eq!(heuristic.classify(&item("gold_block", 64)), QuantityClass::Building);
        assert_eq!(heuristic.classify(&item("iron_ingot", 64)), QuantityClass::Refined);
        assert_eq!(heuristic.classify(&item("cooked_beef", 64)), QuantityClass::Food);
        assert_eq!(heuristic.classify(&item("ender_pearl", 16)), QuantityClass::Other);
    }

    #[test]
    fn unstackable_items_always_get_one() {
        let heuristic = QuantityHeuristic;
        let mut rng = SeededRandom::seeded(5);
        for path in ["diamond", "oak_log", "iron_ingot", "bread"] {
            for _ in 0..50 {
                assert_eq!(heuristic.sample_quantity(&item(path, 1), &mut rng), 1);
            }
        }
    }

    #[test]
    fn ingots_stay_in_refined_range() {
        let heuristic = QuantityHeuristic;
        let mut rng = SeededRandom::seeded(9);
        for stack in [2, 16, 64] {
            for _ in 0..200 {
                let amount = heuristic.sample_quantity(&item("copper_ingot", stack), &mut rng);
                assert!((4..=16).contains(&amount), "got {amount}");
            }
        }
    }

    #[test]
    fn default_range_is_capped_by_stack_size() {
        let heuristic = QuantityHeuristic;
        let mut rng = SeededRandom::seeded(13);
        for _ in 0..200 {
            let amount = heuristic.sample_quantity(&item("egg", 4), &mut rng);
            assert!((1..=4).contains(&amount));
            let amount = heuristic.sample_quantity(&item("stick", 64), &mut rng);
            assert!((1..=8).contains(&amount));
        }
    }

    #[test]
    fn mystery_quantities_are_halved_plus_one() {
        let heuristic = QuantityHeuristic;
        let mut rng = SeededRandom::seeded(21);
        for _ in 0..200 {
            let amount = heuristic.sample_mystery_quantity(&item("sandstone", 64), &mut rng);
            assert!((9..=33).contains(&amount), "got {amount}");
        }
        assert_eq!(
            heuristic.sample_mystery_quantity(&item("diamond_sword", 1), &mut rng),
            1
        );
    }
}
