use ahash::AHashSet;
use loot_schema::CatalogItemId;

use crate::catalog::CatalogItem;

/// Administrative and technical items that never appear in loot.
pub const DENIED_ITEMS: &[&str] = &[
    "minecraft:air",
    "minecraft:barrier",
    "minecraft:structure_void",
    "minecraft:structure_block",
    "minecraft:jigsaw",
    "minecraft:command_block",
    "minecraft:repeating_command_block",
    "minecraft:chain_command_block",
    "minecraft:command_block_minecart",
    "minecraft:debug_stick",
    "minecraft:knowledge_book",
    "minecraft:bedrock",
];

/// Path fragments that exclude an item in any namespace.
pub const EXCLUDED_KEYWORDS: &[&str] = &[
    "barrier",
    "structure_void",
    "structure_block",
    "jigsaw",
    "command_block",
    "debug_stick",
    "knowledge_book",
    "bedrock",
];

/// Predicate deciding whether a catalog item may show up in generated loot.
///
/// Stateless apart from its fixed lists; caching happens in
/// [`crate::cache::CatalogCache`].
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    denied: AHashSet<CatalogItemId>,
    keywords: Vec<String>,
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new(
            DENIED_ITEMS
                .iter()
                .filter_map(|raw| CatalogItemId::parse(raw).ok()),
            EXCLUDED_KEYWORDS.iter().copied(),
        )
    }
}

impl EligibilityFilter {
    pub fn new<'a>(
        denied: impl IntoIterator<Item = CatalogItemId>,
        keywords: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            denied: denied.into_iter().collect(),
            keywords: keywords
                .into_iter()
                .map(|keyword| keyword.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Full check including host metadata.
    pub fn is_eligible(&self, item: &CatalogItem) -> bool {
        item.max_stack_size > 0 && self.is_id_eligible(&item.id)
    }

    /// Identity-only part of the check: denylist and path keywords.
    pub fn is_id_eligible(&self, id: &CatalogItemId) -> bool {
        if self.denied.contains(id) {
            return false;
        }
        let path = id.normalized_path();
        !self
            .keywords
            .iter()
            .any(|keyword| path.contains(keyword.as_str()))
    }
}
