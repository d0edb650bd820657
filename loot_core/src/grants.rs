use std::collections::HashMap;

use loot_schema::{RecipientId, PACKAGE_NAMESPACE};

/// Key of the starter flag inside the engine's namespace.
pub const RECEIVED_STARTER_KEY: &str = "received_starter_pack";

/// Narrow view of the host's persistent per-recipient tag storage.
pub trait TagStorage {
    /// Flag stored under `namespace`/`key`, false when never written.
    fn get_flag(&self, recipient: RecipientId, namespace: &str, key: &str) -> bool;

    fn set_flag(&mut self, recipient: RecipientId, namespace: &str, key: &str, value: bool);
}

/// Tag storage kept in memory, keyed by recipient then namespace.
#[derive(Debug, Clone, Default)]
pub struct MemoryTagStorage {
    tags: HashMap<RecipientId, HashMap<String, HashMap<String, bool>>>,
}

impl MemoryTagStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove everything stored for `namespace`, as admin tooling would.
    pub fn clear_namespace(&mut self, recipient: RecipientId, namespace: &str) {
        if let Some(namespaces) = self.tags.get_mut(&recipient) {
            namespaces.remove(namespace);
        }
    }

    pub fn namespaces(&self, recipient: RecipientId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .tags
            .get(&recipient)
            .map(|namespaces| namespaces.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

impl TagStorage for MemoryTagStorage {
    fn get_flag(&self, recipient: RecipientId, namespace: &str, key: &str) -> bool {
        self.tags
            .get(&recipient)
            .and_then(|namespaces| namespaces.get(namespace))
            .and_then(|flags| flags.get(key))
            .copied()
            .unwrap_or(false)
    }

    fn set_flag(&mut self, recipient: RecipientId, namespace: &str, key: &str, value: bool) {
        self.tags
            .entry(recipient)
            .or_default()
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }
}

/// One-time starter grant ledger.
///
/// Only ever reads and writes its own `namespace`/`key` pair.
#[derive(Debug, Clone)]
pub struct GrantTracker {
    namespace: String,
    key: String,
}

impl Default for GrantTracker {
    fn default() -> Self {
        Self::new(PACKAGE_NAMESPACE, RECEIVED_STARTER_KEY)
    }
}

impl GrantTracker {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }

    pub fn has_received_starter(&self, storage: &dyn TagStorage, recipient: RecipientId) -> bool {
        storage.get_flag(recipient, &self.namespace, &self.key)
    }

    /// Set the flag. Returns false when it was already set.
    pub fn mark_received_starter(
        &self,
        storage: &mut dyn TagStorage,
        recipient: RecipientId,
    ) -> bool {
        if self.has_received_starter(storage, recipient) {
            return false;
        }
        storage.set_flag(recipient, &self.namespace, &self.key, true);
        tracing::info!(
            target: "loot_packages::grants",
            %recipient,
            "starter_grant.marked"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_recipients_have_not_received() {
        let storage = MemoryTagStorage::new();
        let tracker = GrantTracker::default();
        assert!(!tracker.has_received_starter(&storage, RecipientId(1)));
    }

    #[test]
    fn marking_is_idempotent() {
        let mut storage = MemoryTagStorage::new();
        let tracker = GrantTracker::default();
        assert!(tracker.mark_received_starter(&mut storage, RecipientId(1)));
        assert!(!tracker.mark_received_starter(&mut storage, RecipientId(1)));
        assert!(tracker.has_received_starter(&storage, RecipientId(1)));
        assert!(!tracker.has_received_starter(&storage, RecipientId(2)));
    }

    #[test]
    fn unrelated_keys_are_untouched() {
        let mut storage = MemoryTagStorage::new();
        storage.set_flag(RecipientId(1), "othermod", RECEIVED_STARTER_KEY, false);
        storage.set_flag(RecipientId(1), PACKAGE_NAMESPACE, "unrelated", true);
        let tracker = GrantTracker::default();
        tracker.mark_received_starter(&mut storage, RecipientId(1));
        assert!(!storage.get_flag(RecipientId(1), "othermod", RECEIVED_STARTER_KEY));
        assert!(storage.get_flag(RecipientId(1), PACKAGE_NAMESPACE, "unrelated"));
        assert_eq!(storage.namespaces(RecipientId(1)), vec![PACKAGE_NAMESPACE, "othermod"]);
    }

    #[test]
    fn external_reset_allows_a_new_grant() {
        let mut storage = MemoryTagStorage::new();
        let tracker = GrantTracker::default();
        tracker.mark_received_starter(&mut storage, RecipientId(3));
        storage.clear_namespace(RecipientId(3), PACKAGE_NAMESPACE);
        assert!(!tracker.has_received_starter(&storage, RecipientId(3)));
        assert!(tracker.mark_received_starter(&mut storage, RecipientId(3)));
    }
}
