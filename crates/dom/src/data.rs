use crate::Id;
use std::any::Any;
use std::collections::HashMap;

/// Per-node key/value store for arbitrary typed values.
///
/// Entries are weakly tied to their node: releasing the node drops them.
/// Writes go through [`Document::put_data`](crate::Document::put_data), which
/// refuses released nodes.
#[derive(Default)]
pub struct NodeData {
    entries: HashMap<Id, HashMap<String, Box<dyn Any>>>,
}

impl NodeData {
    /// Store `value` under `key`, replacing any previous value.
    pub(crate) fn put<T: 'static>(&mut self, node: Id, key: &str, value: T) {
        self.entries
            .entry(node)
            .or_default()
            .insert(key.to_string(), Box::new(value));
    }

    /// `None` when the key is missing or holds a different type.
    pub fn get<T: 'static>(&self, node: Id, key: &str) -> Option<&T> {
        self.entries.get(&node)?.get(key)?.downcast_ref()
    }

    pub fn get_mut<T: 'static>(&mut self, node: Id, key: &str) -> Option<&mut T> {
        self.entries.get_mut(&node)?.get_mut(key)?.downcast_mut()
    }

    pub fn has(&self, node: Id, key: &str) -> bool {
        self.entries
            .get(&node)
            .is_some_and(|m| m.contains_key(key))
    }

    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, node: Id, key: &str) -> bool {
        let Some(map) = self.entries.get_mut(&node) else {
            return false;
        };
        let removed = map.remove(key).is_some();
        if map.is_empty() {
            self.entries.remove(&node);
        }
        removed
    }

    /// Number of nodes holding at least one entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn release(&mut self, node: Id) {
        self.entries.remove(&node);
    }
}

impl std::fmt::Debug for NodeData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeData").field("nodes", &self.entries.len()).finish()
    }
}
