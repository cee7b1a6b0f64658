use std::collections::HashMap;

/// Per-node render counters. Bumping a node's counter changes its mount key
/// so that node is rebuilt after an in-place edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMap {
    versions: HashMap<String, u64>,
}

impl VersionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> u64 {
        self.versions.get(id).copied().unwrap_or(0)
    }

    /// Increment and return the new version
    pub fn bump(&mut self, id: &str) -> u64 {
        let version = self.versions.entry(id.to_string()).or_insert(0);
        *version += 1;
        *version
    }

    pub fn forget(&mut self, id: &str) {
        self.versions.remove(id);
    }

    pub fn clear(&mut self) {
        self.versions.clear();
    }
}
