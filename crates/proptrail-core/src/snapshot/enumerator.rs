use crate::model::PropertyNode;

/// Read-only view over one record snapshot
///
/// Field paths are stable keys across the before and after snapshots of the
/// same record, so a node found dirty on one side can be paired with its
/// counterpart on the other by path.
pub trait FieldEnumerator {
    /// Field groups (schemas) in iteration order
    fn schemas(&self) -> Vec<&str>;

    /// Top-level property nodes of one group; empty for an unknown group
    fn properties(&self, schema: &str) -> &[PropertyNode];

    /// Look up a node by path (`dc:title`, `/test:complex/string`)
    fn property(&self, path: &str) -> Option<&PropertyNode>;
}

/// Strip exactly one leading `/`
pub fn normalize_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
