//! Per-stage configuration registries.
//!
//! Each registry maps a node id to the parameters its editor produced. The
//! compiler only reads them through [`ConfigurationResolver`]; the editing side
//! owns them and may leave entries missing or orphaned.

use crate::error::ParameterError;
use crate::flow::NodeKind;
use crate::operation::{
    CompiledOperation, FilterParams, RawStageConfig, RenameParams, SelectParams,
    StageParameters, StrParams,
};
use ahash::{AHashMap, AHashSet};

/// Resolves a node id to its compiled operation for one node kind.
pub trait ConfigurationResolver: Send + Sync {
    fn node_kind(&self) -> NodeKind;

    /// Returns `None` when the node has no configuration yet.
    fn resolve(&self, node_id: &str) -> Option<CompiledOperation>;
}

/// Typed parameters that a [`StageRegistry`] can hold.
pub trait StageParams:
    Clone + Send + Sync + Into<StageParameters> + for<'a> TryFrom<&'a RawStageConfig, Error = ParameterError>
{
    const KIND: NodeKind;
}

impl StageParams for SelectParams {
    const KIND: NodeKind = NodeKind::Select;
}

impl StageParams for FilterParams {
    const KIND: NodeKind = NodeKind::Filter;
}

impl StageParams for StrParams {
    const KIND: NodeKind = NodeKind::Str;
}

impl StageParams for RenameParams {
    const KIND: NodeKind = NodeKind::Rename;
}

/// The stored configuration of one stage node.
#[derive(Debug, Clone, PartialEq)]
pub struct StageRecord<P> {
    pub node_id: String,
    pub op: String,
    pub params: P,
}

impl<P: StageParams> StageRecord<P> {
    /// Validates a raw editor record into a typed one.
    pub fn from_raw(raw: &RawStageConfig) -> Result<Self, ParameterError> {
        let params = P::try_from(raw)?;
        Ok(Self {
            node_id: raw.id.trim().to_string(),
            op: raw.op.trim().to_string(),
            params,
        })
    }
}

/// Configuration records of one stage kind, keyed by node id.
///
/// Records keep the order they were first inserted in; replacing a record
/// keeps its slot.
#[derive(Debug, Clone)]
pub struct StageRegistry<P> {
    records: Vec<StageRecord<P>>,
    index: AHashMap<String, usize>,
}

pub type SelectRegistry = StageRegistry<SelectParams>;
pub type FilterRegistry = StageRegistry<FilterParams>;
pub type StrRegistry = StageRegistry<StrParams>;
pub type RenameRegistry = StageRegistry<RenameParams>;

impl<P> Default for StageRegistry<P> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: AHashMap::new(),
        }
    }
}

impl<P: StageParams> StageRegistry<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing any previous record for the same node.
    pub fn upsert(&mut self, record: StageRecord<P>) {
        match self.index.get(&record.node_id) {
            Some(&slot) => self.records[slot] = record,
            None => {
                self.index.insert(record.node_id.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Validates and upserts a raw editor record.
    pub fn insert_raw(&mut self, raw: &RawStageConfig) -> Result<(), ParameterError> {
        self.upsert(StageRecord::from_raw(raw)?);
        Ok(())
    }

    pub fn get(&self, node_id: &str) -> Option<&StageRecord<P>> {
        self.index.get(node_id).map(|&slot| &self.records[slot])
    }

    pub fn remove(&mut self, node_id: &str) -> Option<StageRecord<P>> {
        let slot = self.index.remove(node_id)?;
        let record = self.records.remove(slot);
        self.reindex();
        Some(record)
    }

    /// Drops every record whose node id is not in `node_ids`.
    pub fn retain_nodes<'a>(&mut self, node_ids: impl IntoIterator<Item = &'a str>) {
        let keep: AHashSet<&str> = node_ids.into_iter().collect();
        self.records.retain(|record| keep.contains(record.node_id.as_str()));
        self.reindex();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &StageRecord<P>> {
        self.records.iter()
    }

    fn reindex(&mut self) {
        self.index = self
            .records
            .iter()
            .enumerate()
            .map(|(slot, record)| (record.node_id.clone(), slot))
            .collect();
    }
}

impl<P: StageParams> ConfigurationResolver for StageRegistry<P> {
    fn node_kind(&self) -> NodeKind {
        P::KIND
    }

    fn resolve(&self, node_id: &str) -> Option<CompiledOperation> {
        self.get(node_id).map(|record| CompiledOperation {
            node_id: record.node_id.clone(),
            op: record.op.clone(),
            parameters: record.params.clone().into(),
        })
    }
}

/// A resolver backed by a lookup closure, for stage kinds that keep their
/// configuration outside this crate.
pub struct FnResolver<F> {
    kind: NodeKind,
    lookup: F,
}

impl<F> FnResolver<F>
where
    F: Fn(&str) -> Option<CompiledOperation> + Send + Sync,
{
    pub fn new(kind: impl Into<NodeKind>, lookup: F) -> Self {
        Self {
            kind: kind.into(),
            lookup,
        }
    }
}

impl<F> ConfigurationResolver for FnResolver<F>
where
    F: Fn(&str) -> Option<CompiledOperation> + Send + Sync,
{
    fn node_kind(&self) -> NodeKind {
        self.kind.clone()
    }

    fn resolve(&self, node_id: &str) -> Option<CompiledOperation> {
        (self.lookup)(node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename(id: &str, from: &str, to: &str) -> RawStageConfig {
        RawStageConfig {
            id: id.to_string(),
            op: "rename".to_string(),
            column: Some(from.to_string()),
            value: Some(to.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn upsert_replaces_existing_record() {
        let mut registry = RenameRegistry::new();
        registry.insert_raw(&rename("n1", "a", "b")).unwrap();
        registry.insert_raw(&rename("n1", "a", "c")).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("n1").unwrap().params.new_name, "c");
    }

    #[test]
    fn invalid_raw_record_is_not_stored() {
        let mut registry = RenameRegistry::new();
        let mut raw = rename("n1", "a", "b");
        raw.value = None;
        assert!(registry.insert_raw(&raw).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn retain_nodes_drops_orphans() {
        let mut registry = RenameRegistry::new();
        registry.insert_raw(&rename("n1", "a", "b")).unwrap();
        registry.insert_raw(&rename("gone", "c", "d")).unwrap();
        registry.retain_nodes(["n1", "other"]);
        assert!(registry.get("gone").is_none());
        assert!(registry.get("n1").is_some());
    }

    #[test]
    fn resolver_reports_kind_and_absent_nodes() {
        let mut registry = RenameRegistry::new();
        registry.insert_raw(&rename("n1", "a", "b")).unwrap();
        assert_eq!(registry.node_kind(), NodeKind::Rename);
        assert!(registry.resolve("missing").is_none());

        let op = registry.resolve("n1").unwrap();
        assert_eq!(op.op, "rename");
        assert_eq!(op.parameters.kind(), NodeKind::Rename);
    }

    #[test]
    fn iter_keeps_insertion_order() {
        let mut registry = RenameRegistry::new();
        for i in 0..20 {
            let id = format!("n{i}");
            registry.insert_raw(&rename(&id, "a", "b")).unwrap();
        }
        registry.insert_raw(&rename("n3", "a", "z")).unwrap();
        registry.remove("n5");
        let keep: Vec<String> = (0..20).filter(|i| *i != 7).map(|i| format!("n{i}")).collect();
        registry.retain_nodes(keep.iter().map(String::as_str));

        let expected: Vec<String> = (0..20)
            .filter(|i| *i != 5 && *i != 7)
            .map(|i| format!("n{i}"))
            .collect();
        let ids: Vec<&str> = registry.iter().map(|r| r.node_id.as_str()).collect();
        assert_eq!(ids, expected);
        assert_eq!(registry.get("n3").unwrap().params.new_name, "z");
        assert_eq!(registry.get("n19").unwrap().node_id, "n19");
    }

    #[test]
    fn removed_record_no_longer_resolves() {
        let mut registry = RenameRegistry::new();
        registry.insert_raw(&rename("n1", "a", "b")).unwrap();
        assert!(registry.remove("n1").is_some());
        assert!(registry.resolve("n1").is_none());
    }
}
