use crate::compiler::Compiler;
use crate::error::{ArtifactError, ParameterError};
use crate::flow::FlowDefinition;
use crate::operation::RawStageConfig;
use crate::registry::{
    FilterRegistry, RenameRegistry, SelectRegistry, StageParams, StageRegistry, StrRegistry,
};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The on-disk layout of a stage snapshot, one list per stage editor.
#[derive(Deserialize, Debug, Default)]
struct RawSnapshot {
    #[serde(default)]
    selects: Vec<RawStageConfig>,
    #[serde(default)]
    filters: Vec<RawStageConfig>,
    #[serde(default)]
    strs: Vec<RawStageConfig>,
    #[serde(default)]
    renames: Vec<RawStageConfig>,
}

/// The four built-in stage registries, bundled.
///
/// Records that fail validation are left out of the registries, so their
/// nodes compile as unconfigured, and are reported in `rejected`.
#[derive(Debug, Clone, Default)]
pub struct StageSnapshot {
    pub selects: SelectRegistry,
    pub filters: FilterRegistry,
    pub strs: StrRegistry,
    pub renames: RenameRegistry,
    pub rejected: Vec<ParameterError>,
}

impl StageSnapshot {
    /// Parses a snapshot from JSON, validating every record.
    ///
    /// Only a malformed document is an error; invalid records end up in
    /// `rejected`.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let raw: RawSnapshot =
            serde_json::from_str(json).map_err(|e| ArtifactError::Decode(e.to_string()))?;
        Ok(Self::from_raw(raw))
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    fn from_raw(raw: RawSnapshot) -> Self {
        let mut snapshot = Self::default();
        let mut rejected = Vec::new();
        load_records(&mut snapshot.selects, &raw.selects, &mut rejected);
        load_records(&mut snapshot.filters, &raw.filters, &mut rejected);
        load_records(&mut snapshot.strs, &raw.strs, &mut rejected);
        load_records(&mut snapshot.renames, &raw.renames, &mut rejected);
        snapshot.rejected = rejected;
        snapshot
    }

    /// A compiler dispatching to all four registries.
    pub fn compiler(&self) -> Compiler<'_> {
        Compiler::builder()
            .with_resolver(&self.selects)
            .with_resolver(&self.filters)
            .with_resolver(&self.strs)
            .with_resolver(&self.renames)
            .build()
    }

    /// Drops configuration for nodes that are no longer part of `flow`.
    pub fn retain_nodes(&mut self, flow: &FlowDefinition) {
        let ids = || flow.nodes.iter().map(|n| n.id.as_str());
        self.selects.retain_nodes(ids());
        self.filters.retain_nodes(ids());
        self.strs.retain_nodes(ids());
        self.renames.retain_nodes(ids());
    }

    /// Total number of configured stages across all registries.
    pub fn len(&self) -> usize {
        self.selects.len() + self.filters.len() + self.strs.len() + self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_records<P: StageParams>(
    registry: &mut StageRegistry<P>,
    records: &[RawStageConfig],
    rejected: &mut Vec<ParameterError>,
) {
    let kind = P::KIND;
    for record in records {
        if let Err(e) = registry.insert_raw(record) {
            tracing::warn!(
                node = %record.id,
                kind = %kind,
                error = %e,
                "skipping invalid stage configuration"
            );
            rejected.push(e);
        }
    }
}
