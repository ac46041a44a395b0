use crate::backend::EngineRequest;
use crate::error::ArtifactError;
use crate::operation::CompiledOperation;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// The ordered operation list produced by one compilation, in a form that can
/// be stored and handed to the engine later.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CompiledFlow {
    pub operations: Vec<CompiledOperation>,
}

impl CompiledFlow {
    pub fn new(operations: Vec<CompiledOperation>) -> Self {
        Self { operations }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Builds the request the execution engine receives for `input_path`.
    pub fn to_engine_request(&self, input_path: impl Into<String>) -> EngineRequest {
        EngineRequest::new(input_path, &self.operations)
    }

    /// Saves the compiled flow to a file using the bincode format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let bytes = encode_to_vec(self, standard())
            .map_err(|e| ArtifactError::Encode(e.to_string()))?;
        let mut file = fs::File::create(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        file.write_all(&bytes).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    /// Loads a compiled flow from a file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let mut file = fs::File::open(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| ArtifactError::Io {
                path: path.display().to_string(),
                source,
            })?;
        Self::from_bytes(&bytes)
    }

    /// Deserializes a compiled flow from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ArtifactError> {
        decode_from_slice(bytes, standard())
            .map(|(flow, _)| flow) // bincode 2 returns (data, bytes_read)
            .map_err(|e| ArtifactError::Decode(e.to_string()))
    }
}
