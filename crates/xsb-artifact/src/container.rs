//! The single-file JSON artifact container.
//!
//! One container per run: built in memory, written once, overwritten
//! wholesale on the next run. There is no update or delete path.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use xsb_core::{Error, Result};

use crate::artifact::Artifact;

/// Container schema version.
pub const SCHEMA_VERSION: &str = "xsband_container_v1";

/// Provenance metadata stored alongside the artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerMeta {
    /// Producing tool name.
    pub tool: String,
    /// Producing tool version.
    pub tool_version: String,
    /// Wall-clock creation time, milliseconds since the Unix epoch.
    pub created_unix_ms: u128,
}

/// A named collection of artifacts, serialized as one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactFile {
    /// Schema version of this container.
    pub schema_version: String,
    /// Provenance metadata.
    pub meta: ContainerMeta,
    /// The artifacts, in insertion order.
    pub artifacts: Vec<Artifact>,
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| Error::Validation(format!("system time error: {e}")))?;
    Ok(d.as_millis())
}

impl ArtifactFile {
    /// New empty container stamped with tool provenance.
    pub fn new() -> Result<Self> {
        Ok(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            meta: ContainerMeta {
                tool: "xsband".to_string(),
                tool_version: env!("CARGO_PKG_VERSION").to_string(),
                created_unix_ms: now_unix_ms()?,
            },
            artifacts: Vec::new(),
        })
    }

    /// Add an artifact. Names are the lookup key for the plotting
    /// collaborator, so duplicates are rejected.
    pub fn add(&mut self, artifact: Artifact) -> Result<()> {
        if self.artifacts.iter().any(|a| a.name() == artifact.name()) {
            return Err(Error::Validation(format!(
                "container already holds an artifact named '{}'",
                artifact.name()
            )));
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    /// Write the container as pretty JSON, replacing any prior file.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        tracing::info!(
            path = %path.display(),
            artifacts = self.artifacts.len(),
            "wrote artifact container"
        );
        Ok(())
    }

    /// Read a container back from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let file: Self = serde_json::from_str(&text)?;
        if file.schema_version != SCHEMA_VERSION {
            return Err(Error::Validation(format!(
                "{}: unsupported container schema '{}' (expected '{SCHEMA_VERSION}')",
                path.display(),
                file.schema_version
            )));
        }
        Ok(file)
    }

    /// Artifact names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|a| a.name()).collect()
    }

    /// Look up an artifact by name.
    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.name() == name)
    }
}
