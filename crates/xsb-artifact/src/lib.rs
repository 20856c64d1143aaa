//! # xsb-artifact
//!
//! Plot-friendly output artifacts (point series with asymmetric errors,
//! step histograms) and the single-file JSON container they are persisted
//! in. Artifact names are the contract toward the plotting collaborator:
//! a series and its `_ratio` counterpart share a bin layout exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod container;

pub use artifact::{Artifact, PointSeries, StepHistogram};
pub use container::{ArtifactFile, ContainerMeta, SCHEMA_VERSION};
