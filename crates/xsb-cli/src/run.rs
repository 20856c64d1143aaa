//! `xsband run` — job-spec-driven batch conversion.
//!
//! A job spec is a JSON file describing a whole run: a list of input
//! tables with their layouts and normalization settings, sharing one
//! output container. The first failing input aborts the run.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use xsb_artifact::ArtifactFile;
use xsb_series::{ColumnRoles, InvertedBounds, PerturbativeOrder};

use crate::convert::{convert_into, default_name, ConversionRequest, RatioReference};

/// Top-level job spec.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobSpec {
    /// Output container path.
    pub output: PathBuf,
    /// Branching-ratio scale applied to every input unless overridden.
    #[serde(default)]
    pub branching_ratio: Option<f64>,
    /// Keep inverted uncertainty bounds instead of failing.
    #[serde(default)]
    pub allow_inverted_bounds: bool,
    /// Inputs, converted in order into the shared container.
    pub inputs: Vec<InputSpec>,
}

/// One input table within a job.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    /// Table path.
    pub path: PathBuf,
    /// Artifact base name; defaults to the file stem.
    #[serde(default)]
    pub name: Option<String>,
    /// Layout preset (`eight`, `six`, `five`); defaults to `eight`.
    #[serde(default)]
    pub layout: Option<String>,
    /// Full column-role mapping, overriding `layout` entirely.
    #[serde(default)]
    pub columns: Option<ColumnRoles>,
    /// Branching-ratio override for this input.
    #[serde(default)]
    pub branching_ratio: Option<f64>,
    /// Emit a `<name>_ratio` series normalized to this order, locating the
    /// reference by order-token swap.
    #[serde(default)]
    pub ratio_to: Option<PerturbativeOrder>,
    /// Explicit reference table path (conflicts with `ratio_to`).
    #[serde(default)]
    pub reference: Option<PathBuf>,
    /// Also emit a `<name>_hist` step histogram.
    #[serde(default)]
    pub histogram: bool,
}

impl InputSpec {
    fn to_request(&self, job: &JobSpec) -> Result<ConversionRequest> {
        if self.ratio_to.is_some() && self.reference.is_some() {
            anyhow::bail!(
                "input {}: ratio_to and reference are mutually exclusive",
                self.path.display()
            );
        }
        let roles = match (&self.columns, &self.layout) {
            (Some(columns), _) => columns.clone(),
            (None, Some(preset)) => ColumnRoles::preset(preset)?,
            (None, None) => ColumnRoles::eight(),
        };
        let ratio = match (&self.ratio_to, &self.reference) {
            (Some(order), None) => Some(RatioReference::Order(*order)),
            (None, Some(path)) => Some(RatioReference::Path(path.clone())),
            _ => None,
        };
        Ok(ConversionRequest {
            path: self.path.clone(),
            name: self.name.clone().unwrap_or_else(|| default_name(&self.path)),
            roles,
            scale: self.branching_ratio.or(job.branching_ratio),
            inverted_bounds: if job.allow_inverted_bounds {
                InvertedBounds::Allow
            } else {
                InvertedBounds::Reject
            },
            ratio,
            histogram: self.histogram,
        })
    }
}

pub fn cmd_run(spec_path: &Path, output_override: Option<&PathBuf>) -> Result<()> {
    tracing::info!(path = %spec_path.display(), "loading job spec");
    let text = std::fs::read_to_string(spec_path)
        .with_context(|| format!("failed to read job spec {}", spec_path.display()))?;
    let spec: JobSpec = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse job spec {}", spec_path.display()))?;
    if spec.inputs.is_empty() {
        anyhow::bail!("job spec {} has no inputs", spec_path.display());
    }

    let mut file = ArtifactFile::new()?;
    for input in &spec.inputs {
        let req = input.to_request(&spec)?;
        convert_into(&mut file, &req)
            .with_context(|| format!("failed to convert {}", input.path.display()))?;
    }

    let output = output_override.unwrap_or(&spec.output);
    file.write(output)?;

    eprintln!(
        "Converted {} table{} → {} ({} artifacts)",
        spec.inputs.len(),
        if spec.inputs.len() == 1 { "" } else { "s" },
        output.display(),
        file.artifacts.len(),
    );
    Ok(())
}
