//! `xsband list` — inspect an artifact container.

use anyhow::{Context, Result};
use std::path::Path;

use xsb_artifact::ArtifactFile;

pub fn cmd_list(input: &Path) -> Result<()> {
    let file = ArtifactFile::open(input)
        .with_context(|| format!("failed to open container {}", input.display()))?;

    println!(
        "{}: {} artifacts (schema {}, written by {} {})",
        input.display(),
        file.artifacts.len(),
        file.schema_version,
        file.meta.tool,
        file.meta.tool_version,
    );
    for artifact in &file.artifacts {
        println!("  {:<40} {:<15} {:>4} bins", artifact.name(), artifact.kind(), artifact.n_bins());
    }
    Ok(())
}
