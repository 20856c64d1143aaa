//! `xsband convert` — table → artifact conversion pipeline.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use xsb_artifact::{Artifact, ArtifactFile};
use xsb_series::{
    normalize, reference_path, ColumnRoles, InvertedBounds, PerturbativeOrder, SeriesBuilder,
};

/// How the normalization denominator is located.
#[derive(Debug, Clone)]
pub enum RatioReference {
    /// Derived from the numerator path by order-token swap.
    Order(PerturbativeOrder),
    /// Explicit table path.
    Path(PathBuf),
}

/// One table → artifacts conversion.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Input table path.
    pub path: PathBuf,
    /// Artifact base name; the ratio and histogram artifacts derive
    /// `<name>_ratio` / `<name>_hist` from it.
    pub name: String,
    /// Column-role mapping.
    pub roles: ColumnRoles,
    /// Optional branching-ratio scale.
    pub scale: Option<f64>,
    /// Inverted-bounds policy.
    pub inverted_bounds: InvertedBounds,
    /// Optional ratio normalization.
    pub ratio: Option<RatioReference>,
    /// Also emit a step histogram.
    pub histogram: bool,
}

/// Default artifact name for an input: its file stem.
pub fn default_name(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| {
        path.to_string_lossy().into_owned()
    })
}

/// Run one conversion and add its artifacts to the container.
pub fn convert_into(file: &mut ArtifactFile, req: &ConversionRequest) -> Result<()> {
    let mut builder =
        SeriesBuilder::new(req.roles.clone()).inverted_bounds(req.inverted_bounds);
    if let Some(k) = req.scale {
        builder = builder.scale(k);
    }

    tracing::info!(path = %req.path.display(), name = %req.name, "converting table");
    let series = builder
        .load(&req.name, &req.path)
        .with_context(|| format!("failed to load table {}", req.path.display()))?;

    file.add(Artifact::point_series(&series))?;

    if req.histogram {
        let mut hist = series.clone();
        hist.name = format!("{}_hist", req.name);
        let artifact = Artifact::step_histogram(&hist)
            .with_context(|| format!("series '{}' cannot be a step histogram", req.name))?;
        file.add(artifact)?;
    }

    if let Some(ratio) = &req.ratio {
        let ref_path = match ratio {
            RatioReference::Path(p) => p.clone(),
            RatioReference::Order(order) => reference_path(&req.path, *order)?,
        };
        if !ref_path.exists() {
            anyhow::bail!(
                "reference table {} does not exist (numerator {})",
                ref_path.display(),
                req.path.display()
            );
        }
        let reference = builder
            .load(default_name(&ref_path), &ref_path)
            .with_context(|| format!("failed to load reference table {}", ref_path.display()))?;

        let mut ratio_series = normalize(&series, &reference)?;
        ratio_series.name = format!("{}_ratio", req.name);
        file.add(Artifact::point_series(&ratio_series))?;
    }

    Ok(())
}

/// Arguments of `xsband convert`.
pub struct ConvertArgs {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub layout: String,
    pub columns: Vec<String>,
    pub no_bounds: bool,
    pub name: Option<String>,
    pub branching_ratio: Option<f64>,
    pub ratio_to: Option<String>,
    pub reference: Option<PathBuf>,
    pub allow_inverted_bounds: bool,
    pub with_histogram: bool,
}

pub fn cmd_convert(args: ConvertArgs) -> Result<()> {
    if args.name.is_some() && args.inputs.len() > 1 {
        anyhow::bail!("--name applies to a single input; got {}", args.inputs.len());
    }
    if args.ratio_to.is_some() && args.reference.is_some() {
        anyhow::bail!("--ratio-to and --reference are mutually exclusive");
    }

    let mut roles = ColumnRoles::preset(&args.layout)?;
    for spec in &args.columns {
        let (role, index) = parse_column_override(spec)?;
        roles.set(role, index)?;
    }
    if args.no_bounds {
        roles = roles.without_bounds();
    }

    let ratio = match (&args.ratio_to, &args.reference) {
        (Some(label), None) => Some(RatioReference::Order(PerturbativeOrder::parse(label)?)),
        (None, Some(path)) => Some(RatioReference::Path(path.clone())),
        (None, None) => None,
        (Some(_), Some(_)) => anyhow::bail!("unreachable: rejected above"),
    };

    let inverted = if args.allow_inverted_bounds {
        InvertedBounds::Allow
    } else {
        InvertedBounds::Reject
    };

    let mut file = ArtifactFile::new()?;
    for input in &args.inputs {
        let req = ConversionRequest {
            path: input.clone(),
            name: args.name.clone().unwrap_or_else(|| default_name(input)),
            roles: roles.clone(),
            scale: args.branching_ratio,
            inverted_bounds: inverted,
            ratio: ratio.clone(),
            histogram: args.with_histogram,
        };
        convert_into(&mut file, &req)
            .with_context(|| format!("failed to convert {}", input.display()))?;
    }
    file.write(&args.output)?;

    eprintln!(
        "Converted {} table{} → {} ({} artifacts)",
        args.inputs.len(),
        if args.inputs.len() == 1 { "" } else { "s" },
        args.output.display(),
        file.artifacts.len(),
    );
    Ok(())
}

/// Parse a `role=index` column override.
fn parse_column_override(spec: &str) -> Result<(&str, usize)> {
    let (role, index) = spec
        .split_once('=')
        .with_context(|| format!("invalid column override '{spec}': expected role=index"))?;
    let index: usize =
        index.parse().with_context(|| format!("bad column index in '{spec}'"))?;
    Ok((role, index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn convert_emits_point_series_with_derived_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_table(
            dir.path(),
            "pT_thigh__NLO_QCD.dat",
            &[
                "# pT  dsigma  (scale variations)",
                "0 10 5.0 -0.2 4.0 0.2 6.0 0.0",
                "10 20 15.0 -0.13 13.0 0.13 17.0 0.0",
            ],
        );
        let output = dir.path().join("out.json");

        cmd_convert(ConvertArgs {
            inputs: vec![input],
            output: output.clone(),
            layout: "eight".to_string(),
            columns: vec![],
            no_bounds: false,
            name: None,
            branching_ratio: None,
            ratio_to: None,
            reference: None,
            allow_inverted_bounds: false,
            with_histogram: true,
        })
        .unwrap();

        let file = ArtifactFile::open(&output).unwrap();
        assert_eq!(file.names(), vec!["pT_thigh__NLO_QCD", "pT_thigh__NLO_QCD_hist"]);
        let Some(Artifact::PointSeries(p)) = file.get("pT_thigh__NLO_QCD") else {
            panic!("missing point series")
        };
        assert_eq!(p.x, vec![5.0, 15.0]);
        assert_eq!(p.y, vec![5.0, 15.0]);
        assert_eq!(p.ey_low, vec![1.0, 2.0]);
        assert_eq!(p.ey_high, vec![1.0, 2.0]);
        let Some(Artifact::StepHistogram(h)) = file.get("pT_thigh__NLO_QCD_hist") else {
            panic!("missing step histogram")
        };
        assert_eq!(h.bin_edges, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn convert_scales_bare_edge_value_table() {
        let dir = tempfile::tempdir().unwrap();
        let input =
            write_table(dir.path(), "ht.dat", &["0 1.0", "10 0.8", "20 0.6"]);
        let output = dir.path().join("out.json");

        cmd_convert(ConvertArgs {
            inputs: vec![input],
            output: output.clone(),
            layout: "five".to_string(),
            columns: vec![],
            no_bounds: true,
            name: Some("ht".to_string()),
            branching_ratio: Some(0.5),
            ratio_to: None,
            reference: None,
            allow_inverted_bounds: false,
            with_histogram: false,
        })
        .unwrap();

        let file = ArtifactFile::open(&output).unwrap();
        let Some(Artifact::PointSeries(p)) = file.get("ht") else { panic!("missing series") };
        assert_eq!(p.x, vec![5.0, 15.0]);
        assert_eq!(p.y, vec![0.5, 0.4]);
        assert_eq!(p.ey_low, vec![0.0, 0.0]);
    }

    #[test]
    fn ratio_reference_is_derived_from_the_order_token() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_table(
            dir.path(),
            "pT__NLO_QCD.dat",
            &["0 10 2.0 0 1.8 0 2.2 0", "10 20 4.0 0 3.6 0 4.4 0", "20 30 6.0 0 5.4 0 6.6 0"],
        );
        write_table(
            dir.path(),
            "pT__NNLO_QCD.dat",
            &["0 10 1.0 0 0.9 0 1.1 0", "10 20 2.0 0 1.8 0 2.2 0", "20 30 3.0 0 2.7 0 3.3 0"],
        );
        let output = dir.path().join("out.json");

        cmd_convert(ConvertArgs {
            inputs: vec![input],
            output: output.clone(),
            layout: "eight".to_string(),
            columns: vec![],
            no_bounds: false,
            name: None,
            branching_ratio: None,
            ratio_to: Some("nnlo_qcd".to_string()),
            reference: None,
            allow_inverted_bounds: false,
            with_histogram: false,
        })
        .unwrap();

        let file = ArtifactFile::open(&output).unwrap();
        let Some(Artifact::PointSeries(r)) = file.get("pT__NLO_QCD_ratio") else {
            panic!("missing ratio series")
        };
        assert_eq!(r.y, vec![2.0, 2.0, 2.0]);
        // Same binning as the numerator.
        assert_eq!(r.x, vec![5.0, 15.0, 25.0]);
    }

    #[test]
    fn missing_reference_table_names_the_derived_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_table(dir.path(), "pT__NLO_QCD.dat", &["0 10 2.0 0 1.8 0 2.2 0"]);
        let output = dir.path().join("out.json");

        let err = cmd_convert(ConvertArgs {
            inputs: vec![input],
            output,
            layout: "eight".to_string(),
            columns: vec![],
            no_bounds: false,
            name: None,
            branching_ratio: None,
            ratio_to: Some("nnlo_qcd".to_string()),
            reference: None,
            allow_inverted_bounds: false,
            with_histogram: false,
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("pT__NNLO_QCD.dat"), "{err:#}");
    }
}
