//! Output artifact types.

use serde::{Deserialize, Serialize};
use xsb_core::{BinnedSeries, Result};

/// A point series with asymmetric x/y errors: one point per bin at the bin
/// center, with four error magnitudes per point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSeries {
    /// Artifact name.
    pub name: String,
    /// Point x positions (bin centers).
    pub x: Vec<f64>,
    /// Point y values.
    pub y: Vec<f64>,
    /// Downward x error (center − lower edge).
    pub ex_low: Vec<f64>,
    /// Upward x error (upper edge − center).
    pub ex_high: Vec<f64>,
    /// Downward y error magnitude.
    pub ey_low: Vec<f64>,
    /// Upward y error magnitude.
    pub ey_high: Vec<f64>,
}

/// A plain binned-value series: contiguous bin edges and one value per
/// bin, no errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepHistogram {
    /// Artifact name.
    pub name: String,
    /// Bin edges (length = bins + 1).
    pub bin_edges: Vec<f64>,
    /// Per-bin value.
    pub y: Vec<f64>,
}

/// A named, self-describing output artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Artifact {
    /// Point series with asymmetric errors.
    PointSeries(PointSeries),
    /// Step histogram without errors.
    StepHistogram(StepHistogram),
}

impl Artifact {
    /// Convert a binned series into a point-series artifact.
    pub fn point_series(series: &BinnedSeries) -> Self {
        let n = series.n_bins();
        let mut ex_low = Vec::with_capacity(n);
        let mut ex_high = Vec::with_capacity(n);
        for i in 0..n {
            ex_low.push(series.center[i] - series.edge_low[i]);
            ex_high.push(series.edge_high[i] - series.center[i]);
        }
        Self::PointSeries(PointSeries {
            name: series.name.clone(),
            x: series.center.clone(),
            y: series.value.clone(),
            ex_low,
            ex_high,
            ey_low: series.err_low.clone(),
            ey_high: series.err_high.clone(),
        })
    }

    /// Convert a binned series into a step-histogram artifact.
    ///
    /// Fails if the series bins are not contiguous, since a step histogram
    /// stores a single shared edge array.
    pub fn step_histogram(series: &BinnedSeries) -> Result<Self> {
        let bin_edges = series.contiguous_edges()?;
        Ok(Self::StepHistogram(StepHistogram {
            name: series.name.clone(),
            bin_edges,
            y: series.value.clone(),
        }))
    }

    /// Artifact name.
    pub fn name(&self) -> &str {
        match self {
            Self::PointSeries(p) => &p.name,
            Self::StepHistogram(h) => &h.name,
        }
    }

    /// Human-readable artifact kind, for `xsband list` output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PointSeries(_) => "point_series",
            Self::StepHistogram(_) => "step_histogram",
        }
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        match self {
            Self::PointSeries(p) => p.y.len(),
            Self::StepHistogram(h) => h.y.len(),
        }
    }
}
