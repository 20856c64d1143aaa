//! Binned series with asymmetric errors.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named binned series: per-bin edges, central values, and asymmetric
/// error magnitudes. All arrays share one length (the bin count).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinnedSeries {
    /// Series name (artifact key).
    pub name: String,
    /// Lower edge of each bin.
    pub edge_low: Vec<f64>,
    /// Upper edge of each bin.
    pub edge_high: Vec<f64>,
    /// Bin centers, `(edge_low + edge_high) / 2`.
    pub center: Vec<f64>,
    /// Central value per bin.
    pub value: Vec<f64>,
    /// Downward error magnitude per bin.
    pub err_low: Vec<f64>,
    /// Upward error magnitude per bin.
    pub err_high: Vec<f64>,
}

impl BinnedSeries {
    /// Build a series from edges, values, and error magnitudes.
    ///
    /// Centers are derived here so `center == (edge_low + edge_high) / 2`
    /// holds by construction. Fails if the arrays disagree in length or a
    /// bin has `edge_low >= edge_high`.
    pub fn new(
        name: impl Into<String>,
        edge_low: Vec<f64>,
        edge_high: Vec<f64>,
        value: Vec<f64>,
        err_low: Vec<f64>,
        err_high: Vec<f64>,
    ) -> Result<Self> {
        let name = name.into();
        let n = edge_low.len();
        for (label, len) in [
            ("edge_high", edge_high.len()),
            ("value", value.len()),
            ("err_low", err_low.len()),
            ("err_high", err_high.len()),
        ] {
            if len != n {
                return Err(Error::Validation(format!(
                    "series '{name}': {label} has {len} entries, expected {n}"
                )));
            }
        }
        for i in 0..n {
            if !(edge_low[i] < edge_high[i]) {
                return Err(Error::Validation(format!(
                    "series '{name}': bin {i} has edge_low {} >= edge_high {}",
                    edge_low[i], edge_high[i]
                )));
            }
        }
        let center = edge_low.iter().zip(&edge_high).map(|(lo, hi)| (lo + hi) / 2.0).collect();
        Ok(Self { name, edge_low, edge_high, center, value, err_low, err_high })
    }

    /// Number of bins.
    pub fn n_bins(&self) -> usize {
        self.value.len()
    }

    /// Whether adjacent bins share a boundary (`edge_high[i] == edge_low[i+1]`).
    pub fn is_contiguous(&self) -> bool {
        self.edge_high.iter().zip(self.edge_low.iter().skip(1)).all(|(hi, lo)| hi == lo)
    }

    /// The `n_bins + 1` edge array of a contiguous series.
    ///
    /// Fails if any pair of adjacent bins does not share a boundary, since
    /// a single edge array cannot represent gaps or overlaps.
    pub fn contiguous_edges(&self) -> Result<Vec<f64>> {
        if self.n_bins() == 0 {
            return Err(Error::Validation(format!("series '{}' has no bins", self.name)));
        }
        for i in 0..self.n_bins() - 1 {
            if self.edge_high[i] != self.edge_low[i + 1] {
                return Err(Error::Validation(format!(
                    "series '{}': bins {i} and {} do not share a boundary ({} vs {})",
                    self.name,
                    i + 1,
                    self.edge_high[i],
                    self.edge_low[i + 1]
                )));
            }
        }
        let mut edges = self.edge_low.clone();
        edges.push(self.edge_high[self.n_bins() - 1]);
        Ok(edges)
    }
}
