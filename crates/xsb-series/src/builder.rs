//! Series construction from raw table rows.

use std::path::Path;

use xsb_core::{BinnedSeries, Error, Result};

use crate::layout::ColumnRoles;

/// What to do when an uncertainty bound crosses the central value, which
/// would make the derived error magnitude negative.
///
/// Scale-variation envelopes can legitimately invert, so rejecting is the
/// default and keeping the signed magnitude is an explicit opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvertedBounds {
    /// Fail with a validation error naming the offending bin.
    #[default]
    Reject,
    /// Keep the signed magnitude and log a warning.
    Allow,
}

/// Builds a [`BinnedSeries`] from a raw table, one configuration per input
/// layout: column roles, optional multiplicative scale (branching ratio),
/// and the inverted-bounds policy.
#[derive(Debug, Clone)]
pub struct SeriesBuilder {
    roles: ColumnRoles,
    scale: Option<f64>,
    inverted_bounds: InvertedBounds,
}

impl SeriesBuilder {
    /// New builder for the given column-role mapping.
    pub fn new(roles: ColumnRoles) -> Self {
        Self { roles, scale: None, inverted_bounds: InvertedBounds::default() }
    }

    /// Multiply value and both bounds by `factor` before error derivation,
    /// so the derived errors scale with the central value.
    pub fn scale(mut self, factor: f64) -> Self {
        self.scale = Some(factor);
        self
    }

    /// Set the inverted-bounds policy.
    pub fn inverted_bounds(mut self, policy: InvertedBounds) -> Self {
        self.inverted_bounds = policy;
        self
    }

    /// Load a table from `path` and build the series named `name`.
    pub fn load(&self, name: impl Into<String>, path: impl AsRef<Path>) -> Result<BinnedSeries> {
        let rows = xsb_table::read_table(path, &self.roles.usecols()?)?;
        self.from_rows(name, &rows)
    }

    /// Build a series from rows already arranged in canonical role order
    /// (see [`ColumnRoles::usecols`]).
    pub fn from_rows(&self, name: impl Into<String>, rows: &[Vec<f64>]) -> Result<BinnedSeries> {
        let name = name.into();
        let has_bounds = self.roles.has_bounds()?;
        match self.roles {
            ColumnRoles::ExplicitRange { .. } => self.from_explicit_rows(name, rows, has_bounds),
            ColumnRoles::ConsecutiveEdge { .. } => self.from_edge_rows(name, rows, has_bounds),
        }
    }

    fn from_explicit_rows(
        &self,
        name: String,
        rows: &[Vec<f64>],
        has_bounds: bool,
    ) -> Result<BinnedSeries> {
        if rows.is_empty() {
            return Err(Error::Validation(format!("series '{name}': input table has no rows")));
        }
        let n = rows.len();
        let mut edge_low = Vec::with_capacity(n);
        let mut edge_high = Vec::with_capacity(n);
        let mut value = Vec::with_capacity(n);
        let mut bounds = has_bounds.then(|| (Vec::with_capacity(n), Vec::with_capacity(n)));
        for row in rows {
            edge_low.push(row[0]);
            edge_high.push(row[1]);
            value.push(row[2]);
            if let Some((low, high)) = &mut bounds {
                low.push(row[3]);
                high.push(row[4]);
            }
        }
        self.finish(name, edge_low, edge_high, value, bounds)
    }

    fn from_edge_rows(
        &self,
        name: String,
        rows: &[Vec<f64>],
        has_bounds: bool,
    ) -> Result<BinnedSeries> {
        if rows.len() < 2 {
            return Err(Error::Validation(format!(
                "series '{name}': consecutive-edge table needs at least 2 rows, got {}",
                rows.len()
            )));
        }
        // Bin i spans [edge[i], edge[i+1]]; the last row only closes the
        // final bin and its value columns are never read.
        let n = rows.len() - 1;
        let mut edge_low = Vec::with_capacity(n);
        let mut edge_high = Vec::with_capacity(n);
        let mut value = Vec::with_capacity(n);
        let mut bounds = has_bounds.then(|| (Vec::with_capacity(n), Vec::with_capacity(n)));
        for i in 0..n {
            edge_low.push(rows[i][0]);
            edge_high.push(rows[i + 1][0]);
            value.push(rows[i][1]);
            if let Some((low, high)) = &mut bounds {
                low.push(rows[i][2]);
                high.push(rows[i][3]);
            }
        }
        self.finish(name, edge_low, edge_high, value, bounds)
    }

    fn finish(
        &self,
        name: String,
        edge_low: Vec<f64>,
        edge_high: Vec<f64>,
        mut value: Vec<f64>,
        mut bounds: Option<(Vec<f64>, Vec<f64>)>,
    ) -> Result<BinnedSeries> {
        if let Some(k) = self.scale {
            for v in value.iter_mut() {
                *v *= k;
            }
            if let Some((low_bound, high_bound)) = &mut bounds {
                for v in low_bound.iter_mut().chain(high_bound.iter_mut()) {
                    *v *= k;
                }
            }
        }

        let n = value.len();
        let (mut err_low, mut err_high) = (Vec::with_capacity(n), Vec::with_capacity(n));
        match &bounds {
            None => {
                err_low.resize(n, 0.0);
                err_high.resize(n, 0.0);
            }
            Some((low_bound, high_bound)) => {
                for i in 0..n {
                    let lo = value[i] - low_bound[i];
                    let hi = high_bound[i] - value[i];
                    for (magnitude, which) in [(lo, "low"), (hi, "high")] {
                        if magnitude < 0.0 {
                            match self.inverted_bounds {
                                InvertedBounds::Reject => {
                                    return Err(Error::Validation(format!(
                                        "series '{name}': bin {i} {which} bound crosses the \
                                         central value (derived error {magnitude}); pass the \
                                         inverted-bounds opt-in to keep it"
                                    )));
                                }
                                InvertedBounds::Allow => {
                                    tracing::warn!(
                                        series = %name,
                                        bin = i,
                                        bound = which,
                                        magnitude,
                                        "keeping inverted uncertainty bound"
                                    );
                                }
                            }
                        }
                    }
                    err_low.push(lo);
                    err_high.push(hi);
                }
            }
        }

        BinnedSeries::new(name, edge_low, edge_high, value, err_low, err_high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ColumnRoles;
    use approx::assert_abs_diff_eq;

    // Rows in canonical role order: lo, hi, value, low_bound, high_bound.
    fn explicit_rows() -> Vec<Vec<f64>> {
        vec![vec![0.0, 10.0, 5.0, 4.0, 6.0], vec![10.0, 20.0, 15.0, 13.0, 17.0]]
    }

    #[test]
    fn explicit_range_derives_centers_and_errors() {
        let s = SeriesBuilder::new(ColumnRoles::eight()).from_rows("pt", &explicit_rows()).unwrap();
        assert_eq!(s.n_bins(), 2);
        assert_eq!(s.center, vec![5.0, 15.0]);
        assert_eq!(s.value, vec![5.0, 15.0]);
        assert_eq!(s.err_low, vec![1.0, 2.0]);
        assert_eq!(s.err_high, vec![1.0, 2.0]);
    }

    #[test]
    fn consecutive_edges_make_one_less_bin() {
        // edge, value, low_bound, high_bound
        let rows = vec![
            vec![0.0, 1.0, 0.9, 1.1],
            vec![10.0, 0.8, 0.7, 0.9],
            vec![20.0, 0.6, 0.5, 0.7],
        ];
        let s = SeriesBuilder::new(ColumnRoles::five()).from_rows("ht", &rows).unwrap();
        assert_eq!(s.n_bins(), 2);
        assert_eq!(s.edge_low, vec![0.0, 10.0]);
        assert_eq!(s.edge_high, vec![10.0, 20.0]);
        // Last row's value columns are only the closing edge.
        assert_eq!(s.value, vec![1.0, 0.8]);
        for i in 0..s.n_bins() - 1 {
            assert_eq!(s.edge_high[i], s.edge_low[i + 1]);
        }
    }

    #[test]
    fn bare_edge_value_table_scales_without_errors() {
        let rows = vec![vec![0.0, 1.0], vec![10.0, 0.8], vec![20.0, 0.6]];
        let s = SeriesBuilder::new(ColumnRoles::edge_value())
            .scale(0.5)
            .from_rows("ht", &rows)
            .unwrap();
        assert_eq!(s.n_bins(), 2);
        assert_eq!(s.edge_low, vec![0.0, 10.0]);
        assert_eq!(s.edge_high, vec![10.0, 20.0]);
        assert_eq!(s.value, vec![0.5, 0.4]);
        assert_eq!(s.err_low, vec![0.0, 0.0]);
        assert_eq!(s.err_high, vec![0.0, 0.0]);
    }

    #[test]
    fn scale_applies_before_error_derivation() {
        let rows =
            vec![vec![0.0, 1.0, 0.5, 1.5], vec![10.0, 0.8, 0.3, 1.3], vec![20.0, 0.0, 0.0, 0.0]];
        let k = 0.5;
        let scaled =
            SeriesBuilder::new(ColumnRoles::five()).scale(k).from_rows("s", &rows).unwrap();
        let plain = SeriesBuilder::new(ColumnRoles::five()).from_rows("s", &rows).unwrap();
        assert_eq!(scaled.value, vec![0.5, 0.4]);
        for i in 0..scaled.n_bins() {
            // Scaling bounds first and deriving errors equals deriving then
            // scaling: both are k * original error.
            assert_abs_diff_eq!(scaled.err_low[i], k * plain.err_low[i], epsilon = 1e-12);
            assert_abs_diff_eq!(scaled.err_high[i], k * plain.err_high[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn inverted_bound_is_rejected_by_default() {
        // low_bound above the central value.
        let rows = vec![vec![0.0, 10.0, 5.0, 5.5, 6.0]];
        let err = SeriesBuilder::new(ColumnRoles::eight()).from_rows("bad", &rows).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bin 0") && msg.contains("low bound"), "{msg}");
    }

    #[test]
    fn inverted_bound_kept_when_allowed() {
        let rows = vec![vec![0.0, 10.0, 5.0, 5.5, 6.0]];
        let s = SeriesBuilder::new(ColumnRoles::eight())
            .inverted_bounds(InvertedBounds::Allow)
            .from_rows("envelope", &rows)
            .unwrap();
        assert_eq!(s.err_low, vec![-0.5]);
        assert_eq!(s.err_high, vec![1.0]);
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(SeriesBuilder::new(ColumnRoles::eight()).from_rows("e", &[]).is_err());
        let one_edge = vec![vec![0.0, 1.0, 0.9, 1.1]];
        assert!(SeriesBuilder::new(ColumnRoles::five()).from_rows("e", &one_edge).is_err());
    }
}
