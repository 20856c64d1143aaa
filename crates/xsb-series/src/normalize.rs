//! Bin-by-bin ratio normalization against a reference series.

use xsb_core::{BinnedSeries, Error, Result};

/// Divide `series` bin-by-bin by the reference's central values.
///
/// Value and both error magnitudes are divided; the binning (edges and
/// centers) is kept from the numerator. A bin-count mismatch or a zero
/// reference value is a hard error, never silent truncation. Edge alignment
/// beyond the count is the caller's contract: no interpolation or
/// re-binning is performed.
pub fn normalize(series: &BinnedSeries, reference: &BinnedSeries) -> Result<BinnedSeries> {
    if series.n_bins() != reference.n_bins() {
        return Err(Error::Validation(format!(
            "cannot normalize '{}' ({} bins) by '{}' ({} bins): bin counts differ",
            series.name,
            series.n_bins(),
            reference.name,
            reference.n_bins()
        )));
    }

    let n = series.n_bins();
    let mut value = Vec::with_capacity(n);
    let mut err_low = Vec::with_capacity(n);
    let mut err_high = Vec::with_capacity(n);
    for i in 0..n {
        let denom = reference.value[i];
        if denom == 0.0 {
            return Err(Error::Validation(format!(
                "cannot normalize '{}' by '{}': reference value is zero in bin {i}",
                series.name, reference.name
            )));
        }
        value.push(series.value[i] / denom);
        err_low.push(series.err_low[i] / denom);
        err_high.push(series.err_high[i] / denom);
    }

    tracing::debug!(
        series = %series.name,
        reference = %reference.name,
        bins = n,
        "normalized series to reference"
    );

    BinnedSeries::new(
        series.name.clone(),
        series.edge_low.clone(),
        series.edge_high.clone(),
        value,
        err_low,
        err_high,
    )
}
