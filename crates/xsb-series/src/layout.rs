//! Column-role mappings for the known input table layouts.

use serde::{Deserialize, Serialize};
use xsb_core::{Error, Result};

/// How bin edges are encoded in the input rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinGeometry {
    /// Each row carries its own `[low, high]` edge pair; bin count = rows.
    ExplicitRange,
    /// Each row carries a single edge; bin `i` spans `[edge[i], edge[i+1]]`
    /// and the last row contributes only the final upper bound; bin count =
    /// rows − 1.
    ConsecutiveEdge,
}

/// Role → column index mapping for one input table.
///
/// Indices refer to whitespace-separated columns of the text file. The
/// uncertainty bound columns are optional as a pair: a mapping without them
/// yields a plain binned-value series with zero errors. The named
/// constructors cover the three input generation eras; any index can be
/// overridden afterwards with [`ColumnRoles::set`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "geometry", rename_all = "snake_case")]
pub enum ColumnRoles {
    /// Explicit `[low, high]` edges per row.
    ExplicitRange {
        /// Lower bin edge column.
        bin_lo: usize,
        /// Upper bin edge column.
        bin_hi: usize,
        /// Central value column.
        value: usize,
        /// Lower uncertainty bound column.
        #[serde(default)]
        low_bound: Option<usize>,
        /// Upper uncertainty bound column.
        #[serde(default)]
        high_bound: Option<usize>,
    },
    /// One shared edge per row.
    ConsecutiveEdge {
        /// Bin edge column.
        edge: usize,
        /// Central value column.
        value: usize,
        /// Lower uncertainty bound column.
        #[serde(default)]
        low_bound: Option<usize>,
        /// Upper uncertainty bound column.
        #[serde(default)]
        high_bound: Option<usize>,
    },
}

impl ColumnRoles {
    /// 8-column era: `low high value _ low_bound _ high_bound _`, the
    /// skipped columns being relative scale variations.
    pub fn eight() -> Self {
        Self::ExplicitRange {
            bin_lo: 0,
            bin_hi: 1,
            value: 2,
            low_bound: Some(4),
            high_bound: Some(6),
        }
    }

    /// 6-column era: `low high value low_bound high_bound _`.
    pub fn six() -> Self {
        Self::ExplicitRange {
            bin_lo: 0,
            bin_hi: 1,
            value: 2,
            low_bound: Some(3),
            high_bound: Some(4),
        }
    }

    /// 5-column era: `edge value low_bound high_bound _`, edges shared by
    /// consecutive rows.
    pub fn five() -> Self {
        Self::ConsecutiveEdge { edge: 0, value: 1, low_bound: Some(2), high_bound: Some(3) }
    }

    /// Bare `edge value` table: consecutive edges, no uncertainty bounds.
    pub fn edge_value() -> Self {
        Self::ConsecutiveEdge { edge: 0, value: 1, low_bound: None, high_bound: None }
    }

    /// Look up a preset by era name (`eight`, `six`, `five`).
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "eight" | "8" => Ok(Self::eight()),
            "six" | "6" => Ok(Self::six()),
            "five" | "5" => Ok(Self::five()),
            other => Err(Error::Validation(format!(
                "unknown layout preset '{other}' (expected eight, six, or five)"
            ))),
        }
    }

    /// Override one role's column index. Role names: `bin_lo`, `bin_hi`,
    /// `edge`, `value`, `low_bound`, `high_bound`.
    pub fn set(&mut self, role: &str, index: usize) -> Result<()> {
        match (&mut *self, role) {
            (Self::ExplicitRange { bin_lo, .. }, "bin_lo") => *bin_lo = index,
            (Self::ExplicitRange { bin_hi, .. }, "bin_hi") => *bin_hi = index,
            (Self::ConsecutiveEdge { edge, .. }, "edge") => *edge = index,
            (Self::ExplicitRange { value, .. }, "value")
            | (Self::ConsecutiveEdge { value, .. }, "value") => *value = index,
            (Self::ExplicitRange { low_bound, .. }, "low_bound")
            | (Self::ConsecutiveEdge { low_bound, .. }, "low_bound") => *low_bound = Some(index),
            (Self::ExplicitRange { high_bound, .. }, "high_bound")
            | (Self::ConsecutiveEdge { high_bound, .. }, "high_bound") => *high_bound = Some(index),
            _ => {
                return Err(Error::Validation(format!(
                    "role '{role}' does not exist for this layout"
                )))
            }
        }
        Ok(())
    }

    /// Drop the uncertainty bound columns, turning the mapping into a
    /// plain binned-value layout.
    pub fn without_bounds(mut self) -> Self {
        match &mut self {
            Self::ExplicitRange { low_bound, high_bound, .. }
            | Self::ConsecutiveEdge { low_bound, high_bound, .. } => {
                *low_bound = None;
                *high_bound = None;
            }
        }
        self
    }

    /// The bin geometry this mapping implies.
    pub fn geometry(&self) -> BinGeometry {
        match self {
            Self::ExplicitRange { .. } => BinGeometry::ExplicitRange,
            Self::ConsecutiveEdge { .. } => BinGeometry::ConsecutiveEdge,
        }
    }

    /// Whether the mapping carries uncertainty bound columns.
    ///
    /// Bounds come as a pair; a mapping with only one of them is invalid.
    pub fn has_bounds(&self) -> Result<bool> {
        let (lo, hi, what) = match self {
            Self::ExplicitRange { low_bound, high_bound, .. } => {
                (low_bound, high_bound, "explicit-range")
            }
            Self::ConsecutiveEdge { low_bound, high_bound, .. } => {
                (low_bound, high_bound, "consecutive-edge")
            }
        };
        match (lo, hi) {
            (Some(_), Some(_)) => Ok(true),
            (None, None) => Ok(false),
            _ => Err(Error::Validation(format!(
                "{what} layout maps only one of low_bound/high_bound; map both or neither"
            ))),
        }
    }

    /// Column indices in canonical role order, for the table loader.
    ///
    /// Explicit-range: `[bin_lo, bin_hi, value, low_bound, high_bound]`;
    /// consecutive-edge: `[edge, value, low_bound, high_bound]`; the bound
    /// entries are present only when mapped.
    pub fn usecols(&self) -> Result<Vec<usize>> {
        self.has_bounds()?;
        Ok(match *self {
            Self::ExplicitRange {
                bin_lo,
                bin_hi,
                value,
                low_bound: Some(lo),
                high_bound: Some(hi),
            } => vec![bin_lo, bin_hi, value, lo, hi],
            Self::ExplicitRange { bin_lo, bin_hi, value, .. } => vec![bin_lo, bin_hi, value],
            Self::ConsecutiveEdge { edge, value, low_bound: Some(lo), high_bound: Some(hi) } => {
                vec![edge, value, lo, hi]
            }
            Self::ConsecutiveEdge { edge, value, .. } => vec![edge, value],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_their_eras() {
        assert_eq!(ColumnRoles::preset("eight").unwrap().usecols().unwrap(), vec![0, 1, 2, 4, 6]);
        assert_eq!(ColumnRoles::preset("six").unwrap().usecols().unwrap(), vec![0, 1, 2, 3, 4]);
        assert_eq!(ColumnRoles::preset("five").unwrap().usecols().unwrap(), vec![0, 1, 2, 3]);
        assert_eq!(ColumnRoles::five().geometry(), BinGeometry::ConsecutiveEdge);
        assert!(ColumnRoles::preset("seven").is_err());
    }

    #[test]
    fn set_overrides_one_role() {
        let mut roles = ColumnRoles::six();
        roles.set("high_bound", 5).unwrap();
        assert_eq!(roles.usecols().unwrap(), vec![0, 1, 2, 3, 5]);
        assert!(roles.set("edge", 0).is_err());
    }

    #[test]
    fn bounds_can_be_dropped() {
        let roles = ColumnRoles::eight().without_bounds();
        assert!(!roles.has_bounds().unwrap());
        assert_eq!(roles.usecols().unwrap(), vec![0, 1, 2]);
        assert_eq!(ColumnRoles::edge_value().usecols().unwrap(), vec![0, 1]);
    }

    #[test]
    fn lone_bound_column_is_invalid() {
        let roles = ColumnRoles::ConsecutiveEdge {
            edge: 0,
            value: 1,
            low_bound: Some(2),
            high_bound: None,
        };
        assert!(roles.has_bounds().is_err());
        assert!(roles.usecols().is_err());
    }
}
