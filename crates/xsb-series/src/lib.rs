//! # xsb-series
//!
//! Turns raw numeric tables into [`BinnedSeries`] values: column-role
//! mapping for the known input layouts, bin geometry from explicit ranges
//! or consecutive edges, branching-ratio rescaling, and bin-by-bin ratio
//! normalization against a reference prediction.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod layout;
pub mod normalize;
pub mod order;

pub use builder::{InvertedBounds, SeriesBuilder};
pub use layout::{BinGeometry, ColumnRoles};
pub use normalize::normalize;
pub use order::{reference_path, PerturbativeOrder};

pub use xsb_core::BinnedSeries;
