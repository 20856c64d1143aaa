//! # xsb-core
//!
//! Shared error and data types for xsband.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod series;

pub use error::{Error, Result};
pub use series::BinnedSeries;
