//! Perturbative-order labels and reference-path derivation.
//!
//! Input files carry a trailing order token in their stem, e.g.
//! `pT_thigh__NLO_QCD.dat`, and the run directory repeats it
//! (`distributions__NLO_QCD/`). The normalization denominator lives in the
//! same tree under the reference order's token.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use xsb_core::{Error, Result};

/// Perturbative order of a prediction, as encoded in input file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerturbativeOrder {
    /// Leading order.
    Lo,
    /// Next-to-leading order QCD.
    NloQcd,
    /// Next-to-next-to-leading order QCD.
    NnloQcd,
}

impl PerturbativeOrder {
    /// All orders, lowest first. Longest suffix first when matching, so
    /// `NNLO_QCD` is never misread as `NLO_QCD`.
    const MATCH_ORDER: [Self; 3] = [Self::NnloQcd, Self::NloQcd, Self::Lo];

    /// File-name token for this order.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Lo => "LO",
            Self::NloQcd => "NLO_QCD",
            Self::NnloQcd => "NNLO_QCD",
        }
    }

    /// The default normalization reference: the highest order available.
    pub fn highest() -> Self {
        Self::NnloQcd
    }

    /// Parse a CLI/job-spec order label (`lo`, `nlo_qcd`, `nnlo_qcd`, or
    /// the file-name tokens).
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lo" => Ok(Self::Lo),
            "nlo" | "nlo_qcd" => Ok(Self::NloQcd),
            "nnlo" | "nnlo_qcd" => Ok(Self::NnloQcd),
            other => Err(Error::Validation(format!(
                "unknown perturbative order '{other}' (expected lo, nlo_qcd, or nnlo_qcd)"
            ))),
        }
    }

    /// Detect the order from a path's trailing stem token, if any.
    pub fn of_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        Self::MATCH_ORDER
            .into_iter()
            .find(|order| stem.ends_with(&format!("__{}", order.suffix())))
    }
}

/// Derive the reference (denominator) table path from a numerator path.
///
/// Every `__<ORDER>` token in the path (file stem and directory names
/// alike) is swapped for the reference order's token, preserving the
/// original tree convention. Fails if the numerator carries no order token;
/// pass an explicit reference path in that case.
pub fn reference_path(input: &Path, reference: PerturbativeOrder) -> Result<PathBuf> {
    let order = PerturbativeOrder::of_path(input).ok_or_else(|| {
        Error::Validation(format!(
            "cannot derive reference path for {}: file stem has no order suffix",
            input.display()
        ))
    })?;
    let from = format!("__{}", order.suffix());
    let to = format!("__{}", reference.suffix());
    let swapped = input.to_string_lossy().replace(&from, &to);
    Ok(PathBuf::from(swapped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_trailing_order_token() {
        assert_eq!(
            PerturbativeOrder::of_path(Path::new("pT_thigh__NLO_QCD.dat")),
            Some(PerturbativeOrder::NloQcd)
        );
        assert_eq!(
            PerturbativeOrder::of_path(Path::new("pT_thigh__NNLO_QCD.dat")),
            Some(PerturbativeOrder::NnloQcd)
        );
        assert_eq!(
            PerturbativeOrder::of_path(Path::new("pT_thigh__LO.dat")),
            Some(PerturbativeOrder::Lo)
        );
        assert_eq!(PerturbativeOrder::of_path(Path::new("pT_thigh.dat")), None);
    }

    #[test]
    fn swaps_order_token_in_stem_and_directories() {
        let p = Path::new("inputs/distributions__NLO_QCD/pT_thigh__NLO_QCD.dat");
        let r = reference_path(p, PerturbativeOrder::highest()).unwrap();
        assert_eq!(r, PathBuf::from("inputs/distributions__NNLO_QCD/pT_thigh__NNLO_QCD.dat"));
    }

    #[test]
    fn reference_of_itself_is_itself() {
        let p = Path::new("pT__NNLO_QCD.dat");
        assert_eq!(reference_path(p, PerturbativeOrder::NnloQcd).unwrap(), p.to_path_buf());
    }

    #[test]
    fn missing_order_token_is_an_error() {
        assert!(reference_path(Path::new("pT_thigh.dat"), PerturbativeOrder::highest()).is_err());
    }

    #[test]
    fn parses_cli_labels() {
        assert_eq!(PerturbativeOrder::parse("NNLO").unwrap(), PerturbativeOrder::NnloQcd);
        assert_eq!(PerturbativeOrder::parse("nlo_qcd").unwrap(), PerturbativeOrder::NloQcd);
        assert!(PerturbativeOrder::parse("n3lo").is_err());
    }
}
