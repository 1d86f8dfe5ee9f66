//! Frequency band classification
//!
//! Maps NR band identifiers (and, as a fallback, raw carrier frequencies)
//! onto the three coarse frequency classes used throughout the campaign
//! charts. The identifier lists are the deployment's ground truth; the
//! frequency thresholds only apply when no identifier is available.

use std::fmt;
use thiserror::Error;

/// Band identifiers classified as low-band.
pub const LOW_BANDS: &[&str] = &["n71", "n12", "n13", "n14", "n5"];

/// Band identifiers classified as mid-band.
pub const MID_BANDS: &[&str] = &["n2", "n25", "n66", "n41", "n77", "n78", "n48", "n53"];

/// Band identifiers classified as mmWave.
pub const MMWAVE_BANDS: &[&str] = &["n260", "n261"];

/// Coarse frequency tier of a radio band.
///
/// The derive order defines the display order: Low < Mid < mmWave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BandClass {
    Low,
    Mid,
    MmWave,
}

impl BandClass {
    /// All classes in display order.
    pub const ALL: [BandClass; 3] = [BandClass::Low, BandClass::Mid, BandClass::MmWave];

    /// The label used in input files and output filenames.
    pub fn label(self) -> &'static str {
        match self {
            BandClass::Low => "Low",
            BandClass::Mid => "Mid",
            BandClass::MmWave => "mmWave",
        }
    }
}

impl fmt::Display for BandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A band key that matches no identifier list and provides no frequency.
///
/// Never fatal: callers drop the offending key from the ordering and log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("band {band:?} matches no identifier list and provides no usable frequency")]
pub struct UnclassifiableBandError {
    pub band: String,
}

/// Classifies a band into its frequency class.
///
/// The band identifier is authoritative; the frequency (in MHz) is only
/// consulted when the identifier is absent or unrecognized. Returns `None`
/// when neither input yields a classification.
///
/// Pure and stable: identical input always yields identical output, since
/// the result feeds a sort key.
pub fn classify(band: Option<&str>, frequency_mhz: Option<f64>) -> Option<BandClass> {
    if let Some(band) = band {
        if LOW_BANDS.contains(&band) {
            return Some(BandClass::Low);
        }
        if MID_BANDS.contains(&band) {
            return Some(BandClass::Mid);
        }
        if MMWAVE_BANDS.contains(&band) {
            return Some(BandClass::MmWave);
        }
    }

    if let Some(freq) = frequency_mhz {
        return Some(if freq < 1000.0 {
            BandClass::Low
        } else if freq < 6000.0 {
            BandClass::Mid
        } else {
            BandClass::MmWave
        });
    }

    None
}

/// Classifies a bare band key, or reports it as unclassifiable.
pub fn classify_band_key(band: &str) -> Result<BandClass, UnclassifiableBandError> {
    classify(Some(band), None).ok_or_else(|| UnclassifiableBandError {
        band: band.to_string(),
    })
}

/// Extracts the numeric identifier from an NR band key ("n71" -> 71).
///
/// Scans for the first `n` followed by digits, so decorated keys still
/// resolve. Returns `None` when no digits follow an `n`.
pub fn band_number(band: &str) -> Option<u32> {
    let mut rest = band;
    while let Some(idx) = rest.find('n') {
        let digits: &str = &rest[idx + 1..];
        let end = digits
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_digit())
            .count();
        if end > 0 {
            return digits[..end].parse().ok();
        }
        rest = &rest[idx + 1..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("n71"), None, Some(BandClass::Low))]
    #[case(Some("n77"), None, Some(BandClass::Mid))]
    #[case(Some("n260"), None, Some(BandClass::MmWave))]
    #[case(None, Some(700.0), Some(BandClass::Low))]
    #[case(None, Some(3500.0), Some(BandClass::Mid))]
    #[case(None, Some(28000.0), Some(BandClass::MmWave))]
    #[case(None, None, None)]
    fn classify_cases(
        #[case] band: Option<&str>,
        #[case] frequency: Option<f64>,
        #[case] expected: Option<BandClass>,
    ) {
        assert_eq!(classify(band, frequency), expected);
    }

    #[test]
    fn unknown_identifier_falls_back_to_frequency() {
        assert_eq!(classify(Some("n999"), Some(600.0)), Some(BandClass::Low));
        assert_eq!(classify(Some("n999"), None), None);
    }

    #[test]
    fn boundary_frequencies() {
        assert_eq!(classify(None, Some(999.9)), Some(BandClass::Low));
        assert_eq!(classify(None, Some(1000.0)), Some(BandClass::Mid));
        assert_eq!(classify(None, Some(5999.9)), Some(BandClass::Mid));
        assert_eq!(classify(None, Some(6000.0)), Some(BandClass::MmWave));
    }

    #[test]
    fn classify_band_key_reports_unclassifiable() {
        assert_eq!(classify_band_key("n41"), Ok(BandClass::Mid));
        let err = classify_band_key("B13").unwrap_err();
        assert_eq!(err.band, "B13");
    }

    #[test]
    fn band_number_extraction() {
        assert_eq!(band_number("n71"), Some(71));
        assert_eq!(band_number("n260"), Some(260));
        assert_eq!(band_number("band n5"), Some(5));
        assert_eq!(band_number("unknown"), None);
        assert_eq!(band_number(""), None);
    }

    #[test]
    fn class_ordering_is_low_mid_mmwave() {
        assert!(BandClass::Low < BandClass::Mid);
        assert!(BandClass::Mid < BandClass::MmWave);
    }
}
