//! Ripeness categories and classification verdicts.
//!
//! A classifier maps aggregated channel means to exactly one
//! [`RipenessCategory`] plus the presentation data attached to it: a display
//! label, an advisory sentence, and (for the masked-HSV calibration) an
//! estimated harvest window and an RGB display-color tag.

use serde::{Deserialize, Serialize};

/// The fixed set of ripeness categories a classifier can produce.
///
/// Categories are mutually exclusive; a single classification never yields
/// more than one. `Ambiguous` is the catch-all bucket used by calibrations
/// whose specific rules do not cover the whole input domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RipenessCategory {
    /// Mostly green fruit, not ready for consumption.
    Unripe,
    /// Fruit at peak ripeness.
    Ripe,
    /// Fruit past its peak (browning or dark).
    Overripe,
    /// Inputs matching none of the specific rules.
    Ambiguous,
}

impl RipenessCategory {
    /// Returns a short stable identifier for the category.
    ///
    /// Useful for logging and for presenters that key styling off the
    /// category rather than the calibration-specific display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            RipenessCategory::Unripe => "unripe",
            RipenessCategory::Ripe => "ripe",
            RipenessCategory::Overripe => "overripe",
            RipenessCategory::Ambiguous => "ambiguous",
        }
    }
}

impl std::fmt::Display for RipenessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of a single classification.
///
/// A verdict is created fresh per classification and immediately consumed by
/// the caller; it borrows nothing and holds only static presentation text
/// chosen from the classifier's calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// The ripeness category the means fell into.
    pub category: RipenessCategory,
    /// Calibration-specific display label (e.g. "Ripe (Yellow)").
    pub label: &'static str,
    /// Advisory sentence for the user.
    pub advice: &'static str,
    /// Estimated harvest window, when the calibration provides one.
    pub harvest_window: Option<&'static str>,
    /// RGB display-color tag for presenters, when the calibration provides one.
    pub display_color: Option<[u8; 3]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_as_str() {
        assert_eq!(RipenessCategory::Unripe.as_str(), "unripe");
        assert_eq!(RipenessCategory::Ripe.as_str(), "ripe");
        assert_eq!(RipenessCategory::Overripe.as_str(), "overripe");
        assert_eq!(RipenessCategory::Ambiguous.as_str(), "ambiguous");
    }

    #[test]
    fn test_category_display_matches_as_str() {
        assert_eq!(RipenessCategory::Ripe.to_string(), "ripe");
    }

    #[test]
    fn test_category_serde_roundtrip() {
        let json = serde_json::to_string(&RipenessCategory::Overripe).unwrap();
        let back: RipenessCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RipenessCategory::Overripe);
    }
}
