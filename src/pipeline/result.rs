//! Results produced by the ripeness pipeline.

use crate::domain::{ChannelMeans, ColorSpace, RipenessCategory, Verdict};

/// The structured result handed to the presenter for one classified image.
///
/// Created fresh per image and immediately consumed; nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RipenessReport {
    /// The ripeness category the image fell into.
    pub category: RipenessCategory,
    /// Calibration-specific display label (e.g. "Ripe (Yellow)").
    pub label: String,
    /// Advisory sentence for the user.
    pub advice: String,
    /// Estimated harvest window, when the calibration provides one.
    pub harvest_window: Option<String>,
    /// RGB display-color tag for presenters, when the calibration provides one.
    pub display_color: Option<[u8; 3]>,
    /// The three aggregated channel means the verdict was derived from.
    pub channel_means: [f32; 3],
    /// The scale the means were measured in.
    pub color_space: ColorSpace,
    /// Number of pixels that contributed to the means.
    pub selected_pixels: usize,
    /// Total number of pixels in the processed frame.
    pub total_pixels: usize,
}

impl RipenessReport {
    /// Assembles a report from a verdict and the means it was derived from.
    pub(crate) fn from_verdict(verdict: Verdict, means: &ChannelMeans) -> Self {
        Self {
            category: verdict.category,
            label: verdict.label.to_string(),
            advice: verdict.advice.to_string(),
            harvest_window: verdict.harvest_window.map(str::to_string),
            display_color: verdict.display_color,
            channel_means: means.values,
            color_space: means.space,
            selected_pixels: means.selected_pixels,
            total_pixels: means.total_pixels,
        }
    }

    /// Fraction of the frame that contributed to the means (0.0-1.0).
    pub fn coverage(&self) -> f32 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.selected_pixels as f32 / self.total_pixels as f32
        }
    }
}

/// The outcome of analyzing one image.
///
/// An empty subject mask is a first-class outcome, not an error: the
/// presenter reports "no subject detected" instead of a ripeness guess.
#[derive(Debug, Clone, PartialEq)]
pub enum RipenessOutcome {
    /// The image was classified.
    Classified(RipenessReport),
    /// Masking filtered out every pixel; no ripeness estimate exists.
    NoSubjectDetected,
}

impl RipenessOutcome {
    /// The report, if the image was classified.
    pub fn report(&self) -> Option<&RipenessReport> {
        match self {
            RipenessOutcome::Classified(report) => Some(report),
            RipenessOutcome::NoSubjectDetected => None,
        }
    }

    /// Whether masking found no subject.
    pub fn is_no_subject(&self) -> bool {
        matches!(self, RipenessOutcome::NoSubjectDetected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_verdict_copies_presentation() {
        let verdict = Verdict {
            category: RipenessCategory::Ripe,
            label: "Ripe (Yellow)",
            advice: "Pick it soon.",
            harvest_window: Some("1-3 days to harvest"),
            display_color: Some([255, 255, 0]),
        };
        let means = ChannelMeans {
            space: ColorSpace::Hsv8,
            values: [30.0, 200.0, 180.0],
            selected_pixels: 60,
            total_pixels: 100,
        };

        let report = RipenessReport::from_verdict(verdict, &means);
        assert_eq!(report.category, RipenessCategory::Ripe);
        assert_eq!(report.label, "Ripe (Yellow)");
        assert_eq!(report.harvest_window.as_deref(), Some("1-3 days to harvest"));
        assert_eq!(report.channel_means, [30.0, 200.0, 180.0]);
        assert!((report.coverage() - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = RipenessOutcome::NoSubjectDetected;
        assert!(outcome.is_no_subject());
        assert!(outcome.report().is_none());
    }
}
