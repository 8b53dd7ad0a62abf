//! Daily status buckets for calendar cells.

use serde::{Deserialize, Serialize};

/// Ratio at or above which a day is `Medium`.
pub const MEDIUM_THRESHOLD: f64 = 0.5;
/// Ratio at or above which a day is `High`.
pub const HIGH_THRESHOLD: f64 = 0.8;

/// Ordered four-level classification of one day's completion ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    None,
    Low,
    Medium,
    High,
}

impl DayStatus {
    /// Classifies a day. Total over every ratio; nothing scheduled is always `None`.
    pub fn classify(scheduled_count: usize, ratio: f64) -> Self {
        if scheduled_count == 0 || ratio.is_nan() || ratio <= 0.0 {
            Self::None
        } else if ratio >= HIGH_THRESHOLD {
            Self::High
        } else if ratio >= MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}
