use std::fmt;

use serde::{Deserialize, Serialize};

/// Lower bound of the receptive window, inclusive.
pub const RECEPTIVE_MIN_MM: f64 = 9.0;
/// Upper bound of the receptive window, inclusive.
pub const RECEPTIVE_MAX_MM: f64 = 15.0;
/// Lower bound of the pre-receptive window, exclusive.
pub const PRE_RECEPTIVE_MIN_MM: f64 = 7.0;

pub const LABEL_NOT_AVAILABLE: &str = "N/A";
pub const LABEL_RECEPTIVE: &str = "Receptive (9-15 mm)";
pub const LABEL_PRE_RECEPTIVE: &str = "Pre-Receptive (7-9 mm)";
pub const LABEL_NON_RECEPTIVE: &str = "Non-Receptive (<7 mm or >15 mm)";

const NOT_MEASURED_HINT: &str = "Please run the analysis first.";

/// How urgently a classification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Informational,
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Display color name attached to the severity, if any.
    pub fn color(self) -> Option<&'static str> {
        match self {
            Severity::Informational => None,
            Severity::Normal => Some("green"),
            Severity::Warning => Some("orange"),
            Severity::Critical => Some("red"),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Informational => write!(f, "informational"),
            Severity::Normal => write!(f, "normal"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Receptivity phase inferred from a measured thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receptivity {
    Receptive,
    PreReceptive,
    NonReceptive,
}

impl Receptivity {
    pub fn label(self) -> &'static str {
        match self {
            Receptivity::Receptive => LABEL_RECEPTIVE,
            Receptivity::PreReceptive => LABEL_PRE_RECEPTIVE,
            Receptivity::NonReceptive => LABEL_NON_RECEPTIVE,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Receptivity::Receptive => Severity::Normal,
            Receptivity::PreReceptive => Severity::Warning,
            Receptivity::NonReceptive => Severity::Critical,
        }
    }
}

/// Label and severity produced for one thickness value.
///
/// `receptivity` is `None` only when no measurement was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: &'static str,
    pub severity: Severity,
    pub receptivity: Option<Receptivity>,
}

impl Classification {
    /// Guidance shown instead of a color when nothing has been measured.
    pub fn hint(&self) -> Option<&'static str> {
        match self.receptivity {
            None => Some(NOT_MEASURED_HINT),
            Some(_) => None,
        }
    }
}

impl From<Receptivity> for Classification {
    fn from(receptivity: Receptivity) -> Self {
        Self {
            label: receptivity.label(),
            severity: receptivity.severity(),
            receptivity: Some(receptivity),
        }
    }
}

/// Maps an endometrial thickness in millimeters to its receptivity class.
///
/// The branches are tested in order. A value of exactly 7.0 mm matches
/// neither the receptive nor the pre-receptive window and lands in
/// Non-Receptive; 9.0 and 15.0 are receptive. Values are not range checked,
/// so negative or non-finite input also classifies as Non-Receptive.
pub fn classify(thickness_mm: Option<f64>) -> Classification {
    let Some(t) = thickness_mm else {
        return Classification {
            label: LABEL_NOT_AVAILABLE,
            severity: Severity::Informational,
            receptivity: None,
        };
    };

    let receptivity = if (RECEPTIVE_MIN_MM..=RECEPTIVE_MAX_MM).contains(&t) {
        Receptivity::Receptive
    } else if t > PRE_RECEPTIVE_MIN_MM && t < RECEPTIVE_MIN_MM {
        Receptivity::PreReceptive
    } else {
        Receptivity::NonReceptive
    };

    receptivity.into()
}

/// One row of the human readable threshold table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdRow {
    pub condition: &'static str,
    pub label: &'static str,
    pub severity: Severity,
}

/// The classification table, in evaluation order.
pub fn thresholds() -> [ThresholdRow; 4] {
    [
        ThresholdRow {
            condition: "no measurement",
            label: LABEL_NOT_AVAILABLE,
            severity: Severity::Informational,
        },
        ThresholdRow {
            condition: "9.0 <= t <= 15.0",
            label: LABEL_RECEPTIVE,
            severity: Severity::Normal,
        },
        ThresholdRow {
            condition: "7.0 < t < 9.0",
            label: LABEL_PRE_RECEPTIVE,
            severity: Severity::Warning,
        },
        ThresholdRow {
            condition: "t < 7.0 or t > 15.0",
            label: LABEL_NON_RECEPTIVE,
            severity: Severity::Critical,
        },
    ]
}
