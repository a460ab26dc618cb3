//! Severity classification of completeness and duplicates.

use serde::{Deserialize, Serialize};

/// Completeness verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletenessSeverity {
    /// At or above the good threshold (95 % by default)
    Good,
    /// Between the warning and good thresholds
    Warning,
    /// Below the warning threshold (85 % by default)
    Critical,
}

impl CompletenessSeverity {
    /// Classify a completeness percentage against the two thresholds.
    pub fn classify(completeness_pct: f64, good_pct: f64, warning_pct: f64) -> Self {
        if completeness_pct >= good_pct {
            CompletenessSeverity::Good
        } else if completeness_pct >= warning_pct {
            CompletenessSeverity::Warning
        } else {
            CompletenessSeverity::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompletenessSeverity::Good => "good",
            CompletenessSeverity::Warning => "warning",
            CompletenessSeverity::Critical => "critical",
        }
    }

    /// Advice shown next to the completeness figure.
    pub fn advice(&self) -> &'static str {
        match self {
            CompletenessSeverity::Good => "Good completeness.",
            CompletenessSeverity::Warning => {
                "Acceptable, but the emptiest columns need investigating."
            }
            CompletenessSeverity::Critical => {
                "Critical. The file needs a full cleanup or a review of how the data is collected."
            }
        }
    }
}

/// Duplicate-row verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateSeverity {
    Ok,
    Warning,
}

impl DuplicateSeverity {
    pub fn classify(duplicate_count: usize) -> Self {
        if duplicate_count > 0 {
            DuplicateSeverity::Warning
        } else {
            DuplicateSeverity::Ok
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicateSeverity::Ok => "ok",
            DuplicateSeverity::Warning => "warning",
        }
    }
}

/// Both verdicts for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityAssessment {
    pub completeness: CompletenessSeverity,
    pub duplicates: DuplicateSeverity,
}
