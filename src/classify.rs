//! Threshold rules that derive the categorical fields of a [`Record`].
//!
//! These rules are applied by whoever produces records. Every other stage
//! assumes they already hold and never re-derives them:
//!
//! - `risk_level` is `High` for `risk_score >= 70`, `Medium` for `40..70`, else `Low`.
//! - `academic_standing` is `Good` for `gpa >= 2.5`, `Warning` for `2.0..2.5`, else `Probation`.

use crate::models::{AcademicStanding, Record, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub high_risk_score: u8,
    pub medium_risk_score: u8,
    pub good_gpa: f64,
    pub warning_gpa: f64,
    /// Gap dollars that add one point of risk.
    pub dollars_per_risk_point: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds {
            high_risk_score: 70,
            medium_risk_score: 40,
            good_gpa: 2.5,
            warning_gpa: 2.0,
            dollars_per_risk_point: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub academic_standing: AcademicStanding,
}

impl Thresholds {
    pub fn risk_level(&self, risk_score: u8) -> RiskLevel {
        if risk_score >= self.high_risk_score {
            RiskLevel::High
        } else if risk_score >= self.medium_risk_score {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn academic_standing(&self, gpa: f64) -> AcademicStanding {
        if gpa >= self.good_gpa {
            AcademicStanding::Good
        } else if gpa >= self.warning_gpa {
            AcademicStanding::Warning
        } else {
            AcademicStanding::Probation
        }
    }

    /// `min(100, round(gap / dollars_per_risk_point + adjustment))`, never below 0.
    ///
    /// `adjustment` carries whatever non-financial signal the producer folds
    /// into the score.
    pub fn risk_score(&self, gap_amount: u32, adjustment: f64) -> u8 {
        let raw = f64::from(gap_amount) / self.dollars_per_risk_point + adjustment;
        if raw.is_nan() {
            return 0;
        }
        raw.round().clamp(0.0, 100.0) as u8
    }

    pub fn classify(&self, gap_amount: u32, gpa: f64, adjustment: f64) -> Classification {
        let risk_score = self.risk_score(gap_amount, adjustment);
        Classification {
            risk_score,
            risk_level: self.risk_level(risk_score),
            academic_standing: self.academic_standing(gpa),
        }
    }

    /// Whether a record's derived fields agree with these thresholds.
    pub fn is_consistent(&self, record: &Record) -> bool {
        record.risk_level == self.risk_level(record.risk_score)
            && record.academic_standing == self.academic_standing(record.gpa)
    }
}

/// Classifies with the default thresholds.
pub fn classify(gap_amount: u32, gpa: f64, adjustment: f64) -> Classification {
    Thresholds::default().classify(gap_amount, gpa, adjustment)
}
