use chrono::NaiveDate;

use crate::models::{AcademicStanding, Record, Residency, RiskLevel, Semester, StudentLevel};

/// A Low-risk, Good-standing in-state freshman; tests override what they need.
pub fn record(student_id: &str) -> Record {
    Record {
        student_id: student_id.to_string(),
        first_name: "Avery".to_string(),
        last_name: "Lee".to_string(),
        email: "avery.lee@example.edu".to_string(),
        phone: "(804) 555-0100".to_string(),
        residency: Residency::InState,
        gap_amount: 1000,
        risk_score: 10,
        risk_level: RiskLevel::Low,
        credit_hours: 12,
        semester: Semester::Fall2024,
        student_level: StudentLevel::Freshman,
        enrollment_date: NaiveDate::from_ymd_opt(2024, 8, 19).unwrap(),
        gpa: 3.2,
        academic_standing: AcademicStanding::Good,
        has_installment_plan: false,
    }
}

pub fn with_gap(student_id: &str, gap_amount: u32) -> Record {
    Record {
        gap_amount,
        ..record(student_id)
    }
}

pub fn with_risk(student_id: &str, risk_level: RiskLevel) -> Record {
    let risk_score = match risk_level {
        RiskLevel::Low => 20,
        RiskLevel::Medium => 55,
        RiskLevel::High => 85,
    };
    Record {
        risk_score,
        risk_level,
        ..record(student_id)
    }
}
