use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GapError;

/// Declares a closed categorical field that reads and writes the same labels
/// the source data uses.
macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = GapError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(GapError::UnknownValue {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

categorical!(Residency, "residency" {
    InState => "In-State",
    OutOfState => "Out-of-State",
});

categorical!(
    /// Ordinal risk classification derived from `risk_score`.
    RiskLevel, "risk level" {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
);

categorical!(Semester, "semester" {
    Fall2024 => "Fall 2024",
    Spring2025 => "Spring 2025",
    Summer2025 => "Summer 2025",
});

categorical!(StudentLevel, "student level" {
    Freshman => "Freshman",
    Sophomore => "Sophomore",
    Junior => "Junior",
    Senior => "Senior",
    Graduate => "Graduate",
});

categorical!(
    /// Standing derived from GPA.
    AcademicStanding, "academic standing" {
        Good => "Good",
        Warning => "Warning",
        Probation => "Probation",
    }
);

impl RiskLevel {
    /// Fixed ordinal used when ranking: Low=0, Medium=1, High=2.
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 2,
        }
    }
}

/// One student's financial and academic state.
///
/// `risk_level` and `academic_standing` are expected to agree with
/// `risk_score` and `gpa` (see [`crate::classify`]). Records read from an
/// external source are passed through as they are; nothing downstream
/// repairs an inconsistent record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub residency: Residency,
    pub gap_amount: u32,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub credit_hours: u32,
    pub semester: Semester,
    pub student_level: StudentLevel,
    pub enrollment_date: NaiveDate,
    pub gpa: f64,
    pub academic_standing: AcademicStanding,
    pub has_installment_plan: bool,
}

/// A single filter constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
    /// A value that names no known category; matches no record.
    Unmatched(String),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: FromStr> Selection<T> {
    /// `"all"` lifts the constraint, known labels constrain, anything else
    /// matches nothing.
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            return Selection::All;
        }
        match value.parse() {
            Ok(parsed) => Selection::Only(parsed),
            Err(_) => Selection::Unmatched(value.to_string()),
        }
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
            Selection::Unmatched(_) => false,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Selection::parse(value))
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => value.fmt(f),
            Selection::Unmatched(raw) => f.write_str(raw),
        }
    }
}

/// Constraints combined with logical AND.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub semester: Selection<Semester>,
    pub residency: Selection<Residency>,
    pub student_level: Selection<StudentLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    CreditHours,
    GapAmount,
    RiskLevel,
}

impl FromStr for SortField {
    type Err = GapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "id" | "student_id" => Ok(SortField::Id),
            "credit_hours" => Ok(SortField::CreditHours),
            "gap_amount" => Ok(SortField::GapAmount),
            "risk_level" => Ok(SortField::RiskLevel),
            other => Err(GapError::UnknownSortField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = GapError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(GapError::UnknownSortDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            field: SortField::RiskLevel,
            direction: SortDirection::Desc,
        }
    }
}

/// Optional column groups for the tabular export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportOptions {
    pub include_contact: bool,
    pub include_academic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ResidencyGaps {
    #[serde(rename = "In-State")]
    pub in_state: u64,
    #[serde(rename = "Out-of-State")]
    pub out_of_state: u64,
}

impl ResidencyGaps {
    pub fn get(&self, residency: Residency) -> u64 {
        match residency {
            Residency::InState => self.in_state,
            Residency::OutOfState => self.out_of_state,
        }
    }
}

/// Counts per gap-amount bucket: `[0,2000]`, `(2000,5000]`, `(5000,10000]`, `(10000,∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GapDistribution {
    pub up_to_2k: usize,
    pub from_2k_to_5k: usize,
    pub from_5k_to_10k: usize,
    pub over_10k: usize,
}

impl GapDistribution {
    pub fn total(&self) -> usize {
        self.up_to_2k + self.from_2k_to_5k + self.from_5k_to_10k + self.over_10k
    }
}

/// Headline dashboard metrics. Every field is a whole number.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StatisticsSnapshot {
    pub good_standing_percent: u64,
    pub average_gap: u64,
    pub total_unmet_need: u64,
    pub high_risk_count: usize,
    pub installment_plan_count: usize,
    pub adoption_rate: u64,
    pub avg_gap_by_residency: ResidencyGaps,
    pub gap_distribution: GapDistribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StandingCounts {
    pub good: usize,
    pub warning: usize,
    pub probation: usize,
}

/// Secondary cohort figures shown beside the headline metrics.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CohortProfile {
    pub total_students: usize,
    pub in_state_count: usize,
    pub out_of_state_count: usize,
    pub average_credit_hours: f64,
    pub median_gap: u32,
    pub high_gap_count: usize,
    pub standing_counts: StandingCounts,
    pub level_counts: BTreeMap<StudentLevel, usize>,
    pub avg_gpa_by_level: BTreeMap<StudentLevel, f64>,
}
