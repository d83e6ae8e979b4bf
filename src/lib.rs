//! Financial gap analysis over a population of student aid records.
//!
//! Every stage is a pure function over an immutable slice of [`Record`]s:
//!
//! ```text
//! records -> filter -> { aggregate / profile, rank -> top_flagged, export_table }
//! ```
//!
//! Ingestion ([`import`]) and rendering ([`report`]) sit at the edges and
//! only call the stages.

pub mod classify;
pub mod error;
pub mod export;
pub mod filter;
pub mod import;
pub mod models;
pub mod rank;
pub mod report;
pub mod stats;

#[cfg(test)]
mod test_support;

pub use classify::{classify, Classification, Thresholds};
pub use error::GapError;
pub use export::{export_filename, export_table};
pub use filter::filter;
pub use models::{
    AcademicStanding, CohortProfile, ExportOptions, FilterCriteria, GapDistribution, Record,
    Residency, ResidencyGaps, RiskLevel, Selection, Semester, SortDirection, SortField, SortSpec,
    StatisticsSnapshot, StudentLevel,
};
pub use rank::{rank, top_flagged};
pub use stats::{aggregate, profile};
