use std::cmp::Ordering;

use crate::models::{Record, RiskLevel, SortDirection, SortField, SortSpec};

/// Default number of rows on the flagged-student list.
pub const DEFAULT_FLAGGED_LIMIT: usize = 20;

fn compare(a: &Record, b: &Record, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.student_id.cmp(&b.student_id),
        SortField::CreditHours => a.credit_hours.cmp(&b.credit_hours),
        SortField::GapAmount => a.gap_amount.cmp(&b.gap_amount),
        SortField::RiskLevel => a.risk_level.rank().cmp(&b.risk_level.rank()),
    }
}

/// Stable sort by `spec.field`. Descending order flips the comparator, so
/// records with equal keys keep their input order in both directions.
pub fn rank(records: &[Record], spec: SortSpec) -> Vec<Record> {
    let mut ordered = records.to_vec();
    ordered.sort_by(|a, b| {
        let ordering = compare(a, b, spec.field);
        match spec.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    ordered
}

/// Drops Low-risk records and keeps at most `limit` of the rest, in the given order.
pub fn top_flagged(sorted: &[Record], limit: usize) -> Vec<Record> {
    sorted
        .iter()
        .filter(|record| record.risk_level != RiskLevel::Low)
        .take(limit)
        .cloned()
        .collect()
}
