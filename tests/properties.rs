//! Property-based tests for the analysis pipeline
//!
//! These hold for every record collection:
//! - filtering only keeps matching records and `all` is the identity
//! - aggregate figures are conserved within rounding
//! - ranking is stable in both directions
//! - export rows have one field per column
//! - every stage is idempotent

use chrono::NaiveDate;
use proptest::prelude::*;
use student_aid_gap_analysis::classify::Thresholds;
use student_aid_gap_analysis::models::{
    AcademicStanding, ExportOptions, FilterCriteria, Record, Residency, RiskLevel, Selection,
    Semester, SortDirection, SortField, SortSpec, StudentLevel,
};
use student_aid_gap_analysis::{aggregate, export_table, filter, profile, rank};

fn pick<T: Copy + std::fmt::Debug + 'static>(values: &'static [T]) -> impl Strategy<Value = T> {
    (0..values.len()).prop_map(move |index| values[index])
}

/// Records whose derived fields agree with the default thresholds.
fn record() -> impl Strategy<Value = Record> {
    (
        "V[0-9]{7}",
        pick(Residency::ALL),
        0u32..20_000,
        0.0f64..20.0,
        0u32..19,
        pick(Semester::ALL),
        pick(StudentLevel::ALL),
        0u32..=400,
        any::<bool>(),
        "[A-Za-z ,']{1,12}",
    )
        .prop_map(
            |(id, residency, gap, adjustment, hours, semester, level, gpa_hundredths, plan, name)| {
                let gpa = f64::from(gpa_hundredths) / 100.0;
                let classification = Thresholds::default().classify(gap, gpa, adjustment);
                Record {
                    student_id: id,
                    first_name: name.clone(),
                    last_name: name,
                    email: "student@example.edu".to_string(),
                    phone: "(804) 555-0199".to_string(),
                    residency,
                    gap_amount: gap,
                    risk_score: classification.risk_score,
                    risk_level: classification.risk_level,
                    credit_hours: hours,
                    semester,
                    student_level: level,
                    enrollment_date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                    gpa,
                    academic_standing: classification.academic_standing,
                    has_installment_plan: plan,
                }
            },
        )
}

fn records() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec(record(), 0..60)
}

fn selection<T: Copy + std::fmt::Debug + 'static>(
    values: &'static [T],
) -> impl Strategy<Value = Selection<T>> {
    prop_oneof![
        Just(Selection::All),
        pick(values).prop_map(Selection::Only),
    ]
}

fn criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        selection(Semester::ALL),
        selection(Residency::ALL),
        selection(StudentLevel::ALL),
    )
        .prop_map(|(semester, residency, student_level)| FilterCriteria {
            semester,
            residency,
            student_level,
        })
}

fn sort_spec() -> impl Strategy<Value = SortSpec> {
    (
        pick(&[
            SortField::Id,
            SortField::CreditHours,
            SortField::GapAmount,
            SortField::RiskLevel,
        ]),
        pick(&[SortDirection::Asc, SortDirection::Desc]),
    )
        .prop_map(|(field, direction)| SortSpec { field, direction })
}

fn key(record: &Record, field: SortField) -> String {
    match field {
        SortField::Id => record.student_id.clone(),
        SortField::CreditHours => format!("{:010}", record.credit_hours),
        SortField::GapAmount => format!("{:010}", record.gap_amount),
        SortField::RiskLevel => record.risk_level.rank().to_string(),
    }
}

proptest! {
    #[test]
    fn prop_filter_is_sound(records in records(), criteria in criteria()) {
        let selected = filter(&records, &criteria);
        prop_assert!(selected.len() <= records.len());
        for record in &selected {
            prop_assert!(criteria.semester.matches(&record.semester));
            prop_assert!(criteria.residency.matches(&record.residency));
            prop_assert!(criteria.student_level.matches(&record.student_level));
        }
        let expected = records.iter().filter(|r| criteria.matches(r)).count();
        prop_assert_eq!(selected.len(), expected);
    }

    #[test]
    fn prop_all_criteria_is_identity(records in records()) {
        prop_assert_eq!(filter(&records, &FilterCriteria::all()), records);
    }

    #[test]
    fn prop_aggregate_conserves_totals(records in records()) {
        let snapshot = aggregate(&records);
        let total = records.len() as u64;
        let gap_sum: u64 = records.iter().map(|r| u64::from(r.gap_amount)).sum();

        prop_assert_eq!(snapshot.gap_distribution.total(), records.len());
        prop_assert!((snapshot.average_gap * total).abs_diff(gap_sum) * 2 <= total);
        prop_assert!(snapshot.good_standing_percent <= 100);
        prop_assert!(snapshot.adoption_rate <= 100);
        prop_assert!(snapshot.total_unmet_need <= gap_sum);

        let cohort = profile(&records);
        prop_assert_eq!(cohort.in_state_count + cohort.out_of_state_count, records.len());
        let standings = cohort.standing_counts;
        prop_assert_eq!(standings.good + standings.warning + standings.probation, records.len());
    }

    #[test]
    fn prop_rank_is_stable(records in records(), spec in sort_spec()) {
        let ordered = rank(&records, spec);
        prop_assert_eq!(ordered.len(), records.len());

        let position = |id: &str, from: &[Record]| from.iter().position(|r| r.student_id == id);
        for pair in ordered.windows(2) {
            let (a, b) = (key(&pair[0], spec.field), key(&pair[1], spec.field));
            match spec.direction {
                SortDirection::Asc => prop_assert!(a <= b),
                SortDirection::Desc => prop_assert!(a >= b),
            }
        }
        // Distinct ids let us track original positions of equal-key runs.
        let mut ids: Vec<&str> = records.iter().map(|r| r.student_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.len() == records.len() {
            for pair in ordered.windows(2) {
                if key(&pair[0], spec.field) == key(&pair[1], spec.field) {
                    prop_assert!(
                        position(&pair[0].student_id, &records) < position(&pair[1].student_id, &records)
                    );
                }
            }
        }
    }

    #[test]
    fn prop_export_has_one_field_per_column(
        records in records(),
        include_contact in any::<bool>(),
        include_academic in any::<bool>(),
    ) {
        let options = ExportOptions { include_contact, include_academic };
        let text = export_table(&records, options);
        let lines: Vec<&str> = text.lines().collect();
        let width = 8 + 4 * usize::from(include_contact) + 2 * usize::from(include_academic) + 1;

        prop_assert_eq!(lines.len(), records.len() + 1);
        prop_assert_eq!(lines[0].split(',').count(), width);
        for (line, record) in lines[1..].iter().zip(&records) {
            let inner = line.strip_prefix('"').and_then(|l| l.strip_suffix('"'));
            prop_assert!(inner.is_some());
            let fields: Vec<&str> = inner.unwrap_or_default().split("\",\"").collect();
            prop_assert_eq!(fields.len(), width);
            prop_assert_eq!(fields[0], record.student_id.as_str());
            prop_assert_eq!(fields[2], record.gap_amount.to_string());
        }
    }

    #[test]
    fn prop_stages_are_idempotent(records in records(), criteria in criteria(), spec in sort_spec()) {
        prop_assert_eq!(filter(&records, &criteria), filter(&records, &criteria));
        prop_assert_eq!(aggregate(&records), aggregate(&records));
        prop_assert_eq!(rank(&records, spec), rank(&records, spec));
        let options = ExportOptions { include_contact: true, include_academic: true };
        prop_assert_eq!(export_table(&records, options), export_table(&records, options));
    }

    #[test]
    fn prop_generated_records_satisfy_thresholds(record in record()) {
        let thresholds = Thresholds::default();
        prop_assert!(thresholds.is_consistent(&record));
        prop_assert_eq!(record.risk_level == RiskLevel::High, record.risk_score >= 70);
        prop_assert_eq!(record.academic_standing == AcademicStanding::Good, record.gpa >= 2.5);
    }
}
