use log::debug;

use crate::models::{FilterCriteria, Record};

impl FilterCriteria {
    /// Criteria that constrain nothing.
    pub fn all() -> Self {
        FilterCriteria::default()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.semester.matches(&record.semester)
            && self.residency.matches(&record.residency)
            && self.student_level.matches(&record.student_level)
    }
}

/// Keeps the records that satisfy every constraint, in their original order.
pub fn filter(records: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    let selected: Vec<Record> = records
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect();
    debug!("filter kept {} of {} records", selected.len(), records.len());
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Residency, Selection, Semester, StudentLevel};
    use crate::test_support::record;
    use pretty_assertions::assert_eq;

    fn cohort() -> Vec<Record> {
        vec![
            Record {
                semester: Semester::Fall2024,
                residency: Residency::InState,
                student_level: StudentLevel::Junior,
                ..record("V0900000")
            },
            Record {
                semester: Semester::Spring2025,
                residency: Residency::OutOfState,
                student_level: StudentLevel::Junior,
                ..record("V0900001")
            },
            Record {
                semester: Semester::Fall2024,
                residency: Residency::OutOfState,
                student_level: StudentLevel::Senior,
                ..record("V0900002")
            },
            Record {
                semester: Semester::Fall2024,
                residency: Residency::OutOfState,
                student_level: StudentLevel::Junior,
                ..record("V0900003")
            },
        ]
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.student_id.as_str()).collect()
    }

    #[test]
    fn all_criteria_is_identity() {
        let records = cohort();
        assert_eq!(filter(&records, &FilterCriteria::all()), records);
    }

    #[test]
    fn criteria_combine_with_and_and_keep_order() {
        let records = cohort();
        let criteria = FilterCriteria {
            semester: Selection::Only(Semester::Fall2024),
            residency: Selection::Only(Residency::OutOfState),
            student_level: Selection::All,
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec!["V0900002", "V0900003"]);

        let criteria = FilterCriteria {
            student_level: Selection::Only(StudentLevel::Junior),
            ..criteria
        };
        assert_eq!(ids(&filter(&records, &criteria)), vec!["V0900003"]);
    }

    #[test]
    fn unknown_values_match_nothing() {
        let records = cohort();
        let criteria = FilterCriteria {
            semester: Selection::parse("Winter 2031"),
            ..FilterCriteria::all()
        };
        assert_eq!(criteria.semester, Selection::Unmatched("Winter 2031".to_string()));
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn parsing_is_case_sensitive() {
        assert_eq!(
            Selection::<Residency>::parse("in-state"),
            Selection::Unmatched("in-state".to_string())
        );
        assert_eq!(
            Selection::<Residency>::parse("In-State"),
            Selection::Only(Residency::InState)
        );
        assert_eq!(Selection::<Residency>::parse("all"), Selection::All);
    }
}
