use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{FilterCriteria, Record, Residency, SortSpec};
use crate::rank;
use crate::stats::{self, GapBucket};

/// `$1.2M` from one million up, otherwise whole dollars with thousands separators.
pub fn format_currency(amount: u64) -> String {
    if amount >= 1_000_000 {
        return format!("${:.1}M", amount as f64 / 1_000_000.0);
    }
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}

pub fn describe_criteria(criteria: &FilterCriteria) -> String {
    format!(
        "semester: {}, residency: {}, level: {}",
        criteria.semester, criteria.residency, criteria.student_level
    )
}

/// Markdown dashboard for records that have already been filtered with `criteria`.
pub fn build_report(
    criteria: &FilterCriteria,
    generated_on: NaiveDate,
    records: &[Record],
    sort: SortSpec,
    flagged_limit: usize,
) -> String {
    let snapshot = stats::aggregate(records);
    let profile = stats::profile(records);
    let flagged = rank::top_flagged(&rank::rank(records, sort), flagged_limit);

    let mut output = String::new();

    let _ = writeln!(output, "# Financial Gap Analysis");
    let _ = writeln!(
        output,
        "Generated {} for {} students ({})",
        generated_on,
        profile.total_students,
        describe_criteria(criteria)
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Key Figures");
    let _ = writeln!(output, "- Good standing: {}%", snapshot.good_standing_percent);
    let _ = writeln!(output, "- Average gap: {}", format_currency(snapshot.average_gap));
    let _ = writeln!(
        output,
        "- Total unmet need (gap > $5k): {}",
        format_currency(snapshot.total_unmet_need)
    );
    let _ = writeln!(output, "- High risk students: {}", snapshot.high_risk_count);
    let _ = writeln!(
        output,
        "- Installment plans: {} ({}% adoption)",
        snapshot.installment_plan_count, snapshot.adoption_rate
    );
    let _ = writeln!(output, "- Average credit hours: {:.1}", profile.average_credit_hours);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Average Gap by Residency");
    for residency in Residency::ALL {
        let count = match residency {
            Residency::InState => profile.in_state_count,
            Residency::OutOfState => profile.out_of_state_count,
        };
        let _ = writeln!(
            output,
            "- {}: {} across {} students",
            residency,
            format_currency(snapshot.avg_gap_by_residency.get(*residency)),
            count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Gap Distribution");
    for bucket in [
        GapBucket::UpTo2k,
        GapBucket::From2kTo5k,
        GapBucket::From5kTo10k,
        GapBucket::Over10k,
    ] {
        let _ = writeln!(
            output,
            "- {}: {}",
            bucket.label(),
            snapshot.gap_distribution.count(bucket)
        );
    }
    let _ = writeln!(output, "- Median gap: {}", format_currency(profile.median_gap.into()));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Academic Standing");
    let _ = writeln!(output, "- Good: {}", profile.standing_counts.good);
    let _ = writeln!(output, "- Warning: {}", profile.standing_counts.warning);
    let _ = writeln!(output, "- Probation: {}", profile.standing_counts.probation);
    for (level, gpa) in &profile.avg_gpa_by_level {
        let count = profile.level_counts.get(level).copied().unwrap_or(0);
        let _ = writeln!(output, "- {level}: {count} students, average GPA {gpa:.2}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Flagged Students");
    if flagged.is_empty() {
        let _ = writeln!(output, "No Medium or High risk students in this selection.");
    } else {
        for record in &flagged {
            let _ = writeln!(
                output,
                "- {} ({}, {} credit hours) gap {} risk {}",
                record.student_id,
                record.student_level,
                record.credit_hours,
                format_currency(record.gap_amount.into()),
                record.risk_level
            );
        }
    }

    output
}
