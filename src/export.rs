use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::models::{ExportOptions, Record};

const BASE_COLUMNS: [&str; 8] = [
    "Student ID",
    "Residency",
    "Gap Amount",
    "Risk Level",
    "Risk Score",
    "Credit Hours",
    "Semester",
    "Student Level",
];
const CONTACT_COLUMNS: [&str; 4] = ["First Name", "Last Name", "Email", "Phone"];
const ACADEMIC_COLUMNS: [&str; 2] = ["GPA", "Academic Standing"];
const INSTALLMENT_COLUMN: &str = "Has Installment Plan";

/// Header names in export order.
pub fn columns(options: ExportOptions) -> Vec<&'static str> {
    let mut columns = BASE_COLUMNS.to_vec();
    if options.include_contact {
        columns.extend(CONTACT_COLUMNS);
    }
    if options.include_academic {
        columns.extend(ACADEMIC_COLUMNS);
    }
    columns.push(INSTALLMENT_COLUMN);
    columns
}

fn row(record: &Record, options: ExportOptions) -> Vec<String> {
    let mut values = vec![
        record.student_id.clone(),
        record.residency.to_string(),
        record.gap_amount.to_string(),
        record.risk_level.to_string(),
        record.risk_score.to_string(),
        record.credit_hours.to_string(),
        record.semester.to_string(),
        record.student_level.to_string(),
    ];
    if options.include_contact {
        values.extend([
            record.first_name.clone(),
            record.last_name.clone(),
            record.email.clone(),
            record.phone.clone(),
        ]);
    }
    if options.include_academic {
        values.extend([record.gpa.to_string(), record.academic_standing.to_string()]);
    }
    let plan = if record.has_installment_plan { "Yes" } else { "No" };
    values.push(plan.to_string());
    values
}

/// Renders `records` as CSV text in the order given.
///
/// The header line is unquoted. Every data field is quoted and embedded
/// quotes are doubled. Each line ends with `\n`.
pub fn export_table(records: &[Record], options: ExportOptions) -> String {
    let mut buffer = columns(options).join(",").into_bytes();
    buffer.push(b'\n');

    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);
        for record in records {
            // Writes into a Vec cannot fail and every row has the header's width.
            writer
                .write_record(row(record, options))
                .expect("in-memory CSV write");
        }
        writer.flush().expect("in-memory CSV flush");
    }

    String::from_utf8_lossy(&buffer).into_owned()
}

/// Suggested file name for an export produced on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("gap_analysis_export_{}.csv", date.format("%Y-%m-%d"))
}
