use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use log::info;

use student_aid_gap_analysis::models::{
    ExportOptions, FilterCriteria, Record, Residency, Selection, Semester, SortDirection,
    SortField, SortSpec, StudentLevel,
};
use student_aid_gap_analysis::rank::DEFAULT_FLAGGED_LIMIT;
use student_aid_gap_analysis::report::format_currency;
use student_aid_gap_analysis::{
    aggregate, export, filter, import, profile, rank, report, top_flagged,
};

#[derive(Parser)]
#[command(name = "gap-analysis")]
#[command(about = "Financial gap and risk analysis over student aid records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Scope {
    /// CSV file of student records
    #[arg(long)]
    records: PathBuf,
    /// Semester to keep, or "all"
    #[arg(long, default_value = "all")]
    semester: Selection<Semester>,
    /// Residency to keep, or "all"
    #[arg(long, default_value = "all")]
    residency: Selection<Residency>,
    /// Student level to keep, or "all"
    #[arg(long, default_value = "all")]
    level: Selection<StudentLevel>,
}

impl Scope {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            semester: self.semester.clone(),
            residency: self.residency.clone(),
            student_level: self.level.clone(),
        }
    }

    fn load(&self) -> anyhow::Result<(FilterCriteria, Vec<Record>)> {
        let criteria = self.criteria();
        let records = import::read_records(&self.records)?;
        let selected = filter(&records, &criteria);
        info!(
            "{} of {} records match {}",
            selected.len(),
            records.len(),
            report::describe_criteria(&criteria)
        );
        Ok((criteria, selected))
    }
}

#[derive(Args)]
struct SortArgs {
    /// id, credit_hours, gap_amount or risk_level
    #[arg(long, default_value = "risk_level")]
    sort: SortField,
    /// asc or desc
    #[arg(long, default_value = "desc")]
    direction: SortDirection,
}

impl SortArgs {
    fn spec(&self) -> SortSpec {
        SortSpec {
            field: self.sort,
            direction: self.direction,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline metrics for the selection
    Summary {
        #[command(flatten)]
        scope: Scope,
        #[arg(long)]
        json: bool,
    },
    /// List Medium and High risk students
    Flagged {
        #[command(flatten)]
        scope: Scope,
        #[command(flatten)]
        ordering: SortArgs,
        #[arg(long, default_value_t = DEFAULT_FLAGGED_LIMIT)]
        limit: usize,
    },
    /// Write the selection as CSV
    Export {
        #[command(flatten)]
        scope: Scope,
        /// Sort before exporting; records keep file order otherwise
        #[arg(long)]
        sort: Option<SortField>,
        #[arg(long, default_value = "desc")]
        direction: SortDirection,
        #[arg(long)]
        include_contact: bool,
        #[arg(long)]
        include_academic: bool,
        /// Defaults to gap_analysis_export_<today>.csv
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        scope: Scope,
        #[command(flatten)]
        ordering: SortArgs,
        #[arg(long, default_value_t = DEFAULT_FLAGGED_LIMIT)]
        limit: usize,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { scope, json } => {
            let (_, records) = scope.load()?;
            let snapshot = aggregate(&records);
            let cohort = profile(&records);

            if json {
                let body = serde_json::json!({ "snapshot": snapshot, "profile": cohort });
                println!("{}", serde_json::to_string_pretty(&body)?);
                return Ok(());
            }

            println!("Students: {}", cohort.total_students);
            println!("Good standing: {}%", snapshot.good_standing_percent);
            println!("Average gap: {}", format_currency(snapshot.average_gap));
            println!(
                "Total unmet need (gap > $5k): {}",
                format_currency(snapshot.total_unmet_need)
            );
            println!("High risk students: {}", snapshot.high_risk_count);
            println!(
                "Installment plans: {} ({}% adoption)",
                snapshot.installment_plan_count, snapshot.adoption_rate
            );
            println!(
                "Average gap by residency: In-State {}, Out-of-State {}",
                format_currency(snapshot.avg_gap_by_residency.in_state),
                format_currency(snapshot.avg_gap_by_residency.out_of_state)
            );
        }
        Commands::Flagged {
            scope,
            ordering,
            limit,
        } => {
            let (_, records) = scope.load()?;
            let flagged = top_flagged(&rank(&records, ordering.spec()), limit);

            if flagged.is_empty() {
                println!("No Medium or High risk students in this selection.");
                return Ok(());
            }

            println!("Flagged students:");
            for record in &flagged {
                println!(
                    "- {} {} credit hours, gap {}, risk {} ({})",
                    record.student_id,
                    record.credit_hours,
                    format_currency(record.gap_amount.into()),
                    record.risk_level,
                    record.risk_score
                );
            }
        }
        Commands::Export {
            scope,
            sort,
            direction,
            include_contact,
            include_academic,
            out,
        } => {
            let (_, mut records) = scope.load()?;
            if let Some(field) = sort {
                records = rank(&records, SortSpec { field, direction });
            }
            let options = ExportOptions {
                include_contact,
                include_academic,
            };
            let out = out
                .unwrap_or_else(|| PathBuf::from(export::export_filename(Local::now().date_naive())));
            std::fs::write(&out, export::export_table(&records, options))
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Exported {} records to {}.", records.len(), out.display());
        }
        Commands::Report {
            scope,
            ordering,
            limit,
            out,
        } => {
            let (criteria, records) = scope.load()?;
            let body = report::build_report(
                &criteria,
                Local::now().date_naive(),
                &records,
                ordering.spec(),
                limit,
            );
            std::fs::write(&out, body)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
