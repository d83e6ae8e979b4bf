use std::collections::BTreeMap;

use log::debug;

use crate::models::{
    AcademicStanding, CohortProfile, GapDistribution, Record, Residency, ResidencyGaps, RiskLevel,
    StandingCounts, StatisticsSnapshot, StudentLevel,
};

/// Gap above which a student counts toward unmet need.
pub const UNMET_NEED_THRESHOLD: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapBucket {
    UpTo2k,
    From2kTo5k,
    From5kTo10k,
    Over10k,
}

impl GapBucket {
    pub fn for_amount(gap_amount: u32) -> Self {
        match gap_amount {
            0..=2000 => GapBucket::UpTo2k,
            2001..=5000 => GapBucket::From2kTo5k,
            5001..=10_000 => GapBucket::From5kTo10k,
            _ => GapBucket::Over10k,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GapBucket::UpTo2k => "$0 - $2,000",
            GapBucket::From2kTo5k => "$2,001 - $5,000",
            GapBucket::From5kTo10k => "$5,001 - $10,000",
            GapBucket::Over10k => "Over $10,000",
        }
    }
}

impl GapDistribution {
    pub fn count(&self, bucket: GapBucket) -> usize {
        match bucket {
            GapBucket::UpTo2k => self.up_to_2k,
            GapBucket::From2kTo5k => self.from_2k_to_5k,
            GapBucket::From5kTo10k => self.from_5k_to_10k,
            GapBucket::Over10k => self.over_10k,
        }
    }

    fn add(&mut self, gap_amount: u32) {
        match GapBucket::for_amount(gap_amount) {
            GapBucket::UpTo2k => self.up_to_2k += 1,
            GapBucket::From2kTo5k => self.from_2k_to_5k += 1,
            GapBucket::From5kTo10k => self.from_5k_to_10k += 1,
            GapBucket::Over10k => self.over_10k += 1,
        }
    }
}

/// `numerator / denominator` rounded half away from zero; 0 when the denominator is 0.
pub fn rounded_ratio(numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    (2 * numerator + denominator) / (2 * denominator)
}

fn percent(count: usize, total: usize) -> u64 {
    rounded_ratio(100 * count as u64, total as u64)
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Headline metrics over `records`. Empty input yields an all-zero snapshot.
pub fn aggregate(records: &[Record]) -> StatisticsSnapshot {
    let total = records.len();
    if total == 0 {
        return StatisticsSnapshot::default();
    }

    let mut good = 0usize;
    let mut gap_sum = 0u64;
    let mut total_unmet_need = 0u64;
    let mut high_risk_count = 0usize;
    let mut installment_plan_count = 0usize;
    let mut residency_sums = [(0u64, 0u64); 2];
    let mut gap_distribution = GapDistribution::default();

    for record in records {
        let gap = u64::from(record.gap_amount);
        gap_sum += gap;
        if record.gap_amount > UNMET_NEED_THRESHOLD {
            total_unmet_need += gap;
        }
        if record.academic_standing == AcademicStanding::Good {
            good += 1;
        }
        if record.risk_level == RiskLevel::High {
            high_risk_count += 1;
        }
        if record.has_installment_plan {
            installment_plan_count += 1;
        }
        let slot = match record.residency {
            Residency::InState => &mut residency_sums[0],
            Residency::OutOfState => &mut residency_sums[1],
        };
        slot.0 += gap;
        slot.1 += 1;
        gap_distribution.add(record.gap_amount);
    }

    let snapshot = StatisticsSnapshot {
        good_standing_percent: percent(good, total),
        average_gap: rounded_ratio(gap_sum, total as u64),
        total_unmet_need,
        high_risk_count,
        installment_plan_count,
        adoption_rate: percent(installment_plan_count, total),
        avg_gap_by_residency: ResidencyGaps {
            in_state: rounded_ratio(residency_sums[0].0, residency_sums[0].1),
            out_of_state: rounded_ratio(residency_sums[1].0, residency_sums[1].1),
        },
        gap_distribution,
    };
    debug!("aggregated {} records: {:?}", total, snapshot);
    snapshot
}

/// Secondary cohort figures: headcounts, median gap, standing and level mixes.
pub fn profile(records: &[Record]) -> CohortProfile {
    let total = records.len();
    if total == 0 {
        return CohortProfile::default();
    }

    let mut standing_counts = StandingCounts::default();
    let mut level_totals: BTreeMap<StudentLevel, (usize, f64)> = BTreeMap::new();
    let mut in_state_count = 0usize;
    let mut credit_hours = 0u64;
    let mut gaps: Vec<u32> = Vec::with_capacity(total);

    for record in records {
        match record.academic_standing {
            AcademicStanding::Good => standing_counts.good += 1,
            AcademicStanding::Warning => standing_counts.warning += 1,
            AcademicStanding::Probation => standing_counts.probation += 1,
        }
        if record.residency == Residency::InState {
            in_state_count += 1;
        }
        let entry = level_totals.entry(record.student_level).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.gpa;
        credit_hours += u64::from(record.credit_hours);
        gaps.push(record.gap_amount);
    }

    gaps.sort_unstable();
    let high_gap_count = gaps.iter().filter(|gap| **gap > UNMET_NEED_THRESHOLD).count();

    CohortProfile {
        total_students: total,
        in_state_count,
        out_of_state_count: total - in_state_count,
        average_credit_hours: round_to(credit_hours as f64 / total as f64, 1),
        median_gap: gaps[total / 2],
        high_gap_count,
        standing_counts,
        level_counts: level_totals
            .iter()
            .map(|(level, (count, _))| (*level, *count))
            .collect(),
        avg_gpa_by_level: level_totals
            .into_iter()
            .map(|(level, (count, gpa_sum))| (level, round_to(gpa_sum / count as f64, 2)))
            .collect(),
    }
}
