//! Chart-ready aggregations over policy and customer snapshots
//!
//! Everything here is a pure function of its inputs: no I/O, no clock reads
//! (callers pass `today` where ages matter), and every percentage is guarded
//! so an empty denominator yields 0.

mod growth;
mod revenue;
mod demographics;
mod summary;
mod report;

pub use growth::{monthly_policy_growth, monthly_policy_counts, month_key, MonthlyGrowthPoint};
pub use revenue::{revenue_distribution, RevenueDistributionEntry};
pub use demographics::{
    age_on, age_distribution, gender_distribution, region_distribution,
    AgeBracket, DistributionEntry, AGE_BRACKETS, UNKNOWN_REGION,
};
pub use summary::{policy_summary, filter_by_status, PolicySummary};
pub use report::AnalyticsReport;

/// Round to 2 decimal places, halves away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole * 100`, or 0 when `whole` is zero
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
