//! Month-over-month policy growth

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{percentage_of, round2};
use crate::records::PolicyRecord;

/// One point of the growth chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGrowthPoint {
    /// "YYYY-MM"
    pub month: String,
    pub count: u32,
    /// Percent change against the previous month with policies, 2 decimals
    pub growth_rate: f64,
}

/// Zero-padded "YYYY-MM" key; sorts lexicographically in calendar order
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Policy counts per start month, ascending by month.
/// Policies without a usable start date are skipped.
pub fn monthly_policy_counts(policies: &[PolicyRecord]) -> Vec<(String, u32)> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    let mut skipped = 0usize;

    for policy in policies {
        match policy.start_date {
            Some(date) => *counts.entry(month_key(date)).or_insert(0) += 1,
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} policies without a valid start date", skipped);
    }

    counts.into_iter().collect()
}

/// Growth series for every month after the first observed one.
///
/// The first month has no baseline and is not emitted, so `k` distinct
/// months produce `k - 1` points. Months are consecutive in the series, not
/// in the calendar: a gap month with no policies is simply absent.
pub fn monthly_policy_growth(policies: &[PolicyRecord]) -> Vec<MonthlyGrowthPoint> {
    monthly_policy_counts(policies)
        .windows(2)
        .map(|pair| {
            let (_, previous) = &pair[0];
            let (month, count) = &pair[1];
            let delta = *count as f64 - *previous as f64;

            MonthlyGrowthPoint {
                month: month.clone(),
                count: *count,
                growth_rate: round2(percentage_of(delta, *previous as f64)),
            }
        })
        .collect()
}
