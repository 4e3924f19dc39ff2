//! Revenue split by coverage type

use std::collections::HashMap;

use serde::Serialize;

use super::{percentage_of, round2};
use crate::records::PolicyRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDistributionEntry {
    #[serde(rename = "type")]
    pub coverage_type: String,
    pub total_revenue: f64,
    pub percentage: f64,
}

/// Sum premiums per coverage label, in order of each label's first appearance
pub fn revenue_distribution(policies: &[PolicyRecord]) -> Vec<RevenueDistributionEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<(&str, f64)> = Vec::new();
    let mut grand_total = 0.0;

    for policy in policies {
        let slot = *index.entry(policy.coverage.as_str()).or_insert_with(|| {
            totals.push((policy.coverage.as_str(), 0.0));
            totals.len() - 1
        });
        totals[slot].1 += policy.premium;
        grand_total += policy.premium;
    }

    totals
        .into_iter()
        .map(|(coverage, revenue)| RevenueDistributionEntry {
            coverage_type: coverage.to_string(),
            total_revenue: round2(revenue),
            percentage: round2(percentage_of(revenue, grand_total)),
        })
        .collect()
}
