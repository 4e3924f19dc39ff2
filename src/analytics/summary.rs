//! Headline policy figures for the admin overview

use serde::Serialize;

use super::round2;
use crate::records::{PolicyRecord, RenewalStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    pub total_policies: usize,
    pub active: usize,
    pub inactive: usize,
    pub pending: usize,
    pub total_premium: f64,
    pub average_premium: f64,
}

pub fn policy_summary(policies: &[PolicyRecord]) -> PolicySummary {
    let mut summary = PolicySummary {
        total_policies: policies.len(),
        ..Default::default()
    };
    let mut premium = 0.0;

    for policy in policies {
        match policy.status {
            RenewalStatus::Active => summary.active += 1,
            RenewalStatus::Inactive => summary.inactive += 1,
            RenewalStatus::Pending => summary.pending += 1,
        }
        premium += policy.premium;
    }

    summary.total_premium = round2(premium);
    if !policies.is_empty() {
        summary.average_premium = round2(premium / policies.len() as f64);
    }
    summary
}

/// Policies in the given renewal status, input order preserved
pub fn filter_by_status(policies: &[PolicyRecord], status: RenewalStatus) -> Vec<&PolicyRecord> {
    policies.iter().filter(|p| p.status == status).collect()
}
