//! Bundle of every analytics series shown on the admin dashboard

use chrono::NaiveDate;
use serde::Serialize;

use super::{
    age_distribution, gender_distribution, monthly_policy_growth, policy_summary,
    region_distribution, revenue_distribution, DistributionEntry, MonthlyGrowthPoint,
    PolicySummary, RevenueDistributionEntry,
};
use crate::records::{CustomerRecord, PolicyRecord};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    /// Date ages were computed against
    pub as_of: NaiveDate,
    pub summary: PolicySummary,
    pub customer_count: usize,
    pub policy_growth: Vec<MonthlyGrowthPoint>,
    pub revenue_distribution: Vec<RevenueDistributionEntry>,
    pub age_distribution: Vec<DistributionEntry>,
    pub gender_distribution: Vec<DistributionEntry>,
    pub region_distribution: Vec<DistributionEntry>,
}

impl AnalyticsReport {
    pub fn build(policies: &[PolicyRecord], customers: &[CustomerRecord], today: NaiveDate) -> Self {
        Self {
            as_of: today,
            summary: policy_summary(policies),
            customer_count: customers.len(),
            policy_growth: monthly_policy_growth(policies),
            revenue_distribution: revenue_distribution(policies),
            age_distribution: age_distribution(customers, today),
            gender_distribution: gender_distribution(customers),
            region_distribution: region_distribution(customers),
        }
    }
}
