//! Policy records as consumed by the analytics

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::{optional_amount, optional_id};
use super::{non_blank, parse_record_date};

/// Bucket label for policies without a coverage type
pub const UNKNOWN_COVERAGE: &str = "UNKNOWN";

/// Renewal status of a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RenewalStatus {
    Active,
    Inactive,
    /// Awaiting renewal; also used for statuses the backend sends that we don't know
    Pending,
}

impl RenewalStatus {
    /// Parse a status label, ignoring case. Unknown labels map to `Pending`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => RenewalStatus::Active,
            "INACTIVE" => RenewalStatus::Inactive,
            "PENDING" => RenewalStatus::Pending,
            other => {
                log::debug!("Unknown renewal status {:?}, treating as PENDING", other);
                RenewalStatus::Pending
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalStatus::Active => "ACTIVE",
            RenewalStatus::Inactive => "INACTIVE",
            RenewalStatus::Pending => "PENDING",
        }
    }
}

/// Policy as it arrives from the API or a CSV export. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub premium: Option<f64>,
    #[serde(default)]
    pub coverage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A validated policy snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRecord {
    pub id: String,
    pub customer_id: Option<String>,
    /// `None` when the source date was missing or unparseable
    pub start_date: Option<NaiveDate>,
    /// Never negative or NaN
    pub premium: f64,
    pub coverage: String,
    pub status: RenewalStatus,
}

impl PolicyRecord {
    pub fn new(id: &str, start_date: Option<NaiveDate>, premium: f64, coverage: &str) -> Self {
        Self {
            id: id.to_string(),
            customer_id: None,
            start_date,
            premium: sanitize_premium(Some(premium)),
            coverage: non_blank(Some(coverage.to_string()))
                .unwrap_or_else(|| UNKNOWN_COVERAGE.to_string()),
            status: RenewalStatus::Active,
        }
    }

    pub fn with_status(mut self, status: RenewalStatus) -> Self {
        self.status = status;
        self
    }
}

fn sanitize_premium(premium: Option<f64>) -> f64 {
    match premium {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        Some(p) => {
            log::debug!("Discarding invalid premium {}", p);
            0.0
        }
        None => 0.0,
    }
}

impl From<PolicyPayload> for PolicyRecord {
    fn from(payload: PolicyPayload) -> Self {
        let start_date = payload.start_date.as_deref().and_then(parse_record_date);

        Self {
            id: payload.id.unwrap_or_default(),
            customer_id: payload.customer_id,
            start_date,
            premium: sanitize_premium(payload.premium),
            coverage: non_blank(payload.coverage)
                .unwrap_or_else(|| UNKNOWN_COVERAGE.to_string()),
            status: payload
                .status
                .as_deref()
                .map(RenewalStatus::parse)
                .unwrap_or(RenewalStatus::Pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!(RenewalStatus::parse("active"), RenewalStatus::Active);
        assert_eq!(RenewalStatus::parse(" INACTIVE "), RenewalStatus::Inactive);
        assert_eq!(RenewalStatus::parse("Pending"), RenewalStatus::Pending);
        assert_eq!(RenewalStatus::parse("lapsed"), RenewalStatus::Pending);
    }

    #[test]
    fn test_payload_defaults() {
        let record = PolicyRecord::from(PolicyPayload {
            id: Some("p1".into()),
            start_date: Some("garbage".into()),
            premium: None,
            coverage: Some("  ".into()),
            ..Default::default()
        });

        assert_eq!(record.id, "p1");
        assert_eq!(record.start_date, None);
        assert_eq!(record.premium, 0.0);
        assert_eq!(record.coverage, UNKNOWN_COVERAGE);
        assert_eq!(record.status, RenewalStatus::Pending);
    }

    #[test]
    fn test_payload_from_api_json() {
        let json = r#"{
            "id": 17,
            "customerId": "c-3",
            "startDate": "2024-03-15",
            "premium": "1250.50",
            "coverage": "auto",
            "status": "ACTIVE"
        }"#;
        let payload: PolicyPayload = serde_json::from_str(json).unwrap();
        let record = PolicyRecord::from(payload);

        assert_eq!(record.id, "17");
        assert_eq!(record.customer_id.as_deref(), Some("c-3"));
        assert_eq!(record.start_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(record.premium, 1250.50);
        assert_eq!(record.coverage, "auto");
        assert_eq!(record.status, RenewalStatus::Active);
    }

    #[test]
    fn test_invalid_premiums_become_zero() {
        assert_eq!(sanitize_premium(Some(-10.0)), 0.0);
        assert_eq!(sanitize_premium(Some(f64::NAN)), 0.0);
        assert_eq!(sanitize_premium(Some(f64::INFINITY)), 0.0);
        assert_eq!(sanitize_premium(Some(42.0)), 42.0);
    }
}
