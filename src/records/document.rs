//! Policy documents (contracts, schedules, claim forms)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::optional_id;
use super::{non_blank, parse_record_date};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "optional_id")]
    pub policy_id: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    pub policy_id: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub uploaded_at: Option<NaiveDate>,
}

impl DocumentRecord {
    /// Convert a payload fetched for `policy_id`. The listing endpoint does not
    /// always echo the policy id back, so the requested one fills the gap.
    pub fn from_payload(payload: DocumentPayload, policy_id: &str) -> Self {
        Self {
            id: payload.id.unwrap_or_default(),
            policy_id: payload.policy_id.unwrap_or_else(|| policy_id.to_string()),
            file_name: non_blank(payload.file_name).unwrap_or_else(|| "untitled".to_string()),
            content_type: non_blank(payload.content_type),
            uploaded_at: payload.uploaded_at.as_deref().and_then(parse_record_date),
        }
    }
}
