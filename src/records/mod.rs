//! Typed policy, customer and document records and their loaders

mod wire;
mod policy;
mod customer;
mod document;
pub mod loader;

pub use policy::{PolicyRecord, PolicyPayload, RenewalStatus, UNKNOWN_COVERAGE};
pub use customer::{CustomerRecord, CustomerPayload, NewCustomer, CustomerUpdate};
pub use document::{DocumentRecord, DocumentPayload};
pub use loader::{
    load_policies, load_policies_from_reader, load_policies_json,
    load_customers, load_customers_from_reader, load_customers_json,
};

use chrono::{DateTime, NaiveDate};

/// Parse a record date from the API or an export.
///
/// Accepts `YYYY-MM-DD` and full RFC 3339 timestamps (the calendar date is
/// taken in the timestamp's own offset). Returns `None` for anything else.
pub fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }

    // Naive timestamps such as "2024-01-05T00:00:00" carry no offset
    if let Some((date_part, _)) = raw.split_once('T') {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            return Some(date);
        }
    }

    log::debug!("Unparseable record date: {:?}", raw);
    None
}

/// Trim an optional wire string, treating blank as absent
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
