//! Customer records and the request bodies for customer maintenance

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::optional_id;
use super::{non_blank, parse_record_date};

/// Customer as it arrives from the API or a CSV export
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(default, deserialize_with = "optional_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// A validated customer snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Free text; normalized only when bucketed
    pub gender: Option<String>,
    pub address: Option<String>,
}

impl CustomerRecord {
    /// Bare customer with just an id, for building records field by field
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            first_name: None,
            last_name: None,
            email: None,
            date_of_birth: None,
            gender: None,
            address: None,
        }
    }

    pub fn with_date_of_birth(mut self, dob: NaiveDate) -> Self {
        self.date_of_birth = Some(dob);
        self
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = Some(gender.to_string());
        self
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.address = Some(address.to_string());
        self
    }

    /// "First Last", skipping whichever part is missing
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Apply an update locally, mirroring what the API stores
    pub fn apply(&mut self, update: &CustomerUpdate) {
        if let Some(v) = &update.first_name {
            self.first_name = Some(v.clone());
        }
        if let Some(v) = &update.last_name {
            self.last_name = Some(v.clone());
        }
        if let Some(v) = &update.email {
            self.email = Some(v.clone());
        }
        if let Some(v) = update.date_of_birth {
            self.date_of_birth = Some(v);
        }
        if let Some(v) = &update.gender {
            self.gender = Some(v.clone());
        }
        if let Some(v) = &update.address {
            self.address = Some(v.clone());
        }
    }
}

impl From<CustomerPayload> for CustomerRecord {
    fn from(payload: CustomerPayload) -> Self {
        Self {
            id: payload.id.unwrap_or_default(),
            first_name: non_blank(payload.first_name),
            last_name: non_blank(payload.last_name),
            email: non_blank(payload.email),
            date_of_birth: payload.date_of_birth.as_deref().and_then(parse_record_date),
            // Gender and address are kept as sent; bucketing handles normalization
            gender: payload.gender,
            address: payload.address,
        }
    }
}

/// Body for `POST customers`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Body for `PUT customers/{id}`; only the fields that are set are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_conversion() {
        let json = r#"{
            "id": 9,
            "firstName": "Ana",
            "lastName": " ",
            "dateOfBirth": "1990-06-01",
            "gender": " female ",
            "address": "Lisbon"
        }"#;
        let payload: CustomerPayload = serde_json::from_str(json).unwrap();
        let customer = CustomerRecord::from(payload);

        assert_eq!(customer.id, "9");
        assert_eq!(customer.first_name.as_deref(), Some("Ana"));
        assert_eq!(customer.last_name, None);
        assert_eq!(customer.date_of_birth, NaiveDate::from_ymd_opt(1990, 6, 1));
        assert_eq!(customer.gender.as_deref(), Some(" female "));
        assert_eq!(customer.display_name(), "Ana");
    }

    #[test]
    fn test_apply_update() {
        let mut customer = CustomerRecord::new("c1").with_address("Porto");
        customer.apply(&CustomerUpdate {
            email: Some("c1@example.com".into()),
            address: Some("Braga".into()),
            ..Default::default()
        });

        assert_eq!(customer.email.as_deref(), Some("c1@example.com"));
        assert_eq!(customer.address.as_deref(), Some("Braga"));
        assert_eq!(customer.gender, None);
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = CustomerUpdate {
            last_name: Some("Silva".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"lastName":"Silva"}"#);
    }
}
