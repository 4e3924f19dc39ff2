//! Load policy and customer exports from CSV or JSON
//!
//! CSV exports use the same camelCase column names as the API payloads:
//! `id,customerId,startDate,premium,coverage,status` for policies and
//! `id,firstName,lastName,email,dateOfBirth,gender,address` for customers.
//!
//! Every CSV column is read as raw text so ids such as `007` or `1.5` keep
//! their exact spelling.

use super::wire::parse_amount;
use super::{non_blank, CustomerPayload, CustomerRecord, PolicyPayload, PolicyRecord};
use crate::error::Result;
use csv::{Reader, Trim};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw CSV row matching the policy export columns
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PolicyCsvRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    customer_id: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    premium: Option<String>,
    #[serde(default)]
    coverage: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl PolicyCsvRow {
    fn to_payload(self) -> PolicyPayload {
        PolicyPayload {
            id: non_blank(self.id),
            customer_id: non_blank(self.customer_id),
            start_date: self.start_date,
            premium: self.premium.as_deref().and_then(parse_amount),
            coverage: self.coverage,
            status: self.status,
        }
    }
}

/// Raw CSV row matching the customer export columns
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerCsvRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    date_of_birth: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    address: Option<String>,
}

impl CustomerCsvRow {
    fn to_payload(self) -> CustomerPayload {
        CustomerPayload {
            id: non_blank(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address,
        }
    }
}

fn csv_reader<R: Read>(reader: R) -> Reader<R> {
    csv::ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader)
}

/// Load all policies from a CSV file
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<PolicyRecord>> {
    load_policies_from_reader(File::open(path)?)
}

/// Load policies from any CSV reader (e.g., string buffer, network stream)
pub fn load_policies_from_reader<R: Read>(reader: R) -> Result<Vec<PolicyRecord>> {
    let mut csv_reader = csv_reader(reader);
    let mut policies = Vec::new();

    for result in csv_reader.deserialize() {
        let row: PolicyCsvRow = result?;
        policies.push(PolicyRecord::from(row.to_payload()));
    }

    log::debug!("Loaded {} policies from CSV", policies.len());
    Ok(policies)
}

/// Load policies from a JSON array of API payloads
pub fn load_policies_json<R: Read>(reader: R) -> Result<Vec<PolicyRecord>> {
    let rows: Vec<PolicyPayload> = serde_json::from_reader(reader)?;
    Ok(rows.into_iter().map(PolicyRecord::from).collect())
}

/// Load all customers from a CSV file
pub fn load_customers<P: AsRef<Path>>(path: P) -> Result<Vec<CustomerRecord>> {
    load_customers_from_reader(File::open(path)?)
}

/// Load customers from any CSV reader
pub fn load_customers_from_reader<R: Read>(reader: R) -> Result<Vec<CustomerRecord>> {
    let mut csv_reader = csv_reader(reader);
    let mut customers = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CustomerCsvRow = result?;
        customers.push(CustomerRecord::from(row.to_payload()));
    }

    log::debug!("Loaded {} customers from CSV", customers.len());
    Ok(customers)
}

/// Load customers from a JSON array of API payloads
pub fn load_customers_json<R: Read>(reader: R) -> Result<Vec<CustomerRecord>> {
    let rows: Vec<CustomerPayload> = serde_json::from_reader(reader)?;
    Ok(rows.into_iter().map(CustomerRecord::from).collect())
}
