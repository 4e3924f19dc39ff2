//! Customer demographics: age brackets, gender mix, region counts

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::{percentage_of, round2};
use crate::records::CustomerRecord;

/// Bucket label for customers without an address
pub const UNKNOWN_REGION: &str = "UNKNOWN";

/// A named count for bar and pie charts
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub name: String,
    pub value: u32,
    /// Share of the counted customers, 2 decimals
    pub percentage: f64,
}

/// Inclusive age range; `max: None` is open-ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBracket {
    pub label: &'static str,
    pub min: u32,
    pub max: Option<u32>,
}

impl AgeBracket {
    pub fn contains(&self, age: u32) -> bool {
        age >= self.min && self.max.map_or(true, |max| age <= max)
    }
}

pub const AGE_BRACKETS: [AgeBracket; 6] = [
    AgeBracket { label: "18-24", min: 18, max: Some(24) },
    AgeBracket { label: "25-34", min: 25, max: Some(34) },
    AgeBracket { label: "35-44", min: 35, max: Some(44) },
    AgeBracket { label: "45-54", min: 45, max: Some(54) },
    AgeBracket { label: "55-64", min: 55, max: Some(64) },
    AgeBracket { label: "65+", min: 65, max: None },
];

/// Recognized gender keys (after trim + upper-case) and their display labels
const GENDER_LABELS: [(&str, &str); 4] = [
    ("MALE", "Male"),
    ("FEMALE", "Female"),
    ("OTHER", "Other"),
    ("PREFER_NOT_TO_SAY", "Prefer not to say"),
];

/// Whole years between `dob` and `today`. A birthday later this year doesn't count yet.
/// Returns `None` for a date of birth in the future.
pub fn age_on(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    if dob > today {
        return None;
    }

    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }

    u32::try_from(years).ok()
}

/// Counts per age bracket, always one entry per bracket in table order
pub fn age_distribution(customers: &[CustomerRecord], today: NaiveDate) -> Vec<DistributionEntry> {
    let mut counts = [0u32; AGE_BRACKETS.len()];

    for customer in customers {
        let Some(age) = customer.date_of_birth.and_then(|dob| age_on(dob, today)) else {
            continue;
        };
        // Under-18s fall through every bracket and are not counted
        if let Some(slot) = AGE_BRACKETS.iter().position(|b| b.contains(age)) {
            counts[slot] += 1;
        }
    }

    let counted: u32 = counts.iter().sum();
    AGE_BRACKETS
        .iter()
        .zip(counts)
        .map(|(bracket, value)| DistributionEntry {
            name: bracket.label.to_string(),
            value,
            percentage: round2(percentage_of(value as f64, counted as f64)),
        })
        .collect()
}

/// Counts per recognized gender, in order of first appearance.
/// Unrecognized and missing values are left out entirely, including from the percentages.
pub fn gender_distribution(customers: &[CustomerRecord]) -> Vec<DistributionEntry> {
    let labels: HashMap<&str, &str> = GENDER_LABELS.iter().copied().collect();
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for customer in customers {
        let Some(raw) = customer.gender.as_deref() else {
            continue;
        };
        let key = raw.trim().to_ascii_uppercase();
        let Some(label) = labels.get(key.as_str()).copied() else {
            log::debug!("Ignoring unrecognized gender value {:?}", raw);
            continue;
        };

        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    to_entries(counts)
}

/// Counts per address, used verbatim (trimmed) as the region key
pub fn region_distribution(customers: &[CustomerRecord]) -> Vec<DistributionEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u32)> = Vec::new();

    for customer in customers {
        let region = customer
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_REGION);

        let slot = *index.entry(region).or_insert_with(|| {
            counts.push((region, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    to_entries(counts)
}

fn to_entries(counts: Vec<(&str, u32)>) -> Vec<DistributionEntry> {
    let total: u32 = counts.iter().map(|(_, n)| n).sum();
    counts
        .into_iter()
        .map(|(name, value)| DistributionEntry {
            name: name.to_string(),
            value,
            percentage: round2(percentage_of(value as f64, total as f64)),
        })
        .collect()
}
