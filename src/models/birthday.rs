//! Birth record models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A birth record on the shared board.
///
/// Coordinates are cached from the last geocoding lookup of `pob` and are absent
/// when the place is unset, unmatched, or the geocoder was unreachable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthRecord {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    /// Date of birth (always a valid calendar date)
    pub dob: NaiveDate,
    /// Time of birth, free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tob: Option<String>,
    /// Place of birth, free text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating or fully replacing a birth record.
///
/// The date arrives as a raw string so malformed input maps to a validation
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBirthdayRequest {
    pub name: String,
    /// ISO calendar date, YYYY-MM-DD
    pub dob: String,
    #[serde(default)]
    pub tob: Option<String>,
    #[serde(default)]
    pub pob: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A board entry: a record plus its computed countdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardEntry {
    pub record: BirthRecord,
    pub days_left: i64,
    pub age_turning: i32,
}

/// The shared board: all entries sorted by countdown, plus the soonest subset.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardResponse {
    pub entries: Vec<BoardEntry>,
    /// All entries tied for the minimum days left (handles same-day birthdays)
    pub upcoming: Vec<BoardEntry>,
}

/// Response body for the fun-facts endpoint.
#[derive(Debug, Serialize)]
pub struct FactsResponse {
    pub facts: Vec<String>,
}
