use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::NamedRef;

/// Bare issue reference carried by a time entry. Only the id is present;
/// full issue data requires a separate lookup.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct IssueRef {
    pub id: u64,
}

/// One logged time record for a user, project and date as returned by
/// `GET /time_entries.json`. Hours are decimal to keep daily summation
/// exact.
#[derive(Debug, Deserialize, Clone)]
pub struct TimeEntry {
    pub id: u64,
    pub project: NamedRef,
    #[serde(default)]
    pub issue: Option<IssueRef>,
    pub activity: NamedRef,
    #[serde(default)]
    pub comments: Option<String>,
    pub hours: Decimal,
    pub spent_on: NaiveDate,
}

/// Envelope wrapping the entry list endpoint response.
#[derive(Debug, Deserialize)]
pub struct TimeEntryList {
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
}
