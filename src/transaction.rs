// 💳 Card Transaction - The immutable record every engine reads
//
// Fields are kept as open strings so the engines never need to change when a
// new brand or decline reason shows up. The closed vocabularies live in
// `catalog`, which only the loading boundary consults.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::ops::RangeInclusive;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ReportError, ReportResult};

/// Status value that places a record in the approved partition.
/// Every other value, recognised or not, counts as declined.
pub const APPROVED: &str = "Approved";

/// Status value written for declined records.
pub const DECLINED: &str = "Declined";

/// Naive formats tried after RFC 3339. Values without an offset are UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Years that fit a four-digit month key.
const KEYABLE_YEARS: RangeInclusive<i32> = 0..=9999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,

    /// Carried through to listings; not used for filtering or aggregation
    pub merchant_id: String,

    pub amount: f64,

    pub card_brand: String,

    pub status: String,

    /// Present only on declined records in well-formed data
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub decline_reason_code: Option<String>,

    /// ISO-8601 timestamp, parsed on demand by `occurred_at`
    pub transaction_date: String,
}

/// Tagged view over `status` + `decline_reason_code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<'a> {
    Approved,
    Declined { reason: Option<&'a str> },
}

impl Outcome<'_> {
    pub fn is_approved(&self) -> bool {
        matches!(self, Outcome::Approved)
    }
}

impl Transaction {
    pub fn approved(
        transaction_id: &str,
        merchant_id: &str,
        amount: f64,
        card_brand: &str,
        transaction_date: &str,
    ) -> Self {
        Transaction {
            transaction_id: transaction_id.to_string(),
            merchant_id: merchant_id.to_string(),
            amount,
            card_brand: card_brand.to_string(),
            status: APPROVED.to_string(),
            decline_reason_code: None,
            transaction_date: transaction_date.to_string(),
        }
    }

    pub fn declined(
        transaction_id: &str,
        merchant_id: &str,
        amount: f64,
        card_brand: &str,
        reason: &str,
        transaction_date: &str,
    ) -> Self {
        Transaction {
            transaction_id: transaction_id.to_string(),
            merchant_id: merchant_id.to_string(),
            amount,
            card_brand: card_brand.to_string(),
            status: DECLINED.to_string(),
            decline_reason_code: Some(reason.to_string()),
            transaction_date: transaction_date.to_string(),
        }
    }

    /// Binary partition: exactly "Approved" is approved, anything else declined.
    pub fn outcome(&self) -> Outcome<'_> {
        if self.status == APPROVED {
            Outcome::Approved
        } else {
            Outcome::Declined {
                reason: self.decline_reason_code.as_deref(),
            }
        }
    }

    pub fn is_approved(&self) -> bool {
        self.outcome().is_approved()
    }

    /// When the transaction happened, in UTC.
    pub fn occurred_at(&self) -> ReportResult<DateTime<Utc>> {
        parse_transaction_date(&self.transaction_date)
    }
}

/// Parse an ISO-8601 date or date-time into UTC.
///
/// Accepts RFC 3339 (offset converted to UTC), naive date-times and plain
/// dates (both taken as UTC). Anything else, including years outside
/// 0000..=9999 that have no `YYYY-MM` month key, is a `DateParse` error
/// rather than a silently wrong month bucket.
pub fn parse_transaction_date(value: &str) -> ReportResult<DateTime<Utc>> {
    parse_any_format(value.trim())
        .filter(|dt| KEYABLE_YEARS.contains(&dt.year()))
        .ok_or_else(|| ReportError::date_parse(value))
}

fn parse_any_format(trimmed: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
