// 📊 Aggregation Engine - Counts and amounts per month
//
// Reduces a transaction list into Metrics, either for the current calendar
// month (MTD) or bucketed by every month present in the input.
//
// Time reference: month keys are always computed in UTC, for transaction
// dates and for "now" alike.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{ReportError, ReportResult};
use crate::transaction::{Outcome, Transaction};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ============================================================================
// METRICS
// ============================================================================

/// Per-brand breakdown. `amount` covers every status.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandMetrics {
    pub total: usize,
    pub approved: usize,
    pub declined: usize,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_transactions: usize,
    pub total_approved: usize,
    pub total_declined: usize,
    pub total_amount: f64,
    pub approved_amount: f64,
    pub declined_amount: f64,
    pub by_card_brand: BTreeMap<String, BrandMetrics>,
    pub by_decline_reason: BTreeMap<String, usize>,
}

impl Metrics {
    pub fn approval_rate(&self) -> f64 {
        if self.total_transactions == 0 {
            0.0
        } else {
            round2(self.total_approved as f64 / self.total_transactions as f64 * 100.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// "YYYY-MM"
    pub month: String,

    /// "Feb 2026"
    pub month_formatted: String,

    #[serde(flatten)]
    pub metrics: Metrics,
}

impl MonthSummary {
    pub fn new(month: String, metrics: Metrics) -> ReportResult<Self> {
        let month_formatted = format_month_key(&month)?;
        Ok(MonthSummary {
            month,
            month_formatted,
            metrics,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: {} transactions ({} approved, {} declined), ${:.2} total",
            self.month_formatted,
            self.metrics.total_transactions,
            self.metrics.total_approved,
            self.metrics.total_declined,
            self.metrics.total_amount
        )
    }
}

// ============================================================================
// MONTH KEYS
// ============================================================================

/// "YYYY-MM" with a zero-padded, 1-based month.
pub fn month_key<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// "2026-02" -> "Feb 2026"
pub fn format_month_key(key: &str) -> ReportResult<String> {
    let invalid = || ReportError::invalid_key(key);

    let (year, month) = key.split_once('-').ok_or_else(invalid)?;

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
        return Err(invalid());
    }

    let month: usize = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok(format!("{} {}", MONTH_ABBREVIATIONS[month - 1], year))
}

fn transaction_month(tx: &Transaction) -> ReportResult<String> {
    Ok(month_key(&tx.occurred_at()?))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ============================================================================
// CALCULATIONS
// ============================================================================

/// Single pass over the list. Amounts are summed unrounded and rounded to
/// two decimals once, at the end.
pub fn calculate_metrics<'a, I>(transactions: I) -> Metrics
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut metrics = Metrics::default();

    for tx in transactions {
        metrics.total_transactions += 1;
        metrics.total_amount += tx.amount;

        let brand = metrics
            .by_card_brand
            .entry(tx.card_brand.clone())
            .or_default();
        brand.total += 1;
        brand.amount += tx.amount;

        match tx.outcome() {
            Outcome::Approved => {
                metrics.total_approved += 1;
                metrics.approved_amount += tx.amount;
                brand.approved += 1;
            }
            Outcome::Declined { reason } => {
                metrics.total_declined += 1;
                metrics.declined_amount += tx.amount;
                brand.declined += 1;

                if let Some(code) = reason {
                    *metrics.by_decline_reason.entry(code.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    metrics.total_amount = round2(metrics.total_amount);
    metrics.approved_amount = round2(metrics.approved_amount);
    metrics.declined_amount = round2(metrics.declined_amount);
    for brand in metrics.by_card_brand.values_mut() {
        brand.amount = round2(brand.amount);
    }

    metrics
}

/// Month-to-date summary for the month containing the current UTC time.
pub fn calculate_mtd_summary(transactions: &[Transaction]) -> ReportResult<MonthSummary> {
    calculate_mtd_summary_at(transactions, Utc::now())
}

/// Month-to-date summary for the month containing `now`.
///
/// Every record's date is parsed, so a malformed date anywhere in the list
/// fails the call. No matching records gives a zeroed summary.
pub fn calculate_mtd_summary_at(
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> ReportResult<MonthSummary> {
    let current = month_key(&now);

    let mut in_month = Vec::new();
    for tx in transactions {
        if transaction_month(tx)? == current {
            in_month.push(tx);
        }
    }

    MonthSummary::new(current, calculate_metrics(in_month))
}

/// One summary per distinct month, newest first.
pub fn calculate_month_by_month_summary(
    transactions: &[Transaction],
) -> ReportResult<Vec<MonthSummary>> {
    let mut by_month: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();

    for tx in transactions {
        by_month.entry(transaction_month(tx)?).or_default().push(tx);
    }

    by_month
        .into_iter()
        .rev()
        .map(|(month, group)| MonthSummary::new(month, calculate_metrics(group)))
        .collect()
}
