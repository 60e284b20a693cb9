// 📋 Dashboard Report - Filter, then aggregate
//
// The composition the dashboard asks for: narrow the list with the filter
// engine, then hand the result to the aggregation engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use crate::aggregation::{
    calculate_month_by_month_summary, calculate_mtd_summary_at, MonthSummary,
};
use crate::error::ReportResult;
use crate::filter::{apply_filters, FilterCriteria};
use crate::transaction::Transaction;

/// Which parts of the report to compute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReportView {
    #[default]
    Full,
    Mtd,
    MonthByMonth,
}

impl ReportView {
    fn wants_mtd(self) -> bool {
        matches!(self, ReportView::Full | ReportView::Mtd)
    }

    fn wants_month_by_month(self) -> bool {
        matches!(self, ReportView::Full | ReportView::MonthByMonth)
    }
}

impl FromStr for ReportView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" | "all" => Ok(ReportView::Full),
            "mtd" => Ok(ReportView::Mtd),
            "monthly" | "month-by-month" => Ok(ReportView::MonthByMonth),
            other => Err(format!("unknown report view '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtd_summary: Option<MonthSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_by_month: Option<Vec<MonthSummary>>,
}

/// Filter `transactions` by `criteria` and aggregate the parts `view` asks for.
pub fn build_report(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
    view: ReportView,
    now: DateTime<Utc>,
) -> ReportResult<DashboardReport> {
    let filtered = list_transactions(transactions, criteria);

    let mtd_summary = if view.wants_mtd() {
        Some(calculate_mtd_summary_at(&filtered, now)?)
    } else {
        None
    };

    let month_by_month = if view.wants_month_by_month() {
        Some(calculate_month_by_month_summary(&filtered)?)
    } else {
        None
    };

    Ok(DashboardReport {
        mtd_summary,
        month_by_month,
    })
}

/// The raw filtered listing.
pub fn list_transactions(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    let filtered = apply_filters(transactions, criteria);

    debug!(
        criteria = ?criteria.active(),
        input = transactions.len(),
        matched = filtered.len(),
        "Applied filters"
    );

    filtered
}
