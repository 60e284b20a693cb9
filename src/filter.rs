// 🔎 Filter Engine - Narrow a transaction list by equality criteria
//
// Three independent criteria, combined with AND only. Matching is exact and
// case-sensitive. Inputs are never mutated: every call returns a new Vec.

use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Sentinel meaning "do not filter on this field".
pub const ALL: &str = "all";

// ============================================================================
// FILTER CRITERIA
// ============================================================================

/// Optional criteria, as received from a query string or JSON body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decline_reason_code: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card_brand(mut self, value: impl Into<String>) -> Self {
        self.card_brand = Some(value.into());
        self
    }

    pub fn status(mut self, value: impl Into<String>) -> Self {
        self.status = Some(value.into());
        self
    }

    pub fn decline_reason_code(mut self, value: impl Into<String>) -> Self {
        self.decline_reason_code = Some(value.into());
        self
    }

    /// Concrete criteria only, as (field, value) pairs in application order.
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        [
            ("cardBrand", self.card_brand.as_deref()),
            ("status", self.status.as_deref()),
            ("declineReasonCode", self.decline_reason_code.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| concrete(value).map(|v| (field, v)))
        .collect()
    }

    /// True when no criterion would narrow the list.
    pub fn is_empty(&self) -> bool {
        self.active().is_empty()
    }
}

/// A criterion is concrete when present, non-empty and not "all".
fn concrete(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

// ============================================================================
// FILTERS
// ============================================================================

fn filter_by<F>(transactions: &[Transaction], value: Option<&str>, field: F) -> Vec<Transaction>
where
    F: Fn(&Transaction) -> Option<&str>,
{
    match value {
        None | Some(ALL) => transactions.to_vec(),
        Some(wanted) => transactions
            .iter()
            .filter(|tx| field(tx) == Some(wanted))
            .cloned()
            .collect(),
    }
}

pub fn filter_by_card_brand(transactions: &[Transaction], value: Option<&str>) -> Vec<Transaction> {
    filter_by(transactions, value, |tx| Some(tx.card_brand.as_str()))
}

pub fn filter_by_status(transactions: &[Transaction], value: Option<&str>) -> Vec<Transaction> {
    filter_by(transactions, value, |tx| Some(tx.status.as_str()))
}

/// Records without a decline reason never match a concrete code.
pub fn filter_by_decline_reason_code(
    transactions: &[Transaction],
    value: Option<&str>,
) -> Vec<Transaction> {
    filter_by(transactions, value, |tx| tx.decline_reason_code.as_deref())
}

/// Apply card brand, then status, then decline reason.
///
/// Absent, empty and "all" criteria are skipped. With no concrete criteria
/// the result is a copy of every input record in the original order.
pub fn apply_filters(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    let mut filtered = transactions.to_vec();

    if let Some(brand) = concrete(criteria.card_brand.as_deref()) {
        filtered = filter_by_card_brand(&filtered, Some(brand));
    }
    if let Some(status) = concrete(criteria.status.as_deref()) {
        filtered = filter_by_status(&filtered, Some(status));
    }
    if let Some(reason) = concrete(criteria.decline_reason_code.as_deref()) {
        filtered = filter_by_decline_reason_code(&filtered, Some(reason));
    }

    filtered
}
