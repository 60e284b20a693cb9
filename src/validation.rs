// ✅ Record Validation - Checks applied where transactions enter the system
//
// The engines accept any string for brand, status and reason. This module is
// the one place those fields are held against the catalog, and where the
// "reason present iff declined" invariant is enforced.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::catalog::{CardBrand, DeclineReason, TransactionStatus};
use crate::transaction::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Record would corrupt aggregates or cannot be placed in a month
    Warning,  // Record is usable but outside the known vocabulary
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordIssue {
    pub severity: Severity,
    pub field: &'static str,
    pub issue: String,
}

impl RecordIssue {
    fn critical(field: &'static str, issue: impl Into<String>) -> Self {
        RecordIssue {
            severity: Severity::Critical,
            field,
            issue: issue.into(),
        }
    }

    fn warning(field: &'static str, issue: impl Into<String>) -> Self {
        RecordIssue {
            severity: Severity::Warning,
            field,
            issue: issue.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub transaction_id: String,
    pub issues: Vec<RecordIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn summary(&self) -> String {
        let details: Vec<String> = self
            .issues
            .iter()
            .map(|i| format!("{}: {}", i.field, i.issue))
            .collect();
        format!("{} -> {}", self.transaction_id, details.join("; "))
    }
}

/// Check one record against the catalog and the decline-reason invariant.
pub fn validate_transaction(tx: &Transaction) -> ValidationReport {
    let mut issues = Vec::new();

    if tx.transaction_id.trim().is_empty() {
        issues.push(RecordIssue::critical("transactionId", "Transaction id is empty"));
    }

    if !tx.amount.is_finite() {
        issues.push(RecordIssue::critical("amount", "Amount is not a valid number"));
    } else if tx.amount < 0.0 {
        issues.push(RecordIssue::critical(
            "amount",
            format!("Amount is negative: {:.2}", tx.amount),
        ));
    }

    if let Err(e) = tx.card_brand.parse::<CardBrand>() {
        issues.push(RecordIssue::warning("cardBrand", e.to_string()));
    }

    if let Err(e) = tx.occurred_at() {
        issues.push(RecordIssue::critical("transactionDate", e.to_string()));
    }

    match (tx.status.parse::<TransactionStatus>(), tx.decline_reason_code.as_deref()) {
        (Ok(TransactionStatus::Approved), Some(reason)) => {
            issues.push(RecordIssue::critical(
                "declineReasonCode",
                format!("Approved transaction carries decline reason '{}'", reason),
            ));
        }
        (Ok(TransactionStatus::Approved), None) => {}
        (Ok(TransactionStatus::Declined), None) => {
            issues.push(RecordIssue::warning(
                "declineReasonCode",
                "Declined transaction has no decline reason",
            ));
        }
        (Ok(TransactionStatus::Declined), Some(reason)) => {
            if let Err(e) = reason.parse::<DeclineReason>() {
                issues.push(RecordIssue::warning("declineReasonCode", e.to_string()));
            }
        }
        (Err(e), _) => {
            issues.push(RecordIssue::warning(
                "status",
                format!("{} (counted as declined)", e),
            ));
        }
    }

    ValidationReport {
        transaction_id: tx.transaction_id.clone(),
        issues,
    }
}

// ============================================================================
// BATCH SUMMARY
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_transactions: usize,
    pub clean_count: usize,
    pub warning_count: usize,
    pub critical_count: usize,
    pub duplicate_ids: Vec<String>,
    /// Reports for records with at least one issue
    pub reports: Vec<ValidationReport>,
}

impl BatchSummary {
    pub fn is_clean(&self) -> bool {
        self.reports.is_empty() && self.duplicate_ids.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} transactions: {} clean, {} with warnings, {} critical, {} duplicate ids",
            self.total_transactions,
            self.clean_count,
            self.warning_count,
            self.critical_count,
            self.duplicate_ids.len()
        )
    }
}

/// Validate every record and look for repeated transaction ids.
pub fn validate_batch(transactions: &[Transaction]) -> BatchSummary {
    let mut summary = BatchSummary {
        total_transactions: transactions.len(),
        ..Default::default()
    };

    for tx in transactions {
        let report = validate_transaction(tx);
        if report.is_clean() {
            summary.clean_count += 1;
        } else {
            if report.has_critical_issues() {
                summary.critical_count += 1;
            } else {
                summary.warning_count += 1;
            }
            summary.reports.push(report);
        }
    }

    summary.duplicate_ids = duplicate_ids(transactions);
    summary
}

/// Transaction ids that appear more than once, in first-seen order.
pub fn duplicate_ids(transactions: &[Transaction]) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for tx in transactions {
        let count = seen.entry(tx.transaction_id.as_str()).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(tx.transaction_id.clone());
        }
    }

    duplicates
}
