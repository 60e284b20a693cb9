// Merchant Dashboard - Core Library
// Exposes all modules for use in the CLI, API server, and tests

pub mod error;
pub mod transaction;
pub mod catalog;
pub mod validation;
pub mod filter;        // Filter Engine
pub mod aggregation;   // Aggregation Engine
pub mod report;        // Filter -> aggregate pipeline
pub mod repository;    // In-memory data provider
pub mod config;
pub mod logging;
pub mod generator;

#[cfg(feature = "server")]
pub mod api;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use error::{ReportError, ReportResult};
pub use transaction::{parse_transaction_date, Outcome, Transaction, APPROVED, DECLINED};
pub use catalog::{CardBrand, DeclineReason, FilterOptions, TransactionStatus, UnknownValue};
pub use validation::{
    duplicate_ids, validate_batch, validate_transaction,
    BatchSummary, RecordIssue, Severity, ValidationReport,
};
pub use filter::{
    apply_filters, filter_by_card_brand, filter_by_decline_reason_code, filter_by_status,
    FilterCriteria, ALL,
};
pub use aggregation::{
    calculate_metrics, calculate_month_by_month_summary, calculate_mtd_summary,
    calculate_mtd_summary_at, format_month_key, month_key,
    BrandMetrics, Metrics, MonthSummary,
};
pub use report::{build_report, list_transactions, DashboardReport, ReportView};
pub use repository::{
    read_transactions, write_csv, write_json, LoadOptions, TransactionRepository,
};
pub use config::DashboardConfig;
pub use generator::{end_of_day, generate_transactions, GeneratorOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
