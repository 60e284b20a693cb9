// 🗄️ Transaction Repository - Explicitly owned, injectable data source
//
// Loads the transaction document (JSON array or CSV with the same headers)
// into memory and hands out immutable snapshots. A reload swaps in a new
// snapshot; anyone still holding the old one keeps a consistent view.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

use crate::transaction::Transaction;
use crate::validation::{duplicate_ids, validate_transaction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Abort the load on the first record with a critical issue
    pub strict: bool,
}

pub struct TransactionRepository {
    snapshot: RwLock<Arc<Vec<Transaction>>>,
    source: Option<PathBuf>,
    options: LoadOptions,
}

impl TransactionRepository {
    /// In-memory repository, mainly for fixtures.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        TransactionRepository {
            snapshot: RwLock::new(Arc::new(transactions)),
            source: None,
            options: LoadOptions::default(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(path, LoadOptions::default())
    }

    pub fn load_with<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let transactions = read_checked(&path, options)?;

        Ok(TransactionRepository {
            snapshot: RwLock::new(Arc::new(transactions)),
            source: Some(path),
            options,
        })
    }

    /// Current records. The returned list is never mutated afterwards.
    pub fn snapshot(&self) -> Arc<Vec<Transaction>> {
        let guard = self
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Re-read the source document and swap the snapshot. Returns the new count.
    pub fn reload(&self) -> Result<usize> {
        let Some(path) = &self.source else {
            bail!("Repository was built in memory and has no source to reload");
        };

        let transactions = read_checked(path, self.options)?;
        let count = transactions.len();

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::new(transactions);

        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

// ============================================================================
// DOCUMENT I/O
// ============================================================================

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Read a JSON array or CSV file of transactions, without validation.
pub fn read_transactions(path: &Path) -> Result<Vec<Transaction>> {
    if is_csv(path) {
        let mut rdr = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to open CSV file: {:?}", path))?;

        let mut transactions = Vec::new();
        for (line, result) in rdr.deserialize().enumerate() {
            let tx: Transaction = result
                .with_context(|| format!("Failed to deserialize CSV record {}", line + 1))?;
            transactions.push(tx);
        }
        Ok(transactions)
    } else {
        let file = File::open(path)
            .with_context(|| format!("Failed to open transactions file: {:?}", path))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse transactions JSON: {:?}", path))
    }
}

fn read_checked(path: &Path, options: LoadOptions) -> Result<Vec<Transaction>> {
    let transactions = read_transactions(path)?;
    check_records(&transactions, options)?;

    info!(
        count = transactions.len(),
        source = %path.display(),
        "Loaded transactions"
    );
    Ok(transactions)
}

fn check_records(transactions: &[Transaction], options: LoadOptions) -> Result<()> {
    for tx in transactions {
        let report = validate_transaction(tx);
        if report.is_clean() {
            continue;
        }
        if options.strict && report.has_critical_issues() {
            bail!("Invalid transaction {}", report.summary());
        }
        warn!("Questionable transaction {}", report.summary());
    }

    for id in duplicate_ids(transactions) {
        warn!(transaction_id = %id, "Duplicate transaction id");
    }

    Ok(())
}

/// Write transactions as a pretty-printed JSON array.
pub fn write_json(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), transactions)
        .context("Failed to write transactions JSON")?;
    Ok(())
}

/// Flat CSV row: every column on every line, absent reason as "".
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow<'a> {
    transaction_id: &'a str,
    merchant_id: &'a str,
    amount: f64,
    card_brand: &'a str,
    status: &'a str,
    decline_reason_code: &'a str,
    transaction_date: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        CsvRow {
            transaction_id: &tx.transaction_id,
            merchant_id: &tx.merchant_id,
            amount: tx.amount,
            card_brand: &tx.card_brand,
            status: &tx.status,
            decline_reason_code: tx.decline_reason_code.as_deref().unwrap_or(""),
            transaction_date: &tx.transaction_date,
        }
    }
}

/// Write transactions as CSV with camelCase headers.
pub fn write_csv(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;

    for tx in transactions {
        wtr.serialize(CsvRow::from(tx))
            .context("Failed to write CSV record")?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{seven_record_set, two_month_set};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_in_memory_repository() {
        let repo = TransactionRepository::from_transactions(two_month_set());

        assert_eq!(repo.len(), 5);
        assert!(!repo.is_empty());
        assert!(repo.source().is_none());
        assert!(repo.reload().is_err());
    }

    #[test]
    fn test_load_json_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.json");
        write_json(&path, &seven_record_set()).unwrap();

        let repo = TransactionRepository::load(&path).unwrap();
        assert_eq!(*repo.snapshot(), seven_record_set());
        assert_eq!(repo.source(), Some(path.as_path()));
    }

    #[test]
    fn test_load_csv_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.csv");
        write_csv(&path, &seven_record_set()).unwrap();

        let header = fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(
            "transactionId,merchantId,amount,cardBrand,status,declineReasonCode,transactionDate"
        ));

        let loaded = TransactionRepository::load(&path).unwrap().snapshot();
        assert_eq!(loaded.len(), 7);
        assert_eq!(loaded[0].decline_reason_code, None);
        assert_eq!(loaded[1].decline_reason_code.as_deref(), Some("01-Insufficient funds"));
    }

    #[test]
    fn test_reload_keeps_old_snapshots_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.json");
        write_json(&path, &two_month_set()).unwrap();

        let repo = TransactionRepository::load(&path).unwrap();
        let before = repo.snapshot();

        write_json(&path, &seven_record_set()).unwrap();
        assert_eq!(repo.reload().unwrap(), 7);

        assert_eq!(before.len(), 5);
        assert_eq!(repo.snapshot().len(), 7);
    }

    #[test]
    fn test_strict_load_rejects_critical_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("transactions.json");
        let mut transactions = two_month_set();
        transactions[2].transaction_date = "not-a-date".to_string();
        write_json(&path, &transactions).unwrap();

        let err = TransactionRepository::load_with(&path, LoadOptions { strict: true })
            .err()
            .unwrap();
        assert!(err.to_string().contains("tx-003"));

        // Lenient load keeps the record; the engines surface the bad date later
        let repo = TransactionRepository::load(&path).unwrap();
        assert_eq!(repo.len(), 5);
    }

    #[test]
    fn test_load_missing_or_malformed_file() {
        let dir = TempDir::new().unwrap();
        assert!(TransactionRepository::load(dir.path().join("missing.json")).is_err());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = TransactionRepository::load(&path).err().unwrap();
        assert!(format!("{:#}", err).contains("Failed to parse transactions JSON"));
    }
}
