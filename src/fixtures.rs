// Shared test fixtures

use crate::transaction::Transaction;

/// Five records across Feb 2026 (3) and Jan 2026 (2).
pub(crate) fn two_month_set() -> Vec<Transaction> {
    vec![
        Transaction::approved("tx-001", "merchant-1", 100.0, "Visa", "2026-02-05T10:15:00Z"),
        Transaction::declined(
            "tx-002",
            "merchant-1",
            200.0,
            "Mastercard",
            "01-Insufficient funds",
            "2026-02-10T12:00:00Z",
        ),
        Transaction::approved("tx-003", "merchant-2", 150.0, "Visa", "2026-02-14T08:45:00Z"),
        Transaction::approved(
            "tx-004",
            "merchant-2",
            300.0,
            "American Express",
            "2026-01-08T17:30:00Z",
        ),
        Transaction::declined(
            "tx-005",
            "merchant-1",
            400.0,
            "Visa",
            "02-Invalid card number",
            "2026-01-20T09:00:00Z",
        ),
    ]
}

/// The two-month set plus a declined Visa and an approved Discover in Dec 2025.
pub(crate) fn seven_record_set() -> Vec<Transaction> {
    let mut transactions = two_month_set();
    transactions.push(Transaction::declined(
        "tx-006",
        "merchant-3",
        500.0,
        "Visa",
        "03-Suspected fraud",
        "2025-12-15T11:00:00Z",
    ));
    transactions.push(Transaction::approved(
        "tx-007",
        "merchant-3",
        250.0,
        "Discover",
        "2025-12-22T16:20:00Z",
    ));
    transactions
}
