// 🎲 Sample Data Generator - Well-formed transaction documents for demos
//
// Deterministic for a given seed: same seed, same records, same ids.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{CardBrand, DeclineReason};
use crate::transaction::Transaction;

/// Share of generated records that are approved.
const APPROVAL_RATE: f64 = 0.8;

/// Widest window the generator covers: one hundred years.
pub const MAX_MONTHS: u32 = 1200;

const MERCHANTS: [&str; 5] = [
    "merchant-1001",
    "merchant-1002",
    "merchant-1003",
    "merchant-1004",
    "merchant-1005",
];

#[derive(Debug, Clone, Copy)]
pub struct GeneratorOptions {
    pub count: usize,
    /// Calendar months covered, ending with the month of `end`.
    /// Clamped to 1..=MAX_MONTHS.
    pub months: u32,
    pub end: DateTime<Utc>,
    pub seed: u64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            count: 200,
            months: 6,
            end: Utc::now(),
            seed: 42,
        }
    }
}

/// First instant of the month `back` months before `end`'s month.
fn month_start(end: DateTime<Utc>, back: u32) -> DateTime<Utc> {
    let total = end.year() * 12 + end.month0() as i32 - back as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    Utc.with_ymd_and_hms(year, month0 + 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(end)
}

pub fn generate_transactions(options: &GeneratorOptions) -> Vec<Transaction> {
    let mut rng = StdRng::seed_from_u64(options.seed);
    let months = options.months.clamp(1, MAX_MONTHS);
    let start = month_start(options.end, months - 1);
    let span_secs = (options.end - start).num_seconds().max(1);

    let mut transactions: Vec<Transaction> = (0..options.count)
        .map(|_| {
            let id = uuid::Builder::from_random_bytes(rng.gen()).into_uuid();
            let merchant = MERCHANTS[rng.gen_range(0..MERCHANTS.len())];
            let brand = CardBrand::ALL[rng.gen_range(0..CardBrand::ALL.len())];
            let cents: u32 = rng.gen_range(500..=150_000);
            let amount = cents as f64 / 100.0;
            let when = start + Duration::seconds(rng.gen_range(0..span_secs));
            let date = when.format("%Y-%m-%dT%H:%M:%SZ").to_string();

            if rng.gen_bool(APPROVAL_RATE) {
                Transaction::approved(&id.to_string(), merchant, amount, brand.as_str(), &date)
            } else {
                let reason = DeclineReason::ALL[rng.gen_range(0..DeclineReason::ALL.len())];
                Transaction::declined(
                    &id.to_string(),
                    merchant,
                    amount,
                    brand.as_str(),
                    reason.as_str(),
                    &date,
                )
            }
        })
        .collect();

    transactions.sort_by(|a, b| a.transaction_date.cmp(&b.transaction_date));
    transactions
}

/// Convenience for callers that only know a calendar date.
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(23, 59, 59)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .unwrap_or_else(Utc::now)
}
