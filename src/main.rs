use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

use merchant_dashboard::{
    build_report, end_of_day, generate_transactions, list_transactions, logging, validate_batch,
    write_csv, write_json, DashboardConfig, FilterCriteria, GeneratorOptions, MonthSummary,
    ReportView, Transaction, TransactionRepository,
};

const USAGE: &str = "\
Usage:
  merchant-dashboard summary  [--data PATH] [--view full|mtd|monthly] [--json] [FILTERS]
  merchant-dashboard list     [--data PATH] [--json] [FILTERS]
  merchant-dashboard export   OUT.csv [--data PATH] [FILTERS]
  merchant-dashboard validate [--data PATH]
  merchant-dashboard generate OUT.json [--count N] [--months M] [--seed S] [--end YYYY-MM-DD]

Filters:
  --brand BRAND    card brand, e.g. Visa
  --status STATUS  Approved or Declined
  --reason CODE    decline reason code, e.g. \"01-Insufficient funds\"";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Summary {
        data: Option<PathBuf>,
        criteria: FilterCriteria,
        view: ReportView,
        json: bool,
    },
    List {
        data: Option<PathBuf>,
        criteria: FilterCriteria,
        json: bool,
    },
    Export {
        out: PathBuf,
        data: Option<PathBuf>,
        criteria: FilterCriteria,
    },
    Validate {
        data: Option<PathBuf>,
    },
    Generate {
        out: PathBuf,
        count: usize,
        months: u32,
        seed: u64,
        end: Option<NaiveDate>,
    },
    Help,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = DashboardConfig::from_env()?;
    logging::init_tracing(&config.log_level)?;

    let args: Vec<String> = env::args().skip(1).collect();

    match parse_args(&args)? {
        Command::Summary { data, criteria, view, json } => {
            let repo = open_repository(&config, data)?;
            run_summary(&repo.snapshot(), &criteria, view, json)?;
        }
        Command::List { data, criteria, json } => {
            let repo = open_repository(&config, data)?;
            run_list(&repo.snapshot(), &criteria, json)?;
        }
        Command::Export { out, data, criteria } => {
            let repo = open_repository(&config, data)?;
            let filtered = list_transactions(&repo.snapshot(), &criteria);
            write_csv(&out, &filtered)?;
            println!("✓ Exported {} transactions to {:?}", filtered.len(), out);
        }
        Command::Validate { data } => {
            let path = data.unwrap_or_else(|| config.data_path.clone());
            run_validate(&path)?;
        }
        Command::Generate { out, count, months, seed, end } => {
            let mut options = GeneratorOptions { count, months, seed, ..Default::default() };
            if let Some(date) = end {
                options.end = end_of_day(date);
            }
            let transactions = generate_transactions(&options);
            write_json(&out, &transactions)?;
            println!("✓ Generated {} transactions into {:?}", transactions.len(), out);
        }
        Command::Help => println!("{}", USAGE),
    }

    Ok(())
}

fn open_repository(config: &DashboardConfig, data: Option<PathBuf>) -> Result<TransactionRepository> {
    let path = data.unwrap_or_else(|| config.data_path.clone());
    info!(path = %path.display(), "Opening transaction document");
    TransactionRepository::load_with(&path, config.load_options())
}

// ============================================================================
// ARGUMENT PARSING
// ============================================================================

fn parse_args(args: &[String]) -> Result<Command> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    let mut positional = Vec::new();
    let mut data = None;
    let mut criteria = FilterCriteria::new();
    let mut view = ReportView::Full;
    let mut json = false;
    let mut count = GeneratorOptions::default().count;
    let mut months = GeneratorOptions::default().months;
    let mut seed = GeneratorOptions::default().seed;
    let mut end = None;

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("{} needs a value", arg))
        };

        match arg.as_str() {
            "--data" => data = Some(PathBuf::from(value()?)),
            "--brand" => criteria.card_brand = Some(value()?),
            "--status" => criteria.status = Some(value()?),
            "--reason" => criteria.decline_reason_code = Some(value()?),
            "--view" => view = value()?.parse().map_err(anyhow::Error::msg)?,
            "--json" => json = true,
            "--count" => count = value()?.parse().context("--count must be a number")?,
            "--months" => months = value()?.parse().context("--months must be a number")?,
            "--seed" => seed = value()?.parse().context("--seed must be a number")?,
            "--end" => {
                end = Some(
                    NaiveDate::parse_from_str(&value()?, "%Y-%m-%d")
                        .context("--end must be YYYY-MM-DD")?,
                )
            }
            flag if flag.starts_with("--") => bail!("Unknown option {}\n\n{}", flag, USAGE),
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let command = match command.as_str() {
        "summary" => Command::Summary { data, criteria, view, json },
        "list" => Command::List { data, criteria, json },
        "validate" => Command::Validate { data },
        "export" => Command::Export {
            out: positional.pop().context("export needs an output path")?,
            data,
            criteria,
        },
        "generate" => Command::Generate {
            out: positional.pop().context("generate needs an output path")?,
            count,
            months,
            seed,
            end,
        },
        "help" | "--help" | "-h" => Command::Help,
        other => bail!("Unknown command '{}'\n\n{}", other, USAGE),
    };

    Ok(command)
}

// ============================================================================
// COMMANDS
// ============================================================================

fn run_summary(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
    view: ReportView,
    json: bool,
) -> Result<()> {
    let report = build_report(transactions, criteria, view, chrono::Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📊 Merchant Dashboard");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if !criteria.is_empty() {
        let active: Vec<String> = criteria
            .active()
            .iter()
            .map(|(field, value)| format!("{}={}", field, value))
            .collect();
        println!("Filters: {}", active.join(", "));
    }

    if let Some(mtd) = &report.mtd_summary {
        println!("\nMonth to date");
        print_month(mtd);
    }

    if let Some(months) = &report.month_by_month {
        println!("\nMonth by month");
        if months.is_empty() {
            println!("  (no transactions)");
        }
        for month in months {
            print_month(month);
        }
    }

    Ok(())
}

fn print_month(month: &MonthSummary) {
    let m = &month.metrics;
    println!("  {}", month.summary());
    println!(
        "    approved ${:.2} | declined ${:.2} | approval rate {:.1}%",
        m.approved_amount,
        m.declined_amount,
        m.approval_rate()
    );
    for (brand, stats) in &m.by_card_brand {
        println!(
            "    {:<18} {:>5} tx  {:>5} ok  {:>5} declined  ${:>12.2}",
            brand, stats.total, stats.approved, stats.declined, stats.amount
        );
    }
    for (reason, count) in &m.by_decline_reason {
        println!("    ✗ {:<34} {:>5}", reason, count);
    }
}

fn run_list(transactions: &[Transaction], criteria: &FilterCriteria, json: bool) -> Result<()> {
    let filtered = list_transactions(transactions, criteria);

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
        return Ok(());
    }

    for tx in &filtered {
        println!(
            "{:<25} {:<38} {:<18} {:<9} ${:>10.2}  {}",
            tx.transaction_date,
            tx.transaction_id,
            tx.card_brand,
            tx.status,
            tx.amount,
            tx.decline_reason_code.as_deref().unwrap_or("")
        );
    }
    println!("\n{} transactions", filtered.len());

    Ok(())
}

fn run_validate(path: &Path) -> Result<()> {
    let transactions = merchant_dashboard::read_transactions(path)?;
    let summary = validate_batch(&transactions);

    println!("🔍 {}", summary.summary());
    for report in &summary.reports {
        println!("  {}", report.summary());
    }
    for id in &summary.duplicate_ids {
        println!("  duplicate id: {}", id);
    }

    if summary.critical_count > 0 {
        bail!("{} records have critical issues", summary.critical_count);
    }
    println!("✅ Document is usable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_is_help() {
        assert_eq!(parse_args(&[]).unwrap(), Command::Help);
    }

    #[test]
    fn test_summary_with_filters() {
        let command = parse_args(&args(&[
            "summary", "--brand", "Visa", "--reason", "01-Insufficient funds", "--view", "mtd",
        ]))
        .unwrap();

        assert_eq!(
            command,
            Command::Summary {
                data: None,
                criteria: FilterCriteria::new()
                    .card_brand("Visa")
                    .decline_reason_code("01-Insufficient funds"),
                view: ReportView::Mtd,
                json: false,
            }
        );
    }

    #[test]
    fn test_export_and_generate_need_paths() {
        assert!(parse_args(&args(&["export"])).is_err());
        assert!(parse_args(&args(&["generate", "--count", "10"])).is_err());

        let command = parse_args(&args(&[
            "generate", "out.json", "--count", "10", "--end", "2026-02-28",
        ]))
        .unwrap();
        match command {
            Command::Generate { out, count, end, .. } => {
                assert_eq!(out, PathBuf::from("out.json"));
                assert_eq!(count, 10);
                assert_eq!(end, NaiveDate::from_ymd_opt(2026, 2, 28));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_input_is_rejected() {
        assert!(parse_args(&args(&["summary", "--brand"])).is_err());
        assert!(parse_args(&args(&["summary", "--view", "weekly"])).is_err());
        assert!(parse_args(&args(&["summary", "--bogus"])).is_err());
        assert!(parse_args(&args(&["frobnicate"])).is_err());
        assert!(parse_args(&args(&["generate", "o.json", "--count", "many"])).is_err());
    }
}
