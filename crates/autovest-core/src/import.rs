//! Profile and transaction import
//!
//! Profiles load from JSON. Transactions load from a header-driven CSV:
//!
//! ```text
//! date,amount,merchant[,id][,category][,description][,is_recurring]
//! ```
//!
//! Header names are matched case-insensitively and columns may come in any
//! order. Amounts are stored as absolute spend.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{Transaction, UserFinancialProfile};

/// Categories treated as recurring when the CSV does not say
pub const DEFAULT_RECURRING_PATTERN: &str = "(?i)^(entertainment|utilities)$";

/// Options for CSV transaction import
#[derive(Debug, Clone)]
pub struct ImportOptions {
    recurring_category: Regex,
}

impl ImportOptions {
    pub fn new(recurring_category_pattern: &str) -> Result<Self> {
        Ok(Self {
            recurring_category: Regex::new(recurring_category_pattern)?,
        })
    }

    pub fn is_recurring_category(&self, category: &str) -> bool {
        self.recurring_category.is_match(category)
    }
}

/// Load and validate a JSON profile
pub fn load_profile(path: &Path) -> Result<UserFinancialProfile> {
    let content = fs::read_to_string(path)?;
    let profile = parse_profile_json(&content)?;
    info!(
        "Loaded profile from {} ({} transactions)",
        path.display(),
        profile.transactions.len()
    );
    Ok(profile)
}

/// Parse and validate a JSON profile
pub fn parse_profile_json(content: &str) -> Result<UserFinancialProfile> {
    let profile: UserFinancialProfile = serde_json::from_str(content)?;
    profile.validate()?;
    Ok(profile)
}

/// Read transactions from a CSV file
pub fn load_transactions_csv(path: &Path, options: &ImportOptions) -> Result<Vec<Transaction>> {
    let file = fs::File::open(path)?;
    let transactions = parse_transactions_csv(file, options)?;
    info!(
        "Imported {} transactions from {}",
        transactions.len(),
        path.display()
    );
    Ok(transactions)
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    amount: usize,
    merchant: usize,
    id: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
    is_recurring: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let required = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
        };

        Ok(Self {
            date: required("date")?,
            amount: required("amount")?,
            merchant: required("merchant")?,
            id: index.get("id").copied(),
            category: index.get("category").copied(),
            description: index.get("description").copied(),
            is_recurring: index.get("is_recurring").copied(),
        })
    }
}

/// Parse transactions from CSV data
pub fn parse_transactions_csv<R: Read>(reader: R, options: &ImportOptions) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = row + 2;

        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .filter(|s| !s.is_empty())
        };

        let date_str = field(Some(columns.date))
            .ok_or_else(|| Error::Import(format!("Line {}: missing date", line)))?;
        let date = parse_date(date_str).map_err(|e| at_line(line, e))?;

        let amount_str = field(Some(columns.amount))
            .ok_or_else(|| Error::Import(format!("Line {}: missing amount", line)))?;
        let amount = parse_amount(amount_str)
            .map_err(|e| at_line(line, e))?
            .abs();

        let merchant = field(Some(columns.merchant))
            .ok_or_else(|| Error::Import(format!("Line {}: missing merchant", line)))?
            .to_string();

        let category = field(columns.category).unwrap_or_default().to_string();
        let description = field(columns.description).unwrap_or_default().to_string();

        let is_recurring = match field(columns.is_recurring) {
            Some(flag) => parse_bool(flag)
                .ok_or_else(|| Error::Import(format!("Line {}: invalid is_recurring: {}", line, flag)))?,
            None => options.is_recurring_category(&category),
        };

        let id = match field(columns.id) {
            Some(id) => id.to_string(),
            None => generate_id(&date, &merchant, amount, line),
        };

        transactions.push(Transaction {
            id,
            date,
            amount,
            merchant,
            category,
            description,
            is_recurring,
        });
    }

    debug!("Parsed {} transactions", transactions.len());
    Ok(transactions)
}

fn at_line(line: usize, err: Error) -> Error {
    match err {
        Error::Import(msg) => Error::Import(format!("Line {}: {}", line, msg)),
        other => other,
    }
}

/// Stable id for rows that do not carry one
fn generate_id(date: &NaiveDate, merchant: &str, amount: f64, line: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_string().as_bytes());
    hasher.update(merchant.as_bytes());
    hasher.update(amount.to_be_bytes());
    // Identical purchases on one day are still distinct rows
    hasher.update(line.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Earliest year accepted from a four-digit year field
const MIN_YEAR: i32 = 1000;

/// Parse a date string in various common formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    // %Y also accepts a two-digit year, so %y must be tried first
    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24
        "%m/%d/%Y", // 01/15/2024
        "%d/%m/%Y", // 15/01/2024 (day first)
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            if date.year() >= MIN_YEAR {
                return Ok(date);
            }
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '₹', '€', '£', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn options() -> ImportOptions {
        ImportOptions::new(DEFAULT_RECURRING_PATTERN).unwrap()
    }

    #[test]
    fn test_parse_date() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), jan15);
        assert_eq!(parse_date("01/15/2024").unwrap(), jan15);
        assert_eq!(parse_date("01/15/24").unwrap(), jan15);
        assert_eq!(parse_date("15/01/2024").unwrap(), jan15);
        // Ambiguous dates read month first
        assert_eq!(
            parse_date("02/03/2024").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap()
        );
        assert!(parse_date("Jan 15").is_err());
    }

    #[test]
    fn test_parse_date_two_digit_years() {
        assert_eq!(
            parse_date("12/31/99").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
        assert_eq!(
            parse_date("03/01/23").unwrap(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
        );
        // Day-first has no two-digit form; never read as year 24
        assert!(parse_date("15/01/24").is_err());
        assert!(parse_date("01/15/0024").is_err());
    }

    #[test]
    fn test_two_digit_year_rows_score_as_recent() {
        let csv = "date,amount,merchant,category
01/15/24,-15.49,Netflix,Entertainment
02/15/24,-15.49,Netflix,Entertainment";
        let transactions = parse_transactions_csv(csv.as_bytes(), &options()).unwrap();
        assert!(transactions.iter().all(|t| t.date.year() == 2024));

        let as_of = crate::stats::start_of_day(NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        let subs = crate::detect::detect_subscriptions(&transactions, as_of);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].days_since_last_use, 5);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("₹649").unwrap(), 649.0);
        assert_eq!(parse_amount("-123.45").unwrap(), -123.45);
        assert_eq!(parse_amount("(100.00)").unwrap(), -100.00);
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("inf").is_err());
    }

    #[test]
    fn test_parse_transactions_csv() {
        let csv = "date,amount,merchant,category,description,is_recurring
2024-01-14,649,Netflix,Entertainment,Monthly plan,true
2024-01-15,-143.00,Coffee Shop,Food,Latte,no
01/16/2024,\"$1,876.00\",Power Co,Utilities,Electricity,";

        let transactions = parse_transactions_csv(csv.as_bytes(), &options()).unwrap();
        assert_eq!(transactions.len(), 3);

        let netflix = &transactions[0];
        assert_eq!(netflix.merchant, "Netflix");
        assert_eq!(netflix.amount, 649.0);
        assert!(netflix.is_recurring);
        assert_eq!(netflix.description, "Monthly plan");
        assert_eq!(netflix.id.len(), 64);

        // Stored as absolute spend
        assert_eq!(transactions[1].amount, 143.0);
        assert!(!transactions[1].is_recurring);

        // Empty flag falls back to the category pattern
        assert_eq!(transactions[2].amount, 1876.0);
        assert_eq!(
            transactions[2].date,
            NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()
        );
        assert!(transactions[2].is_recurring);
    }

    #[test]
    fn test_headers_any_order_and_case() {
        let csv = "Merchant,ID,Amount,Date
Spotify,tx-1,9.99,2024-02-05";

        let transactions = parse_transactions_csv(csv.as_bytes(), &options()).unwrap();
        assert_eq!(transactions[0].id, "tx-1");
        assert_eq!(transactions[0].merchant, "Spotify");
        assert_eq!(transactions[0].category, "");
        assert!(!transactions[0].is_recurring);
    }

    #[test]
    fn test_generated_ids_are_stable_and_distinct() {
        let csv = "date,amount,merchant
2024-01-15,5.50,Starbucks
2024-01-15,5.50,Starbucks";

        let first = parse_transactions_csv(csv.as_bytes(), &options()).unwrap();
        let second = parse_transactions_csv(csv.as_bytes(), &options()).unwrap();
        assert_ne!(first[0].id, first[1].id);
        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn test_custom_recurring_pattern() {
        let csv = "date,amount,merchant,category
2024-01-15,40,Gym,Fitness
2024-01-16,649,Netflix,Entertainment";

        let options = ImportOptions::new("^Fitness$").unwrap();
        let transactions = parse_transactions_csv(csv.as_bytes(), &options).unwrap();
        assert!(transactions[0].is_recurring);
        assert!(!transactions[1].is_recurring);
    }

    #[test]
    fn test_import_errors() {
        let missing_column = "date,amount\n2024-01-15,10";
        let err = parse_transactions_csv(missing_column.as_bytes(), &options()).unwrap_err();
        assert!(err.to_string().contains("merchant"));

        let bad_date = "date,amount,merchant\nyesterday,10,Shop";
        let err = parse_transactions_csv(bad_date.as_bytes(), &options()).unwrap_err();
        assert!(err.to_string().contains("Line 2"));

        let bad_flag = "date,amount,merchant,is_recurring\n2024-01-15,10,Shop,maybe";
        assert!(matches!(
            parse_transactions_csv(bad_flag.as_bytes(), &options()),
            Err(Error::Import(_))
        ));

        assert!(matches!(ImportOptions::new("(oops"), Err(Error::Regex(_))));
    }

    #[test]
    fn test_parse_profile_json() {
        let json = r#"{
            "monthly_income": 5000,
            "liquid_savings": 8000,
            "monthly_expenses": 3200,
            "transactions": [
                {"id": "1", "date": "2024-01-14", "amount": 649, "merchant": "Netflix",
                 "category": "Entertainment", "is_recurring": true}
            ]
        }"#;

        let profile = parse_profile_json(json).unwrap();
        assert_eq!(profile.transactions.len(), 1);
        assert_eq!(profile.market_volatility(), 0.15);

        let invalid = r#"{"monthly_income": 0, "liquid_savings": 1, "monthly_expenses": 1}"#;
        assert!(matches!(parse_profile_json(invalid), Err(Error::InvalidProfile(_))));
        assert!(matches!(parse_profile_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_files() {
        let mut profile = NamedTempFile::new().unwrap();
        write!(
            profile,
            r#"{{"monthly_income": 4000, "liquid_savings": 1200, "monthly_expenses": 3500}}"#
        )
        .unwrap();
        let loaded = load_profile(profile.path()).unwrap();
        assert_eq!(loaded.monthly_income, 4000.0);
        assert!(loaded.transactions.is_empty());

        let mut csv = NamedTempFile::new().unwrap();
        writeln!(csv, "date,amount,merchant\n2024-01-15,5.50,Starbucks").unwrap();
        let transactions = load_transactions_csv(csv.path(), &options()).unwrap();
        assert_eq!(transactions.len(), 1);

        assert!(matches!(
            load_profile(&profile.path().with_extension("missing")),
            Err(Error::Io(_))
        ));
    }
}
