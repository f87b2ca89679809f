//! Demo profiles
//!
//! Three months of subscription charges and everyday spending built relative
//! to a given day. Amount jitter and purchase days come from a fixed hash of
//! the row position, so the same `today` always yields the same profile.

use chrono::{Datelike, Months, NaiveDate};

use crate::models::{Transaction, UserFinancialProfile};
use crate::stats::round_to_cents;

const HISTORY_MONTHS: u32 = 3;

struct RecurringCharge {
    merchant: &'static str,
    amount: f64,
    category: &'static str,
}

struct RegularExpense {
    merchant: &'static str,
    category: &'static str,
    base_amount: f64,
}

const SUBSCRIPTIONS: [RecurringCharge; 5] = [
    RecurringCharge { merchant: "Netflix", amount: 15.99, category: "Entertainment" },
    RecurringCharge { merchant: "Spotify", amount: 9.99, category: "Entertainment" },
    RecurringCharge { merchant: "Amazon Prime", amount: 14.99, category: "Shopping" },
    RecurringCharge { merchant: "Planet Fitness", amount: 24.99, category: "Health" },
    RecurringCharge { merchant: "Adobe Creative Cloud", amount: 54.99, category: "Software" },
];

const EXTRA_SUBSCRIPTIONS: [RecurringCharge; 4] = [
    RecurringCharge { merchant: "Disney+", amount: 7.99, category: "Entertainment" },
    RecurringCharge { merchant: "HBO Max", amount: 15.99, category: "Entertainment" },
    RecurringCharge { merchant: "Apple Music", amount: 10.99, category: "Entertainment" },
    RecurringCharge { merchant: "YouTube Premium", amount: 11.99, category: "Entertainment" },
];

const REGULAR_EXPENSES: [RegularExpense; 7] = [
    RegularExpense { merchant: "Whole Foods", category: "Groceries", base_amount: 85.0 },
    RegularExpense { merchant: "Target", category: "Shopping", base_amount: 45.0 },
    RegularExpense { merchant: "Shell Gas Station", category: "Transportation", base_amount: 50.0 },
    RegularExpense { merchant: "Starbucks", category: "Dining", base_amount: 6.5 },
    RegularExpense { merchant: "Chipotle", category: "Dining", base_amount: 12.0 },
    RegularExpense { merchant: "Electric Company", category: "Utilities", base_amount: 120.0 },
    RegularExpense { merchant: "Internet Provider", category: "Utilities", base_amount: 79.99 },
];

/// Which demo profile to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleKind {
    #[default]
    Demo,
    Healthy,
    Struggling,
}

impl SampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demo => "demo",
            Self::Healthy => "healthy",
            Self::Struggling => "struggling",
        }
    }

    pub fn all() -> &'static [SampleKind] {
        &[Self::Demo, Self::Healthy, Self::Struggling]
    }
}

impl std::str::FromStr for SampleKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "demo" => Ok(Self::Demo),
            "healthy" => Ok(Self::Healthy),
            "struggling" => Ok(Self::Struggling),
            _ => Err(format!(
                "Unknown sample: {} (expected demo, healthy or struggling)",
                s
            )),
        }
    }
}

impl std::fmt::Display for SampleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the requested demo profile
pub fn profile(kind: SampleKind, today: NaiveDate) -> UserFinancialProfile {
    match kind {
        SampleKind::Demo => demo_profile(today),
        SampleKind::Healthy => healthy_profile(today),
        SampleKind::Struggling => struggling_profile(today),
    }
}

/// Moderate income, 2.7 months of savings, moderate volatility
pub fn demo_profile(today: NaiveDate) -> UserFinancialProfile {
    UserFinancialProfile {
        monthly_income: 5000.0,
        liquid_savings: 8500.0,
        monthly_expenses: 3200.0,
        transactions: demo_transactions(today),
        market_volatility: Some(0.15),
    }
}

/// Higher income, about 8 months of savings, low volatility
pub fn healthy_profile(today: NaiveDate) -> UserFinancialProfile {
    UserFinancialProfile {
        monthly_income: 6500.0,
        liquid_savings: 25000.0,
        monthly_expenses: 3000.0,
        transactions: demo_transactions(today),
        market_volatility: Some(0.10),
    }
}

/// Thin savings, extra streaming subscriptions, high volatility
pub fn struggling_profile(today: NaiveDate) -> UserFinancialProfile {
    let mut transactions = demo_transactions(today);
    for (idx, sub) in EXTRA_SUBSCRIPTIONS.iter().enumerate() {
        for month in 0..HISTORY_MONTHS {
            if let Some(date) = day_in_month(today, month, 10 + idx as u32) {
                transactions.push(subscription_charge(format!("extra-sub-{}-{}", month, idx), date, sub));
            }
        }
    }
    sort_newest_first(&mut transactions);

    UserFinancialProfile {
        monthly_income: 4000.0,
        liquid_savings: 1200.0,
        monthly_expenses: 3500.0,
        transactions,
        market_volatility: Some(0.25),
    }
}

/// Three months of subscriptions and regular spending, newest first
pub fn demo_transactions(today: NaiveDate) -> Vec<Transaction> {
    let mut transactions = Vec::new();

    for month in 0..HISTORY_MONTHS {
        for (idx, sub) in SUBSCRIPTIONS.iter().enumerate() {
            if let Some(date) = day_in_month(today, month, 5 + idx as u32) {
                transactions.push(subscription_charge(format!("sub-{}-{}", month, idx), date, sub));
            }
        }
    }

    for month in 0..HISTORY_MONTHS {
        for (idx, expense) in REGULAR_EXPENSES.iter().enumerate() {
            let count = match expense.category {
                "Groceries" => 8,
                "Dining" => 12,
                "Utilities" => 1,
                _ => 4,
            };

            for i in 0..count {
                let seed = month * 1000 + idx as u32 * 100 + i;
                let day = 1 + jitter(seed, 28);
                let Some(date) = day_in_month(today, month, day) else {
                    continue;
                };

                // ±20% in 1% steps
                let variation = 0.8 + f64::from(jitter(seed.wrapping_add(7919), 41)) / 100.0;

                transactions.push(Transaction {
                    id: format!("exp-{}-{}-{}", month, idx, i),
                    date,
                    amount: round_to_cents(expense.base_amount * variation),
                    merchant: expense.merchant.to_string(),
                    category: expense.category.to_string(),
                    description: format!("{} purchase", expense.category),
                    is_recurring: expense.category == "Utilities",
                });
            }
        }
    }

    sort_newest_first(&mut transactions);
    transactions
}

fn subscription_charge(id: String, date: NaiveDate, sub: &RecurringCharge) -> Transaction {
    Transaction {
        id,
        date,
        amount: sub.amount,
        merchant: sub.merchant.to_string(),
        category: sub.category.to_string(),
        description: format!("Monthly subscription - {}", sub.merchant),
        is_recurring: true,
    }
}

/// `day` of the month `months_back` months before `today`
fn day_in_month(today: NaiveDate, months_back: u32, day: u32) -> Option<NaiveDate> {
    today
        .with_day(1)?
        .checked_sub_months(Months::new(months_back))?
        .with_day(day)
}

/// Multiplicative hash of `seed` reduced to `0..modulus`
fn jitter(seed: u32, modulus: u32) -> u32 {
    (seed.wrapping_add(1).wrapping_mul(2_654_435_761) >> 16) % modulus
}

fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}
