use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    Everyday,
    Special,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Everyday => "Everyday",
            Self::Special => "Special",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "special" | "sonderposten" => Self::Special,
            _ => Self::Everyday,
        }
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A variable transaction. Area assignment is computed on read and never stored here.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: Option<i64>,
    pub amount: Decimal,
    pub category: ExpenseCategory,
    pub description: String,
    pub date: NaiveDate,
    pub user_id: String,
}

impl Expense {
    pub fn new(
        amount: Decimal,
        category: ExpenseCategory,
        description: String,
        date: NaiveDate,
        user_id: String,
    ) -> Self {
        Self {
            id: None,
            amount,
            category,
            description,
            date,
            user_id,
        }
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }
}
