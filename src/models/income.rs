use rust_decimal::Decimal;

use super::YearMonth;

#[derive(Debug, Clone, PartialEq)]
pub struct Income {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub year_month: YearMonth,
    pub user_id: String,
}

impl Income {
    pub fn new(name: String, amount: Decimal, year_month: YearMonth, user_id: String) -> Self {
        Self {
            id: None,
            name,
            amount,
            year_month,
            user_id,
        }
    }
}
