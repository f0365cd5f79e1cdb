use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{Expense, ExpenseCategory, FixedCost, Income, YearMonth};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MonthBalance {
    pub(crate) year_month: YearMonth,
    pub(crate) total_income: Decimal,
    pub(crate) total_fixed_costs: Decimal,
    pub(crate) paid_fixed_costs: Decimal,
    pub(crate) total_expenses: Decimal,
    pub(crate) everyday_expenses: Decimal,
    pub(crate) special_expenses: Decimal,
    pub(crate) balance: Decimal,
    /// Spending so far plus the weekly allowance for the days left in the month.
    pub(crate) projected_expenses: Decimal,
    pub(crate) projected_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct YearBalance {
    pub(crate) year: i32,
    pub(crate) total_income: Decimal,
    /// Variable expenses plus fixed costs.
    pub(crate) total_expenses: Decimal,
    pub(crate) balance: Decimal,
    pub(crate) monthly_balances: Vec<MonthBalance>,
}

/// Days still ahead in `ym` as seen from `today`. Only the current month has any.
fn days_remaining(ym: YearMonth, today: NaiveDate) -> u32 {
    if ym.contains(today) {
        ym.days_in_month().saturating_sub(today.day())
    } else {
        0
    }
}

pub(crate) fn month_balance(
    incomes: &[Income],
    fixed_costs: &[FixedCost],
    expenses: &[Expense],
    ym: YearMonth,
    today: NaiveDate,
    weekly_allowance: Decimal,
) -> MonthBalance {
    let total_income: Decimal = incomes
        .iter()
        .filter(|i| i.year_month == ym)
        .map(|i| i.amount)
        .sum();

    let month_costs: Vec<&FixedCost> = fixed_costs.iter().filter(|c| c.year_month == ym).collect();
    let total_fixed_costs: Decimal = month_costs.iter().map(|c| c.amount).sum();
    let paid_fixed_costs: Decimal = month_costs
        .iter()
        .filter(|c| c.is_paid(ym))
        .map(|c| c.amount)
        .sum();

    let mut everyday_expenses = Decimal::ZERO;
    let mut special_expenses = Decimal::ZERO;
    for expense in expenses.iter().filter(|e| ym.contains(e.date)) {
        match expense.category {
            ExpenseCategory::Everyday => everyday_expenses += expense.amount,
            ExpenseCategory::Special => special_expenses += expense.amount,
        }
    }
    let total_expenses = everyday_expenses + special_expenses;

    let remaining = Decimal::from(days_remaining(ym, today));
    let projected_expenses =
        total_expenses + (weekly_allowance * remaining / Decimal::from(7)).round_dp(2);

    MonthBalance {
        year_month: ym,
        total_income,
        total_fixed_costs,
        paid_fixed_costs,
        total_expenses,
        everyday_expenses,
        special_expenses,
        balance: total_income - total_fixed_costs - total_expenses,
        projected_expenses,
        projected_balance: total_income - total_fixed_costs - projected_expenses,
    }
}

pub(crate) fn year_balance(
    incomes: &[Income],
    fixed_costs: &[FixedCost],
    expenses: &[Expense],
    year: i32,
    today: NaiveDate,
    weekly_allowance: Decimal,
) -> YearBalance {
    let monthly_balances: Vec<MonthBalance> = (1..=12)
        .filter_map(|month| YearMonth::new(year, month))
        .map(|ym| month_balance(incomes, fixed_costs, expenses, ym, today, weekly_allowance))
        .collect();

    let total_income: Decimal = monthly_balances.iter().map(|m| m.total_income).sum();
    let total_expenses: Decimal = monthly_balances
        .iter()
        .map(|m| m.total_fixed_costs + m.total_expenses)
        .sum();

    YearBalance {
        year,
        total_income,
        total_expenses,
        balance: total_income - total_expenses,
        monthly_balances,
    }
}
