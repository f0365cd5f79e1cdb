mod area;
mod expense;
mod fixed_cost;
mod income;
mod year_month;

pub use area::Area;
pub use expense::{Expense, ExpenseCategory};
pub use fixed_cost::{FixedCost, Recurrence};
pub use income::Income;
pub use year_month::{parse_month_list, YearMonth};

#[cfg(test)]
mod tests;
