use chrono::Datelike;
use rust_decimal::Decimal;
use tracing::debug;

use crate::categorize::{group_by_area, AreaMatcher};
use crate::models::{Area, Expense, FixedCost, YearMonth};

/// One area's share of a month, with the matched records for drill-down.
#[derive(Debug, Clone)]
pub(crate) struct AreaStatistics<'a> {
    pub(crate) area_id: Option<i64>,
    pub(crate) area_name: &'a str,
    pub(crate) color: &'a str,
    pub(crate) total_amount: Decimal,
    /// Matched expenses plus matched fixed costs.
    pub(crate) expense_count: usize,
    pub(crate) expenses: Vec<&'a Expense>,
    pub(crate) fixed_costs: Vec<&'a FixedCost>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UnassignedStatistics<'a> {
    pub(crate) total_amount: Decimal,
    pub(crate) expense_count: usize,
    pub(crate) expenses: Vec<&'a Expense>,
    pub(crate) fixed_costs: Vec<&'a FixedCost>,
}

#[derive(Debug, Clone)]
pub(crate) struct MonthlyAreaStats<'a> {
    pub(crate) year_month: YearMonth,
    /// One entry per input area, in input order, including areas with nothing matched.
    pub(crate) areas: Vec<AreaStatistics<'a>>,
    pub(crate) unassigned: UnassignedStatistics<'a>,
}

impl MonthlyAreaStats<'_> {
    pub(crate) fn grand_total(&self) -> Decimal {
        self.areas.iter().map(|a| a.total_amount).sum::<Decimal>() + self.unassigned.total_amount
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MonthAmount {
    pub(crate) month: u32,
    pub(crate) amount: Decimal,
}

#[derive(Debug, Clone)]
pub(crate) struct AreaYearStatistics<'a> {
    pub(crate) area_id: Option<i64>,
    pub(crate) area_name: &'a str,
    pub(crate) color: &'a str,
    /// Always twelve entries, January first.
    pub(crate) monthly_totals: Vec<MonthAmount>,
    pub(crate) year_total: Decimal,
}

#[derive(Debug, Clone)]
pub(crate) struct YearlyAreaStats<'a> {
    pub(crate) year: i32,
    pub(crate) areas: Vec<AreaYearStatistics<'a>>,
    pub(crate) unassigned_total: Decimal,
}

impl YearlyAreaStats<'_> {
    pub(crate) fn grand_total(&self) -> Decimal {
        self.areas.iter().map(|a| a.year_total).sum::<Decimal>() + self.unassigned_total
    }
}

fn sum_expenses(expenses: &[&Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

fn sum_fixed_costs(costs: &[&FixedCost]) -> Decimal {
    costs.iter().map(|c| c.amount).sum()
}

/// Per-area totals for one month. Expenses match on their description, fixed
/// costs on their name. Inputs are taken as already scoped to `year_month`.
pub(crate) fn monthly_area_stats<'a>(
    expenses: &'a [Expense],
    areas: &'a [Area],
    year_month: YearMonth,
    fixed_costs: &'a [FixedCost],
) -> MonthlyAreaStats<'a> {
    let grouped_expenses = group_by_area(expenses, areas, |e| e.description.as_str());
    let grouped_costs = group_by_area(fixed_costs, areas, |c| c.name.as_str());

    let area_stats: Vec<AreaStatistics<'a>> = areas
        .iter()
        .zip(grouped_expenses.by_area)
        .zip(grouped_costs.by_area)
        .map(|((area, area_expenses), area_costs)| AreaStatistics {
            area_id: area.id,
            area_name: &area.name,
            color: &area.color,
            total_amount: sum_expenses(&area_expenses) + sum_fixed_costs(&area_costs),
            expense_count: area_expenses.len() + area_costs.len(),
            expenses: area_expenses,
            fixed_costs: area_costs,
        })
        .collect();

    let unassigned = UnassignedStatistics {
        total_amount: sum_expenses(&grouped_expenses.unassigned)
            + sum_fixed_costs(&grouped_costs.unassigned),
        expense_count: grouped_expenses.unassigned.len() + grouped_costs.unassigned.len(),
        expenses: grouped_expenses.unassigned,
        fixed_costs: grouped_costs.unassigned,
    };

    debug!(
        %year_month,
        areas = area_stats.len(),
        unassigned = unassigned.expense_count,
        "computed monthly area stats"
    );

    MonthlyAreaStats {
        year_month,
        areas: area_stats,
        unassigned,
    }
}

/// Per-area, per-month totals for a year. Records are bucketed by their month
/// component only; the caller passes records of a single year.
pub(crate) fn yearly_area_stats<'a>(
    expenses: &[Expense],
    areas: &'a [Area],
    year: i32,
    fixed_costs: &[FixedCost],
) -> YearlyAreaStats<'a> {
    let matcher = AreaMatcher::new(areas);
    let mut totals = vec![[Decimal::ZERO; 12]; areas.len()];
    let mut unassigned_total = Decimal::ZERO;

    let mut book = |matched: Option<usize>, month: u32, amount: Decimal| match matched {
        Some(idx) if (1..=12).contains(&month) => totals[idx][month as usize - 1] += amount,
        _ => unassigned_total += amount,
    };

    for expense in expenses {
        book(
            matcher.match_index(&expense.description),
            expense.date.month(),
            expense.amount,
        );
    }
    for cost in fixed_costs {
        book(
            matcher.match_index(&cost.name),
            cost.year_month.month(),
            cost.amount,
        );
    }

    let area_stats: Vec<AreaYearStatistics<'a>> = areas
        .iter()
        .zip(totals)
        .map(|(area, months)| {
            let monthly_totals: Vec<MonthAmount> = (1..=12)
                .zip(months)
                .map(|(month, amount)| MonthAmount { month, amount })
                .collect();
            AreaYearStatistics {
                area_id: area.id,
                area_name: &area.name,
                color: &area.color,
                year_total: months.iter().copied().sum(),
                monthly_totals,
            }
        })
        .collect();

    debug!(year, areas = area_stats.len(), "computed yearly area stats");

    YearlyAreaStats {
        year,
        areas: area_stats,
        unassigned_total,
    }
}
