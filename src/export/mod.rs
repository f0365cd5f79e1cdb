use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

use crate::models::{Expense, FixedCost};
use crate::stats::MonthlyAreaStats;

const HEADER: [&str; 5] = ["kind", "date_or_month", "text", "amount", "area"];

/// Write every record of `stats` as one CSV row, area by area, unassigned last.
/// Returns the number of records written.
pub(crate) fn write_month_csv<W: Write>(writer: W, stats: &MonthlyAreaStats<'_>) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER).context("Failed to write CSV header")?;

    let mut count = 0;
    for area in &stats.areas {
        count += write_rows(&mut wtr, &area.expenses, &area.fixed_costs, area.area_name)?;
    }
    count += write_rows(
        &mut wtr,
        &stats.unassigned.expenses,
        &stats.unassigned.fixed_costs,
        "",
    )?;

    wtr.flush().context("Failed to flush CSV output")?;
    Ok(count)
}

pub(crate) fn export_month_to_path(path: &Path, stats: &MonthlyAreaStats<'_>) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file: {}", path.display()))?;
    write_month_csv(file, stats)
}

fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    expenses: &[&Expense],
    fixed_costs: &[&FixedCost],
    area: &str,
) -> Result<usize> {
    for e in expenses {
        let date = e.date.format("%Y-%m-%d").to_string();
        let amount = e.amount.to_string();
        wtr.write_record(["expense", date.as_str(), e.description.as_str(), amount.as_str(), area])
            .context("Failed to write expense row")?;
    }
    for c in fixed_costs {
        let month = c.year_month.to_string();
        let amount = c.amount.to_string();
        wtr.write_record(["fixed", month.as_str(), c.name.as_str(), amount.as_str(), area])
            .context("Failed to write fixed cost row")?;
    }
    Ok(expenses.len() + fixed_costs.len())
}
