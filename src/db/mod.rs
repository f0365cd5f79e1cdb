mod schema;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

use crate::models::*;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.init_schema().context("Database initialization failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;
        if has_version_table {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        tx.execute_batch(schema::SCHEMA_V1)?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        tx.commit()?;
        Ok(())
    }

    // ── Areas ─────────────────────────────────────────────────

    /// Insert an area together with its keywords.
    pub(crate) fn insert_area(&mut self, area: &Area) -> Result<i64> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO areas (user_id, name, color, priority) VALUES (?1, ?2, ?3, ?4)",
            params![area.user_id, area.name, area.color, area.priority],
        )?;
        let id = tx.last_insert_rowid();
        for keyword in &area.keywords {
            tx.execute(
                "INSERT INTO area_keywords (area_id, keyword) VALUES (?1, ?2)",
                params![id, keyword],
            )?;
        }
        tx.commit()?;
        Ok(id)
    }

    /// Areas of `user_id`, highest priority first.
    pub(crate) fn get_areas(&self, user_id: &str) -> Result<Vec<Area>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, color, priority FROM areas
             WHERE user_id = ?1 ORDER BY priority DESC, id",
        )?;
        let rows = stmt.query_map(params![user_id], |row| {
            Ok(Area {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                name: row.get(2)?,
                color: row.get(3)?,
                priority: row.get(4)?,
                keywords: Vec::new(),
            })
        })?;
        let mut areas = rows.collect::<std::result::Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT k.area_id, k.keyword FROM area_keywords k
             JOIN areas a ON k.area_id = a.id
             WHERE a.user_id = ?1 ORDER BY k.id",
        )?;
        let keywords = stmt.query_map(params![user_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;
        for keyword in keywords {
            let (area_id, keyword) = keyword?;
            if let Some(area) = areas.iter_mut().find(|a| a.id == Some(area_id)) {
                area.keywords.push(keyword);
            }
        }

        Ok(areas)
    }

    pub(crate) fn get_area_by_name(&self, user_id: &str, name: &str) -> Result<Option<Area>> {
        let areas = self.get_areas(user_id)?;
        Ok(Area::find_by_name(&areas, name).cloned())
    }

    pub(crate) fn update_area(&self, area: &Area) -> Result<()> {
        let id = area.id.context("Area has no ID")?;
        self.conn.execute(
            "UPDATE areas SET name = ?1, color = ?2, priority = ?3 WHERE id = ?4 AND user_id = ?5",
            params![area.name, area.color, area.priority, id, area.user_id],
        )?;
        Ok(())
    }

    /// Remove an area and its keywords. Expenses are left untouched.
    pub(crate) fn delete_area(&self, user_id: &str, id: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM areas WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    /// Returns false if the keyword is blank, the area is not `user_id`'s, or the
    /// area already has it (Unicode case-insensitive).
    pub(crate) fn add_area_keyword(&self, user_id: &str, area_id: i64, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(false);
        }
        let owned: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM areas WHERE id = ?1 AND user_id = ?2)",
            params![area_id, user_id],
            |row| row.get(0),
        )?;
        if !owned {
            return Ok(false);
        }

        // SQLite's lower() only folds ASCII, so compare in Rust.
        let mut stmt = self
            .conn
            .prepare("SELECT keyword FROM area_keywords WHERE area_id = ?1")?;
        let existing = stmt
            .query_map(params![area_id], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let lower = keyword.to_lowercase();
        if existing.iter().any(|k| k.to_lowercase() == lower) {
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO area_keywords (area_id, keyword) VALUES (?1, ?2)",
            params![area_id, keyword],
        )?;
        Ok(true)
    }

    pub(crate) fn remove_area_keyword(&self, user_id: &str, area_id: i64, keyword: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM area_keywords
             WHERE area_id = ?1 AND keyword = ?2
               AND area_id IN (SELECT id FROM areas WHERE user_id = ?3)",
            params![area_id, keyword, user_id],
        )?;
        Ok(removed > 0)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO expenses (user_id, date, description, amount, category)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                expense.user_id,
                expense.date.format(DATE_FORMAT).to_string(),
                expense.description,
                expense.amount.to_string(),
                expense.category.as_str(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn update_expense(&self, expense: &Expense) -> Result<()> {
        let id = expense.id.context("Expense has no ID")?;
        self.conn.execute(
            "UPDATE expenses SET date = ?1, description = ?2, amount = ?3, category = ?4
             WHERE id = ?5 AND user_id = ?6",
            params![
                expense.date.format(DATE_FORMAT).to_string(),
                expense.description,
                expense.amount.to_string(),
                expense.category.as_str(),
                id,
                expense.user_id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn get_expense_by_id(&self, user_id: &str, id: i64) -> Result<Option<Expense>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, date, description, amount, category FROM expenses
             WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            expense_from_row,
        );
        match result {
            Ok(e) => Ok(Some(e)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn delete_expense(&self, user_id: &str, id: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    pub(crate) fn delete_expenses_for_month(&self, user_id: &str, ym: YearMonth) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM expenses WHERE user_id = ?1 AND date LIKE ?2",
            params![user_id, format!("{ym}-%")],
        )?)
    }

    pub(crate) fn get_expenses_for_month(&self, user_id: &str, ym: YearMonth) -> Result<Vec<Expense>> {
        self.query_expenses(user_id, &format!("{ym}-%"))
    }

    pub(crate) fn get_expenses_for_year(&self, user_id: &str, year: i32) -> Result<Vec<Expense>> {
        self.query_expenses(user_id, &format!("{year:04}-%"))
    }

    fn query_expenses(&self, user_id: &str, date_pattern: &str) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, date, description, amount, category FROM expenses
             WHERE user_id = ?1 AND date LIKE ?2
             ORDER BY date, id",
        )?;
        let rows = stmt.query_map(params![user_id, date_pattern], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Fixed costs ───────────────────────────────────────────

    pub(crate) fn insert_fixed_cost(&self, cost: &FixedCost) -> Result<i64> {
        insert_fixed_cost_on(&self.conn, cost)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert several fixed costs in one transaction, returning how many were written.
    pub(crate) fn insert_fixed_costs_batch(&mut self, costs: &[FixedCost]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for cost in costs {
            insert_fixed_cost_on(&tx, cost)?;
        }
        tx.commit()?;
        Ok(costs.len())
    }

    pub(crate) fn update_fixed_cost(&self, cost: &FixedCost) -> Result<()> {
        let id = cost.id.context("Fixed cost has no ID")?;
        self.conn.execute(
            "UPDATE fixed_costs SET name = ?1, amount = ?2, year_month = ?3, recurrence = ?4,
                    recurrence_months = ?5, paid_months = ?6
             WHERE id = ?7 AND user_id = ?8",
            params![
                cost.name,
                cost.amount.to_string(),
                cost.year_month.value(),
                cost.recurrence.as_str(),
                cost.recurrence_months.as_deref().map(join_months),
                join_year_months(&cost.paid_months),
                id,
                cost.user_id,
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_fixed_cost(&self, user_id: &str, id: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM fixed_costs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    pub(crate) fn get_fixed_cost_by_id(&self, user_id: &str, id: i64) -> Result<Option<FixedCost>> {
        let result = self.conn.query_row(
            "SELECT id, user_id, name, amount, year_month, recurrence, recurrence_months, paid_months
             FROM fixed_costs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
            fixed_cost_from_row,
        );
        match result {
            Ok(c) => Ok(Some(c)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn get_fixed_costs_for_month(&self, user_id: &str, ym: YearMonth) -> Result<Vec<FixedCost>> {
        self.query_fixed_costs(user_id, ym.value(), ym.value())
    }

    pub(crate) fn get_fixed_costs_for_year(&self, user_id: &str, year: i32) -> Result<Vec<FixedCost>> {
        let base = year.max(0) as u32 * 100;
        self.query_fixed_costs(user_id, base + 1, base + 12)
    }

    fn query_fixed_costs(&self, user_id: &str, from: u32, to: u32) -> Result<Vec<FixedCost>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, amount, year_month, recurrence, recurrence_months, paid_months
             FROM fixed_costs
             WHERE user_id = ?1 AND year_month BETWEEN ?2 AND ?3
             ORDER BY year_month, id",
        )?;
        let rows = stmt.query_map(params![user_id, from, to], fixed_cost_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    // ── Incomes ───────────────────────────────────────────────

    pub(crate) fn insert_income(&self, income: &Income) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO incomes (user_id, name, amount, year_month) VALUES (?1, ?2, ?3, ?4)",
            params![
                income.user_id,
                income.name,
                income.amount.to_string(),
                income.year_month.value(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub(crate) fn delete_income(&self, user_id: &str, id: i64) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM incomes WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    pub(crate) fn get_incomes_for_month(&self, user_id: &str, ym: YearMonth) -> Result<Vec<Income>> {
        self.query_incomes(user_id, ym.value(), ym.value())
    }

    pub(crate) fn get_incomes_for_year(&self, user_id: &str, year: i32) -> Result<Vec<Income>> {
        let base = year.max(0) as u32 * 100;
        self.query_incomes(user_id, base + 1, base + 12)
    }

    fn query_incomes(&self, user_id: &str, from: u32, to: u32) -> Result<Vec<Income>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, name, amount, year_month FROM incomes
             WHERE user_id = ?1 AND year_month BETWEEN ?2 AND ?3
             ORDER BY year_month, id",
        )?;
        let rows = stmt.query_map(params![user_id, from, to], |row| {
            Ok(Income {
                id: Some(row.get(0)?),
                user_id: row.get(1)?,
                name: row.get(2)?,
                amount: decimal_column(row, 3)?,
                year_month: YearMonth::from_raw(row.get(4)?),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn insert_fixed_cost_on(conn: &Connection, cost: &FixedCost) -> Result<()> {
    conn.execute(
        "INSERT INTO fixed_costs (user_id, name, amount, year_month, recurrence, recurrence_months, paid_months)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            cost.user_id,
            cost.name,
            cost.amount.to_string(),
            cost.year_month.value(),
            cost.recurrence.as_str(),
            cost.recurrence_months.as_deref().map(join_months),
            join_year_months(&cost.paid_months),
        ],
    )?;
    Ok(())
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        date: date_column(row, 2)?,
        description: row.get(3)?,
        amount: decimal_column(row, 4)?,
        category: ExpenseCategory::parse(&row.get::<_, String>(5)?),
    })
}

fn fixed_cost_from_row(row: &Row<'_>) -> rusqlite::Result<FixedCost> {
    let recurrence: String = row.get(5)?;
    let recurrence_months: Option<String> = row.get(6)?;
    let paid_months: String = row.get(7)?;
    Ok(FixedCost {
        id: Some(row.get(0)?),
        user_id: row.get(1)?,
        name: row.get(2)?,
        amount: decimal_column(row, 3)?,
        year_month: YearMonth::from_raw(row.get(4)?),
        recurrence: Recurrence::parse(&recurrence).unwrap_or(Recurrence::Once),
        recurrence_months: recurrence_months
            .map(|s| parse_month_list(&s).unwrap_or_default())
            .filter(|months| !months.is_empty()),
        paid_months: paid_months
            .split(',')
            .filter_map(|p| p.trim().parse().ok())
            .map(YearMonth::from_raw)
            .collect(),
    })
}

fn decimal_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    match Decimal::from_str(&raw) {
        Ok(d) => Ok(d),
        Err(e) => {
            warn!(value = %raw, error = %e, "unparseable amount, reading as zero");
            Ok(Decimal::ZERO)
        }
    }
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    NaiveDate::parse_from_str(&raw, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn join_months(months: &[u32]) -> String {
    months
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn join_year_months(months: &[YearMonth]) -> String {
    months
        .iter()
        .map(|m| m.value().to_string())
        .collect::<Vec<_>>()
        .join(",")
}
