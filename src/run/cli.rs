use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use super::format::{format_amount, month_abbrev, month_name, truncate};
use crate::categorize::{match_to_area, search_expenses, AreaMatcher};
use crate::config::Config;
use crate::db::Database;
use crate::models::*;
use crate::stats::{
    month_balance, monthly_area_stats, year_balance, yearly_area_stats, AreaStatistics,
    MonthBalance, YearBalance, YearlyAreaStats,
};

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &[
    "--month",
    "--date",
    "--color",
    "--priority",
    "--recurrence",
    "--months",
    "--until",
    "--amount",
    "--description",
    "--name",
    "--area",
];

pub(crate) fn as_cli(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let Some(command) = args.get(1) else {
        return cli_summary(&[], db, config);
    };
    let rest = &args[2..];
    match command.as_str() {
        "areas" => cli_areas(db, config),
        "area-add" => cli_area_add(rest, db, config),
        "area-set" => cli_area_set(rest, db, config),
        "area-rm" => cli_area_rm(rest, db, config),
        "keyword-add" => cli_keyword_add(rest, db, config),
        "keyword-rm" => cli_keyword_rm(rest, db, config),
        "expenses" => cli_expenses(rest, db, config),
        "expense-add" => cli_expense_add(rest, db, config),
        "expense-edit" => cli_expense_edit(rest, db, config),
        "expense-rm" => cli_expense_rm(rest, db, config),
        "expense-clear" => cli_expense_clear(rest, db, config),
        "fixed-add" => cli_fixed_add(rest, db, config),
        "fixed-paid" => cli_fixed_paid(rest, db, config),
        "fixed-rm" => cli_fixed_rm(rest, db, config),
        "income-add" => cli_income_add(rest, db, config),
        "income-rm" => cli_income_rm(rest, db, config),
        "summary" | "s" => cli_summary(rest, db, config),
        "month" | "m" => cli_month(rest, db, config),
        "year" | "y" => cli_year(rest, db, config),
        "search" => cli_search(rest, db, config),
        "export" => cli_export(rest, db, config),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("areabudget {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("AreaBudget — personal finance tracker with keyword-matched budget areas");
    println!();
    println!("Usage: areabudget [command]");
    println!();
    println!("Commands:");
    println!("  (none)                             Balance summary for the current month");
    println!("  areas                              List areas with keywords");
    println!("  area-add <name> [keywords...]      Create an area");
    println!("    --color <#rrggbb>                Display colour (default: next palette colour)");
    println!("    --priority <n>                   Tie-break priority (default: above all others)");
    println!("  area-set <name> [--name <new>] [--color <#rrggbb>] [--priority <n>]");
    println!("  area-rm <name>                     Delete an area (expenses are kept)");
    println!("  keyword-add <area> <keyword>       Add a matching keyword");
    println!("  keyword-rm <area> <keyword>        Remove a keyword");
    println!("  expenses [YYYY-MM]                 List expenses with their matched area");
    println!("  expense-add <amount> <description> [--date YYYY-MM-DD] [--special]");
    println!("  expense-edit <id> [--amount <n>] [--description <text>] [--date YYYY-MM-DD]");
    println!("               [--special | --everyday]");
    println!("  expense-rm <id>                    Delete an expense");
    println!("  expense-clear --month <YYYY-MM>    Delete all expenses of a month");
    println!("  fixed-add <name> <amount>          Add a fixed cost");
    println!("    --month <YYYY-MM>                First month (default: current)");
    println!("    --recurrence <r>                 monthly | quarterly | yearly | once (default: monthly)");
    println!("    --months <3,6,9,12>              Explicit months for quarterly/yearly");
    println!("    --until <YYYY-MM>                Last month to create (default: December)");
    println!("  fixed-paid <id> [--month YYYY-MM]  Toggle the paid flag");
    println!("  fixed-rm <id>                      Delete a fixed cost");
    println!("  income-add <name> <amount> [--month YYYY-MM]");
    println!("  income-rm <id>                     Delete an income");
    println!("  summary [YYYY-MM]                  Income, costs, balance and projection");
    println!("  month [YYYY-MM] [--area <name>]    Spending per area for a month");
    println!("  year [YYYY] [--area <name>]        Spending per area per month for a year");
    println!("  search <term>... [--month YYYY-MM] Find expenses matching any term");
    println!("  export [path] [--month YYYY-MM]    Export a month's categorized records to CSV");
    println!("  --help, -h                         Show this help");
    println!("  --version, -V                      Show version");
    println!();
    println!("Environment: AREABUDGET_DB, AREABUDGET_USER, AREABUDGET_WEEKLY_ALLOWANCE, RUST_LOG");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Positive amount; accepts a decimal comma ("12,50").
fn parse_amount(s: &str) -> Result<Decimal> {
    let amount = Decimal::from_str(&s.trim().replace(',', "."))
        .with_context(|| format!("Invalid amount: {s}"))?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive: {s}");
    }
    Ok(amount)
}

fn parse_id(args: &[&str], usage: &str) -> Result<i64> {
    let raw = args.first().with_context(|| format!("Usage: {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid id: {raw}"))
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

fn validate_color(color: &str) -> Result<()> {
    let re = Regex::new(r"^#[0-9a-fA-F]{6}$").context("Failed to compile colour pattern")?;
    if !re.is_match(color) {
        bail!("Invalid colour '{color}', expected #rrggbb");
    }
    Ok(())
}

/// `--month` flag, else the first positional, else the current month.
fn month_arg(args: &[String]) -> Result<YearMonth> {
    match flag_value(args, "--month").or_else(|| positionals(args).first().copied()) {
        Some(raw) => YearMonth::parse(raw),
        None => Ok(YearMonth::from_date(today())),
    }
}

fn require_area(db: &Database, config: &Config, name: &str) -> Result<Area> {
    db.get_area_by_name(&config.user_id, name)?
        .with_context(|| format!("Area '{name}' not found"))
}

// ── Areas ────────────────────────────────────────────────────

fn cli_areas(db: &Database, config: &Config) -> Result<()> {
    let areas = db.get_areas(&config.user_id)?;
    if areas.is_empty() {
        println!("No areas. Create one with: areabudget area-add <name> [keywords...]");
        return Ok(());
    }

    println!("{:<5} {:<20} {:<8} Keywords", "Prio", "Name", "Color");
    println!("{}", "─".repeat(60));
    for area in &areas {
        println!(
            "{:<5} {:<20} {:<8} {}",
            area.priority,
            truncate(&area.name, 20),
            area.color,
            area.keywords.join(", "),
        );
    }
    Ok(())
}

fn cli_area_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let name = pos
        .first()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .context("Usage: areabudget area-add <name> [keywords...]")?;

    let areas = db.get_areas(&config.user_id)?;
    if Area::find_by_name(&areas, name).is_some() {
        bail!("Area '{name}' already exists");
    }

    let color = match flag_value(args, "--color") {
        Some(c) => {
            validate_color(c)?;
            c.to_string()
        }
        None => Area::next_color(&areas).to_string(),
    };
    let priority = match flag_value(args, "--priority") {
        Some(p) => p
            .parse()
            .with_context(|| format!("Invalid priority: {p}"))?,
        None => Area::next_priority(&areas),
    };

    let mut area = Area::new(name.to_string(), color, priority, config.user_id.clone());
    for keyword in &pos[1..] {
        if !area.add_keyword(keyword) {
            println!("Skipped duplicate keyword: {keyword}");
        }
    }

    let id = db.insert_area(&area)?;
    info!(id, name = %area.name, priority = area.priority, "area created");
    println!(
        "Created area {area} (priority {}, {} keywords)",
        area.priority,
        area.keywords.len()
    );
    Ok(())
}

fn cli_area_set(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let name = pos
        .first()
        .context("Usage: areabudget area-set <name> [--name <new>] [--color <#rrggbb>] [--priority <n>]")?;
    let mut area = require_area(db, config, name)?;

    if let Some(new_name) = flag_value(args, "--name") {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            bail!("Area name cannot be empty");
        }
        let areas = db.get_areas(&config.user_id)?;
        if Area::find_by_name(&areas, new_name).is_some_and(|other| other.id != area.id) {
            bail!("Area '{new_name}' already exists");
        }
        area.name = new_name.to_string();
    }
    if let Some(color) = flag_value(args, "--color") {
        validate_color(color)?;
        area.color = color.to_string();
    }
    if let Some(p) = flag_value(args, "--priority") {
        area.priority = p
            .parse()
            .with_context(|| format!("Invalid priority: {p}"))?;
    }

    db.update_area(&area)?;
    info!(id = ?area.id, name = %area.name, "area updated");
    println!("Updated area {area}");
    Ok(())
}

fn cli_area_rm(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let name = pos.first().context("Usage: areabudget area-rm <name>")?;
    let area = require_area(db, config, name)?;
    let id = area.id.context("Area has no ID")?;
    db.delete_area(&config.user_id, id)?;
    info!(id, "area deleted");
    println!("Deleted area {area}. Its expenses are kept and now match other areas or none.");
    Ok(())
}

fn cli_keyword_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let (Some(name), Some(keyword)) = (pos.first(), pos.get(1)) else {
        bail!("Usage: areabudget keyword-add <area> <keyword>");
    };
    let mut area = require_area(db, config, name)?;
    let id = area.id.context("Area has no ID")?;

    if !area.add_keyword(keyword) || !db.add_area_keyword(&config.user_id, id, keyword)? {
        bail!("Keyword '{keyword}' is empty or already assigned to {area}");
    }
    info!(area = id, keyword, "keyword added");
    println!("Added keyword '{}' to {area}", keyword.trim());
    Ok(())
}

fn cli_keyword_rm(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let (Some(name), Some(keyword)) = (pos.first(), pos.get(1)) else {
        bail!("Usage: areabudget keyword-rm <area> <keyword>");
    };
    let mut area = require_area(db, config, name)?;
    let id = area.id.context("Area has no ID")?;

    if !area.remove_keyword(keyword) {
        bail!("{area} has no keyword '{keyword}'");
    }
    db.remove_area_keyword(&config.user_id, id, keyword)?;
    info!(area = id, keyword, "keyword removed");
    println!("Removed keyword '{keyword}' from {area}");
    Ok(())
}

// ── Expenses ─────────────────────────────────────────────────

fn cli_expenses(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let ym = month_arg(args)?;
    let expenses = db.get_expenses_for_month(&config.user_id, ym)?;
    let areas = db.get_areas(&config.user_id)?;
    let matcher = AreaMatcher::new(&areas);

    println!("Expenses — {} {}", month_name(ym.month()), ym.year());
    if expenses.is_empty() {
        println!("  none");
        return Ok(());
    }
    println!(
        "{:<5} {:<10} {:<30} {:>14} {:<9} Area",
        "ID", "Date", "Description", "Amount", "Category"
    );
    println!("{}", "─".repeat(85));
    for e in &expenses {
        let area = matcher.match_text(&e.description).map_or("—", |a| a.name.as_str());
        println!(
            "{:<5} {:<10} {:<30} {:>14} {:<9} {}",
            e.id.unwrap_or(0),
            e.date.format("%Y-%m-%d"),
            truncate(&e.description, 30),
            format_amount(e.amount),
            e.category.as_str(),
            area,
        );
    }
    Ok(())
}

fn cli_expense_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    if pos.len() < 2 {
        bail!("Usage: areabudget expense-add <amount> <description> [--date YYYY-MM-DD] [--special]");
    }
    let amount = parse_amount(pos[0])?;
    let description = pos[1..].join(" ");
    if description.trim().is_empty() {
        bail!("Description cannot be empty");
    }
    let date = match flag_value(args, "--date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let category = if has_flag(args, "--special") {
        ExpenseCategory::Special
    } else {
        ExpenseCategory::Everyday
    };

    let expense = Expense::new(amount, category, description, date, config.user_id.clone());
    let id = db.insert_expense(&expense)?;
    info!(id, %amount, "expense added");

    let areas = db.get_areas(&config.user_id)?;
    let area = match_to_area(&expense.description, &areas).map_or("unassigned", |a| a.name.as_str());
    println!(
        "Added expense #{id}: {} for {} ({}) → {area}",
        format_amount(amount),
        expense.year_month(),
        expense.category,
    );
    Ok(())
}

fn cli_expense_edit(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let usage = "areabudget expense-edit <id> [--amount <n>] [--description <text>] [--date YYYY-MM-DD] [--special | --everyday]";
    let id = parse_id(&positionals(args), usage)?;
    let mut expense = db
        .get_expense_by_id(&config.user_id, id)?
        .with_context(|| format!("Expense #{id} not found"))?;

    if let Some(a) = flag_value(args, "--amount") {
        expense.amount = parse_amount(a)?;
    }
    if let Some(d) = flag_value(args, "--description") {
        if d.trim().is_empty() {
            bail!("Description cannot be empty");
        }
        expense.description = d.to_string();
    }
    if let Some(d) = flag_value(args, "--date") {
        expense.date = parse_date(d)?;
    }
    if has_flag(args, "--special") {
        expense.category = ExpenseCategory::Special;
    } else if has_flag(args, "--everyday") {
        expense.category = ExpenseCategory::Everyday;
    }

    db.update_expense(&expense)?;
    info!(id, "expense updated");
    println!(
        "Updated expense #{id}: {} {} {}",
        expense.date.format("%Y-%m-%d"),
        expense.description,
        format_amount(expense.amount)
    );
    Ok(())
}

fn cli_expense_rm(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let id = parse_id(&positionals(args), "areabudget expense-rm <id>")?;
    if !db.delete_expense(&config.user_id, id)? {
        bail!("Expense #{id} not found");
    }
    info!(id, "expense deleted");
    println!("Deleted expense #{id}");
    Ok(())
}

fn cli_expense_clear(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let raw = flag_value(args, "--month")
        .context("Usage: areabudget expense-clear --month <YYYY-MM>")?;
    let ym = YearMonth::parse(raw)?;
    let count = db.delete_expenses_for_month(&config.user_id, ym)?;
    info!(%ym, count, "expenses cleared");
    println!("Deleted {count} expenses from {ym}");
    Ok(())
}

// ── Fixed costs & incomes ────────────────────────────────────

fn cli_fixed_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let (Some(name), Some(raw_amount)) = (pos.first(), pos.get(1)) else {
        bail!("Usage: areabudget fixed-add <name> <amount> [--month YYYY-MM] [--recurrence R] [--months 3,6,9,12] [--until YYYY-MM]");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Name cannot be empty");
    }
    let amount = parse_amount(raw_amount)?;
    let start = month_arg_flag(args, "--month")?;
    let recurrence = match flag_value(args, "--recurrence") {
        Some(r) => Recurrence::parse(r)
            .with_context(|| format!("Unknown recurrence '{r}', expected monthly|quarterly|yearly|once"))?,
        None => Recurrence::Monthly,
    };
    let until = match flag_value(args, "--until") {
        Some(u) => YearMonth::parse(u)?,
        None => YearMonth::new(start.year(), 12).context("Invalid start month")?,
    };

    let mut cost = FixedCost::new(name.to_string(), amount, start, recurrence, config.user_id.clone());
    if let Some(months) = flag_value(args, "--months") {
        let months = parse_month_list(months)?;
        cost.recurrence_months = (!months.is_empty()).then_some(months);
    }

    let follow_ups = cost.follow_up_months(until);
    if follow_ups.is_empty() {
        let id = db.insert_fixed_cost(&cost)?;
        info!(id, %start, "fixed cost added");
        println!("Added fixed cost #{id}: {name} {} in {start}", format_amount(amount));
        return Ok(());
    }

    let mut records = vec![cost.clone()];
    records.extend(follow_ups.iter().map(|m| cost.for_month(*m)));
    let count = db.insert_fixed_costs_batch(&records)?;
    info!(count, %start, %until, recurrence = %recurrence, "fixed costs added");
    let months: Vec<String> = records.iter().map(|c| c.year_month.to_string()).collect();
    println!(
        "Added {count} {recurrence} fixed costs '{name}' of {}: {}",
        format_amount(amount),
        months.join(", ")
    );
    Ok(())
}

/// Like [`month_arg`], but only looks at the flag.
fn month_arg_flag(args: &[String], flag: &str) -> Result<YearMonth> {
    match flag_value(args, flag) {
        Some(raw) => YearMonth::parse(raw),
        None => Ok(YearMonth::from_date(today())),
    }
}

fn cli_fixed_paid(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let id = parse_id(&positionals(args), "areabudget fixed-paid <id> [--month YYYY-MM]")?;
    let mut cost = db
        .get_fixed_cost_by_id(&config.user_id, id)?
        .with_context(|| format!("Fixed cost #{id} not found"))?;
    let ym = match flag_value(args, "--month") {
        Some(raw) => YearMonth::parse(raw)?,
        None => cost.year_month,
    };

    let paid = cost.toggle_paid(ym);
    db.update_fixed_cost(&cost)?;
    info!(id, %ym, paid, "fixed cost payment toggled");
    let state = if paid { "paid" } else { "unpaid" };
    println!("{} marked {state} for {ym}", cost.name);
    Ok(())
}

fn cli_fixed_rm(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let id = parse_id(&positionals(args), "areabudget fixed-rm <id>")?;
    if !db.delete_fixed_cost(&config.user_id, id)? {
        bail!("Fixed cost #{id} not found");
    }
    info!(id, "fixed cost deleted");
    println!("Deleted fixed cost #{id}");
    Ok(())
}

fn cli_income_add(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let pos = positionals(args);
    let (Some(name), Some(raw_amount)) = (pos.first(), pos.get(1)) else {
        bail!("Usage: areabudget income-add <name> <amount> [--month YYYY-MM]");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Name cannot be empty");
    }
    let amount = parse_amount(raw_amount)?;
    let ym = month_arg_flag(args, "--month")?;
    let id = db.insert_income(&Income::new(name.to_string(), amount, ym, config.user_id.clone()))?;
    info!(id, %ym, "income added");
    println!("Added income #{id}: {name} {} in {ym}", format_amount(amount));
    Ok(())
}

fn cli_income_rm(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let id = parse_id(&positionals(args), "areabudget income-rm <id>")?;
    if !db.delete_income(&config.user_id, id)? {
        bail!("Income #{id} not found");
    }
    info!(id, "income deleted");
    println!("Deleted income #{id}");
    Ok(())
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let ym = month_arg(args)?;
    let user = &config.user_id;
    let balance = month_balance(
        &db.get_incomes_for_month(user, ym)?,
        &db.get_fixed_costs_for_month(user, ym)?,
        &db.get_expenses_for_month(user, ym)?,
        ym,
        today(),
        config.weekly_allowance,
    );
    println!("AreaBudget — {} {}", month_name(ym.month()), ym.year());
    println!("{}", "─".repeat(44));
    print_month_balance(&balance);

    let prev = ym.prev();
    let prev_spent: Decimal = db
        .get_expenses_for_month(user, prev)?
        .iter()
        .map(|e| e.amount)
        .sum();
    if !prev_spent.is_zero() {
        let diff = balance.total_expenses - prev_spent;
        let sign = if diff > Decimal::ZERO { "+" } else { "" };
        println!(
            "  vs {}:      {:>16}  ({sign}{})",
            month_abbrev(prev.month()),
            format_amount(prev_spent),
            format_amount(diff)
        );
    }
    Ok(())
}

fn print_month_balance(b: &MonthBalance) {
    println!("  Income:          {:>16}", format_amount(b.total_income));
    println!(
        "  Fixed costs:     {:>16}  (paid {})",
        format_amount(b.total_fixed_costs),
        format_amount(b.paid_fixed_costs)
    );
    println!(
        "  Variable:        {:>16}  (everyday {}, special {})",
        format_amount(b.total_expenses),
        format_amount(b.everyday_expenses),
        format_amount(b.special_expenses)
    );
    println!("  Balance:         {:>16}", format_amount(b.balance));
    if b.projected_expenses != b.total_expenses {
        println!("  Projected spend: {:>16}", format_amount(b.projected_expenses));
        println!("  Projected:       {:>16}", format_amount(b.projected_balance));
    }
}

fn cli_month(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let ym = month_arg(args)?;
    let user = &config.user_id;
    let areas = db.get_areas(user)?;
    let expenses = db.get_expenses_for_month(user, ym)?;
    let fixed_costs = db.get_fixed_costs_for_month(user, ym)?;
    let stats = monthly_area_stats(&expenses, &areas, ym, &fixed_costs);

    if let Some(name) = flag_value(args, "--area") {
        let area = Area::find_by_name(&areas, name)
            .with_context(|| format!("Area '{name}' not found"))?;
        let entry = stats
            .areas
            .iter()
            .find(|a| a.area_id == area.id)
            .with_context(|| format!("No statistics for area '{name}'"))?;
        print_area_detail(entry);
        return Ok(());
    }

    println!("Areas — {} {}", month_name(ym.month()), ym.year());
    println!("{}", "─".repeat(52));
    for area in &stats.areas {
        println!(
            "  {:<22} {:<8} {:>4} {:>14}",
            truncate(area.area_name, 22),
            area.color,
            area.expense_count,
            format_amount(area.total_amount)
        );
    }
    println!(
        "  {:<22} {:<8} {:>4} {:>14}",
        "Unassigned",
        "",
        stats.unassigned.expense_count,
        format_amount(stats.unassigned.total_amount)
    );
    println!("{}", "─".repeat(52));
    println!("  {:<36}{:>14}", "Total", format_amount(stats.grand_total()));
    Ok(())
}

fn print_area_detail(area: &AreaStatistics<'_>) {
    println!(
        "{} — {} records, {}",
        area.area_name,
        area.expense_count,
        format_amount(area.total_amount)
    );
    for e in &area.expenses {
        println!(
            "  {:<10} {:<30} {:>14}",
            e.date.format("%Y-%m-%d"),
            truncate(&e.description, 30),
            format_amount(e.amount)
        );
    }
    for c in &area.fixed_costs {
        println!(
            "  {:<10} {:<30} {:>14}",
            c.year_month.to_string(),
            truncate(&c.name, 30),
            format_amount(c.amount)
        );
    }
}

fn cli_year(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let year: i32 = match positionals(args).first() {
        Some(raw) => raw.parse().with_context(|| format!("Invalid year: {raw}"))?,
        None => today().year(),
    };
    let user = &config.user_id;
    let areas = db.get_areas(user)?;
    let expenses = db.get_expenses_for_year(user, year)?;
    let fixed_costs = db.get_fixed_costs_for_year(user, year)?;
    let incomes = db.get_incomes_for_year(user, year)?;

    let mut stats = yearly_area_stats(&expenses, &areas, year, &fixed_costs);
    let area_filter = flag_value(args, "--area");
    if let Some(name) = area_filter {
        let area = Area::find_by_name(&areas, name)
            .with_context(|| format!("Area '{name}' not found"))?;
        stats.areas.retain(|a| a.area_id == area.id);
    }
    for line in yearly_area_lines(&stats, area_filter.is_some()) {
        println!("{line}");
    }

    let balance = year_balance(
        &incomes,
        &fixed_costs,
        &expenses,
        year,
        today(),
        config.weekly_allowance,
    );
    println!();
    print_year_balance(&balance);
    Ok(())
}

/// Rows of the yearly area table. A single-area view drops the unassigned and
/// grand total rows, which would not add up to the row shown.
fn yearly_area_lines(stats: &YearlyAreaStats<'_>, single_area: bool) -> Vec<String> {
    let mut lines = vec![format!("Areas — {}", stats.year)];
    let header: Vec<String> = (1..=12).map(|m| format!("{:>9}", month_abbrev(m))).collect();
    lines.push(format!("  {:<16} {:<8}{} {:>12}", "", "", header.join(""), "Total"));
    for area in &stats.areas {
        let cells: Vec<String> = area
            .monthly_totals
            .iter()
            .map(|m| format!("{:>9.0}", m.amount))
            .collect();
        lines.push(format!(
            "  {:<16} {:<8}{} {:>12}",
            truncate(area.area_name, 16),
            area.color,
            cells.join(""),
            format_amount(area.year_total)
        ));
    }
    if !single_area {
        lines.push(format!("  {:<133} {:>12}", "Unassigned", format_amount(stats.unassigned_total)));
        lines.push(format!("  {:<133} {:>12}", "Total", format_amount(stats.grand_total())));
    }
    lines
}

fn print_year_balance(b: &YearBalance) {
    println!("Balance — {}", b.year);
    for m in &b.monthly_balances {
        if m.total_income.is_zero() && m.total_fixed_costs.is_zero() && m.total_expenses.is_zero() {
            continue;
        }
        println!(
            "  {:<10} {:>14} {:>14} {:>14}",
            month_name(m.year_month.month()),
            format_amount(m.total_income),
            format_amount(m.total_fixed_costs + m.total_expenses),
            format_amount(m.balance)
        );
    }
    println!("  Income:   {:>16}", format_amount(b.total_income));
    println!("  Expenses: {:>16}", format_amount(b.total_expenses));
    println!("  Balance:  {:>16}", format_amount(b.balance));
}

fn cli_search(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let terms = positionals(args);
    if terms.iter().all(|t| t.trim().is_empty()) {
        bail!("Usage: areabudget search <term>... [--month YYYY-MM]");
    }
    let expenses = match flag_value(args, "--month") {
        Some(raw) => db.get_expenses_for_month(&config.user_id, YearMonth::parse(raw)?)?,
        None => db.get_expenses_for_year(&config.user_id, today().year())?,
    };

    let (hits, total) = search_expenses(&expenses, &terms);
    if hits.is_empty() {
        println!("No expenses matching any of: {}", terms.join(", "));
        return Ok(());
    }
    for e in &hits {
        println!(
            "  {:<10} {:<30} {:>14}",
            e.date.format("%Y-%m-%d"),
            truncate(&e.description, 30),
            format_amount(e.amount)
        );
    }
    println!("  {} matches, total {}", hits.len(), format_amount(total));
    Ok(())
}

fn cli_export(args: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let ym = month_arg_flag(args, "--month")?;
    let output_path = positionals(args)
        .first()
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            format!("{home}/areabudget-export-{ym}.csv")
        });

    let user = &config.user_id;
    let areas = db.get_areas(user)?;
    let expenses = db.get_expenses_for_month(user, ym)?;
    let fixed_costs = db.get_fixed_costs_for_month(user, ym)?;
    let stats = monthly_area_stats(&expenses, &areas, ym, &fixed_costs);

    let count = crate::export::export_month_to_path(Path::new(&output_path), &stats)?;
    if count == 0 {
        println!("No records for {ym}; wrote header only to {output_path}");
    } else {
        println!("Exported {count} records to {output_path}");
    }
    Ok(())
}

fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
