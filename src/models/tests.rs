#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::area::AREA_COLORS;
use super::*;

fn ym(value: u32) -> YearMonth {
    YearMonth::from_raw(value)
}

fn make_area(name: &str) -> Area {
    Area::new(name.into(), "#22c55e".into(), 1, "u1".into())
}

fn make_fixed(recurrence: Recurrence, start: u32) -> FixedCost {
    FixedCost::new("Rent".into(), dec!(800.00), ym(start), recurrence, "u1".into())
}

// ── YearMonth ─────────────────────────────────────────────────

#[test]
fn test_year_month_components() {
    let m = YearMonth::new(2026, 3).unwrap();
    assert_eq!(m.value(), 202603);
    assert_eq!(m.year(), 2026);
    assert_eq!(m.month(), 3);
    assert_eq!(m.to_string(), "2026-03");
}

#[test]
fn test_year_month_rejects_bad_month() {
    assert!(YearMonth::new(2026, 0).is_none());
    assert!(YearMonth::new(2026, 13).is_none());
}

#[test]
fn test_year_month_parse_formats() {
    assert_eq!(YearMonth::parse("2024-12").unwrap(), ym(202412));
    assert_eq!(YearMonth::parse("202412").unwrap(), ym(202412));
    assert_eq!(YearMonth::parse(" 2024-1 ").unwrap(), ym(202401));
    assert!(YearMonth::parse("2024-13").is_err());
    assert!(YearMonth::parse("december").is_err());
    assert!(YearMonth::parse("").is_err());
}

#[test]
fn test_year_month_next_prev_wrap() {
    assert_eq!(ym(202412).next(), ym(202501));
    assert_eq!(ym(202405).next(), ym(202406));
    assert_eq!(ym(202401).prev(), ym(202312));
    assert_eq!(ym(202406).prev(), ym(202405));
}

#[test]
fn test_year_month_days_in_month() {
    assert_eq!(ym(202402).days_in_month(), 29);
    assert_eq!(ym(202302).days_in_month(), 28);
    assert_eq!(ym(202412).days_in_month(), 31);
    assert_eq!(ym(202404).days_in_month(), 30);
}

#[test]
fn test_year_month_from_date_and_contains() {
    let date = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
    assert_eq!(YearMonth::from_date(date), ym(202507));
    assert!(ym(202507).contains(date));
    assert!(!ym(202508).contains(date));
}

#[test]
fn test_parse_month_list() {
    assert_eq!(parse_month_list("3,6, 9 ,12").unwrap(), vec![3, 6, 9, 12]);
    assert!(parse_month_list("").unwrap().is_empty());
    assert!(parse_month_list("0").is_err());
    assert!(parse_month_list("3,x").is_err());
}

// ── Area ──────────────────────────────────────────────────────

#[test]
fn test_add_keyword_trims() {
    let mut area = make_area("Food");
    assert!(area.add_keyword("  rewe "));
    assert_eq!(area.keywords, vec!["rewe"]);
}

#[test]
fn test_add_keyword_rejects_case_insensitive_duplicate() {
    let mut area = make_area("Food");
    assert!(area.add_keyword("REWE"));
    assert!(!area.add_keyword("rewe"));
    assert!(!area.add_keyword("Rewe"));
    assert_eq!(area.keywords.len(), 1);
}

#[test]
fn test_add_keyword_rejects_blank() {
    let mut area = make_area("Food");
    assert!(!area.add_keyword(""));
    assert!(!area.add_keyword("   "));
    assert!(area.keywords.is_empty());
}

#[test]
fn test_remove_keyword_exact() {
    let mut area = make_area("Food");
    area.add_keyword("rewe");
    area.add_keyword("edeka");
    assert!(!area.remove_keyword("REWE"));
    assert!(area.remove_keyword("rewe"));
    assert_eq!(area.keywords, vec!["edeka"]);
}

#[test]
fn test_next_priority_and_color() {
    let areas = vec![make_area("A"), make_area("B")];
    assert_eq!(Area::next_priority(&areas), 3);
    assert_eq!(Area::next_priority(&[]), 1);
    assert_eq!(Area::next_color(&areas), AREA_COLORS[2]);
    let many: Vec<Area> = (0..8).map(|i| make_area(&i.to_string())).collect();
    assert_eq!(Area::next_color(&many), AREA_COLORS[0]);
}

#[test]
fn test_find_area_by_name_case_insensitive() {
    let areas = vec![make_area("Food"), make_area("Drugstore")];
    assert_eq!(Area::find_by_name(&areas, "drugstore").unwrap().name, "Drugstore");
    assert!(Area::find_by_name(&areas, "Travel").is_none());
}

// ── Expense ───────────────────────────────────────────────────

#[test]
fn test_expense_category_parse() {
    assert_eq!(ExpenseCategory::parse("special"), ExpenseCategory::Special);
    assert_eq!(ExpenseCategory::parse("Sonderposten"), ExpenseCategory::Special);
    assert_eq!(ExpenseCategory::parse("everyday"), ExpenseCategory::Everyday);
    assert_eq!(ExpenseCategory::parse("garbage"), ExpenseCategory::Everyday);
}

#[test]
fn test_expense_year_month() {
    let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let e = Expense::new(dec!(1.00), ExpenseCategory::Everyday, "x".into(), date, "u1".into());
    assert_eq!(e.year_month(), ym(202402));
}

// ── FixedCost ─────────────────────────────────────────────────

#[test]
fn test_recurrence_parse() {
    assert_eq!(Recurrence::parse("Monthly"), Some(Recurrence::Monthly));
    assert_eq!(Recurrence::parse("quarterly"), Some(Recurrence::Quarterly));
    assert_eq!(Recurrence::parse("yearly"), Some(Recurrence::Yearly));
    assert_eq!(Recurrence::parse("once"), Some(Recurrence::Once));
    assert_eq!(Recurrence::parse("weekly"), None);
}

#[test]
fn test_toggle_paid() {
    let mut cost = make_fixed(Recurrence::Monthly, 202401);
    assert!(!cost.is_paid(ym(202401)));
    assert!(cost.toggle_paid(ym(202401)));
    assert!(cost.is_paid(ym(202401)));
    assert!(!cost.toggle_paid(ym(202401)));
    assert!(!cost.is_paid(ym(202401)));
}

#[test]
fn test_follow_up_monthly() {
    let cost = make_fixed(Recurrence::Monthly, 202410);
    assert_eq!(
        cost.follow_up_months(ym(202501)),
        vec![ym(202411), ym(202412), ym(202501)]
    );
}

#[test]
fn test_follow_up_quarterly_default() {
    let cost = make_fixed(Recurrence::Quarterly, 202403);
    assert_eq!(
        cost.follow_up_months(ym(202503)),
        vec![ym(202406), ym(202409), ym(202412), ym(202503)]
    );
}

#[test]
fn test_follow_up_quarterly_explicit_months() {
    let mut cost = make_fixed(Recurrence::Quarterly, 202401);
    cost.recurrence_months = Some(vec![1, 4, 7, 10]);
    assert_eq!(
        cost.follow_up_months(ym(202412)),
        vec![ym(202404), ym(202407), ym(202410)]
    );
}

#[test]
fn test_follow_up_yearly() {
    let cost = make_fixed(Recurrence::Yearly, 202405);
    assert!(cost.follow_up_months(ym(202412)).is_empty());
    assert_eq!(cost.follow_up_months(ym(202605)), vec![ym(202505), ym(202605)]);
}

#[test]
fn test_follow_up_yearly_explicit_months() {
    let mut cost = make_fixed(Recurrence::Yearly, 202401);
    cost.recurrence_months = Some(vec![6]);
    assert_eq!(cost.follow_up_months(ym(202412)), vec![ym(202406)]);
}

#[test]
fn test_recurs_in_with_corrupt_start_month() {
    for recurrence in [Recurrence::Quarterly, Recurrence::Yearly] {
        let cost = make_fixed(recurrence, 202499);
        assert!((1..=12).all(|m| !cost.recurs_in(m)));
        assert!(cost.follow_up_months(ym(202512)).is_empty());
    }
}

#[test]
fn test_follow_up_once_is_empty() {
    let cost = make_fixed(Recurrence::Once, 202401);
    assert!(cost.follow_up_months(ym(203012)).is_empty());
}

#[test]
fn test_follow_up_until_before_start() {
    let cost = make_fixed(Recurrence::Monthly, 202406);
    assert!(cost.follow_up_months(ym(202401)).is_empty());
}

#[test]
fn test_for_month_resets_identity_and_payment() {
    let mut cost = make_fixed(Recurrence::Monthly, 202401);
    cost.id = Some(7);
    cost.toggle_paid(ym(202401));
    let copy = cost.for_month(ym(202402));
    assert_eq!(copy.id, None);
    assert_eq!(copy.year_month, ym(202402));
    assert!(copy.paid_months.is_empty());
    assert_eq!(copy.name, "Rent");
    assert_eq!(copy.amount, dec!(800.00));
}
