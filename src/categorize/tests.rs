#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Area, Expense, ExpenseCategory, FixedCost, Recurrence, YearMonth};

fn make_area(id: i64, name: &str, keywords: &[&str], priority: i32) -> Area {
    Area {
        id: Some(id),
        name: name.into(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        color: "#3b82f6".into(),
        priority,
        user_id: "u1".into(),
    }
}

fn make_expense(desc: &str) -> Expense {
    Expense::new(
        dec!(10.00),
        ExpenseCategory::Everyday,
        desc.into(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        "u1".into(),
    )
}

// ── normalize ─────────────────────────────────────────────────

#[test]
fn test_normalize_accent_insensitive() {
    assert_eq!(normalize("Café"), "cafe");
    assert_eq!(normalize("cafe"), "cafe");
    assert_eq!(normalize("CAFÉ"), "cafe");
}

#[test]
fn test_normalize_umlauts() {
    assert_eq!(normalize("Bäckerei Müller"), "backerei muller");
    assert_eq!(normalize("Ärzte"), "arzte");
}

#[test]
fn test_normalize_empty() {
    assert_eq!(normalize(""), "");
}

#[test]
fn test_normalize_idempotent() {
    for s in ["Café", "ÉCOLE", "Crème Brûlée", "İstanbul", "ǅemal", "日本語", "", "  Mixed 123 "] {
        let once = normalize(s);
        assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
    }
}

#[test]
fn test_normalize_keeps_non_latin() {
    assert_eq!(normalize("日本語テスト"), "日本語テスト");
}

// ── match_to_area ─────────────────────────────────────────────

#[test]
fn test_match_substring() {
    let areas = vec![make_area(1, "Food", &["rewe"], 1)];
    let hit = match_to_area("REWE City Berlin", &areas).unwrap();
    assert_eq!(hit.id, Some(1));
}

#[test]
fn test_match_no_match() {
    let areas = vec![make_area(1, "Food", &["rewe"], 1)];
    assert!(match_to_area("Shell Tankstelle", &areas).is_none());
}

#[test]
fn test_match_higher_priority_wins() {
    let areas = vec![
        make_area(1, "Food", &["rewe"], 1),
        make_area(2, "Drugstore", &["rewe", "dm"], 2),
    ];
    let hit = match_to_area("REWE City Berlin", &areas).unwrap();
    assert_eq!(hit.name, "Drugstore");
}

#[test]
fn test_match_priority_independent_of_order() {
    let areas = vec![
        make_area(2, "Drugstore", &["rewe"], 5),
        make_area(1, "Food", &["rewe"], 1),
    ];
    assert_eq!(match_to_area("rewe", &areas).unwrap().id, Some(2));
}

#[test]
fn test_match_tie_goes_to_first_in_input() {
    let areas = vec![
        make_area(1, "First", &["shop"], 3),
        make_area(2, "Second", &["shop"], 3),
    ];
    for _ in 0..10 {
        assert_eq!(match_to_area("Coffee Shop", &areas).unwrap().id, Some(1));
    }

    let reversed = vec![areas[1].clone(), areas[0].clone()];
    assert_eq!(match_to_area("Coffee Shop", &reversed).unwrap().id, Some(2));
}

#[test]
fn test_match_accent_on_text_side() {
    let areas = vec![make_area(1, "Bakery", &["backerei"], 1)];
    assert_eq!(match_to_area("Bäckerei Müller", &areas).unwrap().id, Some(1));
}

#[test]
fn test_match_accent_on_keyword_side() {
    let areas = vec![make_area(1, "Coffee", &["Café"], 1)];
    assert_eq!(match_to_area("CAFE CENTRAL", &areas).unwrap().id, Some(1));
}

#[test]
fn test_match_area_without_keywords_never_matches() {
    let areas = vec![make_area(1, "Empty", &[], 10)];
    assert!(match_to_area("anything", &areas).is_none());
    assert!(match_to_area("", &areas).is_none());
}

#[test]
fn test_match_blank_keyword_never_matches() {
    let areas = vec![make_area(1, "Blank", &["", "   "], 10)];
    assert!(match_to_area("anything", &areas).is_none());
    assert!(match_to_area("", &areas).is_none());
    assert!(match_to_area("with spaces inside", &areas).is_none());
}

#[test]
fn test_match_blank_keyword_does_not_shadow_real_one() {
    let areas = vec![
        make_area(1, "Blank", &[""], 10),
        make_area(2, "Fuel", &["shell"], 1),
    ];
    assert_eq!(match_to_area("Shell Station", &areas).unwrap().id, Some(2));
}

#[test]
fn test_match_empty_text() {
    let areas = vec![make_area(1, "Food", &["rewe"], 1)];
    assert!(match_to_area("", &areas).is_none());
}

#[test]
fn test_match_empty_areas() {
    assert!(match_to_area("REWE", &[]).is_none());
}

#[test]
fn test_matcher_reusable_across_calls() {
    let areas = vec![
        make_area(1, "Food", &["rewe", "edeka"], 1),
        make_area(2, "Fuel", &["aral"], 1),
    ];
    let matcher = AreaMatcher::new(&areas);
    assert_eq!(matcher.match_text("EDEKA Nord").unwrap().id, Some(1));
    assert_eq!(matcher.match_text("ARAL 123").unwrap().id, Some(2));
    assert_eq!(matcher.match_index("ARAL 123"), Some(1));
    assert!(matcher.match_text("Kino").is_none());
}

// ── group_by_area ─────────────────────────────────────────────

#[test]
fn test_group_initializes_every_area() {
    let areas = vec![
        make_area(1, "Food", &["rewe"], 1),
        make_area(2, "Travel", &["bahn"], 1),
    ];
    let expenses = vec![make_expense("REWE")];
    let grouped = group_by_area(&expenses, &areas, |e| e.description.as_str());
    assert_eq!(grouped.by_area.len(), 2);
    assert_eq!(grouped.by_area[0].len(), 1);
    assert!(grouped.by_area[1].is_empty());
    assert!(grouped.unassigned.is_empty());
}

#[test]
fn test_group_unassigned_bucket() {
    let areas = vec![make_area(1, "Food", &["rewe"], 1)];
    let expenses = vec![make_expense("REWE"), make_expense("Kino"), make_expense("Netflix")];
    let grouped = group_by_area(&expenses, &areas, |e| e.description.as_str());
    assert_eq!(grouped.by_area[0].len(), 1);
    let unassigned: Vec<&str> = grouped
        .unassigned
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(unassigned, vec!["Kino", "Netflix"]);
}

#[test]
fn test_group_preserves_record_order_within_bucket() {
    let areas = vec![make_area(1, "Food", &["rewe"], 1)];
    let expenses = vec![make_expense("REWE a"), make_expense("REWE b"), make_expense("REWE c")];
    let grouped = group_by_area(&expenses, &areas, |e| e.description.as_str());
    let descs: Vec<&str> = grouped.by_area[0]
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(descs, vec!["REWE a", "REWE b", "REWE c"]);
}

#[test]
fn test_group_fixed_costs_by_name() {
    let areas = vec![make_area(1, "Housing", &["miete"], 1)];
    let costs = vec![
        FixedCost::new(
            "Miete Wohnung".into(),
            dec!(900.00),
            YearMonth::from_raw(202401),
            Recurrence::Monthly,
            "u1".into(),
        ),
        FixedCost::new(
            "Handy".into(),
            dec!(20.00),
            YearMonth::from_raw(202401),
            Recurrence::Monthly,
            "u1".into(),
        ),
    ];
    let grouped = group_by_area(&costs, &areas, |c| c.name.as_str());
    assert_eq!(grouped.by_area[0].len(), 1);
    assert_eq!(grouped.by_area[0][0].name, "Miete Wohnung");
    assert_eq!(grouped.unassigned.len(), 1);
}

#[test]
fn test_group_empty_inputs() {
    let grouped = group_by_area::<Expense, _>(&[], &[], |e| e.description.as_str());
    assert!(grouped.by_area.is_empty());
    assert!(grouped.unassigned.is_empty());
}

// ── search_expenses ───────────────────────────────────────────

#[test]
fn test_search_accent_insensitive_with_total() {
    let expenses = vec![
        make_expense("Café Central"),
        make_expense("CAFE am Markt"),
        make_expense("Tankstelle"),
    ];
    let (hits, total) = search_expenses(&expenses, &["café"]);
    assert_eq!(hits.len(), 2);
    assert_eq!(total, dec!(20.00));
}

#[test]
fn test_search_blank_term_returns_nothing() {
    let expenses = vec![make_expense("Café")];
    let (hits, total) = search_expenses(&expenses, &["  "]);
    assert!(hits.is_empty());
    assert_eq!(total, dec!(0));
    assert!(search_expenses(&expenses, &[]).0.is_empty());
}

#[test]
fn test_search_matches_any_term() {
    let expenses = vec![
        make_expense("REWE Markt"),
        make_expense("dm Drogerie"),
        make_expense("Tankstelle"),
    ];
    let (hits, total) = search_expenses(&expenses, &["rewe", "", "DM"]);
    let descriptions: Vec<&str> = hits.iter().map(|e| e.description.as_str()).collect();
    assert_eq!(descriptions, vec!["REWE Markt", "dm Drogerie"]);
    assert_eq!(total, dec!(20.00));
}

#[test]
fn test_search_expense_matching_two_terms_counted_once() {
    let expenses = vec![make_expense("REWE und dm")];
    let (hits, total) = search_expenses(&expenses, &["rewe", "dm"]);
    assert_eq!(hits.len(), 1);
    assert_eq!(total, dec!(10.00));
}
