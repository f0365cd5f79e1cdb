#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("REWE", 10), "REWE");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("REWE City Berlin", 5), "REWE…");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_umlauts() {
    assert_eq!(truncate("Bäckerei Müller", 9), "Bäckerei…");
}

#[test]
fn test_truncate_max_one() {
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("a", 1), "a");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56)), "1.234,56 €");
}

#[test]
fn test_format_amount_no_grouping() {
    assert_eq!(format_amount(dec!(999.99)), "999,99 €");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0)), "0,00 €");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50)), "-42,50 €");
}

#[test]
fn test_format_amount_millions() {
    assert_eq!(format_amount(dec!(1234567.89)), "1.234.567,89 €");
}

#[test]
fn test_format_amount_pads_decimals() {
    assert_eq!(format_amount(dec!(5)), "5,00 €");
    assert_eq!(format_amount(dec!(1.5)), "1,50 €");
}

// ── month names ───────────────────────────────────────────────

#[test]
fn test_month_name() {
    assert_eq!(month_name(1), "January");
    assert_eq!(month_name(12), "December");
    assert_eq!(month_name(0), "?");
    assert_eq!(month_name(13), "?");
}

#[test]
fn test_month_abbrev() {
    assert_eq!(month_abbrev(3), "Mar");
    assert_eq!(month_abbrev(9), "Sep");
    assert_eq!(month_abbrev(0), "?");
}
