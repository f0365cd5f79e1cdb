use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};

/// Compact month key encoded as `year * 100 + month`, e.g. `202603` for March 2026.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth(u32);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return None;
        }
        Some(Self(year as u32 * 100 + month))
    }

    /// Wrap a raw `YYYYMM` value as stored. The month component is not checked.
    pub fn from_raw(value: u32) -> Self {
        Self(value)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.year().max(0) as u32 * 100 + date.month())
    }

    /// Accepts `YYYY-MM` and `YYYYMM`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (year, month) = match s.split_once('-') {
            Some((y, m)) => (y, m),
            None if s.len() == 6 && s.is_ascii() => s.split_at(4),
            None => bail!("Invalid month '{s}', expected YYYY-MM"),
        };
        let year: i32 = year
            .parse()
            .with_context(|| format!("Invalid year in '{s}'"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("Invalid month in '{s}'"))?;
        Self::new(year, month).with_context(|| format!("Month out of range in '{s}'"))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    pub fn year(self) -> i32 {
        (self.0 / 100) as i32
    }

    pub fn month(self) -> u32 {
        self.0 % 100
    }

    pub fn next(self) -> Self {
        if self.month() >= 12 {
            Self((self.0 / 100 + 1) * 100 + 1)
        } else {
            Self(self.0 + 1)
        }
    }

    pub fn prev(self) -> Self {
        if self.month() <= 1 {
            Self((self.0 / 100).saturating_sub(1) * 100 + 12)
        } else {
            Self(self.0 - 1)
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year(), self.month(), 1)
    }

    pub fn days_in_month(self) -> u32 {
        match (self.first_day(), self.next().first_day()) {
            (Some(first), Some(next)) => (next - first).num_days() as u32,
            _ => 0,
        }
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Parse a comma-separated month list such as `"3,6,9,12"`. Blank input yields an empty list.
pub fn parse_month_list(s: &str) -> Result<Vec<u32>> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let m: u32 = p.parse().with_context(|| format!("Invalid month '{p}'"))?;
            if !(1..=12).contains(&m) {
                bail!("Month {m} out of range 1-12");
            }
            Ok(m)
        })
        .collect()
}
