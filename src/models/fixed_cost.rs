use rust_decimal::Decimal;

use super::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recurrence {
    Monthly,
    Quarterly,
    Yearly,
    Once,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
            Self::Once => "once",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" | "annual" => Some(Self::Yearly),
            "once" => Some(Self::Once),
            _ => None,
        }
    }
}

impl std::fmt::Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A monthly obligation. Each record belongs to exactly one month; recurring
/// costs are materialized as one record per month they fall in.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedCost {
    pub id: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub year_month: YearMonth,
    pub recurrence: Recurrence,
    /// Explicit months (1-12) for quarterly/yearly costs.
    pub recurrence_months: Option<Vec<u32>>,
    pub paid_months: Vec<YearMonth>,
    pub user_id: String,
}

impl FixedCost {
    pub fn new(
        name: String,
        amount: Decimal,
        year_month: YearMonth,
        recurrence: Recurrence,
        user_id: String,
    ) -> Self {
        Self {
            id: None,
            name,
            amount,
            year_month,
            recurrence,
            recurrence_months: None,
            paid_months: Vec::new(),
            user_id,
        }
    }

    pub fn is_paid(&self, ym: YearMonth) -> bool {
        self.paid_months.contains(&ym)
    }

    /// Flip the paid flag for `ym`, returning the new state.
    pub fn toggle_paid(&mut self, ym: YearMonth) -> bool {
        if let Some(pos) = self.paid_months.iter().position(|m| *m == ym) {
            self.paid_months.remove(pos);
            false
        } else {
            self.paid_months.push(ym);
            self.paid_months.sort();
            true
        }
    }

    /// Whether a cost starting at `self.year_month` falls due in calendar month `month`.
    pub fn recurs_in(&self, month: u32) -> bool {
        let explicit = self
            .recurrence_months
            .as_deref()
            .filter(|months| !months.is_empty());
        let start = self.year_month.month();
        // A stored month outside 1..=12 has no cadence to follow.
        let start_valid = (1..=12).contains(&start);
        match self.recurrence {
            Recurrence::Monthly => true,
            Recurrence::Quarterly => match explicit {
                Some(months) => months.contains(&month),
                None => start_valid && (month + 12 - start) % 3 == 0,
            },
            Recurrence::Yearly => match explicit {
                Some(months) => months.contains(&month),
                None => start_valid && month == start,
            },
            Recurrence::Once => false,
        }
    }

    /// Months after `self.year_month`, up to and including `until`, in which this cost recurs.
    pub fn follow_up_months(&self, until: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        if self.recurrence == Recurrence::Once {
            return months;
        }
        let mut ym = self.year_month.next();
        while ym <= until {
            if self.recurs_in(ym.month()) {
                months.push(ym);
            }
            ym = ym.next();
        }
        months
    }

    /// Copy of this cost placed in another month, unpaid and without an id.
    pub fn for_month(&self, ym: YearMonth) -> Self {
        Self {
            id: None,
            year_month: ym,
            paid_months: Vec::new(),
            ..self.clone()
        }
    }
}
