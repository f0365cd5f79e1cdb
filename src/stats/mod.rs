mod areas;
mod balance;

pub(crate) use areas::{
    monthly_area_stats, yearly_area_stats, AreaStatistics, MonthlyAreaStats, YearlyAreaStats,
};
pub(crate) use balance::{month_balance, year_balance, MonthBalance, YearBalance};
