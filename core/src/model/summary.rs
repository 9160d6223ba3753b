use crate::model::month::YearMonth;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlySummary {
    pub count: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub purchased: bool,
    pub price: Option<f64>, // None for "no" days
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyHistory {
    pub month: YearMonth,
    pub days: Vec<DayEntry>,
    pub summary: MonthlySummary,
}
