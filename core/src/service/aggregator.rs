use crate::model::month::YearMonth;
use crate::model::record::{PriceHistory, RecordCollection};
use crate::model::summary::{DayEntry, MonthlyHistory, MonthlySummary};
use std::collections::BTreeMap;

/// Counts the "yes" days of `month` and sums their cost.
///
/// Each day is charged its snapshot from `price_history` when one exists,
/// otherwise `fallback_price`. "No" days cost nothing.
pub fn aggregate(
    records: &RecordCollection,
    price_history: &PriceHistory,
    fallback_price: f64,
    month: YearMonth,
) -> MonthlySummary {
    let mut summary = MonthlySummary::default();

    for (date, _) in records
        .iter()
        .filter(|(date, purchased)| **purchased && month.contains(**date))
    {
        summary.count += 1;
        summary.total += price_history.get(date).copied().unwrap_or(fallback_price);
    }

    summary
}

/// Every month with at least one record, most recent first.
pub fn monthly_history(
    records: &RecordCollection,
    price_history: &PriceHistory,
    fallback_price: f64,
) -> Vec<MonthlyHistory> {
    let mut by_month: BTreeMap<YearMonth, Vec<DayEntry>> = BTreeMap::new();

    for (date, purchased) in records {
        let price = if *purchased {
            Some(price_history.get(date).copied().unwrap_or(fallback_price))
        } else {
            None
        };
        by_month.entry(YearMonth::of(*date)).or_default().push(DayEntry {
            date: *date,
            purchased: *purchased,
            price,
        });
    }

    by_month
        .into_iter()
        .rev()
        .map(|(month, days)| MonthlyHistory {
            month,
            summary: aggregate(records, price_history, fallback_price, month),
            days,
        })
        .collect()
}
