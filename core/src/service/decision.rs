use crate::model::record::{Decision, PriceHistory, RecordCollection};
use chrono::NaiveDate;

/// Applies a day's decision to the in-memory collections.
///
/// A "yes" always snapshots `current_price`, so committing "yes" twice keeps
/// the latest price. A "no" never removes an existing snapshot.
pub fn commit_decision(
    records: &mut RecordCollection,
    price_history: &mut PriceHistory,
    day: NaiveDate,
    decision: Decision,
    current_price: f64,
) {
    records.insert(day, decision.as_bool());
    if decision == Decision::Yes {
        price_history.insert(day, current_price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[test]
    fn test_yes_snapshots_price() {
        let mut records = RecordCollection::new();
        let mut history = PriceHistory::new();

        commit_decision(&mut records, &mut history, today(), Decision::Yes, 20.0);

        assert_eq!(records.get(&today()), Some(&true));
        assert_eq!(history.get(&today()), Some(&20.0));
    }

    #[test]
    fn test_repeated_yes_keeps_last_price() {
        let mut records = RecordCollection::new();
        let mut history = PriceHistory::new();

        commit_decision(&mut records, &mut history, today(), Decision::Yes, 20.0);
        commit_decision(&mut records, &mut history, today(), Decision::Yes, 25.0);

        assert_eq!(records.len(), 1);
        assert_eq!(history.get(&today()), Some(&25.0));
    }

    #[test]
    fn test_no_does_not_delete_snapshot() {
        let mut records = RecordCollection::new();
        let mut history = PriceHistory::new();

        commit_decision(&mut records, &mut history, today(), Decision::Yes, 20.0);
        commit_decision(&mut records, &mut history, today(), Decision::No, 20.0);

        assert_eq!(records.get(&today()), Some(&false));
        assert_eq!(history.get(&today()), Some(&20.0));
    }

    #[test]
    fn test_no_on_fresh_day_writes_no_history() {
        let mut records = RecordCollection::new();
        let mut history = PriceHistory::new();

        commit_decision(&mut records, &mut history, today(), Decision::No, 20.0);
        commit_decision(&mut records, &mut history, today(), Decision::No, 20.0);

        assert_eq!(records.get(&today()), Some(&false));
        assert!(history.is_empty());
    }
}
