use crate::model::record::{RecordCollection, RecordState};
use chrono::NaiveDate;

pub fn resolve(records: &RecordCollection, day: NaiveDate) -> RecordState {
    match records.get(&day) {
        Some(true) => RecordState::ConfirmedYes,
        Some(false) => RecordState::ConfirmedNo,
        None => RecordState::Undecided,
    }
}
