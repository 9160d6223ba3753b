use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Day -> purchased? Absent days are undecided.
pub type RecordCollection = BTreeMap<NaiveDate, bool>;

/// Day -> unit price in effect when "yes" was recorded.
pub type PriceHistory = BTreeMap<NaiveDate, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Yes,
    No,
}

impl Decision {
    pub fn as_bool(self) -> bool {
        matches!(self, Decision::Yes)
    }
}

impl From<bool> for Decision {
    fn from(value: bool) -> Self {
        if value {
            Decision::Yes
        } else {
            Decision::No
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordState {
    Undecided,
    ConfirmedYes,
    ConfirmedNo,
}

impl RecordState {
    pub fn label(&self) -> &'static str {
        match self {
            RecordState::Undecided => "Not answered yet",
            RecordState::ConfirmedYes => "Meal box bought",
            RecordState::ConfirmedNo => "No meal box",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_bool_conversion() {
        assert!(Decision::Yes.as_bool());
        assert!(!Decision::No.as_bool());
        assert_eq!(Decision::from(true), Decision::Yes);
        assert_eq!(Decision::from(false), Decision::No);
    }
}
