use crate::model::record::PriceHistory;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// Per-user settings as persisted under `users/{uid}/config`.
///
/// The field names on the wire are kept from the existing data set:
/// `precoMarmita` for the unit price and `historico` for the price snapshots.
/// Bad values are skipped rather than failing the whole document.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(rename = "precoMarmita", default, deserialize_with = "lenient_price")]
    pub unit_price: f64,
    #[serde(rename = "historico", default, deserialize_with = "lenient_history")]
    pub price_history: PriceHistory,
}

impl Config {
    pub fn new(unit_price: f64) -> Self {
        Self {
            unit_price,
            price_history: PriceHistory::new(),
        }
    }

    /// A config without a positive price has not been set up yet.
    pub fn is_configured(&self) -> bool {
        self.unit_price.is_finite() && self.unit_price > 0.0
    }

    pub fn price_on(&self, day: NaiveDate) -> f64 {
        self.price_history.get(&day).copied().unwrap_or(self.unit_price)
    }
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64().unwrap_or_else(|| {
        warn!(%value, "Ignoring malformed unit price");
        0.0
    }))
}

fn lenient_history<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PriceHistory, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let empty = Map::new();
    let mut history = PriceHistory::new();

    for (key, entry) in value.as_object().unwrap_or(&empty) {
        match (NaiveDate::parse_from_str(key, "%Y-%m-%d").ok(), entry.as_f64()) {
            (Some(day), Some(price)) => {
                history.insert(day, price);
            }
            _ => warn!(key = %key, "Skipping malformed price snapshot"),
        }
    }
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_names() {
        let value = json!({
            "precoMarmita": 18.0,
            "historico": { "2024-03-01": 15.0 }
        });
        let config: Config = serde_json::from_value(value).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert_eq!(config.unit_price, 18.0);
        assert_eq!(config.price_on(day), 15.0);
        assert_eq!(config.price_on(day.succ_opt().unwrap()), 18.0);
    }

    #[test]
    fn test_bad_snapshot_keys_are_skipped() {
        let value = json!({
            "precoMarmita": 18.0,
            "historico": { "2024-03-01": 15.0, "someday": 12.0, "2024-03-02": "cheap" }
        });
        let config: Config = serde_json::from_value(value).unwrap();

        assert_eq!(config.unit_price, 18.0);
        assert_eq!(config.price_history.len(), 1);
    }

    #[test]
    fn test_missing_price_is_not_configured() {
        let config: Config = serde_json::from_value(json!({})).unwrap();
        assert!(!config.is_configured());
        let garbled: Config = serde_json::from_value(json!({ "precoMarmita": "abc" })).unwrap();
        assert!(!garbled.is_configured());
        assert!(Config::new(12.5).is_configured());
        assert!(!Config::new(0.0).is_configured());
    }
}
