use crate::model::config::Config;
use crate::model::record::{Decision, RecordCollection};
use crate::repository::path::StorePath;
use crate::repository::traits::{DocumentStore, SubscriptionId};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::mpsc::Sender;
use tracing::warn;

pub struct ConfigRepository<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> ConfigRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn load(&self, uid: &str) -> Result<Option<Config>> {
        let path = StorePath::user_config(uid)?;
        let value = self
            .store
            .get(&path)
            .with_context(|| format!("Could not load config for {}", uid))?;
        Ok(value.map(|v| {
            serde_json::from_value::<Config>(v).unwrap_or_else(|e| {
                warn!(uid = %uid, error = %e, "Ignoring malformed config");
                Config::default()
            })
        }))
    }

    /// Only the price field is written; the snapshots under it stay.
    pub fn save_price(&self, uid: &str, price: f64) -> Result<()> {
        let path = StorePath::user_price(uid)?;
        self.store
            .set(&path, json!(price))
            .with_context(|| format!("Could not save price for {}", uid))
    }

    pub fn save_snapshot(&self, uid: &str, day: NaiveDate, price: f64) -> Result<()> {
        let path = StorePath::user_price_snapshot(uid, day)?;
        self.store
            .set(&path, json!(price))
            .with_context(|| format!("Could not save price snapshot for {}", day))
    }
}

pub struct RecordRepository<'a, S: DocumentStore> {
    store: &'a S,
}

impl<'a, S: DocumentStore> RecordRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn load(&self, uid: &str) -> Result<RecordCollection> {
        let path = StorePath::user_records(uid)?;
        let value = self
            .store
            .get(&path)
            .with_context(|| format!("Could not load records for {}", uid))?;
        Ok(value.map(|v| parse_records(&v)).unwrap_or_default())
    }

    pub fn save(&self, uid: &str, day: NaiveDate, decision: Decision) -> Result<()> {
        let path = StorePath::user_record(uid, day)?;
        self.store
            .set(&path, json!(decision.as_bool()))
            .with_context(|| format!("Could not save record for {}", day))
    }

    /// Forwards every new records snapshot into `sender`.
    pub fn watch(&self, uid: &str, sender: Sender<RecordCollection>) -> Result<SubscriptionId> {
        let path = StorePath::user_records(uid)?;
        self.store.subscribe(
            &path,
            Box::new(move |value: &Value| {
                let _ = sender.send(parse_records(value));
            }),
        )
    }
}

pub fn parse_records(value: &Value) -> RecordCollection {
    let mut records = RecordCollection::new();
    for (key, entry) in value.as_object().into_iter().flatten() {
        match (parse_day(key), entry.as_bool()) {
            (Some(day), Some(purchased)) => {
                records.insert(day, purchased);
            }
            _ => warn!(key = %key, "Skipping malformed record"),
        }
    }
    records
}

fn parse_day(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryDocumentStore;
    use std::sync::mpsc;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_parse_records_skips_garbage() {
        let value = json!({
            "2024-03-01": true,
            "2024-03-02": false,
            "yesterday": true,
            "2024-03-03": "yes"
        });
        let records = parse_records(&value);
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(&day(1)), Some(&true));
        assert_eq!(records.get(&day(2)), Some(&false));
        assert!(parse_records(&Value::Null).is_empty());
    }

    #[test]
    fn test_load_skips_bad_snapshots() {
        let store = MemoryDocumentStore::with_root(json!({
            "users": { "u": { "config": {
                "precoMarmita": 18.0,
                "historico": { "2024-03-01": 15.0, "not-a-day": 10.0 }
            } } }
        }));
        let config = ConfigRepository::new(&store).load("u").unwrap().unwrap();

        assert_eq!(config.unit_price, 18.0);
        assert_eq!(config.price_history.len(), 1);
        assert_eq!(config.price_on(day(1)), 15.0);
    }

    #[test]
    fn test_load_non_object_config_is_unconfigured() {
        let store = MemoryDocumentStore::with_root(json!({ "users": { "u": { "config": 42 } } }));
        let config = ConfigRepository::new(&store).load("u").unwrap().unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_save_price_keeps_history() {
        let store = MemoryDocumentStore::new();
        let repo = ConfigRepository::new(&store);

        assert_eq!(repo.load("u").unwrap(), None);

        repo.save_price("u", 15.0).unwrap();
        repo.save_snapshot("u", day(1), 15.0).unwrap();
        repo.save_price("u", 18.0).unwrap();

        let config = repo.load("u").unwrap().unwrap();
        assert_eq!(config.unit_price, 18.0);
        assert_eq!(config.price_history.get(&day(1)), Some(&15.0));
    }

    #[test]
    fn test_records_round_trip_and_watch() {
        let store = MemoryDocumentStore::new();
        let repo = RecordRepository::new(&store);
        let (tx, rx) = mpsc::channel();

        repo.watch("u", tx).unwrap();
        assert!(rx.try_recv().unwrap().is_empty());

        repo.save("u", day(1), Decision::Yes).unwrap();
        repo.save("u", day(2), Decision::No).unwrap();

        let latest = rx.try_iter().last().unwrap();
        assert_eq!(latest, repo.load("u").unwrap());
        assert_eq!(latest.get(&day(2)), Some(&false));
    }
}
