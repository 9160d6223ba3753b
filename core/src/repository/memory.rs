use crate::repository::path::StorePath;
use crate::repository::traits::{DocumentStore, Subscriber, SubscriptionId};
use crate::repository::tree::{get_at, set_at, Subscribers};
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::sync::Mutex;

/// Keeps the whole document tree in memory.
pub struct MemoryDocumentStore {
    root: Mutex<Value>,
    subscribers: Subscribers,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_root(Value::Object(Map::new()))
    }

    pub fn with_root(root: Value) -> Self {
        Self {
            root: Mutex::new(root),
            subscribers: Subscribers::default(),
        }
    }

    pub fn snapshot(&self) -> Result<Value> {
        let root = self.root.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
        Ok(root.clone())
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        let root = self.root.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
        Ok(get_at(&root, path).cloned())
    }

    fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        let snapshot = {
            let mut root = self.root.lock().map_err(|_| anyhow!("Store lock poisoned"))?;
            set_at(&mut root, path, value);
            root.clone()
        };
        self.subscribers.notify(path, &snapshot);
        Ok(())
    }

    fn subscribe(&self, path: &StorePath, subscriber: Subscriber) -> Result<SubscriptionId> {
        let snapshot = self.snapshot()?;
        self.subscribers.add(path, subscriber, &snapshot)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{mpsc, Arc};

    fn p(s: &str) -> StorePath {
        s.parse().unwrap()
    }

    #[test]
    fn test_get_set() {
        let store = MemoryDocumentStore::new();
        assert_eq!(store.get(&p("users/u/config")).unwrap(), None);

        store.set(&p("users/u/config"), json!({ "precoMarmita": 18.0 })).unwrap();
        assert_eq!(store.get(&p("users/u/config/precoMarmita")).unwrap(), Some(json!(18.0)));
    }

    #[test]
    fn test_subscribe_delivers_current_then_changes() {
        let store = MemoryDocumentStore::new();
        store.set(&p("users/u/registros/2024-03-01"), json!(true)).unwrap();

        let (tx, rx) = mpsc::channel();
        let id = store
            .subscribe(&p("users/u/registros"), Box::new(move |v: &Value| {
                let _ = tx.send(v.clone());
            }))
            .unwrap();

        assert_eq!(rx.try_recv().unwrap(), json!({ "2024-03-01": true }));

        store.set(&p("users/u/registros/2024-03-02"), json!(false)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), json!({ "2024-03-01": true, "2024-03-02": false }));

        // unrelated path
        store.set(&p("users/u/config/precoMarmita"), json!(20.0)).unwrap();
        assert!(rx.try_recv().is_err());

        store.unsubscribe(id);
        store.set(&p("users/u/registros/2024-03-03"), json!(true)).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_subscriber_may_write_to_the_store() {
        let store = Arc::new(MemoryDocumentStore::new());

        // mirror "a" into "b" from inside the callback
        let weak = Arc::downgrade(&store);
        store
            .subscribe(&p("a"), Box::new(move |v: &Value| {
                if let Some(store) = weak.upgrade() {
                    if !v.is_null() {
                        store.set(&"b".parse().unwrap(), v.clone()).unwrap();
                    }
                }
            }))
            .unwrap();

        let (tx, rx) = mpsc::channel();
        store
            .subscribe(&p("b"), Box::new(move |v: &Value| {
                let _ = tx.send(v.clone());
            }))
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), Value::Null);

        store.set(&p("a"), json!(7)).unwrap();

        assert_eq!(store.get(&p("b")).unwrap(), Some(json!(7)));
        assert_eq!(rx.try_recv().unwrap(), json!(7));
    }

    #[test]
    fn test_subscribe_to_missing_path_gets_null() {
        let store = MemoryDocumentStore::new();
        let (tx, rx) = mpsc::channel();
        store
            .subscribe(&p("users/u/registros"), Box::new(move |v: &Value| {
                let _ = tx.send(v.clone());
            }))
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), Value::Null);
    }
}
