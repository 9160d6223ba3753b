use crate::repository::path::StorePath;
use anyhow::Result;
use serde_json::Value;

/// Receives the value at the subscribed path (`Value::Null` when absent).
pub type Subscriber = Box<dyn Fn(&Value) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Path-addressed JSON document store.
pub trait DocumentStore {
    fn get(&self, path: &StorePath) -> Result<Option<Value>>;

    /// Writes `value` at `path`. `Value::Null` removes the entry.
    fn set(&self, path: &StorePath, value: Value) -> Result<()>;

    /// Delivers the current value right away, then again after every write
    /// that overlaps `path`.
    fn subscribe(&self, path: &StorePath, subscriber: Subscriber) -> Result<SubscriptionId>;

    fn unsubscribe(&self, id: SubscriptionId);
}
