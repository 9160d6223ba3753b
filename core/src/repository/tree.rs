use crate::repository::path::StorePath;
use crate::repository::traits::{Subscriber, SubscriptionId};
use anyhow::{anyhow, Result};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub(crate) fn get_at<'a>(root: &'a Value, path: &StorePath) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = node.as_object()?.get(segment)?;
    }
    if node.is_null() {
        None
    } else {
        Some(node)
    }
}

/// Writes `value` at `path`, creating objects on the way down.
/// A null value deletes the key and prunes parents left empty.
pub(crate) fn set_at(root: &mut Value, path: &StorePath, value: Value) {
    let segments = path.segments();
    if segments.is_empty() {
        *root = if value.is_null() { Value::Object(Map::new()) } else { value };
        return;
    }
    if value.is_null() {
        remove_at(root, segments);
        return;
    }

    let mut node = root;
    for segment in &segments[..segments.len() - 1] {
        node = ensure_object(node)
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(node).insert(segments[segments.len() - 1].clone(), value);
}

fn ensure_object(node: &mut Value) -> &mut Map<String, Value> {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map,
        _ => unreachable!("node was just replaced with an object"),
    }
}

// Returns true when `node` ended up empty.
fn remove_at(node: &mut Value, segments: &[String]) -> bool {
    let Some(obj) = node.as_object_mut() else {
        return false;
    };
    match segments {
        [] => false,
        [last] => {
            obj.remove(last);
            obj.is_empty()
        }
        [first, rest @ ..] => {
            let child_empty = match obj.get_mut(first) {
                Some(child) => remove_at(child, rest),
                None => false,
            };
            if child_empty {
                obj.remove(first);
            }
            obj.is_empty()
        }
    }
}

struct Subscription {
    id: SubscriptionId,
    path: StorePath,
    subscriber: Arc<dyn Fn(&Value) + Send + Sync>,
}

/// In-process subscriber list shared by the store implementations.
/// Callbacks run after the list lock is released, so they may use the store.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: AtomicU64,
    entries: Mutex<Vec<Subscription>>,
}

impl Subscribers {
    pub(crate) fn add(&self, path: &StorePath, subscriber: Subscriber, root: &Value) -> Result<SubscriptionId> {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let subscriber: Arc<dyn Fn(&Value) + Send + Sync> = Arc::from(subscriber);
        self.entries
            .lock()
            .map_err(|_| anyhow!("Subscriber list poisoned"))?
            .push(Subscription {
                id,
                path: path.clone(),
                subscriber: Arc::clone(&subscriber),
            });
        subscriber(get_at(root, path).unwrap_or(&Value::Null));
        Ok(id)
    }

    pub(crate) fn remove(&self, id: SubscriptionId) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.retain(|s| s.id != id);
        }
    }

    pub(crate) fn notify(&self, changed: &StorePath, root: &Value) {
        let matching: Vec<(StorePath, Arc<dyn Fn(&Value) + Send + Sync>)> = match self.entries.lock() {
            Ok(entries) => entries
                .iter()
                .filter(|s| s.path.overlaps(changed))
                .map(|s| (s.path.clone(), Arc::clone(&s.subscriber)))
                .collect(),
            Err(_) => {
                tracing::warn!(path = %changed, "Subscriber list poisoned, dropping notification");
                return;
            }
        };

        for (path, subscriber) in matching {
            tracing::debug!(%path, "Notifying subscriber");
            subscriber(get_at(root, &path).unwrap_or(&Value::Null));
        }
    }
}
