use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::repository::path::StorePath;
use crate::repository::traits::{DocumentStore, Subscriber, SubscriptionId};
use crate::repository::tree::{get_at, set_at, Subscribers};
use crate::settings::default_data_dir;

const DEFAULT_FILE_NAME: &str = "store.json";

/// Document tree persisted as a single JSON file in the data directory.
/// Subscriptions only see writes made through this process.
pub struct FileDocumentStore {
    file_path: PathBuf,
    subscribers: Subscribers,
}

impl FileDocumentStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;
        path.push(DEFAULT_FILE_NAME);

        if !path.exists() {
            write_root(&path, &Value::Object(Map::new()))?;
        }

        Ok(FileDocumentStore {
            file_path: path,
            subscribers: Subscribers::default(),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_root(&self) -> Result<Value> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Could not open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        let root = serde_json::from_reader(reader)
            .with_context(|| format!("Corrupted store file {}", self.file_path.display()))?;
        Ok(root)
    }
}

fn write_root(path: &Path, root: &Value) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Could not write {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, root)?;
    writer.flush()?;
    Ok(())
}

impl DocumentStore for FileDocumentStore {
    fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        tracing::debug!(%path, "Store read");
        let root = self.read_root()?;
        Ok(get_at(&root, path).cloned())
    }

    fn set(&self, path: &StorePath, value: Value) -> Result<()> {
        tracing::debug!(%path, "Store write");
        let mut root = self.read_root()?;
        set_at(&mut root, path, value);
        write_root(&self.file_path, &root)?;
        self.subscribers.notify(path, &root);
        Ok(())
    }

    fn subscribe(&self, path: &StorePath, subscriber: Subscriber) -> Result<SubscriptionId> {
        let root = self.read_root()?;
        self.subscribers.add(path, subscriber, &root)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers.remove(id);
    }
}
