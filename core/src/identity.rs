use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::user::User;
use crate::settings::default_data_dir;

const IDENTITY_FILE_NAME: &str = "identity.json";

pub trait IdentityProvider {
    fn sign_in(&self, display_name: &str) -> Result<User>;
    fn sign_out(&self) -> Result<()>;
    fn current(&self) -> Result<Option<User>>;
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct IdentityFile {
    users: BTreeMap<String, String>, // display name -> uid
    current: Option<User>,
}

/// Offline identity provider: each display name gets a stable generated uid.
pub struct LocalIdentityProvider {
    file_path: PathBuf,
}

impl LocalIdentityProvider {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let mut path = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&path)
            .with_context(|| format!("Could not create data directory {}", path.display()))?;
        path.push(IDENTITY_FILE_NAME);

        let provider = LocalIdentityProvider { file_path: path };
        if !provider.file_path.exists() {
            provider.write(&IdentityFile::default())?;
        }
        Ok(provider)
    }

    fn read(&self) -> Result<IdentityFile> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("Could not open {}", self.file_path.display()))?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    fn write(&self, identities: &IdentityFile) -> Result<()> {
        let file = File::create(&self.file_path)
            .with_context(|| format!("Could not write {}", self.file_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, identities)?;
        writer.flush()?;
        Ok(())
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_in(&self, display_name: &str) -> Result<User> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(anyhow!("A name is required to log in"));
        }

        let mut identities = self.read()?;
        let uid = identities
            .users
            .entry(display_name.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        let user = User::new(uid, display_name);
        identities.current = Some(user.clone());
        self.write(&identities)?;

        tracing::info!(uid = %user.uid, "Signed in");
        Ok(user)
    }

    fn sign_out(&self) -> Result<()> {
        let mut identities = self.read()?;
        if let Some(user) = identities.current.take() {
            tracing::info!(uid = %user.uid, "Signed out");
        }
        self.write(&identities)
    }

    fn current(&self) -> Result<Option<User>> {
        Ok(self.read()?.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("marmita-identity-{}", Uuid::new_v4()))
    }

    #[test]
    fn test_sign_in_is_stable_per_name() {
        let dir = temp_dir();
        let provider = LocalIdentityProvider::new(Some(dir.clone())).unwrap();

        let first = provider.sign_in("Ana").unwrap();
        let again = provider.sign_in("  Ana ").unwrap();
        let other = provider.sign_in("Bruno").unwrap();

        assert_eq!(first, again);
        assert_ne!(first.uid, other.uid);
        assert_eq!(provider.current().unwrap(), Some(other));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_sign_out_clears_current() {
        let dir = temp_dir();
        let provider = LocalIdentityProvider::new(Some(dir.clone())).unwrap();
        provider.sign_in("Ana").unwrap();

        provider.sign_out().unwrap();

        assert_eq!(provider.current().unwrap(), None);
        // uid survives sign-out
        let reopened = LocalIdentityProvider::new(Some(dir.clone())).unwrap();
        assert_eq!(reopened.read().unwrap().users.len(), 1);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_empty_name_rejected() {
        let dir = temp_dir();
        let provider = LocalIdentityProvider::new(Some(dir.clone())).unwrap();
        assert!(provider.sign_in("   ").is_err());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_unusable_data_dir_names_the_path() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not-a-dir");
        File::create(&blocker).unwrap();

        let err = LocalIdentityProvider::new(Some(blocker.clone())).err().unwrap();

        assert!(format!("{:#}", err).contains(&blocker.display().to_string()));
        fs::remove_dir_all(dir).unwrap();
    }
}
