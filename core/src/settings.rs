use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "marmita";
const ENV_PREFIX: &str = "MARMITA";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub log_level: String,
    pub currency_symbol: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            currency_symbol: "R$".to_string(),
        }
    }
}

impl Settings {
    /// Sources, later ones winning: `~/.marmita/marmita.toml`,
    /// `./marmita.toml`, then `MARMITA_*` environment variables.
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Ok(dir) = default_data_dir() {
            builder = builder
                .add_source(config::File::from(dir.join(format!("{}.toml", CONFIG_FILE_NAME))).required(false));
        }
        builder
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Could not read settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        config::Config::builder()
            .add_source(config::File::from(path.to_path_buf()))
            .build()
            .with_context(|| format!("Could not read settings from {}", path.display()))?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".marmita"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.currency_symbol, "R$");
        assert!(settings.data_dir.is_none());
    }

    #[test]
    fn test_load_from_file_keeps_missing_defaults() {
        let dir = std::env::temp_dir().join(format!("marmita-settings-{}", Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("marmita.toml");
        fs::write(&file, "data_dir = \"/tmp/marmita-data\"\nlog_level = \"debug\"\n").unwrap();

        let settings = Settings::load_from(&file).unwrap();

        assert_eq!(settings.data_dir, Some(PathBuf::from("/tmp/marmita-data")));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.currency_symbol, "R$");
        assert_eq!(settings.data_dir().unwrap(), PathBuf::from("/tmp/marmita-data"));
        fs::remove_dir_all(dir).unwrap();
    }
}
