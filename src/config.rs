use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database_path: Option<PathBuf>,
    pub join_window: String,
    pub log_level: String,
    pub friend_recipient_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            join_window: "24h".to_string(),
            log_level: "info".to_string(),
            friend_recipient_id: None,
        }
    }
}

impl Config {
    pub fn database_path(&self, base_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| base_dir.join("db.json"))
    }
}

pub fn get_base_dir() -> Result<PathBuf> {
    let mut path =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not find home directory"))?;
    path.push(".fast-together");
    if !path.exists() {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

pub fn load_config(base_dir: &Path) -> Result<Config> {
    let path = base_dir.join("config.json");

    if !path.exists() {
        let config = Config::default();
        let data = serde_json::to_string_pretty(&config)?;
        fs::write(&path, data)?;
        return Ok(config);
    }

    let data = fs::read_to_string(&path)?;
    let config = serde_json::from_str(&data)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_writes_defaults() -> Result<()> {
        let dir = tempdir()?;

        let config = load_config(dir.path())?;
        assert_eq!(config, Config::default());
        assert!(dir.path().join("config.json").exists());
        assert_eq!(config.database_path(dir.path()), dir.path().join("db.json"));

        Ok(())
    }

    #[test]
    fn test_load_config_partial_file() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("config.json"),
            r#"{ "join_window": "12h", "friend_recipient_id": "u1" }"#,
        )?;

        let config = load_config(dir.path())?;
        assert_eq!(config.join_window, "12h");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.friend_recipient_id.as_deref(), Some("u1"));

        Ok(())
    }
}
