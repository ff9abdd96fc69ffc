use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

pub const ENV_WORKBOOK: &str = "LOCKED_FOLDER_WORKBOOK";
pub const ENV_STORAGE_ROOT: &str = "LOCKED_FOLDER_ROOT";
pub const ENV_OUTBOX: &str = "LOCKED_FOLDER_OUTBOX";
pub const ENV_URL_BASE: &str = "LOCKED_FOLDER_URL_BASE";
pub const ENV_USER: &str = "LOCKED_FOLDER_USER";

impl Config {
    pub fn new() -> Result<Self> {
        Self::load(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
    }

    /// 讀取設定檔並套用覆寫；覆寫只存在於執行中的設定
    pub fn load<F>(path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let saved = Self::load_settings(path)?;
        let mut settings = saved.clone();
        apply_overrides(&mut settings, lookup);

        Ok(Self { settings, saved })
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

/// 以環境變數覆寫設定值，空字串視為未設定
pub fn apply_overrides<F>(settings: &mut UserSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = lookup(ENV_WORKBOOK) {
        debug!("{ENV_WORKBOOK} 覆寫 workbook 路徑: {v}");
        settings.workbook_path = PathBuf::from(v);
    }
    if let Some(v) = lookup(ENV_STORAGE_ROOT) {
        debug!("{ENV_STORAGE_ROOT} 覆寫儲存根目錄: {v}");
        settings.storage_root = PathBuf::from(v);
    }
    if let Some(v) = lookup(ENV_OUTBOX) {
        settings.outbox_path = PathBuf::from(v);
    }
    if let Some(v) = lookup(ENV_URL_BASE) {
        settings.folder_url_base = Some(v);
    }
    if let Some(v) = lookup(ENV_USER) {
        settings.user_email = Some(v.trim().to_string());
    }
}
