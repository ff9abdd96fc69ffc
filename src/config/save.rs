use crate::config::load::SETTINGS_FILE;
use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings_to(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

impl Config {
    /// 修改設定並寫回 settings.json
    pub fn update<F>(&mut self, edit: F) -> Result<()>
    where
        F: Fn(&mut UserSettings),
    {
        self.update_at(Path::new(SETTINGS_FILE), edit)
    }

    /// 同時修改執行中與檔案中的設定，只把檔案那份寫回 `path`，
    /// 環境變數覆寫的值不會被寫入
    pub fn update_at<F>(&mut self, path: &Path, edit: F) -> Result<()>
    where
        F: Fn(&mut UserSettings),
    {
        edit(&mut self.settings);
        edit(&mut self.saved);
        save_settings_to(&self.saved, path)
    }
}

/// 更新操作者 email，空白輸入視為清除
pub fn set_user_email(settings: &mut UserSettings, email: &str) {
    let email = email.trim();
    settings.user_email = if email.is_empty() {
        None
    } else {
        Some(email.to_string())
    };
}
