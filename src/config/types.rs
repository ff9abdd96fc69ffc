use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 使用者設定，存放於工作目錄下的 settings.json
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    /// 規則試算表（JSON workbook）路徑
    pub workbook_path: PathBuf,
    /// 資料夾儲存根目錄，所有 folder id 都相對於此
    pub storage_root: PathBuf,
    /// 通知信件輸出檔（JSON lines）
    pub outbox_path: PathBuf,
    /// 設定時，資料夾連結為 `folder_url_base + id`
    pub folder_url_base: Option<String>,
    /// 目前操作者的 email
    pub user_email: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            language: Language::default(),
            workbook_path: PathBuf::from("rules.json"),
            storage_root: PathBuf::from("drive"),
            outbox_path: PathBuf::from("outbox.jsonl"),
            folder_url_base: None,
            user_email: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// 套用環境變數覆寫後的設定
    pub settings: UserSettings,
    /// settings.json 的內容，寫回檔案時只寫這份
    pub saved: UserSettings,
}
