//! 外部協作服務介面
//!
//! 目錄服務、規則設定與通知都透過 trait 注入，方便以測試替身取代。

use crate::error::ServiceResult;
use serde::{Deserialize, Serialize};

/// 目錄服務中的資料夾
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

/// 目的地規則：規則鍵對應到歸檔資料夾 id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationRule {
    pub key: String,
    pub destination_id: String,
}

impl DestinationRule {
    pub fn new(key: impl Into<String>, destination_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            destination_id: destination_id.into(),
        }
    }
}

/// 鎖定資料夾相關設定
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockSettings {
    /// 可以解鎖的 email（已轉小寫）
    pub permitted_emails: Vec<String>,
    /// 解鎖後要通知的 email
    pub notify_emails: Vec<String>,
    /// 所有鎖定根資料夾的 id
    pub locked_root_ids: Vec<String>,
}

impl LockSettings {
    /// 檢查 email 是否在允許清單中（不分大小寫）
    #[must_use]
    pub fn is_permitted(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        !email.is_empty() && self.permitted_emails.iter().any(|p| *p == email)
    }
}

/// 一封通知信
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub recipients: Vec<String>,
    pub sender_name: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

pub trait DirectoryService {
    /// 列出資料夾底下的直接子資料夾
    fn child_folders(&self, parent_id: &str) -> ServiceResult<Vec<Folder>>;

    fn folder(&self, id: &str) -> ServiceResult<Folder>;

    /// 取得所有上層資料夾，根資料夾回傳空清單
    fn parents(&self, folder: &Folder) -> ServiceResult<Vec<Folder>>;

    /// 重新命名並回傳更新後的資料夾
    fn rename(&self, folder: &Folder, new_name: &str) -> ServiceResult<Folder>;

    /// 移動到新的上層資料夾並回傳更新後的資料夾
    fn move_to(&self, folder: &Folder, destination: &Folder) -> ServiceResult<Folder>;

    /// 資料夾連結，id 無法對應到資料夾時回傳錯誤
    fn url(&self, folder: &Folder) -> ServiceResult<String>;
}

pub trait ConfigStore {
    /// 目的地規則表，依原始順序
    fn destination_rules(&self) -> ServiceResult<Vec<DestinationRule>>;

    fn lock_settings(&self) -> ServiceResult<LockSettings>;
}

pub trait Notifier {
    fn send(&self, notification: &Notification) -> ServiceResult<()>;
}

/// 將以逗號分隔的 email 字串拆成清單
#[must_use]
pub fn split_emails(raw: &str) -> Vec<String> {
    raw.split([',', ';'])
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
