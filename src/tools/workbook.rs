//! JSON 試算表設定來源
//!
//! 格式為「工作表名稱 → 列 → 儲存格」，儲存格可以是字串、數字、布林或 null。
//! 讀取時一次轉換成型別化的紀錄，其他模組不直接碰欄位索引。

use crate::error::{ServiceError, ServiceResult};
use crate::tools::backend::{ConfigStore, DestinationRule, LockSettings, split_emails};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCK_SHEET: &str = "Lock Folder";
pub const DESTINATION_SHEET: &str = "J Folder";

/// Lock Folder 第一列：F 欄為允許解鎖的 email
const PERMITTED_EMAILS_COLUMN: usize = 5;
/// Lock Folder 第一列：H 欄為通知對象 email
const NOTIFY_EMAILS_COLUMN: usize = 7;
/// Lock Folder 其餘列：B 欄為鎖定根資料夾 id
const LOCKED_ROOT_COLUMN: usize = 1;

type Sheet = Vec<Vec<Value>>;

pub struct JsonWorkbook {
    path: PathBuf,
}

impl JsonWorkbook {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// 每次呼叫都重新讀取整份檔案
    fn load_sheet(&self, name: &str) -> ServiceResult<Sheet> {
        let content = fs::read_to_string(&self.path)
            .map_err(|e| ServiceError::io(self.path.display().to_string(), e))?;

        let mut sheets: HashMap<String, Sheet> = serde_json::from_str(&content).map_err(|e| {
            ServiceError::Config(format!("無法解析 workbook {}: {e}", self.path.display()))
        })?;

        sheets
            .remove(name)
            .ok_or_else(|| ServiceError::Config(format!("workbook 缺少工作表: {name}")))
    }
}

impl ConfigStore for JsonWorkbook {
    fn destination_rules(&self) -> ServiceResult<Vec<DestinationRule>> {
        let rows = self.load_sheet(DESTINATION_SHEET)?;
        let rules = decode_destination_rules(&rows);
        debug!("讀取到 {} 筆目的地規則", rules.len());
        Ok(rules)
    }

    fn lock_settings(&self) -> ServiceResult<LockSettings> {
        let rows = self.load_sheet(LOCK_SHEET)?;
        Ok(decode_lock_settings(&rows))
    }
}

fn decode_destination_rules(rows: &[Vec<Value>]) -> Vec<DestinationRule> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| {
            if row.len() < 2 {
                warn!("{DESTINATION_SHEET} 第 {} 列欄位不足，已略過", index + 1);
                return None;
            }
            Some(DestinationRule::new(
                cell_text(&row[0]),
                cell_text(&row[1]).trim(),
            ))
        })
        .collect()
}

fn decode_lock_settings(rows: &[Vec<Value>]) -> LockSettings {
    let Some((header, rest)) = rows.split_first() else {
        return LockSettings::default();
    };

    let header_cell = |column: usize| header.get(column).map(cell_text).unwrap_or_default();

    let locked_root_ids = rest
        .iter()
        .filter_map(|row| row.get(LOCKED_ROOT_COLUMN))
        .map(|cell| cell_text(cell).trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    LockSettings {
        permitted_emails: split_emails(&header_cell(PERMITTED_EMAILS_COLUMN)),
        notify_emails: split_emails(&header_cell(NOTIFY_EMAILS_COLUMN)),
        locked_root_ids,
    }
}

/// 將儲存格轉為字串，數字保留原本的表示法
fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
