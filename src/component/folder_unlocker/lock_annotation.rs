//! 鎖定註記處理
//!
//! 因 Design Review 或 PQP 鎖定的資料夾，名稱結尾會帶有 `{{原因}}`，
//! 解鎖時要移除註記還原成原本的名稱。

use regex::Regex;
use std::sync::LazyLock;

/// 判斷是否帶有註記：`{{` 與 `}}` 之間至少一個非 `}` 字元
static REGEX_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("Invalid regex"));

/// 要移除的部分：註記本身連同前面的空白
static REGEX_ANNOTATION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{\{.*\}\}").expect("Invalid regex"));

/// 取出鎖定原因，沒有註記時回傳 None
#[must_use]
pub fn lock_reason(folder_name: &str) -> Option<&str> {
    REGEX_ANNOTATION
        .captures(folder_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 移除註記後的名稱；名稱沒有註記時回傳 None，代表不需要重新命名
#[must_use]
pub fn strip_lock_annotation(folder_name: &str) -> Option<String> {
    if !REGEX_ANNOTATION.is_match(folder_name) {
        return None;
    }

    let cut = REGEX_ANNOTATION_SUFFIX
        .find(folder_name)
        .map_or(folder_name.len(), |m| m.start());

    Some(folder_name[..cut].to_string())
}
