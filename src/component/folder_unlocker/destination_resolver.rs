//! 目的地解析
//!
//! 依資料夾名稱的年份代碼（以及 2023 年後的上層資料夾名稱）推導規則鍵，
//! 再到規則表中找出歸檔資料夾 id。

use crate::error::ResolveError;
use crate::tools::DestinationRule;

/// 年份代碼大於此值時，目的地再依上層資料夾（地區）區分
pub const REGION_SPLIT_YEAR_CODE: i64 = 22;

/// 共用合併目的地的舊年份代碼
const MERGED_LEGACY_YEAR_CODES: [&str; 2] = ["18", "20"];

/// 取出名稱中第一個 `-` 之前的年份代碼
pub fn year_code(folder_name: &str) -> Result<&str, ResolveError> {
    folder_name
        .split_once('-')
        .map(|(token, _)| token)
        .ok_or_else(|| ResolveError::MalformedName(folder_name.to_string()))
}

/// 寬鬆整數解析：略過前導空白，讀取開頭的數字，沒有數字時回傳 None
fn parse_leading_int(token: &str) -> Option<i64> {
    let trimmed = token.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;

    Some(if negative { -value } else { value })
}

/// 推導規則鍵
///
/// * 年份代碼 > 22：`20{yy}-{上層資料夾名稱}`，沒有上層資料夾時失敗
/// * `18`、`20`：`20{yy}-1`
/// * 其餘：`20{yy}`
pub fn derive_rule_key(
    folder_name: &str,
    parent_name: Option<&str>,
) -> Result<String, ResolveError> {
    let token = year_code(folder_name)?;

    let region_split = parse_leading_int(token).is_some_and(|year| year > REGION_SPLIT_YEAR_CODE);

    if region_split {
        let parent_name =
            parent_name.ok_or_else(|| ResolveError::MissingParent(folder_name.to_string()))?;
        return Ok(format!("20{token}-{parent_name}"));
    }

    if MERGED_LEGACY_YEAR_CODES.contains(&token) {
        Ok(format!("20{token}-1"))
    } else {
        Ok(format!("20{token}"))
    }
}

/// 以去除前後空白後的規則鍵完全比對，第一筆符合者勝出
pub fn lookup<'a>(key: &str, rules: &'a [DestinationRule]) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.key.trim() == key)
        .map(|rule| rule.destination_id.as_str())
}

/// 解析資料夾的目的地 id，名稱格式錯誤、缺少上層資料夾或找不到規則時回傳 None
pub fn resolve<'a>(
    folder_name: &str,
    parent_name: Option<&str>,
    rules: &'a [DestinationRule],
) -> Option<&'a str> {
    let key = derive_rule_key(folder_name, parent_name).ok()?;
    lookup(&key, rules)
}
