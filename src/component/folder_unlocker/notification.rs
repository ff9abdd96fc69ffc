use crate::tools::Notification;

pub const SENDER_NAME: &str = "Locked folders notification";
pub const SUBJECT: &str = "Locked folder has been unlocked.";

/// 建立解鎖通知，`folder_name` 為解鎖前的原始名稱
#[must_use]
pub fn unlock_notification(
    recipients: &[String],
    folder_name: &str,
    folder_url: &str,
    unlocked_by: &str,
) -> Notification {
    Notification {
        recipients: recipients.to_vec(),
        sender_name: SENDER_NAME.to_string(),
        subject: SUBJECT.to_string(),
        text_body: format!("Unlocked {folder_name}. Url: {folder_url} by {unlocked_by}"),
        html_body: format!(
            r#"Unlocked <a href="{}" target="_blank">{}</a>. by {}"#,
            escape_html(folder_url),
            escape_html(folder_name),
            escape_html(unlocked_by)
        ),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
