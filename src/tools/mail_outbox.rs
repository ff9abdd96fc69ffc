use crate::error::{ServiceError, ServiceResult};
use crate::tools::backend::{Notification, Notifier};
use log::info;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 將通知信以 JSON lines 寫入 outbox 檔，由外部寄信程式取走
pub struct MailOutbox {
    path: PathBuf,
}

impl MailOutbox {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Notifier for MailOutbox {
    fn send(&self, notification: &Notification) -> ServiceResult<()> {
        let path_text = self.path.display().to_string();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ServiceError::io(&path_text, e))?;
        }

        let mut line = serde_json::to_string(notification)
            .map_err(|e| ServiceError::Config(format!("無法序列化通知: {e}")))?;
        line.push('\n');

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(|e| ServiceError::io(&path_text, e))?;

        info!(
            "通知已寫入 outbox: {} ({} 位收件人)",
            notification.subject,
            notification.recipients.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(subject: &str) -> Notification {
        Notification {
            recipients: vec!["it@example.com".to_string()],
            sender_name: "sender".to_string(),
            subject: subject.to_string(),
            text_body: "text".to_string(),
            html_body: "<b>html</b>".to_string(),
        }
    }

    #[test]
    fn test_send_appends_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mail/outbox.jsonl");
        let outbox = MailOutbox::new(&path);

        outbox.send(&sample("first")).unwrap();
        outbox.send(&sample("second")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<Notification> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines, vec![sample("first"), sample("second")]);
    }
}
