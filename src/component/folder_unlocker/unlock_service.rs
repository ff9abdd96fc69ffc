//! 解鎖服務
//!
//! 串接目錄服務、規則設定與通知：列出鎖定專案，以及把資料夾搬回歸檔位置。

use super::destination_resolver::{derive_rule_key, lookup};
use super::lock_annotation::{lock_reason, strip_lock_annotation};
use super::locked_projects::{LockedProject, LockedProjectList};
use super::notification::unlock_notification;
use super::relocator::relocate;
use crate::config::UserSettings;
use crate::error::{RelocationError, ServiceResult};
use crate::tools::{
    ConfigStore, DirectoryService, Folder, JsonWorkbook, LocalDirectory, LockSettings, MailOutbox,
    Notifier, validate_file_exists,
};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 解鎖結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockOutcome {
    pub url: String,
    /// 解鎖前的原始名稱
    pub original_name: String,
    pub folder: Folder,
}

/// 已移除註記、但搬移失敗的資料夾
#[derive(Debug, Clone)]
struct PendingMove {
    folder_id: String,
    original_name: String,
}

pub type LocalUnlockService = UnlockService<LocalDirectory, JsonWorkbook, MailOutbox>;

pub struct UnlockService<D, C, N> {
    directory: D,
    config_store: C,
    notifier: N,
    session_email: Option<String>,
    shutdown_signal: Arc<AtomicBool>,
    /// 清單上的 id -> 改名後的資料夾，重新解鎖時沿用
    pending_moves: RefCell<HashMap<String, PendingMove>>,
}

impl<D, C, N> UnlockService<D, C, N>
where
    D: DirectoryService,
    C: ConfigStore,
    N: Notifier,
{
    pub fn new(directory: D, config_store: C, notifier: N, session_email: Option<String>) -> Self {
        Self {
            directory,
            config_store,
            notifier,
            session_email,
            shutdown_signal: Arc::new(AtomicBool::new(false)),
            pending_moves: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: Arc<AtomicBool>) -> Self {
        self.shutdown_signal = shutdown_signal;
        self
    }

    pub fn session_email(&self) -> Option<&str> {
        self.session_email.as_deref()
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    fn has_permission(&self, settings: &LockSettings) -> bool {
        self.session_email
            .as_deref()
            .is_some_and(|email| settings.is_permitted(email))
    }

    /// 列出所有鎖定根資料夾底下的專案，並回報目前使用者能否解鎖
    pub fn list_locked_projects(&self) -> ServiceResult<LockedProjectList> {
        let settings = self.config_store.lock_settings()?;
        let has_permission = self.has_permission(&settings);

        let mut projects = Vec::new();
        for root_id in &settings.locked_root_ids {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止讀取鎖定資料夾");
                break;
            }

            let children = self.directory.child_folders(root_id)?;
            debug!("{root_id}: {} 個專案", children.len());
            projects.extend(children.iter().map(LockedProject::from_folder));
        }

        info!(
            "讀取到 {} 個鎖定專案 (可解鎖: {has_permission})",
            projects.len()
        );
        Ok(LockedProjectList::new(has_permission, projects))
    }

    /// 解鎖資料夾：解析目的地、移除鎖定註記、搬移並通知
    ///
    /// 移除註記後搬移失敗時，以同一個 id 再呼叫一次即可完成搬移。
    pub fn unlock(&self, folder_id: &str) -> Result<UnlockOutcome, RelocationError> {
        let settings = self.config_store.lock_settings()?;
        if !self.has_permission(&settings) {
            return Err(match self.session_email.clone() {
                Some(email) => {
                    warn!("拒絕解鎖 {folder_id}: {email} 不在允許清單中");
                    RelocationError::PermissionDenied { email }
                }
                None => {
                    warn!("拒絕解鎖 {folder_id}: 未設定操作者 email");
                    RelocationError::MissingSessionEmail
                }
            });
        }
        let email = self.session_email.clone().unwrap_or_default();

        let pending = self.pending_moves.borrow().get(folder_id).cloned();
        let (folder, original_name) = match pending {
            Some(pending) => {
                debug!("沿用改名後的資料夾 {} -> {}", folder_id, pending.folder_id);
                let folder = self.directory.folder(&pending.folder_id)?;
                (folder, pending.original_name)
            }
            None => {
                let folder = self.directory.folder(folder_id)?;
                let original_name = folder.name.clone();
                (folder, original_name)
            }
        };
        let destination = self.resolve_destination(&folder)?;

        let relocation = match relocate(&folder, &destination, &self.directory) {
            Ok(relocation) => relocation,
            Err(e) => {
                self.remember_rename(folder_id, &folder, &original_name);
                return Err(e.into());
            }
        };
        self.pending_moves.borrow_mut().remove(folder_id);

        match lock_reason(&original_name) {
            Some(reason) => info!(
                "{email} 解鎖資料夾 {original_name} ({reason}) -> {}",
                destination.name
            ),
            None => info!("{email} 解鎖資料夾 {original_name} -> {}", destination.name),
        }

        if !settings.notify_emails.is_empty() {
            let notification = unlock_notification(
                &settings.notify_emails,
                &original_name,
                &relocation.url,
                &email,
            );
            // 通知失敗不影響解鎖結果
            if let Err(e) = self.notifier.send(&notification) {
                warn!("解鎖通知寄送失敗: {e}");
            }
        }

        Ok(UnlockOutcome {
            url: relocation.url,
            original_name,
            folder: relocation.folder,
        })
    }

    /// 搬移失敗後，找出已移除註記的資料夾並記下它的新 id
    fn remember_rename(&self, listed_id: &str, folder: &Folder, original_name: &str) {
        let Some(clean_name) = strip_lock_annotation(&folder.name) else {
            return;
        };
        // id 不隨改名變動，或改名本身就失敗
        if self.directory.folder(&folder.id).is_ok() {
            return;
        }
        let Some(parent_id) = folder.parent_id.as_deref() else {
            return;
        };

        match self.directory.child_folders(parent_id) {
            Ok(children) => {
                if let Some(renamed) = children.into_iter().find(|c| c.name == clean_name) {
                    info!("資料夾已改名但尚未搬移: {} -> {}", folder.id, renamed.id);
                    self.pending_moves.borrow_mut().insert(
                        listed_id.to_string(),
                        PendingMove {
                            folder_id: renamed.id,
                            original_name: original_name.to_string(),
                        },
                    );
                }
            }
            Err(e) => warn!("無法讀取 {parent_id} 底下的資料夾: {e}"),
        }
    }

    fn resolve_destination(&self, folder: &Folder) -> Result<Folder, RelocationError> {
        let parents = self.directory.parents(folder)?;
        let parent_name = parents.first().map(|p| p.name.as_str());
        let rules = self.config_store.destination_rules()?;

        let not_found = || RelocationError::DestinationNotFound {
            folder: folder.name.clone(),
        };

        let key = derive_rule_key(&folder.name, parent_name).map_err(|e| {
            warn!("無法推導規則鍵: {e}");
            not_found()
        })?;

        let destination_id = lookup(&key, &rules).ok_or_else(|| {
            warn!("找不到規則 {key} ({})", folder.name);
            not_found()
        })?;
        debug!("規則 {key} -> {destination_id}");

        Ok(self.directory.folder(destination_id)?)
    }
}

impl LocalUnlockService {
    /// 依使用者設定建立本機檔案系統版本的服務
    pub fn from_settings(settings: &UserSettings) -> anyhow::Result<Self> {
        validate_file_exists(&settings.workbook_path)?;

        let directory =
            LocalDirectory::open(&settings.storage_root, settings.folder_url_base.clone())?;
        let workbook = JsonWorkbook::new(&settings.workbook_path);
        let outbox = MailOutbox::new(&settings.outbox_path);

        Ok(Self::new(directory, workbook, outbox, settings.user_email.clone()))
    }
}
