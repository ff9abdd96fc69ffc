//! 鎖定資料夾解鎖元件
//!
//! 列出所有鎖定根資料夾底下的專案，並讓有權限的使用者把專案搬回歸檔資料夾

mod destination_resolver;
mod lock_annotation;
mod locked_projects;
mod main;
mod notification;
mod relocator;
mod unlock_service;

pub use destination_resolver::{
    REGION_SPLIT_YEAR_CODE, derive_rule_key, lookup, resolve, year_code,
};
pub use lock_annotation::{lock_reason, strip_lock_annotation};
pub use locked_projects::{LockedProject, LockedProjectList};
pub use main::FolderUnlocker;
pub use notification::unlock_notification;
pub use relocator::{Relocation, relocate};
pub use unlock_service::{LocalUnlockService, UnlockOutcome, UnlockService};
