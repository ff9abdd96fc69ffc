//! 核心錯誤型別
//!
//! 外部服務（目錄、設定、通知）的錯誤統一為 `ServiceError`，
//! 解鎖流程的錯誤為 `RelocationError`。

use thiserror::Error;

/// 外部服務錯誤，原樣往上傳遞，不重試
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Invalid folder id: {0}")]
    InvalidFolderId(String),

    #[error("Folder already exists: {0}")]
    AlreadyExists(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ServiceError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// 目的地規則鍵無法推導的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Folder name has no year-code prefix: {0}")]
    MalformedName(String),

    #[error("Folder has no parent: {0}")]
    MissingParent(String),
}

#[derive(Error, Debug)]
pub enum RelocationError {
    #[error("Destination folder for \"{folder}\" is not configured. Please contact an administrator.")]
    DestinationNotFound { folder: String },

    #[error("{email} is not permitted to unlock folders")]
    PermissionDenied { email: String },

    #[error("No operator email is configured; set one in Settings before unlocking folders")]
    MissingSessionEmail,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
