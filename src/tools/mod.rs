mod backend;
mod local_directory;
mod mail_outbox;
mod path_validator;
mod workbook;

pub use backend::{
    ConfigStore, DestinationRule, DirectoryService, Folder, LockSettings, Notification, Notifier,
    split_emails,
};
pub use local_directory::LocalDirectory;
pub use mail_outbox::MailOutbox;
pub use path_validator::{validate_directory_exists, validate_file_exists};
pub use workbook::{DESTINATION_SHEET, JsonWorkbook, LOCK_SHEET};
