//! 資料夾搬移
//!
//! 先移除鎖定註記（需要時），再把資料夾搬到目的地資料夾底下。

use super::lock_annotation::strip_lock_annotation;
use crate::error::ServiceResult;
use crate::tools::{DirectoryService, Folder};
use log::{debug, info};

/// 搬移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub folder: Folder,
    pub url: String,
    pub renamed: bool,
}

/// 將資料夾搬到 `destination` 底下並回傳新的連結
///
/// 重新命名成功但搬移失敗時，資料夾會停在已改名、未搬移的狀態；
/// 再執行一次會略過重新命名並完成搬移。
pub fn relocate<D: DirectoryService + ?Sized>(
    folder: &Folder,
    destination: &Folder,
    directory: &D,
) -> ServiceResult<Relocation> {
    let (folder, renamed) = match strip_lock_annotation(&folder.name) {
        Some(clean_name) => {
            debug!("移除鎖定註記: {} -> {}", folder.name, clean_name);
            (directory.rename(folder, &clean_name)?, true)
        }
        None => (folder.clone(), false),
    };

    let moved = directory.move_to(&folder, destination)?;
    let url = directory.url(&moved)?;
    info!("資料夾已搬移到 {}: {}", destination.name, moved.name);

    Ok(Relocation {
        folder: moved,
        url,
        renamed,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    /// 記錄操作次數的記憶體目錄服務
    #[derive(Default)]
    pub(crate) struct MemoryDirectory {
        pub folders: RefCell<BTreeMap<String, Folder>>,
        pub renames: Cell<usize>,
        pub moves: Cell<usize>,
        pub fail_moves: Cell<bool>,
    }

    impl MemoryDirectory {
        pub fn add(&self, id: &str, name: &str, parent_id: Option<&str>) -> Folder {
            let folder = Folder {
                id: id.to_string(),
                name: name.to_string(),
                parent_id: parent_id.map(str::to_string),
            };
            self.folders
                .borrow_mut()
                .insert(id.to_string(), folder.clone());
            folder
        }
    }

    impl DirectoryService for MemoryDirectory {
        fn child_folders(&self, parent_id: &str) -> ServiceResult<Vec<Folder>> {
            Ok(self
                .folders
                .borrow()
                .values()
                .filter(|f| f.parent_id.as_deref() == Some(parent_id))
                .cloned()
                .collect())
        }

        fn folder(&self, id: &str) -> ServiceResult<Folder> {
            self.folders
                .borrow()
                .get(id)
                .cloned()
                .ok_or_else(|| ServiceError::FolderNotFound(id.to_string()))
        }

        fn parents(&self, folder: &Folder) -> ServiceResult<Vec<Folder>> {
            match &folder.parent_id {
                Some(parent_id) => Ok(vec![self.folder(parent_id)?]),
                None => Ok(Vec::new()),
            }
        }

        fn rename(&self, folder: &Folder, new_name: &str) -> ServiceResult<Folder> {
            self.renames.set(self.renames.get() + 1);
            let mut folders = self.folders.borrow_mut();
            let entry = folders
                .get_mut(&folder.id)
                .ok_or_else(|| ServiceError::FolderNotFound(folder.id.clone()))?;
            entry.name = new_name.to_string();
            Ok(entry.clone())
        }

        fn move_to(&self, folder: &Folder, destination: &Folder) -> ServiceResult<Folder> {
            if self.fail_moves.get() {
                return Err(ServiceError::Config("move rejected".to_string()));
            }
            self.moves.set(self.moves.get() + 1);
            let mut folders = self.folders.borrow_mut();
            let entry = folders
                .get_mut(&folder.id)
                .ok_or_else(|| ServiceError::FolderNotFound(folder.id.clone()))?;
            entry.parent_id = Some(destination.id.clone());
            Ok(entry.clone())
        }

        fn url(&self, folder: &Folder) -> ServiceResult<String> {
            Ok(format!("https://files.example.com/{}", folder.id))
        }
    }

    #[test]
    fn test_relocate_strips_annotation_and_moves() {
        let directory = MemoryDirectory::default();
        directory.add("apac", "APAC", None);
        let destination = directory.add("d1", "2023-APAC", None);
        let folder = directory.add("f1", "23-Alpha {{pqp}}", Some("apac"));

        let result = relocate(&folder, &destination, &directory).unwrap();

        assert!(result.renamed);
        assert_eq!(result.folder.name, "23-Alpha");
        assert_eq!(result.folder.parent_id.as_deref(), Some("d1"));
        assert_eq!(result.url, "https://files.example.com/f1");
        assert_eq!(directory.renames.get(), 1);
        assert_eq!(directory.moves.get(), 1);
    }

    #[test]
    fn test_relocate_clean_name_never_renames() {
        let directory = MemoryDirectory::default();
        let first = directory.add("d1", "2019", None);
        let second = directory.add("d2", "2019-b", None);
        let folder = directory.add("f1", "19-Clean", Some("locked"));

        let moved = relocate(&folder, &first, &directory).unwrap();
        assert!(!moved.renamed);
        relocate(&moved.folder, &second, &directory).unwrap();

        assert_eq!(directory.renames.get(), 0);
        assert_eq!(directory.moves.get(), 2);
    }

    #[test]
    fn test_failed_move_leaves_renamed_folder_and_retry_completes() {
        let directory = MemoryDirectory::default();
        let destination = directory.add("d1", "2023-APAC", None);
        let folder = directory.add("f1", "23-Alpha {{dr}}", Some("apac"));

        directory.fail_moves.set(true);
        assert!(relocate(&folder, &destination, &directory).is_err());

        let stranded = directory.folder("f1").unwrap();
        assert_eq!(stranded.name, "23-Alpha");
        assert_eq!(stranded.parent_id.as_deref(), Some("apac"));

        directory.fail_moves.set(false);
        let result = relocate(&stranded, &destination, &directory).unwrap();
        assert!(!result.renamed);
        assert_eq!(result.folder.parent_id.as_deref(), Some("d1"));
        assert_eq!(directory.renames.get(), 1);
    }
}
