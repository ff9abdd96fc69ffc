//! 以本機檔案系統實作的目錄服務
//!
//! 資料夾 id 為相對於儲存根目錄、以 `/` 分隔的路徑，根目錄本身的 id 為空字串。

use crate::error::{ServiceError, ServiceResult};
use crate::tools::backend::{DirectoryService, Folder};
use crate::tools::validate_directory_exists;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

pub struct LocalDirectory {
    root: PathBuf,
    url_base: Option<String>,
}

impl LocalDirectory {
    pub fn open(root: &Path, url_base: Option<String>) -> Result<Self> {
        validate_directory_exists(root)?;
        let root = root
            .canonicalize()
            .with_context(|| format!("無法解析儲存根目錄: {}", root.display()))?;

        Ok(Self { root, url_base })
    }

    /// 將 folder id 轉為實際路徑，拒絕跳出根目錄的 id
    fn resolve_path(&self, id: &str) -> ServiceResult<PathBuf> {
        if id.is_empty() {
            return Ok(self.root.clone());
        }

        let mut path = self.root.clone();
        for segment in id.split('/') {
            let mut components = Path::new(segment).components();
            match (components.next(), components.next()) {
                (Some(Component::Normal(part)), None) => path.push(part),
                _ => return Err(ServiceError::InvalidFolderId(id.to_string())),
            }
        }
        Ok(path)
    }

    fn folder_at(&self, id: &str) -> ServiceResult<Folder> {
        let path = self.resolve_path(id)?;
        if !path.is_dir() {
            return Err(ServiceError::FolderNotFound(id.to_string()));
        }

        let (name, parent_id) = match id.rsplit_once('/') {
            Some((parent, name)) => (name.to_string(), Some(parent.to_string())),
            None if id.is_empty() => (root_name(&self.root), None),
            None => (id.to_string(), Some(String::new())),
        };

        Ok(Folder {
            id: id.to_string(),
            name,
            parent_id,
        })
    }

    /// 將資料夾搬到 `target_parent` 底下並命名為 `name`，目標已存在時拒絕
    fn relink(&self, folder: &Folder, target_parent: &str, name: &str) -> ServiceResult<Folder> {
        let source = self.resolve_path(&folder.id)?;
        if !source.is_dir() {
            return Err(ServiceError::FolderNotFound(folder.id.clone()));
        }

        let target_id = join_id(target_parent, name);
        let target = self.resolve_path(&target_id)?;
        if target.exists() {
            return Err(ServiceError::AlreadyExists(target_id));
        }

        fs::rename(&source, &target).map_err(|e| ServiceError::io(&folder.id, e))?;
        debug!("資料夾已搬移: {} -> {}", source.display(), target.display());

        Ok(Folder {
            id: target_id,
            name: name.to_string(),
            parent_id: Some(target_parent.to_string()),
        })
    }
}

impl DirectoryService for LocalDirectory {
    fn child_folders(&self, parent_id: &str) -> ServiceResult<Vec<Folder>> {
        let parent = self.folder_at(parent_id)?;
        let path = self.resolve_path(&parent.id)?;

        let mut folders = Vec::new();
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                ServiceError::io(
                    parent_id,
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
                )
            })?;
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            folders.push(Folder {
                id: join_id(&parent.id, &name),
                name,
                parent_id: Some(parent.id.clone()),
            });
        }

        Ok(folders)
    }

    fn folder(&self, id: &str) -> ServiceResult<Folder> {
        self.folder_at(id)
    }

    fn parents(&self, folder: &Folder) -> ServiceResult<Vec<Folder>> {
        match &folder.parent_id {
            Some(parent_id) => Ok(vec![self.folder_at(parent_id)?]),
            None => Ok(Vec::new()),
        }
    }

    fn rename(&self, folder: &Folder, new_name: &str) -> ServiceResult<Folder> {
        let parent_id = folder.parent_id.clone().unwrap_or_default();
        let renamed = self.relink(folder, &parent_id, new_name)?;
        info!("重新命名資料夾: {} -> {}", folder.name, renamed.name);
        Ok(renamed)
    }

    fn move_to(&self, folder: &Folder, destination: &Folder) -> ServiceResult<Folder> {
        let moved = self.relink(folder, &destination.id, &folder.name)?;
        info!("移動資料夾: {} -> {}", folder.id, moved.id);
        Ok(moved)
    }

    fn url(&self, folder: &Folder) -> ServiceResult<String> {
        let path = self.resolve_path(&folder.id)?;
        match &self.url_base {
            Some(base) => Ok(format!("{base}{}", folder.id)),
            None => Ok(format!("file://{}", path.display())),
        }
    }
}

fn join_id(parent_id: &str, name: &str) -> String {
    if parent_id.is_empty() {
        name.to_string()
    } else {
        format!("{parent_id}/{name}")
    }
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalDirectory) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("locked/APAC/23-Alpha {{pqp}}")).unwrap();
        fs::create_dir_all(temp_dir.path().join("locked/APAC/19-Old")).unwrap();
        fs::create_dir_all(temp_dir.path().join("archive/2023-APAC")).unwrap();
        fs::write(temp_dir.path().join("locked/APAC/readme.txt"), "not a folder").unwrap();

        let directory = LocalDirectory::open(temp_dir.path(), None).unwrap();
        (temp_dir, directory)
    }

    #[test]
    fn test_open_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(LocalDirectory::open(&temp_dir.path().join("missing"), None).is_err());
    }

    #[test]
    fn test_child_folders_skips_files_and_sorts() {
        let (_temp_dir, directory) = setup();

        let children = directory.child_folders("locked/APAC").unwrap();
        let names: Vec<_> = children.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["19-Old", "23-Alpha {{pqp}}"]);
        assert_eq!(children[1].id, "locked/APAC/23-Alpha {{pqp}}");
        assert_eq!(children[1].parent_id.as_deref(), Some("locked/APAC"));
    }

    #[test]
    fn test_folder_and_parents() {
        let (_temp_dir, directory) = setup();

        let folder = directory.folder("locked/APAC/19-Old").unwrap();
        assert_eq!(folder.name, "19-Old");

        let parents = directory.parents(&folder).unwrap();
        assert_eq!(parents.len(), 1);
        assert_eq!(parents[0].name, "APAC");

        // 最上層資料夾的上層是根目錄
        let top = directory.folder("locked").unwrap();
        let parents = directory.parents(&top).unwrap();
        assert_eq!(parents[0].id, "");

        let root = directory.folder("").unwrap();
        assert!(directory.parents(&root).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_and_missing_ids() {
        let (_temp_dir, directory) = setup();

        assert!(matches!(
            directory.folder("../etc"),
            Err(ServiceError::InvalidFolderId(_))
        ));
        assert!(matches!(
            directory.folder("locked//APAC"),
            Err(ServiceError::InvalidFolderId(_))
        ));
        assert!(matches!(
            directory.folder("locked/EMEA"),
            Err(ServiceError::FolderNotFound(_))
        ));
        assert!(matches!(
            directory.folder("locked/APAC/readme.txt"),
            Err(ServiceError::FolderNotFound(_))
        ));
    }

    #[test]
    fn test_rename_and_move() {
        let (temp_dir, directory) = setup();

        let folder = directory.folder("locked/APAC/23-Alpha {{pqp}}").unwrap();
        let renamed = directory.rename(&folder, "23-Alpha").unwrap();
        assert_eq!(renamed.id, "locked/APAC/23-Alpha");
        assert!(temp_dir.path().join("locked/APAC/23-Alpha").is_dir());

        let destination = directory.folder("archive/2023-APAC").unwrap();
        let moved = directory.move_to(&renamed, &destination).unwrap();
        assert_eq!(moved.id, "archive/2023-APAC/23-Alpha");
        assert!(temp_dir.path().join("archive/2023-APAC/23-Alpha").is_dir());
        assert!(!temp_dir.path().join("locked/APAC/23-Alpha").exists());
    }

    #[test]
    fn test_move_refuses_to_overwrite() {
        let (temp_dir, directory) = setup();
        fs::create_dir_all(temp_dir.path().join("archive/2023-APAC/19-Old")).unwrap();

        let folder = directory.folder("locked/APAC/19-Old").unwrap();
        let destination = directory.folder("archive/2023-APAC").unwrap();

        assert!(matches!(
            directory.move_to(&folder, &destination),
            Err(ServiceError::AlreadyExists(_))
        ));
        assert!(temp_dir.path().join("locked/APAC/19-Old").is_dir());
    }

    #[test]
    fn test_url_with_base() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("archive")).unwrap();
        let directory = LocalDirectory::open(
            temp_dir.path(),
            Some("https://files.example.com/folders/".to_string()),
        )
        .unwrap();

        let folder = directory.folder("archive").unwrap();
        assert_eq!(
            directory.url(&folder).unwrap(),
            "https://files.example.com/folders/archive"
        );
    }

    #[test]
    fn test_url_without_base() {
        let (_temp_dir, directory) = setup();
        let folder = directory.folder("archive/2023-APAC").unwrap();

        let url = directory.url(&folder).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("archive/2023-APAC"));
    }

    #[test]
    fn test_url_rejects_invalid_id() {
        let (_temp_dir, directory) = setup();
        let folder = Folder {
            id: "../outside".to_string(),
            name: "outside".to_string(),
            parent_id: Some("..".to_string()),
        };

        assert!(matches!(
            directory.url(&folder),
            Err(ServiceError::InvalidFolderId(_))
        ));
    }
}
