//! 鎖定專案清單

use crate::tools::Folder;

/// 鎖定根資料夾底下的一個專案
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedProject {
    pub proj_no: String,
    pub proj_name: String,
    pub id: String,
}

impl LockedProject {
    /// 名稱第一個空白前為專案編號，其餘為專案名稱
    #[must_use]
    pub fn from_folder(folder: &Folder) -> Self {
        let (proj_no, proj_name) = match folder.name.split_once(' ') {
            Some((no, rest)) => (no, rest.trim()),
            None => (folder.name.as_str(), ""),
        };

        Self {
            proj_no: proj_no.to_string(),
            proj_name: proj_name.to_string(),
            id: folder.id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedProjectList {
    /// 目前使用者是否可以解鎖
    pub has_permission: bool,
    /// 依專案編號由大到小排序
    pub projects: Vec<LockedProject>,
}

impl LockedProjectList {
    #[must_use]
    pub fn new(has_permission: bool, mut projects: Vec<LockedProject>) -> Self {
        projects.sort_by(|a, b| b.proj_no.cmp(&a.proj_no));
        Self {
            has_permission,
            projects,
        }
    }

    /// 解鎖成功後從清單移除
    pub fn remove(&mut self, id: &str) -> Option<LockedProject> {
        let index = self.projects.iter().position(|p| p.id == id)?;
        Some(self.projects.remove(index))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}
