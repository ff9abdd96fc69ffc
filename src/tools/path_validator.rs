use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("路徑不存在: {}", path.display());
    }
    if !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    Ok(())
}

pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("檔案不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_paths() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("rules.json");
        fs::write(&file, "{}").unwrap();

        assert!(validate_directory_exists(temp_dir.path()).is_ok());
        assert!(validate_directory_exists(&file).is_err());
        assert!(validate_directory_exists(&temp_dir.path().join("missing")).is_err());

        assert!(validate_file_exists(&file).is_ok());
        assert!(validate_file_exists(temp_dir.path()).is_err());
    }
}
