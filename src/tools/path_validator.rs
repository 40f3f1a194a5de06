use anyhow::{Result, bail};
use std::path::Path;

pub fn validate_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("檔案不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_file_exists() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"data").unwrap();

        assert!(validate_file_exists(&file).is_ok());
        assert!(validate_file_exists(dir.path()).is_err());
        assert!(validate_file_exists(&dir.path().join("missing.mp4")).is_err());
    }

    #[test]
    fn test_ensure_directory_exists() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory_exists(&nested).unwrap();
    }
}
