use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 暫存資料夾前綴
pub const SCRATCH_PREFIX: &str = "timelapse_";

/// 在系統暫存區建立新的資料夾
pub fn create_scratch_dir() -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(SCRATCH_PREFIX)
        .tempdir()
        .context("無法建立暫存資料夾")
}

/// 列出資料夾中的檔案，依檔名排序
pub fn list_files_sorted(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(directory)
        .with_context(|| format!("無法讀取目錄: {}", directory.display()))?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// 刪除資料夾中指定副檔名的檔案，回傳刪除數量
///
/// 個別檔案刪除失敗只記錄警告
pub fn remove_files_with_extension(directory: &Path, extension: &str) -> Result<usize> {
    let mut removed = 0;
    for path in list_files_sorted(directory)? {
        if !has_extension(&path, extension) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) => warn!("無法刪除 {}: {e}", path.display()),
        }
    }
    Ok(removed)
}
