//! 輸入檔案解析
//!
//! 單一 GoPro 章節檔（`GOPR0001.MP4`）會自動帶入同資料夾的後續章節
//! （`GP010001.MP4`、`GP020001.MP4` ...）

use log::{debug, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// 章節錄影第一段檔名的前綴
pub const CHAPTER_SEED_PREFIX: &str = "GOPR";

/// 輸入檔案解析器
#[derive(Debug, Clone, Default)]
pub struct InputResolver;

impl InputResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// 決定要處理的檔案清單
    ///
    /// 只給一個檔案時會尋找同系列章節；多個檔案則原樣回傳
    #[must_use]
    pub fn resolve(&self, videos: &[PathBuf]) -> Vec<PathBuf> {
        match videos {
            [seed] => self.find_related(seed),
            _ => videos.to_vec(),
        }
    }

    /// 尋找與種子檔同系列的章節檔，包含種子檔本身，依檔名排序
    ///
    /// 種子檔以 `GOPR` 開頭，不會符合 `GP[0-9][0-9]` 樣式，每個檔名也只會列出一次，
    /// 因此結果不會有重複
    #[must_use]
    pub fn find_related(&self, seed: &Path) -> Vec<PathBuf> {
        let mut files = vec![seed.to_path_buf()];

        let Some(pattern) = chapter_pattern(seed) else {
            return files;
        };

        let parent = seed.parent().filter(|p| !p.as_os_str().is_empty());
        let directory = parent.unwrap_or(Path::new("."));

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("無法讀取目錄 {}，只處理 {}: {e}", directory.display(), seed.display());
                return files;
            }
        };

        for entry in entries.filter_map(std::result::Result::ok) {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if pattern.is_match(name) {
                debug!("找到章節檔: {name}");
                files.push(parent.map_or_else(|| PathBuf::from(name), |p| p.join(name)));
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        files
    }
}

/// 種子檔 `GOPRxxxx.ext` 對應的章節檔樣式 `GP[0-9][0-9]xxxx.ext`
fn chapter_pattern(seed: &Path) -> Option<Regex> {
    let stem = seed.file_stem()?.to_str()?;
    let rest = stem.strip_prefix(CHAPTER_SEED_PREFIX)?;
    let extension = seed
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let pattern = format!(
        "^GP[0-9]{{2}}{}{}$",
        regex::escape(rest),
        regex::escape(&extension)
    );
    Regex::new(&pattern).ok()
}
