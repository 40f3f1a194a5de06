use crate::config::types::UserSettings;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// 讀取設定檔，檔案不存在時使用預設值
pub fn load_settings(path: &Path) -> Result<UserSettings> {
    if !path.exists() {
        return Ok(UserSettings::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings from {}", path.display()))
}
