use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

pub const DEFAULT_INTERVAL_SECS: u32 = 2;
pub const DEFAULT_FRAMERATE: f64 = 25.0;
pub const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";

static REGEX_FRAME_SIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)x(\d+)$").expect("Invalid regex"));

/// 影格尺寸（`WxH`）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FromStr for FrameSize {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = REGEX_FRAME_SIZE
            .captures(s.trim())
            .ok_or_else(|| anyhow::anyhow!("尺寸格式錯誤，請使用 <寬>x<高>: {s}"))?;

        let width: u32 = caps[1].parse()?;
        let height: u32 = caps[2].parse()?;
        if width == 0 || height == 0 {
            anyhow::bail!("尺寸必須大於 0: {s}");
        }

        Ok(Self { width, height })
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// `settings.json` 內容，所有欄位皆可省略
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub interval_secs: u32,
    pub framerate: f64,
    pub ffmpeg_path: PathBuf,
    pub size: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            framerate: DEFAULT_FRAMERATE,
            ffmpeg_path: PathBuf::from(DEFAULT_FFMPEG_PATH),
            size: None,
        }
    }
}

/// 縮時攝影工作設定
///
/// 工作開始後不再變更
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    /// 取樣間隔（秒）
    pub interval_secs: u32,
    pub size: Option<FrameSize>,
    pub framerate: f64,
    /// 輸出影片路徑，未指定時寫入工作暫存資料夾
    pub output: Option<PathBuf>,
    pub ffmpeg_path: PathBuf,
    pub overwrite: bool,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self::from_settings(&UserSettings::default())
    }
}

impl JobConfig {
    #[must_use]
    pub fn from_settings(settings: &UserSettings) -> Self {
        let mut config = Self {
            interval_secs: settings.interval_secs.max(1),
            size: None,
            framerate: if settings.framerate > 0.0 {
                settings.framerate
            } else {
                DEFAULT_FRAMERATE
            },
            output: None,
            ffmpeg_path: settings.ffmpeg_path.clone(),
            overwrite: false,
        };
        if let Some(size) = settings.size.as_deref() {
            config.set_size(size);
        }
        config
    }

    /// 設定影格尺寸
    ///
    /// 格式錯誤時僅發出警告，保留原本的設定並回傳 `false`
    pub fn set_size(&mut self, size: &str) -> bool {
        match size.parse::<FrameSize>() {
            Ok(parsed) => {
                self.size = Some(parsed);
                true
            }
            Err(e) => {
                warn!("忽略尺寸設定 {size:?}: {e}");
                eprintln!("{}", console::style(malformed_size_message(size)).yellow());
                false
            }
        }
    }

    /// 取樣濾鏡，例如 `fps=fps=1/2`
    #[must_use]
    pub fn sampling_filter(&self) -> String {
        format!("fps=fps=1/{}", self.interval_secs)
    }
}

fn malformed_size_message(size: &str) -> String {
    format!("尺寸格式錯誤 ({size})，請使用 <寬>x<高>。已忽略。")
}
