use super::ffmpeg_command::sequence_file_name;
use super::media_tool::MediaTool;
use crate::config::JobConfig;
use crate::tools::create_scratch_dir;
use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 未指定輸出路徑時，影片在工作暫存資料夾中的檔名
pub const DEFAULT_MOVIE_NAME: &str = "timelapse.mp4";

/// 一次縮時攝影工作
///
/// 狀態流程：建立 → 逐檔擷取影格（`extract_images`，0..N 次）→
/// 編碼影片（`build_movie`，消耗工作）
pub struct TimelapseJob<T: MediaTool> {
    pub(super) config: JobConfig,
    pub(super) tool: T,
    /// 存放連續編號影格的工作暫存資料夾
    pub(super) scratch: TempDir,
    /// 下一張影格的序號，也就是目前已擷取的影格數
    pub(super) sequence: usize,
}

impl<T: MediaTool> TimelapseJob<T> {
    pub fn new(config: JobConfig, tool: T) -> Result<Self> {
        let scratch = create_scratch_dir()?;
        debug!("工作暫存資料夾: {}", scratch.path().display());

        Ok(Self {
            config,
            tool,
            scratch,
            sequence: 0,
        })
    }

    /// 目前已擷取的影格總數
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.sequence
    }

    #[must_use]
    pub fn scratch_dir(&self) -> &Path {
        self.scratch.path()
    }

    #[must_use]
    pub fn default_output_path(&self) -> PathBuf {
        self.scratch.path().join(DEFAULT_MOVIE_NAME)
    }

    /// 下一張影格在工作暫存資料夾中的路徑（不遞增序號）
    pub(super) fn next_sequence_path(&self) -> PathBuf {
        self.scratch.path().join(sequence_file_name(self.sequence))
    }
}
