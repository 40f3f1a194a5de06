use super::ffmpeg_command::FfmpegCommand;
use super::job::TimelapseJob;
use super::media_tool::MediaTool;
use crate::tools::{ensure_directory_exists, remove_files_with_extension};
use anyhow::{Result, bail};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    Built,
    /// 沒有任何影格，未呼叫 ffmpeg
    NothingToDo,
    Failed,
}

/// 影片編碼結果
#[derive(Debug, Clone)]
pub struct MovieResult {
    pub status: BuildStatus,
    pub frame_count: usize,
    pub output_path: Option<PathBuf>,
    pub error_message: Option<String>,
}

impl MovieResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == BuildStatus::Built
    }
}

impl<T: MediaTool> TimelapseJob<T> {
    /// 將所有影格編碼為影片並結束工作
    ///
    /// `output` 未指定時使用設定中的輸出路徑，再不然寫入工作暫存資料夾。
    /// 無論成功與否都會刪除所有影格；暫存資料夾只有在存放成功產生的影片時保留
    pub fn build_movie(self, output: Option<&Path>) -> MovieResult {
        let output_path = output
            .map(Path::to_path_buf)
            .or_else(|| self.config.output.clone())
            .unwrap_or_else(|| self.default_output_path());

        let Self {
            config,
            tool,
            scratch,
            sequence,
        } = self;

        if sequence == 0 {
            warn!("沒有影格可以製作影片");
            finish_scratch(scratch, false);
            return MovieResult {
                status: BuildStatus::NothingToDo,
                frame_count: 0,
                output_path: None,
                error_message: Some("沒有影格可以製作影片".to_string()),
            };
        }

        info!(
            "從 {} 的 {sequence} 張影格建立影片 {}",
            scratch.path().display(),
            output_path.display()
        );

        let command = FfmpegCommand::encode(&config, scratch.path(), &output_path);
        let result = encode(&tool, &command, &output_path);

        match remove_files_with_extension(scratch.path(), "png") {
            Ok(removed) => debug!("已刪除 {removed} 張影格"),
            Err(e) => warn!("清除影格失敗: {e:#}"),
        }

        let keep_scratch = result.is_ok() && output_path.starts_with(scratch.path());
        finish_scratch(scratch, keep_scratch);

        match result {
            Ok(()) => {
                info!("影片已建立: {}", output_path.display());
                MovieResult {
                    status: BuildStatus::Built,
                    frame_count: sequence,
                    output_path: Some(output_path),
                    error_message: None,
                }
            }
            Err(e) => {
                warn!("影片編碼失敗: {e:#}");
                MovieResult {
                    status: BuildStatus::Failed,
                    frame_count: sequence,
                    output_path: None,
                    error_message: Some(format!("{e:#}")),
                }
            }
        }
    }
}

fn encode<T: MediaTool>(tool: &T, command: &FfmpegCommand, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    let output = tool.run(command)?;
    if !output.success {
        bail!("ffmpeg 編碼失敗: {}", output.stderr);
    }
    Ok(())
}

/// 保留或刪除工作暫存資料夾
fn finish_scratch(scratch: TempDir, keep: bool) {
    if keep {
        let path = scratch.keep();
        debug!("保留工作暫存資料夾: {}", path.display());
        return;
    }

    let path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        warn!("無法刪除工作暫存資料夾 {}: {e}", path.display());
    }
}
