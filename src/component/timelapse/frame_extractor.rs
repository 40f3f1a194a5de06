use super::ffmpeg_command::FfmpegCommand;
use super::job::TimelapseJob;
use super::media_tool::MediaTool;
use crate::tools::{create_scratch_dir, list_files_sorted, validate_file_exists};
use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    Extracted,
    /// 輸入檔不存在或不是檔案，已略過
    Skipped,
    Failed,
}

/// 單一影片的擷取結果
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    pub input_path: PathBuf,
    pub status: ExtractionStatus,
    /// 此影片加入序列的影格數
    pub frames: usize,
    pub error_message: Option<String>,
}

impl ExtractionResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == ExtractionStatus::Extracted
    }
}

impl<T: MediaTool> TimelapseJob<T> {
    /// 從一部影片擷取影格並接到序列尾端
    ///
    /// 失敗不會中斷工作；已搬入序列的影格保留，序號不回溯
    pub fn extract_images(&mut self, input: &Path) -> ExtractionResult {
        let first = self.sequence;

        if let Err(e) = validate_file_exists(input) {
            warn!("無法處理 {}: {e}", input.display());
            return ExtractionResult {
                input_path: input.to_path_buf(),
                status: ExtractionStatus::Skipped,
                frames: 0,
                error_message: Some(e.to_string()),
            };
        }

        let result = self.extract_images_inner(input);
        let frames = self.sequence - first;

        match result {
            Ok(()) => {
                info!("{} 擷取 {frames} 張影格", input.display());
                ExtractionResult {
                    input_path: input.to_path_buf(),
                    status: ExtractionStatus::Extracted,
                    frames,
                    error_message: None,
                }
            }
            Err(e) => {
                warn!("擷取失敗 {}: {e:#}", input.display());
                ExtractionResult {
                    input_path: input.to_path_buf(),
                    status: ExtractionStatus::Failed,
                    frames,
                    error_message: Some(format!("{e:#}")),
                }
            }
        }
    }

    fn extract_images_inner(&mut self, input: &Path) -> Result<()> {
        // 離開時自動刪除
        let extraction_dir = create_scratch_dir()?;
        debug!(
            "處理 {}，暫存資料夾 {}",
            input.display(),
            extraction_dir.path().display()
        );

        let command = FfmpegCommand::extract(&self.config, input, extraction_dir.path());
        let output = self.tool.run(&command)?;
        if !output.success {
            bail!("ffmpeg 擷取影格失敗: {}", output.stderr);
        }

        for frame in frames_in_order(list_files_sorted(extraction_dir.path())?) {
            let target = self.next_sequence_path();
            move_file(&frame, &target)?;
            self.sequence += 1;
        }

        Ok(())
    }
}

/// 依 ffmpeg 的影格編號排序；超過六位數時檔名字典序不等於時間順序
fn frames_in_order(mut frames: Vec<PathBuf>) -> Vec<PathBuf> {
    frames.sort_by_key(|path| (frame_number(path), path.file_name().map(ToOwned::to_owned)));
    frames
}

/// `tmp_000042.png` → 42
fn frame_number(path: &Path) -> Option<u64> {
    path.file_stem()?
        .to_str()?
        .strip_prefix("tmp_")?
        .parse()
        .ok()
}

/// 搬移檔案，跨檔案系統時改用複製後刪除
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to)
        .with_context(|| format!("無法搬移 {} 到 {}", from.display(), to.display()))?;
    fs::remove_file(from).with_context(|| format!("無法刪除 {}", from.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frames_in_order_past_six_digits() {
        let frames = ["tmp_1000000.png", "tmp_999999.png", "tmp_000001.png", "tmp_1000001.png"]
            .iter()
            .map(|n| PathBuf::from("/tmp/x").join(n))
            .collect();

        let names: Vec<String> = frames_in_order(frames)
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            ["tmp_000001.png", "tmp_999999.png", "tmp_1000000.png", "tmp_1000001.png"]
        );
    }

    #[test]
    fn test_frame_number() {
        assert_eq!(frame_number(Path::new("tmp_000042.png")), Some(42));
        assert_eq!(frame_number(Path::new("/a/tmp_1234567.png")), Some(1_234_567));
        assert_eq!(frame_number(Path::new("seq_000001.png")), None);
    }

    #[test]
    fn test_move_file() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("tmp_000001.png");
        let to = dir.path().join("seq_000000.png");
        fs::write(&from, b"frame").unwrap();

        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read(&to).unwrap(), b"frame");
    }

    #[test]
    fn test_move_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let result = move_file(&dir.path().join("nope.png"), &dir.path().join("seq.png"));
        assert!(result.is_err());
    }
}
