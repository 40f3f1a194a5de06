use super::ffmpeg_command::FfmpegCommand;
use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

/// 外部程式執行結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub success: bool,
    pub stderr: String,
}

impl ToolOutput {
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stderr: stderr.into(),
        }
    }
}

/// 執行影音處理指令的外部工具
pub trait MediaTool {
    /// 同步執行指令並等待結束
    ///
    /// 只有無法啟動程式時才回傳 `Err`；非零結束碼以 `ToolOutput::success` 表示
    fn run(&self, command: &FfmpegCommand) -> Result<ToolOutput>;
}

impl<T: MediaTool + ?Sized> MediaTool for &T {
    fn run(&self, command: &FfmpegCommand) -> Result<ToolOutput> {
        (**self).run(command)
    }
}

/// 以子程序執行 ffmpeg
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    program: PathBuf,
}

impl FfmpegTool {
    #[must_use]
    pub fn new(program: &Path) -> Self {
        Self {
            program: program.to_path_buf(),
        }
    }
}

impl MediaTool for FfmpegTool {
    fn run(&self, command: &FfmpegCommand) -> Result<ToolOutput> {
        let mut cmd = command.build_command(&self.program);
        debug!("執行: {cmd:?}");

        let output = cmd
            .output()
            .with_context(|| format!("無法執行 ffmpeg: {}", self.program.display()))?;

        Ok(ToolOutput {
            success: output.status.success(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
