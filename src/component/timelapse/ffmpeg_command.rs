use crate::config::{FrameSize, JobConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// ffmpeg 擷取影格的輸出檔名樣式
pub const EXTRACTION_PATTERN: &str = "tmp_%06d.png";
/// 合併後連續影格的檔名樣式
pub const SEQUENCE_PATTERN: &str = "seq_%06d.png";

/// 連續影格第 `index` 張的檔名
#[must_use]
pub fn sequence_file_name(index: usize) -> String {
    format!("seq_{index:06}.png")
}

/// 一次 ffmpeg 呼叫
#[derive(Debug, Clone, PartialEq)]
pub enum FfmpegCommand {
    /// 從單一影片依固定間隔擷取影格
    Extract {
        input: PathBuf,
        output_dir: PathBuf,
        interval_secs: u32,
        size: Option<FrameSize>,
    },
    /// 將連續影格編碼為 H.264 影片
    Encode {
        sequence_dir: PathBuf,
        output: PathBuf,
        framerate: f64,
        overwrite: bool,
    },
}

impl FfmpegCommand {
    #[must_use]
    pub fn extract(config: &JobConfig, input: &Path, output_dir: &Path) -> Self {
        Self::Extract {
            input: input.to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            interval_secs: config.interval_secs,
            size: config.size,
        }
    }

    #[must_use]
    pub fn encode(config: &JobConfig, sequence_dir: &Path, output: &Path) -> Self {
        Self::Encode {
            sequence_dir: sequence_dir.to_path_buf(),
            output: output.to_path_buf(),
            framerate: config.framerate,
            overwrite: config.overwrite,
        }
    }

    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-hide_banner", "-nostdin", "-loglevel", "error"]
            .into_iter()
            .map(OsString::from)
            .collect();

        match self {
            Self::Extract {
                input,
                output_dir,
                interval_secs,
                size,
            } => {
                args.push("-i".into());
                args.push(input.clone().into_os_string());
                args.extend(["-an", "-f", "image2", "-vf"].map(OsString::from));
                args.push(format!("fps=fps=1/{interval_secs}").into());
                if let Some(size) = size {
                    args.push("-s".into());
                    args.push(size.to_string().into());
                }
                // 暫存資料夾每次都是新的，覆寫不會影響任何既有檔案
                args.push("-y".into());
                args.push(output_dir.join(EXTRACTION_PATTERN).into_os_string());
            }
            Self::Encode {
                sequence_dir,
                output,
                framerate,
                overwrite,
            } => {
                let rate = framerate.to_string();
                args.push(if *overwrite { "-y" } else { "-n" }.into());
                args.push("-framerate".into());
                args.push(rate.clone().into());
                args.push("-i".into());
                args.push(sequence_dir.join(SEQUENCE_PATTERN).into_os_string());
                args.extend(["-c:v", "libx264", "-r"].map(OsString::from));
                args.push(rate.into());
                args.extend(["-pix_fmt", "yuv420p"].map(OsString::from));
                args.push(output.clone().into_os_string());
            }
        }

        args
    }

    #[must_use]
    pub fn build_command(&self, program: &Path) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_sequence_file_name() {
        assert_eq!(sequence_file_name(0), "seq_000000.png");
        assert_eq!(sequence_file_name(42), "seq_000042.png");
        assert_eq!(sequence_file_name(123_456), "seq_123456.png");
    }

    #[test]
    fn test_extract_args() {
        let config = JobConfig {
            interval_secs: 5,
            ..JobConfig::default()
        };
        let cmd = FfmpegCommand::extract(&config, Path::new("/in/a.mp4"), Path::new("/tmp/x"));
        assert_eq!(
            to_strings(cmd.args()),
            [
                "-hide_banner",
                "-nostdin",
                "-loglevel",
                "error",
                "-i",
                "/in/a.mp4",
                "-an",
                "-f",
                "image2",
                "-vf",
                "fps=fps=1/5",
                "-y",
                "/tmp/x/tmp_%06d.png",
            ]
        );
    }

    #[test]
    fn test_extract_args_with_size() {
        let mut config = JobConfig::default();
        config.set_size("640x360");
        let cmd = FfmpegCommand::extract(&config, Path::new("a.mp4"), Path::new("/tmp/x"));
        let args = to_strings(cmd.args());
        let pos = args.iter().position(|a| a == "-s").unwrap();
        assert_eq!(args[pos + 1], "640x360");
        assert!(pos > args.iter().position(|a| a == "-vf").unwrap());
    }

    #[test]
    fn test_encode_args() {
        let config = JobConfig::default();
        let cmd = FfmpegCommand::encode(&config, Path::new("/tmp/job"), Path::new("out.mp4"));
        assert_eq!(
            to_strings(cmd.args()),
            [
                "-hide_banner",
                "-nostdin",
                "-loglevel",
                "error",
                "-n",
                "-framerate",
                "25",
                "-i",
                "/tmp/job/seq_%06d.png",
                "-c:v",
                "libx264",
                "-r",
                "25",
                "-pix_fmt",
                "yuv420p",
                "out.mp4",
            ]
        );
    }

    #[test]
    fn test_encode_args_overwrite_and_fractional_rate() {
        let config = JobConfig {
            framerate: 29.97,
            overwrite: true,
            ..JobConfig::default()
        };
        let cmd = FfmpegCommand::encode(&config, Path::new("/tmp/job"), Path::new("out.mp4"));
        let args = to_strings(cmd.args());
        assert!(args.contains(&"-y".to_string()));
        assert!(!args.contains(&"-n".to_string()));
        assert_eq!(args.iter().filter(|a| *a == "29.97").count(), 2);
    }
}
