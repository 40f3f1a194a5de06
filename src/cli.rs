use crate::component::timelapse::InputResolver;
use crate::config::{DEFAULT_SETTINGS_FILE, JobConfig, UserSettings};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

const CLI_AFTER_HELP: &str = "Examples:\n  timelapse GOPR0001.MP4\n  timelapse --interval 5 --size 1280x720 --output trip.mp4 a.mp4 b.mp4\n  timelapse --no-resize --framerate 30 GOPR0042.MP4";

#[derive(Debug, Parser)]
#[command(
    name = "timelapse",
    version,
    about = "Create a timelapse movie from one or more videos using ffmpeg",
    after_help = CLI_AFTER_HELP
)]
pub struct Cli {
    /// Video files to transform. A single GoPro chapter file pulls in its siblings.
    #[arg(required = true, num_args = 1..)]
    pub videos: Vec<PathBuf>,

    /// Seconds between sampled frames [default: 2].
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: Option<u32>,

    /// Final movie filename [default: timelapse.mp4 inside the scratch directory].
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Size of images and final movie, formatted as <width>x<height>.
    #[arg(long, value_name = "WxH")]
    pub size: Option<String>,

    /// Don't resize images.
    #[arg(long)]
    pub no_resize: bool,

    /// Framerate for the final output [default: 25].
    #[arg(long, value_name = "FPS", value_parser = parse_framerate)]
    pub framerate: Option<f64>,

    /// Path to the ffmpeg executable [default: ffmpeg].
    #[arg(long, value_name = "PATH")]
    pub ffmpeg: Option<PathBuf>,

    /// Allow overwriting an existing output file.
    #[arg(long)]
    pub overwrite: bool,

    /// Show additional logging output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Settings file with default values.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,
}

impl Cli {
    /// 合併設定檔與命令列參數，命令列優先
    #[must_use]
    pub fn job_config(&self, settings: &UserSettings) -> JobConfig {
        let mut config = JobConfig::from_settings(settings);

        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        if let Some(framerate) = self.framerate {
            config.framerate = framerate;
        }
        if let Some(ffmpeg) = &self.ffmpeg {
            config.ffmpeg_path.clone_from(ffmpeg);
        }

        if self.no_resize {
            config.size = None;
        } else if let Some(size) = self.size.as_deref() {
            config.set_size(size);
        }

        config.output.clone_from(&self.output);
        config.overwrite = self.overwrite;
        config
    }

    #[must_use]
    pub fn input_resolver(&self) -> InputResolver {
        InputResolver::new()
    }
}

fn parse_framerate(raw: &str) -> Result<f64, String> {
    let rate: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid framerate: {raw}"))?;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(format!("framerate must be positive: {raw}"));
    }
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameSize;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("timelapse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["GOPR0001.MP4"]);
        let config = cli.job_config(&UserSettings::default());

        assert_eq!(cli.videos, [PathBuf::from("GOPR0001.MP4")]);
        assert_eq!(config.interval_secs, 2);
        assert!((config.framerate - 25.0).abs() < f64::EPSILON);
        assert!(config.size.is_none());
        assert!(config.output.is_none());
        assert!(!config.overwrite);
        assert_eq!(cli.settings, PathBuf::from("settings.json"));
    }

    #[test]
    fn test_all_options() {
        let cli = parse(&[
            "--interval",
            "5",
            "--output",
            "out.mp4",
            "--size",
            "1280x720",
            "--framerate",
            "30",
            "--ffmpeg",
            "/usr/local/bin/ffmpeg",
            "--overwrite",
            "-vv",
            "a.mp4",
            "b.mp4",
        ]);
        let config = cli.job_config(&UserSettings::default());

        assert_eq!(cli.videos.len(), 2);
        assert_eq!(cli.verbose, 2);
        assert_eq!(config.interval_secs, 5);
        assert_eq!(config.output, Some(PathBuf::from("out.mp4")));
        assert_eq!(
            config.size,
            Some(FrameSize {
                width: 1280,
                height: 720
            })
        );
        assert!((config.framerate - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.ffmpeg_path, PathBuf::from("/usr/local/bin/ffmpeg"));
        assert!(config.overwrite);
    }

    #[test]
    fn test_no_resize_wins() {
        let cli = parse(&["--size", "640x480", "--no-resize", "a.mp4"]);
        let settings = UserSettings {
            size: Some("320x240".to_string()),
            ..UserSettings::default()
        };
        assert!(cli.job_config(&settings).size.is_none());
    }

    #[test]
    fn test_malformed_size_keeps_settings_size() {
        let cli = parse(&["--size", "640", "a.mp4"]);
        let settings = UserSettings {
            size: Some("320x240".to_string()),
            ..UserSettings::default()
        };
        assert_eq!(
            cli.job_config(&settings).size.map(|s| s.to_string()),
            Some("320x240".to_string())
        );
    }

    #[test]
    fn test_settings_used_when_flags_absent() {
        let cli = parse(&["a.mp4"]);
        let settings = UserSettings {
            interval_secs: 10,
            framerate: 60.0,
            ..UserSettings::default()
        };
        let config = cli.job_config(&settings);
        assert_eq!(config.interval_secs, 10);
        assert!((config.framerate - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let parse_err = |args: &[&str]| {
            Cli::try_parse_from(std::iter::once("timelapse").chain(args.iter().copied())).is_err()
        };
        assert!(parse_err(&[]));
        assert!(parse_err(&["--interval", "0", "a.mp4"]));
        assert!(parse_err(&["--framerate", "-3", "a.mp4"]));
        assert!(parse_err(&["--framerate", "fast", "a.mp4"]));
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let result = Cli::try_parse_from(["timelapse", "--keep-duplicates", "GOPR0001.MP4"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_framerate() {
        assert!((parse_framerate("29.97").unwrap() - 29.97).abs() < 0.001);
        assert!(parse_framerate("0").is_err());
        assert!(parse_framerate("inf").is_err());
    }
}
