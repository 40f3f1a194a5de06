use super::frame_extractor::{ExtractionResult, ExtractionStatus};
use super::input_resolver::InputResolver;
use super::job::TimelapseJob;
use super::media_tool::{FfmpegTool, MediaTool};
use super::movie_builder::{BuildStatus, MovieResult};
use crate::config::JobConfig;
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::info;
use std::path::PathBuf;

/// 工作摘要
#[derive(Debug)]
pub struct RunSummary {
    pub extractions: Vec<ExtractionResult>,
    pub movie: MovieResult,
}

impl RunSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.movie.is_success()
    }

    #[must_use]
    pub fn count(&self, status: ExtractionStatus) -> usize {
        self.extractions
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    #[must_use]
    pub fn total_frames(&self) -> usize {
        self.extractions.iter().map(|r| r.frames).sum()
    }
}

/// 縮時攝影產生器
///
/// 解析輸入檔 → 依序擷取影格 → 編碼影片 → 顯示摘要
pub struct TimelapseRunner {
    config: JobConfig,
    resolver: InputResolver,
    quiet: bool,
}

impl TimelapseRunner {
    #[must_use]
    pub const fn new(config: JobConfig, resolver: InputResolver) -> Self {
        Self {
            config,
            resolver,
            quiet: false,
        }
    }

    #[must_use]
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn run(&self, videos: &[PathBuf]) -> Result<RunSummary> {
        let tool = FfmpegTool::new(&self.config.ffmpeg_path);
        self.run_with(videos, tool)
    }

    /// 以指定的外部工具執行整個工作
    ///
    /// 只有建立工作暫存資料夾失敗時回傳 `Err`
    pub fn run_with<T: MediaTool>(&self, videos: &[PathBuf], tool: T) -> Result<RunSummary> {
        let video_list = self.resolver.resolve(videos);
        self.say(
            style(format!("共 {} 個檔案需要處理", video_list.len()))
                .cyan()
                .bold()
                .to_string(),
        );
        info!("開始縮時攝影工作，共 {} 個檔案", video_list.len());

        let mut job = TimelapseJob::new(self.config.clone(), tool)?;
        let progress_bar = self.progress_bar(video_list.len() as u64);

        let mut extractions = Vec::with_capacity(video_list.len());
        for video in &video_list {
            let name = video
                .file_name()
                .unwrap_or(video.as_os_str())
                .to_string_lossy()
                .to_string();
            progress_bar.set_message(name.clone());

            let result = job.extract_images(video);
            self.report(&progress_bar, &status_line(&name, &result), !result.is_success());
            progress_bar.inc(1);
            extractions.push(result);
        }
        progress_bar.finish_and_clear();

        self.say(format!(
            "\n從 {} 張影格建立影片（{}）...",
            job.frame_count(),
            job.scratch_dir().display()
        ));
        let movie = job.build_movie(None);

        let summary = RunSummary { extractions, movie };
        self.print_summary(&summary);
        Ok(summary)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::with_draw_target(Some(len), ProgressDrawTarget::hidden());
        }

        let progress_bar = ProgressBar::new(len);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            progress_bar.set_style(bar_style.progress_chars("#>-"));
        }
        progress_bar
    }

    /// 逐檔結果：進度條顯示中時印在進度條上方，否則直接輸出
    fn report(&self, progress_bar: &ProgressBar, line: &str, is_warning: bool) {
        match report_target(progress_bar.is_hidden(), self.quiet, is_warning) {
            ReportTarget::ProgressBar => progress_bar.println(line),
            ReportTarget::Stdout => println!("{line}"),
            ReportTarget::Stderr => eprintln!("{line}"),
            ReportTarget::Silent => {}
        }
    }

    fn say(&self, message: String) {
        if !self.quiet {
            println!("{message}");
        }
    }

    fn print_summary(&self, summary: &RunSummary) {
        let extracted = summary.count(ExtractionStatus::Extracted);
        let failed = summary.count(ExtractionStatus::Failed);
        let skipped = summary.count(ExtractionStatus::Skipped);

        info!(
            "擷取完成 - 成功: {extracted}, 失敗: {failed}, 略過: {skipped}, 影格: {}",
            summary.total_frames()
        );

        if self.quiet {
            return;
        }

        println!();
        println!("{}", style("=== 縮時攝影摘要 ===").cyan().bold());
        println!("  總計: {} 個檔案", summary.extractions.len());
        println!("  成功: {} 個", style(extracted).green());
        if failed > 0 {
            println!("  失敗: {} 個", style(failed).red());
        }
        if skipped > 0 {
            println!("  略過: {} 個", style(skipped).yellow());
        }
        println!("  影格: {} 張", summary.total_frames());

        match summary.movie.status {
            BuildStatus::Built => {
                if let Some(path) = &summary.movie.output_path {
                    println!("{}", style(format!("影片已建立: {}", path.display())).green());
                }
            }
            BuildStatus::NothingToDo => {
                println!("{}", style("沒有影格可以製作影片").yellow());
            }
            BuildStatus::Failed => {
                println!(
                    "{} {}",
                    style("影片編碼失敗:").red().bold(),
                    summary.movie.error_message.as_deref().unwrap_or_default()
                );
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportTarget {
    ProgressBar,
    Stdout,
    Stderr,
    Silent,
}

/// 進度條隱藏（非終端機或 `--quiet`）時 `ProgressBar::println` 不會輸出任何內容
fn report_target(bar_hidden: bool, quiet: bool, is_warning: bool) -> ReportTarget {
    match (bar_hidden, quiet, is_warning) {
        (false, _, _) => ReportTarget::ProgressBar,
        (true, false, _) => ReportTarget::Stdout,
        (true, true, true) => ReportTarget::Stderr,
        (true, true, false) => ReportTarget::Silent,
    }
}

fn status_line(name: &str, result: &ExtractionResult) -> String {
    let reason = result.error_message.as_deref().unwrap_or_default();
    match result.status {
        ExtractionStatus::Extracted => {
            format!("  {} {name} ({} 張影格)", style("✓").green(), result.frames)
        }
        ExtractionStatus::Skipped => format!("  {} {name} 已略過: {reason}", style("-").yellow()),
        ExtractionStatus::Failed => format!("  {} {name} 擷取失敗: {reason}", style("✗").red()),
    }
}
