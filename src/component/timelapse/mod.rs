//! 縮時攝影元件
//!
//! 以 ffmpeg 從一或多部影片依固定間隔擷取影格，重新編號後合併為單一影片

mod ffmpeg_command;
mod frame_extractor;
mod input_resolver;
mod job;
mod main;
mod media_tool;
mod movie_builder;

pub use ffmpeg_command::{EXTRACTION_PATTERN, FfmpegCommand, SEQUENCE_PATTERN, sequence_file_name};
pub use frame_extractor::{ExtractionResult, ExtractionStatus};
pub use input_resolver::{CHAPTER_SEED_PREFIX, InputResolver};
pub use job::{DEFAULT_MOVIE_NAME, TimelapseJob};
pub use main::{RunSummary, TimelapseRunner};
pub use media_tool::{FfmpegTool, MediaTool, ToolOutput};
pub use movie_builder::{BuildStatus, MovieResult};
