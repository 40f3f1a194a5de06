pub mod load;
pub mod types;

pub use load::{DEFAULT_SETTINGS_FILE, load_settings};
pub use types::{
    DEFAULT_FFMPEG_PATH, DEFAULT_FRAMERATE, DEFAULT_INTERVAL_SECS, FrameSize, JobConfig,
    UserSettings,
};
