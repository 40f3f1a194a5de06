mod file_tools;
mod path_validator;

pub use file_tools::{
    SCRATCH_PREFIX, create_scratch_dir, list_files_sorted, remove_files_with_extension,
};
pub use path_validator::{ensure_directory_exists, validate_file_exists};
