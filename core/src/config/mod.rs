mod load;
mod types;

pub use load::{apply_env_overrides, get_data_dir, load_default, load_from_path, CONFIG_FILE_NAME};
pub use types::*;
