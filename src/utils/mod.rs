pub mod environment;
pub mod terminal;

pub use environment::{APP_DIR_NAME, get_app_config_dir, non_empty_env};
pub use terminal::sanitize_for_terminal;
