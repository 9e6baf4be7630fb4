pub mod constants;
pub mod error;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use paths::{default_global_config_path, handler_config_path};
pub use settings::{read_setting_or, FileSettingsStore, HandlerConfig, Settings, SettingsStore};
