use super::constants::{GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR, HANDLER_CONFIG_FILE_NAME};
use crate::config::ConfigError;
use std::path::{Path, PathBuf};

pub fn default_global_config_path() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os("HOME").ok_or(ConfigError::HomeDirectoryUnavailable)?;
    Ok(PathBuf::from(home)
        .join(GLOBAL_STATE_DIR)
        .join(GLOBAL_SETTINGS_FILE_NAME))
}

pub fn handler_config_path(workspace: &Path) -> PathBuf {
    workspace
        .join(GLOBAL_STATE_DIR)
        .join(HANDLER_CONFIG_FILE_NAME)
}
