use super::paths::handler_config_path;
use super::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Per-handler configuration resolved from the workspace.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerConfig {
    #[serde(default)]
    pub event: Option<Value>,
    #[serde(default)]
    pub environment_variables: Option<BTreeMap<String, String>>,
}

/// Settings and per-handler configuration consumed by the pipeline.
pub trait SettingsStore {
    fn read_setting(&self, key: &str) -> Option<Value>;

    fn local_lambda_configuration(
        &self,
        workspace: &Path,
        handler_name: &str,
    ) -> Result<HandlerConfig, ConfigError>;
}

/// Reads `key` as `T`, falling back to `default` when the key is absent or malformed.
pub fn read_setting_or<T: DeserializeOwned>(
    store: &dyn SettingsStore,
    key: &str,
    default: T,
) -> T {
    store
        .read_setting(key)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Settings {
    pub values: BTreeMap<String, Value>,
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct HandlerConfigFile {
    #[serde(default)]
    handlers: BTreeMap<String, HandlerConfig>,
}

/// Settings loaded from a YAML file plus handler configuration read from
/// `<workspace>/.samlocal/handlers.yaml` on demand.
#[derive(Debug, Clone, Default)]
pub struct FileSettingsStore {
    settings: Settings,
}

impl FileSettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::new(Settings::from_path(path)?))
    }
}

impl SettingsStore for FileSettingsStore {
    fn read_setting(&self, key: &str) -> Option<Value> {
        self.settings.values.get(key).cloned()
    }

    fn local_lambda_configuration(
        &self,
        workspace: &Path,
        handler_name: &str,
    ) -> Result<HandlerConfig, ConfigError> {
        let path = handler_config_path(workspace);
        if !path.exists() {
            return Ok(HandlerConfig::default());
        }
        let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        if raw.trim().is_empty() {
            return Ok(HandlerConfig::default());
        }
        let file: HandlerConfigFile =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(file
            .handlers
            .get(handler_name)
            .cloned()
            .unwrap_or_default())
    }
}
