use super::InvokeError;
use crate::descriptor::SynthesisRequest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Host-specific attach parameters. Only `port` is interpreted here; everything else is passed
/// through to the debugger host untouched.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DebugConfiguration {
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DebugConfiguration {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            name: None,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub document: PathBuf,
    pub handler_name: String,
    pub runtime: String,
    pub code_root: PathBuf,
    pub workspace_folder: Option<PathBuf>,
    pub is_debug: bool,
    pub manifest_path: Option<PathBuf>,
    pub debug_config: Option<DebugConfiguration>,
}

impl InvocationRequest {
    pub fn debug_port(&self) -> Option<u16> {
        self.debug_config.as_ref().map(|config| config.port)
    }

    pub fn validate(&self) -> Result<(), InvokeError> {
        if self.handler_name.trim().is_empty() {
            return Err(InvokeError::Configuration(
                "handler name must not be empty".to_string(),
            ));
        }
        if self.runtime.trim().is_empty() {
            return Err(InvokeError::Configuration(
                "runtime must not be empty".to_string(),
            ));
        }
        if self.is_debug && self.debug_config.is_none() {
            return Err(InvokeError::Configuration(
                "debug port is required when debugging".to_string(),
            ));
        }
        Ok(())
    }

    pub fn synthesis_request(&self) -> SynthesisRequest {
        SynthesisRequest {
            code_root: self.code_root.clone(),
            document: self.document.clone(),
            handler_name: self.handler_name.clone(),
            runtime: self.runtime.clone(),
            workspace_folder: self.workspace_folder.clone(),
        }
    }
}
