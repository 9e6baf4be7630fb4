use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::workspace::WorkspaceError;
use std::path::Path;

pub mod build;
pub mod debugger;
pub mod local_run;
pub mod orchestrator;
pub mod port_wait;
pub mod request;
pub mod sam_cli;

pub use build::build_template;
pub use debugger::{
    attach_debugger, AttachOutcome, CommandDebuggerHost, DebuggerHost, ManualAttachHost,
};
pub use local_run::{environment_variable_block, invoke_local, LocalRunContext};
pub use orchestrator::{InvokeEnv, InvokeHooks, LocalInvoke};
pub use port_wait::{wait_until_open, PortWaitError};
pub use request::{DebugConfiguration, InvocationRequest};
pub use sam_cli::{
    BuildArgs, BuildOutput, LaunchedTask, LocalInvokeArgs, ProcessTask, SamCli, SamCliProcess,
};

#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("invalid invocation request: {0}")]
    Configuration(String),
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Synthesis(#[from] DescriptorError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("sam executable `{binary}` was not found")]
    MissingBinary { binary: String },
    #[error("sam build failed with exit code {exit_code}: {stderr}")]
    BuildFailed { exit_code: i32, stderr: String },
    #[error("failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    PortWait(#[from] PortWaitError),
    #[error("io error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("json error at {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> InvokeError {
    InvokeError::Io {
        path: path.display().to_string(),
        source,
    }
}
