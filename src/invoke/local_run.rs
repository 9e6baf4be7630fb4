use super::debugger::{attach_debugger, AttachOutcome, DebuggerHost};
use super::port_wait::wait_until_open;
use super::{io_error, InvocationRequest, InvokeError, LaunchedTask, LocalInvokeArgs, SamCli};
use crate::config::constants::{
    ATTACH_POLL_INTERVAL_MS, ATTACH_TIMEOUT_SETTING, DEFAULT_ATTACH_TIMEOUT_MS,
    TEMPLATE_RESOURCE_NAME,
};
use crate::config::{read_setting_or, HandlerConfig, SettingsStore};
use crate::shared::logging::{LogLevel, OutputChannel};
use crate::workspace::WorkspaceLayout;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub struct LocalRunContext<'a> {
    pub sam: &'a dyn SamCli,
    pub settings: &'a dyn SettingsStore,
    pub debugger: &'a dyn DebuggerHost,
    pub channel: &'a dyn OutputChannel,
}

/// `{ <resource>: <overrides> }` when the handler declares overrides, otherwise empty.
pub fn environment_variable_block(
    config: &HandlerConfig,
) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut block = BTreeMap::new();
    if let Some(variables) = &config.environment_variables {
        block.insert(TEMPLATE_RESOURCE_NAME.to_string(), variables.clone());
    }
    block
}

pub fn resolve_handler_config(
    settings: &dyn SettingsStore,
    request: &InvocationRequest,
) -> Result<HandlerConfig, InvokeError> {
    match &request.workspace_folder {
        Some(workspace) => {
            Ok(settings.local_lambda_configuration(workspace, &request.handler_name)?)
        }
        None => Ok(HandlerConfig::default()),
    }
}

/// Writes the side files, launches the resident local invoke and, when debugging, waits for the
/// debug port before attaching.
///
/// The launched task is stored in `task` as soon as it starts, so it is still reachable when the
/// port wait times out. Returns `None` when no debugger was requested.
pub fn invoke_local(
    ctx: &LocalRunContext<'_>,
    request: &InvocationRequest,
    layout: &WorkspaceLayout,
    output_template: &Path,
    on_will_attach: Option<&dyn Fn()>,
    task: &mut Option<Box<dyn LaunchedTask>>,
) -> Result<Option<AttachOutcome>, InvokeError> {
    let debug_config = match (request.is_debug, &request.debug_config) {
        (true, Some(config)) => Some(config),
        (true, None) => {
            return Err(InvokeError::Configuration(
                "debug port is required when debugging".to_string(),
            ))
        }
        (false, _) => None,
    };
    let config = resolve_handler_config(ctx.settings, request)?;

    let event_path = layout.event_path();
    let event = config
        .event
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));
    write_json(&event_path, &event)?;

    let env_vars_path = layout.env_vars_path();
    write_json(&env_vars_path, &environment_variable_block(&config))?;

    let args = LocalInvokeArgs {
        resource_name: TEMPLATE_RESOURCE_NAME.to_string(),
        template_path: output_template.to_path_buf(),
        event_path,
        env_vars_path,
        debug_port: debug_config.map(|config| config.port.to_string()),
    };
    ctx.channel.append_line(
        LogLevel::Info,
        "run.start",
        "Starting the SAM application locally",
    );
    *task = Some(ctx.sam.launch_local_invoke(&args)?);

    let Some(debug_config) = debug_config else {
        return Ok(None);
    };

    let timeout_ms = read_setting_or(
        ctx.settings,
        ATTACH_TIMEOUT_SETTING,
        DEFAULT_ATTACH_TIMEOUT_MS,
    );
    ctx.channel.append_line(
        LogLevel::Info,
        "debug.wait",
        &format!(
            "Waiting up to {timeout_ms}ms for port {} before attaching the debugger...",
            debug_config.port
        ),
    );
    wait_until_open(
        debug_config.port,
        Duration::from_millis(ATTACH_POLL_INTERVAL_MS),
        Duration::from_millis(timeout_ms),
    )?;

    Ok(Some(attach_debugger(
        ctx.debugger,
        ctx.channel,
        debug_config,
        on_will_attach,
    )))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), InvokeError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    let body = serde_json::to_string(value).map_err(|source| InvokeError::Json {
        path: path.display().to_string(),
        source,
    })?;
    fs::write(path, body).map_err(|e| io_error(path, e))
}
