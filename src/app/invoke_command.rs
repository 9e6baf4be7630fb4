use crate::config::constants::{
    DEBUGGER_COMMAND_SETTING, DEFAULT_SAM_CLI_BINARY, GLOBAL_STATE_DIR, SAM_CLI_LOCATION_SETTING,
};
use crate::config::{default_global_config_path, read_setting_or, FileSettingsStore};
use crate::descriptor::TemplateFileDiscovery;
use crate::invoke::{
    CommandDebuggerHost, DebugConfiguration, DebuggerHost, InvocationRequest, InvokeEnv,
    LocalInvoke, ManualAttachHost, SamCliProcess,
};
use crate::shared::logging::JsonlOutputChannel;
use crate::workspace::FolderDisposer;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvokeOptions {
    pub document: Option<PathBuf>,
    pub handler: Option<String>,
    pub runtime: Option<String>,
    pub code_root: Option<PathBuf>,
    pub workspace: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub debug_port: Option<u16>,
    pub config: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl InvokeOptions {
    pub fn into_request(self) -> Result<InvocationRequest, String> {
        let document = self
            .document
            .ok_or_else(|| "--document is required".to_string())?;
        let handler_name = self
            .handler
            .ok_or_else(|| "--handler is required".to_string())?;
        let runtime = self
            .runtime
            .ok_or_else(|| "--runtime is required".to_string())?;
        let code_root = match self.code_root {
            Some(root) => root,
            None => document
                .parent()
                .map(PathBuf::from)
                .ok_or_else(|| "--code-root is required".to_string())?,
        };

        Ok(InvocationRequest {
            document,
            handler_name,
            runtime,
            code_root,
            workspace_folder: self.workspace,
            is_debug: self.debug_port.is_some(),
            manifest_path: self.manifest,
            debug_config: self.debug_port.map(DebugConfiguration::new),
        })
    }
}

pub fn parse_invoke_options(args: &[String]) -> Result<InvokeOptions, String> {
    let mut options = InvokeOptions::default();
    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args
            .get(i + 1)
            .cloned()
            .ok_or_else(|| format!("{flag} requires a value"))?;
        match flag {
            "--document" => options.document = Some(PathBuf::from(value)),
            "--handler" => options.handler = Some(value),
            "--runtime" => options.runtime = Some(value),
            "--code-root" => options.code_root = Some(PathBuf::from(value)),
            "--workspace" => options.workspace = Some(PathBuf::from(value)),
            "--manifest" => options.manifest = Some(PathBuf::from(value)),
            "--debug-port" => {
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid --debug-port `{value}`"))?;
                options.debug_port = Some(port);
            }
            "--config" => options.config = Some(PathBuf::from(value)),
            "--log-file" => options.log_file = Some(PathBuf::from(value)),
            other => return Err(format!("unexpected argument `{other}`")),
        }
        i += 2;
    }
    Ok(options)
}

fn default_log_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    home.join(GLOBAL_STATE_DIR).join("logs/samlocal.log")
}

pub fn cmd_invoke(args: &[String]) -> Result<String, String> {
    let mut options = parse_invoke_options(args)?;
    let config_path = match options.config.take() {
        Some(path) => path,
        None => default_global_config_path().map_err(|e| e.to_string())?,
    };
    let log_path = options.log_file.take().unwrap_or_else(default_log_path);
    let request = options.into_request()?;

    let settings = FileSettingsStore::load(&config_path).map_err(|e| e.to_string())?;
    let sam = SamCliProcess::new(read_setting_or(
        &settings,
        SAM_CLI_LOCATION_SETTING,
        DEFAULT_SAM_CLI_BINARY.to_string(),
    ));
    let debugger_command: Vec<String> =
        read_setting_or(&settings, DEBUGGER_COMMAND_SETTING, Vec::new());
    let debugger: Box<dyn DebuggerHost> = match CommandDebuggerHost::from_command(&debugger_command)
    {
        Some(host) => Box::new(host),
        None => Box::new(ManualAttachHost),
    };
    let discovery = TemplateFileDiscovery::new();
    let channel = JsonlOutputChannel::new(log_path).mirrored();
    let disposer = FolderDisposer::new();

    let env = InvokeEnv {
        sam: &sam,
        discovery: &discovery,
        settings: &settings,
        debugger: debugger.as_ref(),
        disposer: &disposer,
        channel: &channel,
    };
    let mut invoke = LocalInvoke::new(request, env).map_err(|e| e.to_string())?;
    invoke.run();

    let Some(mut task) = invoke.take_task() else {
        return Ok(format!(
            "started=false\nlog={}",
            channel.path().display()
        ));
    };
    let exit_code = task.wait().map_err(|e| e.to_string())?;
    Ok(format!(
        "started=true\nexit_code={}\nlog={}",
        exit_code.map_or_else(|| "none".to_string(), |code| code.to_string()),
        channel.path().display()
    ))
}
