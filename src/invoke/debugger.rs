use super::DebugConfiguration;
use crate::shared::logging::{LogLevel, OutputChannel};
use std::process::{Command, Stdio};

/// Host side of a debugger attach. Ordinary failure is reported as `false`, never raised.
pub trait DebuggerHost {
    fn start_debugging(&self, config: &DebugConfiguration) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachOutcome {
    pub attached: bool,
}

/// Runs the pre-attach hook, asks the host to attach and logs the result. Never fails.
pub fn attach_debugger(
    host: &dyn DebuggerHost,
    channel: &dyn OutputChannel,
    config: &DebugConfiguration,
    on_will_attach: Option<&dyn Fn()>,
) -> AttachOutcome {
    if let Some(hook) = on_will_attach {
        hook();
    }

    let attached = host.start_debugging(config);
    if attached {
        channel.append_line(
            LogLevel::Info,
            "debug.attached",
            &format!("Debugger attached on port {}", config.port),
        );
    } else {
        channel.append_line(
            LogLevel::Error,
            "debug.attach_failed",
            &format!(
                "Unable to attach a debugger on port {}. The function may have taken too long \
                 to start or exited early; check its output. If it is still starting, you can \
                 attach to it manually.",
                config.port
            ),
        );
    }
    AttachOutcome { attached }
}

/// Runs an external command to attach. `{port}` and `{config}` (the configuration as JSON) are
/// substituted in every argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDebuggerHost {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandDebuggerHost {
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    pub fn render_args(&self, config: &DebugConfiguration) -> Vec<String> {
        let port = config.port.to_string();
        let json = serde_json::to_string(config).unwrap_or_default();
        self.args
            .iter()
            .map(|arg| arg.replace("{port}", &port).replace("{config}", &json))
            .collect()
    }
}

impl DebuggerHost for CommandDebuggerHost {
    fn start_debugging(&self, config: &DebugConfiguration) -> bool {
        Command::new(&self.program)
            .args(self.render_args(config))
            .stdin(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

/// Tells the user where to attach; used when no debugger command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualAttachHost;

impl DebuggerHost for ManualAttachHost {
    fn start_debugging(&self, config: &DebugConfiguration) -> bool {
        eprintln!(
            "function is listening for a debugger on 127.0.0.1:{}",
            config.port
        );
        true
    }
}
