use super::build::build_template;
use super::debugger::{AttachOutcome, DebuggerHost};
use super::local_run::{invoke_local, LocalRunContext};
use super::{InvocationRequest, InvokeError, LaunchedTask, SamCli};
use crate::config::SettingsStore;
use crate::descriptor::{synthesize_template, HandlerDiscovery};
use crate::shared::logging::{LogLevel, OutputChannel};
use crate::workspace::{Disposer, WorkspaceLayout, WorkspaceManager};
use std::path::PathBuf;

/// External collaborators for one run.
#[derive(Clone, Copy)]
pub struct InvokeEnv<'a> {
    pub sam: &'a dyn SamCli,
    pub discovery: &'a dyn HandlerDiscovery,
    pub settings: &'a dyn SettingsStore,
    pub debugger: &'a dyn DebuggerHost,
    pub disposer: &'a dyn Disposer,
    pub channel: &'a dyn OutputChannel,
}

/// Optional callbacks: `on_did_build` runs right after a successful build,
/// `on_will_attach_debugger` right before the attach request.
#[derive(Default)]
pub struct InvokeHooks<'a> {
    pub on_did_build: Option<Box<dyn Fn() + 'a>>,
    pub on_will_attach_debugger: Option<Box<dyn Fn() + 'a>>,
}

/// Synthesize, build, run locally and optionally attach a debugger for a single handler.
pub struct LocalInvoke<'a> {
    request: InvocationRequest,
    env: InvokeEnv<'a>,
    hooks: InvokeHooks<'a>,
    workspace: WorkspaceManager<'a>,
    task: Option<Box<dyn LaunchedTask>>,
    attach: Option<AttachOutcome>,
}

impl<'a> LocalInvoke<'a> {
    /// Fails before any stage runs if the request is unusable, e.g. debugging without a port.
    pub fn new(request: InvocationRequest, env: InvokeEnv<'a>) -> Result<Self, InvokeError> {
        request.validate()?;
        Ok(Self {
            request,
            env,
            hooks: InvokeHooks::default(),
            workspace: WorkspaceManager::new(env.disposer),
            task: None,
            attach: None,
        })
    }

    pub fn with_hooks(mut self, hooks: InvokeHooks<'a>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_workspace_parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.workspace = WorkspaceManager::within(parent, self.env.disposer);
        self
    }

    pub fn request(&self) -> &InvocationRequest {
        &self.request
    }

    pub fn workspace(&self) -> Option<&WorkspaceLayout> {
        self.workspace.current()
    }

    pub fn attach_outcome(&self) -> Option<AttachOutcome> {
        self.attach
    }

    /// Hands the resident local-invoke task to the caller. It is left running after a failed
    /// attach or port-wait timeout.
    pub fn take_task(&mut self) -> Option<Box<dyn LaunchedTask>> {
        self.task.take()
    }

    /// Runs the whole pipeline. Failures are logged and shown to the user, never returned.
    pub fn run(&mut self) {
        if let Err(err) = self.execute() {
            let message = format!("Error running local SAM application: {err}");
            self.env
                .channel
                .append_line(LogLevel::Error, "run.failed", &message);
            self.env.channel.show_error_message(&message);
        }
    }

    fn execute(&mut self) -> Result<(), InvokeError> {
        let layout = self.workspace.ensure_workspace()?;

        let input_template = synthesize_template(
            &self.request.synthesis_request(),
            self.env.discovery,
            &layout,
        )?;

        let output_template = build_template(
            self.env.sam,
            self.env.channel,
            &self.request.code_root,
            &input_template,
            &layout,
            self.request.manifest_path.as_deref(),
        )?;
        if let Some(hook) = &self.hooks.on_did_build {
            hook();
        }

        let ctx = LocalRunContext {
            sam: self.env.sam,
            settings: self.env.settings,
            debugger: self.env.debugger,
            channel: self.env.channel,
        };
        self.attach = invoke_local(
            &ctx,
            &self.request,
            &layout,
            &output_template,
            self.hooks.on_will_attach_debugger.as_deref(),
            &mut self.task,
        )?;
        Ok(())
    }
}
