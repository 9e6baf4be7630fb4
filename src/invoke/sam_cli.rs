use super::{io_error, InvokeError};
use crate::config::constants::DEFAULT_SAM_CLI_BINARY;
use std::io::{BufReader, Read};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArgs {
    pub build_dir: PathBuf,
    pub base_dir: PathBuf,
    pub template_path: PathBuf,
    pub manifest_path: Option<PathBuf>,
}

impl BuildArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "--build-dir".to_string(),
            self.build_dir.display().to_string(),
            "--base-dir".to_string(),
            self.base_dir.display().to_string(),
            "--template".to_string(),
            self.template_path.display().to_string(),
        ];
        if let Some(manifest) = &self.manifest_path {
            args.push("--manifest".to_string());
            args.push(manifest.display().to_string());
        }
        args
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInvokeArgs {
    pub resource_name: String,
    pub template_path: PathBuf,
    pub event_path: PathBuf,
    pub env_vars_path: PathBuf,
    pub debug_port: Option<String>,
}

impl LocalInvokeArgs {
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "local".to_string(),
            "invoke".to_string(),
            self.resource_name.clone(),
            "--template".to_string(),
            self.template_path.display().to_string(),
            "--event".to_string(),
            self.event_path.display().to_string(),
            "--env-vars".to_string(),
            self.env_vars_path.display().to_string(),
        ];
        if let Some(port) = &self.debug_port {
            args.push("-d".to_string());
            args.push(port.clone());
        }
        args
    }
}

/// Output captured from a successful build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Handle to a resident process started by `launch_local_invoke`.
pub trait LaunchedTask {
    fn id(&self) -> Option<u32>;

    fn is_running(&mut self) -> bool;

    /// Blocks until the task exits and returns its exit code, if any.
    fn wait(&mut self) -> Result<Option<i32>, InvokeError>;

    fn terminate(&mut self) -> Result<(), InvokeError>;
}

/// The two command shapes the pipeline needs: run to completion, and launch and keep running.
pub trait SamCli {
    fn build(&self, args: &BuildArgs) -> Result<BuildOutput, InvokeError>;

    fn launch_local_invoke(
        &self,
        args: &LocalInvokeArgs,
    ) -> Result<Box<dyn LaunchedTask>, InvokeError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamCliProcess {
    pub binary: String,
}

impl Default for SamCliProcess {
    fn default() -> Self {
        Self {
            binary: DEFAULT_SAM_CLI_BINARY.to_string(),
        }
    }
}

impl SamCliProcess {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command_form(&self, args: &[String]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }

    fn spawn_error(&self, args: &[String], err: std::io::Error) -> InvokeError {
        if err.kind() == std::io::ErrorKind::NotFound {
            InvokeError::MissingBinary {
                binary: self.binary.clone(),
            }
        } else {
            InvokeError::Launch {
                command: self.command_form(args),
                source: err,
            }
        }
    }
}

impl SamCli for SamCliProcess {
    fn build(&self, args: &BuildArgs) -> Result<BuildOutput, InvokeError> {
        let argv = args.to_args();
        let mut child = Command::new(&self.binary)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| self.spawn_error(&argv, err))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            io_error(&args.base_dir, std::io::Error::other("missing stdout pipe"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            io_error(&args.base_dir, std::io::Error::other("missing stderr pipe"))
        })?;

        let stdout_reader = thread::spawn(move || {
            let mut buf = String::new();
            let _ = BufReader::new(stdout).read_to_string(&mut buf);
            buf
        });
        let stderr_reader = thread::spawn(move || {
            let mut buf = String::new();
            let _ = BufReader::new(stderr).read_to_string(&mut buf);
            buf
        });

        let status = child.wait().map_err(|e| io_error(&args.base_dir, e))?;
        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(InvokeError::BuildFailed {
                exit_code: status.code().unwrap_or(-1),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(BuildOutput { stdout, stderr })
    }

    fn launch_local_invoke(
        &self,
        args: &LocalInvokeArgs,
    ) -> Result<Box<dyn LaunchedTask>, InvokeError> {
        let argv = args.to_args();
        let child = Command::new(&self.binary)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| self.spawn_error(&argv, err))?;
        Ok(Box::new(ProcessTask {
            command_form: self.command_form(&argv),
            child,
        }))
    }
}

#[derive(Debug)]
pub struct ProcessTask {
    command_form: String,
    child: Child,
}

impl ProcessTask {
    pub fn command_form(&self) -> &str {
        &self.command_form
    }

    fn error(&self, source: std::io::Error) -> InvokeError {
        InvokeError::Launch {
            command: self.command_form.clone(),
            source,
        }
    }
}

impl LaunchedTask for ProcessTask {
    fn id(&self) -> Option<u32> {
        Some(self.child.id())
    }

    fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn wait(&mut self) -> Result<Option<i32>, InvokeError> {
        let status = self.child.wait().map_err(|e| self.error(e))?;
        Ok(status.code())
    }

    fn terminate(&mut self) -> Result<(), InvokeError> {
        if !self.is_running() {
            return Ok(());
        }
        self.child.kill().map_err(|e| self.error(e))?;
        self.child.wait().map_err(|e| self.error(e))?;
        Ok(())
    }
}
