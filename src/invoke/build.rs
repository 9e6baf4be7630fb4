use super::{BuildArgs, InvokeError, SamCli};
use crate::shared::logging::{LogLevel, OutputChannel};
use crate::workspace::WorkspaceLayout;
use std::path::{Path, PathBuf};

/// Runs the build to completion and returns `output/template.yaml`. The path is not checked;
/// the build tool always writes its resolved template there.
pub fn build_template(
    sam: &dyn SamCli,
    channel: &dyn OutputChannel,
    code_root: &Path,
    input_template: &Path,
    layout: &WorkspaceLayout,
    manifest_path: Option<&Path>,
) -> Result<PathBuf, InvokeError> {
    let args = BuildArgs {
        build_dir: layout.output_dir(),
        base_dir: code_root.to_path_buf(),
        template_path: input_template.to_path_buf(),
        manifest_path: manifest_path.map(Path::to_path_buf),
    };

    channel.append_line(LogLevel::Info, "build.start", "Building SAM application...");
    let output = sam.build(&args)?;
    for stream in [&output.stdout, &output.stderr] {
        let text = stream.trim();
        if !text.is_empty() {
            channel.append_line(LogLevel::Info, "build.output", text);
        }
    }
    channel.append_line(LogLevel::Info, "build.complete", "Build complete.");

    Ok(layout.output_template_path())
}
