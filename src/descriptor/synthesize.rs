use super::{DescriptorError, HandlerDiscovery, SamTemplate};
use crate::config::constants::TEMPLATE_RESOURCE_NAME;
use crate::workspace::WorkspaceLayout;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub code_root: PathBuf,
    pub document: PathBuf,
    pub handler_name: String,
    pub runtime: String,
    pub workspace_folder: Option<PathBuf>,
}

/// Writes the single-function descriptor to `input/input-template.yaml` and returns its path.
///
/// When a workspace is known, a locally detected function with the same relative handler
/// donates its `Environment` block verbatim.
pub fn synthesize_template(
    request: &SynthesisRequest,
    discovery: &dyn HandlerDiscovery,
    layout: &WorkspaceLayout,
) -> Result<PathBuf, DescriptorError> {
    let handler = relative_function_handler(
        &request.code_root,
        &request.document,
        &request.handler_name,
    );

    let mut environment = None;
    if let Some(workspace) = &request.workspace_folder {
        let detected = discovery.detect_local_functions(std::slice::from_ref(workspace))?;
        if let Some(existing) = detected.into_iter().find(|f| f.handler == handler) {
            environment = existing.resource.properties.environment;
        }
    }

    let template = SamTemplate::single_function(
        TEMPLATE_RESOURCE_NAME,
        &request.code_root,
        &handler,
        &request.runtime,
        environment,
    );
    let path = layout.input_template_path();
    template.write_to(&path)?;
    Ok(path)
}

/// `<document dir relative to code_root>/<handler_name>`, lexically normalized, with `/` as the
/// only separator.
pub fn relative_function_handler(code_root: &Path, document: &Path, handler_name: &str) -> String {
    let document_dir = document.parent().unwrap_or_else(|| Path::new(""));
    let relative = relative_path(code_root, document_dir);
    let joined = if relative.is_empty() {
        handler_name.to_string()
    } else {
        format!("{relative}/{handler_name}")
    };
    normalize_handler_path(&joined)
}

/// Resolves `.` and `..` segments and joins with a single `/`. Leading `..` segments that cannot
/// be resolved are kept.
fn normalize_handler_path(raw: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in raw.split(|c: char| c == '/' || c == '\\') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    parts.join("/")
}

fn relative_path(from: &Path, to: &Path) -> String {
    let from = lexical_parts(from);
    let to = lexical_parts(to);
    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    parts.extend(std::iter::repeat("..".to_string()).take(from.len() - common));
    parts.extend(to[common..].iter().map(|p| p.to_string_lossy().into_owned()));
    parts.join("/")
}

fn lexical_parts(path: &Path) -> Vec<OsString> {
    let mut parts: Vec<OsString> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_os_string()),
            Component::RootDir => parts.push(OsString::from("/")),
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(last) if last != ".." && last != "/" => {
                    parts.pop();
                }
                Some(last) if last == "/" => {}
                _ => parts.push(OsString::from("..")),
            },
            Component::Normal(v) => parts.push(v.to_os_string()),
        }
    }
    parts
}
