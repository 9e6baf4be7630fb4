use super::{DescriptorError, SamTemplate, TemplateResource};
use std::fs;
use std::path::{Path, PathBuf};

/// A serverless function found in a template inside the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedFunction {
    pub template_path: PathBuf,
    pub resource_name: String,
    pub handler: String,
    pub resource: TemplateResource,
}

pub trait HandlerDiscovery {
    fn detect_local_functions(
        &self,
        workspaces: &[PathBuf],
    ) -> Result<Vec<DetectedFunction>, DescriptorError>;
}

const TEMPLATE_FILE_NAMES: &[&str] = &["template.yaml", "template.yml"];
const SKIPPED_DIRECTORIES: &[&str] = &[".aws-sam", "node_modules", "target"];

/// Walks workspace folders for SAM templates and reports every function that declares a
/// `Handler`. Templates that fail to parse are skipped.
#[derive(Debug, Clone, Default)]
pub struct TemplateFileDiscovery;

impl TemplateFileDiscovery {
    pub fn new() -> Self {
        Self
    }

    pub fn find_templates(&self, root: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        collect_templates(root, &mut found);
        found
    }
}

impl HandlerDiscovery for TemplateFileDiscovery {
    fn detect_local_functions(
        &self,
        workspaces: &[PathBuf],
    ) -> Result<Vec<DetectedFunction>, DescriptorError> {
        let mut detected = Vec::new();
        for workspace in workspaces {
            for template_path in self.find_templates(workspace) {
                let Ok(template) = SamTemplate::from_path(&template_path) else {
                    continue;
                };
                for (name, resource) in template.serverless_functions() {
                    let Some(handler) = resource.properties.handler.clone() else {
                        continue;
                    };
                    detected.push(DetectedFunction {
                        template_path: template_path.clone(),
                        resource_name: name.clone(),
                        handler,
                        resource: resource.clone(),
                    });
                }
            }
        }
        Ok(detected)
    }
}

fn collect_templates(dir: &Path, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = entries.filter_map(Result::ok).collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut subdirs = Vec::new();
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRECTORIES.contains(&name.as_str()) {
                continue;
            }
            subdirs.push(path);
        } else if file_type.is_file() && TEMPLATE_FILE_NAMES.contains(&name.as_str()) {
            found.push(path);
        }
    }
    for subdir in subdirs {
        collect_templates(&subdir, found);
    }
}
