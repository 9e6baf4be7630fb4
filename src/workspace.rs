use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("failed to allocate temporary workspace under {path}: {source}")]
    Allocate {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create workspace path {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Registers directories for removal when the surrounding session ends.
pub trait Disposer {
    fn add_folder(&self, path: &Path);
}

/// Records registered folders and removes them on `dispose` or drop.
#[derive(Debug, Default)]
pub struct FolderDisposer {
    folders: RefCell<Vec<PathBuf>>,
}

impl FolderDisposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn folders(&self) -> Vec<PathBuf> {
        self.folders.borrow().clone()
    }

    pub fn dispose(&self) {
        for folder in self.folders.borrow_mut().drain(..) {
            if folder.exists() {
                let _ = fs::remove_dir_all(&folder);
            }
        }
    }
}

impl Disposer for FolderDisposer {
    fn add_folder(&self, path: &Path) {
        self.folders.borrow_mut().push(path.to_path_buf());
    }
}

impl Drop for FolderDisposer {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Well-known paths inside one run's temporary directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    pub root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn input_template_path(&self) -> PathBuf {
        self.input_dir().join("input-template.yaml")
    }

    pub fn output_template_path(&self) -> PathBuf {
        self.output_dir().join("template.yaml")
    }

    pub fn event_path(&self) -> PathBuf {
        self.root.join("event.json")
    }

    pub fn env_vars_path(&self) -> PathBuf {
        self.root.join("env-vars.json")
    }
}

/// Lazily allocates the run's temporary directory and hands it to a `Disposer`.
pub struct WorkspaceManager<'a> {
    parent: Option<PathBuf>,
    disposer: &'a dyn Disposer,
    layout: Option<WorkspaceLayout>,
}

impl<'a> WorkspaceManager<'a> {
    pub fn new(disposer: &'a dyn Disposer) -> Self {
        Self {
            parent: None,
            disposer,
            layout: None,
        }
    }

    /// Allocates under `parent` instead of the system temp directory.
    pub fn within(parent: impl Into<PathBuf>, disposer: &'a dyn Disposer) -> Self {
        Self {
            parent: Some(parent.into()),
            disposer,
            layout: None,
        }
    }

    pub fn current(&self) -> Option<&WorkspaceLayout> {
        self.layout.as_ref()
    }

    pub fn ensure_workspace(&mut self) -> Result<WorkspaceLayout, WorkspaceError> {
        if let Some(layout) = &self.layout {
            return Ok(layout.clone());
        }

        let parent = self.parent.clone().unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&parent).map_err(|source| WorkspaceError::CreateDir {
            path: parent.display().to_string(),
            source,
        })?;
        let dir = tempfile::Builder::new()
            .prefix("samlocal-")
            .tempdir_in(&parent)
            .map_err(|source| WorkspaceError::Allocate {
                path: parent.display().to_string(),
                source,
            })?;
        let root = dir.into_path();
        self.disposer.add_folder(&root);

        let layout = WorkspaceLayout::new(root);
        self.layout = Some(layout.clone());
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn layout_paths_are_rooted_in_workspace() {
        let layout = WorkspaceLayout::new("/tmp/w");
        assert_eq!(
            layout.input_template_path(),
            PathBuf::from("/tmp/w/input/input-template.yaml")
        );
        assert_eq!(
            layout.output_template_path(),
            PathBuf::from("/tmp/w/output/template.yaml")
        );
        assert_eq!(layout.event_path(), PathBuf::from("/tmp/w/event.json"));
        assert_eq!(layout.env_vars_path(), PathBuf::from("/tmp/w/env-vars.json"));
    }

    #[test]
    fn ensure_workspace_allocates_once_and_registers() {
        let parent = tempdir().expect("tempdir");
        let disposer = FolderDisposer::new();
        let mut manager = WorkspaceManager::within(parent.path(), &disposer);
        assert!(manager.current().is_none());

        let first = manager.ensure_workspace().expect("first");
        let second = manager.ensure_workspace().expect("second");
        assert_eq!(first, second);
        assert!(first.root.is_dir());
        assert!(first.root.starts_with(parent.path()));
        assert_eq!(disposer.folders(), vec![first.root.clone()]);
    }

    #[test]
    fn disposer_removes_registered_folders() {
        let parent = tempdir().expect("tempdir");
        let disposer = FolderDisposer::new();
        let root = {
            let mut manager = WorkspaceManager::within(parent.path(), &disposer);
            manager.ensure_workspace().expect("workspace").root
        };
        fs::write(root.join("event.json"), "{}").expect("write");

        disposer.dispose();
        assert!(!root.exists());
        assert!(disposer.folders().is_empty());
    }
}
