use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Log surface plus user-facing notifications. Implementations must not fail the caller.
pub trait OutputChannel {
    fn append_line(&self, level: LogLevel, event: &str, message: &str);

    fn show_error_message(&self, message: &str);
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Appends one JSON object per line to a log file and reports errors on stderr.
#[derive(Debug, Clone)]
pub struct JsonlOutputChannel {
    path: PathBuf,
    mirror_to_stderr: bool,
}

impl JsonlOutputChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mirror_to_stderr: false,
        }
    }

    pub fn mirrored(mut self) -> Self {
        self.mirror_to_stderr = true;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Error lines reach stderr through `show_error_message` only.
    fn mirrors(&self, level: LogLevel) -> bool {
        self.mirror_to_stderr && level != LogLevel::Error
    }
}

impl OutputChannel for JsonlOutputChannel {
    fn append_line(&self, level: LogLevel, event: &str, message: &str) {
        if self.mirrors(level) {
            eprintln!("[{level}] {message}");
        }

        let payload = serde_json::json!({
            "timestamp": now_secs(),
            "level": level.as_str(),
            "event": event,
            "message": message,
        });
        let Ok(line) = serde_json::to_string(&payload) else {
            return;
        };

        if let Some(parent) = self.path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        let Ok(mut file) = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        else {
            return;
        };
        let _ = writeln!(file, "{line}");
    }

    fn show_error_message(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedLine {
    pub level: LogLevel,
    pub event: String,
    pub message: String,
}

/// Keeps every line and notification in memory.
#[derive(Debug, Default)]
pub struct MemoryOutputChannel {
    lines: RefCell<Vec<LoggedLine>>,
    notifications: RefCell<Vec<String>>,
}

impl MemoryOutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<LoggedLine> {
        self.lines.borrow().clone()
    }

    pub fn lines_at(&self, level: LogLevel) -> Vec<LoggedLine> {
        self.lines
            .borrow()
            .iter()
            .filter(|line| line.level == level)
            .cloned()
            .collect()
    }

    pub fn events(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .map(|line| line.event.clone())
            .collect()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications.borrow().clone()
    }
}

impl OutputChannel for MemoryOutputChannel {
    fn append_line(&self, level: LogLevel, event: &str, message: &str) {
        self.lines.borrow_mut().push(LoggedLine {
            level,
            event: event.to_string(),
            message: message.to_string(),
        });
    }

    fn show_error_message(&self, message: &str) {
        self.notifications.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn jsonl_channel_appends_structured_lines() {
        let dir = tempdir().expect("tempdir");
        let channel = JsonlOutputChannel::new(dir.path().join("logs/samlocal.log"));
        channel.append_line(LogLevel::Info, "build.start", "building");
        channel.append_line(LogLevel::Error, "run.failed", "boom");

        let raw = fs::read_to_string(channel.path()).expect("read log");
        let lines: Vec<serde_json::Value> = raw
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "build.start");
        assert_eq!(lines[1]["level"], "error");
        assert_eq!(lines[1]["message"], "boom");
    }

    #[test]
    fn mirrored_channel_leaves_errors_to_notifications() {
        let plain = JsonlOutputChannel::new("/tmp/unused.log");
        assert!(!plain.mirrors(LogLevel::Info));

        let mirrored = plain.mirrored();
        assert!(mirrored.mirrors(LogLevel::Info));
        assert!(mirrored.mirrors(LogLevel::Warn));
        assert!(!mirrored.mirrors(LogLevel::Error));
    }

    #[test]
    fn memory_channel_filters_by_level() {
        let channel = MemoryOutputChannel::new();
        channel.append_line(LogLevel::Info, "a", "one");
        channel.append_line(LogLevel::Error, "b", "two");
        channel.show_error_message("three");

        assert_eq!(channel.lines().len(), 2);
        assert_eq!(channel.lines_at(LogLevel::Error)[0].message, "two");
        assert_eq!(channel.notifications(), vec!["three".to_string()]);
    }
}
