use chrono::Local;
use common::utils::{format_timestamp, LOG_HEADER_SEPARATOR, LOG_HEADER_TITLE};
use common::{Error, Result};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// 文件不存在时创建并写入文件头；已存在则什么都不做
pub fn ensure_initialized(path: &Path) -> Result<()> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("日志文件已存在: {}", path.display());
            return Ok(());
        }
        Err(e) => {
            error!("创建日志文件失败: {}: {}", path.display(), e);
            return Err(Error::log_write(path, e));
        }
    };

    writeln!(file, "{}", LOG_HEADER_TITLE)
        .and_then(|_| writeln!(file, "{}", LOG_HEADER_SEPARATOR))
        .map_err(|e| {
            error!("写入日志文件头失败: {}: {}", path.display(), e);
            Error::log_write(path, e)
        })?;

    info!("📝 已创建日志文件: {}", path.display());
    Ok(())
}

/// 追加一行 `<本地时间> - <message>`
///
/// 写入失败时先输出诊断信息再把错误返回给调用方，不做重试
pub fn append(path: &Path, message: &str) -> Result<()> {
    debug!("Attempting to log to file...");

    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| {
            writeln!(file, "{} - {}", format_timestamp(&Local::now()), message)
        });

    match result {
        Ok(()) => {
            debug!("Logged to file successfully: {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Error logging to file: {}", e);
            Err(Error::log_write(path, e))
        }
    }
}

/// 日志写入者
///
/// 所有追加都经由同一个 `Logger`，保证行顺序即写入顺序
#[derive(Debug, Default)]
pub struct Logger {
    initialized: HashSet<PathBuf>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 每个路径只初始化一次
    pub fn ensure_initialized(&mut self, path: &Path) -> Result<()> {
        if self.initialized.contains(path) {
            return Ok(());
        }
        ensure_initialized(path)?;
        self.initialized.insert(path.to_path_buf());
        Ok(())
    }

    pub fn append(&mut self, path: &Path, message: &str) -> Result<()> {
        self.ensure_initialized(path)?;
        append(path, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};

    /// 收集诊断输出
    #[derive(Clone, Default)]
    struct CapturedOutput(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedOutput {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedOutput {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// 在捕获诊断输出的订阅者下执行 `f`
    fn with_captured_diagnostics<T>(f: impl FnOnce() -> T) -> (T, String) {
        let output = CapturedOutput::default();
        let writer = output.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        (result, output.text())
    }

    #[test]
    fn test_initialize_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SystemMonitorLog.txt");

        ensure_initialized(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["System Monitor Log", "-------------------"]);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        ensure_initialized(&path).unwrap();
        append(&path, "first").unwrap();
        let before = fs::read_to_string(&path).unwrap();

        ensure_initialized(&path).unwrap();
        let after = fs::read_to_string(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_initialize_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "pre-existing\n").unwrap();

        ensure_initialized(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "pre-existing\n");
    }

    #[test]
    fn test_append_is_append_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        ensure_initialized(&path).unwrap();

        let mut previous = fs::read(&path).unwrap();
        for i in 0..3 {
            append(&path, &format!("CPU Usage: {}%, RAM Available: 2048 MB", i)).unwrap();
            let current = fs::read(&path).unwrap();
            assert!(current.len() > previous.len());
            assert_eq!(&current[..previous.len()], &previous[..]);
            previous = current;
        }

        let content = String::from_utf8(previous).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[2].ends_with(" - CPU Usage: 0%, RAM Available: 2048 MB"));
        assert!(lines[4].ends_with(" - CPU Usage: 2%, RAM Available: 2048 MB"));
    }

    #[test]
    fn test_append_to_invalid_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("log.txt");

        let err = append(&path, "hello").unwrap_err();
        assert!(matches!(err, Error::LogWrite { .. }));
    }

    #[test]
    fn test_logger_initializes_new_path_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut logger = Logger::new();

        logger.append(&path, "one").unwrap();
        logger.append(&path, "two").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "System Monitor Log");
        assert!(lines[3].ends_with(" - two"));
    }

    #[test]
    fn test_append_failure_is_reported_before_returning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("log.txt");

        let (result, diagnostics) = with_captured_diagnostics(|| append(&path, "hello"));

        assert!(matches!(result, Err(Error::LogWrite { .. })));
        assert!(diagnostics.contains("Attempting to log to file..."));
        let error_line = diagnostics
            .lines()
            .find(|line| line.contains("Error logging to file"))
            .expect("append failure should be reported");
        assert!(error_line.contains("ERROR"));
    }

    #[test]
    fn test_successful_append_reports_no_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");

        let (result, diagnostics) = with_captured_diagnostics(|| append(&path, "hello"));

        result.unwrap();
        assert!(diagnostics.contains("Logged to file successfully"));
        assert!(!diagnostics.contains("ERROR"));
    }
}
