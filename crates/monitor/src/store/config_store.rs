use common::{Configuration, Error, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 加载结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 已替换内存中的配置
    Loaded,
    /// 文件不存在，配置未变
    Missing,
    /// 文件内容无法解析，配置未变
    InvalidFormat,
    /// 读取失败，配置未变
    Failed(String),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded)
    }
}

/// 序列化为缩进 JSON 并整体覆盖写入。失败只记录，不向上传播
pub fn save(path: &Path, configuration: &Configuration) -> bool {
    match try_save(path, configuration) {
        Ok(()) => {
            info!("Configuration saved successfully: {}", path.display());
            true
        }
        Err(e) => {
            warn!("Error saving configuration: {}", e);
            false
        }
    }
}

fn try_save(path: &Path, configuration: &Configuration) -> Result<()> {
    let json = serde_json::to_string_pretty(configuration)?;
    fs::write(path, json).map_err(|e| Error::ConfigIo(format!("{}: {}", path.display(), e)))
}

/// 读取配置文件；只有解析成功时才修改 `configuration`
pub fn load(path: &Path, configuration: &mut Configuration) -> LoadOutcome {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("Configuration file does not exist: {}", path.display());
            return LoadOutcome::Missing;
        }
        Err(e) => {
            let err = Error::ConfigIo(format!("{}: {}", path.display(), e));
            warn!("Error loading configuration: {}", err);
            return LoadOutcome::Failed(err.to_string());
        }
    };

    match serde_json::from_str::<Configuration>(&json) {
        Ok(loaded) => {
            *configuration = loaded;
            info!(
                "Configuration loaded successfully: log_file_path={}",
                configuration.log_file_path
            );
            LoadOutcome::Loaded
        }
        Err(e) => {
            let err = Error::ConfigParse(e.to_string());
            warn!("Failed to load configuration. Invalid format: {}", err);
            LoadOutcome::InvalidFormat
        }
    }
}
