use std::path::PathBuf;

use thiserror::Error;

/// 统一错误类型
#[derive(Error, Debug)]
pub enum Error {
    /// 无法从操作系统读取指标
    #[error("指标不可用: {0}")]
    MetricsUnavailable(String),

    /// 日志文件创建或追加失败
    #[error("日志写入失败 ({}): {source}", .path.display())]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件读写错误: {0}")]
    ConfigIo(String),

    #[error("配置文件格式无效: {0}")]
    ConfigParse(String),

    #[error("告警通道错误: {0}")]
    Alert(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// 构造日志写入错误
    pub fn log_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::LogWrite {
            path: path.into(),
            source,
        }
    }
}

/// 统一结果类型
pub type Result<T> = std::result::Result<T, Error>;
