/// 共享数据模型
///
/// 定义采样、阈值、配置记录以及日志行的渲染规则

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::format_timestamp;

/// 默认日志文件路径（相对于工作目录）
pub const DEFAULT_LOG_FILE_PATH: &str = "SystemMonitorLog.txt";

/// CPU 高水位（百分比，严格大于才算越界）
pub const DEFAULT_CPU_THRESHOLD_PERCENT: f32 = 80.0;

/// 可用内存低水位（MB，严格小于才算越界）
pub const DEFAULT_MEMORY_THRESHOLD_MB: f32 = 1024.0;

/// 一次资源采样
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Local>,
    pub cpu_percent: f32,
    pub available_memory_mb: f32,
}

impl Sample {
    pub fn new(cpu_percent: f32, available_memory_mb: f32) -> Self {
        Self {
            timestamp: Local::now(),
            cpu_percent,
            available_memory_mb,
        }
    }

    /// 日志行中时间戳之后的部分
    pub fn message(&self) -> String {
        format!(
            "CPU Usage: {}%, RAM Available: {} MB",
            self.cpu_percent, self.available_memory_mb
        )
    }

    pub fn to_log_entry(&self) -> LogEntry {
        LogEntry {
            timestamp: self.timestamp,
            message: self.message(),
        }
    }
}

/// 越界判定阈值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub cpu_percent: f32,
    pub available_memory_mb: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_percent: DEFAULT_CPU_THRESHOLD_PERCENT,
            available_memory_mb: DEFAULT_MEMORY_THRESHOLD_MB,
        }
    }
}

impl Thresholds {
    /// `cpu > 上限` 或 `可用内存 < 下限`
    pub fn is_breached(&self, sample: &Sample) -> bool {
        sample.cpu_percent > self.cpu_percent
            || sample.available_memory_mb < self.available_memory_mb
    }
}

/// 持久化配置记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(rename = "LogFilePath")]
    pub log_file_path: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            log_file_path: DEFAULT_LOG_FILE_PATH.to_string(),
        }
    }
}

/// 日志文件中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", format_timestamp(&self.timestamp), self.message)
    }
}
