/// 工具函数集合

use chrono::{DateTime, Local};

/// 日志文件头第一行
pub const LOG_HEADER_TITLE: &str = "System Monitor Log";

/// 日志文件头分隔线
pub const LOG_HEADER_SEPARATOR: &str = "-------------------";

/// 日志行时间戳格式（本地时间）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 格式化本地时间戳
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// 字节数换算为 MB
pub fn bytes_to_mb(bytes: u64) -> f32 {
    (bytes as f64 / 1024.0 / 1024.0) as f32
}

/// 格式化字节大小
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
