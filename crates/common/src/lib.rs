/// System Monitor - 公共库
///
/// 提供采样进程共享的数据模型、错误处理、工具函数等

pub mod errors;
pub mod models;
pub mod utils;

// 重新导出常用类型
pub use errors::{Error, Result};
pub use models::{Configuration, LogEntry, Sample, Thresholds};
