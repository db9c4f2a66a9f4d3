/// 告警通道
///
/// 独立于日志文件的离散告警，例如操作系统事件日志

pub mod event_log;

pub use event_log::EventLogSink;

use async_trait::async_trait;
use common::{Result, Sample, Thresholds};

/// 事件 ID
pub const BREACH_EVENT_ID: u32 = 101;

/// 事件分类
pub const BREACH_EVENT_CATEGORY: u16 = 1;

/// 一条告警，一律按 warning 级别发送
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub name: String,
    pub message: String,
    pub event_id: u32,
    pub category: u16,
}

impl AlertEvent {
    /// 阈值越界告警
    pub fn breach(sample: &Sample, thresholds: &Thresholds) -> Self {
        let mut reasons = Vec::new();
        if sample.cpu_percent > thresholds.cpu_percent {
            reasons.push(format!("CPU 使用率 {}% > {}%", sample.cpu_percent, thresholds.cpu_percent));
        }
        if sample.available_memory_mb < thresholds.available_memory_mb {
            reasons.push(format!(
                "可用内存 {} MB < {} MB",
                sample.available_memory_mb, thresholds.available_memory_mb
            ));
        }

        Self {
            name: "ThresholdBreach".to_string(),
            message: format!("{} ({})", sample.message(), reasons.join(", ")),
            event_id: BREACH_EVENT_ID,
            category: BREACH_EVENT_CATEGORY,
        }
    }
}

/// 告警接收端
#[async_trait]
pub trait AlertSink: Send + Sync + 'static {
    /// 注册事件源，已注册时为空操作
    async fn register(&self) -> Result<()>;

    /// 发送一条告警
    async fn emit(&self, event: &AlertEvent) -> Result<()>;

    /// 接收端名称
    fn source(&self) -> &str;
}
