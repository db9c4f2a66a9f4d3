/// 事件日志告警通道
///
/// 事件源只注册一次，告警以 warning 级别写入 `event_log` target

use async_trait::async_trait;
use common::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

use super::{AlertEvent, AlertSink};

pub struct EventLogSink {
    source: String,
    host: String,
    registered: AtomicBool,
}

impl EventLogSink {
    pub fn new(source: impl Into<String>) -> Self {
        let host = hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string());

        Self {
            source: source.into(),
            host,
            registered: AtomicBool::new(false),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }
}

#[async_trait]
impl AlertSink for EventLogSink {
    async fn register(&self) -> Result<()> {
        if self
            .registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            info!(target: "event_log", source = %self.source, host = %self.host, "已注册事件源");
        }
        Ok(())
    }

    async fn emit(&self, event: &AlertEvent) -> Result<()> {
        if !self.is_registered() {
            return Err(Error::Alert(format!("事件源 {} 尚未注册", self.source)));
        }

        warn!(
            target: "event_log",
            source = %self.source,
            host = %self.host,
            event_id = event.event_id,
            category = event.category,
            event_name = %event.name,
            "{}", event.message
        );
        Ok(())
    }

    fn source(&self) -> &str {
        &self.source
    }
}
