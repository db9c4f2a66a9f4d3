use common::{Result, Sample, Thresholds};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::alert::{AlertEvent, AlertSink};
use crate::config::Config;
use crate::log_file::Logger;
use crate::metrics::MetricsSource;
use crate::store::SharedConfig;

/// 采样器状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SamplerState {
    Idle,
    Running,
    Stopped,
    Failed,
}

/// 采样参数
#[derive(Debug, Clone)]
pub struct SamplerSettings {
    pub interval: Duration,
    pub thresholds: Thresholds,
    /// 越界时是否发送告警
    pub alert_on_breach: bool,
    /// 越界样本额外再写一行
    pub duplicate_breach_entry: bool,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SamplerSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            interval: cfg.sample_interval(),
            thresholds: cfg.thresholds(),
            alert_on_breach: cfg.alert_on_breach,
            duplicate_breach_entry: cfg.duplicate_breach_entry,
        }
    }
}

/// 单次采样的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    pub sample: Sample,
    pub breach: bool,
    pub lines_written: usize,
    pub alerted: bool,
}

pub struct Sampler<S: MetricsSource> {
    source: S,
    settings: SamplerSettings,
    config: SharedConfig,
    logger: Logger,
    alert_sink: Option<Arc<dyn AlertSink>>,
    state: Arc<RwLock<SamplerState>>,
}

impl<S: MetricsSource> Sampler<S> {
    pub fn new(source: S, settings: SamplerSettings, config: SharedConfig) -> Self {
        Self {
            source,
            settings,
            config,
            logger: Logger::new(),
            alert_sink: None,
            state: Arc::new(RwLock::new(SamplerState::Idle)),
        }
    }

    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    /// 状态句柄，`run` 消费采样器后仍可查询
    pub fn state_handle(&self) -> Arc<RwLock<SamplerState>> {
        self.state.clone()
    }

    /// 采样一次并写日志。日志路径每次都从共享配置重新读取
    pub async fn tick(&mut self) -> Result<SampleReport> {
        info!("Monitoring...");

        let sample = self.source.sample()?;
        let breach = self.settings.thresholds.is_breached(&sample);
        debug!(
            "采样: cpu={}%, available={} MB, breach={}",
            sample.cpu_percent, sample.available_memory_mb, breach
        );

        let path = self.config.log_file_path().await;
        let message = sample.message();
        let mut lines_written = 0;

        if breach && self.settings.duplicate_breach_entry {
            self.logger.append(&path, &message)?;
            lines_written += 1;
        }
        self.logger.append(&path, &message)?;
        lines_written += 1;

        let mut alerted = false;
        if breach && self.settings.alert_on_breach {
            if let Some(sink) = &self.alert_sink {
                let event = AlertEvent::breach(&sample, &self.settings.thresholds);
                match sink.emit(&event).await {
                    Ok(()) => alerted = true,
                    Err(e) => warn!("发送告警失败 (source={}): {}", sink.source(), e),
                }
            }
        }

        Ok(SampleReport {
            sample,
            breach,
            lines_written,
            alerted,
        })
    }

    /// 循环采样直到 `token` 被取消；采样或写日志失败时返回错误并结束循环
    pub async fn run(mut self, token: CancellationToken) -> Result<()> {
        self.set_state(SamplerState::Running).await;
        info!(
            "🚀 采样器已启动: interval={:?}, log_file={}",
            self.settings.interval,
            self.config.log_file_path().await.display()
        );

        loop {
            if token.is_cancelled() {
                break;
            }

            if let Err(e) = self.tick().await {
                error!("采样循环终止: {}", e);
                self.set_state(SamplerState::Failed).await;
                return Err(e);
            }

            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(self.settings.interval) => {}
            }
        }

        info!("采样器已停止");
        self.set_state(SamplerState::Stopped).await;
        Ok(())
    }

    async fn set_state(&self, state: SamplerState) {
        let mut current = self.state.write().await;
        *current = state;
    }
}
