/// System Monitor
///
/// 后台采样进程：周期性记录 CPU 使用率与可用内存到日志文件

use std::future::Future;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

mod alert;
mod config;
mod log_file;
mod metrics;
mod sampler;
mod store;

use alert::{AlertSink, EventLogSink};
use metrics::SysinfoCollector;
use sampler::{Sampler, SamplerSettings};
use store::SharedConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cfg = config::Config::from_env()?;

    // 可以通过环境变量 RUST_LOG 覆盖日志级别，例如：
    // RUST_LOG=system_monitor=debug cargo run
    tracing_subscriber::fmt()
        .with_thread_ids(true)
        .with_line_number(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level)),
        )
        .init();

    info!("🚀 启动 System Monitor...");

    // 加载配置记录
    let shared = SharedConfig::default();
    if let Some(path) = &cfg.config_file {
        let outcome = shared.load_from(path).await;
        if !outcome.is_loaded() {
            warn!("沿用默认配置 ({:?}): {}", outcome, path.display());
        }
    }
    let log_path = shared.log_file_path().await;
    log_file::ensure_initialized(&log_path)?;
    info!("✅ 日志文件: {}", log_path.display());

    // 注册告警事件源
    let alert_sink: Arc<dyn AlertSink> = Arc::new(EventLogSink::new(cfg.event_source.clone()));
    alert_sink.register().await?;

    info!("📊 初始化指标收集器...");
    let sampler = Sampler::new(
        SysinfoCollector::new(),
        SamplerSettings::from(&cfg),
        shared.clone(),
    )
    .with_alert_sink(alert_sink);
    let state = sampler.state_handle();

    let token = CancellationToken::new();
    let task = tokio::spawn(sampler.run(token.clone()));

    println!("Press Enter to exit...");
    let task = wait_for_exit(task, spawn_keyboard_reader(), ctrl_c()).await;

    token.cancel();
    if let Some(task) = task {
        report(task.await);
    }

    if cfg.save_on_exit {
        if let Some(path) = &cfg.config_file {
            shared.save_to(path).await;
        }
    }

    info!("👋 System Monitor 已退出 (sampler={:?})", *state.read().await);
    Ok(())
}

type SamplerTask = JoinHandle<common::Result<()>>;

/// 键盘输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyboardEvent {
    Line,
    Closed,
}

/// 在独立线程上阻塞读 stdin，运行时退出时不需要等待这次读取
fn spawn_keyboard_reader() -> mpsc::UnboundedReceiver<KeyboardEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || forward_lines(std::io::stdin().lock(), &tx));
    if let Err(e) = spawned {
        warn!("无法启动输入线程，仅响应 Ctrl-C: {}", e);
    }
    rx
}

/// 每读到一行发送 `Line`，EOF 或读取失败时发送 `Closed` 并结束
fn forward_lines<R: BufRead>(mut reader: R, tx: &mpsc::UnboundedSender<KeyboardEvent>) {
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) | Err(_) => {
                let _ = tx.send(KeyboardEvent::Closed);
                return;
            }
            Ok(_) => {
                if tx.send(KeyboardEvent::Line).is_err() {
                    return;
                }
            }
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听 Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// 等待回车或 `shutdown`
///
/// stdin 关闭后只等 `shutdown`。采样任务提前结束时只报告结果，进程继续等待退出；
/// 此时返回 `None`，否则交还仍在运行的任务
async fn wait_for_exit<F>(
    mut task: SamplerTask,
    mut keyboard: mpsc::UnboundedReceiver<KeyboardEvent>,
    shutdown: F,
) -> Option<SamplerTask>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut keyboard_open = true;
    let mut finished = false;

    loop {
        tokio::select! {
            event = keyboard.recv(), if keyboard_open => match event {
                Some(KeyboardEvent::Line) => break,
                Some(KeyboardEvent::Closed) | None => {
                    keyboard_open = false;
                    info!("标准输入已关闭，按 Ctrl-C 退出");
                }
            },
            _ = &mut shutdown => break,
            result = &mut task, if !finished => {
                finished = true;
                report(result);
                warn!("采样已停止，按回车或 Ctrl-C 退出");
            }
        }
    }

    (!finished).then_some(task)
}

fn report(result: Result<common::Result<()>, tokio::task::JoinError>) {
    match result {
        Ok(Ok(())) => info!("采样器正常停止"),
        Ok(Err(e)) => error!("采样循环异常结束: {}", e),
        Err(e) => error!("采样任务崩溃: {}", e),
    }
}
