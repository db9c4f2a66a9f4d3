/// 配置管理
///
/// 进程级设置全部来自环境变量，未设置时的默认值即标准行为

use common::models::{DEFAULT_CPU_THRESHOLD_PERCENT, DEFAULT_MEMORY_THRESHOLD_MB};
use common::{Error, Result, Thresholds};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// 默认采样间隔（毫秒）
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 10_000;

/// 默认事件源名称
pub const DEFAULT_EVENT_SOURCE: &str = "SystemMonitorLog";

#[derive(Debug, Clone)]
pub struct Config {
    /// 启动时加载的配置文件
    pub config_file: Option<PathBuf>,
    /// 退出时是否回写配置文件
    pub save_on_exit: bool,
    pub sample_interval_ms: u64,
    pub cpu_threshold_percent: f32,
    pub memory_threshold_mb: f32,
    /// 越界时是否向告警通道发送警告
    pub alert_on_breach: bool,
    /// 越界样本是否重复写一行，默认开启，设为 false 时每个样本只写一行
    pub duplicate_breach_entry: bool,
    pub event_source: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: None,
            save_on_exit: false,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            cpu_threshold_percent: DEFAULT_CPU_THRESHOLD_PERCENT,
            memory_threshold_mb: DEFAULT_MEMORY_THRESHOLD_MB,
            alert_on_breach: false,
            duplicate_breach_entry: true,
            event_source: DEFAULT_EVENT_SOURCE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config_file = lookup("MONITOR_CONFIG_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let save_on_exit = parse_or(&lookup, "MONITOR_SAVE_ON_EXIT", defaults.save_on_exit)?;

        let sample_interval_ms =
            parse_or(&lookup, "SAMPLE_INTERVAL_MS", defaults.sample_interval_ms)?;
        if sample_interval_ms == 0 {
            return Err(Error::Config("SAMPLE_INTERVAL_MS 必须大于 0".to_string()));
        }

        let cpu_threshold_percent =
            parse_or(&lookup, "CPU_THRESHOLD_PERCENT", defaults.cpu_threshold_percent)?;
        let memory_threshold_mb =
            parse_or(&lookup, "MEMORY_THRESHOLD_MB", defaults.memory_threshold_mb)?;

        let alert_on_breach = parse_or(&lookup, "ALERT_ON_BREACH", defaults.alert_on_breach)?;
        let duplicate_breach_entry = parse_or(
            &lookup,
            "DUPLICATE_BREACH_ENTRY",
            defaults.duplicate_breach_entry,
        )?;

        let event_source = lookup("EVENT_SOURCE").unwrap_or(defaults.event_source);

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            config_file,
            save_on_exit,
            sample_interval_ms,
            cpu_threshold_percent,
            memory_threshold_mb,
            alert_on_breach,
            duplicate_breach_entry,
            event_source,
            log_level,
        })
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            cpu_percent: self.cpu_threshold_percent,
            available_memory_mb: self.memory_threshold_mb,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} 的值无效 '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg.sample_interval(), Duration::from_secs(10));
        assert_eq!(cfg.thresholds(), Thresholds::default());
        assert!(!cfg.alert_on_breach);
        assert!(cfg.duplicate_breach_entry);
        assert!(cfg.config_file.is_none());
        assert_eq!(cfg.event_source, "SystemMonitorLog");
    }

    #[test]
    fn test_overrides() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("MONITOR_CONFIG_FILE", "monitor.json"),
            ("SAMPLE_INTERVAL_MS", "250"),
            ("CPU_THRESHOLD_PERCENT", "95.5"),
            ("ALERT_ON_BREACH", "true"),
            ("DUPLICATE_BREACH_ENTRY", "false"),
        ]))
        .unwrap();
        assert_eq!(cfg.config_file, Some(PathBuf::from("monitor.json")));
        assert_eq!(cfg.sample_interval_ms, 250);
        assert_eq!(cfg.cpu_threshold_percent, 95.5);
        assert_eq!(cfg.memory_threshold_mb, 1024.0);
        assert!(cfg.alert_on_breach);
        assert!(!cfg.duplicate_breach_entry);
    }

    #[test]
    fn test_invalid_number_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[("SAMPLE_INTERVAL_MS", "soon")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = Config::from_lookup(lookup_from(&[("SAMPLE_INTERVAL_MS", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
