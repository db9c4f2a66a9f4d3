/// 指标收集器
///
/// 使用 sysinfo 收集 CPU 使用率与可用内存

use common::utils::{bytes_to_mb, format_bytes};
use common::{Error, Result, Sample};
use sysinfo::System;
use tracing::debug;

use super::MetricsSource;

pub struct SysinfoCollector {
    system: System,
}

impl SysinfoCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        // CPU 使用率需要两次刷新之间的差值，先做一次基线刷新
        system.refresh_cpu_usage();
        system.refresh_memory();
        debug!(
            "指标收集器已初始化: cpus={}, memory_total={}",
            system.cpus().len(),
            format_bytes(system.total_memory())
        );
        Self { system }
    }

    /// 刷新系统信息
    pub fn refresh(&mut self) {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();
    }

    /// 获取 CPU 使用率
    pub fn cpu_usage(&self) -> f32 {
        self.system.global_cpu_usage()
    }

    /// 获取内存信息 (total, available)，单位字节
    pub fn memory_usage(&self) -> (u64, u64) {
        (self.system.total_memory(), self.system.available_memory())
    }
}

impl Default for SysinfoCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SysinfoCollector {
    fn sample(&mut self) -> Result<Sample> {
        self.refresh();

        if self.system.cpus().is_empty() {
            return Err(Error::MetricsUnavailable("未检测到 CPU".to_string()));
        }

        let (total, available) = self.memory_usage();
        if total == 0 {
            return Err(Error::MetricsUnavailable("无法读取内存总量".to_string()));
        }

        let cpu = self.cpu_usage();
        if !cpu.is_finite() {
            return Err(Error::MetricsUnavailable(format!("CPU 使用率读数异常: {}", cpu)));
        }

        Ok(Sample::new(cpu, bytes_to_mb(available)))
    }
}
