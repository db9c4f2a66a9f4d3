/// 指标采集
///
/// `MetricsSource` 隔离同步的系统查询，便于在测试中替换

pub mod collector;

pub use collector::SysinfoCollector;

use common::{Result, Sample};

/// 指标来源
pub trait MetricsSource: Send {
    /// 读取一次 CPU 使用率与可用内存。查询是同步的，应当很快返回
    fn sample(&mut self) -> Result<Sample>;
}
