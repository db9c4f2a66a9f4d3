/// 采样器
///
/// 进程中唯一的主动组件：周期性采样、判定阈值、写日志

pub mod runner;

pub use runner::{Sampler, SamplerSettings};
