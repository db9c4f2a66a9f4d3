/// 配置存储
///
/// 配置记录的加载与保存。所有错误都在本模块内部消化，只通过诊断输出和返回的结果枚举体现

pub mod config_store;
pub mod shared;

pub use shared::SharedConfig;
