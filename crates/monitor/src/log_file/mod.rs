/// 日志文件
///
/// 只追加的文本日志：首次创建时写入两行文件头，之后每次调用追加一行

pub mod writer;

pub use writer::{ensure_initialized, Logger};
