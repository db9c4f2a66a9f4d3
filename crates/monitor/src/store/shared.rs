/// 共享配置句柄
///
/// 采样器与外部重新配置调用共享同一份配置，只能通过显式的方法修改

use common::Configuration;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::config_store::{self, LoadOutcome};

#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<Configuration>>,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}

impl SharedConfig {
    pub fn new(configuration: Configuration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(configuration)),
        }
    }

    /// 当前配置的副本
    pub async fn snapshot(&self) -> Configuration {
        self.inner.read().await.clone()
    }

    pub async fn log_file_path(&self) -> PathBuf {
        PathBuf::from(&self.inner.read().await.log_file_path)
    }

    pub async fn replace(&self, configuration: Configuration) {
        let mut current = self.inner.write().await;
        *current = configuration;
    }

    /// 读文件时不持有写锁，解析成功后再整体替换
    pub async fn load_from(&self, path: &Path) -> LoadOutcome {
        let mut candidate = self.snapshot().await;
        let outcome = config_store::load(path, &mut candidate);
        if outcome.is_loaded() {
            self.replace(candidate).await;
        }
        outcome
    }

    pub async fn save_to(&self, path: &Path) -> bool {
        let current = self.snapshot().await;
        config_store::save(path, &current)
    }
}
