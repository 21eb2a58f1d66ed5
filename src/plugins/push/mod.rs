use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use hyper::HeaderMap;
use tracing::info;

use crate::config::PushConfig;
use crate::error::PluginError;
use crate::plugin::{Plugin, ResponseHook};
use crate::push::{apply_push_header, PushHintBuilder};

/// 为成功的分片响应添加 `Link: rel=preload` 提示
#[derive(Debug)]
pub struct PushPlugin {
    builder: PushHintBuilder,
    hinted: AtomicU64,
}

impl PushPlugin {
    pub fn new(config: PushConfig) -> Result<Self, PluginError> {
        info!("Initializing PushPlugin, pushing {} resources ahead", config.push_ahead);
        Ok(Self {
            builder: PushHintBuilder::new(config)?,
            hinted: AtomicU64::new(0),
        })
    }

    /// 已添加推送提示的响应数
    pub fn hinted(&self) -> u64 {
        self.hinted.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Plugin for PushPlugin {
    fn name(&self) -> &str {
        "push"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    async fn init(&self) -> Result<(), PluginError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, PluginError> {
        info!("Push plugin stats: {} responses hinted", self.hinted());
        Ok(true)
    }
}

impl ResponseHook for PushPlugin {
    fn on_response(&self, path: &str, headers: &mut HeaderMap) -> bool {
        let applied = apply_push_header(headers, &self.builder, path);
        if applied {
            self.hinted.fetch_add(1, Ordering::Relaxed);
        }
        applied
    }
}
