use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::PluginError;
use crate::plugin::{MediaHandler, MediaResponse, Plugin};
use crate::push::decompose_path;
use crate::utils::{content_type_for, safe_join};

/// 从根目录提供分片和清单文件
#[derive(Debug, Clone)]
pub struct FilePlugin {
    root: PathBuf,
    state: Arc<RwLock<FileState>>,
}

#[derive(Debug, Default)]
struct FileState {
    served: u64,
    bytes_served: u64,
}

impl FilePlugin {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        info!("Initializing FilePlugin with root: {:?}", root.as_ref());
        Self {
            root: root.as_ref().to_owned(),
            state: Arc::new(RwLock::new(FileState::default())),
        }
    }

    pub async fn served(&self) -> (u64, u64) {
        let state = self.state.read().await;
        (state.served, state.bytes_served)
    }
}

#[async_trait]
impl Plugin for FilePlugin {
    fn name(&self) -> &str {
        "files"
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    async fn init(&self) -> Result<(), PluginError> {
        let metadata = tokio::fs::metadata(&self.root).await?;
        if !metadata.is_dir() {
            return Err(PluginError::Plugin(format!(
                "segment root {:?} is not a directory",
                self.root
            )));
        }
        info!("Serving segments from {:?}", self.root);
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, PluginError> {
        let (served, bytes) = self.served().await;
        info!("File plugin stats: {} files, {} bytes served", served, bytes);
        Ok(tokio::fs::metadata(&self.root).await.map(|m| m.is_dir()).unwrap_or(false))
    }
}

#[async_trait]
impl MediaHandler for FilePlugin {
    fn can_handle(&self, path: &str) -> bool {
        path.starts_with('/')
    }

    async fn handle_request(&self, path: &str) -> Result<MediaResponse, PluginError> {
        let file_path = safe_join(&self.root, path).ok_or_else(|| {
            warn!("Rejected path outside of segment root: {}", path);
            PluginError::Forbidden(path.to_string())
        })?;

        let data = match tokio::fs::read(&file_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No file for {}: {}", path, e);
                return Err(PluginError::NotFound(path.to_string()));
            }
            Err(e) => {
                // 目录在 Unix 上读取失败的错误类型不统一
                let is_dir = tokio::fs::metadata(&file_path)
                    .await
                    .map(|m| m.is_dir())
                    .unwrap_or(false);
                if is_dir {
                    debug!("{} is a directory", path);
                    return Err(PluginError::NotFound(path.to_string()));
                }
                return Err(e.into());
            }
        };

        let mut state = self.state.write().await;
        state.served += 1;
        state.bytes_served += data.len() as u64;
        debug!("Serving {} ({} bytes)", path, data.len());

        Ok(MediaResponse {
            content_type: content_type_for(decompose_path(path).extension()),
            body: Bytes::from(data),
        })
    }
}
