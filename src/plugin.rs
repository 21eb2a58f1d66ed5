use async_trait::async_trait;
use bytes::Bytes;
use hyper::HeaderMap;

use crate::error::PluginError;

#[async_trait]
pub trait Plugin: Send + Sync {
    /// 获取插件名称
    fn name(&self) -> &str;

    /// 获取插件版本
    fn version(&self) -> &str;

    /// 初始化插件
    async fn init(&self) -> Result<(), PluginError>;

    /// 清理插件资源
    async fn cleanup(&self) -> Result<(), PluginError> {
        Ok(())
    }

    /// 健康检查
    async fn health_check(&self) -> Result<bool, PluginError> {
        Ok(true)
    }
}

/// 资源的响应体和 Content-Type
#[derive(Debug, Clone)]
pub struct MediaResponse {
    pub body: Bytes,
    pub content_type: &'static str,
}

/// 根据请求路径生成响应体
#[async_trait]
pub trait MediaHandler: Plugin {
    fn can_handle(&self, path: &str) -> bool;

    async fn handle_request(&self, path: &str) -> Result<MediaResponse, PluginError>;
}

/// 在每个成功响应发送前调用
pub trait ResponseHook: Plugin {
    /// 返回是否修改了 `headers`
    fn on_response(&self, path: &str, headers: &mut HeaderMap) -> bool;
}
