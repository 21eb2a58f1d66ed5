use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use tracing::{debug, error, info, warn};

use crate::error::PluginError;
use crate::logger::log_request;
use crate::plugin::{MediaHandler, ResponseHook};

/// 媒体分片 HTTP 服务器。处理器生成响应体，钩子修改成功响应的头（如推送提示）。
///
/// 支持 HTTP/1.1 和 HTTP/2（prior knowledge）。是否真正推送由 HTTP/2 前端决定。
#[derive(Clone)]
pub struct SegmentServer {
    addr: SocketAddr,
    handlers: Vec<Arc<dyn MediaHandler>>,
    hooks: Vec<Arc<dyn ResponseHook>>,
}

impl SegmentServer {
    pub fn new(addr: SocketAddr) -> Self {
        info!("Creating new segment server on {}", addr);
        Self {
            addr,
            handlers: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn MediaHandler>) {
        info!("Adding new handler: {}", handler.name());
        self.handlers.push(handler);
    }

    pub fn add_hook(&mut self, hook: Arc<dyn ResponseHook>) {
        info!("Adding new response hook: {}", hook.name());
        self.hooks.push(hook);
    }

    pub async fn init_plugins(&self) -> Result<(), PluginError> {
        for handler in &self.handlers {
            handler.init().await?;
            info!("Initialized plugin {} v{}", handler.name(), handler.version());
        }
        for hook in &self.hooks {
            hook.init().await?;
            info!("Initialized plugin {} v{}", hook.name(), hook.version());
        }
        Ok(())
    }

    pub async fn cleanup(&self) {
        for handler in &self.handlers {
            if let Err(e) = handler.cleanup().await {
                error!("Error cleaning up plugin {}: {}", handler.name(), e);
            }
        }
        for hook in &self.hooks {
            if let Err(e) = hook.cleanup().await {
                error!("Error cleaning up plugin {}: {}", hook.name(), e);
            }
        }
    }

    pub async fn health_check(&self) -> Vec<(String, bool)> {
        let mut results = Vec::new();
        for handler in &self.handlers {
            let status = handler.health_check().await.unwrap_or(false);
            results.push((handler.name().to_string(), status));
        }
        for hook in &self.hooks {
            let status = hook.health_check().await.unwrap_or(false);
            results.push((hook.name().to_string(), status));
        }
        results
    }

    /// 绑定监听地址，返回实际地址和驱动服务器的 future，`shutdown` 完成时停止
    pub fn bind<F>(
        &self,
        shutdown: F,
    ) -> Result<(SocketAddr, impl Future<Output = Result<(), PluginError>>), PluginError>
    where
        F: Future<Output = ()>,
    {
        let handlers = self.handlers.clone();
        let hooks = self.hooks.clone();

        let make_svc = make_service_fn(move |conn: &AddrStream| {
            let remote_addr = conn.remote_addr();
            debug!("New connection from: {}", remote_addr);

            let handlers = handlers.clone();
            let hooks = hooks.clone();

            async move {
                Ok::<_, hyper::Error>(service_fn(move |req| {
                    debug!("Received request from {}: {} {}", remote_addr, req.method(), req.uri());
                    Self::handle_request(req, handlers.clone(), hooks.clone())
                }))
            }
        });

        let server = Server::try_bind(&self.addr)
            .map_err(|e| PluginError::Network(e.to_string()))?
            .serve(make_svc);
        let local_addr = server.local_addr();
        info!("Segment server is ready to accept connections on {}", local_addr);

        let graceful = server.with_graceful_shutdown(shutdown);
        Ok((local_addr, async move {
            graceful.await.map_err(|e| {
                error!("Server error: {}", e);
                PluginError::Network(e.to_string())
            })
        }))
    }

    #[tracing::instrument(skip(self, shutdown))]
    pub async fn run<F>(&self, shutdown: F) -> Result<(), PluginError>
    where
        F: Future<Output = ()>,
    {
        debug!("Registered handlers: {}, hooks: {}", self.handlers.len(), self.hooks.len());
        let (_, server) = self.bind(shutdown)?;
        server.await
    }

    pub(crate) async fn handle_request(
        req: Request<Body>,
        handlers: Vec<Arc<dyn MediaHandler>>,
        hooks: Vec<Arc<dyn ResponseHook>>,
    ) -> Result<Response<Body>, hyper::Error> {
        let started = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let (response, pushed) = if method != Method::GET && method != Method::HEAD {
            (status_response(StatusCode::METHOD_NOT_ALLOWED), false)
        } else {
            Self::dispatch(&method, &path, &handlers, &hooks).await
        };

        log_request(method.as_str(), &path, response.status().as_u16(), pushed, started.elapsed());
        Ok(response)
    }

    async fn dispatch(
        method: &Method,
        path: &str,
        handlers: &[Arc<dyn MediaHandler>],
        hooks: &[Arc<dyn ResponseHook>],
    ) -> (Response<Body>, bool) {
        for handler in handlers.iter().filter(|h| h.can_handle(path)) {
            let media = match handler.handle_request(path).await {
                Ok(media) => media,
                Err(PluginError::NotFound(_)) => continue,
                Err(PluginError::Forbidden(_)) => {
                    return (status_response(StatusCode::FORBIDDEN), false);
                }
                Err(e) => {
                    warn!("Handler {} failed for {}: {}", handler.name(), path, e);
                    return (status_response(StatusCode::INTERNAL_SERVER_ERROR), false);
                }
            };

            let length = media.body.len();
            let mut response = if method == Method::HEAD {
                Response::new(Body::empty())
            } else {
                Response::new(Body::from(media.body))
            };
            let headers = response.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(media.content_type));
            headers.insert(CONTENT_LENGTH, HeaderValue::from(length));

            let mut pushed = false;
            for hook in hooks {
                pushed |= hook.on_response(path, response.headers_mut());
            }
            return (response, pushed);
        }

        debug!("No handler found for request: {}", path);
        (status_response(StatusCode::NOT_FOUND), false)
    }
}

fn status_response(status: StatusCode) -> Response<Body> {
    let mut response = Response::new(Body::from(status.canonical_reason().unwrap_or("")));
    *response.status_mut() = status;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PushConfig;
    use crate::plugins::{FilePlugin, PushPlugin};
    use hyper::header::LINK;
    use hyper::Client;
    use std::path::{Path, PathBuf};

    fn temp_root() -> PathBuf {
        let root = std::env::temp_dir().join(format!("push-server-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("1/2/3/4")).unwrap();
        std::fs::write(root.join("1/2/3/4/5.mp4"), b"five").unwrap();
        std::fs::create_dir_all(root.join("video")).unwrap();
        std::fs::write(root.join("video/Manifest.mpd"), b"<MPD/>").unwrap();
        std::fs::write(root.join("video/abc.mp4"), b"abc").unwrap();
        root
    }

    fn parts(root: &Path) -> (Vec<Arc<dyn MediaHandler>>, Vec<Arc<dyn ResponseHook>>) {
        let files: Arc<dyn MediaHandler> = Arc::new(FilePlugin::new(root));
        let push: Arc<dyn ResponseHook> = Arc::new(PushPlugin::new(PushConfig::default()).unwrap());
        (vec![files], vec![push])
    }

    async fn request(root: &Path, method: Method, uri: &str) -> Response<Body> {
        let (handlers, hooks) = parts(root);
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        SegmentServer::handle_request(req, handlers, hooks).await.unwrap()
    }

    #[tokio::test]
    async fn test_segment_gets_push_hint() {
        let root = temp_root();
        let response = request(&root, Method::GET, "/1/2/3/4/5.mp4?token=x").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "video/mp4");
        assert_eq!(
            response.headers().get(LINK).unwrap(),
            "</1/2/3/4/6.mp4>; rel=preload, </1/2/3/4/7.mp4>; rel=preload, </1/2/3/4/8.mp4>; rel=preload"
        );
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"five");

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_manifest_and_named_resources_have_no_hint() {
        let root = temp_root();
        for uri in ["/video/Manifest.mpd", "/video/abc.mp4"] {
            let response = request(&root, Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers().get(LINK).is_none(), "{} got a Link header", uri);
        }
        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_missing_segment_has_no_hint() {
        let root = temp_root();
        let response = request(&root, Method::GET, "/1/2/3/4/9.mp4").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(LINK).is_none());
        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_head_and_method_handling() {
        let root = temp_root();

        let response = request(&root, Method::HEAD, "/1/2/3/4/5.mp4").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_LENGTH).unwrap(), "4");
        assert!(response.headers().get(LINK).is_some());
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(body.is_empty());

        let response = request(&root, Method::POST, "/1/2/3/4/5.mp4").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        std::fs::remove_dir_all(root).unwrap();
    }

    #[tokio::test]
    async fn test_serves_over_http2() {
        let root = temp_root();
        let mut server = SegmentServer::new("127.0.0.1:0".parse().unwrap());
        let (handlers, hooks) = parts(&root);
        handlers.into_iter().for_each(|h| server.add_handler(h));
        hooks.into_iter().for_each(|h| server.add_hook(h));
        server.init_plugins().await.unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let (addr, running) = server
            .bind(async {
                rx.await.ok();
            })
            .unwrap();
        let handle = tokio::spawn(running);

        let client = Client::builder().http2_only(true).build_http::<Body>();
        let uri = format!("http://{}/1/2/3/4/5.mp4", addr).parse().unwrap();
        let response = client.get(uri).await.unwrap();

        assert_eq!(response.version(), hyper::Version::HTTP_2);
        assert_eq!(
            response.headers().get(LINK).unwrap(),
            "</1/2/3/4/6.mp4>; rel=preload, </1/2/3/4/7.mp4>; rel=preload, </1/2/3/4/8.mp4>; rel=preload"
        );

        tx.send(()).ok();
        handle.abort();
        server.cleanup().await;
        std::fs::remove_dir_all(root).unwrap();
    }
}
