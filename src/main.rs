use std::net::SocketAddr;
use std::sync::Arc;

use http_push_server::logger::init_logger;
use http_push_server::prelude::*;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    init_logger();

    info!("Starting HTTP/2 push hint server");

    // 初始化配置
    let config = Config::load()?;
    config.validate()?;
    let addr: SocketAddr = config.bind_addr().parse()?;

    // 创建插件
    let files = Arc::new(FilePlugin::new(&config.server.root_dir));
    let push = Arc::new(PushPlugin::new(config.push.clone())?);

    let mut server = SegmentServer::new(addr);
    server.add_handler(files);
    server.add_hook(push);
    server.init_plugins().await?;

    // 启动健康检查
    start_health_check(server.clone());

    let result = server.run(wait_for_shutdown()).await;

    // 优雅关闭
    info!("Shutting down...");
    server.cleanup().await;
    info!("Shutdown complete");

    result.map_err(Into::into)
}

fn start_health_check(server: SegmentServer) {
    tokio::spawn(async move {
        let check_interval = std::time::Duration::from_secs(300); // 5 minutes
        loop {
            tokio::time::sleep(check_interval).await;
            let health_status = server.health_check().await;
            info!("Plugin health status: {:?}", health_status);
        }
    });
}

async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
