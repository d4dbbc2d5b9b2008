//! 路由装配：供本进程监听或由外部宿主挂载。

use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension, connect_info::ConnectInfo};
use axum::http::Request;
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{Level, info_span};

use crate::config::MULTIPART_OVERHEAD;
use crate::drive::DriveStore;
use crate::http::resolve_client_ip;
use crate::transfer::{self, TransferConfig};
use crate::version;

/// 构建完整的 Router。
pub fn build_router(
    drive: Arc<dyn DriveStore>,
    transfer_config: Arc<TransferConfig>,
    cors_layer: Option<CorsLayer>,
) -> Router {
    let upload_limit = transfer_config.max_file_size + MULTIPART_OVERHEAD;
    let mut app = Router::new()
        .route(
            "/upload",
            post(transfer::upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/delete", post(transfer::delete_file))
        .route("/version", get(version::get_version_info))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let connect_ip = request
                        .extensions()
                        .get::<ConnectInfo<SocketAddr>>()
                        .map(|ConnectInfo(addr)| addr.ip());
                    let client_ip = resolve_client_ip(request.headers(), connect_ip)
                        .map(|ip| ip.to_string())
                        .unwrap_or_else(|| "unknown".to_string());

                    info_span!(
                        env!("CARGO_CRATE_NAME"),
                        client_ip,
                        method = ?request.method(),
                        path = ?request.uri().path(),
                    )
                })
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .layer(Extension(drive))
        .layer(Extension(transfer_config));

    if let Some(cors_layer) = cors_layer {
        app = app.layer(cors_layer);
    }
    app
}
