//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::any::Any;
use std::net::SocketAddr;

use axum::{Router, middleware, response::IntoResponse, response::Response, routing::get};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::core::{Config, ServerState};
use crate::middleware::logging_middleware;
use crate::utils::{AppError, AppResult};

/// Build the application router with state applied
///
/// 层顺序 (外 → 内): catch-panic → CORS → request id → 请求日志 → 路由守卫 → handler
pub fn build_app(state: ServerState) -> Router {
    Router::<ServerState>::new()
        .merge(crate::api::health::router())
        .merge(crate::api::auth::router())
        .merge(crate::api::users::router(&state))
        .merge(crate::api::menu::router())
        .merge(crate::api::reviews::router())
        .merge(crate::api::carts::router(&state))
        .merge(crate::api::collections::router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // Liveness probe sits outside the request log
        .route("/", get(crate::api::health::liveness))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::custom(panic_response))
}

/// 未捕获的 panic 统一转成 500，细节只进日志
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::internal(format!("handler panicked: {detail}")).into_response()
}

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(self) -> AppResult<()> {
        let Self { config, state } = self;
        let app = build_app(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

        tracing::info!(
            environment = %config.environment,
            "Bistro server listening on {}",
            addr
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

        // The router (and its clones of the handle) is gone at this point
        drop(state);
        tracing::info!("Database connection released, server stopped");

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
