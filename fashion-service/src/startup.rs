use crate::config::FashionConfig;
use crate::handlers;
use crate::services::{FashionStore, MongoFashionStore, UploadDecoder};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, Request},
    middleware::from_fn,
    routing::get,
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{metrics_middleware, request_id_middleware, REQUEST_ID_HEADER};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FashionStore>,
    pub decoder: UploadDecoder,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Connects to MongoDB, then binds. An unreachable store fails the build.
    pub async fn build(config: FashionConfig) -> Result<Self, AppError> {
        let store = MongoFashionStore::connect(
            &config.mongodb.uri,
            &config.mongodb.database,
            &config.mongodb.collection,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::ServiceUnavailable
        })?;

        Self::build_with_store(config, Arc::new(store)).await
    }

    pub async fn build_with_store(
        config: FashionConfig,
        store: Arc<dyn FashionStore>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            store,
            decoder: UploadDecoder::new(config.upload.max_bytes),
        };

        let app = build_router(state, &config)?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

pub fn build_router(state: AppState, config: &FashionConfig) -> Result<Router, AppError> {
    let cors = build_cors_layer(&config.cors.allowed_origin)?;
    let body_limit = state.decoder.body_limit();

    let app = Router::new()
        .route("/", get(handlers::index))
        .route(
            "/fashions",
            get(handlers::list_fashions).post(handlers::create_fashion),
        )
        .route("/fashions/:id", get(handlers::get_fashion))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(cors)
        .with_state(state);

    Ok(app)
}

/// Single-origin policy. PUT and DELETE are advertised even though only GET
/// and POST are routed.
fn build_cors_layer(origin: &str) -> Result<CorsLayer, AppError> {
    let origin = origin.parse::<HeaderValue>().map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}
