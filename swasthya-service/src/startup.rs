//! Application startup and lifecycle management.

use crate::config::SwasthyaConfig;
use crate::handlers::{chat, family, health, users};
use crate::services::{
    ChatGateway, DialogflowProvider, FallbackResponder, FamilyStore, GeminiTextProvider,
    IntentBackend, TextProvider, UserDirectory,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use service_core::observability::REQUEST_ID_HEADER;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
    pub family: Arc<FamilyStore>,
    pub chat: Arc<ChatGateway>,
}

impl AppState {
    /// Wire the seeded directory, an empty family store and the given gateway.
    pub fn new(chat: ChatGateway) -> Self {
        let directory = Arc::new(UserDirectory::seeded());
        Self {
            family: Arc::new(FamilyStore::new(directory.clone())),
            directory,
            chat: Arc::new(chat),
        }
    }

    /// Build upstream providers from configuration.
    pub fn from_config(config: &SwasthyaConfig) -> Result<Self, AppError> {
        let intent = match &config.dialogflow {
            Some(dialogflow) => {
                let provider = DialogflowProvider::new(dialogflow.clone())
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
                tracing::info!(
                    project = %dialogflow.project_id,
                    region = %dialogflow.region,
                    "Dialogflow intent provider initialized"
                );
                IntentBackend::Configured(Arc::new(provider))
            }
            None => {
                tracing::info!("DIALOGFLOW_PROJECT_ID not set, using simulated chatbot responses");
                IntentBackend::Unconfigured(FallbackResponder::new())
            }
        };

        let gemini = GeminiTextProvider::new(config.gemini.clone())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
        let text: Arc<dyn TextProvider> = Arc::new(gemini);

        Ok(Self::new(ChatGateway::new(intent, text)))
    }
}

/// Assemble routes and the middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics_endpoint))
        .route("/api/health", get(health::api_health))
        .route("/api/chatbot", post(chat::chatbot))
        .route("/api/gemini", post(chat::gemini))
        .route("/api/users/search", get(users::search_users))
        .route("/api/users/search/advanced", get(users::search_users_advanced))
        .route("/api/family/request", post(family::send_request))
        .route("/api/family/request/:id/accept", post(family::accept_request))
        .route("/api/family/request/:id/reject", post(family::reject_request))
        .route("/api/family/network", get(family::get_network))
        .route("/api/family/requests", get(family::get_requests))
        .route("/api/family/mutual-network", get(family::get_mutual_network))
        .layer(from_fn(metrics_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
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
        // Outside the trace layer so the span sees the minted id.
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: SwasthyaConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::with_state(config.common.port, state).await
    }

    /// Bind a listener for prepared state (port 0 = random port for testing).
    pub async fn with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            dialogflow = state.chat.intent_backend().status(),
            "swasthya-service listening"
        );

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Serve until SIGINT or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
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

    tracing::info!("Shutdown signal received");
}
