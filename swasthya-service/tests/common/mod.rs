#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use swasthya_service::config::SwasthyaConfig;
use swasthya_service::services::{
    ChatGateway, FallbackResponder, IntentBackend, IntentProvider, MockTextProvider,
};
use swasthya_service::{build_router, AppState, Application};
use tower::ServiceExt;

/// Router over fresh in-memory state, simulated chatbot and mock generator.
pub fn test_router() -> Router {
    build_router(AppState::new(simulated_gateway()))
}

pub fn simulated_gateway() -> ChatGateway {
    ChatGateway::new(
        IntentBackend::Unconfigured(FallbackResponder::new()),
        Arc::new(MockTextProvider::new(true)),
    )
}

pub fn router_with_intent(provider: Arc<dyn IntentProvider>) -> Router {
    build_router(AppState::new(ChatGateway::new(
        IntentBackend::Configured(provider),
        Arc::new(MockTextProvider::new(true)),
    )))
}

/// Drive one request through the router and decode the JSON body.
pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, json)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::GET, uri, None).await
}

pub async fn post(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(router, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(router: &Router, uri: &str) -> (StatusCode, Value) {
    send(router, Method::POST, uri, None).await
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Serve the real application on a random port.
    pub async fn spawn() -> Self {
        let app = Application::build(SwasthyaConfig::for_local(0))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
