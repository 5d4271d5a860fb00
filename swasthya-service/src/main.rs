use service_core::config::get_optional_env;
use service_core::observability::init_tracing;
use swasthya_service::config::SwasthyaConfig;
use swasthya_service::services::init_metrics;
use swasthya_service::Application;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging comes up before config so configuration errors are logged too
    let log_level = get_optional_env("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
    let otlp_endpoint = get_optional_env("OTLP_ENDPOINT");
    init_tracing("swasthya-service", &log_level, otlp_endpoint.as_deref());
    init_metrics();

    let config = SwasthyaConfig::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let application = Application::build(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to build application");
        e
    })?;
    application.run_until_stopped().await?;

    tracing::info!("swasthya-service stopped");
    Ok(())
}
