use std::path::PathBuf;

use metrics_exporter_prometheus::PrometheusBuilder;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("bibscope server starting");

    let config_dir = std::env::var("BIBSCOPE_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let app_config = match bibscope_server::config::load_config(&config_dir) {
        Ok(config) => {
            tracing::info!("configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration — refusing to start");
            std::process::exit(1);
        }
    };

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus metrics recorder");

    let app = bibscope_server::build_router(&app_config.system, metrics_handle);

    let port: u16 = std::env::var("BIBSCOPE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8090);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind TCP listener");

    tracing::info!(port, "bibscope server listening");

    axum::serve(listener, app).await.expect("HTTP server error");
}
