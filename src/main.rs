use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use todo_rest::{SharedData, app_env, db, logging, persistence};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if dotenv().is_err() {
        println!("Starting server without .env file.");
    }
    let env_filter = logging::init_env_filter()?;

    let config = match app_env::AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            // Logging isn't set up yet, so fall back to stderr
            eprintln!("Invalid configuration: {err}");
            return Err(err.into());
        }
    };

    let otel_exporters = config
        .otel
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    let telemetry = logging::setup_logging_and_tracing(env_filter, otel_exporters);

    let pool = match db::connect_sqlx(&config.db_url).await {
        Ok(pool) => pool,
        Err(err) if err.is_configuration_error() => {
            error!("Invalid {} configuration: {err:?}", app_env::DB_URL);
            telemetry.shutdown();
            return Err(err.into());
        }
        Err(err) => {
            error!("Could not connect to the database: {err:?}");
            telemetry.shutdown();
            return Err(err.into());
        }
    };

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    });
    let router = todo_rest::build_router(shared_data.clone());

    let listener = TcpListener::bind(config.listen_address)
        .await
        .with_context(|| format!("binding to {}", config.listen_address))?;
    info!("Listening on {}", config.listen_address);

    let serve_result = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    info!("Shutting down");
    shared_data.ext_cxn.close().await;
    telemetry.shutdown();

    serve_result.context("running the HTTP server")
}

/// Resolves once the process is asked to stop via Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Could not listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("Could not listen for SIGTERM: {err}");
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
