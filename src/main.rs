//! `delivery-reports` server binary.

use anyhow::Context;
use clap::Parser;
use delivery_reports::api::rest::{AppState, create_router};
use delivery_reports::application::services::{
    DispatchSettings, FareFanoutClient, FareFanoutConfig, PipelinePorts, ReportDispatcher,
};
use delivery_reports::config::AppConfig;
use delivery_reports::infrastructure::geography::FileGeographyCatalog;
use delivery_reports::infrastructure::http::HttpClient;
use delivery_reports::infrastructure::notification::{
    LogNotifier, Notifier, SmtpNotifier, SmtpSettings,
};
use delivery_reports::infrastructure::persistence::InMemoryJobRepository;
use delivery_reports::infrastructure::pricing::{HttpFareEstimator, builtin_areas, load_areas};
use delivery_reports::infrastructure::rendering::{FileSystemArtifactStore, XlsxReportRenderer};
use delivery_reports::infrastructure::transactions::HttpTransactionSource;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Parser)]
#[command(name = "delivery-reports", version, about)]
struct Cli {
    /// Configuration file (overrides DELIVERY_REPORTS_CONFIG).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address (overrides server.host and server.port).
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config);

    let dispatcher = build_dispatcher(&config).await?;
    let app = create_router(Arc::new(AppState::new(dispatcher)));

    let addr = match cli.bind {
        Some(addr) => addr,
        None => config.server.bind_addr()?,
    };
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!(%addr, "delivery-reports listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn build_dispatcher(config: &AppConfig) -> anyhow::Result<ReportDispatcher> {
    let transactions = HttpTransactionSource::new(
        HttpClient::new(config.transactions.timeout_ms)?,
        config.transactions.base_url.clone(),
    );

    let estimator_cfg = &config.fare_estimator;
    let estimator = HttpFareEstimator::new(
        estimator_cfg.base_url.clone(),
        &estimator_cfg.api_key,
        estimator_cfg.timeout_ms,
    )?;
    let areas = match &estimator_cfg.area_catalog_path {
        Some(path) => load_areas(path).await?,
        None => builtin_areas(),
    };
    let mut fanout = FareFanoutConfig::default()
        .with_per_area_timeout(estimator_cfg.per_area_timeout_ms);
    if let Some(rps) = estimator_cfg.requests_per_second {
        fanout = fanout.with_rate_limit(rps);
    }
    let fares = FareFanoutClient::new(Arc::new(estimator), areas, fanout);
    info!(
        areas = fares.areas().len(),
        per_area_timeout_ms = fares.config().per_area_timeout_ms,
        rate_limited = fares.config().requests_per_second.is_some(),
        "fare catalog loaded"
    );

    let notifier: Arc<dyn Notifier> = if config.notification.enabled {
        let n = &config.notification;
        Arc::new(SmtpNotifier::new(&SmtpSettings {
            host: n.smtp_host.clone(),
            port: n.smtp_port,
            tls: n.tls,
            username: n.username.clone(),
            password: n.password.clone(),
            from: n.from.clone(),
        })?)
    } else {
        info!("email delivery disabled, reports are logged only");
        Arc::new(LogNotifier::new())
    };

    let jobs = match config.jobs.retention() {
        Some(retention) => InMemoryJobRepository::with_retention(retention),
        None => InMemoryJobRepository::new(),
    };

    let ports = PipelinePorts {
        transactions: Arc::new(transactions),
        geography: Arc::new(FileGeographyCatalog::new(
            config.geography.catalog_path.clone(),
        )),
        fares,
        renderer: Arc::new(XlsxReportRenderer::new()),
        store: Arc::new(FileSystemArtifactStore::new(
            config.artifacts.output_dir.clone(),
            config.artifacts.naming,
        )),
        notifier,
        jobs: Arc::new(jobs),
    };

    Ok(ReportDispatcher::new(
        ports,
        DispatchSettings {
            max_concurrent: config.jobs.max_concurrent,
            recipient: config.notification.recipient.clone(),
        },
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
