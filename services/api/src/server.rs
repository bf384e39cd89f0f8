use crate::cli::ServeArgs;
use crate::infra::{AppState, FixtureDataSource, ProfileFixture};
use crate::routes::with_profile_strength_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use life_compass::config::AppConfig;
use life_compass::error::AppError;
use life_compass::telemetry;
use life_compass::workflows::profile_strength::{FileLedgerStore, ProfileStrengthService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let fixture = match args.fixture.as_deref() {
        Some(path) => ProfileFixture::from_path(path)?,
        None => ProfileFixture::default(),
    };
    let source = Arc::new(FixtureDataSource::new(fixture));
    let store = Arc::new(FileLedgerStore::new(config.ledger.dir.clone()));
    let service = Arc::new(ProfileStrengthService::new(
        source,
        store,
        config.scoring.weights.clone(),
    ));

    let app = with_profile_strength_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        ledger_dir = %config.ledger.dir.display(),
        "profile strength service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
