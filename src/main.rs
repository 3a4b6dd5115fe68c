use std::{process, sync::Arc};

use misura::{
    application::{
        error::AppError,
        repos::{StatisticsRepo, SubjectsRepo},
        statistics::StatisticsService,
        subjects::SubjectService,
    },
    cache::{CacheConfig, ListCache, RedisListCache},
    config,
    infra::{db::PostgresStore, error::InfraError, http, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let store = init_store(&settings).await?;
    let cache = init_cache(&settings).await;

    let subjects_repo: Arc<dyn SubjectsRepo> = store.clone();
    let statistics_repo: Arc<dyn StatisticsRepo> = store.clone();

    let subjects = SubjectService::new(subjects_repo).with_list_cache(cache);
    let statistics = StatisticsService::new(statistics_repo);

    let api_state = http::ApiState {
        subjects: Arc::new(subjects),
        statistics: Arc::new(statistics),
        db: store,
    };

    serve_http(&settings, api_state).await
}

async fn init_store(settings: &config::Settings) -> Result<Arc<PostgresStore>, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))
        .map_err(AppError::from)?;

    let pool = PostgresStore::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    PostgresStore::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;

    let store = Arc::new(PostgresStore::new(pool));

    // Probe connectivity before accepting traffic.
    store
        .health_check()
        .await
        .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
    info!(target = "misura::startup", "database reachable");

    Ok(store)
}

async fn init_cache(settings: &config::Settings) -> Option<Arc<dyn ListCache>> {
    if !settings.cache.enabled {
        info!(
            target = "misura::startup",
            "list cache disabled by configuration"
        );
        return None;
    }

    RedisListCache::connect(CacheConfig::from(&settings.cache))
        .await
        .map(|cache| Arc::new(cache) as Arc<dyn ListCache>)
}

async fn serve_http(
    settings: &config::Settings,
    api_state: http::ApiState,
) -> Result<(), AppError> {
    let router = http::build_api_router(api_state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "misura::startup",
        addr = %settings.server.addr,
        "listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        error!(error = %error, "failed to install shutdown handler");
        return;
    }
    info!(target = "misura::startup", "shutdown signal received");
}
