use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use inkmatch::config::Settings;
use inkmatch::core::{build_strategy, MatchEngine};
use inkmatch::models::HeuristicParams;
use inkmatch::routes::{self, matches::AppState};
use inkmatch::services::{CacheManager, MatchService, RestProfileStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("Failed to load configuration: {}", e))
    })?;

    // Initialize logging; LOG_LEVEL / LOG_FORMAT override the config file
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }

    info!("Starting Inkmatch matching service...");
    info!("Configuration loaded successfully");

    let store = RestProfileStore::new(
        settings.store.url.clone(),
        settings.store.api_key.clone(),
        settings.store.tables(),
        settings.store.request_timeout(),
    )
    .map_err(|e| io_error("Failed to build profile store client", e))?;

    info!("Profile store client initialized");

    // Cache is best-effort: an unreachable Redis leaves the L1 tier running
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    let cache = CacheManager::connect_or_degrade(
        &settings.cache.redis_url,
        l1_cache_size,
        settings.cache.ttl_secs,
    )
    .await;

    info!(
        "Cache manager initialized (mode: {}, L1: {} entries, TTL: {}s)",
        inkmatch::ResultCache::mode(&cache),
        l1_cache_size,
        settings.cache.ttl_secs
    );

    let strategy = build_strategy(
        settings.scoring.strategy,
        HeuristicParams::from(&settings.scoring.heuristic),
        settings.scoring.seed,
    )
    .map_err(|e| io_error("Invalid scoring configuration", e))?;

    let engine = MatchEngine::new(strategy);

    info!("Match engine initialized with strategy: {}", engine.strategy_name());

    let app_state = AppState {
        matches: MatchService::new(
            Arc::new(store),
            Arc::new(cache),
            engine,
            settings.match_options(),
        ),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
