use std::{env, net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_from_env;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use service::blog_feed::repo::seaorm::SeaOrmBlogFeedRepository;
use service::blog_feed::repository::BlogFeedRepository;
use service::blog_feed::{BlogFeedService, ServiceSettings};
use service::crypto::Sha256IdCipher;
use service::i18n::{EnglishCatalog, MessageCatalog};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::envelope::Responder;
use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Browser preflights (`OPTIONS` with `Access-Control-Request-Method`) are
/// answered by this layer; plain `OPTIONS` calls reach the routes.
fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `SERVER_HOST`/`SERVER_PORT` override the configured address when set.
fn load_bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    let host = env::var("SERVER_HOST").unwrap_or_else(|_| cfg.host.clone());
    let port = env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(cfg.port);
    let addr = format!("{}:{}", host, port);
    addr.parse()
        .map_err(|e: std::net::AddrParseError| StartupError::BindAddr { addr, reason: e.to_string() })
}

/// English templates, overridden by the JSON file named in `LOCALE_FILE` if any.
fn load_catalog() -> Result<Arc<dyn MessageCatalog>, StartupError> {
    match env::var("LOCALE_FILE") {
        Ok(path) if !path.trim().is_empty() => {
            let catalog = EnglishCatalog::from_locale_file(&path)
                .map_err(|e| StartupError::Locale { path: path.clone(), reason: e.to_string() })?;
            info!(%path, "message overrides loaded");
            Ok(Arc::new(catalog))
        }
        _ => Ok(Arc::new(EnglishCatalog::new())),
    }
}

/// Wire the service and responder from configuration and a repository.
pub fn build_state(cfg: &AppConfig, repo: Arc<dyn BlogFeedRepository>, catalog: Arc<dyn MessageCatalog>) -> AppState {
    let cipher = Arc::new(Sha256IdCipher::new(&cfg.security.id_cipher_secret));
    let service: BlogFeedService = BlogFeedService::new(repo, cipher, ServiceSettings::from(cfg));
    let responder = Responder::new(catalog, cfg.runtime.environment);
    AppState::new(service, responder)
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: load config, prepare the database, and serve until the task is dropped
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_or_env().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db_cfg = models::db::DatabaseConfig::from(&cfg.database);
    let db = models::db::connect_with_config(&db_cfg).await?;
    migration::Migrator::up(&db, None).await?;
    info!("migrations applied");
    models::blog_feed::ensure_live_url_index(&db, &cfg.status.deleted).await?;

    let catalog = load_catalog()?;
    let state = build_state(&cfg, Arc::new(SeaOrmBlogFeedRepository { db }), catalog);
    let app = build_app(state);

    let addr = load_bind_addr(&cfg.server)?;
    info!(%addr, environment = ?cfg.runtime.environment, "starting blog feed admin server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
