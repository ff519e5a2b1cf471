//! Server bootstrap and run loop.
//!
//! `bootstrap` builds every shared component once — stores, token service,
//! policy snapshot, counters — and `run` wires the governance chain around
//! the routes in its fixed order: request logging outermost, then request
//! id, auth resolution, validation/sanitization, the timeout bound, the
//! size guard, security headers, and finally compression/CORS/host checks
//! in front of the handlers.

use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use std::time::Duration;

use warden_api::middleware::{
    AuthResolver, HostGuard, RequestIdMiddleware, RequestLogging, RequestValidation,
    SecurityHeaders, SizeLimitGuard, TimeoutGuard,
};
use warden_api::{routes, RejectionCounters};
use warden_auth::{CookieConfig, MemoryUserRepository, TokenService, UserRepository};
use warden_configs::{AuthSettings, ServerConfig};
use warden_kv::{KvStore, MemoryKv};
use warden_oidc::FederatedVerifier;
use warden_policy::{PolicyHandle, SchemaRegistry};
use warden_session::SessionStore;

use crate::middleware::build_cors_from_config;

/// Everything the HTTP application needs, built once at startup.
#[derive(Clone)]
pub struct AppComponents {
    pub repo: Arc<dyn UserRepository>,
    pub sessions: Arc<SessionStore>,
    pub tokens: Arc<TokenService>,
    pub verifier: Arc<FederatedVerifier>,
    pub policies: Arc<PolicyHandle>,
    pub schemas: Arc<SchemaRegistry>,
    pub timeout_counters: Arc<RejectionCounters>,
    pub size_counters: Arc<RejectionCounters>,
    pub cookie_config: CookieConfig,
    pub auth_settings: AuthSettings,
}

/// Build application state from configuration.
pub fn bootstrap(config: &ServerConfig) -> Result<AppComponents> {
    let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
    let kv_deadline = Duration::from_millis(config.kv.op_timeout_ms);

    let repo: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::new());

    let tokens = Arc::new(TokenService::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_issuer.clone(),
        kv.clone(),
        kv_deadline,
    ));

    let sessions = Arc::new(SessionStore::new(
        kv,
        Duration::from_secs(config.session.ttl_secs),
        kv_deadline,
    ));

    let verifier = Arc::new(FederatedVerifier::new(&config.federated));

    let policies = Arc::new(
        PolicyHandle::compile(&config.governance).context("Failed to compile governance policies")?,
    );

    let cookie_config = CookieConfig {
        secure: config.governance.security_headers.force_https,
        max_age: Duration::from_secs(config.session.cookie_max_age_secs),
        ..CookieConfig::default()
    };

    info!("Components initialized (policy version {})", policies.version());

    Ok(AppComponents {
        repo,
        sessions,
        tokens,
        verifier,
        policies,
        schemas: Arc::new(SchemaRegistry::new()),
        timeout_counters: Arc::new(RejectionCounters::new()),
        size_counters: Arc::new(RejectionCounters::new()),
        cookie_config,
        auth_settings: config.auth.clone(),
    })
}

/// Run the HTTP server until termination.
pub async fn run(config: &ServerConfig, components: AppComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let workers = config.server.workers;
    let security = config.security.clone();
    let hint_window = Duration::from_secs(config.auth.refresh_hint_window_secs);

    info!("Starting HTTP server on {}", bind_addr);

    let server = HttpServer::new(move || {
        let c = components.clone();
        App::new()
            .app_data(web::Data::new(c.repo.clone()))
            .app_data(web::Data::new(c.sessions.clone()))
            .app_data(web::Data::new(c.tokens.clone()))
            .app_data(web::Data::new(c.verifier.clone()))
            .app_data(web::Data::new(c.cookie_config.clone()))
            .app_data(web::Data::new(c.auth_settings.clone()))
            .configure(routes::configure_routes)
            // .wrap() nests inward: the last wrap is the outermost stage.
            .wrap(HostGuard::new(security.allowed_hosts.clone()))
            .wrap(build_cors_from_config(&security))
            .wrap(actix_web::middleware::Compress::default())
            .wrap(SecurityHeaders::new(c.policies.clone()))
            .wrap(SizeLimitGuard::new(c.policies.clone(), c.size_counters.clone()))
            .wrap(TimeoutGuard::new(c.policies.clone(), c.timeout_counters.clone()))
            .wrap(RequestValidation::new(c.policies.clone(), c.schemas.clone()))
            .wrap(AuthResolver::new(c.tokens.clone(), c.sessions.clone(), hint_window))
            .wrap(RequestIdMiddleware)
            .wrap(RequestLogging)
    })
    .workers(workers)
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run();

    server.await.context("Server terminated abnormally")?;
    info!("Server stopped");
    Ok(())
}
