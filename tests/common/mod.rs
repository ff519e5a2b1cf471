//! Shared test harness.
//!
//! `TestContext` builds the same component set the server bootstraps, and
//! `test_app!` wires the full governance chain around the routes in the
//! production order so integration tests exercise the real stack.

use std::sync::Arc;
use std::time::Duration;

use warden_api::RejectionCounters;
use warden_auth::{CookieConfig, MemoryUserRepository, TokenService, UserRepository};
use warden_configs::{AuthSettings, FederatedSettings, GovernanceSettings, SessionSettings};
use warden_kv::{KvStore, MemoryKv};
use warden_oidc::FederatedVerifier;
use warden_policy::{PolicyHandle, SchemaRegistry};
use warden_session::SessionStore;

pub struct TestContext {
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

impl TestContext {
    pub fn new() -> Self {
        Self::with_governance(GovernanceSettings::default())
    }

    pub fn with_governance(governance: GovernanceSettings) -> Self {
        let kv: Arc<dyn KvStore> = Arc::new(MemoryKv::new());
        let kv_deadline = Duration::from_secs(2);
        let auth_settings = AuthSettings::default();
        let session_settings = SessionSettings::default();

        let tokens = Arc::new(TokenService::new(
            auth_settings.jwt_secret.clone(),
            auth_settings.jwt_issuer.clone(),
            kv.clone(),
            kv_deadline,
        ));
        let sessions = Arc::new(SessionStore::new(
            kv,
            Duration::from_secs(session_settings.ttl_secs),
            kv_deadline,
        ));

        Self {
            repo: Arc::new(MemoryUserRepository::new()),
            sessions,
            tokens,
            verifier: Arc::new(FederatedVerifier::new(&FederatedSettings::default())),
            policies: Arc::new(
                PolicyHandle::compile(&governance).expect("governance settings must compile"),
            ),
            schemas: Arc::new(SchemaRegistry::new()),
            timeout_counters: Arc::new(RejectionCounters::new()),
            size_counters: Arc::new(RejectionCounters::new()),
            cookie_config: CookieConfig::default(),
            auth_settings,
        }
    }

    pub fn with_schemas(mut self, schemas: SchemaRegistry) -> Self {
        self.schemas = Arc::new(schemas);
        self
    }
}

/// Build the full application (production middleware order) around the
/// standard routes, optionally extended with test-only routes.
#[macro_export]
macro_rules! test_app {
    ($ctx:expr) => {
        $crate::test_app!($ctx, |_cfg: &mut actix_web::web::ServiceConfig| {})
    };
    ($ctx:expr, $extra:expr) => {{
        let c = &$ctx;
        actix_web::App::new()
            .app_data(actix_web::web::Data::new(c.repo.clone()))
            .app_data(actix_web::web::Data::new(c.sessions.clone()))
            .app_data(actix_web::web::Data::new(c.tokens.clone()))
            .app_data(actix_web::web::Data::new(c.verifier.clone()))
            .app_data(actix_web::web::Data::new(c.cookie_config.clone()))
            .app_data(actix_web::web::Data::new(c.auth_settings.clone()))
            .configure(warden_api::routes::configure_routes)
            .configure($extra)
            .wrap(warden_api::middleware::SecurityHeaders::new(c.policies.clone()))
            .wrap(warden_api::middleware::SizeLimitGuard::new(
                c.policies.clone(),
                c.size_counters.clone(),
            ))
            .wrap(warden_api::middleware::TimeoutGuard::new(
                c.policies.clone(),
                c.timeout_counters.clone(),
            ))
            .wrap(warden_api::middleware::RequestValidation::new(
                c.policies.clone(),
                c.schemas.clone(),
            ))
            .wrap(warden_api::middleware::AuthResolver::new(
                c.tokens.clone(),
                c.sessions.clone(),
                std::time::Duration::from_secs(c.auth_settings.refresh_hint_window_secs),
            ))
            .wrap(warden_api::middleware::RequestIdMiddleware)
            .wrap(warden_api::middleware::RequestLogging)
    }};
}
