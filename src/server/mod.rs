//! Server initialization and routing

use crate::api;
use crate::cache::{CacheManager, CacheOperations};
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::middleware::{normalize_error_response, ObservabilityLayer, SanitizedMakeSpan};
use crate::openapi::ApiDoc;
use crate::repository::{
    blood_request::BloodRequestRepositoryImpl, blood_type::BloodTypeRepositoryImpl,
    donor::DonorRepositoryImpl, inventory::InventoryRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{
    BloodRequestService, BloodTypeService, DonorService, IdentityService, InventoryService,
};
use crate::state::HasServices;
use anyhow::Result;
use axum::{
    http::{HeaderValue, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub identity_service: Arc<IdentityService<UserRepositoryImpl, CacheManager>>,
    pub blood_type_service: Arc<BloodTypeService<BloodTypeRepositoryImpl>>,
    pub donor_service: Arc<DonorService<DonorRepositoryImpl, BloodTypeRepositoryImpl>>,
    pub inventory_service: Arc<InventoryService<InventoryRepositoryImpl, BloodTypeRepositoryImpl>>,
    pub blood_request_service:
        Arc<BloodRequestService<BloodRequestRepositoryImpl, BloodTypeRepositoryImpl>>,
    pub jwt_manager: JwtManager,
    pub cache_manager: Arc<CacheManager>,
}

impl HasServices for AppState {
    type UserRepo = UserRepositoryImpl;
    type BloodTypeRepo = BloodTypeRepositoryImpl;
    type InventoryRepo = InventoryRepositoryImpl;
    type DonorRepo = DonorRepositoryImpl;
    type RequestRepo = BloodRequestRepositoryImpl;
    type Cache = CacheManager;

    fn config(&self) -> &Config {
        &self.config
    }

    fn identity_service(&self) -> &IdentityService<Self::UserRepo, Self::Cache> {
        &self.identity_service
    }

    fn blood_type_service(&self) -> &BloodTypeService<Self::BloodTypeRepo> {
        &self.blood_type_service
    }

    fn donor_service(&self) -> &DonorService<Self::DonorRepo, Self::BloodTypeRepo> {
        &self.donor_service
    }

    fn inventory_service(&self) -> &InventoryService<Self::InventoryRepo, Self::BloodTypeRepo> {
        &self.inventory_service
    }

    fn blood_request_service(
        &self,
    ) -> &BloodRequestService<Self::RequestRepo, Self::BloodTypeRepo> {
        &self.blood_request_service
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    async fn check_ready(&self) -> (bool, bool) {
        let db_ok = sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok();
        let cache_ok = self.cache_manager.ping().await.is_ok();
        (db_ok, cache_ok)
    }
}

/// Connect the backing stores, wire the services and serve HTTP until Ctrl-C
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> Result<()> {
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    let cache_manager = Arc::new(CacheManager::new(&config.redis).await?);
    info!("Connected to Redis");

    // Repositories
    let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
    let blood_type_repo = Arc::new(BloodTypeRepositoryImpl::new(db_pool.clone()));
    let inventory_repo = Arc::new(InventoryRepositoryImpl::new(db_pool.clone()));
    let donor_repo = Arc::new(DonorRepositoryImpl::new(db_pool.clone()));
    let request_repo = Arc::new(BloodRequestRepositoryImpl::new(db_pool.clone()));

    let jwt_manager = JwtManager::new(config.jwt.clone());

    // Services. Blood-type resolution is shared by donors, inventory and requests.
    let blood_type_service = Arc::new(BloodTypeService::new(blood_type_repo));
    let identity_service = Arc::new(IdentityService::new(
        user_repo,
        jwt_manager.clone(),
        cache_manager.clone(),
    ));
    let donor_service = Arc::new(DonorService::new(donor_repo, blood_type_service.clone()));
    let inventory_service = Arc::new(InventoryService::new(
        inventory_repo,
        blood_type_service.clone(),
    ));
    let blood_request_service = Arc::new(BloodRequestService::new(
        request_repo,
        blood_type_service.clone(),
    ));

    let http_addr = config.http_addr();
    let state = AppState {
        config: Arc::new(config),
        db_pool,
        identity_service,
        blood_type_service,
        donor_service,
        inventory_service,
        blood_request_service,
        jwt_manager,
        cache_manager,
    };

    let app = build_router(state).merge(metrics_router(prometheus_handle));

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Slow handlers answer 408 once `timeout` elapses
fn timeout_layer(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}

/// Build the HTTP router over any [`HasServices`] state
pub fn build_router<S: HasServices>(state: S) -> Router {
    let cors = cors_layer(state.config());

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::build()) }),
        )
        // Identity
        .route("/user_register", post(api::auth::register::<S>))
        .route("/user_login", post(api::auth::login::<S>))
        .route("/user_logout", post(api::auth::logout::<S>))
        .route("/token_refresh", post(api::auth::token_refresh::<S>))
        // Blood types
        .route("/add_bloodtype", post(api::blood_type::add::<S>))
        .route("/get_bloodtypes", get(api::blood_type::list::<S>))
        // Donors
        .route("/add_donor", post(api::donor::create::<S>))
        .route(
            "/update_donor/{id}",
            put(api::donor::update::<S>).patch(api::donor::update::<S>),
        )
        .route("/delete_donor/{id}", delete(api::donor::delete::<S>))
        .route("/getall_donors", get(api::donor::list::<S>))
        .route("/getall_donors/", get(api::donor::list::<S>))
        // Inventory
        .route("/get_bloodinventory", get(api::inventory::list::<S>))
        .route("/add_to_bloodinventory", post(api::inventory::create::<S>))
        .route(
            "/update_units/{id}",
            put(api::inventory::update::<S>).patch(api::inventory::update::<S>),
        )
        // Blood requests
        .route("/request_blood", post(api::blood_request::create::<S>))
        .route(
            "/get_all_blood_request",
            get(api::blood_request::list::<S>),
        )
        .route(
            "/get_all_blood_request/",
            get(api::blood_request::list::<S>),
        )
        .route(
            "/approve_request/{id}",
            post(api::blood_request::approve::<S>),
        )
        // Middleware, innermost first
        .layer(timeout_layer(REQUEST_TIMEOUT))
        .layer(axum::middleware::from_fn(normalize_error_response))
        .layer(ObservabilityLayer)
        .layer(TraceLayer::new_for_http().make_span_with(SanitizedMakeSpan))
        .layer(cors)
        .with_state(state)
}

/// `/metrics` route, carrying its own state so it can be merged into any router
pub fn metrics_router(handle: Option<PrometheusHandle>) -> Router {
    Router::new()
        .route("/metrics", get(api::metrics::metrics_handler))
        .with_state(Arc::new(handle))
}
