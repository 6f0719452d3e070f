//! Dashboard server runtime: configuration, shared state, routing, bootstrap.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde_json::json;
use storepulse_hibot::ConversationSource;
use storepulse_report::{
    AgentNameResolver, IdentityOverrideTable, ReportBundle, ReportFormatter, StoreOrdering,
    DEFAULT_DAILY_CAP,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

mod api_error;
mod auth_runtime;
mod entry_page;
mod report_runtime;

use api_error::DashboardApiError;
use auth_runtime::authorize_dashboard_request;
use entry_page::load_entry_page;
use report_runtime::build_dashboard_report;

pub const ENTRY_PAGE_ENDPOINT: &str = "/";
pub const REPORT_ENDPOINT: &str = "/api/report";
pub const HEALTH_ENDPOINT: &str = "/healthz";
pub const DEFAULT_DASHBOARD_USER: &str = "admin";
pub const DEFAULT_DASHBOARD_PASSWORD: &str = "password";
const BASIC_AUTH_REALM: &str = "Basic realm=\"Login Required\"";
const ENTRY_PAGE_FILE: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Single shared username/password pair guarding the dashboard.
pub struct DashboardCredentials {
    pub username: String,
    pub password: String,
}

impl Default for DashboardCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_DASHBOARD_USER.to_string(),
            password: DEFAULT_DASHBOARD_PASSWORD.to_string(),
        }
    }
}

impl DashboardCredentials {
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_DASHBOARD_PASSWORD
    }
}

#[derive(Debug, Clone)]
/// Public struct `DashboardServerConfig` used across StorePulse components.
pub struct DashboardServerConfig {
    pub bind: String,
    pub credentials: DashboardCredentials,
    pub static_dir: PathBuf,
    pub timezone: Tz,
    pub daily_cap: u64,
    pub hidden_stores: Vec<String>,
    pub identity_overrides: IdentityOverrideTable,
}

impl Default for DashboardServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5001".to_string(),
            credentials: DashboardCredentials::default(),
            static_dir: PathBuf::from("."),
            timezone: chrono_tz::UTC,
            daily_cap: DEFAULT_DAILY_CAP,
            hidden_stores: Vec::new(),
            identity_overrides: IdentityOverrideTable::builtin(),
        }
    }
}

/// Read-only state shared by request handlers.
pub struct DashboardServerState {
    config: DashboardServerConfig,
    source: Arc<dyn ConversationSource>,
    resolver: AgentNameResolver,
    formatter: ReportFormatter,
    clock: fn() -> DateTime<Utc>,
}

impl DashboardServerState {
    pub fn new(config: DashboardServerConfig, source: Arc<dyn ConversationSource>) -> Self {
        let formatter = ReportFormatter::new(StoreOrdering::from_overrides(
            &config.identity_overrides,
        ))
        .with_daily_cap(config.daily_cap)
        .with_hidden_stores(config.hidden_stores.iter().cloned());
        let resolver = AgentNameResolver::new(config.identity_overrides.clone());
        Self {
            config,
            source,
            resolver,
            formatter,
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used for the fetch window and "today".
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }
}

/// Run the dashboard HTTP server until Ctrl-C.
pub async fn run_dashboard_server(
    config: DashboardServerConfig,
    source: Arc<dyn ConversationSource>,
) -> Result<()> {
    let bind_addr: SocketAddr = config
        .bind
        .parse()
        .with_context(|| format!("invalid dashboard bind '{}': expected host:port", config.bind))?;
    if config.credentials.uses_default_password() {
        tracing::warn!("dashboard is protected by the default password; set DASHBOARD_PASS");
    }
    let state = Arc::new(DashboardServerState::new(config, source));

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind dashboard server on {bind_addr}"))?;
    let local_addr = listener
        .local_addr()
        .context("failed to resolve dashboard listen address")?;

    tracing::info!(
        addr = %local_addr,
        static_dir = %state.config.static_dir.display(),
        timezone = state.config.timezone.name(),
        overrides = state.config.identity_overrides.len(),
        "dashboard server listening"
    );

    let app = build_dashboard_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("dashboard server exited unexpectedly")?;
    Ok(())
}

pub fn build_dashboard_router(state: Arc<DashboardServerState>) -> Router {
    let report_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([AUTHORIZATION]);

    Router::new()
        .route(ENTRY_PAGE_ENDPOINT, get(handle_entry_page))
        .route(REPORT_ENDPOINT, get(handle_report).layer(report_cors))
        .route(HEALTH_ENDPOINT, get(handle_health))
        .with_state(state)
}

async fn handle_health() -> Response {
    (StatusCode::OK, Json(json!({ "status": "ready" }))).into_response()
}

async fn handle_entry_page(
    State(state): State<Arc<DashboardServerState>>,
    headers: HeaderMap,
) -> Result<Html<String>, DashboardApiError> {
    let username = authorize_dashboard_request(&state.config.credentials, &headers)?;
    tracing::info!(user = %username, "serving dashboard entry page");
    load_entry_page(&state.config.static_dir).await.map(Html)
}

async fn handle_report(
    State(state): State<Arc<DashboardServerState>>,
    headers: HeaderMap,
) -> Result<Json<ReportBundle>, DashboardApiError> {
    let username = authorize_dashboard_request(&state.config.credentials, &headers)?;
    tracing::info!(user = %username, "report requested");
    build_dashboard_report(&state).await.map(Json)
}
