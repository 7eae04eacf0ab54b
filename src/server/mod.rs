pub mod error;
pub mod protocol;
pub mod upstream;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{FromRequest, Query, Request, State};
use axum::handler::HandlerWithoutStateExt;
use axum::http::header;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::NaiveDate;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, GlobeConfig};
use crate::latency::{DataCenterDirectory, DataCentersResponse, RealTimeMapResponse};
use crate::scene::{GlobeScene, build_scene};
pub use error::{ProxyError, UpstreamFailure};
use protocol::{HealthStatus, LoginRequest};
pub use upstream::UpstreamClient;

/// Shared state for all request handlers.
pub struct ServerState {
    pub upstream: UpstreamClient,
    pub globe: GlobeConfig,
    pub static_directory: PathBuf,
    pub health: RwLock<HealthData>,
    started: Instant,
}

/// Counters reported by `/health`.
#[derive(Debug, Default)]
pub struct HealthData {
    pub requests_served: u64,
    pub upstream_errors: u64,
}

impl ServerState {
    pub fn new(upstream: UpstreamClient, globe: GlobeConfig, static_directory: PathBuf) -> Self {
        ServerState {
            upstream,
            globe,
            static_directory,
            health: RwLock::new(HealthData::default()),
            started: Instant::now(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ProxyError> {
        let upstream = UpstreamClient::new(
            config.server.upstream_base(),
            Duration::from_millis(config.server.request_timeout_ms),
        )?;
        Ok(ServerState::new(
            upstream,
            config.globe.clone(),
            PathBuf::from(&config.server.static_directory),
        ))
    }

    async fn record(&self, upstream_failed: bool) {
        let mut health = self.health.write().await;
        health.requests_served += 1;
        if upstream_failed {
            health.upstream_errors += 1;
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Query string pairs in request order.
type Params = Vec<(String, String)>;

/// API routes, with the static directory served for every other path.
pub fn router(state: SharedState) -> Router {
    let static_files =
        ServeDir::new(&state.static_directory).not_found_service(not_found.into_service());

    Router::new()
        .route("/login", post(login))
        .route("/dataCenter", get(data_center))
        .route("/realTimeMap", get(real_time_map))
        .route("/scene", get(scene))
        .route("/health", get(health))
        .fallback_service(static_files)
        .layer(middleware::from_fn_with_state(state.clone(), track_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the listener fails.
pub async fn start_server(
    state: SharedState,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, upstream = %state.upstream.base_url(), "Proxy listening at http://{}", addr);
    serve(listener, state).await
}

/// Serve on an already-bound listener.
pub async fn serve(
    listener: TcpListener,
    state: SharedState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn track_health(State(state): State<SharedState>, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let upstream_failed = response.extensions().get::<UpstreamFailure>().is_some();
    state.record(upstream_failed).await;
    response
}

async fn not_found() -> ProxyError {
    ProxyError::NotFound
}

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

fn require_token(params: &Params) -> Result<&str, ProxyError> {
    param(params, "token").ok_or_else(|| ProxyError::BadRequest("Token is required".to_string()))
}

fn has_token(data: &Value) -> bool {
    match data.get("token") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() != Some(0.0),
        Some(_) => true,
    }
}

/// Read credentials from a form or JSON body. Unparsable bodies yield empty credentials.
async fn read_credentials(request: Request) -> LoginRequest {
    let is_form = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        Form::<LoginRequest>::from_request(request, &())
            .await
            .map(|Form(login)| login)
            .unwrap_or_default()
    } else {
        Json::<LoginRequest>::from_request(request, &())
            .await
            .map(|Json(login)| login)
            .unwrap_or_default()
    }
}

async fn login(
    State(state): State<SharedState>,
    request: Request,
) -> Result<Json<Value>, ProxyError> {
    let credentials = read_credentials(request).await;
    let body = serde_json::to_value(&credentials).map_err(|e| ProxyError::Decode(e.to_string()))?;
    let data = state.upstream.post_json("/login", &body).await?;
    if has_token(&data) {
        Ok(Json(data))
    } else {
        Err(ProxyError::Unauthorized)
    }
}

async fn data_center(
    State(state): State<SharedState>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, ProxyError> {
    let token = require_token(&params)?;
    let data = state
        .upstream
        .get_json("/datacenter", &[("token".to_string(), token.to_string())])
        .await?;
    Ok(Json(data))
}

const REAL_TIME_MAP_PARAMS: [&str; 4] = ["startTime", "endTime", "interval", "token"];

async fn real_time_map(
    State(state): State<SharedState>,
    Query(params): Query<Params>,
) -> Result<Json<Value>, ProxyError> {
    if REAL_TIME_MAP_PARAMS
        .iter()
        .any(|name| param(&params, name).is_none())
    {
        return Err(ProxyError::BadRequest("Missing required parameters".to_string()));
    }
    let data = state.upstream.get_json("/data/realTimeMap", &params).await?;
    Ok(Json(data))
}

/// Default map window: the day two days back through yesterday.
pub fn default_window(today: NaiveDate) -> (String, String) {
    let start = today - chrono::Duration::days(2);
    let end = today - chrono::Duration::days(1);
    (
        start.format("%Y-%m-%d").to_string(),
        end.format("%Y-%m-%d").to_string(),
    )
}

async fn scene(
    State(state): State<SharedState>,
    Query(params): Query<Params>,
) -> Result<Json<GlobeScene>, ProxyError> {
    let token = require_token(&params)?.to_string();
    let (default_start, default_end) = default_window(chrono::Local::now().date_naive());
    let start = param(&params, "startTime")
        .map(str::to_string)
        .unwrap_or(default_start);
    let end = param(&params, "endTime")
        .map(str::to_string)
        .unwrap_or(default_end);
    let interval = param(&params, "interval").unwrap_or("DAY").to_string();

    let listing = state
        .upstream
        .get_json("/datacenter", &[("token".to_string(), token.clone())])
        .await?;
    if listing.get("dataCenters").is_none() {
        return Err(ProxyError::Unauthorized);
    }
    let listing: DataCentersResponse =
        serde_json::from_value(listing).map_err(|e| ProxyError::Decode(e.to_string()))?;

    let window = vec![
        ("startTime".to_string(), start),
        ("endTime".to_string(), end),
        ("interval".to_string(), interval),
        ("token".to_string(), token),
    ];
    let map = state.upstream.get_json("/data/realTimeMap", &window).await?;
    let map: RealTimeMapResponse =
        serde_json::from_value(map).map_err(|e| ProxyError::Decode(e.to_string()))?;

    let directory = DataCenterDirectory::from_list(listing.data_centers);
    let globe = state.globe.clone();
    let scene = tokio::task::spawn_blocking(move || build_scene(&globe, &directory, &map.data))
        .await
        .map_err(|e| ProxyError::Io(std::io::Error::other(e)))?;

    info!(
        tracks = scene.tracks.len(),
        skipped = scene.skipped_samples,
        "Scene served"
    );
    Ok(Json(scene))
}

async fn health(State(state): State<SharedState>) -> Json<HealthStatus> {
    let health = state.health.read().await;
    Json(HealthStatus {
        status: "ok",
        requests_served: health.requests_served,
        upstream_errors: health.upstream_errors,
        uptime_secs: state.started.elapsed().as_secs(),
        upstream: state.upstream.base_url().to_string(),
    })
}
