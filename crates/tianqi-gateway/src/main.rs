//! TIANQI Gateway: dashboard page plus HTMX-style fragments at 127.0.0.1:8000.
//! Owns the loaded snapshot; every handler reads it, only a reload replaces it.

use axum::{
    body::Body,
    extract::{ConnectInfo, Path, Query, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tianqi_core::{
    chart_specs, failure_message, load_from_candidates, page, render_failure_page, render_page,
    source_for, tooltip::{Rect, Size}, DashboardConfig, DocumentSource, Layout, LoadError, Snapshot,
    TooltipPanel, TooltipRegistry, ViewState,
};
use tokio::sync::RwLock;
use tower_http::services::ServeDir;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Current snapshot and the registry built from it. A failed reload only sets `last_error`.
#[derive(Default)]
struct LoadState {
    snapshot: Option<Arc<Snapshot>>,
    registry: Arc<TooltipRegistry>,
    last_error: Option<String>,
}

struct AppState {
    config: DashboardConfig,
    layout: Layout,
    client: reqwest::Client,
    data: Arc<RwLock<LoadState>>,
}

impl AppState {
    fn new(config: DashboardConfig) -> Self {
        Self {
            layout: config.layout(),
            config,
            client: reqwest::Client::new(),
            data: Arc::new(RwLock::new(LoadState::default())),
        }
    }

    /// Runs the loader over every configured base. On failure the previous snapshot stays.
    async fn reload(&self) -> Result<Arc<Snapshot>, LoadError> {
        let sources: Vec<Box<dyn DocumentSource>> = self
            .config
            .resolved_bases()
            .iter()
            .map(|base| source_for(base, &self.client))
            .collect();
        let result = load_from_candidates(&sources).await;

        let mut data = self.data.write().await;
        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                data.registry = Arc::new(TooltipRegistry::build(&snapshot));
                data.snapshot = Some(Arc::clone(&snapshot));
                data.last_error = None;
                Ok(snapshot)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    kept_previous = data.snapshot.is_some(),
                    "dashboard data load failed"
                );
                data.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn loaded(&self) -> Result<(Arc<Snapshot>, Arc<TooltipRegistry>), (StatusCode, String)> {
        let data = self.data.read().await;
        match &data.snapshot {
            Some(snapshot) => Ok((Arc::clone(snapshot), Arc::clone(&data.registry))),
            None => Err((
                StatusCode::SERVICE_UNAVAILABLE,
                failure_message(data.last_error.as_deref().unwrap_or("not loaded yet")),
            )),
        }
    }
}

#[derive(Deserialize)]
struct TooltipQuery {
    key: String,
    #[serde(default)]
    left: f64,
    #[serde(default)]
    top: f64,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default = "default_vw")]
    vw: f64,
    #[serde(default = "default_vh")]
    vh: f64,
    /// Measured tooltip size, when the client knows it.
    #[serde(default)]
    tw: Option<f64>,
    #[serde(default)]
    th: Option<f64>,
}

fn default_vw() -> f64 {
    1280.0
}

fn default_vh() -> f64 {
    800.0
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[tianqi-gateway] .env not loaded: {} (using system environment)", e);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DashboardConfig::load()?;
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config));

    // A failed first load still serves the failure page.
    if let Ok(snapshot) = state.reload().await {
        tracing::info!(
            generated_at = %snapshot.character.generated_at,
            theme = state.config.theme.name(),
            "dashboard ready"
        );
    }

    let app = app(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        version = tianqi_core::version(),
        "TIANQI gateway listening on http://{}",
        bind_addr
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    // Report pages referenced by `htmlUrl` live next to the data documents.
    let data_dir = ServeDir::new(&state.config.data_root);
    Router::new()
        .route("/health", get(health))
        .route("/", get(index))
        .route("/fragments/daily", get(daily_fragment))
        .route("/fragments/works", get(works_fragment))
        .route("/fragments/abilities", get(abilities_fragment))
        .route("/fragments/tooltip", get(tooltip_fragment))
        .route("/fragments/tooltip/hide", get(tooltip_hide))
        .route("/api/tooltip/*key", get(tooltip_json))
        .route("/api/charts", get(charts_json))
        .route("/api/reload", post(reload_handler))
        .fallback_service(data_dir)
        .with_state(state)
        .layer(axum::middleware::from_fn(log_requests))
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let start = Instant::now();
    let response = next.run(request).await;
    tracing::info!(
        %method,
        %path,
        %peer,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}

async fn health() -> &'static str {
    "OK"
}

/// Full page, or the failure page when nothing has loaded.
async fn index(State(state): State<Arc<AppState>>, Query(view): Query<ViewState>) -> Html<String> {
    let cfg = &state.config;
    match state.loaded().await {
        Ok((snapshot, _)) => Html(render_page(&snapshot, &view, &state.layout, cfg.theme, &cfg.title)),
        Err((_, message)) => {
            tracing::warn!(
                placeholders = page::placeholder_count(&state.layout),
                "serving failure page"
            );
            Html(render_failure_page(&cfg.title, cfg.theme, &state.layout, &message))
        }
    }
}

async fn daily_fragment(
    State(state): State<Arc<AppState>>,
    Query(view): Query<ViewState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let (snapshot, _) = state.loaded().await?;
    Ok(Html(page::daily_body(&snapshot, &view, &state.layout)))
}

async fn works_fragment(
    State(state): State<Arc<AppState>>,
    Query(view): Query<ViewState>,
) -> Result<Html<String>, (StatusCode, String)> {
    let (snapshot, _) = state.loaded().await?;
    Ok(Html(page::works_body(&snapshot, &view, &state.layout)))
}

async fn abilities_fragment(State(state): State<Arc<AppState>>) -> Result<Html<String>, (StatusCode, String)> {
    let (snapshot, _) = state.loaded().await?;
    Ok(Html(page::abilities_body(&snapshot, &state.layout)))
}

/// Shown tooltip placed next to the anchor; 204 when the key is unknown.
async fn tooltip_fragment(
    State(state): State<Arc<AppState>>,
    Query(q): Query<TooltipQuery>,
) -> Result<Response, (StatusCode, String)> {
    let (_, registry) = state.loaded().await?;
    let anchor = Rect {
        left: q.left,
        top: q.top,
        width: q.width,
        height: q.height,
    };
    let size = match (q.tw, q.th) {
        (Some(width), Some(height)) => Some(Size { width, height }),
        _ => None,
    };
    let viewport = Size {
        width: q.vw,
        height: q.vh,
    };
    let mut panel = TooltipPanel::hidden();
    if !panel.show(&registry, &q.key, anchor, size, viewport) {
        tracing::debug!(key = %q.key, "tooltip key not found");
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Html(panel.render_html()).into_response())
}

async fn tooltip_hide() -> Html<String> {
    Html(TooltipPanel::hidden().render_html())
}

async fn tooltip_json(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    let (_, registry) = state.loaded().await?;
    match registry.lookup(&key) {
        Some(record) => Ok(Json(record.content()).into_response()),
        None => Err((StatusCode::NOT_FOUND, format!("no tooltip for {}", key))),
    }
}

async fn charts_json(State(state): State<Arc<AppState>>) -> Result<Response, (StatusCode, String)> {
    let (snapshot, _) = state.loaded().await?;
    Ok(Json(chart_specs(&snapshot, state.config.theme, &state.layout)).into_response())
}

async fn reload_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.reload().await {
        Ok(snapshot) => Json(serde_json::json!({
            "status": "ok",
            "generated_at": snapshot.character.generated_at,
            "reports": snapshot.reports.reports.len(),
            "projects": snapshot.projects.projects.len(),
        }))
        .into_response(),
        Err(e) => {
            let kept_previous = state.data.read().await.snapshot.is_some();
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({
                    "status": "error",
                    "error": failure_message(&e.to_string()),
                    "kept_previous": kept_previous,
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tianqi_core::model::{CHARACTER_FILE, PROJECTS_FILE, REPORTS_FILE};
    use tower::ServiceExt;

    const SAMPLE_DATA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");

    fn config_for(root: &str) -> DashboardConfig {
        DashboardConfig {
            data_root: root.to_string(),
            data_bases: vec!["/".to_string()],
            ..Default::default()
        }
    }

    async fn loaded_state() -> Arc<AppState> {
        let state = Arc::new(AppState::new(config_for(SAMPLE_DATA)));
        state.reload().await.expect("sample data loads");
        state
    }

    async fn fetch(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let res = app(Arc::clone(state)).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    async fn post_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let res = app(Arc::clone(state)).oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_ok() {
        let state = Arc::new(AppState::new(config_for(SAMPLE_DATA)));
        let (status, body) = fetch(&state, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn index_renders_loaded_snapshot() {
        let state = loaded_state().await;
        let (status, body) = fetch(&state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("LV.14"));
        assert!(body.contains("2026-10-12 (Monday)"));
        assert!(!body.contains("Failed to load data"));
    }

    #[tokio::test]
    async fn index_shows_failure_when_nothing_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState::new(config_for(dir.path().to_str().unwrap())));
        assert!(state.reload().await.is_err());

        let (status, body) = fetch(&state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("HTTP 404"));
        assert_eq!(
            body.matches("❌ Failed to load data: ").count(),
            page::placeholder_count(&state.layout)
        );

        let (status, _) = fetch(&state, "/fragments/daily").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn daily_fragment_follows_report_index() {
        let state = loaded_state().await;
        let (status, body) = fetch(&state, "/fragments/daily?report=1").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("2026-10-11 (Sunday)"));
        assert!(!body.contains("2026-10-12 (Monday)</h2>"));

        let (_, body) = fetch(&state, "/fragments/daily?report=42").await;
        assert!(body.contains("2026-10-12 (Monday)"));
    }

    #[tokio::test]
    async fn works_fragment_filters_by_category() {
        let state = loaded_state().await;
        let (_, body) = fetch(&state, "/fragments/works?category=web").await;
        assert!(body.contains("TIANQI dashboard"));
        assert!(body.contains("Old blog"));
        assert!(!body.contains("Dotfiles</div>"));

        let (_, body) = fetch(&state, "/fragments/works?category=all").await;
        assert!(body.contains("Dotfiles"));
    }

    #[tokio::test]
    async fn abilities_fragment_has_trees() {
        let state = loaded_state().await;
        let (status, body) = fetch(&state, "/fragments/abilities").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"data-tip="skill-category:0""#));
        assert!(body.contains("Project experience"));
    }

    #[tokio::test]
    async fn tooltip_fragment_hit_and_miss() {
        let state = loaded_state().await;
        let (status, body) = fetch(
            &state,
            "/fragments/tooltip?key=skill%3A0%2F0&left=100&top=100&width=40&height=20&vw=1200&vh=800",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("tooltip visible"));
        assert!(body.contains("left: 155px"));
        assert!(body.contains("Rust"));

        let (status, body) = fetch(&state, "/fragments/tooltip?key=skill%3Anope").await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (_, body) = fetch(&state, "/fragments/tooltip/hide").await;
        assert!(!body.contains("visible"));
    }

    #[tokio::test]
    async fn tooltip_json_accepts_nested_keys() {
        let state = loaded_state().await;
        let (status, body) = fetch(&state, "/api/tooltip/skill:0/0").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "Rust");
        assert_eq!(json["level_text"], "Lv.4");

        let (status, _) = fetch(&state, "/api/tooltip/project:missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn charts_endpoint_lists_three_charts() {
        let state = loaded_state().await;
        let (_, body) = fetch(&state, "/api/charts").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        let canvases: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["canvas"].as_str().unwrap())
            .collect();
        assert_eq!(canvases, ["radarChart", "miniTrendChart", "trendChart"]);
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        for name in [CHARACTER_FILE, REPORTS_FILE, PROJECTS_FILE] {
            std::fs::copy(format!("{}/{}", SAMPLE_DATA, name), dir.path().join(name)).unwrap();
        }
        let state = Arc::new(AppState::new(config_for(dir.path().to_str().unwrap())));
        let (status, json) = post_json(&state, "/api/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["reports"], 2);

        std::fs::remove_file(dir.path().join(CHARACTER_FILE)).unwrap();
        let (status, json) = post_json(&state, "/api/reload").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["kept_previous"], true);

        let (_, body) = fetch(&state, "/").await;
        assert!(body.contains("LV.14"));
    }

    #[tokio::test]
    async fn report_pages_served_from_data_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("reports")).unwrap();
        std::fs::write(dir.path().join("reports/2026-10-12.html"), "<p>full report</p>").unwrap();
        let state = Arc::new(AppState::new(config_for(dir.path().to_str().unwrap())));
        let (status, body) = fetch(&state, "/reports/2026-10-12.html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>full report</p>");
    }
}
