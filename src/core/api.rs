//! HTTP + WebSocket API for driving sessions remotely
//!
//! Endpoints:
//! - POST /session/new - Create new session
//! - GET /session/{id} - Get session status
//! - POST /session/{id}/sample - Feed one expression sample (or none)
//! - POST /session/{id}/tick - Advance one frame
//! - POST /session/{id}/pop - Resolve a pointer/touch hit
//! - POST /session/{id}/restart - Restart the run
//! - GET /session/{id}/report - Final run report (404 until over)
//! - WS /ws/{id} - Live updates
//! - GET /health - Health check

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, RwLock};

use crate::core::{save_report, GameSession, ReportWriter};
use crate::types::{
    Bubble, BubbleKind, ClassifyOutput, ExpressionSample, GameMode, PlayArea, Point, RunReport,
};
use crate::{DEFAULT_BUBBLES, DEFAULT_DURATION_SECS};

/// One hosted session and its layout/report bookkeeping
pub struct HostedSession {
    pub id: String,
    pub session: GameSession,
    /// Last area the client told us about; ticks use this until told otherwise
    pub area: PlayArea,
    pub last_report: Option<RunReport>,
    pub update_tx: broadcast::Sender<SessionUpdate>,
}

/// Live update message
#[derive(Debug, Clone, Serialize)]
pub struct SessionUpdate {
    pub score: u32,
    pub elapsed_ms: u64,
    pub is_over: bool,
    pub emotion: String,
    pub bubble_count: usize,
}

/// App state
pub struct AppState {
    pub sessions: RwLock<HashMap<String, HostedSession>>,
    pub report_dir: String,
    /// Shared secret for mutating routes; None disables the check
    pub auth_token: Option<String>,
}

/// Create new session request
#[derive(Debug, Deserialize)]
pub struct NewSessionRequest {
    pub mode: GameMode,
    pub duration_secs: Option<u64>,
    pub bubbles: Option<usize>,
    pub seed: Option<u64>,
    pub area: Option<PlayArea>,
}

/// Create new session response
#[derive(Debug, Serialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    pub websocket_url: String,
}

/// Session status response
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub session_id: String,
    pub mode: GameMode,
    pub score: u32,
    pub elapsed_ms: u64,
    pub is_over: bool,
    pub emotion: String,
    pub bubble_count: usize,
    pub sample_count: u64,
}

/// Feed sample request; `sample: null` means no face this cycle
#[derive(Debug, Deserialize)]
pub struct SampleRequest {
    pub sample: Option<ExpressionSample>,
    /// Normalized gaze hint for bio-mode spawn placement
    pub gaze: Option<Point>,
}

/// Tick request; a changed play area rides along with the frame
#[derive(Debug, Deserialize)]
pub struct TickRequest {
    pub area: Option<PlayArea>,
}

/// Tick response: the rendering sink's view of the field
#[derive(Debug, Serialize)]
pub struct TickResponse {
    pub score: u32,
    pub elapsed_ms: u64,
    pub is_over: bool,
    pub emotion: String,
    pub bubbles: Vec<Bubble>,
}

/// Pop request
#[derive(Debug, Deserialize)]
pub struct PopRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub touch: bool,
}

/// Pop response
#[derive(Debug, Serialize)]
pub struct PopResponse {
    pub popped: bool,
    pub kind: Option<BubbleKind>,
    pub score: u32,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub sessions_active: usize,
}

/// Create the API router
pub fn create_router(report_dir: String, auth_token: Option<String>) -> Router {
    let state = Arc::new(AppState {
        sessions: RwLock::new(HashMap::new()),
        report_dir,
        auth_token,
    });

    Router::new()
        .route("/health", get(health))
        .route("/session/new", post(create_session))
        .route("/session/:id", get(get_session))
        .route("/session/:id/sample", post(feed_sample))
        .route("/session/:id/tick", post(advance_tick))
        .route("/session/:id/pop", post(resolve_pop))
        .route("/session/:id/restart", post(restart_session))
        .route("/session/:id/report", get(get_report))
        .route("/ws/:id", get(websocket_handler))
        .with_state(state)
}

/// Reject a mutating call when the shared token is configured and missing
fn check_auth(state: &AppState, headers: &HeaderMap) -> Result<(), StatusCode> {
    let Some(token) = &state.auth_token else {
        return Ok(());
    };
    let expected = format!("Bearer {}", token);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sessions = state.sessions.read().await;
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        sessions_active: sessions.len(),
    })
}

/// Create new session
async fn create_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<NewSessionRequest>,
) -> Result<Json<NewSessionResponse>, StatusCode> {
    check_auth(&state, &headers)?;

    let session_id = generate_session_id();
    let area = req.area.unwrap_or_default();
    let session = GameSession::new(
        req.mode,
        req.duration_secs.unwrap_or(DEFAULT_DURATION_SECS),
        req.bubbles.unwrap_or(DEFAULT_BUBBLES),
        req.seed,
        Instant::now(),
        &area,
    );
    let (tx, _) = broadcast::channel(100);

    let hosted = HostedSession {
        id: session_id.clone(),
        session,
        area,
        last_report: None,
        update_tx: tx,
    };

    let mut sessions = state.sessions.write().await;
    sessions.insert(session_id.clone(), hosted);

    Ok(Json(NewSessionResponse {
        session_id: session_id.clone(),
        websocket_url: format!("/ws/{}", session_id),
    }))
}

/// Get session status
async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatusResponse>, StatusCode> {
    let sessions = state.sessions.read().await;
    let hosted = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let session = &hosted.session;

    Ok(Json(SessionStatusResponse {
        session_id: id,
        mode: session.mode(),
        score: session.state().score,
        elapsed_ms: session.state().elapsed_ms,
        is_over: session.is_over(),
        emotion: session.emotion().to_string(),
        bubble_count: session.bubbles().len(),
        sample_count: session.sample_count(),
    }))
}

/// Feed one expression sample (or its absence)
async fn feed_sample(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SampleRequest>,
) -> Result<Json<ClassifyOutput>, StatusCode> {
    check_auth(&state, &headers)?;

    let mut sessions = state.sessions.write().await;
    let hosted = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    hosted.session.set_gaze(req.gaze);
    let output = hosted
        .session
        .ingest_sample(req.sample.as_ref(), Instant::now());

    Ok(Json(output))
}

/// Advance one frame
async fn advance_tick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<TickRequest>,
) -> Result<Json<TickResponse>, StatusCode> {
    check_auth(&state, &headers)?;

    let mut sessions = state.sessions.write().await;
    let hosted = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    if let Some(area) = req.area {
        hosted.area = area;
    }
    let area = hosted.area;
    hosted.session.tick(Instant::now(), &area);

    // Persist the report the first time we see the run over
    if hosted.session.is_over() && hosted.last_report.is_none() {
        let result = ReportWriter::new().generate(&hosted.session);
        if let Some(report) = result.report {
            let _ = save_report(&report, &state.report_dir);
            hosted.last_report = Some(report);
        }
    }

    broadcast_update(hosted);

    Ok(Json(TickResponse {
        score: hosted.session.state().score,
        elapsed_ms: hosted.session.state().elapsed_ms,
        is_over: hosted.session.is_over(),
        emotion: hosted.session.emotion().to_string(),
        bubbles: hosted.session.bubbles().to_vec(),
    }))
}

/// Resolve a pointer/touch hit
async fn resolve_pop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<PopRequest>,
) -> Result<Json<PopResponse>, StatusCode> {
    check_auth(&state, &headers)?;

    let mut sessions = state.sessions.write().await;
    let hosted = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let area = hosted.area;
    let outcome = hosted
        .session
        .pop_at(Point::new(req.x, req.y), req.touch, &area);

    broadcast_update(hosted);

    Ok(Json(match outcome {
        Some(outcome) => PopResponse {
            popped: true,
            kind: Some(outcome.kind),
            score: outcome.score,
        },
        None => PopResponse {
            popped: false,
            kind: None,
            score: hosted.session.state().score,
        },
    }))
}

/// Restart the run
async fn restart_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, StatusCode> {
    check_auth(&state, &headers)?;

    let mut sessions = state.sessions.write().await;
    let hosted = sessions.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;

    let area = hosted.area;
    hosted.session.restart(Instant::now(), &area);
    hosted.last_report = None;

    broadcast_update(hosted);

    Ok(StatusCode::NO_CONTENT)
}

/// Get the final report
async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RunReport>, StatusCode> {
    let sessions = state.sessions.read().await;
    let hosted = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;

    let report = hosted.last_report.as_ref().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(report.clone()))
}

/// WebSocket handler for live updates
async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, StatusCode> {
    let sessions = state.sessions.read().await;
    let hosted = sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let rx = hosted.update_tx.subscribe();
    drop(sessions);

    Ok(ws.on_upgrade(move |socket| async move {
        handle_websocket(socket, rx).await;
    }))
}

/// Handle WebSocket connection
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<SessionUpdate>) {
    use futures_util::{SinkExt, StreamExt};
    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            update = rx.recv() => {
                let Ok(update) = update else { break };
                let json = serde_json::to_string(&update).unwrap_or_default();
                if sender.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }
}

/// Push the current session view to any listening sockets
fn broadcast_update(hosted: &HostedSession) {
    let update = SessionUpdate {
        score: hosted.session.state().score,
        elapsed_ms: hosted.session.state().elapsed_ms,
        is_over: hosted.session.is_over(),
        emotion: hosted.session.emotion().to_string(),
        bubble_count: hosted.session.bubbles().len(),
    };
    let _ = hosted.update_tx.send(update);
}

/// Generate session ID
fn generate_session_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    format!("session_{:x}", nanos as u64)
}

/// Run the API server
pub async fn run_server(
    addr: &str,
    report_dir: String,
    auth_token: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(report_dir, auth_token);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("🫧 moodpop API running on {}", addr);
    println!("  POST /session/new          - Create session");
    println!("  GET  /session/:id          - Get status");
    println!("  POST /session/:id/sample   - Feed expression sample");
    println!("  POST /session/:id/tick     - Advance one frame");
    println!("  POST /session/:id/pop      - Resolve a hit");
    println!("  POST /session/:id/restart  - Restart run");
    println!("  GET  /session/:id/report   - Final report");
    println!("  WS   /ws/:id               - Live updates");
    println!("  GET  /health               - Health check");
    axum::serve(listener, router).await?;
    Ok(())
}
