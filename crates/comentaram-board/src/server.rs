//! Axum web server with WebSocket streaming for the board.

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use comentaram_feed::{Candidate, FeaturedChange, FeaturedSelector, Likes};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::driver::{BoardUpdate, Driver};
use crate::error::Result;
use crate::events::{BoardEvent, BoardSnapshot, TopicDetail};
use crate::simulation::SimulationMode;

/// Shared application state.
pub struct AppState {
    driver: Driver,
    likes: RwLock<Likes>,
    featured: RwLock<FeaturedSelector>,
}

/// Board server.
pub struct BoardServer {
    state: Arc<AppState>,
}

impl BoardServer {
    /// Create a server around a driver. The featured card starts at the head
    /// of the unfiltered board.
    pub fn new(driver: Driver) -> Self {
        let head = driver.simulation().try_read().ok().and_then(|sim| {
            sim.board("").flat().first().map(|t| t.id.clone())
        });
        let mut featured = FeaturedSelector::new();
        featured.reset(head.as_deref());

        Self {
            state: Arc::new(AppState {
                driver,
                likes: RwLock::new(Likes::default()),
                featured: RwLock::new(featured),
            }),
        }
    }

    pub fn driver(&self) -> &Driver {
        &self.state.driver
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/api/status", get(status_handler))
            .route("/api/board", get(board_handler))
            .route("/api/topics/{id}", get(topic_handler))
            .route("/api/topics/{id}/like", post(like_handler))
            .route("/api/featured", post(featured_handler))
            .route("/api/events", get(events_handler))
            .route("/api/driver/start", post(start_handler))
            .route("/api/driver/stop", post(stop_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Serve until the listener fails.
    pub async fn serve(self, addr: std::net::SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Board running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn health_handler() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize, Deserialize)]
struct StatusResponse {
    status: String,
    step: u64,
    rotation: u64,
    topic_count: usize,
    event_count: usize,
    mode: SimulationMode,
    running: bool,
}

async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let sim = state.driver.simulation();
    let sim = sim.read().await;
    Json(StatusResponse {
        status: "ok".to_string(),
        step: sim.step_count(),
        rotation: sim.rotation_count(),
        topic_count: sim.topic_count(),
        event_count: sim.event_count(),
        mode: sim.mode(),
        running: state.driver.is_running(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct BoardQuery {
    #[serde(default)]
    q: String,
}

async fn board_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BoardQuery>,
) -> Json<BoardSnapshot> {
    let featured = state.featured.read().await.current().map(str::to_string);
    let sim = state.driver.simulation();
    let sim = sim.read().await;
    Json(sim.snapshot(&query.q, featured))
}

async fn topic_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TopicDetail>> {
    let liked = state.likes.read().await.is_liked(&id);
    let sim = state.driver.simulation();
    let sim = sim.read().await;
    Ok(Json(sim.detail(&id, liked)?))
}

#[derive(Debug, Serialize, Deserialize)]
struct LikeResponse {
    id: String,
    liked: bool,
    total: usize,
}

async fn like_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>> {
    state.driver.simulation().read().await.catalog().require(&id)?;
    let mut likes = state.likes.write().await;
    let liked = likes.toggle(&id);
    debug!("Topic {} liked={}", id, liked);
    Ok(Json(LikeResponse {
        id,
        liked,
        total: likes.count(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
struct FeaturedRequest {
    target_y: f64,
    candidates: Vec<Candidate>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FeaturedResponse {
    featured: Option<String>,
    changed: bool,
}

async fn featured_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FeaturedRequest>,
) -> Json<FeaturedResponse> {
    let mut selector = state.featured.write().await;
    let change = selector.on_resize(req.target_y, &req.candidates);
    Json(FeaturedResponse {
        featured: selector.current().map(str::to_string),
        changed: change.is_some(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct EventsQuery {
    #[serde(default)]
    since: u64,
}

async fn events_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EventsQuery>,
) -> Json<Vec<BoardEvent>> {
    let sim = state.driver.simulation();
    let events = sim.read().await.events_since(query.since);
    Json(events)
}

#[derive(Debug, Serialize, Deserialize)]
struct DriverResponse {
    running: bool,
    changed: bool,
}

async fn start_handler(State(state): State<Arc<AppState>>) -> Json<DriverResponse> {
    let changed = state.driver.start();
    Json(DriverResponse {
        running: state.driver.is_running(),
        changed,
    })
}

async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<DriverResponse> {
    let changed = state.driver.stop();
    Json(DriverResponse {
        running: state.driver.is_running(),
        changed,
    })
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    /// Filter this session's board
    Search { query: String },
    /// The page scrolled and wants a layout frame
    Scroll,
    /// Card geometry, sent from a frame callback or after a resize
    Layout {
        target_y: f64,
        candidates: Vec<Candidate>,
        #[serde(default)]
        resize: bool,
    },
    GetSnapshot,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsMessage {
    Snapshot(BoardSnapshot),
    Featured(FeaturedChange),
    Events { events: Vec<BoardEvent> },
    Error { message: String },
}

/// Per-connection view: its own search and featured card.
struct Session {
    query: String,
    featured: FeaturedSelector,
}

impl Session {
    async fn snapshot(&self, state: &AppState) -> BoardSnapshot {
        let sim = state.driver.simulation();
        let sim = sim.read().await;
        sim.snapshot(&self.query, self.featured.current().map(str::to_string))
    }

    async fn reset_featured(&mut self, state: &AppState) {
        let sim = state.driver.simulation();
        let sim = sim.read().await;
        let board = sim.board(&self.query);
        self.featured.reset(board.flat().first().map(|t| t.id.as_str()));
    }

    /// Apply a command and return the replies it produces.
    async fn handle(&mut self, state: &AppState, cmd: WsCommand) -> Vec<WsMessage> {
        match cmd {
            WsCommand::Search { query } => {
                self.query = query.trim().to_string();
                self.reset_featured(state).await;
                vec![WsMessage::Snapshot(self.snapshot(state).await)]
            }
            WsCommand::Scroll => {
                self.featured.on_scroll();
                Vec::new()
            }
            WsCommand::Layout {
                target_y,
                candidates,
                resize,
            } => {
                let change = if resize {
                    self.featured.on_resize(target_y, &candidates)
                } else {
                    self.featured.on_frame(target_y, &candidates)
                };
                change.map(WsMessage::Featured).into_iter().collect()
            }
            WsCommand::GetSnapshot => vec![WsMessage::Snapshot(self.snapshot(state).await)],
        }
    }
}

async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    let mut updates = state.driver.subscribe();
    let mut session = Session {
        query: String::new(),
        featured: FeaturedSelector::new(),
    };
    session.reset_featured(&state).await;

    let snapshot = WsMessage::Snapshot(session.snapshot(&state).await);
    if let Err(e) = send_message(&mut socket, &snapshot).await {
        warn!("Failed to send initial snapshot: {}", e);
        return;
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let replies = match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<WsCommand>(&text) {
                            Ok(cmd) => session.handle(&state, cmd).await,
                            Err(e) => vec![WsMessage::Error { message: e.to_string() }],
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                        Vec::new()
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => Vec::new(),
                };
                if send_all(&mut socket, replies).await.is_err() {
                    break;
                }
            }
            update = updates.recv() => {
                let replies = match update {
                    Ok(update) => on_update(&session, &state, update).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!("WebSocket client lagged {} updates", skipped);
                        vec![WsMessage::Snapshot(session.snapshot(&state).await)]
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                if send_all(&mut socket, replies).await.is_err() {
                    break;
                }
            }
        }
    }
}

async fn on_update(session: &Session, state: &AppState, update: BoardUpdate) -> Vec<WsMessage> {
    let mut replies = Vec::with_capacity(2);
    if !update.events.is_empty() {
        replies.push(WsMessage::Events {
            events: update.events,
        });
    }
    replies.push(WsMessage::Snapshot(session.snapshot(state).await));
    replies
}

async fn send_all(socket: &mut WebSocket, messages: Vec<WsMessage>) -> std::result::Result<(), axum::Error> {
    for message in &messages {
        send_message(socket, message).await?;
    }
    Ok(())
}

async fn send_message(socket: &mut WebSocket, message: &WsMessage) -> std::result::Result<(), axum::Error> {
    let json = match serde_json::to_string(message) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize message: {}", e);
            return Ok(());
        }
    };
    socket.send(Message::Text(json.into())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::driver::DriverConfig;
    use crate::simulation::{Simulation, SimulationConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde::de::DeserializeOwned;
    use std::time::Duration;
    use tower::ServiceExt;

    fn server() -> (BoardServer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let sim = Simulation::seeded(SimulationConfig::default()).unwrap();
        let driver = Driver::new(sim, clock.clone(), DriverConfig::default());
        (BoardServer::new(driver), clock)
    }

    async fn call(router: Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Vec<u8>) {
        let mut req = Request::builder().method(method).uri(uri);
        if body.is_some() {
            req = req.header("content-type", "application/json");
        }
        let req = req.body(body.map(Body::from).unwrap_or_else(Body::empty)).unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(router: Router, uri: &str) -> T {
        let (status, body) = call(router, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn health_and_status() {
        let (server, _) = server();
        let (status, body) = call(server.router(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"ok");

        let status: StatusResponse = get_json(server.router(), "/api/status").await;
        assert_eq!(status.topic_count, 12);
        assert_eq!(status.step, 0);
        assert_eq!(status.mode, SimulationMode::Evidence);
        assert!(!status.running);
    }

    #[tokio::test]
    async fn board_starts_featuring_head() {
        let (server, _) = server();
        let snap: BoardSnapshot = get_json(server.router(), "/api/board").await;
        assert_eq!(snap.board.len(), 12);
        assert_eq!(snap.featured.as_deref(), Some("presidencia"));
    }

    #[tokio::test]
    async fn board_search_filters() {
        let (server, _) = server();
        let snap: BoardSnapshot = get_json(server.router(), "/api/board?q=flamengo").await;
        assert_eq!(snap.board.flat_ids(), vec!["flamengo".to_string()]);
        assert_eq!(snap.board.query, "flamengo");
    }

    #[tokio::test]
    async fn topic_detail_and_unknown_topic() {
        let (server, _) = server();
        let detail: TopicDetail = get_json(server.router(), "/api/topics/stf").await;
        assert_eq!(detail.topic.id, "stf");
        assert!(!detail.liked);

        let (status, _) = call(server.router(), "GET", "/api/topics/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn like_toggles() {
        let (server, _) = server();
        let (status, body) = call(server.router(), "POST", "/api/topics/ufc/like", None).await;
        assert_eq!(status, StatusCode::OK);
        let like: LikeResponse = serde_json::from_slice(&body).unwrap();
        assert!(like.liked);
        assert_eq!(like.total, 1);

        let detail: TopicDetail = get_json(server.router(), "/api/topics/ufc").await;
        assert!(detail.liked);

        let (_, body) = call(server.router(), "POST", "/api/topics/ufc/like", None).await;
        let like: LikeResponse = serde_json::from_slice(&body).unwrap();
        assert!(!like.liked);
        assert_eq!(like.total, 0);

        let (status, _) = call(server.router(), "POST", "/api/topics/nope/like", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn featured_follows_geometry() {
        let (server, _) = server();
        let body = serde_json::json!({
            "target_y": 200.0,
            "candidates": [
                { "id": "a", "rect": { "top": 0.0, "height": 100.0 } },
                { "id": "b", "rect": { "top": 145.0, "height": 100.0 } },
                { "id": "c", "rect": { "top": 350.0, "height": 100.0 } }
            ]
        });
        let (status, body) =
            call(server.router(), "POST", "/api/featured", Some(body.to_string())).await;
        assert_eq!(status, StatusCode::OK);
        let resp: FeaturedResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.featured.as_deref(), Some("b"));
        assert!(resp.changed);

        // empty list keeps the pick
        let body = serde_json::json!({ "target_y": 200.0, "candidates": [] });
        let (_, body) = call(server.router(), "POST", "/api/featured", Some(body.to_string())).await;
        let resp: FeaturedResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.featured.as_deref(), Some("b"));
        assert!(!resp.changed);
    }

    #[tokio::test]
    async fn events_after_pumping() {
        let (server, clock) = server();
        clock.advance(Duration::from_secs(60));
        server.driver().pump().await;

        let events: Vec<BoardEvent> = get_json(server.router(), "/api/events").await;
        assert!(!events.is_empty());
        let last = events.last().unwrap().seq();
        let tail: Vec<BoardEvent> =
            get_json(server.router(), &format!("/api/events?since={}", last)).await;
        assert_eq!(tail.len(), 1);
    }

    #[tokio::test]
    async fn driver_start_stop_routes() {
        let (server, _) = server();
        let (_, body) = call(server.router(), "POST", "/api/driver/start", None).await;
        let resp: DriverResponse = serde_json::from_slice(&body).unwrap();
        assert!(resp.running && resp.changed);

        let (_, body) = call(server.router(), "POST", "/api/driver/start", None).await;
        let resp: DriverResponse = serde_json::from_slice(&body).unwrap();
        assert!(resp.running && !resp.changed);

        let (_, body) = call(server.router(), "POST", "/api/driver/stop", None).await;
        let resp: DriverResponse = serde_json::from_slice(&body).unwrap();
        assert!(!resp.running && resp.changed);
    }

    #[tokio::test]
    async fn session_commands() {
        let (server, _) = server();
        let state = server.state.clone();
        let mut session = Session {
            query: String::new(),
            featured: FeaturedSelector::new(),
        };
        session.reset_featured(&state).await;
        assert_eq!(session.featured.current(), Some("presidencia"));

        let replies = session
            .handle(&state, WsCommand::Search { query: " UFC ".into() })
            .await;
        assert!(matches!(&replies[..], [WsMessage::Snapshot(s)] if s.board.flat_ids() == ["ufc"]));
        assert_eq!(session.featured.current(), Some("ufc"));

        let cards = vec![Candidate::mounted("x", 0.0, 100.0), Candidate::mounted("y", 300.0, 100.0)];

        // a frame without a scroll does nothing
        let replies = session
            .handle(&state, WsCommand::Layout { target_y: 60.0, candidates: cards.clone(), resize: false })
            .await;
        assert!(replies.is_empty());

        session.handle(&state, WsCommand::Scroll).await;
        let replies = session
            .handle(&state, WsCommand::Layout { target_y: 60.0, candidates: cards.clone(), resize: false })
            .await;
        assert!(matches!(&replies[..], [WsMessage::Featured(c)] if c.current == "x"));

        let replies = session
            .handle(&state, WsCommand::Layout { target_y: 340.0, candidates: cards, resize: true })
            .await;
        assert!(matches!(&replies[..], [WsMessage::Featured(c)] if c.current == "y"));
    }

    #[test]
    fn ws_command_wire_format() {
        let cmd: WsCommand = serde_json::from_str(r#"{"type":"search","query":"stf"}"#).unwrap();
        assert!(matches!(cmd, WsCommand::Search { query } if query == "stf"));

        let cmd: WsCommand = serde_json::from_str(
            r#"{"type":"layout","target_y":10,"candidates":[{"id":"a","rect":null}]}"#,
        )
        .unwrap();
        assert!(matches!(cmd, WsCommand::Layout { resize: false, .. }));

        let json = serde_json::to_string(&WsMessage::Events { events: vec![] }).unwrap();
        assert_eq!(json, r#"{"type":"events","events":[]}"#);
    }
}
