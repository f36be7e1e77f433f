//! Single binary web server: scorekeeping page at `/`, REST API under `/api`.
//! Run with: cargo run --bin web
//! Env: HOST (default 0.0.0.0), PORT (default 8080), IDLE_TIMEOUT_HOURS (default 12).

use actix_web::{
    get, post,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use cue_tournament::{
    ranking_csv, Match, MatchSubmission, Phase, Player, Progress, TournamentEngine, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: engine + last activity time (for auto-cleanup).
struct TournamentEntry {
    engine: TournamentEngine,
    last_activity: Instant,
}

/// In-memory state: many tournaments by id. One write lock serialises every engine call.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Server settings read from the environment.
#[derive(Clone, Debug, PartialEq)]
struct ServerConfig {
    host: String,
    port: u16,
    idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            idle_timeout: Duration::from_secs(12 * 3600),
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset or unparsable values fall back to the defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            idle_timeout: lookup("IDLE_TIMEOUT_HOURS")
                .and_then(|h| h.parse::<u64>().ok())
                .and_then(|h| h.checked_mul(3600))
                .map(Duration::from_secs)
                .unwrap_or(defaults.idle_timeout),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// What the front end needs to draw the current page.
#[derive(Serialize)]
struct TournamentSnapshot<'a> {
    id: TournamentId,
    phase: Phase,
    progress: Progress,
    roster: &'a [Player],
    matches: &'a [Match],
}

impl<'a> From<&'a TournamentEngine> for TournamentSnapshot<'a> {
    fn from(engine: &'a TournamentEngine) -> Self {
        Self {
            id: engine.id(),
            phase: engine.current_phase(),
            progress: engine.progress(),
            roster: engine.roster(),
            matches: engine.matches(),
        }
    }
}

#[derive(Deserialize)]
struct InitializeBody {
    names: Vec<String>,
}

#[derive(Deserialize)]
struct SubmitMatchBody {
    player1: String,
    player2: String,
    score1: i64,
    score2: i64,
    break_player: String,
    break_score: i64,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

fn bad_request(message: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message.to_string() }))
}

/// Run `f` on one tournament under the write lock, refreshing its last activity.
fn with_tournament(
    state: &AppState,
    id: TournamentId,
    f: impl FnOnce(&mut TournamentEngine) -> HttpResponse,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.engine)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "cue-tournament",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a new tournament in Setup (client stores the id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState) -> HttpResponse {
    let engine = TournamentEngine::new();
    let id = engine.id();
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let response = HttpResponse::Ok().json(TournamentSnapshot::from(&engine));
    g.insert(
        id,
        TournamentEntry {
            engine,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |engine| {
        HttpResponse::Ok().json(TournamentSnapshot::from(&*engine))
    })
}

/// Fix the roster and start play (Setup only). Names are trimmed form input.
#[post("/api/tournaments/{id}/initialize")]
async fn api_initialize(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<InitializeBody>,
) -> HttpResponse {
    let names: Vec<&str> = body.names.iter().map(|n| n.trim()).collect();
    with_tournament(&state, path.id, |engine| match engine.initialize(&names) {
        Ok(()) => HttpResponse::Ok().json(TournamentSnapshot::from(&*engine)),
        Err(e) => bad_request(e),
    })
}

/// Record one match (InProgress only).
#[post("/api/tournaments/{id}/matches")]
async fn api_submit_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SubmitMatchBody>,
) -> HttpResponse {
    let submission = MatchSubmission {
        player1: body.player1.trim(),
        player2: body.player2.trim(),
        score1: body.score1,
        score2: body.score2,
        break_player: body.break_player.trim(),
        break_score: body.break_score,
    };
    with_tournament(&state, path.id, |engine| match engine.submit_match(&submission) {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => bad_request(e),
    })
}

/// Pairs that may still be played, for the pairing drop-downs.
#[get("/api/tournaments/{id}/pairs")]
async fn api_remaining_pairs(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |engine| {
        HttpResponse::Ok().json(engine.remaining_pairs())
    })
}

#[get("/api/tournaments/{id}/ranking")]
async fn api_ranking(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |engine| HttpResponse::Ok().json(engine.ranking()))
}

#[get("/api/tournaments/{id}/ranking.csv")]
async fn api_ranking_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |engine| match ranking_csv(&engine.ranking()) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("CSV export failed for tournament {}: {}", engine.id(), e);
            HttpResponse::InternalServerError().body("export error")
        }
    })
}

/// Back to Setup with an empty roster, from any phase.
#[post("/api/tournaments/{id}/reset")]
async fn api_reset(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |engine| {
        engine.reset();
        HttpResponse::Ok().json(TournamentSnapshot::from(&*engine))
    })
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(serve_index_async))
        .service(api_health)
        .service(favicon)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_initialize)
        .service(api_submit_match)
        .service(api_remaining_pairs)
        .service(api_ranking)
        .service(api_ranking_csv)
        .service(api_reset);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments idle past the timeout
    let state_cleanup = state.clone();
    let idle_timeout = config.idle_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < idle_timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} idle tournament(s)", removed);
            }
        }
    });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}


#[cfg(test)]
mod api_tests {
    use super::*;
    use actix_web::test;
    use serde_json::{json, Value};

    fn new_state() -> AppState {
        Data::new(RwLock::new(HashMap::new()))
    }

    #[actix_web::test]
    async fn full_tournament_over_http() {
        let app = test::init_service(App::new().app_data(new_state()).configure(configure)).await;

        let req = test::TestRequest::post().uri("/api/tournaments").to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(created["phase"], "setup");
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/initialize"))
            .set_json(json!({ "names": ["A", "B"] }))
            .to_request();
        let started: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(started["phase"], "in_progress");
        assert_eq!(started["progress"]["total_matches"], 2);

        for (s1, s2, bp, bs) in [(11, 5, "A", 10), (5, 11, "B", 12)] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/tournaments/{id}/matches"))
                .set_json(json!({
                    "player1": "A", "player2": "B", "score1": s1, "score2": s2,
                    "break_player": bp, "break_score": bs
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert!(resp.status().is_success());
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}/ranking"))
            .to_request();
        let ranking: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ranking["entries"][0]["player"], "A");
        assert_eq!(ranking["highest_break"]["player"], "B");
        assert_eq!(ranking["highest_break"]["score"], 12);

        // Tournament is complete: further matches are rejected.
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/matches"))
            .set_json(json!({
                "player1": "A", "player2": "B", "score1": 1, "score2": 0,
                "break_player": "A", "break_score": 1
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn unknown_tournament_is_404() {
        let app = test::init_service(App::new().app_data(new_state()).configure(configure)).await;
        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{}", uuid::Uuid::new_v4()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn duplicate_names_are_a_bad_request() {
        let app = test::init_service(App::new().app_data(new_state()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/api/tournaments").to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/initialize"))
            .set_json(json!({ "names": ["A", "A"] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().contains("already exists"));
    }

    #[actix_web::test]
    async fn pairs_csv_and_reset_routes() {
        let app = test::init_service(App::new().app_data(new_state()).configure(configure)).await;
        let req = test::TestRequest::post().uri("/api/tournaments").to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_str().unwrap().to_string();

        // Form input is trimmed before it reaches the engine.
        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/initialize"))
            .set_json(json!({ "names": [" Ann ", "Bob", "Cy"] }))
            .to_request();
        let started: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(started["roster"], json!(["Ann", "Bob", "Cy"]));

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/matches"))
            .set_json(json!({
                "player1": "Ann ", "player2": "Bob", "score1": 7, "score2": 3,
                "break_player": " Ann", "break_score": 5
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}/pairs"))
            .to_request();
        let pairs: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(pairs, json!([["Ann", "Bob"], ["Ann", "Cy"], ["Bob", "Cy"]]));

        let req = test::TestRequest::get()
            .uri(&format!("/api/tournaments/{id}/ranking.csv"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/csv; charset=utf-8"
        );
        let body = test::read_body(resp).await;
        assert_eq!(
            body.as_ref(),
            b"rank,player,wins,max_score\n1,Ann,1,7\n2,Bob,0,3\n3,Cy,0,0\n".as_slice()
        );

        let req = test::TestRequest::post()
            .uri(&format!("/api/tournaments/{id}/reset"))
            .to_request();
        let reset: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(reset["id"], id.as_str());
        assert_eq!(reset["phase"], "setup");
        assert_eq!(reset["roster"], json!([]));
        assert_eq!(reset["matches"], json!([]));
        assert_eq!(reset["progress"]["total_matches"], 0);
    }
}
