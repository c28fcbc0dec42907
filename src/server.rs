use crate::routes::{self, AppState, f1, nba};
use crate::settings::Settings;
use anyhow::Context;
use axum::Router;
use axum::routing::get;
use log::info;
use scoregate_api::client::SportsApi;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub fn router(state: AppState, logos_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/nba/today", get(nba::today))
        .route("/nba/standings", get(nba::standings))
        .route("/nba/live", get(nba::live))
        .route("/nba/ended/:game_id", get(nba::ended))
        .route("/nba/game-details/:game_id", get(nba::game_details))
        .route("/f1/schedule", get(f1::schedule))
        .route("/f1/standings", get(f1::standings))
        .route("/f1/results/:year/:round", get(f1::results))
        .route("/f1/livetiming/:year/:gp/:session", get(f1::live_timing))
        .nest_service("/logos", ServeDir::new(logos_dir))
        .layer(cors)
        .with_state(Arc::new(state))
}

pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let state = AppState {
        api: SportsApi::new(settings.endpoints.clone(), settings.upstream_timeout),
        error_mode: settings.error_mode,
    };
    let app = router(state, &settings.logos_dir);

    let listener = TcpListener::bind(&settings.addr)
        .await
        .with_context(|| format!("could not bind {}", settings.addr))?;
    info!(
        "listening on {} (error mode {:?}, logos from {})",
        listener.local_addr()?,
        settings.error_mode,
        settings.logos_dir.display()
    );
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ErrorMode;
    use mockito::{Matcher, Server, ServerGuard};
    use scoregate_api::client::Endpoints;
    use serde_json::{Value, json};
    use std::time::Duration;

    const SCOREBOARD_PATH: &str = "/static/json/liveData/scoreboard/todaysScoreboard_00.json";

    /// Starts the gateway on an ephemeral port with every upstream pointed at
    /// `upstream`, returning its base URL.
    async fn spawn_gateway(upstream: &ServerGuard, mode: ErrorMode, logos_dir: &Path) -> String {
        spawn_gateway_at(&upstream.url(), Duration::from_secs(5), mode, logos_dir).await
    }

    async fn spawn_gateway_at(
        upstream: &str,
        timeout: Duration,
        mode: ErrorMode,
        logos_dir: &Path,
    ) -> String {
        let state = AppState {
            api: SportsApi::new(Endpoints::all_at(upstream), timeout),
            error_mode: mode,
        };
        let app = router(state, logos_dir);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn get_json(url: &str) -> (u16, Value) {
        let response = reqwest::get(url).await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    fn scoreboard() -> String {
        json!({
            "scoreboard": {
                "gameDate": "2025-04-20",
                "games": [{
                    "gameId": "0042400101",
                    "gameStatus": 3,
                    "gameStatusText": "Final",
                    "gameClock": "",
                    "period": 4,
                    "gameLabel": "East First Round",
                    "seriesGameNumber": "Game 1",
                    "seriesText": "BOS leads 1-0",
                    "homeTeam": { "teamId": 1610612738, "teamName": "Celtics", "score": 103 },
                    "awayTeam": { "teamId": 1610612753, "teamName": "Magic", "score": 86 }
                }]
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn today_returns_projected_games() {
        let mut upstream = Server::new_async().await;
        upstream
            .mock("GET", SCOREBOARD_PATH)
            .with_body(scoreboard())
            .create_async()
            .await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, Path::new("logos")).await;

        let (status, body) = get_json(&format!("{base}/nba/today")).await;
        assert_eq!(status, 200);
        assert_eq!(body[0]["home"], json!("Celtics"));
        assert_eq!(body[0]["seriesText"], json!("BOS leads 1-0"));
        assert!(body[0].get("homePeriods").is_none());
    }

    #[tokio::test]
    async fn upstream_failure_is_a_200_error_envelope() {
        let mut upstream = Server::new_async().await;
        upstream
            .mock("GET", SCOREBOARD_PATH)
            .with_status(504)
            .create_async()
            .await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, Path::new("logos")).await;

        for path in ["/nba/today", "/nba/live", "/nba/ended/1"] {
            let (status, body) = get_json(&format!("{base}{path}")).await;
            assert_eq!(status, 200, "{path}");
            let object = body.as_object().unwrap();
            assert_eq!(object.len(), 1, "{path}: {body}");
            let message = object["error"].as_str().unwrap();
            assert!(message.contains("504"), "{message}");
            assert!(!message.contains(&upstream.host_with_port()), "{message}");
        }
    }

    #[tokio::test]
    async fn upstream_timeout_is_a_200_error_envelope() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let stalled = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let base = spawn_gateway_at(
            &stalled,
            Duration::from_millis(200),
            ErrorMode::Legacy,
            Path::new("logos"),
        )
        .await;

        let (status, body) = get_json(&format!("{base}/nba/live")).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "error": "Upstream unavailable: timed out" }));
    }

    #[tokio::test]
    async fn f1_standings_fail_when_one_table_fails() {
        let mut upstream = Server::new_async().await;
        upstream
            .mock("GET", "/ergast/f1/current/driverStandings.json")
            .with_body(
                json!({ "MRData": { "StandingsTable": { "StandingsLists": [{ "DriverStandings": [] }] } } })
                    .to_string(),
            )
            .create_async()
            .await;
        upstream
            .mock("GET", "/ergast/f1/current/constructorStandings.json")
            .with_status(500)
            .create_async()
            .await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, Path::new("logos")).await;

        let (status, body) = get_json(&format!("{base}/f1/standings")).await;
        assert_eq!(status, 200);
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 1, "{body}");
        assert!(object["error"].as_str().unwrap().contains("500"));
    }

    #[tokio::test]
    async fn status_mode_uses_http_codes() {
        let mut upstream = Server::new_async().await;
        upstream
            .mock("GET", SCOREBOARD_PATH)
            .with_status(503)
            .create_async()
            .await;
        upstream
            .mock("GET", "/ergast/f1/2025/99/results.json")
            .with_body(json!({ "MRData": { "RaceTable": { "Races": [] } } }).to_string())
            .create_async()
            .await;
        let base = spawn_gateway(&upstream, ErrorMode::Status, Path::new("logos")).await;

        let (status, body) = get_json(&format!("{base}/nba/today")).await;
        assert_eq!(status, 502);
        assert!(body["error"].is_string());

        let (status, body) = get_json(&format!("{base}/f1/results/2025/99")).await;
        assert_eq!(status, 404);
        assert_eq!(body, json!({ "error": "Race not found: 2025 round 99" }));
    }

    #[tokio::test]
    async fn ended_game_not_found() {
        let mut upstream = Server::new_async().await;
        upstream
            .mock("GET", SCOREBOARD_PATH)
            .with_body(scoreboard())
            .create_async()
            .await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, Path::new("logos")).await;

        let (status, body) = get_json(&format!("{base}/nba/ended/0000000000")).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!({ "error": "Game not found or not finished" }));

        let (_, body) = get_json(&format!("{base}/nba/ended/0042400101")).await;
        assert_eq!(body["homeTeam"]["teamName"], json!("Celtics"));
    }

    #[tokio::test]
    async fn game_details_with_missing_game_is_not_found() {
        let mut upstream = Server::new_async().await;
        upstream
            .mock("GET", SCOREBOARD_PATH)
            .with_body(scoreboard())
            .create_async()
            .await;
        upstream
            .mock("GET", "/stats/boxscoresummaryv2")
            .match_query(Matcher::Any)
            .with_body(json!({ "resultSets": [] }).to_string())
            .create_async()
            .await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, Path::new("logos")).await;

        let (_, body) = get_json(&format!("{base}/nba/game-details/0000000000")).await;
        assert_eq!(body, json!({ "error": "Game not found or not finished" }));

        let (_, body) = get_json(&format!("{base}/nba/game-details/0042400101")).await;
        assert_eq!(body["game"]["gameId"], json!("0042400101"));
        assert_eq!(body["recap"], json!({}));
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let upstream = Server::new_async().await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, Path::new("logos")).await;

        let response = reqwest::Client::new()
            .get(format!("{base}/health"))
            .header("Origin", "https://scores.example")
            .send()
            .await
            .unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
        assert_eq!(response.json::<Value>().await.unwrap(), json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn logos_are_served_from_disk() {
        let dir = std::env::temp_dir().join(format!("scoregate-logos-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("BOS.svg"), "<svg/>").unwrap();

        let upstream = Server::new_async().await;
        let base = spawn_gateway(&upstream, ErrorMode::Legacy, &dir).await;

        let response = reqwest::get(format!("{base}/logos/BOS.svg")).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(response.text().await.unwrap(), "<svg/>");

        let missing = reqwest::get(format!("{base}/logos/NOPE.svg")).await.unwrap();
        assert_eq!(missing.status().as_u16(), 404);

        std::fs::remove_dir_all(&dir).ok();
    }
}
