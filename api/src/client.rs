use crate::ergast::ErgastResponse;
use crate::openf1::OpenF1Session;
use crate::stats::{ScoreboardResponse, StatsResponse};
use crate::{f1, nba, recap};
use crate::{RawRecord, TabularResult};
use chrono::Utc;
use log::{debug, warn};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const NBA_CDN: &str = "https://cdn.nba.com";
const NBA_STATS: &str = "https://stats.nba.com";
const JOLPICA: &str = "https://api.jolpi.ca";
const OPENF1: &str = "https://api.openf1.org";

/// stats.nba.com rejects requests that don't look like they came from nba.com.
const STATS_HEADERS: &[(&str, &str)] = &[
    ("Referer", "https://www.nba.com/"),
    ("Origin", "https://www.nba.com"),
    ("Accept", "application/json, text/plain, */*"),
    ("x-nba-stats-origin", "stats"),
    ("x-nba-stats-token", "true"),
];

/// Base URLs of every upstream provider. Overridable so tests (and mirrors)
/// can point the client elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub nba_cdn: String,
    pub nba_stats: String,
    pub jolpica: String,
    pub openf1: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nba_cdn: NBA_CDN.to_owned(),
            nba_stats: NBA_STATS.to_owned(),
            jolpica: JOLPICA.to_owned(),
            openf1: OPENF1.to_owned(),
        }
    }
}

impl Endpoints {
    /// Every provider served from one host, as in tests against a mock server.
    pub fn all_at(base: &str) -> Self {
        Self {
            nba_cdn: base.to_owned(),
            nba_stats: base.to_owned(),
            jolpica: base.to_owned(),
            openf1: base.to_owned(),
        }
    }
}

/// Upstream client for the NBA live/stats feeds and the F1 data APIs.
#[derive(Debug, Clone)]
pub struct SportsApi {
    client: Client,
    timeout: Duration,
    endpoints: Endpoints,
}

impl Default for SportsApi {
    fn default() -> Self {
        Self::new(Endpoints::default(), Duration::from_secs(10))
    }
}

/// Upstream URLs are kept on the variants for logging but never rendered by
/// `Display`, which is what callers of the gateway get to see.
#[derive(Debug)]
pub enum ApiError {
    UpstreamUnavailable(reqwest::Error, String),
    UpstreamSchema { url: String, detail: String },
    InvalidEndpoint(String),
    SchemaMismatch { table: String, detail: String },
    MissingField(String),
    InvalidRank { field: String, value: String },
    InvalidValue { field: String, value: String },
    NotFound(String),
}

/// Coarse grouping of [`ApiError`] for callers that map failures to
/// transport-level codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Upstream,
    Schema,
    NotFound,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::UpstreamUnavailable(..) | ApiError::InvalidEndpoint(_) => ErrorKind::Upstream,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Schema,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UpstreamUnavailable(e, _) if e.is_timeout() => {
                write!(f, "Upstream unavailable: timed out")
            }
            ApiError::UpstreamUnavailable(e, _) => write!(f, "Upstream unavailable: {e}"),
            ApiError::UpstreamSchema { detail, .. } => {
                write!(f, "Unexpected upstream response: {detail}")
            }
            ApiError::InvalidEndpoint(_) => write!(f, "Invalid upstream endpoint"),
            ApiError::SchemaMismatch { table, detail } => {
                write!(f, "Schema mismatch in {table}: {detail}")
            }
            ApiError::MissingField(field) => write!(f, "Missing field {field}"),
            ApiError::InvalidRank { field, value } => write!(f, "Invalid rank {value} in {field}"),
            ApiError::InvalidValue { field, value } => write!(f, "Invalid value {value} in {field}"),
            ApiError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::UpstreamUnavailable(e, _) => Some(e),
            _ => None,
        }
    }
}

impl SportsApi {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0 (compatible; scoregate/0.1)")
                .build()
                .unwrap_or_default(),
            timeout,
            endpoints,
        }
    }

    // -----------------------------------------------------------------------
    // NBA
    // -----------------------------------------------------------------------

    /// Every game on today's scoreboard, as the live feed sends them.
    pub async fn fetch_scoreboard(&self) -> ApiResult<Vec<RawRecord>> {
        let url = endpoint(
            &self.endpoints.nba_cdn,
            &["static", "json", "liveData", "scoreboard", "todaysScoreboard_00.json"],
            &[],
        )?;
        let raw: ScoreboardResponse = self.get(&url, &[]).await?;
        Ok(raw.scoreboard.games)
    }

    /// Regular season league standings table for `season` (`2025-26`).
    pub async fn fetch_standings(&self, season: &str) -> ApiResult<TabularResult> {
        let url = endpoint(
            &self.endpoints.nba_stats,
            &["stats", "leaguestandingsv3"],
            &[("LeagueID", "00"), ("Season", season), ("SeasonType", "Regular Season")],
        )?;
        let raw: StatsResponse = self.get(&url, STATS_HEADERS).await?;
        raw.into_result_set(nba::STANDINGS_RESULT_SET)
            .ok_or_else(|| ApiError::UpstreamSchema {
                url: url.to_string(),
                detail: format!("no {} result set", nba::STANDINGS_RESULT_SET),
            })
    }

    /// All result sets of the box-score summary for one game.
    pub async fn fetch_boxscore_summary(&self, game_id: &str) -> ApiResult<Vec<TabularResult>> {
        let url = endpoint(
            &self.endpoints.nba_stats,
            &["stats", "boxscoresummaryv2"],
            &[("GameID", game_id)],
        )?;
        let raw: StatsResponse = self.get(&url, STATS_HEADERS).await?;
        Ok(raw.result_sets)
    }

    pub async fn today_games(&self) -> ApiResult<Value> {
        let games = self.fetch_scoreboard().await?;
        nba::today_games(&games)
    }

    pub async fn live_games(&self) -> ApiResult<Value> {
        let games = self.fetch_scoreboard().await?;
        nba::live_games(&games)
    }

    /// Current season standings split into `east` and `west`.
    pub async fn standings(&self) -> ApiResult<Value> {
        let season = nba::season_for(Utc::now());
        let table = self.fetch_standings(&season).await?;
        nba::standings(&table)
    }

    /// The raw scoreboard entry for `game_id`, provided it has finished.
    pub async fn ended_game(&self, game_id: &str) -> ApiResult<Value> {
        let games = self.fetch_scoreboard().await?;
        nba::find_ended(games, game_id).map(Value::Object)
    }

    /// Ended game plus its box-score recap. The scoreboard and the summary
    /// are fetched concurrently; either failing fails the whole call.
    pub async fn game_details(&self, game_id: &str) -> ApiResult<Value> {
        let (games, result_sets) = futures_util::future::try_join(
            self.fetch_scoreboard(),
            self.fetch_boxscore_summary(game_id),
        )
        .await?;
        let game = nba::find_ended(games, game_id)?;
        let recap = recap::assemble(&result_sets)?;
        Ok(json!({ "game": game, "recap": recap }))
    }

    // -----------------------------------------------------------------------
    // F1
    // -----------------------------------------------------------------------

    pub async fn f1_schedule(&self) -> ApiResult<Value> {
        let url = endpoint(&self.endpoints.jolpica, &["ergast", "f1", "current.json"], &[])?;
        let raw: ErgastResponse = self.get(&url, &[]).await?;
        let races = raw.races().ok_or_else(|| missing(&url, "RaceTable"))?;
        Ok(Value::Array(races.into_iter().map(Value::Object).collect()))
    }

    /// Driver and constructor championship tables, fetched concurrently.
    pub async fn f1_standings(&self) -> ApiResult<Value> {
        let drivers_url = endpoint(
            &self.endpoints.jolpica,
            &["ergast", "f1", "current", "driverStandings.json"],
            &[],
        )?;
        let constructors_url = endpoint(
            &self.endpoints.jolpica,
            &["ergast", "f1", "current", "constructorStandings.json"],
            &[],
        )?;
        let (drivers, constructors) = futures_util::future::try_join(
            self.get::<ErgastResponse>(&drivers_url, &[]),
            self.get::<ErgastResponse>(&constructors_url, &[]),
        )
        .await?;
        let drivers = drivers
            .driver_standings()
            .ok_or_else(|| missing(&drivers_url, "StandingsTable"))?;
        let constructors = constructors
            .constructor_standings()
            .ok_or_else(|| missing(&constructors_url, "StandingsTable"))?;
        Ok(json!({ "drivers": drivers, "constructors": constructors }))
    }

    /// Results of one race. `year` is a season or `current`, `round` a round
    /// number or `last`; anything else cannot name a race and is not sent
    /// upstream.
    pub async fn f1_results(&self, year: &str, round: &str) -> ApiResult<Value> {
        if !f1::is_season(year) || !f1::is_round(round) {
            return Err(f1::race_not_found(year, round));
        }
        let url = endpoint(
            &self.endpoints.jolpica,
            &["ergast", "f1", year, round, "results.json"],
            &[],
        )?;
        let raw: ErgastResponse = self.get(&url, &[]).await?;
        let races = raw.races().ok_or_else(|| missing(&url, "RaceTable"))?;
        f1::race_results(races, year, round)
    }

    /// Quick laps of one timing session, looked up by year, grand prix and
    /// session name.
    pub async fn f1_quick_laps(&self, year: &str, gp: &str, session: &str) -> ApiResult<Value> {
        let session_name = f1::session_name(session);
        let url = endpoint(
            &self.endpoints.openf1,
            &["v1", "sessions"],
            &[("year", year), ("session_name", session_name.as_str())],
        )?;
        let sessions: Vec<OpenF1Session> = self.get(&url, &[]).await?;
        let found = f1::find_session(&sessions, gp).ok_or_else(|| {
            ApiError::NotFound(format!("Session not found: {year} {gp} {session_name}"))
        })?;

        let session_key = found.session_key.to_string();
        let laps_url = endpoint(
            &self.endpoints.openf1,
            &["v1", "laps"],
            &[("session_key", session_key.as_str())],
        )?;
        let laps: Vec<RawRecord> = self.get(&laps_url, &[]).await?;
        Ok(Value::Array(
            f1::quick_laps(laps).into_iter().map(Value::Object).collect(),
        ))
    }

    /// One attempt, no retries. Transport failures, non-2xx statuses and
    /// unreadable bodies are `UpstreamUnavailable`; a JSON body of the wrong
    /// shape is `UpstreamSchema`. The URL only goes to the log.
    async fn get<T: DeserializeOwned>(&self, url: &Url, headers: &[(&str, &str)]) -> ApiResult<T> {
        debug!("GET {url}");
        let mut request = self.client.get(url.clone()).timeout(self.timeout);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let unavailable = |e: reqwest::Error| {
            let e = e.without_url();
            warn!("GET {url} failed: {e}");
            ApiError::UpstreamUnavailable(e, url.to_string())
        };
        let response = request
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(unavailable)?;

        let body: Value = response.json().await.map_err(unavailable)?;

        serde_json::from_value(body).map_err(|e| {
            warn!("GET {url} returned an unexpected body: {e}");
            ApiError::UpstreamSchema {
                url: url.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

/// `base` followed by `segments` and `query`, each percent-encoded so a
/// caller-supplied value stays inside its own segment or parameter.
fn endpoint(base: &str, segments: &[&str], query: &[(&str, &str)]) -> ApiResult<Url> {
    let mut url = Url::parse(base).map_err(|e| {
        warn!("bad upstream base {base}: {e}");
        ApiError::InvalidEndpoint(base.to_owned())
    })?;
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidEndpoint(base.to_owned()))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

fn missing(url: &Url, key: &str) -> ApiError {
    warn!("{url} is missing {key}");
    ApiError::UpstreamSchema {
        url: url.to_string(),
        detail: format!("missing {key}"),
    }
}
