//! NBA field maps and the pure reshaping behind each basketball endpoint.

use crate::client::{ApiError, ApiResult};
use crate::grouping::group_by_rank;
use crate::projection::{Field, project, project_all, required_columns};
use crate::tabular::decode;
use crate::{Conference, GameStatus, RawRecord, TabularResult};
use chrono::{DateTime, Datelike, Utc};
use serde_json::Value;

pub const STANDINGS_RESULT_SET: &str = "Standings";
pub const GAME_NOT_FOUND: &str = "Game not found or not finished";

const TODAY_GAME: &[Field] = &[
    Field::copy("gameId", "gameId"),
    Field::copy("home", "homeTeam.teamName"),
    Field::copy("away", "awayTeam.teamName"),
    Field::copy("homeScore", "homeTeam.score"),
    Field::copy("awayScore", "awayTeam.score"),
    Field::copy("status", "gameStatusText"),
    Field::copy("gameLabel", "gameLabel").or_empty(),
    Field::copy("seriesGameNumber", "seriesGameNumber").or_empty(),
    Field::copy("seriesText", "seriesText").or_empty(),
    Field::copy("homeTeamId", "homeTeam.teamId"),
    Field::copy("awayTeamId", "awayTeam.teamId"),
    Field::periods("homePeriods", "homeTeam.periods").or_omit(),
    Field::periods("awayPeriods", "awayTeam.periods").or_omit(),
];

const LIVE_GAME: &[Field] = &[
    Field::copy("home", "homeTeam.teamName"),
    Field::copy("away", "awayTeam.teamName"),
    Field::copy("homeScore", "homeTeam.score"),
    Field::copy("awayScore", "awayTeam.score"),
    Field::copy("clock", "gameClock"),
    Field::copy("period", "period"),
    Field::copy("gameLabel", "gameLabel").or_empty(),
    Field::periods("homePeriods", "homeTeam.periods"),
    Field::periods("awayPeriods", "awayTeam.periods"),
];

const STANDING: &[Field] = &[
    Field::join("team", "TeamCity", "TeamName"),
    Field::copy("wins", "WINS"),
    Field::copy("losses", "LOSSES"),
    Field::percent("winPct", "WinPCT"),
    Field::rank("rank", "PlayoffRank"),
    Field::copy("conf", "Conference"),
    Field::copy("streak", "strCurrentStreak").or_empty(),
    Field::copy("teamId", "TeamID"),
];

/// Season id as stats.nba.com spells it. A new season starts in October.
pub fn season_for(now: DateTime<Utc>) -> String {
    let start = if now.month() >= 10 { now.year() } else { now.year() - 1 };
    format!("{start}-{:02}", (start + 1) % 100)
}

pub fn today_games(games: &[RawRecord]) -> ApiResult<Value> {
    let entries = project_all(games, TODAY_GAME)?;
    Ok(Value::Array(entries.into_iter().map(Value::Object).collect()))
}

pub fn live_games(games: &[RawRecord]) -> ApiResult<Value> {
    let live = games.iter().filter(|g| GameStatus::of(g) == GameStatus::InProgress);
    let entries = project_all(live, LIVE_GAME)?;
    Ok(Value::Array(entries.into_iter().map(Value::Object).collect()))
}

pub fn standings(table: &TabularResult) -> ApiResult<Value> {
    let rows = decode(table, &required_columns(STANDING))?;
    let entries = rows
        .iter()
        .map(|row| project(row, STANDING))
        .collect::<ApiResult<Vec<_>>>()?;
    let grouped = group_by_rank::<Conference>(entries, "conf", "rank")?;
    Ok(grouped.into_json())
}

/// Picks the finished game with `game_id` out of the scoreboard.
pub fn find_ended(games: Vec<RawRecord>, game_id: &str) -> ApiResult<RawRecord> {
    games
        .into_iter()
        .find(|g| {
            g.get("gameId").and_then(Value::as_str) == Some(game_id)
                && GameStatus::of(g) == GameStatus::Final
        })
        .ok_or_else(|| ApiError::NotFound(GAME_NOT_FOUND.to_owned()))
}
