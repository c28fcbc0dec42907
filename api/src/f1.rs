//! F1 passthrough shaping: race results, timing-session lookup and the
//! quick-lap filter.

use crate::client::{ApiError, ApiResult};
use crate::openf1::OpenF1Session;
use crate::RawRecord;
use serde_json::Value;

/// Laps slower than this multiple of the session's fastest lap are dropped.
pub const QUICK_LAP_THRESHOLD: f64 = 1.07;

/// Expands the short session codes to OpenF1 session names. Anything else is
/// passed through untouched.
pub fn session_name(session: &str) -> String {
    let name = match session.to_ascii_uppercase().as_str() {
        "R" => "Race",
        "Q" => "Qualifying",
        "S" => "Sprint",
        "SQ" | "SS" => "Sprint Qualifying",
        "FP1" => "Practice 1",
        "FP2" => "Practice 2",
        "FP3" => "Practice 3",
        _ => return session.to_owned(),
    };
    name.to_owned()
}

/// First session whose country, location or circuit matches `gp`, ignoring
/// case.
pub fn find_session<'a>(sessions: &'a [OpenF1Session], gp: &str) -> Option<&'a OpenF1Session> {
    let wanted = gp.trim().to_lowercase();
    sessions.iter().find(|s| {
        [&s.country_name, &s.location, &s.circuit_short_name]
            .into_iter()
            .flatten()
            .any(|name| name.to_lowercase() == wanted)
    })
}

/// A season as Ergast addresses it: `current` or a year.
pub fn is_season(year: &str) -> bool {
    year == "current" || (year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

/// A round as Ergast addresses it: `last` or a round number.
pub fn is_round(round: &str) -> bool {
    round == "last"
        || (!round.is_empty() && round.len() <= 2 && round.bytes().all(|b| b.is_ascii_digit()))
}

pub fn race_not_found(year: &str, round: &str) -> ApiError {
    ApiError::NotFound(format!("Race not found: {year} round {round}"))
}

/// Results table of the single race a `/{year}/{round}` query returns.
pub fn race_results(races: Vec<RawRecord>, year: &str, round: &str) -> ApiResult<Value> {
    let race = races
        .into_iter()
        .next()
        .ok_or_else(|| race_not_found(year, round))?;
    Ok(race
        .get("Results")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new())))
}

/// Keeps timed laps within [`QUICK_LAP_THRESHOLD`] of the fastest one, in
/// upstream order.
pub fn quick_laps(laps: Vec<RawRecord>) -> Vec<RawRecord> {
    let duration = |lap: &RawRecord| lap.get("lap_duration").and_then(Value::as_f64);
    let Some(fastest) = laps.iter().filter_map(duration).reduce(f64::min) else {
        return Vec::new();
    };
    let limit = fastest * QUICK_LAP_THRESHOLD;
    laps.into_iter()
        .filter(|lap| duration(lap).is_some_and(|d| d <= limit))
        .collect()
}
