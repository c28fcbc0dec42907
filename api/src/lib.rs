pub mod client;
pub mod ergast;
pub mod f1;
pub mod grouping;
pub mod nba;
pub mod openf1;
pub mod projection;
pub mod recap;
pub mod stats;
pub mod tabular;

use serde::Deserialize;
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Request-scoped records. Nothing here outlives a single response.
// ---------------------------------------------------------------------------

/// An upstream-shaped JSON object, exactly as the provider sent it.
pub type RawRecord = Map<String, Value>;

/// One tabular row keyed by its header names.
pub type DecodedRow = Map<String, Value>;

/// The public shape of one domain object (game, standing, official, lap...).
pub type ProjectedEntry = Map<String, Value>;

/// One named table from a stats.nba.com style response.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabularResult {
    pub name: String,
    pub headers: Vec<String>,
    #[serde(default)]
    pub row_set: Vec<Vec<Value>>,
}

impl TabularResult {
    pub fn new(name: &str, headers: &[&str], row_set: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.to_owned(),
            headers: headers.iter().map(|h| (*h).to_owned()).collect(),
            row_set,
        }
    }
}

/// Scoreboard status codes as reported by the live data feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    #[default]
    Scheduled,
    InProgress,
    Final,
}

impl GameStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => GameStatus::InProgress,
            3 => GameStatus::Final,
            _ => GameStatus::Scheduled,
        }
    }

    /// Reads `gameStatus` off a raw scoreboard game. Unknown or missing codes
    /// count as scheduled.
    pub fn of(game: &RawRecord) -> Self {
        game.get("gameStatus")
            .and_then(Value::as_i64)
            .map(Self::from_code)
            .unwrap_or_default()
    }
}

/// NBA conference, the bucket standings are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conference {
    East,
    West,
}

impl Conference {
    pub fn label(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tabular_result_reads_stats_wire_names() {
        let raw = json!({
            "name": "Standings",
            "headers": ["TeamID", "WINS"],
            "rowSet": [[1610612738, 50]]
        });
        let table: TabularResult = serde_json::from_value(raw).unwrap();
        assert_eq!(table.name, "Standings");
        assert_eq!(table.headers, vec!["TeamID", "WINS"]);
        assert_eq!(table.row_set, vec![vec![json!(1610612738), json!(50)]]);
    }

    #[test]
    fn tabular_result_without_rows_is_empty() {
        let raw = json!({ "name": "LastMeeting", "headers": ["GAME_ID"] });
        let table: TabularResult = serde_json::from_value(raw).unwrap();
        assert!(table.row_set.is_empty());
    }

    #[test]
    fn game_status_codes() {
        assert_eq!(GameStatus::from_code(1), GameStatus::Scheduled);
        assert_eq!(GameStatus::from_code(2), GameStatus::InProgress);
        assert_eq!(GameStatus::from_code(3), GameStatus::Final);
        assert_eq!(GameStatus::from_code(9), GameStatus::Scheduled);

        let game = json!({ "gameStatus": 3 });
        assert_eq!(GameStatus::of(game.as_object().unwrap()), GameStatus::Final);
        let game = json!({ "gameStatusText": "Final" });
        assert_eq!(GameStatus::of(game.as_object().unwrap()), GameStatus::Scheduled);
    }
}
