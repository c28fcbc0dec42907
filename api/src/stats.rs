/// NBA raw wire types: the live-data CDN scoreboard and stats.nba.com result
/// sets. Games are kept as raw records because `/nba/ended` returns them
/// verbatim; only the envelopes are typed.
use crate::{RawRecord, TabularResult};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Live scoreboard  (cdn.nba.com liveData)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ScoreboardResponse {
    pub scoreboard: Scoreboard,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Scoreboard {
    pub games: Vec<RawRecord>,
}

// ---------------------------------------------------------------------------
// Stats endpoints  (stats.nba.com, headers + rowSet tables)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub result_sets: Vec<TabularResult>,
}

impl StatsResponse {
    pub fn into_result_set(self, name: &str) -> Option<TabularResult> {
        self.result_sets.into_iter().find(|t| t.name == name)
    }
}
