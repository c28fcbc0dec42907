/// Wire types for the Jolpica F1 API (Ergast-compatible).
/// Endpoint: https://api.jolpi.ca/ergast/f1/...
use crate::RawRecord;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Default, Debug)]
pub struct ErgastResponse {
    #[serde(rename = "MRData")]
    pub mr_data: MrData,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct MrData {
    pub race_table: Option<RaceTable>,
    pub standings_table: Option<StandingsTable>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct RaceTable {
    #[serde(default)]
    pub races: Vec<RawRecord>,
}

#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StandingsTable {
    #[serde(default)]
    pub standings_lists: Vec<StandingsList>,
}

/// Only one of the two tables is populated, depending on the endpoint.
#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "PascalCase")]
pub struct StandingsList {
    #[serde(default)]
    pub driver_standings: Option<Vec<Value>>,
    #[serde(default)]
    pub constructor_standings: Option<Vec<Value>>,
}

impl ErgastResponse {
    pub fn races(self) -> Option<Vec<RawRecord>> {
        self.mr_data.race_table.map(|t| t.races)
    }

    /// `None` when the response carries no standings table at all; an
    /// empty list before the first race of a season.
    pub fn driver_standings(self) -> Option<Vec<Value>> {
        let table = self.mr_data.standings_table?;
        Some(
            table
                .standings_lists
                .into_iter()
                .next()
                .and_then(|l| l.driver_standings)
                .unwrap_or_default(),
        )
    }

    pub fn constructor_standings(self) -> Option<Vec<Value>> {
        let table = self.mr_data.standings_table?;
        Some(
            table
                .standings_lists
                .into_iter()
                .next()
                .and_then(|l| l.constructor_standings)
                .unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn standings_before_the_season_starts() {
        let raw = json!({ "MRData": { "StandingsTable": { "season": "2026", "StandingsLists": [] } } });
        let parsed: ErgastResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.driver_standings(), Some(vec![]));
    }

    #[test]
    fn missing_tables_are_none() {
        let raw = json!({ "MRData": { "total": "0" } });
        let parsed: ErgastResponse = serde_json::from_value(raw).unwrap();
        assert!(parsed.races().is_none());
    }

    #[test]
    fn missing_envelope_is_rejected() {
        assert!(serde_json::from_value::<ErgastResponse>(json!({ "data": {} })).is_err());
    }
}
