//! Box-score recap: several named result sets from one summary call merged
//! into a single object keyed by section.

use crate::client::ApiResult;
use crate::projection::{Field, project, project_all, required_columns};
use crate::tabular::{decode, decode_first};
use crate::TabularResult;
use serde_json::{Map, Value};

pub type RecapBundle = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// First row only, serialized as an object.
    Single,
    /// Every row, serialized as an array.
    List,
}

struct Section {
    upstream: &'static str,
    key: &'static str,
    shape: Shape,
    fields: &'static [Field],
}

const GAME_SUMMARY: &[Field] = &[
    Field::copy("gameId", "GAME_ID"),
    Field::copy("date", "GAME_DATE_EST"),
    Field::copy("status", "GAME_STATUS_TEXT"),
    Field::copy("gameCode", "GAMECODE"),
    Field::copy("homeTeamId", "HOME_TEAM_ID"),
    Field::copy("awayTeamId", "VISITOR_TEAM_ID"),
    Field::copy("season", "SEASON"),
    Field::copy("period", "LIVE_PERIOD"),
    Field::copy("broadcaster", "NATL_TV_BROADCASTER_ABBREVIATION").or_empty(),
];

const GAME_INFO: &[Field] = &[
    Field::copy("date", "GAME_DATE"),
    Field::copy("attendance", "ATTENDANCE"),
    Field::copy("duration", "GAME_TIME").or_empty(),
];

const LAST_MEETING: &[Field] = &[
    Field::copy("gameId", "LAST_GAME_ID"),
    Field::copy("date", "LAST_GAME_DATE_EST"),
    Field::join("home", "LAST_GAME_HOME_TEAM_CITY", "LAST_GAME_HOME_TEAM_NAME"),
    Field::copy("homeTeamId", "LAST_GAME_HOME_TEAM_ID"),
    Field::copy("homePoints", "LAST_GAME_HOME_TEAM_POINTS"),
    Field::join("away", "LAST_GAME_VISITOR_TEAM_CITY", "LAST_GAME_VISITOR_TEAM_NAME"),
    Field::copy("awayTeamId", "LAST_GAME_VISITOR_TEAM_ID"),
    Field::copy("awayPoints", "LAST_GAME_VISITOR_TEAM_POINTS"),
];

const AVAILABLE_VIDEO: &[Field] = &[
    Field::flag("video", "VIDEO_AVAILABLE_FLAG"),
    Field::flag("playerTracking", "PT_AVAILABLE"),
    Field::flag("playerTrackingXyz", "PT_XYZ_AVAILABLE").or_omit(),
];

const OFFICIALS: &[Field] = &[
    Field::copy("id", "OFFICIAL_ID"),
    Field::join("name", "FIRST_NAME", "LAST_NAME"),
    Field::copy("jersey", "JERSEY_NUM").or_empty(),
];

const INACTIVE_PLAYERS: &[Field] = &[
    Field::copy("id", "PLAYER_ID"),
    Field::join("name", "FIRST_NAME", "LAST_NAME"),
    Field::copy("jersey", "JERSEY_NUM").or_empty(),
    Field::copy("teamId", "TEAM_ID"),
    Field::copy("team", "TEAM_ABBREVIATION"),
];

const OTHER_STATS: &[Field] = &[
    Field::copy("teamId", "TEAM_ID"),
    Field::copy("team", "TEAM_ABBREVIATION"),
    Field::copy("pointsInPaint", "PTS_PAINT"),
    Field::copy("secondChancePoints", "PTS_2ND_CHANCE"),
    Field::copy("fastBreakPoints", "PTS_FB"),
    Field::copy("largestLead", "LARGEST_LEAD"),
    Field::copy("leadChanges", "LEAD_CHANGES"),
    Field::copy("timesTied", "TIMES_TIED"),
    Field::copy("turnovers", "TOTAL_TURNOVERS").or_omit(),
    Field::copy("pointsOffTurnovers", "PTS_OFF_TO").or_omit(),
];

const PLAYER_STATS: &[Field] = &[
    Field::copy("playerId", "PLAYER_ID"),
    Field::copy("name", "PLAYER_NAME"),
    Field::copy("teamId", "TEAM_ID"),
    Field::copy("team", "TEAM_ABBREVIATION"),
    Field::copy("position", "START_POSITION").or_empty(),
    Field::copy("minutes", "MIN").or_empty(),
    Field::copy("points", "PTS").or_omit(),
    Field::copy("rebounds", "REB").or_omit(),
    Field::copy("assists", "AST").or_omit(),
    Field::percent("fgPct", "FG_PCT").or_omit(),
    Field::copy("comment", "COMMENT").or_empty(),
];

const SECTIONS: &[Section] = &[
    Section { upstream: "GameSummary", key: "gameSummary", shape: Shape::Single, fields: GAME_SUMMARY },
    Section { upstream: "GameInfo", key: "info", shape: Shape::Single, fields: GAME_INFO },
    Section { upstream: "LastMeeting", key: "lastMeeting", shape: Shape::Single, fields: LAST_MEETING },
    Section { upstream: "Officials", key: "officials", shape: Shape::List, fields: OFFICIALS },
    Section {
        upstream: "InactivePlayers",
        key: "inactivePlayers",
        shape: Shape::List,
        fields: INACTIVE_PLAYERS,
    },
    Section {
        upstream: "AvailableVideo",
        key: "availableVideo",
        shape: Shape::Single,
        fields: AVAILABLE_VIDEO,
    },
    Section { upstream: "OtherStats", key: "otherStats", shape: Shape::List, fields: OTHER_STATS },
    Section { upstream: "PlayerStats", key: "playerStats", shape: Shape::List, fields: PLAYER_STATS },
];

/// Builds the recap from every result set of a box-score summary.
///
/// Sections come out in a fixed order regardless of the upstream order. Result
/// sets the gateway does not know about are skipped, and a known section with
/// no rows is left out entirely.
pub fn assemble(result_sets: &[TabularResult]) -> ApiResult<RecapBundle> {
    let mut bundle = RecapBundle::new();
    for section in SECTIONS {
        let Some(table) = result_sets.iter().find(|t| t.name == section.upstream) else {
            continue;
        };
        if let Some(value) = assemble_section(section, table)? {
            bundle.insert(section.key.to_owned(), value);
        }
    }
    Ok(bundle)
}

fn assemble_section(section: &Section, table: &TabularResult) -> ApiResult<Option<Value>> {
    let expected = required_columns(section.fields);
    match section.shape {
        Shape::Single => {
            let Some(row) = decode_first(table, &expected)? else {
                return Ok(None);
            };
            Ok(Some(Value::Object(project(&row, section.fields)?)))
        }
        Shape::List => {
            let rows = decode(table, &expected)?;
            if rows.is_empty() {
                return Ok(None);
            }
            let entries = project_all(&rows, section.fields)?;
            Ok(Some(Value::Array(entries.into_iter().map(Value::Object).collect())))
        }
    }
}
