/// Wire types for the OpenF1 timing API.
/// Endpoints: https://api.openf1.org/v1/sessions, /v1/laps
use serde::Deserialize;

#[derive(Deserialize, Default, Debug, Clone)]
pub struct OpenF1Session {
    pub session_key: i64,
    pub country_name: Option<String>,
    pub location: Option<String>,
    pub circuit_short_name: Option<String>,
}
