use log::warn;
use scoregate_api::client::Endpoints;
use std::path::PathBuf;
use std::time::Duration;

/// How failures are reported to clients.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// Always HTTP 200; clients look for the `error` key.
    #[default]
    Legacy,
    /// Same body, with a 404/502/500 status picked from the failure.
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub addr: String,
    pub logos_dir: PathBuf,
    pub error_mode: ErrorMode,
    pub upstream_timeout: Duration,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".into(),
            logos_dir: PathBuf::from("logos"),
            error_mode: ErrorMode::Legacy,
            upstream_timeout: Duration::from_secs(10),
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; unset or blank keys keep their
    /// defaults, unparsable ones are reported and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(addr) = var("SCOREGATE_ADDR") {
            settings.addr = addr;
        }
        if let Some(dir) = var("SCOREGATE_LOGOS_DIR") {
            settings.logos_dir = PathBuf::from(dir);
        }
        if let Some(mode) = var("SCOREGATE_ERROR_MODE") {
            match mode.trim().to_ascii_lowercase().as_str() {
                "legacy" => settings.error_mode = ErrorMode::Legacy,
                "status" => settings.error_mode = ErrorMode::Status,
                other => warn!("ignoring SCOREGATE_ERROR_MODE={other:?}, expected legacy or status"),
            }
        }
        if let Some(secs) = var("SCOREGATE_UPSTREAM_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.upstream_timeout = Duration::from_secs(secs),
                _ => warn!("ignoring SCOREGATE_UPSTREAM_TIMEOUT_SECS={secs:?}"),
            }
        }

        let endpoints = &mut settings.endpoints;
        for (key, slot) in [
            ("SCOREGATE_NBA_CDN_URL", &mut endpoints.nba_cdn),
            ("SCOREGATE_NBA_STATS_URL", &mut endpoints.nba_stats),
            ("SCOREGATE_JOLPICA_URL", &mut endpoints.jolpica),
            ("SCOREGATE_OPENF1_URL", &mut endpoints.openf1),
        ] {
            if let Some(url) = var(key) {
                *slot = url.trim_end_matches('/').to_owned();
            }
        }

        settings
    }
}
