use super::{AppState, Reply};
use axum::extract::{Path, State};
use std::sync::Arc;

pub async fn schedule(State(state): State<Arc<AppState>>) -> Reply {
    state.reply("/f1/schedule", state.api.f1_schedule().await)
}

pub async fn standings(State(state): State<Arc<AppState>>) -> Reply {
    state.reply("/f1/standings", state.api.f1_standings().await)
}

pub async fn results(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(String, String)>,
) -> Reply {
    state.reply("/f1/results", state.api.f1_results(&year, &round).await)
}

pub async fn live_timing(
    State(state): State<Arc<AppState>>,
    Path((year, gp, session)): Path<(String, String, String)>,
) -> Reply {
    state.reply(
        "/f1/livetiming",
        state.api.f1_quick_laps(&year, &gp, &session).await,
    )
}
