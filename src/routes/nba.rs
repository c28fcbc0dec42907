use super::{AppState, Reply};
use axum::extract::{Path, State};
use std::sync::Arc;

pub async fn today(State(state): State<Arc<AppState>>) -> Reply {
    state.reply("/nba/today", state.api.today_games().await)
}

pub async fn standings(State(state): State<Arc<AppState>>) -> Reply {
    state.reply("/nba/standings", state.api.standings().await)
}

pub async fn live(State(state): State<Arc<AppState>>) -> Reply {
    state.reply("/nba/live", state.api.live_games().await)
}

pub async fn ended(State(state): State<Arc<AppState>>, Path(game_id): Path<String>) -> Reply {
    state.reply("/nba/ended", state.api.ended_game(&game_id).await)
}

pub async fn game_details(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Reply {
    state.reply("/nba/game-details", state.api.game_details(&game_id).await)
}
