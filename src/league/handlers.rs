use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::types::{
    GameEditRequest, GameRecordRequest, GamesQuery, LeaderboardResponse, PlayerCreateRequest,
    PlayerProfileResponse, PlayerUpdateRequest, SeasonCreateRequest, SeasonUpdateRequest,
};
use crate::{
    achievements::AchievementView,
    models::{Game, NewsItem, Player, PlayerAchievement, Season},
    shared::{AppError, AppState},
};

/// GET /players
#[instrument(name = "list_players", skip(state))]
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<Player>>, AppError> {
    let players = state.league.players().await?;
    info!(player_count = players.len(), "Players listed");
    Ok(Json(players))
}

/// POST /players
#[instrument(name = "add_player", skip(state))]
pub async fn add_player(
    State(state): State<AppState>,
    Json(request): Json<PlayerCreateRequest>,
) -> Result<(StatusCode, Json<Player>), AppError> {
    let player = state.league.add_player(request).await?;
    Ok((StatusCode::CREATED, Json(player)))
}

/// PUT /players/:id
#[instrument(name = "update_player", skip(state))]
pub async fn update_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Json(request): Json<PlayerUpdateRequest>,
) -> Result<Json<Player>, AppError> {
    let player = state.league.update_player(&player_id, request).await?;
    Ok(Json(player))
}

/// DELETE /players/:id
#[instrument(name = "remove_player", skip(state))]
pub async fn remove_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.league.remove_player(&player_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /players/:id/profile
#[instrument(name = "player_profile", skip(state))]
pub async fn player_profile(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerProfileResponse>, AppError> {
    let profile = state.league.player_profile(&player_id).await?;
    Ok(Json(profile))
}

/// GET /leaderboard
#[instrument(name = "leaderboard", skip(state))]
pub async fn leaderboard(
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let board = state.league.leaderboard().await?;
    Ok(Json(board))
}

/// GET /seasons
#[instrument(name = "list_seasons", skip(state))]
pub async fn list_seasons(State(state): State<AppState>) -> Result<Json<Vec<Season>>, AppError> {
    let seasons = state.league.seasons().await?;
    Ok(Json(seasons))
}

/// POST /seasons
#[instrument(name = "create_season", skip(state))]
pub async fn create_season(
    State(state): State<AppState>,
    Json(request): Json<SeasonCreateRequest>,
) -> Result<(StatusCode, Json<Season>), AppError> {
    let season = state.league.create_season(request).await?;
    Ok((StatusCode::CREATED, Json(season)))
}

/// PUT /seasons/:id
#[instrument(name = "update_season", skip(state))]
pub async fn update_season(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
    Json(request): Json<SeasonUpdateRequest>,
) -> Result<Json<Season>, AppError> {
    let season = state.league.update_season(&season_id, request).await?;
    Ok(Json(season))
}

/// DELETE /seasons/:id
#[instrument(name = "delete_season", skip(state))]
pub async fn delete_season(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.league.delete_season(&season_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /seasons/:id/activate
///
/// Closes the running season (archiving its leaderboard) when there is one.
#[instrument(name = "activate_season", skip(state))]
pub async fn activate_season(
    State(state): State<AppState>,
    Path(season_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.league.activate_season(&season_id).await?;
    info!(season_id = %season_id, "Season is now active");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /games
#[instrument(name = "list_games", skip(state))]
pub async fn list_games(
    State(state): State<AppState>,
    Query(query): Query<GamesQuery>,
) -> Result<Json<Vec<Game>>, AppError> {
    let games = state.league.games(query.season_id.as_deref()).await?;
    Ok(Json(games))
}

/// POST /games
#[instrument(name = "record_game", skip(state, request))]
pub async fn record_game(
    State(state): State<AppState>,
    Json(request): Json<GameRecordRequest>,
) -> Result<(StatusCode, Json<Game>), AppError> {
    let game = state
        .league
        .record_game(&request.season_id, request.participants)
        .await?;

    info!(game_id = %game.id, season_id = %game.season_id, "Game recorded via API");
    Ok((StatusCode::CREATED, Json(game)))
}

/// PUT /games/:id
#[instrument(name = "edit_game", skip(state, request))]
pub async fn edit_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(request): Json<GameEditRequest>,
) -> Result<Json<Game>, AppError> {
    let game = state.league.edit_game(&game_id, request.participants).await?;
    Ok(Json(game))
}

/// GET /news
#[instrument(name = "list_news", skip(state))]
pub async fn list_news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>, AppError> {
    let news = state.league.news().await?;
    Ok(Json(news))
}

/// GET /achievements
pub async fn list_achievements(State(state): State<AppState>) -> Json<Vec<AchievementView>> {
    Json(state.league.achievement_catalog())
}

/// GET /achievements/grants
#[instrument(name = "list_grants", skip(state))]
pub async fn list_grants(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerAchievement>>, AppError> {
    let grants = state.league.achievement_grants().await?;
    Ok(Json(grants))
}

/// POST /reset
#[instrument(name = "general_reset", skip(state))]
pub async fn general_reset(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.league.general_reset().await?;
    info!("League data wiped");
    Ok(StatusCode::NO_CONTENT)
}
