// Library crate for the poker league score tracker
// This file exposes the public API for the binary and integration tests

pub mod achievements;
pub mod config;
pub mod league;
pub mod models;
pub mod scoring;
pub mod season;
pub mod shared;
pub mod stats;
pub mod store;

use axum::{
    routing::{get, post, put},
    Router,
};

// Re-export commonly used types for easier access in tests
pub use config::LeagueConfig;
pub use league::{LeagueError, LeagueService};
pub use scoring::ParticipantEntry;
pub use shared::{AppError, AppState};
pub use store::{InMemoryStore, Store, StoreError, Write};

/// Every league route, without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/players", get(league::list_players).post(league::add_player))
        .route(
            "/players/:id",
            put(league::update_player).delete(league::remove_player),
        )
        .route("/players/:id/profile", get(league::player_profile))
        .route("/leaderboard", get(league::leaderboard))
        .route("/seasons", get(league::list_seasons).post(league::create_season))
        .route(
            "/seasons/:id",
            put(league::update_season).delete(league::delete_season),
        )
        .route("/seasons/:id/activate", post(league::activate_season))
        .route("/games", get(league::list_games).post(league::record_game))
        .route("/games/:id", put(league::edit_game))
        .route("/news", get(league::list_news))
        .route("/achievements", get(league::list_achievements))
        .route("/achievements/grants", get(league::list_grants))
        .route("/reset", post(league::general_reset))
        .with_state(state)
}
