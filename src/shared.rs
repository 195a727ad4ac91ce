use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::league::{LeagueError, LeagueService};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub league: Arc<LeagueService>,
}

impl AppState {
    pub fn new(league: Arc<LeagueService>) -> Self {
        Self { league }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<LeagueError> for AppError {
    fn from(err: LeagueError) -> Self {
        match err {
            LeagueError::RankingInconsistency(_)
            | LeagueError::NoActiveSeason
            | LeagueError::SeasonNotActive(_)
            | LeagueError::Validation(_) => AppError::BadRequest(err.to_string()),
            LeagueError::NotFound(what) => AppError::NotFound(what),
            LeagueError::SeasonClosed(_) => AppError::Conflict(err.to_string()),
            LeagueError::Store(store_err) => AppError::Storage(store_err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Not found: {msg}")),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Store failure surfaced to client");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not save".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
