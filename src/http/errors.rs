//! Mapping of core failures onto HTTP responses: `{"error": "<message>"}`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;

use crate::roster::RosterError;

impl RosterError {
    /// Short label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            RosterError::MatchNotFound(_) => "match_not_found",
            RosterError::CapacityExceeded { .. } => "capacity_exceeded",
            RosterError::PlayerNotFound(_) => "player_not_found",
            RosterError::EmptyName => "empty_name",
            RosterError::DuplicatePlayer(_) => "duplicate_player",
            RosterError::Persistence(_) => "persistence",
        }
    }

    fn public_message(&self) -> String {
        match self {
            RosterError::MatchNotFound(_) => "Match not found".into(),
            RosterError::CapacityExceeded { .. } => "Match is full".into(),
            RosterError::PlayerNotFound(_) => "Player not found".into(),
            RosterError::Persistence(_) => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for RosterError {
    fn status_code(&self) -> StatusCode {
        match self {
            RosterError::MatchNotFound(_) | RosterError::PlayerNotFound(_) => StatusCode::NOT_FOUND,
            RosterError::CapacityExceeded { .. } | RosterError::EmptyName => StatusCode::BAD_REQUEST,
            RosterError::DuplicatePlayer(_) => StatusCode::CONFLICT,
            RosterError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let RosterError::Persistence(e) = self {
            log::error!("store failure: {e}");
        }
        HttpResponse::build(self.status_code()).json(json!({ "error": self.public_message() }))
    }
}

/// Body for transport-level rejections (bad JSON, bad path).
pub fn error_body(message: &str) -> serde_json::Value {
    json!({ "error": message })
}
