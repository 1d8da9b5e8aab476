//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Server error taxonomy and its HTTP mapping
//!
//! Every store and service in this crate reports failures as a [`ServerError`].
//! Client-caused kinds carry a message that is safe to show; storage and
//! internal failures are logged in full and answered with a generic message.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use terrastead_common::account::AccountId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Missing or malformed input
    #[error("{0}")]
    Validation(String),

    #[error("Username already exists")]
    DuplicateUsername,

    /// Unknown username or wrong password; the two are never distinguished
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// No session, or one that does not resolve to a live account
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Account {0} not found")]
    AccountNotFound(AccountId),

    #[error("Player record already exists for account {0}")]
    DuplicateRecord(AccountId),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) | ServerError::DuplicateUsername => StatusCode::BAD_REQUEST,
            ServerError::InvalidCredentials | ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) | ServerError::AccountNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::DuplicateRecord(_) | ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Storage(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ServerError::Storage(_) => {
                tracing::error!("{}", self);
                "Database operation failed".to_string()
            }
            ServerError::Internal(_) => {
                tracing::error!("{}", self);
                "Internal server error".to_string()
            }
            ServerError::Unauthorized | ServerError::InvalidCredentials => {
                tracing::warn!("Rejected request: {}", self);
                self.to_string()
            }
            _ => {
                tracing::info!("Request failed: {}", self);
                self.to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<bcrypt::BcryptError> for ServerError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ServerError::Internal(format!("Password hashing failed: {}", err))
    }
}

impl From<tokio::task::JoinError> for ServerError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServerError::Internal(format!("Background task failed: {}", err))
    }
}

impl From<serde_json::Error> for ServerError {
    fn from(err: serde_json::Error) -> Self {
        ServerError::Internal(format!("Serialization failed: {}", err))
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::Validation(rejection.body_text())
    }
}

/// Check whether a database error is a `UNIQUE` constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Check whether a database error is a foreign key violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}
