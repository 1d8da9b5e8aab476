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

//! HTTP routing

pub mod api;
pub mod auth;
pub mod extract;

use crate::config::CorsConfig;
use crate::context::ServerContext;
use axum::Json;
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{delete, get, post};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the application router
///
/// Transport layers (tracing, CORS, timeouts) are applied by the caller.
pub fn router(context: ServerContext) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/api/player", post(api::create_player))
        .route("/api/player/{id}", get(api::get_player))
        .route("/api/world", get(api::get_world))
        .route("/api/item", post(api::create_item))
        .route("/api/item/{id}", get(api::get_item))
        .route("/api/me", delete(auth::delete_account))
        .route(
            "/api/me/player",
            get(api::get_own_player).put(api::save_own_player),
        )
        .route("/api/me/password", post(auth::change_password))
        .with_state(context)
}

/// CORS policy for the browser client
///
/// Credentials are allowed, so origins must be listed explicitly.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
