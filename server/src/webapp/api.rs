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

//! Player, world and item endpoints; all require a session

use crate::context::ServerContext;
use crate::demo::DemoPlayer;
use crate::error::{Result, ServerError};
use crate::webapp::extract::Authenticated;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use terrastead_common::item::Item;
use terrastead_common::player::{PlayerId, PlayerRecord, PlayerUpdate};
use terrastead_common::world::World;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePlayer {
    pub name: String,
    pub class: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(rename = "type", alias = "item_type")]
    pub item_type: String,
}

/// Integer ids address persisted records, UUIDs address demo players
pub(crate) async fn get_player(
    _auth: Authenticated,
    State(context): State<ServerContext>,
    Path(id): Path<String>,
) -> Result<Response> {
    if let Ok(id) = id.parse::<i64>() {
        let record = context.players.get(PlayerId(id)).await?;
        return Ok(Json(record).into_response());
    }

    let player = match Uuid::parse_str(&id) {
        Ok(id) => context.demo.get_player(id).await,
        Err(_) => None,
    };
    player
        .map(|player| Json(player).into_response())
        .ok_or_else(|| ServerError::NotFound("Player".to_string()))
}

pub(crate) async fn create_player(
    _auth: Authenticated,
    State(context): State<ServerContext>,
    body: std::result::Result<Json<CreatePlayer>, JsonRejection>,
) -> Result<(StatusCode, Json<DemoPlayer>)> {
    let Json(request) = body?;
    let player = context.demo.create_player(request.name, request.class).await;
    Ok((StatusCode::CREATED, Json(player)))
}

pub(crate) async fn get_world(
    _auth: Authenticated,
    State(context): State<ServerContext>,
) -> Json<World> {
    Json(context.world.as_ref().clone())
}

pub(crate) async fn get_item(
    _auth: Authenticated,
    State(context): State<ServerContext>,
    Path(id): Path<String>,
) -> Result<Json<Item>> {
    let item = match Uuid::parse_str(&id) {
        Ok(id) => context.demo.get_item(id).await,
        Err(_) => None,
    };
    item.map(Json)
        .ok_or_else(|| ServerError::NotFound("Item".to_string()))
}

pub(crate) async fn create_item(
    _auth: Authenticated,
    State(context): State<ServerContext>,
    body: std::result::Result<Json<CreateItem>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>)> {
    let Json(request) = body?;
    let item = context.demo.create_item(request.name, request.item_type).await;
    Ok((StatusCode::CREATED, Json(item)))
}

pub(crate) async fn get_own_player(
    auth: Authenticated,
    State(context): State<ServerContext>,
) -> Result<Json<PlayerRecord>> {
    let record = context.players.get_by_account(auth.account_id).await?;
    Ok(Json(record))
}

pub(crate) async fn save_own_player(
    auth: Authenticated,
    State(context): State<ServerContext>,
    body: std::result::Result<Json<PlayerUpdate>, JsonRejection>,
) -> Result<Json<PlayerRecord>> {
    let Json(update) = body?;
    let mut record = context.players.get_by_account(auth.account_id).await?;
    record.apply(update).map_err(ServerError::Validation)?;

    let saved = context.players.save(&record).await?;
    Ok(Json(saved))
}
