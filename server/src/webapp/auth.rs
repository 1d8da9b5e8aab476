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

//! Registration, login and logout endpoints

use crate::context::ServerContext;
use crate::error::{Result, ServerError};
use crate::webapp::extract::{Authenticated, removal_cookie, session_cookie};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};

/// Username/password body shared by register and login
///
/// Missing fields deserialize as empty so they are reported as a
/// validation error rather than a parse error.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordChange {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

pub(crate) async fn register(
    State(context): State<ServerContext>,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>)> {
    let Json(credentials) = body?;
    context
        .accounts
        .register(&credentials.username, &credentials.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully" })),
    ))
}

pub(crate) async fn login(
    State(context): State<ServerContext>,
    jar: CookieJar,
    body: std::result::Result<Json<Credentials>, JsonRejection>,
) -> Result<(CookieJar, Json<Value>)> {
    let Json(credentials) = body?;
    let session = context
        .accounts
        .login(&credentials.username, &credentials.password)
        .await?;

    let jar = jar.add(session_cookie(&context, session.token));
    Ok((jar, Json(json!({ "message": "Logged in successfully" }))))
}

pub(crate) async fn logout(
    auth: Authenticated,
    State(context): State<ServerContext>,
    jar: CookieJar,
) -> (CookieJar, Json<Value>) {
    context.accounts.logout(auth.token).await;

    let jar = jar.remove(removal_cookie(&context));
    (jar, Json(json!({ "message": "Logged out successfully" })))
}

pub(crate) async fn change_password(
    auth: Authenticated,
    State(context): State<ServerContext>,
    body: std::result::Result<Json<PasswordChange>, JsonRejection>,
) -> Result<Json<Value>> {
    let Json(change) = body?;
    if change.old_password.is_empty() || change.new_password.is_empty() {
        return Err(ServerError::Validation(
            "Missing old or new password".to_string(),
        ));
    }

    context
        .accounts
        .change_password(
            auth.account_id,
            &change.old_password,
            &change.new_password,
            Some(auth.token),
        )
        .await?;

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

pub(crate) async fn delete_account(
    auth: Authenticated,
    State(context): State<ServerContext>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>)> {
    context.accounts.delete_account(auth.account_id).await?;

    let jar = jar.remove(removal_cookie(&context));
    Ok((jar, Json(json!({ "message": "Account deleted successfully" }))))
}
