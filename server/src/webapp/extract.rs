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

use crate::context::ServerContext;
use crate::error::ServerError;
use crate::session::SessionState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use terrastead_common::account::AccountId;
use uuid::Uuid;

/// Proof that the request carries a session resolving to a live account
///
/// Handlers that take this extractor never run for anonymous requests; the
/// request is rejected with `401` before the body is read.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    pub account_id: AccountId,
    pub token: Uuid,
}

impl FromRequestParts<ServerContext> for Authenticated {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        context: &ServerContext,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = session_token(&jar, &context.settings.cookie_name)
            .ok_or(ServerError::Unauthorized)?;

        match context.accounts.resolve(token).await? {
            SessionState::Authenticated(account_id) => Ok(Self { account_id, token }),
            SessionState::Anonymous => Err(ServerError::Unauthorized),
        }
    }
}

/// Read the session token from the cookie jar, ignoring malformed values
pub(crate) fn session_token(jar: &CookieJar, cookie_name: &str) -> Option<Uuid> {
    jar.get(cookie_name)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub(crate) fn session_cookie(context: &ServerContext, token: Uuid) -> Cookie<'static> {
    Cookie::build((context.settings.cookie_name.clone(), token.to_string()))
        .http_only(true)
        .secure(context.settings.secure_cookie)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

pub(crate) fn removal_cookie(context: &ServerContext) -> Cookie<'static> {
    Cookie::build((context.settings.cookie_name.clone(), ""))
        .path("/")
        .build()
}
