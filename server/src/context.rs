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

use crate::account::AccountService;
use crate::auth::CredentialStore;
use crate::config::Configuration;
use crate::demo::DemoRegistry;
use crate::player::PlayerStore;
use crate::session::SessionManager;
use sqlx::SqlitePool;
use std::sync::Arc;
use terrastead_common::world::World;

/// Tunables the context needs from configuration
#[derive(Debug, Clone)]
pub struct ContextSettings {
    pub bcrypt_cost: u32,
    pub session_timeout: i64,
    pub cookie_name: String,
    pub secure_cookie: bool,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self::from(&Configuration::default())
    }
}

impl From<&Configuration> for ContextSettings {
    fn from(config: &Configuration) -> Self {
        Self {
            bcrypt_cost: config.security.bcrypt_cost,
            session_timeout: config.session.timeout,
            cookie_name: config.session.cookie_name.clone(),
            secure_cookie: config.session.secure_cookie,
        }
    }
}

/// Server context containing shared resources
#[derive(Clone)]
pub struct ServerContext {
    pub players: Arc<PlayerStore>,

    /// Session manager for tracking logins
    pub session_manager: Arc<SessionManager>,

    pub accounts: Arc<AccountService>,

    /// Demo players and items, dropped with the context
    pub demo: Arc<DemoRegistry>,

    /// The shared world loaded at startup
    pub world: Arc<World>,

    pub settings: Arc<ContextSettings>,
}

impl ServerContext {
    pub fn new(database: SqlitePool, world: World, settings: ContextSettings) -> Self {
        let credentials = Arc::new(CredentialStore::new(database.clone(), settings.bcrypt_cost));
        let players = Arc::new(PlayerStore::new(database.clone()));
        let session_manager = Arc::new(SessionManager::new(settings.session_timeout));
        let accounts = Arc::new(AccountService::new(
            database,
            credentials,
            Arc::clone(&players),
            Arc::clone(&session_manager),
        ));

        Self {
            players,
            session_manager,
            accounts,
            demo: Arc::new(DemoRegistry::new()),
            world: Arc::new(world),
            settings: Arc::new(settings),
        }
    }

    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session_manager
    }

    pub fn accounts(&self) -> &Arc<AccountService> {
        &self.accounts
    }
}
