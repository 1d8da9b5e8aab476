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

//! Inert enemy records
//!
//! An enemy is only a row shape: a name, its health and the name of the
//! attack pattern the client plays. No behavior runs on the server.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health given to an enemy when none is specified
pub const DEFAULT_ENEMY_HEALTH: i32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Enemy {
    pub id: Uuid,
    pub name: String,
    #[serde(default = "default_health")]
    pub health: i32,
    pub attack_pattern: String,
}

fn default_health() -> i32 {
    DEFAULT_ENEMY_HEALTH
}

impl Enemy {
    pub fn new(name: String, attack_pattern: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            health: DEFAULT_ENEMY_HEALTH,
            attack_pattern,
        }
    }
}

impl std::fmt::Display for Enemy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] ({} hp)", self.name, self.attack_pattern, self.health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_enemy_has_default_health() {
        let enemy = Enemy::new("Slime".to_string(), "hop".to_string());
        assert_eq!(enemy.health, 50);
        assert_eq!(enemy.attack_pattern, "hop");
        assert_eq!(enemy.to_string(), "Slime [hop] (50 hp)");
    }

    #[test]
    fn test_missing_health_deserializes_to_default() {
        let enemy: Enemy = serde_json::from_value(serde_json::json!({
            "id": Uuid::nil(),
            "name": "Bat",
            "attack_pattern": "swoop",
        }))
        .unwrap();

        assert_eq!(enemy.health, DEFAULT_ENEMY_HEALTH);
        assert_eq!(enemy.name, "Bat");
    }
}
