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

//! Shared world record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the world every server starts with
pub const DEFAULT_WORLD_NAME: &str = "Default World";

/// A single placed tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub kind: String,
}

/// The single world shared by all players
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    pub seed: i64,
    pub tiles: Vec<Tile>,
    pub entities: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl World {
    /// An empty world
    pub fn new(name: String, seed: i64) -> Self {
        Self {
            name,
            seed,
            tiles: Vec::new(),
            entities: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(DEFAULT_WORLD_NAME.to_string(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_world() {
        let world = World::default();
        assert_eq!(world.name, "Default World");
        assert!(world.tiles.is_empty());
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_world_serialization() {
        let mut world = World::new("Overworld".to_string(), 1234);
        world.tiles.push(Tile {
            x: 1,
            y: -2,
            kind: "dirt".to_string(),
        });

        let json = serde_json::to_value(&world).unwrap();
        assert_eq!(json["name"], "Overworld");
        assert_eq!(json["seed"], 1234);
        assert_eq!(json["tiles"][0]["kind"], "dirt");
    }
}
