//
// Copyright 2025 Hans W. Uhlig. All Rights Reserved.
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

//! Terrastead Common Types
//!
//! This crate defines the plain data types shared across Terrastead:
//! - Accounts and their identifiers
//! - Persisted player records
//! - Session records and the per-request session state
//! - Inert item, enemy and world records
//!
//! Nothing here depends on a storage engine. Enabling the `sqlx` feature adds
//! the row and type derives needed to read these types straight out of a
//! database.

pub mod account;
pub mod enemy;
pub mod item;
pub mod player;
pub mod session;
pub mod world;
