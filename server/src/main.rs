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

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use terrastead_server::config::{Arguments, Configuration};
use terrastead_server::context::{ContextSettings, ServerContext};
use terrastead_server::database;
use terrastead_server::webapp;
use terrastead_server::world::WorldStore;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load arguments from the command line
    let arguments: Arguments = Parser::parse();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .with_ansi(true)
        .init();

    // Load environment variables from .env file if specified
    if let Some(ref env_file) = arguments.env_file {
        if std::path::Path::new(env_file).exists() {
            tracing::debug!("Loading environment variables from file: {}", env_file);
            dotenv::from_filename(env_file).ok();
        }
    } else {
        tracing::debug!("Loading environment variables from default file");
        dotenv::dotenv().ok();
    }

    // Load configuration from a file with environment variable substitution
    let config: Configuration = if std::path::Path::new(&arguments.config_file).exists() {
        Configuration::load(&arguments.config_file)
            .inspect_err(|err| eprintln!("Configuration load error: {}", err))?
    } else {
        tracing::warn!(
            "Configuration file {} not found, using defaults",
            arguments.config_file
        );
        Configuration::default()
    };

    tracing::debug!("Configuration loaded: {:?}", config);
    tracing::info!("Starting Terrastead Server...");

    // Initialize the database connection pool and schema
    tracing::info!("Connecting to Database at {}", &config.database.url);
    let database =
        database::connect(config.database.url.as_str(), config.database.max_connections).await?;

    // Load the shared world
    let world = WorldStore::new(database.clone())
        .load_or_create(&config.world.name, config.world.seed)
        .await?;

    let context = ServerContext::new(database, world, ContextSettings::from(&config));

    // Spawn session cleanup task
    let session_manager = context.session_manager().clone();
    let cleanup_interval = config.session.cleanup_interval.max(1);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(cleanup_interval));
        loop {
            interval.tick().await;
            let removed = session_manager.cleanup_expired().await;
            if removed > 0 {
                tracing::info!("Removed {} expired session(s)", removed);
            }
        }
    });

    // build our application with routes
    let app = webapp::router(context)
        .layer(webapp::cors_layer(&config.cors))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.http.request_timeout,
        )))
        .layer(TraceLayer::new_for_http());

    let listen_addr: SocketAddr = config.http.addr.to_addr();
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    tracing::info!(
        "HTTP Server listening on {} ({}:{})",
        config.http.addr,
        config.http.addr.to_ip(),
        config.http.addr.to_port()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Terrastead Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
    }
}
