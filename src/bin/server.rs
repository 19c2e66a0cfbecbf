use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use serde::Deserialize;
use warp::{self, Filter};

use voice_relay::auth::TokenManager;
use voice_relay::config::ServerConfig;
use voice_relay::constants::VOICE_WS_PATH;
use voice_relay::core::gateway::{SharedVoiceServer, VoiceServer};
use voice_relay::directory::MemoryDirectory;
use voice_relay::handlers::websocket::handle_ws_client;

/// Query parameters accepted on the WebSocket upgrade URL
#[derive(Debug, Deserialize)]
struct HandshakeQuery {
    token: Option<String>,
}

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Configuration: host={}, port={}", config.host, config.port);

    // The in-memory directory is the default backend; a deployment
    // wires real ChannelDirectory/TeamDirectory implementations here.
    let directory = Arc::new(MemoryDirectory::new());

    let server: SharedVoiceServer = Arc::new(VoiceServer::new(
        TokenManager::new(&config.jwt_secret),
        directory.clone(),
        directory,
    ));

    // Create WebSocket route: credential comes from a `token` query
    // parameter or the Authorization header
    let ws_route = warp::path(VOICE_WS_PATH)
        .and(warp::ws())
        .and(warp::query::<HandshakeQuery>())
        .and(warp::header::optional::<String>("authorization"))
        .and(with_server(server))
        .map(
            |ws: warp::ws::Ws,
             query: HandshakeQuery,
             auth_header: Option<String>,
             server: SharedVoiceServer| {
                info!("New websocket connection");
                let token = query.token.or(auth_header);
                ws.on_upgrade(move |socket| handle_ws_client(socket, server, token))
            },
        );

    // Create health check route
    let health_route = warp::path("health").map(|| "OK");

    // Combine routes
    let routes = ws_route.or(health_route);

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting voice relay server on {}", addr);

    warp::serve(routes).run(addr).await;
}

// Helper function to include server state in request
fn with_server(
    server: SharedVoiceServer,
) -> impl Filter<Extract = (SharedVoiceServer,), Error = Infallible> + Clone {
    warp::any().map(move || server.clone())
}
