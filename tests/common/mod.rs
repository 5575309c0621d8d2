//! Shared setup for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use deploy_status::config::AppConfig;
use deploy_status::health::{Deployment, HealthReporter};
use deploy_status::routes::create_router;
use deploy_status::state::AppState;
use deploy_status::templates::init_templates;

pub const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*");
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.assets.templates = TEMPLATES.to_string();
    config.assets.static_dir = STATIC_DIR.to_string();
    config
}

pub fn test_deployment() -> Deployment {
    Deployment {
        environment: "production".to_string(),
        version: "1.2.3".to_string(),
    }
}

pub fn test_state(config: AppConfig) -> AppState {
    let tera = init_templates(&config.assets.templates).expect("templates load");
    AppState::new(config, tera, HealthReporter::new(test_deployment())).expect("state builds")
}

/// Serves the router on an ephemeral loopback port.
pub async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("server runs");
    });
    addr
}
