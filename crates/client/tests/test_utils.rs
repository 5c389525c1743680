#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use medimeet_client::{ClientConfig, HttpGateway};
use medimeet_core::{
    models::session::{Role, Session},
    session::{MemorySessionStore, SessionContext},
};

pub const TOKEN: &str = "test-token";

pub fn session(role: Role) -> Session {
    Session {
        user_id: 11,
        email: "user@example.com".to_string(),
        name: Some("Test User".to_string()),
        role,
        token: TOKEN.to_string(),
    }
}

pub fn signed_in(role: Role) -> SessionContext {
    SessionContext::load(MemorySessionStore::with_session(session(role)))
        .expect("memory store never fails")
}

pub fn signed_out() -> SessionContext {
    SessionContext::load(MemorySessionStore::default()).expect("memory store never fails")
}

/// Serves `routes` under `/api` on an ephemeral port and returns the base URL.
pub async fn spawn_backend(routes: Router) -> String {
    let app = Router::new().nest("/api", routes);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fake backend");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake backend stopped");
    });
    format!("http://{}/api", addr)
}

/// A base URL nothing is listening on.
pub async fn unreachable_backend() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}/api", addr)
}

pub fn gateway(base_url: &str, session: SessionContext) -> HttpGateway {
    let config = ClientConfig {
        api_base_url: base_url.to_string(),
        request_timeout: 5,
        ..ClientConfig::default()
    };
    HttpGateway::new(&config, Arc::new(session)).expect("build gateway")
}
