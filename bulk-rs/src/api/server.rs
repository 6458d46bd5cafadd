//! API Server - HTTP server for REST API

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::api::{connections, contacts, messages};

pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    pub fn new(state: Arc<AppState>, addr: String) -> Self {
        Self { state, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        // Leave room above the file limit so oversized uploads reach the
        // size check and get a readable error instead of a bare 413
        let upload_limit = DefaultBodyLimit::max(self.state.max_upload_bytes * 2);

        let contact_routes = Router::new()
            .route("/contacts", get(contacts::list_contacts))
            .route(
                "/contacts/upload",
                post(contacts::upload_contacts).layer(upload_limit),
            )
            .route("/contacts/demo", get(contacts::download_demo));

        let message_routes = Router::new()
            .route("/messages", get(messages::list_messages))
            .route("/messages/preview", post(messages::preview_message))
            .route("/messages/send", post(messages::send_message))
            .route("/messages/:id/sends", get(messages::list_sends));

        let connection_routes = Router::new()
            .route(
                "/connections",
                get(connections::list_connections).post(connections::create_connection),
            )
            .route("/connections/:id/disconnect", post(connections::disconnect));

        let api_routes = Router::new()
            .route("/health", get(handlers::health))
            .route("/stats", get(handlers::stats))
            .merge(contact_routes)
            .merge(message_routes)
            .merge(connection_routes);

        Router::new()
            .nest("/api", api_routes)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
