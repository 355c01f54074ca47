use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use bloom_event_service::config::Config;
use bloom_event_service::identity::{DevIdentityResolver, IdentityResolver};
use bloom_event_service::publisher::{EventPublisher, LogPublisher};
use bloom_event_service::routes::create_routes;
use bloom_event_service::state::AppState;
use bloom_event_service::store::{EntityStore, MemoryStore};

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    // In-memory store and log publisher stand in for the managed database
    // and event bus until those integrations land.
    let store: Arc<dyn EntityStore> = Arc::new(MemoryStore::new());
    let publisher: Arc<dyn EventPublisher> = Arc::new(LogPublisher);
    let identity: Arc<dyn IdentityResolver> = Arc::new(DevIdentityResolver);
    let state = AppState::new(store, publisher, identity);

    let app: Router = create_routes(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Event service running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
