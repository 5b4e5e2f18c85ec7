use std::sync::Arc;

use tower_http::trace::TraceLayer;

use server::notify::{BroadcastPublisher, Dispatcher, EventPublisher, NoopPublisher};
use server::{config, db, health, openapi, telemetry};

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    config::load_feature_flags();
    health::record_start_time();

    let pool = db::create_pool();
    db::run_migrations(&pool).await;

    let publisher: Arc<dyn EventPublisher> = if config::feature_flags().realtime {
        Arc::new(BroadcastPublisher::default())
    } else {
        Arc::new(NoopPublisher)
    };
    let dispatcher = Arc::new(Dispatcher::new(pool.clone(), publisher));
    let state = db::AppState { pool, dispatcher };

    let app = openapi::api_router(state).layer(TraceLayer::new_for_http());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));
    tracing::info!("listening on {addr}");

    axum::serve(listener, app).await.expect("server error");
}
