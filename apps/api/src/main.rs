use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::services::booking::AppointmentBookingService;
use notification_cell::services::mailer::notifier_from_config;
use shared_config::AppConfig;
use shared_store::memory::MemoryStore;

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Clinica Wenka API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    // Shared store engine and outbound mail capability
    let store = Arc::new(MemoryStore::new());
    let notifier = notifier_from_config(&config);

    let booking =
        AppointmentBookingService::new(store.clone(), store.clone(), notifier, config.clone());

    let state = Arc::new(AppointmentCellState {
        config: config.clone(),
        booking,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind server address");
    axum::serve(listener, app).await.expect("server error");
}
