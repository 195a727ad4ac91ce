use std::sync::Arc;

use pokerleague::{
    router, scoring::PositionalScoreCalculator, AppState, InMemoryStore, LeagueConfig,
    LeagueService,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokerleague=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = LeagueConfig::from_env();
    info!(
        bind_addr = %config.bind_addr,
        points_per_place = config.points_per_place,
        "Starting poker league server"
    );

    let store = Arc::new(InMemoryStore::new());
    let league = LeagueService::builder(store)
        .with_calculator(Arc::new(PositionalScoreCalculator::new(
            config.points_per_place,
        )))
        .build();
    let app_state = AppState::new(Arc::new(league));

    let app = router(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(bind_addr = %config.bind_addr, error = %err, "Could not bind listener");
            std::process::exit(1);
        }
    };
    info!("Server running on http://{}", config.bind_addr);

    if let Err(err) = axum::serve(listener, app).await {
        error!(error = %err, "Server stopped");
        std::process::exit(1);
    }
}
