use expense_tracker_api::{app_router, build_state, config::Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("invalid configuration");
    if config.uses_default_secret() {
        tracing::warn!("JWT_SECRET is not set; sessions are signed with the default secret");
    }
    if config.auth_password_hash.is_none() {
        tracing::warn!("AUTH_PASSWORD_HASH is not set; login is disabled");
    }

    let addr = config.listen_addr;
    let state = build_state(config)
        .await
        .expect("failed to initialise database");
    let app = app_router(state);

    tracing::info!("Expense tracker API listening on {}", addr);

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind address"),
        app,
    )
    .await
    .expect("server error");
}
