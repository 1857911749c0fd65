use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use study_scheduler::{app, config::Config, state::AppState};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    let addr = config.addr;
    let state = AppState::new(config);

    // Print the link to the server
    info!("Server running at http://{addr}");
    info!("Static files: http://{addr}/");
    info!("API base:     http://{addr}/api");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("bind failed");

    axum::serve(listener, app(state))
        .await
        .expect("server error");
}
