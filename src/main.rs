mod app;
mod config;
mod core;
mod utils;

#[dotenvy::load(path = "./.env", required = false)]
#[tokio::main]
async fn main() {
    let config = config::Config::init().expect("Failed to initialize configuration");
    app::common::init_logging(&config);
    tracing::info!("local testing mode...");

    if let Err(e) = app::run_server(&config).await {
        tracing::error!("Server stopped: {e}");
        std::process::exit(1);
    }
}
