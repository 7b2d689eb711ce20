use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yookassa_webhook::config::ReceiverConfig;
use yookassa_webhook::routes;
use yookassa_webhook::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ReceiverConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            tracing::error!("Invalid trusted network configuration: {e}");
            std::process::exit(1);
        }
    };

    let port = config.port;
    tracing::info!("YooKassa webhook receiver listening on {}:{port}", config.bind_addr);
    tracing::info!("Trusted sender networks: {:?}", state.networks.ranges());
    tracing::info!("  POST http://localhost:{port}/webhooks/yookassa");
    tracing::info!("  GET  http://localhost:{port}/trusted-ranges");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::PayloadConfig::default().limit(65_536))
            .configure(routes::configure)
    })
    .bind((config.bind_addr.as_str(), port))?
    .run()
    .await
}
