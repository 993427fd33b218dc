use actix_web::{middleware::Condition, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use sf_api::{config::load_config, configure, middleware::create_cors, routes, telemetry, AppState};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config().context("Failed to load configuration")?;
    telemetry::init_telemetry(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(environment = %config.environment, "Starting storefront API server");

    let state = web::Data::new(
        AppState::from_config(&config)
            .await
            .context("Failed to initialize services")?,
    );

    let server_config = config.server.clone();
    let cors_config = config.cors.clone();
    let bind_address = server_config.bind_address();
    tracing::info!(address = %bind_address, workers = server_config.workers, "Binding HTTP server");

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Condition::new(cors_config.enabled, create_cors(&cors_config)))
            .wrap(TracingLogger::default())
            .configure(configure(state.clone(), server_config.max_payload_size))
            .default_service(web::route().to(routes::not_found))
    })
    .keep_alive(std::time::Duration::from_secs(config.server.keep_alive));

    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
