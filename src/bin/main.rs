use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use travel_memory_server::{config::Settings, db::TripStore, http, metrics};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Configuration
    let settings = Settings::from_env()?;

    // Trip store (Postgres or in-memory)
    let store = web::Data::new(TripStore::from_settings(&settings).await?);

    // Metrics registry shared by the middleware and /metrics
    let http_metrics =
        web::Data::new(metrics::HttpMetrics::new().context("registering HTTP metrics")?);

    let route_label = settings.route_label;
    let json_limit = settings.json_limit;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .wrap(metrics::RequestMetrics::new(
                http_metrics.clone().into_inner(),
                route_label,
            ))
            .configure(http::routes::init_app(
                store.clone(),
                http_metrics.clone(),
                json_limit,
            ))
    })
    .bind(settings.bind_addr())
    .with_context(|| format!("binding {}:{}", settings.host, settings.port))?;

    log::info!("Server started at http://localhost:{}", settings.port);
    server.run().await?;
    Ok(())
}
