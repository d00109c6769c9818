use crate::db::TripStore;
use crate::error::AppError;
use crate::http;
use crate::metrics::HttpMetrics;
use actix_web::web;

/// Mount every HTTP sub-module at the root.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(http::metrics::init_routes)
        .configure(http::health::init_routes)
        .configure(http::trips::init_routes);
}

/// JSON extractor config: size limit, malformed bodies answered with a 400.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Shared state plus routes, for `App::configure`.
pub fn init_app(
    store: web::Data<TripStore>,
    metrics: web::Data<HttpMetrics>,
    json_limit: usize,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(store)
            .app_data(metrics)
            .app_data(json_config(json_limit));
        init_routes(cfg);
    }
}
