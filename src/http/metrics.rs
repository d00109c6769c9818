//! Prometheus scrape endpoint.

use actix_web::{get, web, HttpResponse};

use crate::error::Result;
use crate::metrics::{self, HttpMetrics};

/// GET /metrics
#[get("/metrics")]
pub async fn scrape(registry: web::Data<HttpMetrics>) -> Result<HttpResponse> {
    let body = metrics::encode(registry.registry())?;
    Ok(HttpResponse::Ok()
        .content_type(metrics::content_type())
        .body(body))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(scrape);
}
