#![allow(dead_code)]

use actix_web::web;
use travel_memory_server::metrics::{self, HttpMetrics};

/// Fresh registry per test.
pub fn fresh_metrics() -> web::Data<HttpMetrics> {
    web::Data::new(HttpMetrics::new().expect("metrics registry"))
}

/// Sum of every `http_requests_total` sample in the exposition.
pub fn total_requests(m: &HttpMetrics) -> u64 {
    let text = metrics::encode(m.registry()).expect("encode");
    text.lines()
        .filter(|l| l.starts_with("http_requests_total{"))
        .filter_map(|l| l.rsplit(' ').next())
        .map(|v| v.parse::<f64>().expect("sample value") as u64)
        .sum()
}

/// Full application on an in-memory store, instrumented with `$metrics`.
macro_rules! test_app {
    ($metrics:expr) => {
        test_app!($metrics, travel_memory_server::config::RouteLabel::Path)
    };
    ($metrics:expr, $mode:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(travel_memory_server::metrics::RequestMetrics::new(
                    $metrics.clone().into_inner(),
                    $mode,
                ))
                .configure(travel_memory_server::http::routes::init_app(
                    actix_web::web::Data::new(travel_memory_server::db::TripStore::memory()),
                    $metrics.clone(),
                    100 * 1024,
                )),
        )
        .await
    };
}
