//! Static example routes and a readiness probe.

use actix_web::{get, web, HttpResponse, Responder};

use crate::db::TripStore;

#[get("/example")]
pub async fn example() -> impl Responder {
    HttpResponse::Ok().body("Hello, world!")
}

#[get("/hello")]
pub async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Hello World!")
}

#[get("/healthz")]
pub async fn healthz(store: web::Data<TripStore>) -> impl Responder {
    if let Err(e) = store.ping().await {
        log::warn!("readiness probe failed: {e}");
        return HttpResponse::ServiceUnavailable().body("db");
    }
    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(example).service(hello).service(healthz);
}
