//! Trip CRUD: create, list, fetch by id.

use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::db::{models::NewTrip, TripStore};
use crate::error::{AppError, Result};

/// POST /trip
#[post("/trip")]
pub async fn create_trip(
    info: web::Json<NewTrip>,
    store: web::Data<TripStore>,
) -> Result<HttpResponse> {
    let new = info.into_inner();
    if new.trip_name.trim().is_empty() {
        return Err(AppError::BadRequest("tripName is required".into()));
    }

    let trip = store.insert(new).await?;
    log::debug!("trip {} created", trip.id);
    Ok(HttpResponse::Created().json(trip))
}

/// GET /trip
#[get("/trip")]
pub async fn list_trips(store: web::Data<TripStore>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(store.list().await?))
}

/// GET /trip/{id}
#[get("/trip/{id}")]
pub async fn get_trip(path: web::Path<String>, store: web::Data<TripStore>) -> Result<HttpResponse> {
    let id = Uuid::parse_str(&path)
        .map_err(|_| AppError::BadRequest(format!("invalid trip id `{path}`")))?;

    match store.get(id).await? {
        Some(trip) => Ok(HttpResponse::Ok().json(trip)),
        None => Err(AppError::NotFound(format!("trip {id}"))),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_trip)
        .service(list_trips)
        .service(get_trip);
}
