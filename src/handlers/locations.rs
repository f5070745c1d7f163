// src/handlers/locations.rs
// DOCUMENTATION: HTTP handlers for states, cities and areas

use crate::db::LocationRepository;
use crate::errors::HorooError;
use crate::handlers::extractors::AdminAccess;
use crate::models::{
    ApiResponse, CreateAreaRequest, CreateCityRequest, CreateStateRequest, LocationDetailsQuery,
};
use crate::services::LocationService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /state
pub async fn add_state(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    body: web::Json<CreateStateRequest>,
) -> Result<impl Responder, HorooError> {
    let state = LocationService::add_state(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(state).with_message("State added successfully")))
}

/// POST /city
pub async fn add_city(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    body: web::Json<CreateCityRequest>,
) -> Result<impl Responder, HorooError> {
    let city = LocationService::add_city(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(city).with_message("City added successfully")))
}

/// POST /area
pub async fn add_area(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    body: web::Json<CreateAreaRequest>,
) -> Result<impl Responder, HorooError> {
    let area = LocationService::add_area(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(area).with_message("Area added successfully")))
}

pub async fn list_states(pool: web::Data<PgPool>) -> Result<impl Responder, HorooError> {
    let states = LocationRepository::list_states(pool.get_ref()).await?;
    let count = states.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(states).with_count(count)))
}

pub async fn list_cities(pool: web::Data<PgPool>) -> Result<impl Responder, HorooError> {
    let cities = LocationRepository::list_cities(pool.get_ref()).await?;
    let count = cities.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cities).with_count(count)))
}

pub async fn list_areas(pool: web::Data<PgPool>) -> Result<impl Responder, HorooError> {
    let areas = LocationRepository::list_areas(pool.get_ref()).await?;
    let count = areas.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(areas).with_count(count)))
}

/// GET /cities/{stateId}
pub async fn cities_by_state(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let cities = LocationService::cities_by_state(pool.get_ref(), path.into_inner()).await?;
    let count = cities.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cities).with_count(count)))
}

/// GET /areas/{cityId}
pub async fn areas_by_city(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let areas = LocationService::areas_by_city(pool.get_ref(), path.into_inner()).await?;
    let count = areas.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(areas).with_count(count)))
}

/// GET /location-details?state=&city=&area=
pub async fn location_details(
    pool: web::Data<PgPool>,
    query: web::Query<LocationDetailsQuery>,
) -> Result<impl Responder, HorooError> {
    let names = LocationService::location_details(pool.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(names)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/state", web::post().to(add_state))
        .route("/city", web::post().to(add_city))
        .route("/area", web::post().to(add_area))
        .route("/states", web::get().to(list_states))
        .route("/cities", web::get().to(list_cities))
        .route("/cities/{state_id}", web::get().to(cities_by_state))
        .route("/areas", web::get().to(list_areas))
        .route("/areas/{city_id}", web::get().to(areas_by_city))
        .route("/location-details", web::get().to(location_details));
}
