// src/handlers/requests.rs
// DOCUMENTATION: Booking request and listing request handlers

use crate::errors::HorooError;
use crate::handlers::extractors::{AdminAccess, OptionalUser};
use crate::models::{
    ApiResponse, BookingFilterQuery, CreateBookingRequest, CreateListingRequest,
    ListingRequestFilterQuery, TextSearchQuery, UpdateBookingRequest, UpdateListingRequest,
};
use crate::services::{ListingRequestService, RequestService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /requests
pub async fn add_request(
    OptionalUser(user_id): OptionalUser,
    pool: web::Data<PgPool>,
    body: web::Json<CreateBookingRequest>,
) -> Result<impl Responder, HorooError> {
    let created = RequestService::add(pool.get_ref(), body.into_inner(), user_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(created).with_message("Request added successfully")))
}

pub async fn all_requests(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, HorooError> {
    let requests = RequestService::all(pool.get_ref()).await?;
    let count = requests.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(requests).with_count(count)))
}

pub async fn update_request(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateBookingRequest>,
) -> Result<impl Responder, HorooError> {
    let updated =
        RequestService::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated).with_message("Request updated")))
}

pub async fn filter_requests(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    query: web::Query<BookingFilterQuery>,
) -> Result<impl Responder, HorooError> {
    let requests = RequestService::filter(pool.get_ref(), &query).await?;
    let count = requests.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(requests).with_count(count)))
}

pub async fn search_requests(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    query: web::Query<TextSearchQuery>,
) -> Result<impl Responder, HorooError> {
    let requests = RequestService::search(pool.get_ref(), query.query.as_deref()).await?;
    let count = requests.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(requests).with_count(count)))
}

/// POST /listing-requests
pub async fn add_listing_request(
    pool: web::Data<PgPool>,
    body: web::Json<CreateListingRequest>,
) -> Result<impl Responder, HorooError> {
    let created = ListingRequestService::add(pool.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(
        ApiResponse::ok(created).with_message("Listing request submitted successfully"),
    ))
}

pub async fn all_listing_requests(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, HorooError> {
    let requests = ListingRequestService::all(pool.get_ref()).await?;
    let count = requests.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(requests).with_count(count)))
}

pub async fn update_listing_request(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateListingRequest>,
) -> Result<impl Responder, HorooError> {
    let updated =
        ListingRequestService::update(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated).with_message("Listing request updated")))
}

pub async fn filter_listing_requests(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    query: web::Query<ListingRequestFilterQuery>,
) -> Result<impl Responder, HorooError> {
    let requests = ListingRequestService::filter(pool.get_ref(), &query).await?;
    let count = requests.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(requests).with_count(count)))
}

pub async fn search_listing_requests(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    query: web::Query<TextSearchQuery>,
) -> Result<impl Responder, HorooError> {
    let requests = ListingRequestService::search(pool.get_ref(), query.query.as_deref()).await?;
    let count = requests.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(requests).with_count(count)))
}

/// Collection routes, served with and without the trailing slash
fn collection(path: &str, list: actix_web::Route, add: actix_web::Route) -> actix_web::Resource {
    web::resource(path).route(list).route(add)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    let mut requests = web::scope("/requests")
        .route("/search", web::get().to(search_requests))
        .route("/filter", web::get().to(filter_requests))
        .route("/update/{id}", web::put().to(update_request));
    let mut listing_requests = web::scope("/listing-requests")
        .route("/search", web::get().to(search_listing_requests))
        .route("/filter", web::get().to(filter_listing_requests))
        .route("/update/{id}", web::put().to(update_listing_request));

    for path in ["", "/"] {
        requests = requests.service(collection(
            path,
            web::get().to(all_requests),
            web::post().to(add_request),
        ));
        listing_requests = listing_requests.service(collection(
            path,
            web::get().to(all_listing_requests),
            web::post().to(add_listing_request),
        ));
    }

    cfg.service(requests).service(listing_requests);
}
