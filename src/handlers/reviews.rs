// src/handlers/reviews.rs
// DOCUMENTATION: HTTP handlers for listing reviews

use crate::errors::HorooError;
use crate::handlers::extractors::{AdminAccess, AuthenticatedUser};
use crate::models::{
    AdminEditReviewRequest, ApiResponse, CreateReviewRequest, EditReviewRequest, ReviewListQuery,
};
use crate::services::ReviewService;
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /review
pub async fn create_review(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
    body: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, HorooError> {
    let review = ReviewService::create(pool.get_ref(), user.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(review).with_message("Review added successfully")))
}

/// PUT /review/{id}
pub async fn edit_review(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<EditReviewRequest>,
) -> Result<impl Responder, HorooError> {
    let review =
        ReviewService::edit_by_user(pool.get_ref(), user.id, path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(review).with_message("Review updated successfully")))
}

/// DELETE /review/{id}
pub async fn delete_review(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    ReviewService::delete_by_user(pool.get_ref(), user.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Review deleted successfully")))
}

/// GET /my-reviews
pub async fn my_reviews(
    AuthenticatedUser(user): AuthenticatedUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, HorooError> {
    let reviews = ReviewService::my_reviews(pool.get_ref(), user.id).await?;
    let count = reviews.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(reviews).with_count(count)))
}

/// GET /reviews/{propertyType}/{propertyId}
pub async fn reviews_for_property(
    pool: web::Data<PgPool>,
    path: web::Path<(String, Uuid)>,
) -> Result<impl Responder, HorooError> {
    let (property_type, property_id) = path.into_inner();
    let reviews =
        ReviewService::reviews_for_property(pool.get_ref(), &property_type, property_id).await?;
    let count = reviews.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(reviews).with_count(count)))
}

/// GET /reviews
pub async fn all_reviews(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    query: web::Query<ReviewListQuery>,
) -> Result<impl Responder, HorooError> {
    let reviews = ReviewService::all_reviews(pool.get_ref(), &query).await?;
    let count = reviews.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(reviews).with_count(count)))
}

/// PUT /admin/review/{id}
pub async fn admin_edit_review(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    body: web::Json<AdminEditReviewRequest>,
) -> Result<impl Responder, HorooError> {
    let review =
        ReviewService::edit_by_admin(pool.get_ref(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(review).with_message("Review updated successfully")))
}

/// DELETE /admin/review/{id}
pub async fn admin_delete_review(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    ReviewService::delete_by_admin(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message_only("Review deleted successfully")))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/review", web::post().to(create_review))
        .service(
            web::resource("/review/{id}")
                .route(web::put().to(edit_review))
                .route(web::delete().to(delete_review)),
        )
        .route("/my-reviews", web::get().to(my_reviews))
        .route("/reviews", web::get().to(all_reviews))
        .route(
            "/reviews/{property_type}/{property_id}",
            web::get().to(reviews_for_property),
        )
        .service(
            web::resource("/admin/review/{id}")
                .route(web::put().to(admin_edit_review))
                .route(web::delete().to(admin_delete_review)),
        );
}
