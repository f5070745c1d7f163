// src/handlers/listings.rs
// DOCUMENTATION: HTTP handlers for every listing family
// PURPOSE: One handler set; each family's routes carry its ListingKind as
// resource data

use crate::errors::HorooError;
use crate::handlers::extractors::AdminAccess;
use crate::models::{ApiResponse, ListingFilterQuery, ListingKind, ListingPayload};
use crate::services::{ListingService, MediaStore};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;

/// POST /{single}
pub async fn create_listing(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    media: web::Data<dyn MediaStore>,
    kind: web::Data<ListingKind>,
    body: web::Json<ListingPayload>,
) -> Result<impl Responder, HorooError> {
    let kind = **kind;
    let listing =
        ListingService::create(pool.get_ref(), media.get_ref(), kind, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(
        ApiResponse::ok(listing).with_message(format!("{} added successfully", kind.label())),
    ))
}

/// GET /{plural}
pub async fn list_listings(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
) -> Result<impl Responder, HorooError> {
    let listings = ListingService::list_all(pool.get_ref(), **kind).await?;
    let count = listings.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings).with_count(count)))
}

/// GET /{single}-for-admin/{id}
pub async fn get_for_admin(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, HorooError> {
    let listing = ListingService::get_for_admin(pool.get_ref(), **kind, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listing)))
}

/// GET /{single}-for-admin/horoo/{horooId}
pub async fn get_for_admin_by_horoo_id(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
    path: web::Path<String>,
) -> Result<impl Responder, HorooError> {
    let listing =
        ListingService::get_for_admin_by_horoo_id(pool.get_ref(), **kind, &path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listing)))
}

/// PUT /{single}/edit/{id}
pub async fn update_listing(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    media: web::Data<dyn MediaStore>,
    kind: web::Data<ListingKind>,
    path: web::Path<Uuid>,
    body: web::Json<ListingPayload>,
) -> Result<impl Responder, HorooError> {
    let kind = **kind;
    let listing = ListingService::update(
        pool.get_ref(),
        media.get_ref(),
        kind,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::ok(listing).with_message(format!("{} updated successfully", kind.label())),
    ))
}

/// GET /{plural}/filter
pub async fn filter_listings(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
    query: web::Query<ListingFilterQuery>,
) -> Result<impl Responder, HorooError> {
    let listings = ListingService::filter(pool.get_ref(), **kind, &query).await?;
    let count = listings.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings).with_count(count)))
}

/// GET /{plural}-for-user
pub async fn list_for_user(
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
) -> Result<impl Responder, HorooError> {
    let cards = ListingService::list_for_user(pool.get_ref(), **kind).await?;
    let count = cards.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cards).with_count(count)))
}

/// GET /{plural}/filter-for-user
pub async fn filter_for_user(
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
    query: web::Query<ListingFilterQuery>,
) -> Result<impl Responder, HorooError> {
    let listings = ListingService::filter_for_user(pool.get_ref(), **kind, &query).await?;
    let count = listings.len();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(listings).with_count(count)))
}

/// GET /{single}/{key} where key is a UUID, slug or Horoo ID
pub async fn detail_for_user(
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
    path: web::Path<String>,
) -> Result<impl Responder, HorooError> {
    let detail = ListingService::detail_for_user(pool.get_ref(), **kind, &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// POST /{single}/generate-slugs
pub async fn generate_slugs(
    _admin: AdminAccess,
    pool: web::Data<PgPool>,
    kind: web::Data<ListingKind>,
) -> Result<impl Responder, HorooError> {
    let kind = **kind;
    let updated = ListingService::generate_slugs(pool.get_ref(), kind).await?;
    let message = if updated == 0 {
        format!("All {} listings already have slugs", kind.label())
    } else {
        format!("Successfully generated slugs for {} {} listings", updated, kind.label())
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(updated).with_message(message)))
}

/// Register one family's routes
/// DOCUMENTATION: Routes sharing a path share one resource. Literal segments
/// (`filter`, `generate-slugs`) are registered before the `{key}` catch-all.
fn kind_routes(cfg: &mut web::ServiceConfig, kind: ListingKind) {
    let single = kind.singular_segment();
    let plural = kind.plural_segment();
    let data = web::Data::new(kind);
    let resource = |path: String| web::resource(path).app_data(data.clone());

    if single == plural {
        cfg.service(
            resource(format!("/{}", single))
                .route(web::post().to(create_listing))
                .route(web::get().to(list_listings)),
        );
    } else {
        cfg.service(resource(format!("/{}", single)).route(web::post().to(create_listing)));
        cfg.service(resource(format!("/{}", plural)).route(web::get().to(list_listings)));
    }

    cfg.service(
        resource(format!("/{}-for-admin/horoo/{{horoo_id}}", single))
            .route(web::get().to(get_for_admin_by_horoo_id)),
    );
    cfg.service(
        resource(format!("/{}-for-admin/{{id}}", single)).route(web::get().to(get_for_admin)),
    );
    cfg.service(resource(format!("/{}/edit/{{id}}", single)).route(web::put().to(update_listing)));
    cfg.service(resource(format!("/{}/filter", plural)).route(web::get().to(filter_listings)));
    cfg.service(resource(format!("/{}-for-user", plural)).route(web::get().to(list_for_user)));
    cfg.service(
        resource(format!("/{}/filter-for-user", plural)).route(web::get().to(filter_for_user)),
    );

    if kind.has_slug() {
        cfg.service(
            resource(format!("/{}/generate-slugs", single)).route(web::post().to(generate_slugs)),
        );
        if single != plural {
            cfg.service(
                resource(format!("/{}/generate-slugs", plural))
                    .route(web::post().to(generate_slugs)),
            );
        }
    }

    cfg.service(resource(format!("/{}/{{key}}", single)).route(web::get().to(detail_for_user)));
}

pub fn config(cfg: &mut web::ServiceConfig) {
    for kind in ListingKind::ALL {
        kind_routes(cfg, kind);
    }
}
