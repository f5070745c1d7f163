// src/db/listing_repository.rs
// DOCUMENTATION: Database access for all listing families
// PURPOSE: One `listings` table, every query scoped by `kind`

use crate::errors::{is_unique_violation, HorooError};
use crate::models::{Listing, ListingFilterQuery, ListingKind, ListingPayload};
use crate::services::rating::RatingAggregate;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Listing columns plus joined location names
const LISTING_SELECT: &str = r#"
    SELECT
        l.id, l.kind, l.horoo_id, l.slug,
        l.property_name, l.horoo_name,
        l.owner_name, l.owner_mobile, l.owner_whatsapp, l.another_no, l.owner_id,
        l.state_id, s.name AS state_name,
        l.city_id, c.name AS city_name,
        l.area_id, a.name AS area_name,
        l.pincode, l.nearby_areas, l.map_link, l.latitude, l.longitude,
        l.real_address, l.horoo_address,
        l.facilities, l.owner_price, l.horoo_price, l.price_suffix, l.offer_type, l.price_plans,
        l.available_for, l.size, l.room_types, l.unit_types, l.quantity,
        l.availability, l.is_verified, l.is_show,
        l.main_image, l.other_images, l.youtube_link,
        l.description, l.horoo_description,
        l.average_rating, l.total_ratings,
        l.created_at, l.updated_at
    FROM listings l
    LEFT JOIN states s ON s.id = l.state_id
    LEFT JOIN cities c ON c.id = l.city_id
    LEFT JOIN areas a ON a.id = l.area_id
"#;

/// Default and maximum page size for paginated filters
const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Internal struct for mapping joined listing rows
#[derive(Debug, FromRow)]
struct ListingRow {
    id: Uuid,
    kind: String,
    horoo_id: String,
    slug: Option<String>,
    property_name: String,
    horoo_name: String,
    owner_name: String,
    owner_mobile: String,
    owner_whatsapp: Option<String>,
    another_no: Option<String>,
    owner_id: Option<Uuid>,
    state_id: Uuid,
    state_name: Option<String>,
    city_id: Uuid,
    city_name: Option<String>,
    area_id: Uuid,
    area_name: Option<String>,
    pincode: String,
    nearby_areas: Vec<String>,
    map_link: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    real_address: Option<String>,
    horoo_address: Option<String>,
    facilities: Vec<String>,
    owner_price: f64,
    horoo_price: f64,
    price_suffix: Option<String>,
    offer_type: Option<String>,
    price_plans: Vec<String>,
    available_for: Vec<String>,
    size: Option<String>,
    room_types: Vec<String>,
    unit_types: Vec<String>,
    quantity: i32,
    availability: bool,
    is_verified: bool,
    is_show: bool,
    main_image: Option<String>,
    other_images: Vec<String>,
    youtube_link: Option<String>,
    description: Option<String>,
    horoo_description: Option<String>,
    average_rating: f64,
    total_ratings: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListingRow {
    /// Convert ListingRow to Listing model
    fn to_listing(self) -> Result<Listing, HorooError> {
        let kind = self.kind.parse::<ListingKind>().map_err(|_| {
            log::error!("Listing {} has unknown kind {}", self.id, self.kind);
            HorooError::InternalError(format!("Unknown listing kind {}", self.kind))
        })?;

        Ok(Listing {
            id: self.id,
            kind,
            horoo_id: self.horoo_id,
            slug: self.slug,
            property_name: self.property_name,
            horoo_name: self.horoo_name,
            owner_name: self.owner_name,
            owner_mobile: self.owner_mobile,
            owner_whatsapp: self.owner_whatsapp,
            another_no: self.another_no,
            owner_id: self.owner_id,
            state_id: self.state_id,
            state_name: self.state_name,
            city_id: self.city_id,
            city_name: self.city_name,
            area_id: self.area_id,
            area_name: self.area_name,
            pincode: self.pincode,
            nearby_areas: self.nearby_areas,
            map_link: self.map_link,
            latitude: self.latitude,
            longitude: self.longitude,
            real_address: self.real_address,
            horoo_address: self.horoo_address,
            facilities: self.facilities,
            owner_price: self.owner_price,
            horoo_price: self.horoo_price,
            price_suffix: self.price_suffix,
            offer_type: self.offer_type,
            price_plans: self.price_plans,
            available_for: self.available_for,
            size: self.size,
            room_types: self.room_types,
            unit_types: self.unit_types,
            quantity: self.quantity,
            availability: self.availability,
            is_verified: self.is_verified,
            is_show: self.is_show,
            main_image: self.main_image,
            other_images: self.other_images,
            youtube_link: self.youtube_link,
            description: self.description,
            horoo_description: self.horoo_description,
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn to_listings(rows: Vec<ListingRow>) -> Result<Vec<Listing>, HorooError> {
    rows.into_iter().map(ListingRow::to_listing).collect()
}

/// Fully resolved values for a new listing row
#[derive(Debug, Clone)]
pub struct NewListing {
    pub kind: ListingKind,
    pub horoo_id: String,
    pub slug: Option<String>,
    pub property_name: String,
    pub horoo_name: String,
    pub owner_name: String,
    pub owner_mobile: String,
    pub owner_whatsapp: Option<String>,
    pub another_no: Option<String>,
    pub owner_id: Option<Uuid>,
    pub state_id: Uuid,
    pub city_id: Uuid,
    pub area_id: Uuid,
    pub pincode: String,
    pub nearby_areas: Vec<String>,
    pub map_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub real_address: Option<String>,
    pub horoo_address: Option<String>,
    pub facilities: Vec<String>,
    pub owner_price: f64,
    pub horoo_price: f64,
    pub price_suffix: Option<String>,
    pub offer_type: Option<String>,
    pub price_plans: Vec<String>,
    pub available_for: Vec<String>,
    pub size: Option<String>,
    pub room_types: Vec<String>,
    pub unit_types: Vec<String>,
    pub quantity: i32,
    pub availability: bool,
    pub is_verified: bool,
    pub is_show: bool,
    pub main_image: Option<String>,
    pub other_images: Vec<String>,
    pub youtube_link: Option<String>,
    pub description: Option<String>,
    pub horoo_description: Option<String>,
}

/// Escape LIKE metacharacters and wrap in `%...%`
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Build the filter query for one family
/// DOCUMENTATION: `public` forces `is_show = TRUE`, ignores the moderation
/// filters and narrows `search` to publicly visible columns
pub fn build_filter_query(
    kind: ListingKind,
    query: &ListingFilterQuery,
    public: bool,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(LISTING_SELECT);
    qb.push(" WHERE l.kind = ");
    qb.push_bind(kind.as_str());

    if public {
        qb.push(" AND l.is_show = TRUE");
    }

    if let Some(state) = query.state {
        qb.push(" AND l.state_id = ");
        qb.push_bind(state);
    }
    if let Some(city) = query.city {
        qb.push(" AND l.city_id = ");
        qb.push_bind(city);
    }
    if let Some(area) = query.area {
        qb.push(" AND l.area_id = ");
        qb.push_bind(area);
    }

    let tag_filters = [
        (&query.room_type, "l.room_types"),
        (&query.unit_type, "l.unit_types"),
        (&query.available_for, "l.available_for"),
    ];
    for (value, column) in tag_filters {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            qb.push(" AND ");
            qb.push_bind(v.to_string());
            qb.push(format!(" = ANY({})", column));
        }
    }

    if let Some(availability) = query.availability {
        qb.push(" AND l.availability = ");
        qb.push_bind(availability);
    }

    if !public {
        if let Some(is_verified) = query.is_verified {
            qb.push(" AND l.is_verified = ");
            qb.push_bind(is_verified);
        }
        if let Some(is_show) = query.is_show {
            qb.push(" AND l.is_show = ");
            qb.push_bind(is_show);
        }
    }

    if let Some(term) = query.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = like_pattern(term);
        let columns: &[&str] = if public {
            &["l.horoo_id", "l.property_name", "l.horoo_name", "l.pincode"]
        } else {
            &[
                "l.horoo_id",
                "l.owner_name",
                "l.owner_mobile",
                "l.pincode",
                "l.property_name",
                "l.horoo_name",
            ]
        };

        qb.push(" AND (");
        for column in columns {
            qb.push(format!("{} ILIKE ", column));
            qb.push_bind(pattern.clone());
            qb.push(" OR ");
        }
        qb.push("EXISTS (SELECT 1 FROM unnest(l.nearby_areas) AS nearby WHERE nearby ILIKE ");
        qb.push_bind(pattern);
        qb.push("))");
    }

    qb.push(" ORDER BY l.created_at DESC");

    if query.page.is_some() || query.limit.is_some() {
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let page = query.page.unwrap_or(1).max(1);
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind((page - 1).saturating_mul(limit));
    }

    qb
}

/// ListingRepository: All database operations for listings
pub struct ListingRepository;

impl ListingRepository {
    /// Horoo ID of the most recently created listing of a family
    pub async fn latest_horoo_id(
        pool: &PgPool,
        kind: ListingKind,
    ) -> Result<Option<String>, HorooError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT horoo_id FROM listings WHERE kind = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(kind.as_str())
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to read latest horoo id: {}", e);
            HorooError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.0))
    }

    pub async fn slug_exists(
        pool: &PgPool,
        kind: ListingKind,
        slug: &str,
    ) -> Result<bool, HorooError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM listings WHERE kind = $1 AND slug = $2)",
        )
        .bind(kind.as_str())
        .bind(slug)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to check slug: {}", e);
            HorooError::DatabaseError(e.to_string())
        })?;

        Ok(row.0)
    }

    /// Insert a listing, returning its id
    /// DOCUMENTATION: A Horoo ID or slug collision maps to AlreadyExists so
    /// the caller can regenerate and retry
    pub async fn insert(pool: &PgPool, new: &NewListing) -> Result<Uuid, HorooError> {
        let inserted: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO listings (
                kind, horoo_id, slug, property_name, horoo_name,
                owner_name, owner_mobile, owner_whatsapp, another_no, owner_id,
                state_id, city_id, area_id, pincode, nearby_areas,
                map_link, latitude, longitude, real_address, horoo_address,
                facilities, owner_price, horoo_price, price_suffix, offer_type,
                price_plans, available_for, size, room_types, unit_types,
                quantity, availability, is_verified, is_show, main_image,
                other_images, youtube_link, description, horoo_description
            )
            VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15,
                $16, $17, $18, $19, $20,
                $21, $22, $23, $24, $25,
                $26, $27, $28, $29, $30,
                $31, $32, $33, $34, $35,
                $36, $37, $38, $39
            )
            RETURNING id
            "#,
        )
        .bind(new.kind.as_str()) // $1
        .bind(&new.horoo_id) // $2
        .bind(&new.slug) // $3
        .bind(&new.property_name) // $4
        .bind(&new.horoo_name) // $5
        .bind(&new.owner_name) // $6
        .bind(&new.owner_mobile) // $7
        .bind(&new.owner_whatsapp) // $8
        .bind(&new.another_no) // $9
        .bind(new.owner_id) // $10
        .bind(new.state_id) // $11
        .bind(new.city_id) // $12
        .bind(new.area_id) // $13
        .bind(&new.pincode) // $14
        .bind(&new.nearby_areas) // $15
        .bind(&new.map_link) // $16
        .bind(new.latitude) // $17
        .bind(new.longitude) // $18
        .bind(&new.real_address) // $19
        .bind(&new.horoo_address) // $20
        .bind(&new.facilities) // $21
        .bind(new.owner_price) // $22
        .bind(new.horoo_price) // $23
        .bind(&new.price_suffix) // $24
        .bind(&new.offer_type) // $25
        .bind(&new.price_plans) // $26
        .bind(&new.available_for) // $27
        .bind(&new.size) // $28
        .bind(&new.room_types) // $29
        .bind(&new.unit_types) // $30
        .bind(new.quantity) // $31
        .bind(new.availability) // $32
        .bind(new.is_verified) // $33
        .bind(new.is_show) // $34
        .bind(&new.main_image) // $35
        .bind(&new.other_images) // $36
        .bind(&new.youtube_link) // $37
        .bind(&new.description) // $38
        .bind(&new.horoo_description) // $39
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                log::warn!("Horoo ID or slug collision for {}", new.horoo_id);
                HorooError::AlreadyExists(format!(
                    "{} with this horooId or slug already exists",
                    new.kind.label()
                ))
            } else {
                log::error!("Failed to create listing: {}", e);
                HorooError::DatabaseError(e.to_string())
            }
        })?;

        log::info!("Created {} {} with id: {}", new.kind, new.horoo_id, inserted.0);
        Ok(inserted.0)
    }

    /// Fetch a listing of a family by id; 404 when missing
    pub async fn get_by_id(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
    ) -> Result<Listing, HorooError> {
        let sql = format!("{} WHERE l.id = $1 AND l.kind = $2", LISTING_SELECT);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .bind(kind.as_str())
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch listing {}: {}", id, e);
                HorooError::DatabaseError(e.to_string())
            })?;

        row.ok_or_else(|| HorooError::NotFound(format!("{} not found", kind.label())))?
            .to_listing()
    }

    /// Fetch any listing by id regardless of family
    pub async fn find_any<'e, E>(executor: E, id: Uuid) -> Result<Option<Listing>, HorooError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{} WHERE l.id = $1", LISTING_SELECT);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch listing {}: {}", id, e);
                HorooError::DatabaseError(e.to_string())
            })?;

        row.map(ListingRow::to_listing).transpose()
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        kind: ListingKind,
        slug: &str,
    ) -> Result<Option<Listing>, HorooError> {
        Self::find_by_column(pool, kind, "slug", slug).await
    }

    pub async fn find_by_horoo_id(
        pool: &PgPool,
        kind: ListingKind,
        horoo_id: &str,
    ) -> Result<Option<Listing>, HorooError> {
        Self::find_by_column(pool, kind, "horoo_id", horoo_id).await
    }

    async fn find_by_column(
        pool: &PgPool,
        kind: ListingKind,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Listing>, HorooError> {
        let sql = format!("{} WHERE l.kind = $1 AND l.{} = $2", LISTING_SELECT, column);
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(kind.as_str())
            .bind(value)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch listing by {}: {}", column, e);
                HorooError::DatabaseError(e.to_string())
            })?;

        row.map(ListingRow::to_listing).transpose()
    }

    /// Every listing of a family, newest first
    pub async fn list_all(pool: &PgPool, kind: ListingKind) -> Result<Vec<Listing>, HorooError> {
        Self::filter(pool, kind, &ListingFilterQuery::default(), false).await
    }

    /// Visible listings of a family, newest first
    pub async fn list_visible(
        pool: &PgPool,
        kind: ListingKind,
    ) -> Result<Vec<Listing>, HorooError> {
        Self::filter(pool, kind, &ListingFilterQuery::default(), true).await
    }

    pub async fn filter(
        pool: &PgPool,
        kind: ListingKind,
        query: &ListingFilterQuery,
        public: bool,
    ) -> Result<Vec<Listing>, HorooError> {
        let mut qb = build_filter_query(kind, query, public);
        log::debug!("Executing listing filter: {}", qb.sql());

        let rows = qb
            .build_query_as::<ListingRow>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Listing filter query error: {}", e);
                HorooError::DatabaseError(e.to_string())
            })?;

        to_listings(rows)
    }

    /// Listings linked to an owner account, all families
    pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Listing>, HorooError> {
        let sql = format!(
            "{} WHERE l.owner_id = $1 ORDER BY l.created_at DESC",
            LISTING_SELECT
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(owner_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch owner listings: {}", e);
                HorooError::DatabaseError(e.to_string())
            })?;

        to_listings(rows)
    }

    /// Partial update
    /// DOCUMENTATION: Only provided fields are modified; `main_image` and
    /// `other_images` are the already-resolved hosted URLs
    pub async fn update(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
        changes: &ListingPayload,
        main_image: Option<String>,
        other_images: Option<Vec<String>>,
    ) -> Result<Listing, HorooError> {
        let result = sqlx::query(
            r#"
            UPDATE listings SET
                property_name = COALESCE($3, property_name),
                horoo_name = COALESCE($4, horoo_name),
                owner_name = COALESCE($5, owner_name),
                owner_mobile = COALESCE($6, owner_mobile),
                owner_whatsapp = COALESCE($7, owner_whatsapp),
                another_no = COALESCE($8, another_no),
                owner_id = COALESCE($9, owner_id),
                state_id = COALESCE($10, state_id),
                city_id = COALESCE($11, city_id),
                area_id = COALESCE($12, area_id),
                pincode = COALESCE($13, pincode),
                nearby_areas = COALESCE($14, nearby_areas),
                map_link = COALESCE($15, map_link),
                latitude = COALESCE($16, latitude),
                longitude = COALESCE($17, longitude),
                real_address = COALESCE($18, real_address),
                horoo_address = COALESCE($19, horoo_address),
                facilities = COALESCE($20, facilities),
                owner_price = COALESCE($21, owner_price),
                horoo_price = COALESCE($22, horoo_price),
                price_suffix = COALESCE($23, price_suffix),
                offer_type = COALESCE($24, offer_type),
                price_plans = COALESCE($25, price_plans),
                available_for = COALESCE($26, available_for),
                size = COALESCE($27, size),
                room_types = COALESCE($28, room_types),
                unit_types = COALESCE($29, unit_types),
                quantity = COALESCE($30, quantity),
                availability = COALESCE($31, availability),
                is_verified = COALESCE($32, is_verified),
                is_show = COALESCE($33, is_show),
                main_image = COALESCE($34, main_image),
                other_images = COALESCE($35, other_images),
                youtube_link = COALESCE($36, youtube_link),
                description = COALESCE($37, description),
                horoo_description = COALESCE($38, horoo_description),
                updated_at = NOW()
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(id) // $1
        .bind(kind.as_str()) // $2
        .bind(&changes.property_name) // $3
        .bind(&changes.horoo_name) // $4
        .bind(&changes.owner_name) // $5
        .bind(&changes.owner_mobile) // $6
        .bind(&changes.owner_whatsapp) // $7
        .bind(&changes.another_no) // $8
        .bind(changes.owner_id) // $9
        .bind(changes.state) // $10
        .bind(changes.city) // $11
        .bind(changes.area) // $12
        .bind(&changes.pincode) // $13
        .bind(&changes.nearby_areas) // $14
        .bind(&changes.map_link) // $15
        .bind(changes.latitude) // $16
        .bind(changes.longitude) // $17
        .bind(&changes.real_address) // $18
        .bind(&changes.horoo_address) // $19
        .bind(&changes.facilities) // $20
        .bind(changes.owner_price) // $21
        .bind(changes.horoo_price) // $22
        .bind(&changes.price_suffix) // $23
        .bind(&changes.offer_type) // $24
        .bind(&changes.price_plans) // $25
        .bind(&changes.available_for) // $26
        .bind(&changes.size) // $27
        .bind(&changes.room_types) // $28
        .bind(&changes.unit_types) // $29
        .bind(changes.quantity) // $30
        .bind(changes.availability) // $31
        .bind(changes.is_verified) // $32
        .bind(changes.is_show) // $33
        .bind(&main_image) // $34
        .bind(&other_images) // $35
        .bind(&changes.youtube_link) // $36
        .bind(&changes.description) // $37
        .bind(&changes.horoo_description) // $38
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to update listing {}: {}", id, e);
            HorooError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(HorooError::NotFound(format!("{} not found", kind.label())));
        }

        log::info!("Updated {} {}", kind, id);
        Self::get_by_id(pool, kind, id).await
    }

    /// Listings of a family that have no slug yet: (id, horoo_name, horoo_id)
    pub async fn list_without_slug(
        pool: &PgPool,
        kind: ListingKind,
    ) -> Result<Vec<(Uuid, String, String)>, HorooError> {
        sqlx::query_as(
            r#"
            SELECT id, horoo_name, horoo_id FROM listings
            WHERE kind = $1 AND (slug IS NULL OR slug = '')
            ORDER BY created_at ASC
            "#,
        )
        .bind(kind.as_str())
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list listings without slug: {}", e);
            HorooError::DatabaseError(e.to_string())
        })
    }

    /// Set a slug; a collision maps to AlreadyExists
    pub async fn set_slug(pool: &PgPool, id: Uuid, slug: &str) -> Result<(), HorooError> {
        sqlx::query("UPDATE listings SET slug = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(slug)
            .execute(pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    HorooError::AlreadyExists(format!("Slug {} already taken", slug))
                } else {
                    log::error!("Failed to set slug for {}: {}", id, e);
                    HorooError::DatabaseError(e.to_string())
                }
            })?;
        Ok(())
    }

    /// Lock a listing row and read its kind and rating aggregate
    pub async fn lock_rating<'e, E>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<(ListingKind, RatingAggregate)>, HorooError>
    where
        E: PgExecutor<'e>,
    {
        let row: Option<(String, f64, i32)> = sqlx::query_as(
            "SELECT kind, average_rating, total_ratings FROM listings WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to lock listing {}: {}", id, e);
            HorooError::DatabaseError(e.to_string())
        })?;

        row.map(|(kind, average, count)| {
            kind.parse::<ListingKind>()
                .map(|k| (k, RatingAggregate::new(average, count)))
                .map_err(|_| HorooError::InternalError(format!("Unknown listing kind {}", kind)))
        })
        .transpose()
    }

    pub async fn set_rating<'e, E>(
        executor: E,
        id: Uuid,
        aggregate: RatingAggregate,
    ) -> Result<(), HorooError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            "UPDATE listings SET average_rating = $2, total_ratings = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(aggregate.average)
        .bind(aggregate.count)
        .execute(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to update rating for {}: {}", id, e);
            HorooError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The part of the statement after the shared SELECT list
    fn where_clause(sql: &str) -> &str {
        &sql[sql.find(" WHERE ").unwrap()..]
    }

    #[test]
    fn test_like_pattern_escapes() {
        assert_eq!(like_pattern("HRM"), "%HRM%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_plain_filter_is_kind_scoped_and_ordered() {
        let qb = build_filter_query(ListingKind::Room, &ListingFilterQuery::default(), false);
        let sql = where_clause(qb.sql());
        assert!(sql.contains("WHERE l.kind = $1"));
        assert!(sql.trim_end().ends_with("ORDER BY l.created_at DESC"));
        assert!(!sql.contains("is_show"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_admin_filter_binds_every_clause() {
        let query = ListingFilterQuery {
            state: Some(Uuid::new_v4()),
            city: Some(Uuid::new_v4()),
            area: Some(Uuid::new_v4()),
            room_type: Some("Single".into()),
            unit_type: Some("2BHK".into()),
            available_for: Some("Girls".into()),
            availability: Some(true),
            is_verified: Some(false),
            is_show: Some(true),
            search: Some("napier".into()),
            page: None,
            limit: None,
        };
        let qb = build_filter_query(ListingKind::Flat, &query, false);
        let sql = qb.sql();

        assert!(sql.contains("l.state_id = $2"));
        assert!(sql.contains("l.city_id = $3"));
        assert!(sql.contains("l.area_id = $4"));
        assert!(sql.contains("$5 = ANY(l.room_types)"));
        assert!(sql.contains("$6 = ANY(l.unit_types)"));
        assert!(sql.contains("$7 = ANY(l.available_for)"));
        assert!(sql.contains("l.availability = $8"));
        assert!(sql.contains("l.is_verified = $9"));
        assert!(sql.contains("l.is_show = $10"));
        assert!(sql.contains("l.owner_mobile ILIKE"));
        assert!(sql.contains("unnest(l.nearby_areas)"));
    }

    #[test]
    fn test_public_filter_forces_visibility() {
        let query = ListingFilterQuery {
            is_show: Some(false),
            is_verified: Some(false),
            search: Some("HRM".into()),
            ..Default::default()
        };
        let qb = build_filter_query(ListingKind::Room, &query, true);
        let sql = where_clause(qb.sql());

        assert!(sql.contains("l.is_show = TRUE"));
        assert!(!sql.contains("l.is_show = $"));
        assert!(!sql.contains("l.is_verified"));
        assert!(!sql.contains("owner_mobile ILIKE"));
        assert!(!sql.contains("owner_name ILIKE"));
        assert!(sql.contains("l.horoo_name ILIKE"));
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let query = ListingFilterQuery {
            room_type: Some("  ".into()),
            search: Some("".into()),
            ..Default::default()
        };
        let qb = build_filter_query(ListingKind::Hostel, &query, false);
        let sql = qb.sql();
        assert!(!sql.contains("ANY("));
        assert!(!sql.contains("ILIKE"));
    }

    #[test]
    fn test_pagination() {
        let query = ListingFilterQuery {
            page: Some(3),
            limit: Some(500),
            ..Default::default()
        };
        let qb = build_filter_query(ListingKind::Mess, &query, true);
        let sql = qb.sql();
        assert!(sql.contains("LIMIT $2 OFFSET $3"));
    }
}
