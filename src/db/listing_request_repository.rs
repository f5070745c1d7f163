// src/db/listing_request_repository.rs
// DOCUMENTATION: Listing request queries

use crate::db::listing_repository::like_pattern;
use crate::errors::HorooError;
use crate::models::{ListingRequest, ListingRequestFilterQuery, UpdateListingRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const LISTING_REQUEST_COLUMNS: &str =
    "id, name, mobile, address, property_type, status, created_at, updated_at";

pub fn build_listing_request_filter(
    query: &ListingRequestFilterQuery,
) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM listing_requests WHERE TRUE",
        LISTING_REQUEST_COLUMNS
    ));

    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND status = ");
        qb.push_bind(status.trim().to_string());
    }
    if let Some(kind) = query.property_type.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND property_type = ");
        qb.push_bind(kind.trim().to_string());
    }

    qb.push(" ORDER BY created_at DESC");
    qb
}

pub struct ListingRequestRepository;

fn db_error(action: &str, e: sqlx::Error) -> HorooError {
    log::error!("Failed to {}: {}", action, e);
    HorooError::DatabaseError(e.to_string())
}

impl ListingRequestRepository {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        mobile: &str,
        address: &str,
        property_type: Option<&str>,
    ) -> Result<ListingRequest, HorooError> {
        let sql = format!(
            r#"
            INSERT INTO listing_requests (name, mobile, address, property_type)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            LISTING_REQUEST_COLUMNS
        );
        sqlx::query_as::<_, ListingRequest>(&sql)
            .bind(name)
            .bind(mobile)
            .bind(address)
            .bind(property_type)
            .fetch_one(pool)
            .await
            .map_err(|e| db_error("create listing request", e))
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<ListingRequest>, HorooError> {
        let sql = format!(
            "SELECT {} FROM listing_requests ORDER BY created_at DESC",
            LISTING_REQUEST_COLUMNS
        );
        sqlx::query_as::<_, ListingRequest>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("list listing requests", e))
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &UpdateListingRequest,
    ) -> Result<Option<ListingRequest>, HorooError> {
        let sql = format!(
            r#"
            UPDATE listing_requests SET
                name = COALESCE($2, name),
                mobile = COALESCE($3, mobile),
                address = COALESCE($4, address),
                property_type = COALESCE($5, property_type),
                status = COALESCE($6, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            LISTING_REQUEST_COLUMNS
        );
        sqlx::query_as::<_, ListingRequest>(&sql)
            .bind(id)
            .bind(&changes.name)
            .bind(&changes.mobile)
            .bind(&changes.address)
            .bind(&changes.property_type)
            .bind(&changes.status)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("update listing request", e))
    }

    pub async fn filter(
        pool: &PgPool,
        query: &ListingRequestFilterQuery,
    ) -> Result<Vec<ListingRequest>, HorooError> {
        let mut qb = build_listing_request_filter(query);
        qb.build_query_as::<ListingRequest>()
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("filter listing requests", e))
    }

    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<ListingRequest>, HorooError> {
        let sql = format!(
            r#"
            SELECT {} FROM listing_requests
            WHERE name ILIKE $1 OR mobile ILIKE $1 OR address ILIKE $1
            ORDER BY created_at DESC
            "#,
            LISTING_REQUEST_COLUMNS
        );
        sqlx::query_as::<_, ListingRequest>(&sql)
            .bind(like_pattern(term))
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("search listing requests", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_request_filter_binds_in_order() {
        let query = ListingRequestFilterQuery {
            status: Some("on-hold".into()),
            property_type: Some("flat".into()),
        };
        let qb = build_listing_request_filter(&query);
        let sql = qb.sql();
        assert!(sql.contains("status = $1"));
        assert!(sql.contains("property_type = $2"));
        assert!(sql.ends_with("ORDER BY created_at DESC"));
    }
}
