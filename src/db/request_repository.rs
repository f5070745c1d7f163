// src/db/request_repository.rs
// DOCUMENTATION: Booking request queries

use crate::db::listing_repository::like_pattern;
use crate::errors::HorooError;
use crate::models::{BookingFilterQuery, BookingRequest, UpdateBookingRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const REQUEST_COLUMNS: &str =
    "id, horoo_id, user_name, user_phone_no, status, user_id, created_at, updated_at";

pub fn build_booking_filter(query: &BookingFilterQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM booking_requests WHERE TRUE", REQUEST_COLUMNS));

    if let Some(status) = query.status.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND status = ");
        qb.push_bind(status.trim().to_string());
    }
    if let Some(horoo_id) = query.horoo_id.as_deref().filter(|s| !s.trim().is_empty()) {
        qb.push(" AND horoo_id = ");
        qb.push_bind(horoo_id.trim().to_string());
    }

    qb.push(" ORDER BY created_at DESC");
    qb
}

pub struct RequestRepository;

fn db_error(action: &str, e: sqlx::Error) -> HorooError {
    log::error!("Failed to {}: {}", action, e);
    HorooError::DatabaseError(e.to_string())
}

impl RequestRepository {
    pub async fn create(
        pool: &PgPool,
        horoo_id: &str,
        user_name: &str,
        user_phone_no: &str,
        user_id: Option<Uuid>,
    ) -> Result<BookingRequest, HorooError> {
        let sql = format!(
            r#"
            INSERT INTO booking_requests (horoo_id, user_name, user_phone_no, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );
        sqlx::query_as::<_, BookingRequest>(&sql)
            .bind(horoo_id)
            .bind(user_name)
            .bind(user_phone_no)
            .bind(user_id)
            .fetch_one(pool)
            .await
            .map_err(|e| db_error("create booking request", e))
    }

    pub async fn list_all(pool: &PgPool) -> Result<Vec<BookingRequest>, HorooError> {
        let sql = format!(
            "SELECT {} FROM booking_requests ORDER BY created_at DESC",
            REQUEST_COLUMNS
        );
        sqlx::query_as::<_, BookingRequest>(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("list booking requests", e))
    }

    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<BookingRequest>, HorooError> {
        let sql = format!(
            "SELECT {} FROM booking_requests WHERE user_id = $1 ORDER BY created_at DESC",
            REQUEST_COLUMNS
        );
        sqlx::query_as::<_, BookingRequest>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("list user booking requests", e))
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: &UpdateBookingRequest,
    ) -> Result<Option<BookingRequest>, HorooError> {
        let sql = format!(
            r#"
            UPDATE booking_requests SET
                horoo_id = COALESCE($2, horoo_id),
                user_name = COALESCE($3, user_name),
                user_phone_no = COALESCE($4, user_phone_no),
                status = COALESCE($5, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        );
        sqlx::query_as::<_, BookingRequest>(&sql)
            .bind(id)
            .bind(&changes.horoo_id)
            .bind(&changes.user_name)
            .bind(&changes.user_phone_no)
            .bind(&changes.status)
            .fetch_optional(pool)
            .await
            .map_err(|e| db_error("update booking request", e))
    }

    pub async fn filter(
        pool: &PgPool,
        query: &BookingFilterQuery,
    ) -> Result<Vec<BookingRequest>, HorooError> {
        let mut qb = build_booking_filter(query);
        qb.build_query_as::<BookingRequest>()
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("filter booking requests", e))
    }

    /// Case-insensitive match on the requester's name or phone number
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<BookingRequest>, HorooError> {
        let sql = format!(
            r#"
            SELECT {} FROM booking_requests
            WHERE user_name ILIKE $1 OR user_phone_no ILIKE $1
            ORDER BY created_at DESC
            "#,
            REQUEST_COLUMNS
        );
        sqlx::query_as::<_, BookingRequest>(&sql)
            .bind(like_pattern(term))
            .fetch_all(pool)
            .await
            .map_err(|e| db_error("search booking requests", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_filter_skips_blank_values() {
        let query = BookingFilterQuery {
            status: Some("  ".into()),
            horoo_id: Some("HRM0004".into()),
        };
        let qb = build_booking_filter(&query);
        let sql = qb.sql();
        assert!(!sql.contains("status ="));
        assert!(sql.contains("horoo_id = $1"));
    }
}
