// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: CRUD for listing reviews; writes accept a transaction executor so the
// caller can update the listing's rating aggregate atomically

use crate::errors::{is_unique_violation, HorooError};
use crate::models::{ListingKind, Review, ReviewListQuery};
use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Review columns joined with the author's public fields
const REVIEW_SELECT: &str = r#"
    SELECT
        r.id, r.user_id, r.property_type, r.property_id, r.rating, r.message,
        r.is_approved, r.is_active, r.created_at, r.updated_at,
        u.name AS author_name, u.email AS author_email, u.profile_picture AS author_picture
    FROM reviews r
    JOIN users u ON u.id = r.user_id
"#;

/// Changes applied to an existing review
#[derive(Debug, Clone, Default)]
pub struct ReviewChanges {
    pub rating: Option<i16>,
    pub message: Option<String>,
    pub is_approved: Option<bool>,
    pub is_active: Option<bool>,
}

/// Visible reviews of one listing; binds the listing id then its kind
fn property_reviews_sql() -> String {
    format!(
        r#"{} WHERE r.property_id = $1 AND r.property_type = $2
            AND r.is_approved = TRUE AND r.is_active = TRUE
            ORDER BY r.created_at DESC"#,
        REVIEW_SELECT
    )
}

/// Admin listing query: optional moderation flags, newest first
pub fn build_review_list_query(query: &ReviewListQuery) -> QueryBuilder<'static, Postgres> {
    let mut qb: QueryBuilder<'static, Postgres> = QueryBuilder::new(REVIEW_SELECT);
    qb.push(" WHERE TRUE");

    if let Some(approved) = query.is_approved {
        qb.push(" AND r.is_approved = ");
        qb.push_bind(approved);
    }
    if let Some(active) = query.is_active {
        qb.push(" AND r.is_active = ");
        qb.push_bind(active);
    }

    qb.push(" ORDER BY r.created_at DESC");
    qb
}

pub struct ReviewRepository;

impl ReviewRepository {
    /// Insert a review, returning its id
    /// DOCUMENTATION: (user_id, property_id) is unique; a second review is rejected
    pub async fn insert<'e, E>(
        executor: E,
        user_id: Uuid,
        property_type: &str,
        property_id: Uuid,
        rating: i16,
        message: &str,
    ) -> Result<Uuid, HorooError>
    where
        E: PgExecutor<'e>,
    {
        let row: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO reviews (user_id, property_type, property_id, rating, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(property_type)
        .bind(property_id)
        .bind(rating)
        .bind(message)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                HorooError::InvalidInput("You have already reviewed this property".to_string())
            } else {
                log::error!("Failed to create review: {}", e);
                HorooError::DatabaseError(format!("Create review failed: {}", e))
            }
        })?;

        Ok(row.0)
    }

    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Review>, HorooError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{} WHERE r.id = $1", REVIEW_SELECT);
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch review {}: {}", id, e);
                HorooError::DatabaseError(e.to_string())
            })
    }

    /// Fetch and lock a review row for the rest of the transaction
    pub async fn find_for_update<'e, E>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<Review>, HorooError>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!("{} WHERE r.id = $1 FOR UPDATE OF r", REVIEW_SELECT);
        sqlx::query_as::<_, Review>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to lock review {}: {}", id, e);
                HorooError::DatabaseError(e.to_string())
            })
    }

    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        changes: &ReviewChanges,
    ) -> Result<(), HorooError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            UPDATE reviews SET
                rating = COALESCE($2, rating),
                message = COALESCE($3, message),
                is_approved = COALESCE($4, is_approved),
                is_active = COALESCE($5, is_active),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.rating)
        .bind(&changes.message)
        .bind(changes.is_approved)
        .bind(changes.is_active)
        .execute(executor)
        .await
        .map_err(|e| {
            log::error!("Failed to update review {}: {}", id, e);
            HorooError::DatabaseError(e.to_string())
        })?;
        Ok(())
    }

    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<(), HorooError>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| {
                log::error!("Failed to delete review {}: {}", id, e);
                HorooError::DatabaseError(e.to_string())
            })?;
        Ok(())
    }

    /// Approved, active reviews of one listing, newest first
    pub async fn list_for_property(
        pool: &PgPool,
        kind: ListingKind,
        property_id: Uuid,
    ) -> Result<Vec<Review>, HorooError> {
        sqlx::query_as::<_, Review>(&property_reviews_sql())
            .bind(property_id)
            .bind(kind.as_str())
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch reviews for {}: {}", property_id, e);
                HorooError::DatabaseError(e.to_string())
            })
    }

    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Review>, HorooError> {
        let sql = format!(
            "{} WHERE r.user_id = $1 ORDER BY r.created_at DESC",
            REVIEW_SELECT
        );
        sqlx::query_as::<_, Review>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch reviews of user {}: {}", user_id, e);
                HorooError::DatabaseError(e.to_string())
            })
    }

    pub async fn list_all(
        pool: &PgPool,
        query: &ReviewListQuery,
    ) -> Result<Vec<Review>, HorooError> {
        let mut qb = build_review_list_query(query);
        qb.build_query_as::<Review>()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list reviews: {}", e);
                HorooError::DatabaseError(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfiltered_review_list() {
        let qb = build_review_list_query(&ReviewListQuery::default());
        let sql = qb.sql();
        assert!(sql.contains("JOIN users u ON u.id = r.user_id"));
        assert!(!sql.contains("$1"));
        assert!(sql.ends_with("ORDER BY r.created_at DESC"));
    }

    #[test]
    fn test_review_list_with_flags() {
        let query = ReviewListQuery {
            is_approved: Some(false),
            is_active: Some(true),
        };
        let qb = build_review_list_query(&query);
        let sql = qb.sql();
        assert!(sql.contains("r.is_approved = $1"));
        assert!(sql.contains("r.is_active = $2"));
    }

    #[test]
    fn test_property_reviews_match_kind_and_id() {
        let sql = property_reviews_sql();
        assert!(sql.contains("r.property_id = $1"));
        assert!(sql.contains("r.property_type = $2"));
        assert!(sql.contains("r.is_approved = TRUE AND r.is_active = TRUE"));
    }
}
