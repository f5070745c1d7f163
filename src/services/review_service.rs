// src/services/review_service.rs
// DOCUMENTATION: Review writes and the listing rating aggregate
// PURPOSE: Every review write and its aggregate update share one transaction,
// with the listing row locked so concurrent reviews cannot lose updates

use crate::db::{ListingRepository, ReviewChanges, ReviewRepository};
use crate::errors::HorooError;
use crate::models::de::non_blank;
use crate::models::{
    AdminEditReviewRequest, CreateReviewRequest, EditReviewRequest, ListingKind,
    PublicReviewResponse, Review, ReviewListQuery, ReviewResponse,
};
use sqlx::PgPool;
use uuid::Uuid;

pub struct ReviewService;

/// Ratings are whole stars from 1 to 5
fn checked_rating(rating: i32) -> Result<i16, HorooError> {
    if (1..=5).contains(&rating) {
        Ok(rating as i16)
    } else {
        Err(HorooError::InvalidInput(
            "Rating must be between 1 and 5".to_string(),
        ))
    }
}

fn db_error(e: sqlx::Error) -> HorooError {
    log::error!("Review transaction failed: {}", e);
    HorooError::DatabaseError(e.to_string())
}

impl ReviewService {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: CreateReviewRequest,
    ) -> Result<ReviewResponse, HorooError> {
        let (property_type, property_id, rating, message) = match (
            non_blank(&req.property_type),
            req.property_id,
            req.rating,
            non_blank(&req.message),
        ) {
            (Some(t), Some(id), Some(r), Some(m)) => (t, id, r, m),
            _ => {
                return Err(HorooError::InvalidInput(
                    "propertyType, propertyId, rating and message are required".to_string(),
                ))
            }
        };
        let rating = checked_rating(rating)?;
        let kind: ListingKind = property_type.parse()?;

        let mut tx = pool.begin().await.map_err(db_error)?;

        let aggregate = match ListingRepository::lock_rating(&mut *tx, property_id).await? {
            Some((found, aggregate)) if found == kind => aggregate,
            _ => return Err(HorooError::NotFound(format!("{} not found", kind.label()))),
        };

        let id = ReviewRepository::insert(
            &mut *tx,
            user_id,
            kind.as_str(),
            property_id,
            rating,
            message,
        )
        .await?;
        ListingRepository::set_rating(&mut *tx, property_id, aggregate.with_added(rating)).await?;

        let review = ReviewRepository::find_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| HorooError::InternalError("Review vanished after insert".to_string()))?;
        tx.commit().await.map_err(db_error)?;

        log::info!("User {} reviewed {} {} ({})", user_id, kind, property_id, rating);
        Ok(review.to_response())
    }

    /// Author-only edit of rating and message
    pub async fn edit_by_user(
        pool: &PgPool,
        user_id: Uuid,
        review_id: Uuid,
        req: EditReviewRequest,
    ) -> Result<ReviewResponse, HorooError> {
        let changes = ReviewChanges {
            rating: req.rating.map(checked_rating).transpose()?,
            message: non_blank(&req.message).map(str::to_string),
            ..Default::default()
        };
        Self::apply(pool, review_id, Some(user_id), changes).await
    }

    pub async fn edit_by_admin(
        pool: &PgPool,
        review_id: Uuid,
        req: AdminEditReviewRequest,
    ) -> Result<ReviewResponse, HorooError> {
        let changes = ReviewChanges {
            rating: req.rating.map(checked_rating).transpose()?,
            message: non_blank(&req.message).map(str::to_string),
            is_approved: req.is_approved,
            is_active: req.is_active,
        };
        Self::apply(pool, review_id, None, changes).await
    }

    /// `author` restricts the edit to that user's own review
    async fn apply(
        pool: &PgPool,
        review_id: Uuid,
        author: Option<Uuid>,
        changes: ReviewChanges,
    ) -> Result<ReviewResponse, HorooError> {
        let mut tx = pool.begin().await.map_err(db_error)?;

        let review = Self::locked_review(&mut tx, review_id, author, "edit").await?;

        if let Some(new_rating) = changes.rating.filter(|r| *r != review.rating) {
            if let Some((_, aggregate)) =
                ListingRepository::lock_rating(&mut *tx, review.property_id).await?
            {
                ListingRepository::set_rating(
                    &mut *tx,
                    review.property_id,
                    aggregate.with_replaced(review.rating, new_rating),
                )
                .await?;
            }
        }

        ReviewRepository::update(&mut *tx, review_id, &changes).await?;
        let updated = ReviewRepository::find_by_id(&mut *tx, review_id)
            .await?
            .ok_or_else(|| HorooError::NotFound("Review not found".to_string()))?;
        tx.commit().await.map_err(db_error)?;

        log::info!("Review {} updated", review_id);
        Ok(updated.to_response())
    }

    pub async fn delete_by_user(
        pool: &PgPool,
        user_id: Uuid,
        review_id: Uuid,
    ) -> Result<(), HorooError> {
        Self::remove(pool, review_id, Some(user_id)).await
    }

    pub async fn delete_by_admin(pool: &PgPool, review_id: Uuid) -> Result<(), HorooError> {
        Self::remove(pool, review_id, None).await
    }

    async fn remove(pool: &PgPool, review_id: Uuid, author: Option<Uuid>) -> Result<(), HorooError> {
        let mut tx = pool.begin().await.map_err(db_error)?;

        let review = Self::locked_review(&mut tx, review_id, author, "delete").await?;

        if let Some((_, aggregate)) =
            ListingRepository::lock_rating(&mut *tx, review.property_id).await?
        {
            ListingRepository::set_rating(
                &mut *tx,
                review.property_id,
                aggregate.with_removed(review.rating),
            )
            .await?;
        }
        ReviewRepository::delete(&mut *tx, review_id).await?;
        tx.commit().await.map_err(db_error)?;

        log::info!("Review {} deleted", review_id);
        Ok(())
    }

    async fn locked_review(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        review_id: Uuid,
        author: Option<Uuid>,
        action: &str,
    ) -> Result<Review, HorooError> {
        let review = ReviewRepository::find_for_update(&mut **tx, review_id)
            .await?
            .ok_or_else(|| HorooError::NotFound("Review not found".to_string()))?;

        if let Some(user_id) = author {
            if review.user_id != user_id {
                log::warn!("User {} tried to {} review {}", user_id, action, review_id);
                return Err(HorooError::Forbidden(format!(
                    "You can only {} your own reviews",
                    action
                )));
            }
        }
        Ok(review)
    }

    /// Visible reviews of one listing
    pub async fn reviews_for_property(
        pool: &PgPool,
        property_type: &str,
        property_id: Uuid,
    ) -> Result<Vec<PublicReviewResponse>, HorooError> {
        let kind: ListingKind = property_type.parse()?;
        let reviews = ReviewRepository::list_for_property(pool, kind, property_id).await?;
        Ok(reviews.iter().map(Review::to_public).collect())
    }

    pub async fn my_reviews(pool: &PgPool, user_id: Uuid) -> Result<Vec<ReviewResponse>, HorooError> {
        let reviews = ReviewRepository::list_by_user(pool, user_id).await?;
        Ok(reviews.iter().map(Review::to_response).collect())
    }

    pub async fn all_reviews(
        pool: &PgPool,
        query: &ReviewListQuery,
    ) -> Result<Vec<ReviewResponse>, HorooError> {
        let reviews = ReviewRepository::list_all(pool, query).await?;
        Ok(reviews.iter().map(Review::to_response).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert_eq!(checked_rating(1).unwrap(), 1);
        assert_eq!(checked_rating(5).unwrap(), 5);
        assert!(checked_rating(0).is_err());
        assert!(checked_rating(6).is_err());
        assert!(checked_rating(-3).is_err());
    }

    #[test]
    fn test_rating_error_message() {
        let err = checked_rating(9).unwrap_err();
        assert_eq!(err.to_string(), "Rating must be between 1 and 5");
    }
}
