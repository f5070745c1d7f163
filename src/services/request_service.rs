// src/services/request_service.rs
// DOCUMENTATION: Booking requests and listing requests
// PURPOSE: Field and vocabulary checks in front of the two request repositories

use crate::db::{ListingRequestRepository, RequestRepository};
use crate::errors::HorooError;
use crate::models::account::validate_mobile;
use crate::models::de::non_blank;
use crate::models::{
    BookingFilterQuery, BookingRequest, CreateBookingRequest, CreateListingRequest,
    ListingRequest, ListingRequestFilterQuery, UpdateBookingRequest, UpdateListingRequest,
    BOOKING_STATUSES, LISTING_REQUEST_PROPERTY_TYPES, LISTING_REQUEST_STATUSES,
};
use sqlx::PgPool;
use uuid::Uuid;

fn check_allowed(field: &str, value: Option<&str>, allowed: &[&str]) -> Result<(), HorooError> {
    match value {
        Some(v) if !allowed.contains(&v) => Err(HorooError::InvalidInput(format!(
            "Invalid {}: {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

fn check_mobile(mobile: Option<&str>) -> Result<(), HorooError> {
    match mobile {
        Some(m) => validate_mobile(m).map_err(|_| {
            HorooError::ValidationError("Please provide a valid 10-digit mobile number".to_string())
        }),
        None => Ok(()),
    }
}

fn search_term(query: Option<&str>) -> Result<&str, HorooError> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| HorooError::InvalidInput("Search query is required".to_string()))
}

pub struct RequestService;

impl RequestService {
    /// File a booking request, linked to the user when one is signed in
    pub async fn add(
        pool: &PgPool,
        req: CreateBookingRequest,
        user_id: Option<Uuid>,
    ) -> Result<BookingRequest, HorooError> {
        let (horoo_id, user_name, phone) = match (
            non_blank(&req.horoo_id),
            non_blank(&req.user_name),
            non_blank(&req.user_phone_no),
        ) {
            (Some(h), Some(n), Some(p)) => (h, n, p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "horooId, userName and userPhoneNo are required".to_string(),
                ))
            }
        };

        let created = RequestRepository::create(pool, horoo_id, user_name, phone, user_id).await?;
        log::info!("Booking request {} filed for {}", created.id, created.horoo_id);
        Ok(created)
    }

    pub async fn all(pool: &PgPool) -> Result<Vec<BookingRequest>, HorooError> {
        RequestRepository::list_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: UpdateBookingRequest,
    ) -> Result<BookingRequest, HorooError> {
        check_allowed("status", changes.status.as_deref(), &BOOKING_STATUSES)?;
        RequestRepository::update(pool, id, &changes)
            .await?
            .ok_or_else(|| HorooError::NotFound("Request not found".to_string()))
    }

    pub async fn filter(
        pool: &PgPool,
        query: &BookingFilterQuery,
    ) -> Result<Vec<BookingRequest>, HorooError> {
        RequestRepository::filter(pool, query).await
    }

    pub async fn search(pool: &PgPool, query: Option<&str>) -> Result<Vec<BookingRequest>, HorooError> {
        RequestRepository::search(pool, search_term(query)?).await
    }
}

pub struct ListingRequestService;

impl ListingRequestService {
    pub async fn add(pool: &PgPool, req: CreateListingRequest) -> Result<ListingRequest, HorooError> {
        let (name, mobile, address) = match (
            non_blank(&req.name),
            non_blank(&req.mobile),
            non_blank(&req.address),
        ) {
            (Some(n), Some(m), Some(a)) => (n, m, a),
            _ => {
                return Err(HorooError::InvalidInput(
                    "name, mobile and address are required".to_string(),
                ))
            }
        };
        check_mobile(Some(mobile))?;
        let property_type = non_blank(&req.property_type);
        check_allowed("propertyType", property_type, &LISTING_REQUEST_PROPERTY_TYPES)?;

        let created = ListingRequestRepository::create(pool, name, mobile, address, property_type).await?;
        log::info!("Listing request {} received", created.id);
        Ok(created)
    }

    pub async fn all(pool: &PgPool) -> Result<Vec<ListingRequest>, HorooError> {
        ListingRequestRepository::list_all(pool).await
    }

    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        changes: UpdateListingRequest,
    ) -> Result<ListingRequest, HorooError> {
        check_mobile(changes.mobile.as_deref())?;
        check_allowed("propertyType", changes.property_type.as_deref(), &LISTING_REQUEST_PROPERTY_TYPES)?;
        check_allowed("status", changes.status.as_deref(), &LISTING_REQUEST_STATUSES)?;

        ListingRequestRepository::update(pool, id, &changes)
            .await?
            .ok_or_else(|| HorooError::NotFound("Listing request not found".to_string()))
    }

    pub async fn filter(
        pool: &PgPool,
        query: &ListingRequestFilterQuery,
    ) -> Result<Vec<ListingRequest>, HorooError> {
        ListingRequestRepository::filter(pool, query).await
    }

    pub async fn search(pool: &PgPool, query: Option<&str>) -> Result<Vec<ListingRequest>, HorooError> {
        ListingRequestRepository::search(pool, search_term(query)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabularies() {
        assert!(check_allowed("status", Some("Not Booked"), &BOOKING_STATUSES).is_ok());
        assert!(check_allowed("status", Some("booked"), &BOOKING_STATUSES).is_err());
        assert!(check_allowed("status", Some("on-hold"), &LISTING_REQUEST_STATUSES).is_ok());
        assert!(check_allowed("status", None, &LISTING_REQUEST_STATUSES).is_ok());
    }

    #[test]
    fn test_search_term_required() {
        assert_eq!(search_term(Some("  ravi ")).unwrap(), "ravi");
        assert!(search_term(Some("   ")).is_err());
        assert!(search_term(None).is_err());
    }

    #[test]
    fn test_listing_request_mobile() {
        assert!(check_mobile(Some("9876543210")).is_ok());
        assert!(matches!(
            check_mobile(Some("98765")),
            Err(HorooError::ValidationError(_))
        ));
    }
}
