// src/services/owner_service.rs
// DOCUMENTATION: Owner accounts: registration, login, profile and moderation

use crate::config::Config;
use crate::db::{ListingRepository, NewOwner, OwnerRepository};
use crate::errors::HorooError;
use crate::models::de::non_blank;
use crate::models::{
    normalize_email, Listing, OwnedListingSummary, Owner, OwnerLoginRequest,
    OwnerProfileResponse, OwnerResponse, RegisterOwnerRequest, UpdateOwnerProfileRequest,
};
use crate::services::auth::{hash_password, issue_token, verify_password, Role};
use sqlx::PgPool;
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

pub struct OwnerService;

impl OwnerService {
    /// Register an owner and sign them in
    pub async fn register(
        pool: &PgPool,
        config: &Config,
        req: RegisterOwnerRequest,
    ) -> Result<(String, OwnerResponse), HorooError> {
        let (name, email, mobile, password) = match (
            non_blank(&req.name),
            non_blank(&req.email),
            non_blank(&req.mobile),
            req.password.as_deref().filter(|p| !p.is_empty()),
            req.confirm_password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(n), Some(e), Some(m), Some(p), Some(_)) => (n, normalize_email(e), m, p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Please provide name, email, mobile, password and confirmPassword".to_string(),
                ))
            }
        };
        req.validate()?;

        if OwnerRepository::find_by_email(pool, &email).await?.is_some()
            || OwnerRepository::find_by_mobile(pool, mobile).await?.is_some()
        {
            return Err(HorooError::InvalidInput(
                "Owner with this email or mobile number already exists".to_string(),
            ));
        }

        let new = NewOwner {
            name: name.to_string(),
            email,
            mobile: mobile.to_string(),
            password_hash: hash_password(password)?,
            address: req.address.clone(),
            state: req.state.clone(),
            city: req.city.clone(),
            pincode: req.pincode.clone(),
            alternate_number: req.alternate_number.clone(),
        };
        let owner = OwnerRepository::create(pool, &new).await?;
        let token = issue_token(owner.id, Role::Owner, &config.jwt_secret, config.jwt_expires_in_days)?;

        log::info!("Registered owner {} ({})", owner.id, owner.email);
        Ok((token, owner.to_response()))
    }

    /// Login with either the email address or the mobile number
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        req: OwnerLoginRequest,
    ) -> Result<(String, OwnerResponse), HorooError> {
        let (identifier, password) = match (
            non_blank(&req.email_or_mobile),
            req.password.as_deref().filter(|p| !p.is_empty()),
        ) {
            (Some(i), Some(p)) => (i, p),
            _ => {
                return Err(HorooError::InvalidInput(
                    "Please provide email/mobile and password".to_string(),
                ))
            }
        };

        let owner = OwnerRepository::find_by_email_or_mobile(pool, &normalize_email(identifier), identifier)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !owner.is_active {
            return Err(HorooError::Forbidden(
                "Your account has been deactivated. Please contact support.".to_string(),
            ));
        }
        if !verify_password(password, &owner.password_hash)? {
            log::warn!("Failed owner login for {}", owner.id);
            return Err(invalid_credentials());
        }

        OwnerRepository::touch_last_login(pool, owner.id).await?;
        let token = issue_token(owner.id, Role::Owner, &config.jwt_secret, config.jwt_expires_in_days)?;

        let mut response = owner.to_response();
        response.last_login = Some(chrono::Utc::now());
        Ok((token, response))
    }

    pub async fn profile(pool: &PgPool, id: Uuid) -> Result<OwnerProfileResponse, HorooError> {
        let owner = Self::get(pool, id).await?;
        let listings = ListingRepository::list_by_owner(pool, owner.id).await?;

        Ok(OwnerProfileResponse {
            owner: owner.to_response(),
            listings: group_by_kind(&listings),
        })
    }

    /// Only contact and address fields can change here
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        changes: UpdateOwnerProfileRequest,
    ) -> Result<OwnerResponse, HorooError> {
        OwnerRepository::update_profile(pool, id, &changes)
            .await?
            .map(|o| o.to_response())
            .ok_or_else(owner_not_found)
    }

    /// Listings of a verified owner, grouped by family
    pub async fn my_listings(
        pool: &PgPool,
        owner: &Owner,
    ) -> Result<BTreeMap<String, Vec<OwnedListingSummary>>, HorooError> {
        if !owner.is_verified_owner {
            return Err(HorooError::Forbidden(
                "Your account is not verified. Please complete verification process.".to_string(),
            ));
        }
        let listings = ListingRepository::list_by_owner(pool, owner.id).await?;
        Ok(group_by_kind(&listings))
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Owner, HorooError> {
        OwnerRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(owner_not_found)
    }

    pub async fn all(pool: &PgPool) -> Result<Vec<OwnerResponse>, HorooError> {
        let owners = OwnerRepository::list_all(pool).await?;
        Ok(owners.iter().map(Owner::to_response).collect())
    }

    pub async fn verify(pool: &PgPool, id: Uuid) -> Result<OwnerResponse, HorooError> {
        let owner = OwnerRepository::set_verified(pool, id)
            .await?
            .ok_or_else(owner_not_found)?;
        log::info!("Owner {} verified", id);
        Ok(owner.to_response())
    }

    pub async fn deactivate(pool: &PgPool, id: Uuid) -> Result<OwnerResponse, HorooError> {
        let owner = OwnerRepository::deactivate(pool, id)
            .await?
            .ok_or_else(owner_not_found)?;
        log::info!("Owner {} deactivated", id);
        Ok(owner.to_response())
    }
}

fn invalid_credentials() -> HorooError {
    HorooError::Unauthorized("Invalid credentials".to_string())
}

fn owner_not_found() -> HorooError {
    HorooError::NotFound("Owner not found".to_string())
}

/// Owned listings keyed by family name
fn group_by_kind(listings: &[Listing]) -> BTreeMap<String, Vec<OwnedListingSummary>> {
    let mut grouped: BTreeMap<String, Vec<OwnedListingSummary>> = BTreeMap::new();
    for listing in listings {
        grouped
            .entry(listing.kind.as_str().to_string())
            .or_default()
            .push(listing.to_owned_summary());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingKind;
    use chrono::Utc;

    fn listing(kind: ListingKind, horoo_id: &str) -> Listing {
        let now = Utc::now();
        Listing {
            id: Uuid::new_v4(),
            kind,
            horoo_id: horoo_id.into(),
            slug: None,
            property_name: format!("{} name", horoo_id),
            horoo_name: format!("{} public", horoo_id),
            owner_name: "Ravi".into(),
            owner_mobile: "9876543210".into(),
            owner_whatsapp: None,
            another_no: None,
            owner_id: None,
            state_id: Uuid::new_v4(),
            state_name: None,
            city_id: Uuid::new_v4(),
            city_name: None,
            area_id: Uuid::new_v4(),
            area_name: None,
            pincode: "482001".into(),
            nearby_areas: vec![],
            map_link: None,
            latitude: None,
            longitude: None,
            real_address: None,
            horoo_address: None,
            facilities: vec![],
            owner_price: 1000.0,
            horoo_price: 1200.0,
            price_suffix: None,
            offer_type: None,
            price_plans: vec![],
            available_for: vec![],
            size: None,
            room_types: vec![],
            unit_types: vec![],
            quantity: 1,
            availability: true,
            is_verified: true,
            is_show: true,
            main_image: None,
            other_images: vec![],
            youtube_link: None,
            description: None,
            horoo_description: None,
            average_rating: 3.5,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_group_by_kind() {
        let listings = vec![
            listing(ListingKind::Room, "HRM0001"),
            listing(ListingKind::Flat, "HFT0001"),
            listing(ListingKind::Room, "HRM0002"),
        ];
        let grouped = group_by_kind(&listings);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[ListingKind::Room.as_str()].len(), 2);
        assert_eq!(grouped[ListingKind::Flat.as_str()][0].horoo_id, "HFT0001");
    }

    #[test]
    fn test_credential_errors_are_401() {
        assert!(matches!(invalid_credentials(), HorooError::Unauthorized(_)));
        assert!(matches!(owner_not_found(), HorooError::NotFound(_)));
    }
}
