// src/services/listing_service.rs
// DOCUMENTATION: Business logic shared by every listing family
// PURPOSE: Validation, identifier generation, media upload and persistence for
// rooms, flats, hostels, hotel rooms, houses, commercial units and mess facilities

use crate::db::{ListingRepository, NewListing, OwnerRepository, ReviewRepository};
use crate::errors::HorooError;
use crate::models::de::non_blank;
use crate::models::{
    Listing, ListingCard, ListingDetailResponse, ListingFilterQuery, ListingKind,
    ListingPayload, ListingResponse, PublicListingResponse,
};
use crate::services::identifiers::{next_horoo_id, slug_candidate, slugify};
use crate::services::location_service::LocationService;
use crate::services::media::{resolve_gallery, resolve_main_image, MediaStore};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert attempts before a Horoo ID / slug collision is reported
const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Slug suffixes tried before giving up
const MAX_SLUG_PROBES: u32 = 1000;

pub struct ListingService;

impl ListingService {
    /// Create a listing of the given family
    /// DOCUMENTATION: Required fields, tag vocabularies, location hierarchy and
    /// the optional owner link are checked before anything is uploaded. Media
    /// is uploaded once under the first generated Horoo ID; a unique violation
    /// on insert regenerates the ID and slug and retries.
    pub async fn create(
        pool: &PgPool,
        media: &dyn MediaStore,
        kind: ListingKind,
        payload: ListingPayload,
    ) -> Result<ListingResponse, HorooError> {
        let missing = payload.missing_fields(kind);
        if !missing.is_empty() {
            log::warn!("Rejected {} create, missing: {:?}", kind, missing);
            return Err(HorooError::InvalidInput(format!(
                "Required fields are missing: {}",
                missing.join(", ")
            )));
        }
        payload.validate_values(kind)?;

        let (state, city, area) = required_locations(&payload)?;
        LocationService::ensure_hierarchy(pool, state, city, area).await?;
        if let Some(owner_id) = payload.owner_id {
            ensure_owner(pool, owner_id).await?;
        }

        let (mut horoo_id, mut slug) = Self::fresh_identifiers(pool, kind, &payload).await?;

        let main_image =
            resolve_main_image(media, payload.main_image.as_deref(), kind.media_folder(), &horoo_id)
                .await?;
        let other_images = resolve_gallery(
            media,
            payload.other_images.as_deref().unwrap_or(&[]),
            kind.media_folder(),
            &horoo_id,
        )
        .await?;

        let mut attempt = 1;
        loop {
            let new = build_new_listing(
                kind,
                &payload,
                horoo_id.clone(),
                slug.clone(),
                main_image.clone(),
                other_images.clone(),
            )?;

            match ListingRepository::insert(pool, &new).await {
                Ok(id) => {
                    let listing = ListingRepository::get_by_id(pool, kind, id).await?;
                    return Ok(listing.to_response());
                }
                Err(HorooError::AlreadyExists(msg)) if attempt < MAX_CREATE_ATTEMPTS => {
                    log::warn!(
                        "{} insert collided ({}), retrying with fresh identifiers",
                        kind,
                        msg
                    );
                    attempt += 1;
                    let fresh = Self::fresh_identifiers(pool, kind, &payload).await?;
                    horoo_id = fresh.0;
                    slug = fresh.1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fresh_identifiers(
        pool: &PgPool,
        kind: ListingKind,
        payload: &ListingPayload,
    ) -> Result<(String, Option<String>), HorooError> {
        let last = ListingRepository::latest_horoo_id(pool, kind).await?;
        let horoo_id = next_horoo_id(kind.horoo_prefix(), last.as_deref())?;

        let slug = if kind.has_slug() {
            let name = resolved_horoo_name(payload, &horoo_id);
            Some(Self::unique_slug(pool, kind, &name, &horoo_id).await?)
        } else {
            None
        };

        Ok((horoo_id, slug))
    }

    /// First free slug of `base`, `base-1`, `base-2`, ... within the family
    pub async fn unique_slug(
        pool: &PgPool,
        kind: ListingKind,
        name: &str,
        horoo_id: &str,
    ) -> Result<String, HorooError> {
        let base = slugify(name, horoo_id);
        for attempt in 0..MAX_SLUG_PROBES {
            let candidate = slug_candidate(&base, attempt);
            if !ListingRepository::slug_exists(pool, kind, &candidate).await? {
                return Ok(candidate);
            }
        }
        Err(HorooError::InternalError(format!(
            "No free slug for {}",
            base
        )))
    }

    pub async fn list_all(
        pool: &PgPool,
        kind: ListingKind,
    ) -> Result<Vec<ListingResponse>, HorooError> {
        let listings = ListingRepository::list_all(pool, kind).await?;
        Ok(listings.iter().map(Listing::to_response).collect())
    }

    pub async fn get_for_admin(
        pool: &PgPool,
        kind: ListingKind,
        id: Uuid,
    ) -> Result<ListingResponse, HorooError> {
        Ok(ListingRepository::get_by_id(pool, kind, id).await?.to_response())
    }

    pub async fn get_for_admin_by_horoo_id(
        pool: &PgPool,
        kind: ListingKind,
        horoo_id: &str,
    ) -> Result<ListingResponse, HorooError> {
        ListingRepository::find_by_horoo_id(pool, kind, horoo_id)
            .await?
            .map(|l| l.to_response())
            .ok_or_else(|| HorooError::NotFound(format!("{} not found", kind.label())))
    }

    /// Partial update; location and owner changes are re-checked and new
    /// data-URI images are uploaded
    pub async fn update(
        pool: &PgPool,
        media: &dyn MediaStore,
        kind: ListingKind,
        id: Uuid,
        payload: ListingPayload,
    ) -> Result<ListingResponse, HorooError> {
        let existing = ListingRepository::get_by_id(pool, kind, id).await?;
        payload.validate_values(kind)?;

        if payload.state.is_some() || payload.city.is_some() || payload.area.is_some() {
            LocationService::ensure_hierarchy(
                pool,
                payload.state.unwrap_or(existing.state_id),
                payload.city.unwrap_or(existing.city_id),
                payload.area.unwrap_or(existing.area_id),
            )
            .await?;
        }
        if let Some(owner_id) = payload.owner_id {
            ensure_owner(pool, owner_id).await?;
        }

        let main_image = match payload.main_image.as_deref() {
            Some(input) => {
                resolve_main_image(media, Some(input), kind.media_folder(), &existing.horoo_id)
                    .await?
            }
            None => None,
        };
        let other_images = match payload.other_images.as_deref() {
            Some(inputs) => Some(
                resolve_gallery(media, inputs, kind.media_folder(), &existing.horoo_id).await?,
            ),
            None => None,
        };

        let updated =
            ListingRepository::update(pool, kind, id, &payload, main_image, other_images).await?;
        Ok(updated.to_response())
    }

    pub async fn filter(
        pool: &PgPool,
        kind: ListingKind,
        query: &ListingFilterQuery,
    ) -> Result<Vec<ListingResponse>, HorooError> {
        let listings = ListingRepository::filter(pool, kind, query, false).await?;
        Ok(listings.iter().map(Listing::to_response).collect())
    }

    pub async fn list_for_user(
        pool: &PgPool,
        kind: ListingKind,
    ) -> Result<Vec<ListingCard>, HorooError> {
        let listings = ListingRepository::list_visible(pool, kind).await?;
        Ok(listings.iter().map(Listing::to_card).collect())
    }

    pub async fn filter_for_user(
        pool: &PgPool,
        kind: ListingKind,
        query: &ListingFilterQuery,
    ) -> Result<Vec<PublicListingResponse>, HorooError> {
        let listings = ListingRepository::filter(pool, kind, query, true).await?;
        Ok(listings.iter().map(Listing::to_public).collect())
    }

    /// Public detail by UUID, slug or Horoo ID, tried in that order
    pub async fn detail_for_user(
        pool: &PgPool,
        kind: ListingKind,
        key: &str,
    ) -> Result<ListingDetailResponse, HorooError> {
        let key = key.trim();
        let mut found = None;

        if let Ok(id) = Uuid::parse_str(key) {
            found = match ListingRepository::get_by_id(pool, kind, id).await {
                Ok(listing) => Some(listing),
                Err(HorooError::NotFound(_)) => None,
                Err(e) => return Err(e),
            };
        }
        if found.is_none() && kind.has_slug() {
            found = ListingRepository::find_by_slug(pool, kind, key).await?;
        }
        if found.is_none() {
            found = ListingRepository::find_by_horoo_id(pool, kind, key).await?;
        }

        let listing =
            found.ok_or_else(|| HorooError::NotFound(format!("{} not found", kind.label())))?;
        let reviews = ReviewRepository::list_for_property(pool, listing.kind, listing.id).await?;

        Ok(ListingDetailResponse {
            listing: listing.to_public(),
            reviews: reviews.iter().map(|r| r.to_public()).collect(),
        })
    }

    /// Give every slug-less listing of a slug family a unique slug
    pub async fn generate_slugs(pool: &PgPool, kind: ListingKind) -> Result<usize, HorooError> {
        if !kind.has_slug() {
            return Err(HorooError::InvalidInput(format!(
                "{} listings do not use slugs",
                kind.label()
            )));
        }

        let pending = ListingRepository::list_without_slug(pool, kind).await?;
        let mut updated = 0;
        for (id, horoo_name, horoo_id) in pending {
            let slug = Self::unique_slug(pool, kind, &horoo_name, &horoo_id).await?;
            ListingRepository::set_slug(pool, id, &slug).await?;
            updated += 1;
        }

        log::info!("Generated {} slugs for {}", updated, kind);
        Ok(updated)
    }
}

async fn ensure_owner(pool: &PgPool, owner_id: Uuid) -> Result<(), HorooError> {
    if OwnerRepository::exists(pool, owner_id).await? {
        Ok(())
    } else {
        Err(HorooError::NotFound("Owner not found".to_string()))
    }
}

fn required_locations(payload: &ListingPayload) -> Result<(Uuid, Uuid, Uuid), HorooError> {
    match (payload.state, payload.city, payload.area) {
        (Some(s), Some(c), Some(a)) => Ok((s, c, a)),
        _ => Err(HorooError::InvalidInput(
            "Required fields are missing: state, city, area".to_string(),
        )),
    }
}

fn required_text(value: &Option<String>, field: &str) -> Result<String, HorooError> {
    non_blank(value)
        .map(str::to_string)
        .ok_or_else(|| HorooError::InvalidInput(format!("Required fields are missing: {}", field)))
}

/// Property name, defaulting to `Room <horooId>` for rooms
fn resolved_property_name(payload: &ListingPayload, horoo_id: &str) -> String {
    non_blank(&payload.property_name)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Room {}", horoo_id))
}

fn resolved_horoo_name(payload: &ListingPayload, horoo_id: &str) -> String {
    non_blank(&payload.horoo_name)
        .map(str::to_string)
        .unwrap_or_else(|| resolved_property_name(payload, horoo_id))
}

/// Assemble the insert row, applying the family defaults
fn build_new_listing(
    kind: ListingKind,
    payload: &ListingPayload,
    horoo_id: String,
    slug: Option<String>,
    main_image: Option<String>,
    other_images: Vec<String>,
) -> Result<NewListing, HorooError> {
    let (state_id, city_id, area_id) = required_locations(payload)?;
    let owner_price = payload
        .owner_price
        .ok_or_else(|| HorooError::InvalidInput("Required fields are missing: ownerPrice".into()))?;

    Ok(NewListing {
        kind,
        property_name: resolved_property_name(payload, &horoo_id),
        horoo_name: resolved_horoo_name(payload, &horoo_id),
        horoo_price: payload.horoo_price.unwrap_or(owner_price),
        owner_price,
        owner_name: required_text(&payload.owner_name, "ownerName")?,
        owner_mobile: required_text(&payload.owner_mobile, "ownerMobile")?,
        owner_whatsapp: payload.owner_whatsapp.clone(),
        another_no: payload.another_no.clone(),
        owner_id: payload.owner_id,
        state_id,
        city_id,
        area_id,
        pincode: required_text(&payload.pincode, "pincode")?,
        nearby_areas: payload.nearby_areas.clone().unwrap_or_default(),
        map_link: payload.map_link.clone(),
        latitude: payload.latitude,
        longitude: payload.longitude,
        real_address: payload.real_address.clone(),
        horoo_address: payload.horoo_address.clone(),
        facilities: payload.facilities.clone().unwrap_or_default(),
        price_suffix: payload.price_suffix.clone(),
        offer_type: payload.offer_type.clone(),
        price_plans: payload.price_plans.clone().unwrap_or_default(),
        available_for: payload.available_for.clone().unwrap_or_default(),
        size: payload.size.clone(),
        room_types: payload.room_types.clone().unwrap_or_default(),
        unit_types: payload.unit_types.clone().unwrap_or_default(),
        quantity: payload.quantity.unwrap_or(1),
        availability: payload.availability.unwrap_or(true),
        is_verified: payload.is_verified.unwrap_or(true),
        is_show: payload.is_show.unwrap_or(false),
        main_image,
        other_images,
        youtube_link: payload.youtube_link.clone(),
        description: payload.description.clone(),
        horoo_description: payload.horoo_description.clone(),
        horoo_id,
        slug,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room_payload() -> ListingPayload {
        ListingPayload {
            owner_name: Some("Ravi".into()),
            owner_mobile: Some("9876543210".into()),
            state: Some(Uuid::new_v4()),
            city: Some(Uuid::new_v4()),
            area: Some(Uuid::new_v4()),
            pincode: Some("482001".into()),
            owner_price: Some(4500.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_room_defaults() {
        let new = build_new_listing(
            ListingKind::Room,
            &room_payload(),
            "HRM0012".into(),
            Some("room-hrm0012".into()),
            None,
            vec![],
        )
        .unwrap();

        assert_eq!(new.property_name, "Room HRM0012");
        assert_eq!(new.horoo_name, "Room HRM0012");
        assert_eq!(new.horoo_price, 4500.0);
        assert_eq!(new.quantity, 1);
        assert!(new.availability);
        assert!(new.is_verified);
        assert!(!new.is_show);
        assert!(new.nearby_areas.is_empty());
    }

    #[test]
    fn test_explicit_values_win_over_defaults() {
        let mut payload = room_payload();
        payload.property_name = Some("Sunrise PG".into());
        payload.horoo_price = Some(5000.0);
        payload.is_show = Some(true);
        payload.quantity = Some(4);

        let new = build_new_listing(
            ListingKind::Hostel,
            &payload,
            "HHL0001".into(),
            None,
            Some("https://cdn.test/main.jpg".into()),
            vec!["https://cdn.test/1.jpg".into()],
        )
        .unwrap();

        assert_eq!(new.property_name, "Sunrise PG");
        assert_eq!(new.horoo_name, "Sunrise PG");
        assert_eq!(new.horoo_price, 5000.0);
        assert_eq!(new.quantity, 4);
        assert!(new.is_show);
        assert_eq!(new.other_images.len(), 1);
    }

    #[test]
    fn test_slug_source_prefers_horoo_name() {
        let mut payload = room_payload();
        payload.property_name = Some("Internal name".into());
        payload.horoo_name = Some("Cozy Room Near Station".into());
        let name = resolved_horoo_name(&payload, "HRM0001");
        assert_eq!(slugify(&name, "HRM0001"), "cozy-room-near-station");
    }

    #[test]
    fn test_missing_location_is_rejected() {
        let mut payload = room_payload();
        payload.area = None;
        let err = build_new_listing(ListingKind::Room, &payload, "HRM0001".into(), None, None, vec![])
            .unwrap_err();
        assert!(matches!(err, HorooError::InvalidInput(_)));
    }
}
