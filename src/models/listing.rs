// src/models/listing.rs
// DOCUMENTATION: Core data structures for property listings
// PURPOSE: One shape shared by all seven listing families, plus API DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::de::{blank_as_none, non_blank, one_or_many, optional_uuid};
use super::PublicReviewResponse;
use crate::errors::HorooError;

/// Allowed `availableFor` tags (Commercial accepts free text)
pub const AVAILABLE_FOR: [&str; 3] = ["Boys", "Girls", "Family"];

/// Allowed `roomType` tags
pub const ROOM_TYPES: [&str; 3] = ["Single", "Double", "Triple"];

/// Allowed Flat/House unit types (Commercial accepts free text)
pub const UNIT_TYPES: [&str; 3] = ["1BHK", "2BHK", "3BHK"];

/// Allowed `priceSuffix` values
pub const PRICE_SUFFIXES: [&str; 4] = ["per month", "per day", "per night", "per hour"];

/// Listing family
/// DOCUMENTATION: Each family has its own Horoo ID prefix, media folder and
/// route segments. Serialized form matches the review `propertyType` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingKind {
    Room,
    Flat,
    Hostel,
    HotelRoom,
    House,
    Commercial,
    Mess,
}

impl ListingKind {
    pub const ALL: [ListingKind; 7] = [
        ListingKind::Room,
        ListingKind::Flat,
        ListingKind::Hostel,
        ListingKind::HotelRoom,
        ListingKind::House,
        ListingKind::Commercial,
        ListingKind::Mess,
    ];

    /// Value stored in `listings.kind` and accepted as review `propertyType`
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Room => "Room",
            ListingKind::Flat => "Flat",
            ListingKind::Hostel => "Hostel",
            ListingKind::HotelRoom => "HotelRoom",
            ListingKind::House => "House",
            ListingKind::Commercial => "Commercial",
            ListingKind::Mess => "Mess",
        }
    }

    /// Human-readable name used in messages ("Hotel room not found")
    pub fn label(&self) -> &'static str {
        match self {
            ListingKind::Room => "Room",
            ListingKind::Flat => "Flat",
            ListingKind::Hostel => "Hostel",
            ListingKind::HotelRoom => "Hotel room",
            ListingKind::House => "House",
            ListingKind::Commercial => "Commercial property",
            ListingKind::Mess => "Mess",
        }
    }

    pub fn horoo_prefix(&self) -> &'static str {
        match self {
            ListingKind::Room => "HRM",
            ListingKind::Flat => "HFT",
            ListingKind::Hostel => "HHL",
            ListingKind::HotelRoom => "HHR",
            ListingKind::House => "HSE",
            ListingKind::Commercial => "HCL",
            ListingKind::Mess => "MES",
        }
    }

    pub fn media_folder(&self) -> &'static str {
        match self {
            ListingKind::Room => "horoo-properties/rooms",
            ListingKind::Flat => "horoo-properties/flats",
            ListingKind::Hostel => "horoo-properties/hostels",
            ListingKind::HotelRoom => "horoo-properties/hotel-rooms",
            ListingKind::House => "horoo-properties/houses",
            ListingKind::Commercial => "horoo-properties/commercial",
            ListingKind::Mess => "horoo-properties/mess",
        }
    }

    /// Families that carry a URL slug
    pub fn has_slug(&self) -> bool {
        !matches!(self, ListingKind::Flat | ListingKind::Mess)
    }

    /// Route segment for single-item routes (`/api/{segment}/...`)
    pub fn singular_segment(&self) -> &'static str {
        match self {
            ListingKind::Room => "room",
            ListingKind::Flat => "flat",
            ListingKind::Hostel => "hostel",
            ListingKind::HotelRoom => "hotel",
            ListingKind::House => "house",
            ListingKind::Commercial => "commercial",
            ListingKind::Mess => "mess",
        }
    }

    /// Route segment for collection routes
    pub fn plural_segment(&self) -> &'static str {
        match self {
            ListingKind::Room => "rooms",
            ListingKind::Flat => "flats",
            ListingKind::Hostel => "hostels",
            ListingKind::HotelRoom => "hotel",
            ListingKind::House => "house",
            ListingKind::Commercial => "commercial",
            ListingKind::Mess => "mess",
        }
    }

    /// Kind-specific JSON name of the unit type field, when the family has one
    pub fn unit_type_field(&self) -> Option<&'static str> {
        match self {
            ListingKind::Flat => Some("flatType"),
            ListingKind::House => Some("houseType"),
            ListingKind::Commercial => Some("commercialType"),
            _ => None,
        }
    }

    /// Room is the only family whose names and public price are derived
    fn requires_public_names(&self) -> bool {
        !matches!(self, ListingKind::Room)
    }
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingKind {
    type Err = HorooError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ListingKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HorooError::InvalidInput(format!("Invalid property type: {}", s)))
    }
}

/// Complete listing record joined with its location names
/// DOCUMENTATION: Maps the `listings` table plus state/city/area names
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: Uuid,
    pub kind: ListingKind,
    pub horoo_id: String,
    pub slug: Option<String>,

    /// Internal name, never shown to users
    pub property_name: String,
    /// Name shown on the website
    pub horoo_name: String,

    pub owner_name: String,
    pub owner_mobile: String,
    pub owner_whatsapp: Option<String>,
    pub another_no: Option<String>,
    pub owner_id: Option<Uuid>,

    pub state_id: Uuid,
    pub state_name: Option<String>,
    pub city_id: Uuid,
    pub city_name: Option<String>,
    pub area_id: Uuid,
    pub area_name: Option<String>,
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
    /// Internal notes for customer support
    pub horoo_description: Option<String>,

    pub average_rating: f64,
    pub total_ratings: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Populated reference to a state, city or area
#[derive(Debug, Clone, Serialize)]
pub struct LocationRef {
    pub id: Uuid,
    pub name: Option<String>,
}

/// Admin view: every stored field
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: Uuid,
    pub property_type: ListingKind,
    pub horoo_id: String,
    pub slug: Option<String>,
    pub property_name: String,
    pub horoo_name: String,
    pub owner_name: String,
    pub owner_mobile: String,
    pub owner_whatsapp: Option<String>,
    pub another_no: Option<String>,
    pub owner_id: Option<Uuid>,
    pub state: LocationRef,
    pub city: LocationRef,
    pub area: LocationRef,
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
    #[serde(rename = "roomType")]
    pub room_types: Vec<String>,
    #[serde(rename = "unitType")]
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
    pub average_rating: f64,
    pub total_ratings: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view: owner contact, internal names and moderation flags removed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicListingResponse {
    pub id: Uuid,
    pub property_type: ListingKind,
    pub horoo_id: String,
    pub slug: Option<String>,
    pub horoo_name: String,
    pub state: LocationRef,
    pub city: LocationRef,
    pub area: LocationRef,
    pub pincode: String,
    pub nearby_areas: Vec<String>,
    pub map_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub horoo_address: Option<String>,
    pub facilities: Vec<String>,
    pub owner_price: f64,
    pub horoo_price: f64,
    pub price_suffix: Option<String>,
    pub offer_type: Option<String>,
    pub price_plans: Vec<String>,
    pub available_for: Vec<String>,
    pub size: Option<String>,
    #[serde(rename = "roomType")]
    pub room_types: Vec<String>,
    #[serde(rename = "unitType")]
    pub unit_types: Vec<String>,
    pub quantity: i32,
    pub availability: bool,
    pub is_verified: bool,
    pub main_image: Option<String>,
    pub other_images: Vec<String>,
    pub youtube_link: Option<String>,
    pub description: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub created_at: DateTime<Utc>,
}

/// Compact card for public browse lists
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: Uuid,
    pub horoo_id: String,
    pub slug: Option<String>,
    pub horoo_name: String,
    pub horoo_address: Option<String>,
    pub owner_whatsapp: Option<String>,
    pub state: LocationRef,
    pub city: LocationRef,
    pub area: LocationRef,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub owner_price: f64,
    pub horoo_price: f64,
    pub price_suffix: Option<String>,
    pub main_image: Option<String>,
    pub available_for: Vec<String>,
    #[serde(rename = "roomType")]
    pub room_types: Vec<String>,
    #[serde(rename = "unitType")]
    pub unit_types: Vec<String>,
    pub average_rating: f64,
    pub total_ratings: i32,
}

/// Public detail page: listing plus its visible reviews
#[derive(Debug, Clone, Serialize)]
pub struct ListingDetailResponse {
    #[serde(flatten)]
    pub listing: PublicListingResponse,
    pub reviews: Vec<PublicReviewResponse>,
}

/// Owner-facing summary used in owner profiles
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedListingSummary {
    pub id: Uuid,
    pub horoo_id: String,
    pub slug: Option<String>,
    pub property_name: String,
    pub horoo_name: String,
    pub horoo_price: f64,
    pub availability: bool,
    pub is_verified: bool,
    pub is_show: bool,
    pub main_image: Option<String>,
}

impl Listing {
    fn state_ref(&self) -> LocationRef {
        LocationRef { id: self.state_id, name: self.state_name.clone() }
    }

    fn city_ref(&self) -> LocationRef {
        LocationRef { id: self.city_id, name: self.city_name.clone() }
    }

    fn area_ref(&self) -> LocationRef {
        LocationRef { id: self.area_id, name: self.area_name.clone() }
    }

    /// Convert to the admin response
    pub fn to_response(&self) -> ListingResponse {
        ListingResponse {
            id: self.id,
            property_type: self.kind,
            horoo_id: self.horoo_id.clone(),
            slug: self.slug.clone(),
            property_name: self.property_name.clone(),
            horoo_name: self.horoo_name.clone(),
            owner_name: self.owner_name.clone(),
            owner_mobile: self.owner_mobile.clone(),
            owner_whatsapp: self.owner_whatsapp.clone(),
            another_no: self.another_no.clone(),
            owner_id: self.owner_id,
            state: self.state_ref(),
            city: self.city_ref(),
            area: self.area_ref(),
            pincode: self.pincode.clone(),
            nearby_areas: self.nearby_areas.clone(),
            map_link: self.map_link.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            real_address: self.real_address.clone(),
            horoo_address: self.horoo_address.clone(),
            facilities: self.facilities.clone(),
            owner_price: self.owner_price,
            horoo_price: self.horoo_price,
            price_suffix: self.price_suffix.clone(),
            offer_type: self.offer_type.clone(),
            price_plans: self.price_plans.clone(),
            available_for: self.available_for.clone(),
            size: self.size.clone(),
            room_types: self.room_types.clone(),
            unit_types: self.unit_types.clone(),
            quantity: self.quantity,
            availability: self.availability,
            is_verified: self.is_verified,
            is_show: self.is_show,
            main_image: self.main_image.clone(),
            other_images: self.other_images.clone(),
            youtube_link: self.youtube_link.clone(),
            description: self.description.clone(),
            horoo_description: self.horoo_description.clone(),
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Convert to the public response
    pub fn to_public(&self) -> PublicListingResponse {
        PublicListingResponse {
            id: self.id,
            property_type: self.kind,
            horoo_id: self.horoo_id.clone(),
            slug: self.slug.clone(),
            horoo_name: self.horoo_name.clone(),
            state: self.state_ref(),
            city: self.city_ref(),
            area: self.area_ref(),
            pincode: self.pincode.clone(),
            nearby_areas: self.nearby_areas.clone(),
            map_link: self.map_link.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            horoo_address: self.horoo_address.clone(),
            facilities: self.facilities.clone(),
            owner_price: self.owner_price,
            horoo_price: self.horoo_price,
            price_suffix: self.price_suffix.clone(),
            offer_type: self.offer_type.clone(),
            price_plans: self.price_plans.clone(),
            available_for: self.available_for.clone(),
            size: self.size.clone(),
            room_types: self.room_types.clone(),
            unit_types: self.unit_types.clone(),
            quantity: self.quantity,
            availability: self.availability,
            is_verified: self.is_verified,
            main_image: self.main_image.clone(),
            other_images: self.other_images.clone(),
            youtube_link: self.youtube_link.clone(),
            description: self.description.clone(),
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
            created_at: self.created_at,
        }
    }

    pub fn to_card(&self) -> ListingCard {
        ListingCard {
            id: self.id,
            horoo_id: self.horoo_id.clone(),
            slug: self.slug.clone(),
            horoo_name: self.horoo_name.clone(),
            horoo_address: self.horoo_address.clone(),
            owner_whatsapp: self.owner_whatsapp.clone(),
            state: self.state_ref(),
            city: self.city_ref(),
            area: self.area_ref(),
            latitude: self.latitude,
            longitude: self.longitude,
            owner_price: self.owner_price,
            horoo_price: self.horoo_price,
            price_suffix: self.price_suffix.clone(),
            main_image: self.main_image.clone(),
            available_for: self.available_for.clone(),
            room_types: self.room_types.clone(),
            unit_types: self.unit_types.clone(),
            average_rating: self.average_rating,
            total_ratings: self.total_ratings,
        }
    }

    pub fn to_owned_summary(&self) -> OwnedListingSummary {
        OwnedListingSummary {
            id: self.id,
            horoo_id: self.horoo_id.clone(),
            slug: self.slug.clone(),
            property_name: self.property_name.clone(),
            horoo_name: self.horoo_name.clone(),
            horoo_price: self.horoo_price,
            availability: self.availability,
            is_verified: self.is_verified,
            is_show: self.is_show,
            main_image: self.main_image.clone(),
        }
    }
}

/// Request body for creating or editing a listing
/// DOCUMENTATION: Every field is optional at the type level; `missing_fields`
/// applies the per-family required set on create. Family-specific names
/// (roomSize, flatType, houseType, ...) are accepted as aliases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPayload {
    pub property_name: Option<String>,
    pub horoo_name: Option<String>,
    pub owner_name: Option<String>,
    pub owner_mobile: Option<String>,
    pub owner_whatsapp: Option<String>,
    pub another_no: Option<String>,
    #[serde(default, deserialize_with = "optional_uuid")]
    pub owner_id: Option<Uuid>,

    #[serde(default, deserialize_with = "optional_uuid")]
    pub state: Option<Uuid>,
    #[serde(default, deserialize_with = "optional_uuid")]
    pub city: Option<Uuid>,
    #[serde(default, deserialize_with = "optional_uuid")]
    pub area: Option<Uuid>,
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub nearby_areas: Option<Vec<String>>,
    pub map_link: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub real_address: Option<String>,
    pub horoo_address: Option<String>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub facilities: Option<Vec<String>>,
    pub owner_price: Option<f64>,
    pub horoo_price: Option<f64>,
    pub price_suffix: Option<String>,
    pub offer_type: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub price_plans: Option<Vec<String>>,

    #[serde(default, deserialize_with = "one_or_many")]
    pub available_for: Option<Vec<String>>,
    #[serde(alias = "roomSize", alias = "houseSize", alias = "commercialSize")]
    pub size: Option<String>,
    #[serde(default, rename = "roomType", deserialize_with = "one_or_many")]
    pub room_types: Option<Vec<String>>,
    #[serde(
        default,
        rename = "unitType",
        alias = "flatType",
        alias = "houseType",
        alias = "commercialType",
        deserialize_with = "one_or_many"
    )]
    pub unit_types: Option<Vec<String>>,
    pub quantity: Option<i32>,
    pub availability: Option<bool>,
    pub is_verified: Option<bool>,
    pub is_show: Option<bool>,

    /// Base64 data URI or an already-hosted URL
    pub main_image: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub other_images: Option<Vec<String>>,
    pub youtube_link: Option<String>,

    pub description: Option<String>,
    pub horoo_description: Option<String>,
}

impl ListingPayload {
    /// Names of the required fields this payload lacks for the given family
    pub fn missing_fields(&self, kind: ListingKind) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if non_blank(&self.owner_name).is_none() {
            missing.push("ownerName");
        }
        if non_blank(&self.owner_mobile).is_none() {
            missing.push("ownerMobile");
        }
        if self.state.is_none() {
            missing.push("state");
        }
        if self.city.is_none() {
            missing.push("city");
        }
        if self.area.is_none() {
            missing.push("area");
        }
        if non_blank(&self.pincode).is_none() {
            missing.push("pincode");
        }
        if self.owner_price.is_none() {
            missing.push("ownerPrice");
        }

        if kind.requires_public_names() {
            if non_blank(&self.property_name).is_none() {
                missing.push("propertyName");
            }
            if non_blank(&self.horoo_name).is_none() {
                missing.push("horooName");
            }
            if self.horoo_price.is_none() {
                missing.push("horooPrice");
            }
        }

        missing
    }

    /// Check tag vocabularies, prices and quantity
    pub fn validate_values(&self, kind: ListingKind) -> Result<(), HorooError> {
        for (field, price) in [("ownerPrice", self.owner_price), ("horooPrice", self.horoo_price)] {
            if let Some(p) = price {
                if !p.is_finite() || p < 0.0 {
                    return Err(HorooError::InvalidInput(format!(
                        "{} must be a non-negative number",
                        field
                    )));
                }
            }
        }

        if let Some(q) = self.quantity {
            if q < 0 {
                return Err(HorooError::InvalidInput(
                    "quantity must not be negative".to_string(),
                ));
            }
        }

        if kind != ListingKind::Commercial {
            check_vocabulary("availableFor", self.available_for.as_deref(), &AVAILABLE_FOR)?;
            check_vocabulary(
                kind.unit_type_field().unwrap_or("unitType"),
                self.unit_types.as_deref(),
                &UNIT_TYPES,
            )?;
        }
        check_vocabulary("roomType", self.room_types.as_deref(), &ROOM_TYPES)?;

        if let Some(suffix) = non_blank(&self.price_suffix) {
            if !PRICE_SUFFIXES.contains(&suffix) {
                return Err(HorooError::InvalidInput(format!(
                    "Invalid priceSuffix: {}",
                    suffix
                )));
            }
        }

        Ok(())
    }
}

fn check_vocabulary(
    field: &str,
    values: Option<&[String]>,
    allowed: &[&str],
) -> Result<(), HorooError> {
    if let Some(values) = values {
        if let Some(bad) = values.iter().find(|v| !allowed.contains(&v.as_str())) {
            return Err(HorooError::InvalidInput(format!(
                "Invalid {} value: {}",
                field, bad
            )));
        }
    }
    Ok(())
}

/// Query parameters for the admin and public filter endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilterQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub state: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub city: Option<Uuid>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub area: Option<Uuid>,
    pub room_type: Option<String>,
    #[serde(alias = "flatType", alias = "houseType", alias = "commercialType")]
    pub unit_type: Option<String>,
    pub available_for: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub availability: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_verified: Option<bool>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub is_show: Option<bool>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> ListingPayload {
        ListingPayload {
            property_name: Some("Green Villa".into()),
            horoo_name: Some("Horoo Green".into()),
            owner_name: Some("Ravi".into()),
            owner_mobile: Some("9876543210".into()),
            state: Some(Uuid::new_v4()),
            city: Some(Uuid::new_v4()),
            area: Some(Uuid::new_v4()),
            pincode: Some("482001".into()),
            owner_price: Some(5000.0),
            horoo_price: Some(5500.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_kind_constants() {
        assert_eq!(ListingKind::Room.horoo_prefix(), "HRM");
        assert_eq!(ListingKind::HotelRoom.horoo_prefix(), "HHR");
        assert_eq!(ListingKind::Mess.media_folder(), "horoo-properties/mess");
        assert_eq!(ListingKind::HotelRoom.plural_segment(), "hotel");
        assert!(ListingKind::House.has_slug());
        assert!(!ListingKind::Flat.has_slug());
        assert!(!ListingKind::Mess.has_slug());
    }

    #[test]
    fn test_kind_from_str() {
        for kind in ListingKind::ALL {
            assert_eq!(kind.as_str().parse::<ListingKind>().unwrap(), kind);
        }
        assert!("Villa".parse::<ListingKind>().is_err());
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let mut prefixes: Vec<_> = ListingKind::ALL.iter().map(|k| k.horoo_prefix()).collect();
        prefixes.sort();
        prefixes.dedup();
        assert_eq!(prefixes.len(), 7);
    }

    #[test]
    fn test_room_needs_only_core_fields() {
        let payload = ListingPayload {
            property_name: None,
            horoo_name: None,
            horoo_price: None,
            ..full_payload()
        };
        assert!(payload.missing_fields(ListingKind::Room).is_empty());
        assert_eq!(
            payload.missing_fields(ListingKind::Flat),
            vec!["propertyName", "horooName", "horooPrice"]
        );
    }

    #[test]
    fn test_blank_strings_count_as_missing() {
        let payload = ListingPayload {
            owner_name: Some("   ".into()),
            pincode: None,
            ..full_payload()
        };
        assert_eq!(
            payload.missing_fields(ListingKind::Hostel),
            vec!["ownerName", "pincode"]
        );
    }

    #[test]
    fn test_tag_vocabularies() {
        let mut payload = full_payload();
        payload.available_for = Some(vec!["Boys".into(), "Family".into()]);
        payload.room_types = Some(vec!["Single".into()]);
        payload.unit_types = Some(vec!["2BHK".into()]);
        payload.price_suffix = Some("per month".into());
        assert!(payload.validate_values(ListingKind::Flat).is_ok());

        payload.unit_types = Some(vec!["Penthouse".into()]);
        assert!(payload.validate_values(ListingKind::Flat).is_err());
        // Commercial accepts free text
        assert!(payload.validate_values(ListingKind::Commercial).is_ok());

        payload.room_types = Some(vec!["Quad".into()]);
        assert!(payload.validate_values(ListingKind::Commercial).is_err());
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut payload = full_payload();
        payload.owner_price = Some(-1.0);
        assert!(payload.validate_values(ListingKind::Room).is_err());
    }

    #[test]
    fn test_payload_aliases() {
        let json = r#"{
            "ownerName": "Asha",
            "roomSize": "10x12",
            "flatType": ["1BHK"],
            "roomType": "Double",
            "availableFor": ["Girls"],
            "ownerId": ""
        }"#;
        let payload: ListingPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.size.as_deref(), Some("10x12"));
        assert_eq!(payload.unit_types, Some(vec!["1BHK".to_string()]));
        assert_eq!(payload.room_types, Some(vec!["Double".to_string()]));
        assert!(payload.owner_id.is_none());

        let json = r#"{"houseType": ["3BHK"], "houseSize": "1200 sqft"}"#;
        let payload: ListingPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.unit_types, Some(vec!["3BHK".to_string()]));
        assert_eq!(payload.size.as_deref(), Some("1200 sqft"));
    }

    #[test]
    fn test_filter_query_ignores_blank_params() {
        let query = actix_web::web::Query::<ListingFilterQuery>::from_query(
            "state=&city=&area=&roomType=&availability=&page=&search=villa",
        )
        .unwrap()
        .into_inner();
        assert!(query.state.is_none());
        assert!(query.city.is_none());
        assert!(query.area.is_none());
        assert!(query.availability.is_none());
        assert!(query.page.is_none());
        assert_eq!(query.search.as_deref(), Some("villa"));
    }

    #[test]
    fn test_filter_query_parses_values() {
        let state = Uuid::new_v4();
        let query = actix_web::web::Query::<ListingFilterQuery>::from_query(&format!(
            "state={}&availability=true&isShow=false&flatType=2BHK&limit=5",
            state
        ))
        .unwrap()
        .into_inner();
        assert_eq!(query.state, Some(state));
        assert_eq!(query.availability, Some(true));
        assert_eq!(query.is_show, Some(false));
        assert_eq!(query.unit_type.as_deref(), Some("2BHK"));
        assert_eq!(query.limit, Some(5));
    }

    #[test]
    fn test_public_view_hides_private_fields() {
        let now = Utc::now();
        let listing = Listing {
            id: Uuid::new_v4(),
            kind: ListingKind::Room,
            horoo_id: "HRM0001".into(),
            slug: Some("room-hrm0001".into()),
            property_name: "Room HRM0001".into(),
            horoo_name: "Room HRM0001".into(),
            owner_name: "Ravi".into(),
            owner_mobile: "9876543210".into(),
            owner_whatsapp: Some("9876500000".into()),
            another_no: None,
            owner_id: None,
            state_id: Uuid::new_v4(),
            state_name: Some("MP".into()),
            city_id: Uuid::new_v4(),
            city_name: Some("Jabalpur".into()),
            area_id: Uuid::new_v4(),
            area_name: Some("Napier Town".into()),
            pincode: "482001".into(),
            nearby_areas: vec![],
            map_link: None,
            latitude: Some(23.16),
            longitude: Some(79.93),
            real_address: Some("12 Secret Lane".into()),
            horoo_address: Some("Near Napier Town".into()),
            facilities: vec![],
            owner_price: 4000.0,
            horoo_price: 4000.0,
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
            horoo_description: Some("call after 6pm".into()),
            average_rating: 3.5,
            total_ratings: 0,
            created_at: now,
            updated_at: now,
        };

        let public = serde_json::to_value(listing.to_public()).unwrap();
        for hidden in [
            "ownerName",
            "ownerMobile",
            "realAddress",
            "horooDescription",
            "isShow",
            "propertyName",
        ] {
            assert!(public.get(hidden).is_none(), "{} leaked", hidden);
        }
        assert_eq!(public["state"]["name"], "MP");
        assert_eq!(public["propertyType"], "Room");

        let card = serde_json::to_value(listing.to_card()).unwrap();
        assert_eq!(card["ownerWhatsapp"], "9876500000");
        assert_eq!(card["latitude"], 23.16);
        assert_eq!(card["longitude"], 79.93);
        assert!(card.get("ownerMobile").is_none());
        assert!(card.get("realAddress").is_none());

        let admin = serde_json::to_value(listing.to_response()).unwrap();
        assert_eq!(admin["ownerMobile"], "9876543210");
        assert_eq!(admin["horooDescription"], "call after 6pm");
    }
}
