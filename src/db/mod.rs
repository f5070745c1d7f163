// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export repositories

pub mod admin_repository;
pub mod credentials;
pub mod listing_repository;
pub mod listing_request_repository;
pub mod location_repository;
pub mod owner_repository;
pub mod request_repository;
pub mod review_repository;
pub mod user_repository;

pub use admin_repository::AdminRepository;
pub use credentials::{AccountTable, CredentialRecord, CredentialRepository};
pub use listing_repository::{ListingRepository, NewListing};
pub use listing_request_repository::ListingRequestRepository;
pub use location_repository::LocationRepository;
pub use owner_repository::{NewOwner, OwnerRepository};
pub use request_repository::RequestRepository;
pub use review_repository::{ReviewChanges, ReviewRepository};
pub use user_repository::UserRepository;
