// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod admin_service;
pub mod auth;
pub mod identifiers;
pub mod listing_service;
pub mod location_service;
pub mod media;
pub mod owner_service;
pub mod password_reset;
pub mod rate_limit;
pub mod rating;
pub mod request_service;
pub mod review_service;
pub mod user_service;

pub use admin_service::AdminService;
pub use listing_service::ListingService;
pub use location_service::LocationService;
pub use media::{CloudinaryClient, MediaStore};
pub use owner_service::OwnerService;
pub use password_reset::PasswordResetService;
pub use rate_limit::OtpLimiter;
pub use request_service::{ListingRequestService, RequestService};
pub use review_service::ReviewService;
pub use user_service::UserService;
