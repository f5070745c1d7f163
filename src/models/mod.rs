// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod account;
pub mod admin;
pub mod de;
pub mod envelope;
pub mod listing;
pub mod listing_request;
pub mod location;
pub mod owner;
pub mod request;
pub mod review;
pub mod user;

pub use account::*;
pub use admin::*;
pub use envelope::*;
pub use listing::*;
pub use listing_request::*;
pub use location::*;
pub use owner::*;
pub use request::*;
pub use review::*;
pub use user::*;
