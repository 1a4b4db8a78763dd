//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Not-found is `Ok(None)` or an
//! empty vec, never an error.

pub mod api_key_repo;
pub mod asset_repo;
pub mod listing_repo;
pub mod portal_repo;
pub mod reservation_repo;
pub mod tenant_repo;

pub use api_key_repo::ApiKeyRepo;
pub use asset_repo::AssetRepo;
pub use listing_repo::ListingRepo;
pub use portal_repo::PortalRepo;
pub use reservation_repo::ReservationRepo;
pub use tenant_repo::TenantRepo;
