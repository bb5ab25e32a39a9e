pub mod admin;
pub mod drive;
pub mod memory;
pub mod traits;

pub use admin::{create_listing, delete_listing, AdminListingInput};
pub use drive::{DriveClient, DriveStore};
pub use memory::MemoryStore;
pub use traits::ListingStore;
