//! Admin mutation services.
//!
//! Every entry point re-checks the admin gate server-side before touching
//! the store — a client-side check alone is never trusted. Mutations run to
//! completion: validate, write, broadcast invalidation, return. Asset
//! bookkeeping follows the safe ordering: new files are confirmed stored and
//! the record updated before any old file is deleted.

pub mod categories;
pub mod products;

use bytes::Bytes;

pub use categories::AdminCategoryService;
pub use products::AdminProductService;

/// An image payload submitted through an admin form.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub filename: String,
    pub bytes: Bytes,
}
