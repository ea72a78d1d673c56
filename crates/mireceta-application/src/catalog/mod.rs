//! Recipe catalog and favorites.

mod store;

pub use store::CatalogStore;
