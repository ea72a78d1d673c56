//! Authenticated identity and startup lifecycle.

mod store;

pub use store::SessionStore;
