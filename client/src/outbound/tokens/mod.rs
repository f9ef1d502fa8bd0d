//! Persistent token storage adapters.

mod dir_store;

pub use dir_store::DirTokenStore;
