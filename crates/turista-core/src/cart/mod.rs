//! Cart mirror: API trait and store.

pub mod api;
pub mod store;

pub use api::CartApi;
pub use store::CartStore;
