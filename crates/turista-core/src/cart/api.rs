//! CartApi trait definition.
//!
//! The remote cart surface consumed by [`super::CartStore`]. The HTTP
//! implementation lives in `turista-client`; tests use in-memory fakes.
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use turista_types::cart::{AddToCartRequest, Cart};
use turista_types::error::ClientError;

/// Remote cart endpoints.
///
/// Every mutation returns the full recomputed cart; the server is the
/// single source of truth for prices and totals.
pub trait CartApi: Send + Sync {
    /// Fetch the current cart.
    fn fetch_cart(&self) -> impl std::future::Future<Output = Result<Cart, ClientError>> + Send;

    /// Add a service to the cart (create-or-merge on the server side).
    fn add_item(
        &self,
        request: &AddToCartRequest,
    ) -> impl std::future::Future<Output = Result<Cart, ClientError>> + Send;

    /// Set the quantity of an existing line item.
    fn update_item(
        &self,
        item_id: i64,
        cantidad: u32,
    ) -> impl std::future::Future<Output = Result<Cart, ClientError>> + Send;

    /// Remove a line item.
    fn remove_item(
        &self,
        item_id: i64,
    ) -> impl std::future::Future<Output = Result<Cart, ClientError>> + Send;

    /// Empty the cart.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), ClientError>> + Send;

    /// Lightweight item count for a badge, without the full cart.
    fn count_items(&self) -> impl std::future::Future<Output = Result<u32, ClientError>> + Send;
}
