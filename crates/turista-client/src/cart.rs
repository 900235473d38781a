//! CartApi over HTTP.

use reqwest::Method;

use turista_core::cart::CartApi;
use turista_types::cart::{AddToCartRequest, Cart};
use turista_types::error::ClientError;

use crate::http::TuristaClient;

impl CartApi for TuristaClient {
    async fn fetch_cart(&self) -> Result<Cart, ClientError> {
        self.get_json("carrito").await
    }

    async fn add_item(&self, request: &AddToCartRequest) -> Result<Cart, ClientError> {
        self.execute(self.request(Method::POST, "carrito/agregar").json(request))
            .await
    }

    async fn update_item(&self, item_id: i64, cantidad: u32) -> Result<Cart, ClientError> {
        self.execute(
            self.request(Method::PUT, &format!("carrito/item/{item_id}"))
                .query(&[("cantidad", cantidad)]),
        )
        .await
    }

    async fn remove_item(&self, item_id: i64) -> Result<Cart, ClientError> {
        self.execute(self.request(Method::DELETE, &format!("carrito/item/{item_id}")))
            .await
    }

    async fn clear(&self) -> Result<(), ClientError> {
        self.execute_empty(self.request(Method::DELETE, "carrito/limpiar"))
            .await
    }

    async fn count_items(&self) -> Result<u32, ClientError> {
        self.get_json("carrito/contar").await
    }
}
