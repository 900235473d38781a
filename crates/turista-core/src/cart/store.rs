//! CartStore -- the authoritative local mirror of the remote cart.
//!
//! The store serializes mutation intents (one in-flight remote mutation
//! at a time, FIFO) and reconciles every response against the local
//! snapshot. A failed call never clobbers the last-known-good snapshot:
//! stale-but-visible data beats a blank screen.

use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use turista_types::cart::{AddToCartRequest, Cart};
use turista_types::error::ClientError;

use crate::lock_state;

use super::api::CartApi;

#[derive(Default)]
struct CartState {
    snapshot: Option<Cart>,
    /// Bumped by [`CartStore::invalidate`]; a response issued under an
    /// older generation is never applied.
    generation: u64,
}

/// Owns the local cart mirror and the mutation queue.
///
/// All methods take `&self`; mutations are serialized internally through
/// a fair async lock, so a second intent issued while one is pending
/// queues behind it instead of interleaving.
pub struct CartStore<A: CartApi> {
    api: A,
    /// tokio's Mutex queues waiters fairly, which gives the FIFO
    /// ordering guarantee for concurrent mutation intents.
    serial: tokio::sync::Mutex<()>,
    state: Mutex<CartState>,
}

impl<A: CartApi> CartStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            serial: tokio::sync::Mutex::new(()),
            state: Mutex::new(CartState::default()),
        }
    }

    /// The last-known-good snapshot, if any load has succeeded yet.
    /// Remains readable after a failed operation.
    pub fn snapshot(&self) -> Option<Cart> {
        lock_state(&self.state).snapshot.clone()
    }

    /// Drop interest in any in-flight responses (e.g. the owning screen
    /// was dismissed). Results of already-issued calls are discarded.
    pub fn invalidate(&self) {
        let mut state = lock_state(&self.state);
        state.generation += 1;
        debug!(generation = state.generation, "cart store invalidated");
    }

    fn current_generation(&self) -> u64 {
        lock_state(&self.state).generation
    }

    /// Verify and adopt a server snapshot, unless the store was
    /// invalidated after the call was issued.
    fn adopt(&self, issued: u64, cart: Cart) -> Result<Cart, ClientError> {
        cart.check_integrity().map_err(|violation| {
            warn!(%violation, "rejecting cart snapshot");
            violation
        })?;
        let mut state = lock_state(&self.state);
        if state.generation == issued {
            state.snapshot = Some(cart.clone());
        } else {
            debug!(cart_id = cart.id, "dropping cart response issued before invalidation");
        }
        Ok(cart)
    }

    /// Fetch the current cart and replace the local snapshot.
    ///
    /// On failure the previous snapshot is retained alongside the error.
    pub async fn load(&self) -> Result<Cart, ClientError> {
        let _serial = self.serial.lock().await;
        let issued = self.current_generation();
        let cart = self.api.fetch_cart().await?;
        self.adopt(issued, cart)
    }

    /// Add a service to the cart. Not applied optimistically: the server
    /// computes price and subtotal, so the local mirror only changes
    /// once the recomputed cart comes back.
    pub async fn add(
        &self,
        servicio_id: i64,
        cantidad: u32,
        fecha_servicio: NaiveDate,
        notas_especiales: Option<String>,
    ) -> Result<Cart, ClientError> {
        if cantidad < 1 {
            return Err(ClientError::Validation(
                "cantidad must be at least 1".to_string(),
            ));
        }
        let request = AddToCartRequest {
            servicio_id,
            cantidad,
            fecha_servicio,
            notas_especiales,
        };
        let _serial = self.serial.lock().await;
        let issued = self.current_generation();
        let cart = self.api.add_item(&request).await?;
        info!(servicio_id, cantidad, "added service to cart");
        self.adopt(issued, cart)
    }

    /// Set the quantity of a line item.
    ///
    /// Quantities below one are a silent local no-op: decrement-to-zero
    /// is modeled as explicit removal, never auto-delete, so a line item
    /// cannot disappear by accident.
    pub async fn update_quantity(&self, item_id: i64, cantidad: u32) -> Result<Cart, ClientError> {
        if cantidad < 1 {
            debug!(item_id, cantidad, "ignoring quantity below 1");
            return lock_state(&self.state).snapshot.clone().ok_or_else(no_cart);
        }
        let _serial = self.serial.lock().await;
        let issued = self.current_generation();
        let cart = self.api.update_item(item_id, cantidad).await?;
        self.adopt(issued, cart)
    }

    /// Remove a line item. Removing an item that is not in the local
    /// snapshot is a no-op, not an error.
    pub async fn remove(&self, item_id: i64) -> Result<Cart, ClientError> {
        let _serial = self.serial.lock().await;
        {
            let state = lock_state(&self.state);
            if let Some(snapshot) = &state.snapshot {
                if snapshot.item(item_id).is_none() {
                    debug!(item_id, "item not in cart, nothing to remove");
                    return Ok(snapshot.clone());
                }
            }
        }
        let issued = self.current_generation();
        let cart = self.api.remove_item(item_id).await?;
        self.adopt(issued, cart)
    }

    /// Empty the cart on the server and mirror that locally.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let _serial = self.serial.lock().await;
        let issued = self.current_generation();
        self.api.clear().await?;
        let mut state = lock_state(&self.state);
        if state.generation == issued {
            if let Some(snapshot) = &mut state.snapshot {
                empty_in_place(snapshot);
            }
        }
        info!("cart cleared");
        Ok(())
    }

    /// Mirror a server-side cart wipe (e.g. after checkout converted the
    /// cart into a reservation) without a remote call.
    pub fn apply_cleared(&self) {
        let mut state = lock_state(&self.state);
        if let Some(snapshot) = &mut state.snapshot {
            empty_in_place(snapshot);
        }
    }

    /// Item count for a badge. Does not touch the snapshot.
    pub async fn count(&self) -> Result<u32, ClientError> {
        self.api.count_items().await
    }
}

fn empty_in_place(cart: &mut Cart) {
    cart.items.clear();
    cart.total_carrito = 0.0;
    cart.total_items = 0;
}

fn no_cart() -> ClientError {
    ClientError::Validation("no cart loaded".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_cart, test_cart_item};

    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use tokio::sync::Notify;
    use turista_types::error::ContractViolation;

    /// In-memory CartApi over a mutable cart, with switches for failure
    /// injection and an optional gate to control call timing.
    struct FakeCartApi {
        cart: Mutex<Cart>,
        fail_next: Mutex<Option<ClientError>>,
        calls: AtomicU32,
        gate: Option<Arc<Notify>>,
    }

    impl Default for FakeCartApi {
        fn default() -> Self {
            Self::with_cart(test_cart(Vec::new()))
        }
    }

    impl FakeCartApi {
        fn with_cart(cart: Cart) -> Self {
            Self {
                cart: Mutex::new(cart),
                fail_next: Mutex::new(None),
                calls: AtomicU32::new(0),
                gate: None,
            }
        }

        fn fail_next(&self, error: ClientError) {
            *self.fail_next.lock().unwrap() = Some(error);
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }

        async fn roundtrip(&self) -> Result<(), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.fail_next.lock().unwrap().take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        fn recompute(cart: &mut Cart) {
            cart.total_carrito = cart.items.iter().map(|i| i.subtotal).sum();
            cart.total_items = cart.items.iter().map(|i| i.cantidad).sum();
        }
    }

    impl CartApi for FakeCartApi {
        async fn fetch_cart(&self) -> Result<Cart, ClientError> {
            self.roundtrip().await?;
            Ok(self.cart.lock().unwrap().clone())
        }

        async fn add_item(&self, request: &AddToCartRequest) -> Result<Cart, ClientError> {
            self.roundtrip().await?;
            let mut cart = self.cart.lock().unwrap();
            let next_id = cart.items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
            let mut item = test_cart_item(next_id, request.cantidad, 25.0);
            item.fecha_servicio = request.fecha_servicio;
            cart.items.push(item);
            Self::recompute(&mut cart);
            Ok(cart.clone())
        }

        async fn update_item(&self, item_id: i64, cantidad: u32) -> Result<Cart, ClientError> {
            self.roundtrip().await?;
            let mut cart = self.cart.lock().unwrap();
            if let Some(item) = cart.items.iter_mut().find(|i| i.id == item_id) {
                item.cantidad = cantidad;
                item.subtotal = f64::from(cantidad) * item.precio_unitario;
            }
            Self::recompute(&mut cart);
            Ok(cart.clone())
        }

        async fn remove_item(&self, item_id: i64) -> Result<Cart, ClientError> {
            self.roundtrip().await?;
            let mut cart = self.cart.lock().unwrap();
            cart.items.retain(|i| i.id != item_id);
            Self::recompute(&mut cart);
            Ok(cart.clone())
        }

        async fn clear(&self) -> Result<(), ClientError> {
            self.roundtrip().await?;
            let mut cart = self.cart.lock().unwrap();
            cart.items.clear();
            Self::recompute(&mut cart);
            Ok(())
        }

        async fn count_items(&self) -> Result<u32, ClientError> {
            self.roundtrip().await?;
            Ok(self.cart.lock().unwrap().total_items)
        }
    }

    fn transport_error() -> ClientError {
        ClientError::Transport("connection refused".to_string())
    }

    #[tokio::test]
    async fn test_load_replaces_snapshot() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0), test_cart_item(2, 1, 30.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));

        assert!(store.snapshot().is_none());
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.total_items, 3);
        assert_eq!(store.snapshot().unwrap().total_carrito, 130.0);
    }

    #[tokio::test]
    async fn test_load_failure_retains_previous_snapshot() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();

        store.api.fail_next(transport_error());
        let error = store.load().await.unwrap_err();
        assert!(matches!(error, ClientError::Transport(_)));
        // Stale-but-visible beats a blank screen.
        assert_eq!(store.snapshot().unwrap().total_items, 2);
    }

    #[tokio::test]
    async fn test_remove_updates_totals() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0), test_cart_item(2, 1, 30.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();

        let updated = store.remove(2).await.unwrap();
        assert_eq!(updated.total_carrito, 100.0);
        assert_eq!(updated.total_items, 2);
    }

    #[tokio::test]
    async fn test_remove_absent_item_is_noop() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();
        let calls_after_load = store.api.calls();

        let snapshot = store.remove(99).await.unwrap();
        assert_eq!(snapshot.total_items, 2);
        // No remote call was issued.
        assert_eq!(store.api.calls(), calls_after_load);

        // Removing twice: second call is also a no-op, not an error.
        store.remove(1).await.unwrap();
        let again = store.remove(1).await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_update_quantity_zero_is_silent_noop() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();
        let calls_after_load = store.api.calls();

        let snapshot = store.update_quantity(1, 0).await.unwrap();
        // The item is still there -- only explicit remove deletes it.
        assert!(snapshot.item(1).is_some());
        assert_eq!(snapshot.total_items, 2);
        assert_eq!(store.api.calls(), calls_after_load);
    }

    #[tokio::test]
    async fn test_update_quantity_roundtrips() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();

        let updated = store.update_quantity(1, 5).await.unwrap();
        assert_eq!(updated.item(1).unwrap().cantidad, 5);
        assert_eq!(updated.total_carrito, 250.0);
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity_locally() {
        let store = CartStore::new(FakeCartApi::default());
        let date = NaiveDate::from_ymd_opt(2026, 9, 15).unwrap();
        let error = store.add(7, 0, date, None).await.unwrap_err();
        assert!(matches!(error, ClientError::Validation(_)));
        assert_eq!(store.api.calls(), 0);
    }

    #[tokio::test]
    async fn test_clear_empties_local_mirror() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();

        store.clear().await.unwrap();
        let snapshot = store.snapshot().unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_carrito, 0.0);
    }

    #[tokio::test]
    async fn test_contract_violation_rejected_snapshot_kept() {
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let store = CartStore::new(FakeCartApi::with_cart(cart));
        store.load().await.unwrap();

        // Corrupt the server-side totals.
        store.api.cart.lock().unwrap().total_carrito = 999.0;
        let error = store.load().await.unwrap_err();
        assert!(matches!(
            error,
            ClientError::Contract(ContractViolation::CartTotal { .. })
        ));
        assert_eq!(store.snapshot().unwrap().total_carrito, 100.0);
    }

    #[tokio::test]
    async fn test_mutations_are_serialized_fifo() {
        let cart = test_cart(vec![test_cart_item(1, 1, 10.0)]);
        let store = Arc::new(CartStore::new(FakeCartApi::with_cart(cart)));
        store.load().await.unwrap();

        let a = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.update_quantity(1, 2).await })
        };
        let b = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.update_quantity(1, 3).await })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // Both mutations completed without interleaving; the snapshot is
        // one of the serialized outcomes, internally consistent.
        let snapshot = store.snapshot().unwrap();
        snapshot.check_integrity().unwrap();
        assert!(snapshot.item(1).unwrap().cantidad == 2 || snapshot.item(1).unwrap().cantidad == 3);
    }

    #[tokio::test]
    async fn test_invalidated_store_discards_stale_response() {
        let gate = Arc::new(Notify::new());
        let cart = test_cart(vec![test_cart_item(1, 2, 50.0)]);
        let api = FakeCartApi {
            cart: Mutex::new(cart),
            gate: Some(Arc::clone(&gate)),
            ..Default::default()
        };
        let store = Arc::new(CartStore::new(api));

        let pending = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.load().await })
        };
        // Let the load reach the gate, then dismiss the screen.
        tokio::task::yield_now().await;
        store.invalidate();
        gate.notify_one();

        let result = pending.await.unwrap();
        assert!(result.is_ok());
        // The fetched cart was returned to the (gone) caller but never
        // applied to the store.
        assert!(store.snapshot().is_none());
    }
}
