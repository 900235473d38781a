//! Stores and synchronization logic for the Turista marketplace client.
//!
//! Each store owns the authoritative local mirror of one remote-backed
//! domain: [`cart::CartStore`] for the shopping cart,
//! [`reservation::ReservationWorkflow`] for the booking lifecycle,
//! [`chat::ChatSession`] for one conversation's timeline, and
//! [`chat::ConversationDirectory`] for the conversation list.
//!
//! Stores are generic over the API traits defined next to them
//! (`CartApi`, `ReservationApi`, `ChatApi`); the reqwest implementation
//! lives in `turista-client`, and tests swap in in-memory fakes.
//! Every public operation resolves to an updated snapshot or a typed
//! [`turista_types::error::ClientError`] -- never a panic -- and the
//! last-known-good snapshot stays readable on the store after a failure.

pub mod cart;
pub mod chat;
pub mod reservation;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a state mutex, recovering the guard if a previous holder
/// panicked. Store state is always left consistent between operations,
/// so a poisoned lock carries no torn data.
pub(crate) fn lock_state<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
