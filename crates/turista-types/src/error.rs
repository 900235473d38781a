use thiserror::Error;

/// A response-level invariant violation.
///
/// The remote service computes totals and subtotals; a snapshot whose
/// numbers do not add up is a broken contract, not data to render.
/// Stores treat these as unrecoverable for that response and keep the
/// previous snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("cart total mismatch: reported {reported}, computed {computed}")]
    CartTotal { reported: f64, computed: f64 },

    #[error("cart item count mismatch: reported {reported}, computed {computed}")]
    CartItemCount { reported: u32, computed: u32 },

    #[error("item {item_id} subtotal mismatch: reported {reported}, computed {computed}")]
    ItemSubtotal {
        item_id: i64,
        reported: f64,
        computed: f64,
    },

    #[error(
        "reservation {code} amount mismatch: final {monto_final}, total {monto_total}, discount {monto_descuento}"
    )]
    ReservationAmount {
        code: String,
        monto_final: f64,
        monto_total: f64,
        monto_descuento: f64,
    },

    /// A 2xx response whose body did not decode into the expected shape.
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

/// Error taxonomy for every remote-backed operation.
///
/// Store operations never panic past their public boundary: they resolve
/// to either an updated snapshot or one of these variants, with the
/// last-known-good snapshot still readable on the store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// No connectivity or timeout. Local state is retained; the caller
    /// decides when to retry.
    #[error("network error: {0}")]
    Transport(String),

    /// Unexpected HTTP status from the service, surfaced verbatim.
    #[error("unexpected status {status}: {message}")]
    Protocol { status: u16, message: String },

    /// Rejected before any remote call (blank cancel reason, quantity
    /// below one, send on a closed conversation, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// The server (or a local precondition check) refused a state
    /// transition because the current state disallows it. Prompts a
    /// reload rather than an automatic retry.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A structural or monetary invariant was violated on a response.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

impl ClientError {
    /// Whether this error indicates the local view is out of date and a
    /// reload should be offered.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict(_))
    }
}
