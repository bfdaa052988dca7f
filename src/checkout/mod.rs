//! Checkout
//!
//! Turns a cart into a persisted sale and a printable receipt. The backend
//! is the sole arbiter of stock and atomicity; on rejection the cart is
//! left intact so the operator can adjust and retry. Voiding a sale is an
//! administrative reversal and is role-gated here before any request is
//! made.

use std::sync::Arc;

use jiff::civil::DateTime;
use thiserror::Error;

use crate::{
    api::{
        ApiError,
        sales::{SaleItemRequest, SalesService},
    },
    cart::Cart,
    receipt::Receipt,
    session::Role,
};

/// Fallback operator message when a checkout rejection carries no detail.
const CHECKOUT_FALLBACK: &str = "Checkout failed";

/// Fallback operator message when a void rejection carries no detail.
const VOID_FALLBACK: &str = "Void failed";

/// Errors surfaced while finalising or reversing a sale.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to sell.
    #[error("cart is empty")]
    EmptyCart,

    /// Voiding requires the administrator role.
    #[error("voiding a sale requires an administrator")]
    RequiresAdmin,

    /// The backend rejected the operation; the message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// Transport or session failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Map a backend rejection to an operator-facing error: the backend's
/// message verbatim when present, `fallback` otherwise. Other failures
/// pass through.
fn rejection(error: ApiError, fallback: &str) -> CheckoutError {
    match error.backend_message() {
        Some(message) => CheckoutError::Rejected(message.to_string()),
        None => match error {
            ApiError::Backend { .. } => CheckoutError::Rejected(fallback.to_string()),
            other => CheckoutError::Api(other),
        },
    }
}

/// Finalises and reverses sales against the backend.
pub struct CheckoutService {
    sales: Arc<dyn SalesService>,
}

impl std::fmt::Debug for CheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutService").finish_non_exhaustive()
    }
}

impl CheckoutService {
    /// Create a service over the sales endpoints.
    #[must_use]
    pub fn new(sales: Arc<dyn SalesService>) -> Self {
        Self { sales }
    }

    /// Submit the cart as one sale and synthesise its receipt from the
    /// cart state, not the response body.
    ///
    /// The cart is borrowed, not consumed: clearing it after a successful
    /// checkout is the caller's decision.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] without touching the backend
    /// when the cart has no lines, [`CheckoutError::Rejected`] when the
    /// backend declines the sale, or [`CheckoutError::Api`] on transport
    /// and session failures.
    pub async fn checkout(
        &self,
        cart: &Cart,
        issued_at: DateTime,
        cashier: &str,
    ) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let items: Vec<SaleItemRequest> = cart
            .iter()
            .map(|line| SaleItemRequest {
                medicine_id: line.item().id,
                quantity: line.quantity(),
            })
            .collect();

        let sale = self
            .sales
            .create_sale(&items)
            .await
            .map_err(|error| rejection(error, CHECKOUT_FALLBACK))?;

        tracing::info!(sale_id = sale.id, total = %cart.total(), "sale completed");

        Ok(Receipt::from_cart(cart, sale.id, issued_at, cashier))
    }

    /// Reverse a completed sale. Only administrators may void; the check
    /// happens before any request is made.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::RequiresAdmin`] for non-administrators,
    /// [`CheckoutError::Rejected`] when the backend declines, or
    /// [`CheckoutError::Api`] on transport and session failures.
    pub async fn void_sale(&self, sale_id: i64, role: Role) -> Result<(), CheckoutError> {
        if role != Role::Admin {
            return Err(CheckoutError::RequiresAdmin);
        }

        self.sales
            .void_sale(sale_id)
            .await
            .map_err(|error| rejection(error, VOID_FALLBACK))?;

        tracing::info!(sale_id, "sale voided");

        Ok(())
    }
}
