//! PharmaLink
//!
//! Client for the PharmaLink pharmacy point-of-sale backend: session and
//! role handling, catalog browsing, a cart engine with stock ceilings,
//! checkout with client-synthesised receipts, and sales export.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod context;
pub mod receipt;
pub mod routes;
pub mod session;
