//! Typed client for the PharmaLink REST backend.
//!
//! Each backend resource gets a small service trait (mockable at the seam)
//! with an HTTP implementation layered over the shared [`client::HttpApi`]
//! core. The backend contract is external; these modules only encode it.

use serde::Deserialize;
use thiserror::Error;

pub mod auth;
pub mod categories;
pub mod client;
pub mod dashboard;
pub mod medicines;
pub mod sales;

/// Errors surfaced by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection, TLS, serialization).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered 401; the persisted credential has been cleared
    /// and the operator must sign in again.
    #[error("session expired; sign in again")]
    SessionExpired,

    /// The backend rejected the request with a non-2xx status.
    #[error("backend rejected the request ({status}): {detail}", detail = message.as_deref().unwrap_or("no details"))]
    Backend {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, when present.
        message: Option<String>,
    },

    /// The request was rejected client-side before dispatch.
    #[error("invalid request: {0}")]
    InvalidRequest(&'static str),
}

impl ApiError {
    /// The backend-provided error message, if this is a backend rejection
    /// that carried one.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

/// Pagination metadata echoed by paged endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total records matching the query.
    pub total_count: u64,
    /// Records per page.
    pub page_size: u32,
    /// 1-based page index of this response.
    pub current_page: u32,
    /// Total number of pages.
    pub total_pages: u32,
}

/// A page of records plus its pagination envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Paged<T> {
    /// Pagination metadata.
    pub meta: PageMeta,
    /// Records on this page.
    pub data: Vec<T>,
}
