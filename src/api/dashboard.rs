//! Dashboard statistics endpoint.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::{ApiError, client::HttpApi};

/// Aggregate figures for the dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Revenue taken today.
    pub total_revenue_today: Decimal,
    /// Number of sales today.
    pub total_sales_today: u64,
    /// Medicines below the low-stock threshold.
    pub low_stock_items: u64,
    /// Medicines expiring soon.
    pub expiring_soon_items: u64,
    /// Total medicines in the catalog.
    pub total_medicines: u64,
}

/// `/Dashboard` endpoints.
#[automock]
#[async_trait]
pub trait DashboardService: Send + Sync {
    /// Fetch today's aggregate figures.
    async fn stats(&self) -> Result<DashboardStats, ApiError>;
}

/// HTTP implementation of [`DashboardService`].
#[derive(Debug, Clone)]
pub struct HttpDashboardService {
    api: HttpApi,
}

impl HttpDashboardService {
    /// Create a service over the shared HTTP core.
    #[must_use]
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DashboardService for HttpDashboardService {
    async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.api.get_json("/Dashboard/stats", &[]).await
    }
}
