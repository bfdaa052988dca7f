//! Sales resource endpoints.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, Paged, client::HttpApi};

/// One line of a sale submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    /// Medicine to sell.
    pub medicine_id: i64,
    /// Units to sell.
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
struct CreateSaleRequest<'a> {
    items: &'a [SaleItemRequest],
}

/// One line of a persisted sale.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    /// Line id.
    pub id: i64,
    /// Item name. Present on sale-history records; the creation response
    /// may omit it, which is why receipts are synthesised from cart state.
    #[serde(default)]
    pub medicine_name: Option<String>,
    /// Units sold.
    pub quantity: u32,
    /// Price per unit at sale time.
    pub unit_price: Decimal,
    /// `unit_price * quantity`.
    pub sub_total: Decimal,
}

/// A persisted sale as returned by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    /// Sale id (doubles as the receipt number).
    pub id: i64,
    /// Cashier's user id.
    pub user_id: i64,
    /// Grand total.
    pub total_amount: Decimal,
    /// Transaction timestamp as the backend serialises it.
    pub transaction_date: String,
    /// Sold lines.
    pub items: Vec<SaleLine>,
}

/// Query parameters for the paged sales listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesQuery {
    /// 1-based page index.
    pub page_number: u32,
    /// Records per page.
    pub page_size: u32,
    /// Earliest transaction date to include.
    pub start_date: Option<Date>,
    /// Latest transaction date to include.
    pub end_date: Option<Date>,
}

impl Default for SalesQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
            start_date: None,
            end_date: None,
        }
    }
}

impl SalesQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        if let Some(start) = self.start_date {
            params.push(("startDate", start.to_string()));
        }

        if let Some(end) = self.end_date {
            params.push(("endDate", end.to_string()));
        }

        params
    }
}

/// `/Sales` endpoints.
#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Submit a sale. The backend is the sole arbiter of atomicity and
    /// stock deduction; the client never mutates stock optimistically.
    async fn create_sale(&self, items: &[SaleItemRequest]) -> Result<SaleRecord, ApiError>;

    /// Fetch one page of sales history.
    async fn list_sales(&self, query: &SalesQuery) -> Result<Paged<SaleRecord>, ApiError>;

    /// Void a sale, reversing the transaction and restoring its stock.
    /// Entirely backend-enforced.
    async fn void_sale(&self, id: i64) -> Result<(), ApiError>;
}

/// HTTP implementation of [`SalesService`].
#[derive(Debug, Clone)]
pub struct HttpSalesService {
    api: HttpApi,
}

impl HttpSalesService {
    /// Create a service over the shared HTTP core.
    #[must_use]
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SalesService for HttpSalesService {
    async fn create_sale(&self, items: &[SaleItemRequest]) -> Result<SaleRecord, ApiError> {
        self.api
            .post_json("/Sales", &CreateSaleRequest { items })
            .await
    }

    async fn list_sales(&self, query: &SalesQuery) -> Result<Paged<SaleRecord>, ApiError> {
        self.api.get_json("/Sales", &query.to_params()).await
    }

    async fn void_sale(&self, id: i64) -> Result<(), ApiError> {
        self.api.post_empty(&format!("/Sales/{id}/void")).await
    }
}
