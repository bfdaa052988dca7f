//! Medicines resource endpoints.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, Paged, client::HttpApi};

/// A catalog snapshot of one medicine.
///
/// Owned by the backend; snapshots go stale immediately after any mutation
/// elsewhere and callers must re-fetch rather than reconcile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    /// Backend id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-text description, when set.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning category id.
    pub category_id: i64,
    /// Units in stock at snapshot time.
    pub stock_quantity: u32,
    /// Unit price.
    pub price: Decimal,
    /// Expiry date as the backend serialises it (.NET `DateTime`, no
    /// offset); kept opaque because the client only displays it.
    pub expiry_date: String,
}

/// Payload for creating or replacing a medicine.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicine {
    /// Display name.
    pub name: String,
    /// Owning category id.
    pub category_id: i64,
    /// Unit price.
    pub price: Decimal,
    /// Initial stock.
    pub stock_quantity: u32,
    /// Expiry date (ISO string).
    pub expiry_date: String,
    /// Free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Query parameters for the paged medicines listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicineQuery {
    /// 1-based page index.
    pub page_number: u32,
    /// Records per page.
    pub page_size: u32,
    /// Name search term.
    pub search_term: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<i64>,
    /// Backend-defined filter, e.g. `expired` or `lowstock`.
    pub filter: Option<String>,
}

impl Default for MedicineQuery {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: 10,
            search_term: None,
            category_id: None,
            filter: None,
        }
    }
}

impl MedicineQuery {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("pageNumber", self.page_number.to_string()),
            ("pageSize", self.page_size.to_string()),
        ];

        if let Some(term) = self.search_term.as_deref()
            && !term.is_empty()
        {
            params.push(("searchTerm", term.to_string()));
        }

        if let Some(category_id) = self.category_id {
            params.push(("categoryId", category_id.to_string()));
        }

        if let Some(filter) = self.filter.as_deref() {
            params.push(("filter", filter.to_string()));
        }

        params
    }
}

// The backend subtracts the submitted quantity from stock, so increasing
// stock means sending a negative number. The inversion lives here and
// nowhere else.
#[derive(Debug, Serialize)]
struct StockAdjustment {
    quantity: i64,
}

fn restock_payload(amount: u32) -> StockAdjustment {
    StockAdjustment {
        quantity: -i64::from(amount),
    }
}

/// `/Medicines` endpoints.
#[automock]
#[async_trait]
pub trait MedicinesService: Send + Sync {
    /// Fetch one page of the catalog.
    async fn list_medicines(&self, query: &MedicineQuery) -> Result<Paged<Medicine>, ApiError>;

    /// Create a medicine.
    async fn create_medicine(&self, medicine: &NewMedicine) -> Result<(), ApiError>;

    /// Replace a medicine.
    async fn update_medicine(&self, id: i64, medicine: &NewMedicine) -> Result<(), ApiError>;

    /// Delete a medicine.
    async fn delete_medicine(&self, id: i64) -> Result<(), ApiError>;

    /// Add `amount` units of stock.
    async fn restock(&self, id: i64, amount: u32) -> Result<(), ApiError>;
}

/// HTTP implementation of [`MedicinesService`].
#[derive(Debug, Clone)]
pub struct HttpMedicinesService {
    api: HttpApi,
}

impl HttpMedicinesService {
    /// Create a service over the shared HTTP core.
    #[must_use]
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl MedicinesService for HttpMedicinesService {
    async fn list_medicines(&self, query: &MedicineQuery) -> Result<Paged<Medicine>, ApiError> {
        self.api.get_json("/Medicines", &query.to_params()).await
    }

    async fn create_medicine(&self, medicine: &NewMedicine) -> Result<(), ApiError> {
        self.api.post_unit("/Medicines", medicine).await
    }

    async fn update_medicine(&self, id: i64, medicine: &NewMedicine) -> Result<(), ApiError> {
        self.api.put_unit(&format!("/Medicines/{id}"), medicine).await
    }

    async fn delete_medicine(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/Medicines/{id}")).await
    }

    async fn restock(&self, id: i64, amount: u32) -> Result<(), ApiError> {
        if amount == 0 {
            return Err(ApiError::InvalidRequest("restock amount must be at least 1"));
        }

        self.api
            .patch_unit(&format!("/Medicines/{id}/stock"), &restock_payload(amount))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restock_payload_negates_the_amount() {
        let payload = restock_payload(50);

        assert_eq!(payload.quantity, -50);

        let json = serde_json::to_string(&payload).expect("payload should serialize");
        assert_eq!(json, r#"{"quantity":-50}"#);
    }

    #[test]
    fn query_params_include_only_set_filters() {
        let query = MedicineQuery {
            page_number: 2,
            page_size: 20,
            search_term: Some("para".to_string()),
            category_id: None,
            filter: None,
        };

        assert_eq!(
            query.to_params(),
            vec![
                ("pageNumber", "2".to_string()),
                ("pageSize", "20".to_string()),
                ("searchTerm", "para".to_string()),
            ]
        );
    }

    #[test]
    fn empty_search_term_is_omitted() {
        let query = MedicineQuery {
            search_term: Some(String::new()),
            ..MedicineQuery::default()
        };

        assert!(
            query
                .to_params()
                .iter()
                .all(|(name, _)| *name != "searchTerm"),
            "empty search term must not be sent"
        );
    }

    #[test]
    fn medicine_deserializes_from_backend_shape() {
        let medicine: Medicine = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Paracetamol 500mg",
                "categoryId": 1,
                "stockQuantity": 120,
                "price": 5.0,
                "expiryDate": "2027-03-01T00:00:00"
            }"#,
        )
        .expect("medicine should parse");

        assert_eq!(medicine.id, 3);
        assert_eq!(medicine.description, None);
        assert_eq!(medicine.price, Decimal::new(500, 2));
        assert_eq!(medicine.stock_quantity, 120);
    }
}
