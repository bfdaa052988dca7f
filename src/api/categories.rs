//! Categories resource endpoints.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, client::HttpApi};

/// A medicine category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend id.
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// Payload for creating or renaming a category.
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
}

/// Backend acknowledgement of a created category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreated {
    /// Id of the new category.
    pub id: i64,
    /// Optional confirmation message.
    #[serde(default)]
    pub message: Option<String>,
}

/// `/Categories` endpoints.
#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// List all categories.
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Create a category.
    async fn create_category(&self, category: &NewCategory) -> Result<CategoryCreated, ApiError>;

    /// Rename a category.
    async fn update_category(&self, id: i64, category: &NewCategory) -> Result<(), ApiError>;

    /// Delete a category. Fails when medicines still reference it; the
    /// backend message explains the conflict.
    async fn delete_category(&self, id: i64) -> Result<(), ApiError>;
}

/// HTTP implementation of [`CategoriesService`].
#[derive(Debug, Clone)]
pub struct HttpCategoriesService {
    api: HttpApi,
}

impl HttpCategoriesService {
    /// Create a service over the shared HTTP core.
    #[must_use]
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CategoriesService for HttpCategoriesService {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.api.get_json("/Categories", &[]).await
    }

    async fn create_category(&self, category: &NewCategory) -> Result<CategoryCreated, ApiError> {
        self.api.post_json("/Categories", category).await
    }

    async fn update_category(&self, id: i64, category: &NewCategory) -> Result<(), ApiError> {
        self.api.put_unit(&format!("/Categories/{id}"), category).await
    }

    async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/Categories/{id}")).await
    }
}
