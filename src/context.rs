//! Application context.
//!
//! Wires the concrete HTTP services and the on-disk credential store
//! behind their trait objects so commands depend only on the traits and
//! tests can swap in mocks.

use std::{fmt, sync::Arc};

use crate::{
    api::{
        auth::{AuthService, HttpAuthService},
        categories::{CategoriesService, HttpCategoriesService},
        client::{ApiConfig, HttpApi},
        dashboard::{DashboardService, HttpDashboardService},
        medicines::{HttpMedicinesService, MedicinesService},
        sales::{HttpSalesService, SalesService},
    },
    config::ClientConfig,
    session::storage::{CredentialStore, FileCredentialStore},
};

/// Shared handles to every backend service and the credential store.
#[derive(Clone)]
pub struct AppContext {
    /// `/Auth` and `/Users` endpoints.
    pub auth: Arc<dyn AuthService>,
    /// `/Medicines` endpoints.
    pub medicines: Arc<dyn MedicinesService>,
    /// `/Categories` endpoints.
    pub categories: Arc<dyn CategoriesService>,
    /// `/Sales` endpoints.
    pub sales: Arc<dyn SalesService>,
    /// `/Dashboard` endpoints.
    pub dashboard: Arc<dyn DashboardService>,
    /// Persisted session token.
    pub credentials: Arc<dyn CredentialStore>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the live wiring from configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(config.credential_path.clone()));

        let api = HttpApi::new(
            ApiConfig {
                base_url: config.api_url.clone(),
            },
            Arc::clone(&credentials),
        );

        Self {
            auth: Arc::new(HttpAuthService::new(api.clone())),
            medicines: Arc::new(HttpMedicinesService::new(api.clone())),
            categories: Arc::new(HttpCategoriesService::new(api.clone())),
            sales: Arc::new(HttpSalesService::new(api.clone())),
            dashboard: Arc::new(HttpDashboardService::new(api)),
            credentials,
        }
    }
}
