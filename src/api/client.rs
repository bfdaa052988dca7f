//! Shared HTTP core for the backend client.
//!
//! Every request is stamped with the persisted bearer credential, and every
//! 401 response clears that credential before surfacing
//! [`ApiError::SessionExpired`], so an expired session is handled in one
//! place rather than per call site.

use std::{fmt, sync::Arc};

use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart::Form};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{api::ApiError, session::storage::CredentialStore};

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, e.g. `http://localhost:5297/api`.
    pub base_url: String,
}

/// HTTP client for the PharmaLink backend.
#[derive(Clone)]
pub struct HttpApi {
    config: ApiConfig,
    credentials: Arc<dyn CredentialStore>,
    http: Client,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            credentials,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = match self.credentials.load() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(error) => {
                warn!(%error, "failed to read credential; sending unauthenticated request");
                request
            }
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            debug!("backend answered 401; clearing persisted credential");

            if let Err(error) = self.credentials.clear() {
                warn!(%error, "failed to clear persisted credential");
            }

            return Err(ApiError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(ApiError::Backend {
                status: status.as_u16(),
                message: extract_message(&body),
            });
        }

        Ok(response)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self
            .dispatch(self.http.get(self.url(path)).query(query))
            .await?;

        Ok(response.json().await?)
    }

    pub(crate) async fn post_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .dispatch(self.http.post(self.url(path)).json(body))
            .await?;

        Ok(response.json().await?)
    }

    pub(crate) async fn post_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.dispatch(self.http.post(self.url(path)).json(body))
            .await?;

        Ok(())
    }

    pub(crate) async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(self.http.post(self.url(path))).await?;

        Ok(())
    }

    pub(crate) async fn post_multipart(&self, path: &str, form: Form) -> Result<(), ApiError> {
        self.dispatch(self.http.post(self.url(path)).multipart(form))
            .await?;

        Ok(())
    }

    pub(crate) async fn put_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.dispatch(self.http.put(self.url(path)).json(body))
            .await?;

        Ok(())
    }

    pub(crate) async fn patch_unit<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.dispatch(self.http.patch(self.url(path)).json(body))
            .await?;

        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.dispatch(self.http.delete(self.url(path))).await?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_message_reads_backend_error_body() {
        assert_eq!(
            extract_message(r#"{"message":"Duplicate medicine name"}"#),
            Some("Duplicate medicine name".to_string())
        );
    }

    #[test]
    fn extract_message_tolerates_non_json_bodies() {
        assert_eq!(extract_message("Internal Server Error"), None);
        assert_eq!(extract_message(""), None);
        assert_eq!(extract_message(r#"{"error":"other shape"}"#), None);
    }

    #[test]
    fn debug_output_shows_config_and_elides_the_rest() {
        let api = HttpApi::new(
            ApiConfig {
                base_url: "http://localhost:5297/api".to_string(),
            },
            Arc::new(crate::session::storage::MockCredentialStore::new()),
        );

        let debug = format!("{api:?}");

        assert!(debug.contains("HttpApi"), "type name");
        assert!(debug.contains("http://localhost:5297/api"), "config is shown");
        assert!(debug.contains(".."), "remaining fields are elided");
    }

    #[test]
    fn url_joins_without_doubling_slashes() {
        let api = HttpApi::new(
            ApiConfig {
                base_url: "http://localhost:5297/api/".to_string(),
            },
            Arc::new(crate::session::storage::MockCredentialStore::new()),
        );

        assert_eq!(api.url("/Medicines"), "http://localhost:5297/api/Medicines");
    }
}
