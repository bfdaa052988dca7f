//! Auth and staff-account endpoints.

use async_trait::async_trait;
use mockall::automock;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiError, client::HttpApi},
    session::Role,
};

/// Staff account as listed by the backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Numeric user id.
    pub id: i64,
    /// Contact email, when set.
    #[serde(default)]
    pub email: Option<String>,
    /// Login name.
    pub user_name: String,
    /// Role name as the backend spells it.
    pub role: String,
}

/// Registration payload for a new staff account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Login name.
    pub user_name: String,
    /// Initial password.
    pub password: String,
    /// Assigned role.
    pub role: Role,
}

/// Partial update for an existing account or the caller's own profile.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New login name, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// New password, when changing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// `/Auth` and `/Users` endpoints.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError>;

    /// The account behind the current credential.
    async fn me(&self) -> Result<UserRecord, ApiError>;

    /// Update the caller's own profile.
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError>;

    /// List all staff accounts.
    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError>;

    /// Register a new staff account.
    async fn register_user(&self, user: &NewUser) -> Result<(), ApiError>;

    /// Update an existing staff account.
    async fn update_user(&self, id: i64, update: &ProfileUpdate) -> Result<(), ApiError>;

    /// Delete a staff account.
    async fn delete_user(&self, id: i64) -> Result<(), ApiError>;

    /// Upload a profile photo (multipart).
    async fn upload_photo(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), ApiError>;
}

/// HTTP implementation of [`AuthService`].
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    api: HttpApi,
}

impl HttpAuthService {
    /// Create a service over the shared HTTP core.
    #[must_use]
    pub fn new(api: HttpApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, username: &str, password: &str) -> Result<String, ApiError> {
        let response: LoginResponse = self
            .api
            .post_json("/Auth/login", &LoginRequest { username, password })
            .await?;

        Ok(response.token)
    }

    async fn me(&self) -> Result<UserRecord, ApiError> {
        self.api.get_json("/Auth/me", &[]).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.api.put_unit("/Auth/update", update).await
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, ApiError> {
        self.api.get_json("/Auth/Users", &[]).await
    }

    async fn register_user(&self, user: &NewUser) -> Result<(), ApiError> {
        self.api.post_unit("/Auth/register", user).await
    }

    async fn update_user(&self, id: i64, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.api.put_unit(&format!("/Auth/Users/{id}"), update).await
    }

    async fn delete_user(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete(&format!("/Auth/Users/{id}")).await
    }

    async fn upload_photo(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), ApiError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        self.api.post_multipart("/Users/upload-photo", form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_serializes_role_as_backend_string() {
        let user = NewUser {
            user_name: "newbie".to_string(),
            password: "secret".to_string(),
            role: Role::Pharmacist,
        };

        let json = serde_json::to_value(&user).expect("user should serialize");

        assert_eq!(json["userName"], "newbie");
        assert_eq!(json["role"], "Pharmacist");
    }

    #[test]
    fn profile_update_omits_unset_fields() {
        let update = ProfileUpdate {
            user_name: Some("renamed".to_string()),
            password: None,
        };

        let json = serde_json::to_string(&update).expect("update should serialize");

        assert_eq!(json, r#"{"userName":"renamed"}"#);
    }

    #[test]
    fn user_record_tolerates_missing_email() {
        let record: UserRecord = serde_json::from_str(
            r#"{"id":1,"userName":"alice","role":"Admin"}"#,
        )
        .expect("record should parse");

        assert_eq!(record.email, None);
        assert_eq!(record.user_name, "alice");
    }
}
