//! Session state and authentication.
//!
//! The session store is the only writer of the persisted credential and the
//! in-memory identity; every other component reads them. Login failures are
//! reported through [`LoginOutcome`] rather than an error type so the shell
//! never has to catch anything at this boundary.

use std::sync::Arc;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::{ApiError, auth::AuthService};

pub mod claims;
pub mod storage;

use storage::CredentialStore;

/// Staff role decoded from the access token.
///
/// `Admin` is a superset capability covering inventory, category and user
/// management; both roles share the dashboard, the POS terminal and sales
/// history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum Role {
    /// Full access, including inventory, categories and user management.
    Admin,
    /// Dispensing staff: dashboard, POS terminal and sales history.
    Pharmacist,
}

impl Role {
    /// Role name as the backend spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Pharmacist => "Pharmacist",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// Numeric user id (`uid` claim).
    pub id: i64,
    /// Display name resolved from the token's name claims.
    pub username: String,
    /// Decoded role.
    pub role: Role,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; the identity is now populated.
    Success,
    /// Credentials rejected or the backend was unreachable.
    Failure(String),
}

const GENERIC_LOGIN_FAILURE: &str = "Login failed";

/// Holds the authenticated identity and drives login/restore/logout.
pub struct SessionStore {
    credentials: Arc<dyn CredentialStore>,
    auth: Arc<dyn AuthService>,
    identity: Option<SessionIdentity>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty session backed by the given credential storage and
    /// auth endpoint.
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>, auth: Arc<dyn AuthService>) -> Self {
        Self {
            credentials,
            auth,
            identity: None,
        }
    }

    /// The current identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&SessionIdentity> {
        self.identity.as_ref()
    }

    /// Restore the identity from a persisted credential.
    ///
    /// A missing credential leaves the session empty. A credential that
    /// fails to decode (or has expired) is removed from storage and the
    /// session is left empty; this never surfaces an error to the shell.
    pub fn restore(&mut self, now: Timestamp) {
        let token = match self.credentials.load() {
            Ok(Some(token)) => token,
            Ok(None) => return,
            Err(error) => {
                warn!(%error, "failed to read persisted credential");
                return;
            }
        };

        match claims::decode_identity(&token, now) {
            Ok(identity) => {
                debug!(user = %identity.username, "session restored");
                self.identity = Some(identity);
            }
            Err(error) => {
                debug!(%error, "discarding unusable persisted credential");

                if let Err(error) = self.credentials.clear() {
                    warn!(%error, "failed to clear persisted credential");
                }
            }
        }
    }

    /// Authenticate against the backend.
    ///
    /// On success the returned token is persisted and decoded into the
    /// session identity. All failures are reported through the returned
    /// [`LoginOutcome`]; this method never panics or returns an error.
    pub async fn login(&mut self, username: &str, password: &str) -> LoginOutcome {
        let token = match self.auth.login(username, password).await {
            Ok(token) => token,
            Err(error) => {
                debug!(%error, "login rejected");
                return LoginOutcome::Failure(login_failure_message(&error));
            }
        };

        let identity = match claims::decode_identity(&token, Timestamp::now()) {
            Ok(identity) => identity,
            Err(error) => {
                warn!(%error, "backend returned an unusable access token");
                return LoginOutcome::Failure(GENERIC_LOGIN_FAILURE.to_string());
            }
        };

        if let Err(error) = self.credentials.save(&token) {
            // The session still works for this process; it just won't
            // survive a restart.
            warn!(%error, "failed to persist credential");
        }

        self.identity = Some(identity);

        LoginOutcome::Success
    }

    /// Clear the persisted credential and empty the identity. No backend
    /// call is made.
    pub fn logout(&mut self) {
        if let Err(error) = self.credentials.clear() {
            warn!(%error, "failed to clear persisted credential");
        }

        self.identity = None;
    }
}

fn login_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Backend {
            message: Some(message),
            ..
        } => message.clone(),
        _ => GENERIC_LOGIN_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use testresult::TestResult;

    use crate::api::auth::MockAuthService;

    use super::{storage::MockCredentialStore, *};

    fn fixture_token(uid: i64, username: &str, role: &str) -> String {
        let payload = format!(
            r#"{{"uid":"{uid}","role":"{role}","sub":"{username}","exp":4102444800}}"#
        );

        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn restore_with_no_credential_leaves_session_empty() {
        let mut credentials = MockCredentialStore::new();
        credentials.expect_load().return_once(|| Ok(None));

        let mut session =
            SessionStore::new(Arc::new(credentials), Arc::new(MockAuthService::new()));
        session.restore(Timestamp::UNIX_EPOCH);

        assert!(session.identity().is_none());
    }

    #[test]
    fn restore_populates_identity_from_valid_credential() {
        let token = fixture_token(3, "alice", "Admin");

        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_load()
            .return_once(move || Ok(Some(token)));

        let mut session =
            SessionStore::new(Arc::new(credentials), Arc::new(MockAuthService::new()));
        session.restore(Timestamp::UNIX_EPOCH);

        let identity = session.identity().expect("identity should be restored");
        assert_eq!(identity.id, 3);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn restore_clears_malformed_credential() {
        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_load()
            .return_once(|| Ok(Some("garbage".to_string())));
        credentials.expect_clear().times(1).return_once(|| Ok(()));

        let mut session =
            SessionStore::new(Arc::new(credentials), Arc::new(MockAuthService::new()));
        session.restore(Timestamp::UNIX_EPOCH);

        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn login_persists_token_and_sets_identity() -> TestResult {
        let token = fixture_token(9, "bob", "Pharmacist");
        let saved = token.clone();

        let mut auth = MockAuthService::new();
        auth.expect_login()
            .withf(|username, password| username == "bob" && password == "pw")
            .return_once(move |_, _| Ok(token));

        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_save()
            .withf(move |value| value == saved)
            .times(1)
            .return_once(|_| Ok(()));

        let mut session = SessionStore::new(Arc::new(credentials), Arc::new(auth));
        let outcome = session.login("bob", "pw").await;

        assert_eq!(outcome, LoginOutcome::Success);

        let identity = session.identity().ok_or("identity should be set")?;
        assert_eq!(identity.username, "bob");
        assert_eq!(identity.role, Role::Pharmacist);

        Ok(())
    }

    #[tokio::test]
    async fn login_failure_carries_backend_message() {
        let mut auth = MockAuthService::new();
        auth.expect_login().return_once(|_, _| {
            Err(ApiError::Backend {
                status: 401,
                message: Some("Invalid username or password".to_string()),
            })
        });

        let mut session =
            SessionStore::new(Arc::new(MockCredentialStore::new()), Arc::new(auth));
        let outcome = session.login("bob", "wrong").await;

        assert_eq!(
            outcome,
            LoginOutcome::Failure("Invalid username or password".to_string())
        );
        assert!(session.identity().is_none());
    }

    #[tokio::test]
    async fn login_failure_without_message_is_generic() {
        let mut auth = MockAuthService::new();
        auth.expect_login().return_once(|_, _| {
            Err(ApiError::Backend {
                status: 500,
                message: None,
            })
        });

        let mut session =
            SessionStore::new(Arc::new(MockCredentialStore::new()), Arc::new(auth));

        assert_eq!(
            session.login("bob", "pw").await,
            LoginOutcome::Failure(GENERIC_LOGIN_FAILURE.to_string())
        );
    }

    #[test]
    fn logout_clears_credential_and_identity() {
        let token = fixture_token(3, "alice", "Admin");

        let mut credentials = MockCredentialStore::new();
        credentials
            .expect_load()
            .return_once(move || Ok(Some(token)));
        credentials.expect_clear().times(1).return_once(|| Ok(()));

        let mut session =
            SessionStore::new(Arc::new(credentials), Arc::new(MockAuthService::new()));
        session.restore(Timestamp::UNIX_EPOCH);
        assert!(session.identity().is_some());

        session.logout();

        assert!(session.identity().is_none());
    }
}
