//! Access token claims decoding.
//!
//! The backend issues a JWT whose payload carries the staff identity. The
//! client never verifies the signature (the backend re-checks the token on
//! every request); it only needs a successful payload decode and an
//! unexpired `exp` to seed the in-memory session.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jiff::Timestamp;
use serde::Deserialize;
use thiserror::Error;

use crate::session::{Role, SessionIdentity};

/// Username used when no recognised name claim is present.
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// Errors that can occur when decoding a stored access token.
#[derive(Debug, Error)]
pub enum ClaimsError {
    /// The token is not a dot-separated JWT or its payload is not base64.
    #[error("access token format is invalid")]
    MalformedToken,

    /// The payload decoded but is not a valid claims document.
    #[error("access token claims are invalid")]
    InvalidClaims(#[source] serde_json::Error),

    /// The token carries a numeric id claim that is not a number.
    #[error("access token user id claim is not numeric")]
    InvalidUserId,

    /// The token expired before `now`.
    #[error("access token has expired")]
    Expired,
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    uid: String,
    role: Role,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    unique_name: Option<String>,
    #[serde(default)]
    name: Option<String>,
    exp: i64,
}

/// Decode a bearer token payload into a [`SessionIdentity`].
///
/// The username is resolved by trying `sub`, then `unique_name`, then
/// `name`, falling back to [`UNKNOWN_USERNAME`].
///
/// # Errors
///
/// Returns a [`ClaimsError`] when the payload cannot be decoded, the claims
/// are malformed, or the token expired at or before `now`.
pub fn decode_identity(token: &str, now: Timestamp) -> Result<SessionIdentity, ClaimsError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or(ClaimsError::MalformedToken)?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ClaimsError::MalformedToken)?;

    let claims: RawClaims =
        serde_json::from_slice(&bytes).map_err(ClaimsError::InvalidClaims)?;

    if claims.exp <= now.as_second() {
        return Err(ClaimsError::Expired);
    }

    let id: i64 = claims
        .uid
        .parse()
        .map_err(|_| ClaimsError::InvalidUserId)?;

    let role = claims.role;

    Ok(SessionIdentity {
        id,
        username: resolve_username(claims),
        role,
    })
}

fn resolve_username(claims: RawClaims) -> String {
    // An empty claim falls through to the next one rather than masking it.
    [claims.sub, claims.unique_name, claims.name]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_USERNAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            encode(payload)
        )
    }

    fn far_future() -> i64 {
        4_102_444_800 // 2100-01-01
    }

    #[test]
    fn decodes_identity_from_sub_claim() {
        let token = token_with_payload(&format!(
            r#"{{"uid":"7","role":"Pharmacist","sub":"alice","exp":{}}}"#,
            far_future()
        ));

        let identity =
            decode_identity(&token, Timestamp::UNIX_EPOCH).expect("token should decode");

        assert_eq!(identity.id, 7);
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Pharmacist);
    }

    #[test]
    fn username_falls_back_through_claims_in_order() {
        let unique_name = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Admin","unique_name":"bob","name":"carol","exp":{}}}"#,
            far_future()
        ));
        let name_only = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Admin","name":"carol","exp":{}}}"#,
            far_future()
        ));
        let none = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Admin","exp":{}}}"#,
            far_future()
        ));

        let decode = |token: &str| {
            decode_identity(token, Timestamp::UNIX_EPOCH).expect("token should decode")
        };

        assert_eq!(decode(&unique_name).username, "bob");
        assert_eq!(decode(&name_only).username, "carol");
        assert_eq!(decode(&none).username, UNKNOWN_USERNAME);
    }

    #[test]
    fn empty_claims_fall_through_to_the_next_one() {
        let empty_sub = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Admin","sub":"","unique_name":"bob","exp":{}}}"#,
            far_future()
        ));
        let all_empty = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Admin","sub":"","unique_name":"","name":"","exp":{}}}"#,
            far_future()
        ));

        let decode = |token: &str| {
            decode_identity(token, Timestamp::UNIX_EPOCH).expect("token should decode")
        };

        assert_eq!(decode(&empty_sub).username, "bob");
        assert_eq!(decode(&all_empty).username, UNKNOWN_USERNAME);
    }

    #[test]
    fn sub_claim_takes_priority() {
        let token = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Admin","sub":"alice","unique_name":"bob","exp":{}}}"#,
            far_future()
        ));

        let identity =
            decode_identity(&token, Timestamp::UNIX_EPOCH).expect("token should decode");

        assert_eq!(identity.username, "alice");
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let err = decode_identity("not-a-jwt", Timestamp::UNIX_EPOCH).err();
        assert!(matches!(err, Some(ClaimsError::MalformedToken)));

        let garbage = format!("{}.{}.sig", encode("{}"), "!!!not base64!!!");
        let err = decode_identity(&garbage, Timestamp::UNIX_EPOCH).err();
        assert!(matches!(err, Some(ClaimsError::MalformedToken)));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let token = token_with_payload(&format!(
            r#"{{"uid":"1","role":"Janitor","sub":"dave","exp":{}}}"#,
            far_future()
        ));

        let err = decode_identity(&token, Timestamp::UNIX_EPOCH).err();
        assert!(matches!(err, Some(ClaimsError::InvalidClaims(_))));
    }

    #[test]
    fn non_numeric_uid_is_rejected() {
        let token = token_with_payload(&format!(
            r#"{{"uid":"abc","role":"Admin","sub":"dave","exp":{}}}"#,
            far_future()
        ));

        let err = decode_identity(&token, Timestamp::UNIX_EPOCH).err();
        assert!(matches!(err, Some(ClaimsError::InvalidUserId)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = token_with_payload(r#"{"uid":"1","role":"Admin","sub":"eve","exp":1000}"#);

        let now = Timestamp::from_second(1000).expect("valid timestamp");
        let err = decode_identity(&token, now).err();

        assert!(matches!(err, Some(ClaimsError::Expired)));
    }
}
