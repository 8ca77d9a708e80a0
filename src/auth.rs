use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header, request::Parts},
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

/// Name of the cookie carrying the serialized session record.
pub const SESSION_COOKIE: &str = "session_user";

/// Validity window for a session record, measured from its issuance timestamp.
/// A record older than this is treated as absent, never as "expired-but-present".
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Role
///
/// The closed set of identity roles on the platform. Kept as an enumerated type
/// (rather than a free-form string) so that invalid-role states are unrepresentable:
/// a cookie carrying any other value simply fails deserialization and the request
/// is treated as unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    Vendor,
}

impl Role {
    /// The dashboard path an identity of this role is sent to when it lands on
    /// the login page, the root path, or the other role's scope.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin/dashboard",
            Role::Vendor => "/vendor/dashboard",
        }
    }
}

/// SessionUser
///
/// The identity payload embedded in the session cookie. The `type` key is the
/// on-the-wire name of the role field (reserved word in Rust, hence the rename),
/// matching the structure written by the login flow on the client side.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    #[serde(rename = "type")]
    pub role: Role,
    pub is_verified: bool,
}

/// SessionRecord
///
/// The full deserialized cookie value: identity plus the issuance timestamp
/// (epoch milliseconds). Owned by the gate for the duration of a request and
/// never persisted server-side.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionRecord {
    pub user: SessionUser,
    pub timestamp: i64,
}

/// extract_cookie
///
/// Pulls a single named cookie value out of the Cookie header. Returns None for
/// a missing header, a non-UTF8 header, or an absent name; never errors.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let (key, value) = cookie.trim().split_once('=')?;
            if key == name { Some(value.to_string()) } else { None }
        })
}

/// session_from_headers
///
/// Resolves the session record for a request, if any. This is the single point
/// where the cookie contract is enforced:
///
/// 1. Read the named cookie; absent means no identity.
/// 2. Parse the value as JSON; unparsable means no identity (swallowed, never thrown).
/// 3. Check freshness against the issuance timestamp; stale means no identity.
///
/// `now_ms` is injected by the caller so the freshness rule is directly testable.
pub fn session_from_headers(headers: &HeaderMap, now_ms: i64) -> Option<SessionRecord> {
    let raw = extract_cookie(headers, SESSION_COOKIE)?;
    let record: SessionRecord = serde_json::from_str(&raw).ok()?;
    if now_ms.saturating_sub(record.timestamp) > SESSION_TTL_MS {
        return None;
    }
    Some(record)
}

/// AuthUser
///
/// The resolved identity of an authenticated request. Handlers use this struct
/// to retrieve the caller's id and role for ownership and permission checks.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a function
/// argument in any handler behind the gate. The session cookie is the only source
/// of identity; there is no server-side session store to consult, so extraction is
/// a pure function of the request headers and the current time.
///
/// Rejection: Returns StatusCode::UNAUTHORIZED (401) when no fresh, well-formed
/// session is present. Routes reached through the gate normally never see this,
/// since anonymous requests are redirected before a handler runs; the extractor
/// is the second layer of the same check.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        let record =
            session_from_headers(&parts.headers, now_ms).ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            id: record.user.id,
            email: record.user.email,
            role: record.user.role,
            is_verified: record.user.is_verified,
        })
    }
}
