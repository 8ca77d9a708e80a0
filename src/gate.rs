use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::{Role, SessionRecord, session_from_headers};

/// The only path reachable without any identity.
pub const LOGIN_PATH: &str = "/login";

/// Path prefixes reserved for a single identity role.
pub const ADMIN_PREFIX: &str = "/admin";
pub const VENDOR_PREFIX: &str = "/vendor";

// Frontend build artifacts and image requests skip the gate entirely.
const ASSET_PREFIXES: [&str; 2] = ["/_next/static", "/_next/image"];
const ASSET_EXTENSIONS: [&str; 7] = [".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico"];

/// GateOutcome
///
/// The three possible results of evaluating a request against the gate:
/// pass through unchanged, or redirect to one of the fixed targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Allow,
    Redirect(&'static str),
}

/// is_static_asset
///
/// Static assets are served regardless of identity state; the gate never
/// inspects their requests.
pub fn is_static_asset(path: &str) -> bool {
    if path == "/favicon.ico" {
        return true;
    }
    if ASSET_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return true;
    }
    ASSET_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// True when `path` lies inside the scope reserved for `role`'s counterpart,
/// i.e. the one role-prefixed area this identity must not enter.
fn in_foreign_scope(path: &str, role: Role) -> bool {
    let foreign = match role {
        Role::Admin => VENDOR_PREFIX,
        Role::Vendor => ADMIN_PREFIX,
    };
    path == foreign || path.starts_with(&format!("{}/", foreign))
}

/// evaluate
///
/// The gate's decision function: a pure mapping of (path, resolved session) to an
/// outcome. The caller resolves the session beforehand (see `session_from_headers`),
/// so every failure mode of extraction has already degraded to `None` here.
///
/// Rules are evaluated in order, first match wins:
///
/// 1. No identity and not the login path: to login. This covers the root path
///    too, which is why no separate anonymous-root rule appears below it.
/// 2. Identity on the login path: to that identity's home.
/// 3. Identity inside the other role's scope: to that identity's home.
/// 4. Identity on the root path: to that identity's home.
/// 5. Everything else: allow.
///
/// The login and root special cases must be checked before the generic prefix
/// rule, since neither is prefixed by a role scope and both would otherwise
/// fall through to "allow", leaving anonymous visitors on unauthenticated
/// landing pages.
pub fn evaluate(path: &str, session: Option<&SessionRecord>) -> GateOutcome {
    match session {
        None => {
            if path != LOGIN_PATH {
                return GateOutcome::Redirect(LOGIN_PATH);
            }
            GateOutcome::Allow
        }
        Some(record) => {
            let role = record.user.role;
            if path == LOGIN_PATH {
                return GateOutcome::Redirect(role.home_path());
            }
            if in_foreign_scope(path, role) {
                return GateOutcome::Redirect(role.home_path());
            }
            if path == "/" {
                return GateOutcome::Redirect(role.home_path());
            }
            GateOutcome::Allow
        }
    }
}

/// access_gate
///
/// Middleware wrapper around `evaluate`, applied router-wide. For every non-asset
/// request it resolves the session from the cookie set and either forwards the
/// request unchanged or answers with a temporary redirect. It holds no state,
/// performs no I/O, and mutates nothing; concurrent requests are evaluated
/// independently.
pub async fn access_gate(request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if is_static_asset(path) {
        return next.run(request).await;
    }

    let now_ms = chrono::Utc::now().timestamp_millis();
    let session = session_from_headers(request.headers(), now_ms);

    match evaluate(path, session.as_ref()) {
        GateOutcome::Allow => next.run(request).await,
        GateOutcome::Redirect(target) => Redirect::temporary(target).into_response(),
    }
}
