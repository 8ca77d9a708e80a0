/// Router Module Index
///
/// Organizes the application's routing logic into role-segregated modules.
/// The access gate applied in `create_router` is the first line of defense;
/// the module split keeps the second line (per-handler role guards) explicit
/// and prevents accidental exposure of scoped endpoints.
///
/// The three modules map directly to the gate's route classification.

/// Routes outside any role scope. Reachable by any fresh identity; the gate
/// admits anonymous callers only to the login path.
pub mod public;

/// Routes nested under `/vendor`. The gate redirects admin identities away;
/// handlers additionally require the vendor role.
pub mod vendor;

/// Routes nested under `/admin`. The gate redirects vendor identities away;
/// handlers additionally require the admin role.
pub mod admin;
