//! Pure navigation decisions. The guard reads a session snapshot and the
//! target route's declared access metadata; the route table is consulted for
//! default landing paths only, never for permission checks.

use tracing::debug;

use crate::routes::{RouteDescriptor, RouteMeta, RouteTable, LOGIN_PATH, MAIN_PATH};
use super::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Proceed,
    RedirectTo(String),
}

/// Decide a navigation attempt. Rules are evaluated in order, first match
/// wins, and an unauthenticated session can never reach a protected route:
///
/// 1. protected target, nobody logged in        -> redirect to the login page
/// 2. protected target, focused role not listed -> redirect to the role's landing path
/// 3. target is the bare landing root           -> redirect to the role's landing path
/// 4. target is the login page while logged in  -> redirect to the role's landing path
/// 5. otherwise                                 -> proceed
pub fn evaluate_navigation(
    session: &Session,
    meta: &RouteMeta,
    path: &str,
    table: &dyn RouteTable,
) -> RouteDecision {
    if meta.requires_auth {
        let Some(user) = session.user() else {
            debug!(target: "cityalert::guard", "deny '{}': not logged in", path);
            return RouteDecision::RedirectTo(LOGIN_PATH.to_string());
        };
        if let Some(allowed) = meta.allowed_roles.as_deref() {
            if !allowed.contains(&user.role) {
                debug!(target: "cityalert::guard", "deny '{}': role {} not allowed", path, user.role);
                return RouteDecision::RedirectTo(table.default_path_for_role(user.role));
            }
        }
    }

    // An authenticated context never rests on the undifferentiated landing root.
    if path == MAIN_PATH {
        if let Some(role) = session.active_role() {
            return RouteDecision::RedirectTo(table.default_path_for_role(role));
        }
    }

    if path == LOGIN_PATH {
        if let Some(role) = session.active_role() {
            return RouteDecision::RedirectTo(table.default_path_for_role(role));
        }
    }

    RouteDecision::Proceed
}

/// Router-middleware adapter around `evaluate_navigation`: calls `next(None)`
/// to proceed or `next(Some(path))` to redirect.
pub fn guard_navigation<F>(
    session: &Session,
    table: &dyn RouteTable,
    to: &RouteDescriptor,
    _from: Option<&RouteDescriptor>,
    next: F,
) where
    F: FnOnce(Option<String>),
{
    match evaluate_navigation(session, &to.meta, &to.path, table) {
        RouteDecision::Proceed => next(None),
        RouteDecision::RedirectTo(path) => next(Some(path)),
    }
}
