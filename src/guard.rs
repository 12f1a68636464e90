//! Route guard
//!
//! Pure function of the route's access class and the current session. It
//! is evaluated before a guarded view renders, so protected content never
//! flashes for an unauthenticated visitor.

use crate::route::{AppRoute, DASHBOARD_PATH, SIGNIN_PATH};
use medscore_shared::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// Only for visitors who are not signed in (sign-in, sign-up).
    AuthOnly,
    /// Requires an authenticated session.
    Private,
    /// Open to everyone.
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(&'static str),
}

pub fn decide(kind: RouteKind, session: &Session) -> GuardDecision {
    match (kind, session.is_authenticated) {
        (RouteKind::AuthOnly, true) => GuardDecision::RedirectTo(DASHBOARD_PATH),
        (RouteKind::Private, false) => GuardDecision::RedirectTo(SIGNIN_PATH),
        _ => GuardDecision::Allow,
    }
}

/// Resolves the route that will actually render for `requested`.
///
/// Applies forwarding, then the guard. Redirect targets are themselves
/// allowed for the session that produced them, so one step suffices.
pub fn resolve(requested: AppRoute, session: &Session) -> AppRoute {
    let route = requested.forward().unwrap_or(requested);
    match decide(route.kind(), session) {
        GuardDecision::Allow => route,
        GuardDecision::RedirectTo(path) => AppRoute::from_path(path),
    }
}
