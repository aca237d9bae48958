//! Per-role route trees and the route table contract.
//! Permission data lives on each route's metadata; the guard reads it from
//! there and only ever asks the table for default landing paths.

use crate::identity::Role;

/// Unauthenticated entry page. The root path `/` redirects here.
pub const LOGIN_PATH: &str = "/login";
/// Authenticated landing root; never rested on once a role is known.
pub const MAIN_PATH: &str = "/main";
pub const ROOT_PATH: &str = "/";

/// Access metadata declared on a route node. `allowed_roles` absent means any
/// authenticated role may enter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub title: String,
    pub requires_auth: bool,
    pub allowed_roles: Option<Vec<Role>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub name: String,
    pub path: String,
    pub meta: RouteMeta,
}

fn route(name: &str, path: &str, title: &str, requires_auth: bool, allowed: Option<Vec<Role>>) -> RouteDescriptor {
    RouteDescriptor {
        name: name.to_string(),
        path: path.to_string(),
        meta: RouteMeta {
            title: title.to_string(),
            requires_auth,
            allowed_roles: allowed,
        },
    }
}

/// Provider contract the session/guard side depends on; concrete route
/// definitions stay behind it.
pub trait RouteTable: Send + Sync {
    /// Permitted route subtree for a role, in display order.
    fn routes_for_role(&self, role: Role) -> Vec<RouteDescriptor>;
    /// Landing path a role is sent to when no more specific destination applies.
    fn default_path_for_role(&self, role: Role) -> String;
}

/// The static route tree of the reporting front end.
pub struct StaticRouteTable;

fn citizen_routes() -> Vec<RouteDescriptor> {
    vec![
        route("EventReport", "/main/report", "Report an Incident", true, Some(vec![Role::Citizen])),
        route("MyReports", "/main/my-reports", "My Reports", true, Some(vec![Role::Citizen])),
    ]
}

fn responder_routes() -> Vec<RouteDescriptor> {
    vec![
        route("Dashboard", "/main/dashboard", "Live Monitor", true, Some(vec![Role::Responder])),
        route("SingleEvents", "/main/events/single", "Isolated Events", true, Some(vec![Role::Responder])),
        route("RelatedEvents", "/main/events/related", "Clustered Reports", true, Some(vec![Role::Responder])),
        route("Analytics", "/main/analytics", "Analytics", true, Some(vec![Role::Responder])),
    ]
}

impl StaticRouteTable {
    pub fn login_route() -> RouteDescriptor {
        route("login", LOGIN_PATH, "Login", false, None)
    }

    pub fn main_route() -> RouteDescriptor {
        route("main", MAIN_PATH, "Home", true, None)
    }

    /// Resolve a path to its descriptor across the whole tree. The bare root
    /// is declared as a redirect to the login page, so it resolves there.
    pub fn find_route(&self, path: &str) -> Option<RouteDescriptor> {
        match path {
            ROOT_PATH | LOGIN_PATH => Some(Self::login_route()),
            MAIN_PATH => Some(Self::main_route()),
            _ => Role::ALL
                .into_iter()
                .flat_map(|role| self.routes_for_role(role))
                .find(|d| d.path == path),
        }
    }
}

impl RouteTable for StaticRouteTable {
    fn routes_for_role(&self, role: Role) -> Vec<RouteDescriptor> {
        match role {
            Role::Citizen => citizen_routes(),
            Role::Responder => responder_routes(),
        }
    }

    fn default_path_for_role(&self, role: Role) -> String {
        match role {
            Role::Citizen => "/main/report".to_string(),
            Role::Responder => "/main/dashboard".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_belong_to_the_role_tree() {
        let table = StaticRouteTable;
        for role in Role::ALL {
            let default = table.default_path_for_role(role);
            let routes = table.routes_for_role(role);
            assert!(
                routes.iter().any(|d| d.path == default),
                "{} default '{}' missing from its tree",
                role,
                default
            );
        }
    }

    #[test]
    fn role_routes_are_restricted_to_that_role() {
        let table = StaticRouteTable;
        for role in Role::ALL {
            for d in table.routes_for_role(role) {
                assert!(d.meta.requires_auth, "{} must require auth", d.path);
                assert_eq!(d.meta.allowed_roles.as_deref(), Some(&[role][..]), "{}", d.path);
            }
        }
    }

    #[test]
    fn find_route_resolves_root_login_and_leaves() {
        let table = StaticRouteTable;
        assert_eq!(table.find_route("/").unwrap().path, LOGIN_PATH);
        assert_eq!(table.find_route("/login").unwrap().name, "login");
        assert_eq!(table.find_route("/main").unwrap().name, "main");
        assert_eq!(table.find_route("/main/analytics").unwrap().name, "Analytics");
        assert!(table.find_route("/main/nope").is_none());
    }
}
