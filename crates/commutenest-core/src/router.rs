//! Route table and session gate.
//!
//! Every requested path goes through [`Gate::decide`], which looks it up in a
//! static table and weighs the route's access rule against the session. While
//! the session is still resolving, no route decision is made at all.

use tracing::debug;

use crate::auth::Session;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Rendered regardless of session
    Open,
    /// Only for visitors without a session (login, register)
    PublicOnly,
    /// Only for signed-in users
    Protected,
}

/// A destination view of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Login,
    Register,
    Dashboard,
    Search,
    HousingDetail,
    Profile,
    Favorites,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Login => "Log in",
            Page::Register => "Sign up",
            Page::Dashboard => "Dashboard",
            Page::Search => "Search",
            Page::HousingDetail => "Listing",
            Page::Profile => "Profile",
            Page::Favorites => "Favorites",
        }
    }
}

/// One row of the route table.
#[derive(Debug)]
pub struct RouteDef {
    /// Path matched segment by segment, ignoring ASCII case; `:name`
    /// segments bind a parameter
    pub pattern: &'static str,
    pub access: Access,
    pub page: Page,
}

/// The application's routes, first match wins.
pub static ROUTES: &[RouteDef] = &[
    RouteDef { pattern: "/", access: Access::Open, page: Page::Home },
    RouteDef { pattern: "/login", access: Access::PublicOnly, page: Page::Login },
    RouteDef { pattern: "/register", access: Access::PublicOnly, page: Page::Register },
    RouteDef { pattern: "/dashboard", access: Access::Protected, page: Page::Dashboard },
    RouteDef { pattern: "/search", access: Access::Protected, page: Page::Search },
    RouteDef { pattern: "/housing/:id", access: Access::Protected, page: Page::HousingDetail },
    RouteDef { pattern: "/profile", access: Access::Protected, page: Page::Profile },
    RouteDef { pattern: "/favorites", access: Access::Protected, page: Page::Favorites },
];

/// A path matched against the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub page: Page,
    pub access: Access,
    pub params: Vec<(&'static str, String)>,
}

impl RouteMatch {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// What to show for a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session still resolving: show a neutral placeholder, decide nothing
    Placeholder,
    Render(RouteMatch),
    /// Replace the current location with this path
    Redirect(&'static str),
    /// No route matches the path
    NotFound(String),
}

/// Strip query string, fragment and a single trailing slash.
pub fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];

    if path.is_empty() {
        HOME_PATH
    } else if path.len() > 1 && path.ends_with('/') {
        &path[..path.len() - 1]
    } else {
        path
    }
}

fn match_pattern(pattern: &'static str, path: &str) -> Option<Vec<(&'static str, String)>> {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');
    let mut params = Vec::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    if actual.is_empty() {
                        return None;
                    }
                    params.push((name, actual.to_string()));
                } else if !expected.eq_ignore_ascii_case(actual) {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

/// Routes requested paths according to a route table and the session.
#[derive(Debug, Clone, Copy)]
pub struct Gate {
    routes: &'static [RouteDef],
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl Gate {
    pub fn new(routes: &'static [RouteDef]) -> Self {
        Self { routes }
    }

    /// Look `path` up in the route table without considering the session.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize(path);
        self.routes.iter().find_map(|route| {
            match_pattern(route.pattern, path).map(|params| RouteMatch {
                page: route.page,
                access: route.access,
                params,
            })
        })
    }

    pub fn decide(&self, session: &Session<'_>, path: &str) -> GateDecision {
        if session.loading {
            return GateDecision::Placeholder;
        }

        let Some(route) = self.match_path(path) else {
            debug!(path, "No route matches");
            return GateDecision::NotFound(normalize(path).to_string());
        };

        let signed_in = session.is_authenticated();
        match route.access {
            Access::PublicOnly if signed_in => GateDecision::Redirect(DASHBOARD_PATH),
            Access::Protected if !signed_in => GateDecision::Redirect(LOGIN_PATH),
            _ => GateDecision::Render(route),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;

    fn user() -> User {
        serde_json::from_str(r#"{"id": "1", "email": "a@b.com", "username": "ab"}"#).unwrap()
    }

    /// A concrete path for each route, binding parameters to sample values
    fn sample_path(route: &RouteDef) -> String {
        route.pattern.replace(":id", "42")
    }

    fn paths_with(access: Access) -> Vec<String> {
        ROUTES
            .iter()
            .filter(|r| r.access == access)
            .map(sample_path)
            .collect()
    }

    #[test]
    fn test_protected_paths_redirect_anonymous_to_login() {
        let paths = paths_with(Access::Protected);
        assert_eq!(paths.len(), 5);
        for path in paths {
            assert_eq!(
                Gate::default().decide(&Session::anonymous(), &path),
                GateDecision::Redirect(LOGIN_PATH),
                "{path}"
            );
        }
    }

    #[test]
    fn test_public_only_paths_redirect_users_to_dashboard() {
        let user = user();
        for path in paths_with(Access::PublicOnly) {
            assert_eq!(
                Gate::default().decide(&Session::authenticated(&user), &path),
                GateDecision::Redirect(DASHBOARD_PATH),
                "{path}"
            );
        }
    }

    #[test]
    fn test_loading_decides_nothing() {
        let gate = Gate::default();
        for route in ROUTES {
            assert_eq!(
                gate.decide(&Session::resolving(), &sample_path(route)),
                GateDecision::Placeholder
            );
        }
        assert_eq!(
            gate.decide(&Session::resolving(), "/no/such/page"),
            GateDecision::Placeholder
        );
    }

    #[test]
    fn test_home_renders_in_every_session_state() {
        let user = user();
        let gate = Gate::default();
        for session in [Session::anonymous(), Session::authenticated(&user)] {
            match gate.decide(&session, "/") {
                GateDecision::Render(route) => assert_eq!(route.page, Page::Home),
                other => panic!("unexpected decision {other:?}"),
            }
        }
    }

    #[test]
    fn test_allowed_routes_render() {
        let user = user();
        let gate = Gate::default();

        for path in paths_with(Access::Protected) {
            assert!(matches!(
                gate.decide(&Session::authenticated(&user), &path),
                GateDecision::Render(_)
            ));
        }
        for path in paths_with(Access::PublicOnly) {
            assert!(matches!(
                gate.decide(&Session::anonymous(), &path),
                GateDecision::Render(_)
            ));
        }
    }

    #[test]
    fn test_redirect_targets() {
        let user = user();
        let gate = Gate::default();
        assert_eq!(
            gate.decide(&Session::anonymous(), "/profile"),
            GateDecision::Redirect("/login")
        );
        assert_eq!(
            gate.decide(&Session::authenticated(&user), "/login"),
            GateDecision::Redirect("/dashboard")
        );
    }

    #[test]
    fn test_housing_detail_binds_id() {
        let route = Gate::default().match_path("/housing/abc-123").unwrap();
        assert_eq!(route.page, Page::HousingDetail);
        assert_eq!(route.param("id"), Some("abc-123"));
        assert_eq!(route.param("other"), None);
    }

    #[test]
    fn test_parametric_segment_must_be_present() {
        let gate = Gate::default();
        assert_eq!(gate.match_path("/housing"), None);
        assert_eq!(gate.match_path("/housing/"), None);
        assert_eq!(gate.match_path("/housing/1/photos"), None);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let user = user();
        let gate = Gate::default();
        assert_eq!(
            gate.decide(&Session::anonymous(), "/nowhere?x=1"),
            GateDecision::NotFound("/nowhere".to_string())
        );
        assert_eq!(
            gate.decide(&Session::authenticated(&user), "/dashboard/extra"),
            GateDecision::NotFound("/dashboard/extra".to_string())
        );
    }

    #[test]
    fn test_matching_ignores_case_but_keeps_param_values() {
        let gate = Gate::default();
        assert_eq!(gate.match_path("/Login").map(|r| r.page), Some(Page::Login));
        assert_eq!(
            gate.decide(&Session::anonymous(), "/DASHBOARD"),
            GateDecision::Redirect(LOGIN_PATH)
        );

        let route = gate.match_path("/Housing/AbC").unwrap();
        assert_eq!(route.page, Page::HousingDetail);
        assert_eq!(route.param("id"), Some("AbC"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("/login/"), "/login");
        assert_eq!(normalize("/search?q=loft"), "/search");
        assert_eq!(normalize("/housing/7#photos"), "/housing/7");
        assert_eq!(normalize("?next=/profile"), "/");
    }

    #[test]
    fn test_first_match_wins() {
        static SHADOWED: &[RouteDef] = &[
            RouteDef { pattern: "/housing/:id", access: Access::Open, page: Page::HousingDetail },
            RouteDef { pattern: "/housing/new", access: Access::Protected, page: Page::Search },
        ];
        let route = Gate::new(SHADOWED).match_path("/housing/new").unwrap();
        assert_eq!(route.page, Page::HousingDetail);
        assert_eq!(route.param("id"), Some("new"));
    }
}
