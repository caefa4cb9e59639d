use std::collections::HashMap;

/// Every route the application declares, in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteId {
    Home,
    About,
    /// Primary OIDC callback, `/auth/callback`.
    Callback,
    /// Delegated cluster callback, `/auth/callback/:ns/:cluster`.
    ClusterCallback,
}

/// Metadata attached to a route descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub display_name: &'static str,
    pub requires_auth: bool,
}

impl RouteId {
    pub fn meta(&self) -> RouteMeta {
        match self {
            RouteId::Home => RouteMeta {
                display_name: "Home",
                requires_auth: false,
            },
            RouteId::About => RouteMeta {
                display_name: "About",
                requires_auth: true,
            },
            RouteId::Callback => RouteMeta {
                display_name: "Callback",
                requires_auth: false,
            },
            RouteId::ClusterCallback => RouteMeta {
                display_name: "Cluster callback",
                requires_auth: false,
            },
        }
    }

    pub fn path_pattern(&self) -> &'static str {
        match self {
            RouteId::Home => "/",
            RouteId::About => "/about",
            RouteId::Callback => "/auth/callback",
            RouteId::ClusterCallback => "/auth/callback/:ns/:cluster",
        }
    }

    fn all() -> [RouteId; 4] {
        // Longest patterns first so `/auth/callback/a/b` does not match
        // the plain callback route.
        [
            RouteId::ClusterCallback,
            RouteId::Callback,
            RouteId::About,
            RouteId::Home,
        ]
    }
}

/// The navigation target under evaluation: target route, concrete path,
/// extracted path parameters and query string. Supplied by the navigation
/// layer; read-only to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteIntent {
    pub id: RouteId,
    pub path: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, String>,
}

impl RouteIntent {
    /// Build an intent for a route without parameters.
    pub fn to_route(id: RouteId) -> Self {
        RouteIntent {
            id,
            path: id.path_pattern().to_string(),
            params: HashMap::new(),
            query: HashMap::new(),
        }
    }

    /// Match a concrete path (plus parsed query pairs) against the static
    /// route table. Returns None for undeclared paths.
    pub fn parse(path: &str, query: HashMap<String, String>) -> Option<Self> {
        for id in RouteId::all() {
            if let Some(params) = match_pattern(id.path_pattern(), path) {
                return Some(RouteIntent {
                    id,
                    path: path.to_string(),
                    params,
                    query,
                });
            }
        }
        None
    }

    pub fn requires_auth(&self) -> bool {
        self.id.meta().requires_auth
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}

/// Segment-wise pattern match; `:name` segments capture into params.
fn match_pattern(pattern: &str, path: &str) -> Option<HashMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let path_segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (pattern_segment, path_segment) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = pattern_segment.strip_prefix(':') {
            params.insert(name.to_string(), (*path_segment).to_string());
        } else if pattern_segment != path_segment {
            return None;
        }
    }
    Some(params)
}
