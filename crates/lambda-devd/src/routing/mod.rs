//! Path-template matching against the configured route table.
//!
//! Templates are split on `/` into literal and parameter segments (`:name`).
//! A request path matches a template when both have the same number of
//! segments, every literal segment is equal, and the methods are equal. The
//! first route in declaration order wins.

use std::collections::BTreeMap;

use lambda_dev_config::RouteDeclaration;

/// Prefix marking a parameter segment in a path template.
pub const PARAMETER_SIGIL: char = ':';

/// One component of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the request segment exactly.
    Literal(String),
    /// Captures the request segment under the given name. Any segment is
    /// accepted, including an empty one between two slashes.
    Parameter(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        raw.strip_prefix(PARAMETER_SIGIL).map_or_else(
            || Self::Literal(raw.to_owned()),
            |name| Self::Parameter(name.to_owned()),
        )
    }

    fn accepts(&self, candidate: &str) -> bool {
        match self {
            Self::Literal(expected) => expected == candidate,
            Self::Parameter(_) => true,
        }
    }
}

/// Splits a path on `/`, discarding trailing empty segments.
///
/// Leading empty segments are kept, so `/a` yields `["", "a"]` while `a`
/// yields `["a"]`; `/` and the empty string both yield no segments.
///
/// ```
/// use lambda_devd::routing::split_path;
///
/// assert_eq!(split_path("/users/5/"), ["", "users", "5"]);
/// assert!(split_path("/").is_empty());
/// ```
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split('/').collect();
    while segments.last().is_some_and(|segment| segment.is_empty()) {
        segments.pop();
    }
    segments
}

/// Parsed route path, for example `/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parses a template.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_owned(),
            segments: split_path(raw).into_iter().map(Segment::parse).collect(),
        }
    }

    /// Template text as declared.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.raw.as_str()
    }

    /// Parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns whether `path` has this template's shape.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        self.matches_segments(&split_path(path))
    }

    fn matches_segments(&self, candidate: &[&str]) -> bool {
        candidate.len() == self.segments.len()
            && self
                .segments
                .iter()
                .zip(candidate)
                .all(|(segment, value)| segment.accepts(value))
    }

    /// Captures parameter values from `path`, walking it in lock-step with
    /// the template.
    ///
    /// Callers should only pass paths accepted by [`PathTemplate::matches`].
    /// A repeated parameter name keeps the last captured value.
    #[must_use]
    pub fn capture(&self, path: &str) -> BTreeMap<String, String> {
        self.segments
            .iter()
            .zip(split_path(path))
            .filter_map(|(segment, value)| match segment {
                Segment::Parameter(name) => Some((name.clone(), value.to_owned())),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// A method and template mapped to a handler identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    method: String,
    template: PathTemplate,
    handler: String,
}

impl Route {
    /// Builds a route. The method is compared verbatim, so callers should
    /// pass it uppercase.
    #[must_use]
    pub fn new(method: impl Into<String>, template: &str, handler: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            template: PathTemplate::parse(template),
            handler: handler.into(),
        }
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Path template.
    #[must_use]
    pub const fn template(&self) -> &PathTemplate {
        &self.template
    }

    /// Handler identifier passed to the function runtime.
    #[must_use]
    pub fn handler(&self) -> &str {
        self.handler.as_str()
    }
}

impl From<&RouteDeclaration> for Route {
    fn from(declaration: &RouteDeclaration) -> Self {
        Self::new(
            declaration.method(),
            declaration.path(),
            declaration.handler(),
        )
    }
}

/// Route selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// Handler identifier of the winning route.
    pub handler: &'a str,
    /// Template of the winning route.
    pub template: &'a PathTemplate,
}

/// Ordered, immutable route table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Builds a table; `routes` order decides ties.
    #[must_use]
    pub const fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// Builds a table from configuration declarations.
    #[must_use]
    pub fn from_declarations(declarations: &[RouteDeclaration]) -> Self {
        Self::new(declarations.iter().map(Route::from).collect())
    }

    /// Routes in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` when no routes are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Finds the first route whose method equals `method` and whose template
    /// matches `path`.
    ///
    /// ```
    /// use lambda_devd::routing::{Route, RouteTable};
    ///
    /// let table = RouteTable::new(vec![
    ///     Route::new("GET", "/users/new", "users.form"),
    ///     Route::new("GET", "/users/:id", "users.show"),
    /// ]);
    /// let matched = table.match_route("GET", "/users/new").expect("route matches");
    /// assert_eq!(matched.handler, "users.form");
    /// assert!(table.match_route("POST", "/users/5").is_none());
    /// ```
    #[must_use]
    pub fn match_route(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        let candidate = split_path(path);
        self.routes
            .iter()
            .filter(|route| route.method == method)
            .find(|route| route.template.matches_segments(&candidate))
            .map(|route| RouteMatch {
                handler: route.handler.as_str(),
                template: &route.template,
            })
    }
}
