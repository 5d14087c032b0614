//! Router core module - procedure registry and route resolution.

use crate::schema::Schema;
use crate::typed::ProcedureDefinition;
use http::Method;
use regex::Regex;
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Path parameter storage for the dispatch path.
///
/// Names are shared with the compiled route (`Arc<str>`); values are per
/// request and already percent-decoded.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Result of resolving a method and path to a procedure.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub procedure: Arc<ProcedureDefinition>,
    /// Placeholder bindings, e.g. `{pet_id}` → `("pet_id", "1")`
    pub path_params: ParamVec,
}

impl RouteMatch {
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Router construction failure. Raised by [`RouterBuilder::build`], never at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// Two procedures share a name
    DuplicateName { name: String },
    /// Two procedures bind the same method to structurally identical paths
    DuplicateRoute {
        method: Method,
        path: String,
        existing: String,
    },
    /// Path pattern is malformed
    InvalidPattern { path: String, reason: String },
    /// A `{placeholder}` is not a field of the procedure's input schema
    UnboundPlaceholder { name: String, placeholder: String },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::DuplicateName { name } => {
                write!(f, "router error: procedure name '{name}' is registered twice")
            }
            RouterError::DuplicateRoute {
                method,
                path,
                existing,
            } => write!(
                f,
                "router error: {method} {path} collides with already registered procedure '{existing}'"
            ),
            RouterError::InvalidPattern { path, reason } => {
                write!(f, "router error: invalid path pattern '{path}': {reason}")
            }
            RouterError::UnboundPlaceholder { name, placeholder } => write!(
                f,
                "router error: procedure '{name}' binds path placeholder '{{{placeholder}}}' \
                 that is not a field of its input schema"
            ),
        }
    }
}

impl std::error::Error for RouterError {}

#[derive(Clone)]
struct CompiledRoute {
    procedure: Arc<ProcedureDefinition>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

/// Immutable, ordered collection of procedures and their HTTP bindings.
///
/// Built once at startup through [`RouterBuilder`]. Resolution walks the
/// routes in registration order and returns the first structural match.
#[derive(Clone)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.routes.iter().map(|r| {
                format!(
                    "{} {} -> {}",
                    r.procedure.method, r.procedure.path_pattern, r.procedure.name
                )
            }))
            .finish()
    }
}

/// Collects procedure definitions and validates them into a [`Router`].
#[derive(Default)]
pub struct RouterBuilder {
    procedures: Vec<ProcedureDefinition>,
}

impl RouterBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a procedure. Order matters for resolution tie-breaks.
    #[must_use]
    pub fn procedure(mut self, definition: ProcedureDefinition) -> Self {
        self.procedures.push(definition);
        self
    }

    /// Validate every definition and compile the routing table.
    ///
    /// # Errors
    ///
    /// Fails on the first duplicate name, duplicate `(method, path shape)`,
    /// malformed pattern or unbound placeholder.
    pub fn build(self) -> Result<Router, RouterError> {
        let mut names = HashSet::new();
        let mut shapes: HashMap<(Method, String), String> = HashMap::new();
        let mut routes = Vec::with_capacity(self.procedures.len());

        for def in self.procedures {
            if !names.insert(def.name.clone()) {
                return Err(RouterError::DuplicateName { name: def.name });
            }

            let shape = pattern_shape(&def.path_pattern)?;
            if let Some(existing) = shapes.get(&(def.method.clone(), shape.clone())) {
                return Err(RouterError::DuplicateRoute {
                    method: def.method.clone(),
                    path: def.path_pattern.clone(),
                    existing: existing.clone(),
                });
            }
            shapes.insert((def.method.clone(), shape), def.name.clone());

            for placeholder in def.path_placeholders() {
                let bound = matches!(&def.input_schema, Schema::Object(_))
                    && def.input_schema.field(placeholder).is_some();
                if !bound {
                    return Err(RouterError::UnboundPlaceholder {
                        name: def.name.clone(),
                        placeholder: placeholder.to_string(),
                    });
                }
            }

            let (regex, param_names) = Router::path_to_regex(&def.path_pattern).map_err(|e| {
                RouterError::InvalidPattern {
                    path: def.path_pattern.clone(),
                    reason: e.to_string(),
                }
            })?;

            routes.push(CompiledRoute {
                procedure: Arc::new(def),
                regex,
                param_names: param_names.into_iter().map(Arc::from).collect(),
            });
        }

        let routes_summary: Vec<String> = routes
            .iter()
            .map(|r| format!("{} {}", r.procedure.method, r.procedure.path_pattern))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Ok(Router { routes })
    }
}

/// Check a pattern and reduce it to its shape (`/pets/{}`), ignoring placeholder names.
fn pattern_shape(path: &str) -> Result<String, RouterError> {
    let invalid = |reason: &str| RouterError::InvalidPattern {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if !path.starts_with('/') {
        return Err(invalid("must start with '/'"));
    }
    if path == "/" {
        return Ok(path.to_string());
    }

    let mut shape = String::with_capacity(path.len());
    let mut seen = HashSet::new();
    for segment in path[1..].split('/') {
        if segment.is_empty() {
            return Err(invalid("empty path segment"));
        }
        shape.push('/');
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            let well_formed = !name.is_empty()
                && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !well_formed {
                return Err(invalid("placeholder names must be non-empty [A-Za-z0-9_]"));
            }
            if !seen.insert(name) {
                return Err(invalid("placeholder bound twice"));
            }
            shape.push_str("{}");
        } else if segment.contains('{') || segment.contains('}') {
            return Err(invalid("placeholders must span a whole segment"));
        } else {
            shape.push_str(segment);
        }
    }
    Ok(shape)
}

impl Router {
    #[must_use]
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Resolve a request to the first procedure whose method and pattern match.
    ///
    /// Literal segments must match exactly (case-sensitive); placeholder
    /// segments bind positionally and are percent-decoded.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let match_start = Instant::now();

        for route in &self.routes {
            if route.procedure.method != *method {
                continue;
            }
            let Some(caps) = route.regex.captures(path) else {
                continue;
            };

            let mut path_params = ParamVec::new();
            for (i, name) in route.param_names.iter().enumerate() {
                if let Some(raw) = caps.get(i + 1) {
                    let value = urlencoding::decode(raw.as_str())
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| raw.as_str().to_string());
                    path_params.push((Arc::clone(name), value));
                }
            }

            debug!(
                method = %method,
                path = %path,
                procedure = %route.procedure.name,
                route_pattern = %route.procedure.path_pattern,
                path_params = ?path_params,
                duration_us = match_start.elapsed().as_micros(),
                "Route matched"
            );

            return Some(RouteMatch {
                procedure: Arc::clone(&route.procedure),
                path_params,
            });
        }

        debug!(
            method = %method,
            path = %path,
            duration_us = match_start.elapsed().as_micros(),
            "No route matched"
        );
        None
    }

    /// Methods registered for any pattern matching `path`, in registration order.
    #[must_use]
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for route in &self.routes {
            if route.regex.is_match(path) && !methods.contains(&route.procedure.method) {
                methods.push(route.procedure.method.clone());
            }
        }
        methods
    }

    /// All procedures in registration order.
    pub fn procedures(&self) -> impl Iterator<Item = &ProcedureDefinition> {
        self.routes.iter().map(|r| r.procedure.as_ref())
    }

    /// Look up a procedure by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProcedureDefinition> {
        self.procedures().find(|p| p.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log every registered route at `info`.
    pub fn dump_routes(&self) {
        info!(count = self.routes.len(), "Registered routes");
        for route in &self.routes {
            let p = &route.procedure;
            info!(
                method = %p.method,
                path = %p.path_pattern,
                procedure = %p.name,
                kind = %p.kind,
                "Route"
            );
        }
    }

    /// Convert a path pattern to an anchored regex and its placeholder names.
    ///
    /// `/users/{id}` becomes `^/users/([^/]+)$` with `["id"]`. Literal
    /// segments are escaped.
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>), regex::Error> {
        if path == "/" {
            return Ok((Regex::new(r"^/$")?, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 5);
        pattern.push('^');
        let mut param_names = Vec::with_capacity(path.matches('{').count());

        for segment in path.split('/') {
            if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                pattern.push_str("/([^/]+)");
                param_names.push(name.to_string());
            } else if !segment.is_empty() {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        Ok((Regex::new(&pattern)?, param_names))
    }
}
