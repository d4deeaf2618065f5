//! Pattern routes: `/static/:variable/*`
//!
//! A pattern is split on `/` into parts:
//!
//! - `:name` is a variable, optionally constrained by a requirement regex
//! - `*` is a wildcard that reads the rest of the path as `key/value` pairs
//! - anything else is a static segment; `::name` is the escape for a static
//!   segment that starts with a colon
//!
//! Matching walks path segments and parts in lock-step without
//! backtracking. Assembly walks the same parts and drops trailing segments
//! that equal their defaults, producing the shortest path that matches the
//! same parameters again.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, RouterError};
use crate::params::{decode_segment, encode_segment, ParamValue, Params};
use crate::route::{remaining_path, AssembleOptions, Route};
use crate::route_match::RouteMatch;

const URL_VARIABLE: char = ':';
const URL_DELIMITER: char = '/';
const WILDCARD: &str = "*";

/// Options accepted by [`PatternRoute::new`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternRouteOptions {
    /// The pattern, e.g. `/blog/:controller/:action/*`.
    pub route: String,
    /// Values used for variables the path does not provide.
    pub defaults: Params,
    /// Requirement regexes keyed by variable name.
    #[serde(default)]
    pub reqs: IndexMap<String, String>,
}

impl PatternRouteOptions {
    pub fn new(route: impl Into<String>, defaults: Params) -> Self {
        Self {
            route: route.into(),
            defaults,
            reqs: IndexMap::new(),
        }
    }

    pub fn with_requirement(mut self, name: impl Into<String>, regex: impl Into<String>) -> Self {
        self.reqs.insert(name.into(), regex.into());
        self
    }
}

#[derive(Debug, Clone)]
enum Part {
    Static(String),
    Variable {
        name: String,
        requirement: Option<Regex>,
    },
    Wildcard,
}

/// Route compiled from a `:variable` / `*` pattern.
///
/// A wildcard key matched without a value (`/search/foo/flag`) is `Null`.
/// `assemble` never emits `Null` values, so such a key is lost when the
/// match is assembled back into a path.
#[derive(Debug, Clone)]
pub struct PatternRoute {
    pattern: String,
    parts: Vec<Part>,
    defaults: Params,
    static_count: usize,
}

impl PatternRoute {
    /// Compile a pattern route.
    pub fn new(options: PatternRouteOptions) -> Result<Self> {
        let PatternRouteOptions {
            route,
            defaults,
            reqs,
        } = options;

        let pattern = route.trim_matches(URL_DELIMITER).to_string();
        let mut parts = Vec::new();
        let mut static_count = 0;

        if !pattern.is_empty() {
            let segments: Vec<&str> = pattern.split(URL_DELIMITER).collect();
            let last = segments.len() - 1;

            for (pos, segment) in segments.into_iter().enumerate() {
                let part = compile_part(segment, &reqs)?;
                match &part {
                    Part::Wildcard if pos != last => {
                        return Err(RouterError::invalid_configuration(format!(
                            "Wildcard must be the last segment of route \"{}\"",
                            route
                        )));
                    }
                    Part::Static(_) => static_count += 1,
                    _ => {}
                }
                parts.push(part);
            }
        }

        for name in reqs.keys() {
            let declared = parts
                .iter()
                .any(|p| matches!(p, Part::Variable { name: n, .. } if n == name));
            if !declared {
                log::debug!("Requirement for undeclared variable \"{}\" in route \"{}\" ignored", name, route);
            }
        }

        log::debug!(
            "Compiled route \"{}\" ({} parts, {} static)",
            route,
            parts.len(),
            static_count
        );

        Ok(Self {
            pattern,
            parts,
            defaults,
            static_count,
        })
    }

    /// Build a route from a loosely typed options value, e.g. a section of the
    /// merged application config.
    pub fn from_options(options: &serde_json::Value) -> Result<Self> {
        if !options.is_object() {
            return Err(RouterError::invalid_configuration("Options must be an object"));
        }
        if !options.get("route").is_some_and(|r| r.is_string()) {
            return Err(RouterError::invalid_configuration("Route not defined nor a string"));
        }
        if !options.get("defaults").is_some_and(|d| d.is_object()) {
            return Err(RouterError::invalid_configuration("Defaults not defined nor an object"));
        }

        let options = PatternRouteOptions::deserialize(options)
            .map_err(|e| RouterError::invalid_configuration(e.to_string()))?;
        Self::new(options)
    }

    /// The pattern without surrounding delimiters.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Names of the declared variables, in pattern order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|part| match part {
            Part::Variable { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Number of static segments a path must match.
    pub fn static_count(&self) -> usize {
        self.static_count
    }

    pub fn has_wildcard(&self) -> bool {
        matches!(self.parts.last(), Some(Part::Wildcard))
    }

    /// Resolve a variable for assembly: explicit parameter, then the previous
    /// match (captured, then wildcard), then the default. An explicit `Null`
    /// skips straight to the default.
    fn resolve_variable(
        &self,
        name: &str,
        remaining: &mut Params,
        previous: Option<&RouteMatch>,
    ) -> Result<String> {
        match remaining.shift_remove(name) {
            Some(ParamValue::Single(value)) => return Ok(value),
            Some(ParamValue::List(_)) => {
                return Err(RouterError::InvalidRouteParameter {
                    name: name.to_string(),
                    reason: "a path segment takes a single value".to_string(),
                })
            }
            Some(ParamValue::Null) => {}
            None => {
                let remembered = previous.and_then(|previous| {
                    previous
                        .captured()
                        .get(name)
                        .and_then(ParamValue::as_str)
                        .or_else(|| previous.wildcard().get(name).and_then(ParamValue::as_str))
                });
                if let Some(value) = remembered {
                    return Ok(value.to_string());
                }
            }
        }

        self.defaults
            .get(name)
            .and_then(ParamValue::as_str)
            .map(str::to_string)
            .ok_or_else(|| RouterError::missing_parameter(name))
    }
}

fn compile_part(segment: &str, reqs: &IndexMap<String, String>) -> Result<Part> {
    if segment == WILDCARD {
        return Ok(Part::Wildcard);
    }

    if let Some(name) = segment.strip_prefix(URL_VARIABLE) {
        if let Some(escaped) = name.strip_prefix(URL_VARIABLE) {
            return Ok(Part::Static(format!("{}{}", URL_VARIABLE, escaped)));
        }
        if name.is_empty() {
            return Err(RouterError::invalid_configuration("Route variable without a name"));
        }

        let requirement = match reqs.get(name) {
            Some(req) => Some(Regex::new(&format!("(?i)^(?:{})$", req)).map_err(|e| {
                RouterError::invalid_configuration(format!(
                    "Invalid requirement for \"{}\": {}",
                    name, e
                ))
            })?),
            None => None,
        };

        return Ok(Part::Variable {
            name: name.to_string(),
            requirement,
        });
    }

    Ok(Part::Static(segment.to_string()))
}

/// `isset()` semantics: present and not `Null`.
fn is_set(map: &Params, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

impl Route for PatternRoute {
    fn match_path(&self, path: &str, path_offset: Option<usize>) -> Option<RouteMatch> {
        let full_length = path.len();
        let (path, skipped) = match path_offset {
            Some(offset) => remaining_path(path, offset)?,
            None => (path.trim_matches(URL_DELIMITER), 0),
        };

        let segments: Vec<&str> = if path.is_empty() {
            Vec::new()
        } else {
            path.split(URL_DELIMITER).collect()
        };

        let mut captured = Params::new();
        let mut wildcard = Params::new();
        let mut static_count = 0;
        let mut consumed = 0;
        let mut start = 0;

        for (pos, segment) in segments.iter().enumerate() {
            let Some(part) = self.parts.get(pos) else {
                if path_offset.is_some() {
                    break;
                }
                log::trace!("Path \"{}\" is longer than route \"{}\"", path, self.pattern);
                return None;
            };

            match part {
                Part::Wildcard => {
                    for pair in segments[pos..].chunks(2) {
                        let key = decode_segment(pair[0]);
                        if is_set(&wildcard, &key) || is_set(&self.defaults, &key) || is_set(&captured, &key) {
                            continue;
                        }
                        let value = pair
                            .get(1)
                            .map(|v| ParamValue::Single(decode_segment(v)))
                            .unwrap_or(ParamValue::Null);
                        wildcard.insert(key, value);
                    }
                    consumed = path.len();
                    break;
                }
                Part::Static(literal) => {
                    if decode_segment(segment) != *literal {
                        return None;
                    }
                    static_count += 1;
                }
                Part::Variable { name, requirement } => {
                    let value = decode_segment(segment);
                    if let Some(requirement) = requirement {
                        if !requirement.is_match(&value) {
                            log::trace!("Segment \"{}\" fails requirement of \"{}\"", value, name);
                            return None;
                        }
                    }
                    captured.insert(name.clone(), ParamValue::Single(value));
                }
            }

            consumed = start + segment.len();
            start = consumed + 1;
        }

        if static_count != self.static_count {
            return None;
        }

        let mut params = captured.clone();
        for (key, value) in wildcard.iter().chain(self.defaults.iter()) {
            params.entry(key.clone()).or_insert_with(|| value.clone());
        }

        if let Some(missing) = self.variables().find(|name| !params.contains_key(*name)) {
            log::trace!("Route \"{}\" has no value for \"{}\"", self.pattern, missing);
            return None;
        }

        let length = match path_offset {
            Some(_) => skipped + consumed,
            None => full_length,
        };

        Some(
            RouteMatch::new(params)
                .with_captured(captured)
                .with_wildcard(wildcard)
                .with_length(length),
        )
    }

    fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        last_match: Option<&RouteMatch>,
    ) -> Result<String> {
        let previous = if options.reset { None } else { last_match };
        let mut remaining = params.clone();
        let mut segments: Vec<(Option<&str>, String)> = Vec::with_capacity(self.parts.len());
        let mut emit_all = false;

        for part in &self.parts {
            match part {
                Part::Variable { name, .. } => {
                    let value = self.resolve_variable(name, &mut remaining, previous)?;
                    segments.push((Some(name.as_str()), value));
                }
                Part::Static(literal) => segments.push((None, literal.clone())),
                Part::Wildcard => {
                    if let Some(previous) = previous {
                        for (key, value) in previous.wildcard() {
                            remaining
                                .entry(key.clone())
                                .or_insert_with(|| value.clone());
                        }
                    }

                    for (key, value) in &remaining {
                        if value.is_null() || self.defaults.get(key) == Some(value) {
                            continue;
                        }
                        for item in value.values() {
                            segments.push((None, key.clone()));
                            segments.push((None, item.to_string()));
                            emit_all = true;
                        }
                    }
                }
            }
        }

        let mut assembled = Vec::with_capacity(segments.len());
        for (name, value) in segments.iter().rev() {
            let default = name
                .and_then(|n| self.defaults.get(n))
                .and_then(ParamValue::as_str);

            if emit_all || default != Some(value.as_str()) || options.path_offset {
                assembled.push(encode_segment(value, options.encode));
                emit_all = true;
            }
        }
        assembled.reverse();

        Ok(format!("{}{}", URL_DELIMITER, assembled.join("/")))
    }

    fn defaults(&self) -> &Params {
        &self.defaults
    }
}
