//! Engine behind the `<prefix>/<controller>/<action>/<key>/<value>...`
//! convention routes.
//!
//! [`NamespaceRoute`](crate::NamespaceRoute) and
//! [`ModuleRoute`](crate::ModuleRoute) differ only in the key used for the
//! first segment and in which first segments they accept.

use crate::error::{Result, RouterError};
use crate::params::{decode_segment, encode_segment, ParamValue, Params};
use crate::route::{remaining_path, AssembleOptions};
use crate::route_match::RouteMatch;

pub(crate) const CONTROLLER_KEY: &str = "controller";
pub(crate) const ACTION_KEY: &str = "action";

/// Which first segments a convention route accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PrefixRule {
    /// Exactly this literal.
    Literal(String),
    /// Any of these names, compared case-insensitively.
    OneOf(Vec<String>),
}

impl PrefixRule {
    pub(crate) fn accepts(&self, segment: &str) -> bool {
        match self {
            PrefixRule::Literal(literal) => segment == literal,
            PrefixRule::OneOf(names) => names.iter().any(|n| n.eq_ignore_ascii_case(segment)),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Convention {
    prefix_key: &'static str,
    rule: PrefixRule,
    defaults: Params,
}

impl Convention {
    pub(crate) fn new(prefix_key: &'static str, rule: PrefixRule, defaults: Params) -> Self {
        Self {
            prefix_key,
            rule,
            defaults,
        }
    }

    pub(crate) fn rule(&self) -> &PrefixRule {
        &self.rule
    }

    pub(crate) fn defaults(&self) -> &Params {
        &self.defaults
    }

    pub(crate) fn match_path(&self, path: &str, path_offset: Option<usize>) -> Option<RouteMatch> {
        let full_length = path.len();
        let path = match path_offset {
            Some(offset) => remaining_path(path, offset)?.0,
            None => path,
        };
        let path = path.trim_matches('/');
        if path.is_empty() {
            return None;
        }

        let mut segments = path.split('/').peekable();
        let prefix = decode_segment(segments.next()?);
        if !self.rule.accepts(&prefix) {
            log::trace!("\"{}\" is not accepted as {}", prefix, self.prefix_key);
            return None;
        }

        let mut captured = Params::new();
        captured.insert(self.prefix_key.to_string(), ParamValue::Single(prefix));

        for key in [CONTROLLER_KEY, ACTION_KEY] {
            match segments.peek() {
                Some(segment) if !segment.is_empty() => {
                    captured.insert(key.to_string(), ParamValue::Single(decode_segment(segment)));
                    segments.next();
                }
                _ => break,
            }
        }

        let rest: Vec<&str> = segments.collect();
        let mut pairs = Params::new();
        for pair in rest.chunks(2) {
            let key = decode_segment(pair[0]);
            let value = pair
                .get(1)
                .map(|v| ParamValue::Single(decode_segment(v)))
                .unwrap_or(ParamValue::Null);

            match pairs.get_mut(&key) {
                Some(existing) => existing.append(value),
                None => {
                    pairs.insert(key, value);
                }
            }
        }

        for (key, value) in pairs {
            if key.is_empty() || is_numeric(&key) {
                continue;
            }
            captured.entry(key).or_insert(value);
        }

        let mut params = self.defaults.clone();
        for (key, value) in &captured {
            params.insert(key.clone(), value.clone());
        }

        Some(
            RouteMatch::new(params)
                .with_captured(captured)
                .with_length(full_length - path_offset.unwrap_or(0)),
        )
    }

    pub(crate) fn assemble(
        &self,
        params: &Params,
        options: &AssembleOptions,
        last_match: Option<&RouteMatch>,
    ) -> Result<String> {
        let mut values = self.defaults.clone();
        if let Some(previous) = last_match.filter(|_| !options.reset) {
            for (key, value) in previous.params() {
                values.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in params {
            if value.is_null() {
                match self.defaults.get(key) {
                    Some(default) => values.insert(key.clone(), default.clone()),
                    None => values.shift_remove(key),
                };
            } else {
                values.insert(key.clone(), value.clone());
            }
        }

        let prefix = take_single(&mut values, self.prefix_key)?;
        if !self.rule.accepts(&prefix) {
            return Err(RouterError::InvalidRouteParameter {
                name: self.prefix_key.to_string(),
                reason: format!("\"{}\" is not a known {}", prefix, self.prefix_key),
            });
        }
        let controller = take_single(&mut values, CONTROLLER_KEY)?;
        let action = take_single(&mut values, ACTION_KEY)?;

        let mut tail = Vec::new();
        for (key, value) in &values {
            if value.is_empty() || self.defaults.get(key) == Some(value) {
                continue;
            }
            for item in value.values().into_iter().filter(|v| !v.is_empty()) {
                tail.push(encode_segment(key, options.encode));
                tail.push(encode_segment(item, options.encode));
            }
        }

        let is_default = |key: &str, value: &str| {
            self.defaults.get(key).and_then(ParamValue::as_str) == Some(value)
        };

        let mut segments = vec![encode_segment(&prefix, options.encode)];
        let emit_action = !tail.is_empty() || !is_default(ACTION_KEY, &action);
        let emit_controller = emit_action || !is_default(CONTROLLER_KEY, &controller);
        if emit_controller {
            segments.push(encode_segment(&controller, options.encode));
        }
        if emit_action {
            segments.push(encode_segment(&action, options.encode));
        }
        segments.extend(tail);

        Ok(format!("/{}", segments.join("/")))
    }
}

fn take_single(values: &mut Params, key: &str) -> Result<String> {
    match values.shift_remove(key) {
        Some(ParamValue::Single(value)) => Ok(value),
        Some(ParamValue::List(_)) => Err(RouterError::InvalidRouteParameter {
            name: key.to_string(),
            reason: "a path segment takes a single value".to_string(),
        }),
        _ => Err(RouterError::missing_parameter(key)),
    }
}

/// Keys like `12`, `-3` or `1.5` cannot name a parameter.
fn is_numeric(key: &str) -> bool {
    let digits = key.strip_prefix(['-', '+']).unwrap_or(key);
    !digits.is_empty()
        && digits.bytes().any(|b| b.is_ascii_digit())
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && digits.bytes().filter(|b| *b == b'.').count() <= 1
}
