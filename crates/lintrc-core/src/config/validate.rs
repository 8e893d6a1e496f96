//! Structural validation of configuration bodies and elements
//!
//! Body validation runs once per configuration body, before normalization.
//! Element validation runs after extraction has folded the matching
//! elements, because checking environment and processor references needs
//! the plugin member maps of the whole array.

use super::config_array::PluginMemberMaps;
use super::element::ConfigArrayElement;
use super::environments::get_builtin_environment;
use crate::error::LintrcError;
use crate::result::Result;
use serde_json::{Map, Value};

/// Top-level fields a configuration body may carry.
const BODY_FIELDS: &[&str] = &[
    "env",
    "extends",
    "globals",
    "overrides",
    "parser",
    "parserOptions",
    "plugins",
    "processor",
    "root",
    "rules",
    "settings",
];

/// Additional fields an `overrides` entry may carry.
const OVERRIDE_FIELDS: &[&str] = &["files", "excludedFiles"];

/// Accepted string forms of a global declaration.
const GLOBAL_KEYWORDS: &[&str] = &["readonly", "readable", "writable", "writeable", "off"];

/// Validate a configuration body before normalization.
///
/// Returns the body as an object map on success, so callers can proceed
/// without re-checking its shape.
pub fn validate_config_schema<'a>(body: &'a Value, source: &str) -> Result<&'a Map<String, Value>> {
    let map = body.as_object().ok_or_else(|| {
        invalid(source, format!("expected an object but got {}", type_name(body)))
    })?;
    validate_body(map, source, false)?;
    Ok(map)
}

fn validate_body(body: &Map<String, Value>, source: &str, is_override: bool) -> Result<()> {
    for key in body.keys() {
        let known = BODY_FIELDS.contains(&key.as_str())
            || (is_override && OVERRIDE_FIELDS.contains(&key.as_str()));
        if !known {
            return Err(invalid(source, format!("unknown property \"{key}\"")));
        }
    }

    if is_override && body.contains_key("root") {
        return Err(invalid(source, "\"root\" is not allowed in \"overrides\""));
    }

    if let Some(env) = body.get("env") {
        let env = expect_object(env, "env", source)?;
        for (name, value) in env {
            if !value.is_boolean() {
                return Err(invalid(
                    source,
                    format!("property \"env.{name}\" should be a boolean"),
                ));
            }
        }
    }

    if let Some(extends) = body.get("extends") {
        match extends {
            Value::String(_) => {}
            Value::Array(items) => {
                if items.iter().any(|item| !item.is_string()) {
                    return Err(invalid(source, "\"extends\" entries should be strings"));
                }
            }
            _ => {
                return Err(invalid(
                    source,
                    "\"extends\" should be a string or an array of strings",
                ));
            }
        }
    }

    if let Some(globals) = body.get("globals") {
        expect_object(globals, "globals", source)?;
    }

    if let Some(parser) = body.get("parser") {
        if !parser.is_string() && !parser.is_null() {
            return Err(invalid(source, "\"parser\" should be a string"));
        }
    }

    if let Some(parser_options) = body.get("parserOptions") {
        expect_object(parser_options, "parserOptions", source)?;
    }

    if let Some(plugins) = body.get("plugins") {
        match plugins {
            Value::Array(items) if items.iter().all(|item| item.is_string()) => {}
            _ => {
                return Err(invalid(
                    source,
                    "\"plugins\" should be an array of strings",
                ));
            }
        }
    }

    if let Some(processor) = body.get("processor") {
        if !processor.is_string() {
            return Err(invalid(source, "\"processor\" should be a string"));
        }
    }

    if let Some(root) = body.get("root") {
        if !root.is_boolean() {
            return Err(invalid(source, "\"root\" should be a boolean"));
        }
    }

    if let Some(rules) = body.get("rules") {
        expect_object(rules, "rules", source)?;
    }

    if let Some(settings) = body.get("settings") {
        expect_object(settings, "settings", source)?;
    }

    if let Some(overrides) = body.get("overrides") {
        let overrides = match overrides {
            Value::Array(items) => items,
            _ => return Err(invalid(source, "\"overrides\" should be an array")),
        };
        for (index, entry) in overrides.iter().enumerate() {
            let entry = entry.as_object().ok_or_else(|| {
                invalid(source, format!("\"overrides[{index}]\" should be an object"))
            })?;
            match entry.get("files") {
                None => {
                    return Err(invalid(
                        source,
                        format!("\"overrides[{index}]\" should have a \"files\" pattern"),
                    ));
                }
                Some(files) if !is_pattern_list(files) => {
                    return Err(invalid(
                        source,
                        format!(
                            "\"overrides[{index}].files\" should be a non-empty string or array"
                        ),
                    ));
                }
                Some(_) => {}
            }
            if let Some(excluded) = entry.get("excludedFiles") {
                if !is_pattern_list_allow_empty(excluded) {
                    return Err(invalid(
                        source,
                        format!(
                            "\"overrides[{index}].excludedFiles\" should be a string or array"
                        ),
                    ));
                }
            }
            validate_body(entry, source, true)?;
        }
    }

    Ok(())
}

/// Validate one element against the plugin-derived member maps.
///
/// Called after extraction, when every plugin of the array has been
/// indexed. Failures name the element's source.
pub fn validate_config_array_element(
    element: &ConfigArrayElement,
    members: &PluginMemberMaps,
) -> Result<()> {
    if let Some(env) = &element.env {
        for name in env.keys() {
            let known = get_builtin_environment(name).is_some()
                || members.environments.contains_key(name.as_str());
            if !known {
                return Err(invalid(
                    &element.name,
                    format!("environment \"{name}\" is not found"),
                ));
            }
        }
    }

    if let Some(globals) = &element.globals {
        for (name, value) in globals {
            let valid = value.is_boolean()
                || matches!(value.as_str(), Some(s) if GLOBAL_KEYWORDS.contains(&s));
            if !valid {
                return Err(invalid(
                    &element.name,
                    format!(
                        "global \"{name}\" has an invalid value; use a boolean or one of \"readonly\", \"writable\", \"off\""
                    ),
                ));
            }
        }
    }

    if let Some(processor) = &element.processor {
        if !members.processors.contains_key(processor.as_str()) {
            return Err(invalid(
                &element.name,
                format!("processor \"{processor}\" was not found"),
            ));
        }
    }

    if let Some(rules) = &element.rules {
        for (rule_id, setting) in rules {
            let severity = match setting {
                Value::Array(items) => items.first(),
                scalar => Some(scalar),
            };
            if !severity.is_some_and(is_valid_severity) {
                return Err(invalid(
                    &element.name,
                    format!(
                        "configuration for rule \"{rule_id}\" is invalid; severity should be one of 0, 1, 2, \"off\", \"warn\", \"error\""
                    ),
                ));
            }
        }
    }

    Ok(())
}

fn is_valid_severity(value: &Value) -> bool {
    match value {
        Value::Number(n) => matches!(n.as_u64(), Some(0..=2)),
        Value::String(s) => matches!(s.as_str(), "off" | "warn" | "error"),
        _ => false,
    }
}

fn is_pattern_list(value: &Value) -> bool {
    match value {
        Value::Array(items) if items.is_empty() => false,
        _ => is_pattern_list_allow_empty(value),
    }
}

fn is_pattern_list_allow_empty(value: &Value) -> bool {
    match value {
        Value::String(_) => true,
        Value::Array(items) => items.iter().all(|item| item.is_string()),
        _ => false,
    }
}

fn expect_object<'a>(
    value: &'a Value,
    field: &str,
    source: &str,
) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(source, format!("\"{field}\" should be an object")))
}

fn invalid(source: &str, detail: impl std::fmt::Display) -> LintrcError {
    LintrcError::config_error(format!("Configuration in \"{source}\" is invalid: {detail}"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
