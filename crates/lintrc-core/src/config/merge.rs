//! The merge algebra used when extracting a config
//!
//! Elements are folded in precedence order (highest first). Scalars are
//! first-wins, records merge deeply without overwriting, rule settings
//! keep the winning severity while lower-precedence elements may still
//! contribute default options, and a broken parser or plugin only aborts
//! the fold when it actually wins.

use super::dependency::PluginDependency;
use super::element::ConfigArrayElement;
use super::extracted::ExtractedConfig;
use crate::result::Result;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Fold the elements selected by `indices` (highest precedence first) into
/// a fresh [`ExtractedConfig`].
pub(crate) fn create_config(
    elements: &[ConfigArrayElement],
    indices: &[usize],
) -> Result<ExtractedConfig> {
    let mut config = ExtractedConfig::default();

    for &index in indices {
        let element = &elements[index];

        // Adopt the parser which was found first. A broken parser that a
        // higher-precedence element already shadowed never surfaces.
        if config.parser.is_none() {
            if let Some(parser) = &element.parser {
                if let Some(error) = &parser.error {
                    return Err((**error).clone());
                }
                config.parser = Some(parser.clone());
            }
        }

        // Adopt the processor which was found first.
        if config.processor.is_none() {
            config.processor = element.processor.clone();
        }

        if let Some(env) = &element.env {
            merge_without_overwrite(&mut config.env, env);
        }
        if let Some(globals) = &element.globals {
            merge_without_overwrite(&mut config.globals, globals);
        }
        if let Some(parser_options) = &element.parser_options {
            merge_without_overwrite(&mut config.parser_options, parser_options);
        }
        if let Some(settings) = &element.settings {
            merge_without_overwrite(&mut config.settings, settings);
        }
        if let Some(plugins) = &element.plugins {
            merge_plugins(&mut config.plugins, plugins)?;
        }
        if let Some(rules) = &element.rules {
            merge_rule_configs(&mut config.rules, rules);
        }
    }

    Ok(config)
}

/// Deep-assign `source` into `target` without overwriting anything the
/// target already has.
///
/// Scalars (including `null`, which is a concrete value here) are written
/// only into absent slots. Containers recurse; a container arriving at an
/// absent slot is rebuilt empty first so the source is never aliased or
/// mutated. Slots where target and source disagree on shape keep the
/// target value.
pub(crate) fn merge_without_overwrite(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, source_value) in source {
        match target.get_mut(key) {
            Some(target_value) if is_container(target_value) => {
                merge_container(target_value, source_value);
            }
            Some(_) => {}
            None => {
                target.insert(key.clone(), fresh_slot(source_value));
            }
        }
    }
}

fn merge_container(target: &mut Value, source: &Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => merge_without_overwrite(target, source),
        (Value::Array(target), Value::Array(source)) => merge_sequence(target, source),
        _ => {}
    }
}

/// Index-wise assign-without-overwrite over ordered sequences.
fn merge_sequence(target: &mut Vec<Value>, source: &[Value]) {
    for (index, source_value) in source.iter().enumerate() {
        match target.get_mut(index) {
            Some(target_value) if is_container(target_value) => {
                merge_container(target_value, source_value);
            }
            Some(_) => {}
            None => target.push(fresh_slot(source_value)),
        }
    }
}

/// Copy a source value into an empty slot: containers are rebuilt through
/// the merge so nested data is owned by the target, scalars are cloned.
fn fresh_slot(source: &Value) -> Value {
    match source {
        Value::Object(map) => {
            let mut fresh = Map::new();
            merge_without_overwrite(&mut fresh, map);
            Value::Object(fresh)
        }
        Value::Array(items) => {
            let mut fresh = Vec::new();
            merge_sequence(&mut fresh, items);
            Value::Array(fresh)
        }
        scalar => scalar.clone(),
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// Adopt plugins not yet present. A broken plugin entry aborts the fold
/// the moment it would be adopted.
fn merge_plugins(
    target: &mut BTreeMap<String, PluginDependency>,
    source: &BTreeMap<String, PluginDependency>,
) -> Result<()> {
    for (id, dependency) in source {
        if target.contains_key(id) {
            continue;
        }
        if let Some(error) = &dependency.error {
            return Err((**error).clone());
        }
        target.insert(id.clone(), dependency.clone());
    }
    Ok(())
}

/// Merge rule settings, canonicalizing every stored value to array form.
///
/// A rule not yet seen is stored as `[severity, ...options]`. A rule whose
/// stored setting is severity-only may receive default options from a
/// lower-precedence element; a setting that already has options is final.
fn merge_rule_configs(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (rule_id, source_setting) in source {
        match target.get_mut(rule_id) {
            None => {
                let canonical = match source_setting {
                    Value::Array(items) => Value::Array(items.clone()),
                    severity => Value::Array(vec![severity.clone()]),
                };
                target.insert(rule_id.clone(), canonical);
            }
            Some(Value::Array(stored)) if stored.len() == 1 => {
                if let Value::Array(items) = source_setting {
                    if items.len() >= 2 {
                        stored.extend(items[1..].iter().cloned());
                    }
                }
            }
            Some(_) => {}
        }
    }
}
