//! The merged configuration a file ultimately resolves to

use super::dependency::{ParserDependency, PluginDependency};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// The merged result of extracting a config for one file
///
/// Produced by folding the matching elements of a [`ConfigArray`] in
/// precedence order; see the merge rules in [`merge`](super::merge).
/// Every rule setting is canonicalized to the array form
/// `[severity, ...options]`.
///
/// [`ConfigArray`]: super::ConfigArray
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedConfig {
    /// Enabled environments
    pub env: Map<String, Value>,

    /// Declared globals
    pub globals: Map<String, Value>,

    /// The winning parser, if any element supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<ParserDependency>,

    /// Merged parser options
    pub parser_options: Map<String, Value>,

    /// Adopted plugins, keyed by plugin id
    pub plugins: BTreeMap<String, PluginDependency>,

    /// The winning processor, if any element supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,

    /// Rule settings, every value in array form
    pub rules: Map<String, Value>,

    /// Merged shared settings
    pub settings: Map<String, Value>,
}

impl ExtractedConfig {
    /// Project this result into config-file shape.
    ///
    /// The documented serialization form: `parser` collapses to its resolved
    /// file path, `plugins` to the list of plugin ids in reverse adoption
    /// order, and the file-selection-only `processor` field is omitted.
    pub fn to_config_file_content(&self) -> Value {
        let parser = self
            .parser
            .as_ref()
            .and_then(|p| p.file_path.as_ref())
            .map(|p| Value::String(p.display().to_string()))
            .unwrap_or(Value::Null);

        let plugins: Vec<&str> = self.plugins.keys().rev().map(String::as_str).collect();

        json!({
            "env": self.env,
            "globals": self.globals,
            "parser": parser,
            "parserOptions": self.parser_options,
            "plugins": plugins,
            "rules": self.rules,
            "settings": self.settings,
        })
    }
}
