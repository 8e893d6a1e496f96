//! Normalized configuration fragments

use super::dependency::{ParserDependency, PluginDependency};
use super::override_tester::OverrideTester;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// One normalized configuration fragment
///
/// Produced by the factory from a configuration body, an `extends` target,
/// an `overrides` entry, or a plugin processor declaration. Elements are
/// never mutated once the factory has yielded them.
///
/// Invariants maintained by the factory:
/// - an element produced from `overrides` never carries `root`;
/// - criteria base paths are bound to the outermost importer's directory;
/// - `plugins[k].id == k` for every plugin entry.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigArrayElement {
    /// Diagnostic label (config file path, or a derived name such as
    /// `".eslintrc.json » eslint-config-base#overrides[0]"`)
    pub name: String,

    /// The config file this fragment came from, when it came from a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// File-match criteria; an element without criteria applies everywhere
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<OverrideTester>,

    /// Environment switches (`env` section)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Map<String, Value>>,

    /// Global variable declarations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub globals: Option<Map<String, Value>>,

    /// Loaded parser reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<ParserDependency>,

    /// Options forwarded to the parser
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser_options: Option<Map<String, Value>>,

    /// Loaded plugins, keyed by plugin id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugins: Option<BTreeMap<String, PluginDependency>>,

    /// Qualified processor id (`"<pluginId>/<name>"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,

    /// Cuts off the upward directory search when true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<bool>,

    /// Rule settings (severity scalar or `[severity, ...options]`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<Map<String, Value>>,

    /// Free-form shared settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization_skips_absent_fields() {
        let element = ConfigArrayElement {
            name: ".eslintrc.json".to_string(),
            rules: json!({"semi": "error"}).as_object().cloned(),
            ..Default::default()
        };

        let serialized = serde_json::to_value(&element).unwrap();
        assert_eq!(serialized["name"], ".eslintrc.json");
        assert_eq!(serialized["rules"]["semi"], "error");
        assert!(serialized.get("parser").is_none());
        assert!(serialized.get("root").is_none());
    }
}
