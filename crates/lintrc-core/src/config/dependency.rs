//! Loaded parser/plugin dependency records
//!
//! Loading a parser or plugin never aborts configuration resolution by
//! itself: the outcome, success or failure, is captured in a
//! [`ConfigDependency`] and carried inside the configuration elements. A
//! captured failure only becomes fatal if that dependency wins during
//! extraction for a file that actually matches.

use crate::error::LintrcError;
use serde::Deserialize;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A loaded plugin or parser, or the captured reason it failed to load
///
/// Exactly one of `definition` and `error` is present. Definitions are
/// shared (`Arc`) between every element and array produced from the same
/// loader call; the record itself is immutable.
#[derive(Debug, Clone)]
pub struct ConfigDependency<T> {
    /// The loaded definition; absent when loading failed
    pub definition: Option<Arc<T>>,
    /// The captured loading failure; absent when loading succeeded
    pub error: Option<Box<LintrcError>>,
    /// Resolved source path of the definition; absent on failure
    pub file_path: Option<PathBuf>,
    /// Logical identifier the configs refer to this dependency by
    pub id: String,
    /// Human-readable label of the importing config
    pub importer_name: String,
    /// Absolute path of the importing config file, when it has one
    pub importer_path: Option<PathBuf>,
}

impl<T> ConfigDependency<T> {
    /// Record a successfully loaded definition.
    pub fn loaded(
        definition: Arc<T>,
        file_path: Option<PathBuf>,
        id: impl Into<String>,
        importer_name: impl Into<String>,
        importer_path: Option<PathBuf>,
    ) -> Self {
        Self {
            definition: Some(definition),
            error: None,
            file_path,
            id: id.into(),
            importer_name: importer_name.into(),
            importer_path,
        }
    }

    /// Record a loading failure.
    pub fn failed(
        error: LintrcError,
        id: impl Into<String>,
        importer_name: impl Into<String>,
        importer_path: Option<PathBuf>,
    ) -> Self {
        Self {
            definition: None,
            error: Some(Box::new(error)),
            file_path: None,
            id: id.into(),
            importer_name: importer_name.into(),
            importer_path,
        }
    }
}

/// Diagnostic projection: never traverses into the loaded definition.
impl<T> Serialize for ConfigDependency<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut fields = 3;
        if self.file_path.is_some() {
            fields += 1;
        }
        if self.error.is_some() {
            fields += 1;
        }
        let mut s = serializer.serialize_struct("ConfigDependency", fields)?;
        s.serialize_field("id", &self.id)?;
        s.serialize_field("importerName", &self.importer_name)?;
        s.serialize_field("importerPath", &self.importer_path)?;
        if let Some(file_path) = &self.file_path {
            s.serialize_field("filePath", file_path)?;
        }
        if let Some(error) = &self.error {
            s.serialize_field("error", &error.to_string())?;
        }
        s.end()
    }
}

/// A parser definition is opaque to the resolver.
pub type ParserDependency = ConfigDependency<Value>;

/// A loaded plugin.
pub type PluginDependency = ConfigDependency<PluginDefinition>;

/// The recognized surface of a plugin module
///
/// Plugins may contribute named preset configurations, environments,
/// processors, and rule definitions. Unknown members are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PluginDefinition {
    /// Named preset configuration bodies referenced as `plugin:<id>/<name>`
    pub configs: BTreeMap<String, Value>,
    /// Environments contributed by the plugin
    pub environments: BTreeMap<String, Value>,
    /// Processors contributed by the plugin
    pub processors: BTreeMap<String, Value>,
    /// Rule definitions contributed by the plugin
    pub rules: BTreeMap<String, Value>,
}

impl PluginDefinition {
    /// Deserialize a plugin definition from a loaded module value.
    ///
    /// Values that are not records (a module exporting a list, say) produce
    /// an empty definition rather than an error; the plugin is then simply
    /// memberless.
    pub fn from_module_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialization_hides_definition() {
        let dependency = ParserDependency::loaded(
            Arc::new(json!({"parse": {"huge": "opaque object"}})),
            Some(PathBuf::from("/project/node_modules/custom-parser/index.json")),
            "custom-parser",
            ".eslintrc.json",
            Some(PathBuf::from("/project/.eslintrc.json")),
        );

        let serialized = serde_json::to_value(&dependency).unwrap();
        assert_eq!(serialized["id"], "custom-parser");
        assert_eq!(serialized["importerName"], ".eslintrc.json");
        assert_eq!(
            serialized["filePath"],
            "/project/node_modules/custom-parser/index.json"
        );
        assert!(serialized.get("definition").is_none());
        assert!(serialized.get("error").is_none());
    }

    #[test]
    fn test_serialization_includes_error_message() {
        let dependency = PluginDependency::failed(
            LintrcError::WhitespaceFound {
                plugin_name: "bad name".to_string(),
            },
            "bad name",
            ".eslintrc.json",
            None,
        );

        let serialized = serde_json::to_value(&dependency).unwrap();
        assert!(
            serialized["error"]
                .as_str()
                .unwrap()
                .contains("Whitespace found")
        );
        assert!(serialized.get("filePath").is_none());
    }

    #[test]
    fn test_plugin_definition_from_module_value() {
        let definition = PluginDefinition::from_module_value(&json!({
            "configs": { "recommended": { "rules": { "foo/bar": "error" } } },
            "processors": { ".md": {} },
            "rules": { "bar": { "create": {} } },
        }));

        assert!(definition.configs.contains_key("recommended"));
        assert!(definition.processors.contains_key(".md"));
        assert!(definition.rules.contains_key("bar"));
        assert!(definition.environments.is_empty());

        let empty = PluginDefinition::from_module_value(&json!(["not", "a", "record"]));
        assert!(empty.configs.is_empty());
    }
}
