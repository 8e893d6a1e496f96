//! The configuration array factory
//!
//! Turns raw configuration data into [`ConfigArray`]s: parses config
//! files, resolves `extends` chains (built-in presets, plugin presets,
//! shareable configs, plain paths), loads parsers and plugins into
//! dependency records, flattens `overrides` into criteria-gated elements,
//! and composes child arrays with their parents unless the child declares
//! `root: true`.

use super::config_array::ConfigArray;
use super::dependency::{ConfigDependency, ParserDependency, PluginDefinition, PluginDependency};
use super::element::ConfigArrayElement;
use super::loader;
use super::naming;
use super::override_tester::OverrideTester;
use super::resolver::{FsModuleResolver, ModuleResolver};
use super::validate;
use crate::error::{ErrorKind, LintrcError};
use crate::result::Result;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Config files probed by `load_on_directory`, in priority order.
pub const CONFIG_FILENAMES: &[&str] = &[
    ".eslintrc.js",
    ".eslintrc.yaml",
    ".eslintrc.yml",
    ".eslintrc.json",
    ".eslintrc",
    "package.json",
];

const ESLINT_RECOMMENDED: &str = include_str!("../../conf/eslint-recommended.json");
const ESLINT_ALL: &str = include_str!("../../conf/eslint-all.json");

/// Construction options for [`ConfigArrayFactory`]
#[derive(Debug, Default, Clone)]
pub struct ConfigArrayFactoryOptions {
    /// Working directory; defaults to the process working directory
    pub cwd: Option<PathBuf>,
    /// Parsers supplied by the host, short-circuiting module resolution
    pub additional_parser_pool: HashMap<String, Arc<Value>>,
    /// Plugins supplied by the host, short-circuiting module resolution
    pub additional_plugin_pool: HashMap<String, Arc<PluginDefinition>>,
    /// Module resolution scheme; defaults to [`FsModuleResolver`]
    pub resolver: Option<Arc<dyn ModuleResolver>>,
}

/// Options for [`ConfigArrayFactory::create`]
#[derive(Debug, Default, Clone)]
pub struct CreateOptions<'a> {
    /// Path the config data is attributed to (binds criteria base paths)
    pub file_path: Option<PathBuf>,
    /// Diagnostic name for the produced elements
    pub name: Option<String>,
    /// Array to prepend unless the new array declares `root: true`
    pub parent: Option<&'a ConfigArray>,
}

/// Options for [`ConfigArrayFactory::load_file`] and
/// [`ConfigArrayFactory::load_on_directory`]
#[derive(Debug, Default, Clone)]
pub struct LoadOptions<'a> {
    /// Diagnostic name for the produced elements
    pub name: Option<String>,
    /// Array to prepend unless the new array declares `root: true`
    pub parent: Option<&'a ConfigArray>,
}

/// State threaded through one normalization pass.
#[derive(Debug, Clone)]
struct LoadContext {
    /// The config file being normalized, when it came from a file
    file_path: Option<PathBuf>,
    /// Directory the criteria of every produced element are rebased on;
    /// stays pinned to the outermost importer across `extends` chains
    match_base_path: PathBuf,
    /// Diagnostic name, growing along the resolution path
    name: String,
    /// Directory plugins are resolved relative to
    plugin_base_path: PathBuf,
}

impl LoadContext {
    fn with_name(&self, name: String) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    fn for_loaded_file(&self, file_path: Option<PathBuf>, name: String) -> Self {
        Self {
            file_path,
            match_base_path: self.match_base_path.clone(),
            name,
            plugin_base_path: self.plugin_base_path.clone(),
        }
    }

    fn chained_name(&self, child: &str) -> String {
        if self.name.is_empty() {
            child.to_string()
        } else {
            format!("{} » {child}", self.name)
        }
    }

    /// Label used in "Referenced from:" trails and validation messages.
    fn importer_label(&self) -> String {
        match &self.file_path {
            Some(path) => path.display().to_string(),
            None => self.name.clone(),
        }
    }

    fn source_label(&self) -> String {
        if self.name.is_empty() {
            self.importer_label()
        } else {
            self.name.clone()
        }
    }
}

/// Factory producing [`ConfigArray`]s from config data, files, and
/// directories
///
/// The factory is stateless between calls apart from its construction
/// options; every produced array owns its own caches.
#[derive(Debug)]
pub struct ConfigArrayFactory {
    cwd: PathBuf,
    additional_parser_pool: HashMap<String, Arc<Value>>,
    additional_plugin_pool: HashMap<String, Arc<PluginDefinition>>,
    resolver: Arc<dyn ModuleResolver>,
}

impl Default for ConfigArrayFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigArrayFactory {
    /// Create a factory with default options.
    pub fn new() -> Self {
        Self::with_options(ConfigArrayFactoryOptions::default())
    }

    /// Create a factory with explicit options.
    pub fn with_options(options: ConfigArrayFactoryOptions) -> Self {
        let cwd = options
            .cwd
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            cwd,
            additional_parser_pool: options.additional_parser_pool,
            additional_plugin_pool: options.additional_plugin_pool,
            resolver: options
                .resolver
                .unwrap_or_else(|| Arc::new(FsModuleResolver::new())),
        }
    }

    /// The working directory this factory resolves against.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Normalize an in-memory configuration body into a [`ConfigArray`].
    pub fn create(&self, config_data: &Value, options: CreateOptions<'_>) -> Result<ConfigArray> {
        if config_data.is_null() {
            return Ok(compose(options.parent, Vec::new()));
        }
        let ctx = self.create_context(options.name.as_deref(), options.file_path.as_deref());
        let elements = self.normalize_config_data(config_data, &ctx)?;
        Ok(compose(options.parent, elements))
    }

    /// Load a config file referenced by path or by shareable-config name.
    pub fn load_file(&self, path_or_name: &str, options: LoadOptions<'_>) -> Result<ConfigArray> {
        let file_path = self.resolve_config_file_reference(path_or_name)?;
        let ctx = self.create_context(options.name.as_deref(), Some(&file_path));
        let elements = self.load_config_data(&ctx)?;
        Ok(compose(options.parent, elements))
    }

    /// Probe a directory for its config file and load the first hit.
    ///
    /// Missing files and missing modules mean "try the next candidate";
    /// any other failure propagates. Probing everything without a hit
    /// yields an array with no own elements.
    pub fn load_on_directory(
        &self,
        directory: &Path,
        options: LoadOptions<'_>,
    ) -> Result<ConfigArray> {
        for filename in CONFIG_FILENAMES {
            let file_path = directory.join(filename);
            if !file_path.is_file() {
                continue;
            }
            let ctx = self.create_context(options.name.as_deref(), Some(&file_path));
            match self.load_config_data(&ctx) {
                Ok(elements) => {
                    debug!("Config file found at {}", file_path.display());
                    return Ok(compose(options.parent, elements));
                }
                Err(error)
                    if matches!(
                        error.kind(),
                        ErrorKind::FileNotFound
                            | ErrorKind::ModuleNotFound
                            | ErrorKind::ConfigFieldNotFound
                    ) =>
                {
                    continue;
                }
                Err(error) => return Err(error),
            }
        }

        debug!("Config file not found on {}", directory.display());
        Ok(compose(options.parent, Vec::new()))
    }

    fn create_context(&self, name: Option<&str>, file_path: Option<&Path>) -> LoadContext {
        let file_path = file_path.map(|p| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                self.cwd.join(p)
            }
        });
        let match_base_path = file_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone());
        let name = name.map(str::to_string).unwrap_or_else(|| {
            file_path
                .as_deref()
                .map(|p| {
                    p.strip_prefix(&self.cwd)
                        .unwrap_or(p)
                        .display()
                        .to_string()
                })
                .unwrap_or_default()
        });

        LoadContext {
            file_path,
            match_base_path,
            name,
            plugin_base_path: self.cwd.clone(),
        }
    }

    /// Tolerate both a file path and a shareable-config package name.
    fn resolve_config_file_reference(&self, path_or_name: &str) -> Result<PathBuf> {
        let candidate = self.cwd.join(path_or_name);
        if candidate.is_file() {
            return Ok(candidate);
        }

        let path_shaped = path_or_name.starts_with('.')
            || path_or_name.contains('/')
            || path_or_name.contains('\\')
            || Path::new(path_or_name).is_absolute();
        if !path_shaped {
            let request = naming::normalize_package_name(path_or_name, "eslint-config");
            let relative_to = self.cwd.join("__placeholder__.js");
            match self.resolver.resolve(&request, &relative_to) {
                Ok(path) => return Ok(path),
                Err(error) if error.kind() == ErrorKind::ModuleNotFound => {}
                Err(error) => return Err(error),
            }
        }

        Err(LintrcError::FileNotFound { path: candidate })
    }

    /// Load and normalize the config file named by the context.
    fn load_config_data(&self, ctx: &LoadContext) -> Result<Vec<ConfigArrayElement>> {
        let Some(file_path) = &ctx.file_path else {
            return Ok(Vec::new());
        };
        let config_data = loader::load_config_file(file_path)?.ok_or_else(|| {
            LintrcError::ConfigFieldNotFound {
                path: file_path.clone(),
            }
        })?;
        self.normalize_config_data(&config_data, ctx)
    }

    /// Validate a body once, then normalize it into elements.
    fn normalize_config_data(
        &self,
        config_data: &Value,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let body = validate::validate_config_schema(config_data, &ctx.source_label())?;
        self.normalize_object_config_data(body, ctx)
    }

    /// Normalize a body: split off `files`/`excludedFiles` into entry
    /// criteria, normalize the rest, then AND the entry criteria onto
    /// every produced element and rebase the result on the outermost
    /// importer's directory.
    fn normalize_object_config_data(
        &self,
        body: &Map<String, Value>,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let files = string_list(body.get("files"));
        let excluded_files = string_list(body.get("excludedFiles"));
        let entry_criteria =
            OverrideTester::create(&files, &excluded_files, &ctx.match_base_path)?;

        let mut elements = self.normalize_object_config_data_body(body, ctx)?;

        for element in &mut elements {
            element.criteria =
                OverrideTester::and(entry_criteria.clone(), element.criteria.take())
                    .map(|criteria| criteria.with_base_path(ctx.match_base_path.clone()));
            // Elements gated by criteria never cut off the lookup root.
            if element.criteria.is_some() {
                element.root = None;
            }
        }

        Ok(elements)
    }

    fn normalize_object_config_data_body(
        &self,
        body: &Map<String, Value>,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let mut elements = Vec::new();

        // Flatten `extends`.
        for extend_name in string_list(body.get("extends")) {
            elements.extend(self.load_extends(&extend_name, ctx)?);
        }

        // Load the parser and plugins up front; failures are captured in
        // the dependency records and only become fatal if they win.
        let parser = body
            .get("parser")
            .and_then(Value::as_str)
            .map(|name| self.load_parser(name, ctx));
        let plugins = body
            .get("plugins")
            .map(|_| self.load_plugins(&string_list(body.get("plugins")), ctx));

        if let Some(plugins) = &plugins {
            elements.extend(self.take_file_extension_processors(plugins, ctx)?);
        }

        elements.push(ConfigArrayElement {
            name: ctx.name.clone(),
            file_path: ctx.file_path.clone(),
            criteria: None,
            env: object_field(body, "env"),
            globals: object_field(body, "globals"),
            parser,
            parser_options: object_field(body, "parserOptions"),
            plugins,
            processor: body
                .get("processor")
                .and_then(Value::as_str)
                .map(str::to_string),
            root: body.get("root").and_then(Value::as_bool),
            rules: object_field(body, "rules"),
            settings: object_field(body, "settings"),
        });

        // Flatten `overrides`.
        if let Some(overrides) = body.get("overrides").and_then(Value::as_array) {
            for (index, entry) in overrides.iter().enumerate() {
                let Some(override_body) = entry.as_object() else {
                    continue;
                };
                let override_ctx =
                    ctx.with_name(format!("{}#overrides[{index}]", ctx.name));
                elements
                    .extend(self.normalize_object_config_data(override_body, &override_ctx)?);
            }
        }

        Ok(elements)
    }

    /// Resolve one `extends` entry into its elements.
    fn load_extends(
        &self,
        extend_name: &str,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        debug!("Loading extends \"{extend_name}\" from {}", ctx.importer_label());
        let result = if extend_name.starts_with("eslint:") {
            self.load_extended_builtin_config(extend_name, ctx)
        } else if extend_name.starts_with("plugin:") {
            self.load_extended_plugin_config(extend_name, ctx)
        } else {
            self.load_extended_shareable_config(extend_name, ctx)
        };
        result.map_err(|error| error.referenced_from(ctx.importer_label()))
    }

    fn load_extended_builtin_config(
        &self,
        extend_name: &str,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let source = match extend_name {
            "eslint:recommended" => ESLINT_RECOMMENDED,
            "eslint:all" => ESLINT_ALL,
            _ => {
                return Err(LintrcError::ExtendConfigMissing {
                    config_name: extend_name.to_string(),
                    importer_name: ctx.name.clone(),
                });
            }
        };
        let body: Value = serde_json::from_str(source).map_err(|e| {
            LintrcError::config_error(format!("Built-in config \"{extend_name}\" is invalid: {e}"))
        })?;
        let nested = ctx.for_loaded_file(None, ctx.chained_name(extend_name));
        self.normalize_config_data(&body, &nested)
    }

    fn load_extended_plugin_config(
        &self,
        extend_name: &str,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let reference = &extend_name["plugin:".len()..];
        let Some(slash) = reference.rfind('/') else {
            return Err(LintrcError::PluginInvalid {
                extend_name: extend_name.to_string(),
                importer_name: ctx.name.clone(),
            });
        };
        let plugin_name = &reference[..slash];
        let config_name = &reference[slash + 1..];

        if is_file_path(plugin_name) {
            return Err(LintrcError::config_error(
                "'extends' cannot use a file path for plugins",
            ));
        }

        let plugin = self.load_plugin(plugin_name, ctx);
        if let Some(definition) = &plugin.definition {
            if let Some(config_data) = definition.configs.get(config_name) {
                let nested = ctx.for_loaded_file(
                    plugin.file_path.clone().or_else(|| ctx.file_path.clone()),
                    ctx.chained_name(&format!("plugin:{}/{config_name}", plugin.id)),
                );
                return self.normalize_config_data(config_data, &nested);
            }
        }
        if let Some(error) = plugin.error {
            return Err(*error);
        }
        Err(LintrcError::ExtendConfigMissing {
            config_name: extend_name.to_string(),
            importer_name: ctx.name.clone(),
        })
    }

    fn load_extended_shareable_config(
        &self,
        extend_name: &str,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let request = if is_file_path(extend_name) {
            extend_name.to_string()
        } else if extend_name.starts_with('.') {
            // Dotted names resolve like relative paths.
            format!("./{extend_name}")
        } else {
            naming::normalize_package_name(extend_name, "eslint-config")
        };

        let relative_to = ctx
            .file_path
            .clone()
            .unwrap_or_else(|| self.cwd.join("__placeholder__.js"));
        let file_path = match self.resolver.resolve(&request, &relative_to) {
            Ok(path) => path,
            Err(error) if error.kind() == ErrorKind::ModuleNotFound => {
                return Err(LintrcError::ExtendConfigMissing {
                    config_name: extend_name.to_string(),
                    importer_name: ctx.importer_label(),
                });
            }
            Err(error) => return Err(error),
        };

        let nested = ctx.for_loaded_file(Some(file_path), ctx.chained_name(&request));
        self.load_config_data(&nested)
    }

    fn load_parser(&self, name_or_path: &str, ctx: &LoadContext) -> ParserDependency {
        debug!("Loading parser \"{name_or_path}\" from {}", ctx.importer_label());

        if let Some(definition) = self.additional_parser_pool.get(name_or_path) {
            return ConfigDependency::loaded(
                Arc::clone(definition),
                ctx.file_path.clone(),
                name_or_path,
                ctx.name.clone(),
                ctx.file_path.clone(),
            );
        }

        let relative_to = ctx
            .file_path
            .clone()
            .unwrap_or_else(|| self.cwd.join("__placeholder__.js"));
        let loaded = self
            .resolver
            .resolve(name_or_path, &relative_to)
            .and_then(|path| loader::load_module_value(&path).map(|value| (path, value)));
        match loaded {
            Ok((path, value)) => ConfigDependency::loaded(
                Arc::new(value),
                Some(path),
                name_or_path,
                ctx.name.clone(),
                ctx.file_path.clone(),
            ),
            Err(error) => ConfigDependency::failed(
                error,
                name_or_path,
                ctx.name.clone(),
                ctx.file_path.clone(),
            ),
        }
    }

    fn load_plugins(
        &self,
        names: &[String],
        ctx: &LoadContext,
    ) -> BTreeMap<String, PluginDependency> {
        let mut plugins = BTreeMap::new();
        for name in names {
            let dependency = self.load_plugin(name, ctx);
            plugins.insert(dependency.id.clone(), dependency);
        }
        plugins
    }

    fn load_plugin(&self, name: &str, ctx: &LoadContext) -> PluginDependency {
        let request = naming::normalize_package_name(name, "eslint-plugin");
        let id = naming::get_shorthand_name(&request, "eslint-plugin");

        if name.chars().any(char::is_whitespace) {
            return ConfigDependency::failed(
                LintrcError::WhitespaceFound {
                    plugin_name: request,
                },
                id,
                ctx.name.clone(),
                ctx.file_path.clone(),
            );
        }

        if let Some(definition) = self
            .additional_plugin_pool
            .get(&request)
            .or_else(|| self.additional_plugin_pool.get(&id))
        {
            return ConfigDependency::loaded(
                Arc::clone(definition),
                ctx.file_path.clone(),
                id,
                ctx.name.clone(),
                ctx.file_path.clone(),
            );
        }

        debug!("Loading plugin \"{request}\" from {}", ctx.plugin_base_path.display());
        let relative_to = ctx.plugin_base_path.join("__placeholder__.js");
        let loaded = self
            .resolver
            .resolve(&request, &relative_to)
            .and_then(|path| loader::load_module_value(&path).map(|value| (path, value)));
        match loaded {
            Ok((path, value)) => ConfigDependency::loaded(
                Arc::new(PluginDefinition::from_module_value(&value)),
                Some(path),
                id,
                ctx.name.clone(),
                ctx.file_path.clone(),
            ),
            Err(error) => {
                let error = if error.kind() == ErrorKind::ModuleNotFound {
                    LintrcError::PluginMissing {
                        plugin_name: request,
                        resolve_plugins_relative_to: ctx.plugin_base_path.clone(),
                        importer_name: ctx.name.clone(),
                    }
                } else {
                    error
                };
                ConfigDependency::failed(error, id, ctx.name.clone(), ctx.file_path.clone())
            }
        }
    }

    /// Emit synthetic file-extension elements for plugin processors whose
    /// id names an extension (`".md"` and friends).
    fn take_file_extension_processors(
        &self,
        plugins: &BTreeMap<String, PluginDependency>,
        ctx: &LoadContext,
    ) -> Result<Vec<ConfigArrayElement>> {
        let mut elements = Vec::new();
        for (plugin_id, dependency) in plugins {
            let Some(definition) = &dependency.definition else {
                continue;
            };
            for processor_id in definition.processors.keys() {
                if !processor_id.starts_with('.') {
                    continue;
                }
                let mut body = Map::new();
                body.insert("files".to_string(), json!([format!("*{processor_id}")]));
                body.insert(
                    "processor".to_string(),
                    json!(format!("{plugin_id}/{processor_id}")),
                );
                elements.extend(self.normalize_object_config_data(&body, ctx)?);
            }
        }
        Ok(elements)
    }
}

/// Prepend `parent` unless the new elements declare `root: true`.
fn compose(parent: Option<&ConfigArray>, elements: Vec<ConfigArrayElement>) -> ConfigArray {
    let child = ConfigArray::new(elements);
    match parent {
        // The root flag must be decided on the child's own elements,
        // before anything is prepended.
        Some(parent) if !child.root() => parent
            .iter()
            .cloned()
            .chain(child.into_elements())
            .collect(),
        _ => child,
    }
}

fn is_file_path(name: &str) -> bool {
    Path::new(name).is_absolute()
        || name.starts_with("./")
        || name.starts_with("../")
        || name.starts_with(".\\")
        || name.starts_with("..\\")
}

/// Flatten a `string | string[]` field into a list, dropping empties.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn object_field(body: &Map<String, Value>, key: &str) -> Option<Map<String, Value>> {
    body.get(key).and_then(Value::as_object).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn factory_for(dir: &TempDir) -> ConfigArrayFactory {
        ConfigArrayFactory::with_options(ConfigArrayFactoryOptions {
            cwd: Some(dir.path().to_path_buf()),
            ..Default::default()
        })
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_create_from_inline_body() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let array = factory
            .create(
                &json!({"rules": {"semi": "error"}}),
                CreateOptions {
                    name: Some("inline".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(array.len(), 1);
        assert_eq!(array[0].name, "inline");
        let config = array.extract_config(dir.path().join("a.js")).unwrap();
        assert_eq!(config.rules["semi"], json!(["error"]));
    }

    #[test]
    fn test_overrides_flattened_with_criteria() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        let config_path = write(
            dir.path(),
            ".eslintrc.json",
            r#"{
                "rules": { "semi": "error" },
                "overrides": [
                    { "files": "*.ts", "rules": { "semi": "off" } }
                ]
            }"#,
        );

        let array = factory
            .load_file(config_path.to_str().unwrap(), LoadOptions::default())
            .unwrap();

        assert_eq!(array.len(), 2);
        assert!(array[0].criteria.is_none());
        assert!(array[1].criteria.is_some());
        assert!(array[1].name.ends_with("#overrides[0]"));

        let ts_config = array.extract_config(dir.path().join("a.ts")).unwrap();
        assert_eq!(ts_config.rules["semi"], json!(["off"]));
        let js_config = array.extract_config(dir.path().join("a.js")).unwrap();
        assert_eq!(js_config.rules["semi"], json!(["error"]));
    }

    #[test]
    fn test_override_cannot_declare_root() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let error = factory
            .create(
                &json!({
                    "overrides": [ { "files": "*.ts", "root": true } ]
                }),
                CreateOptions::default(),
            )
            .unwrap_err();
        assert!(error.to_string().contains("root"));
    }

    #[test]
    fn test_extends_relative_path() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(dir.path(), "base.json", r#"{ "rules": { "quotes": [1, "double"] } }"#);
        let config_path = write(
            dir.path(),
            ".eslintrc.json",
            r#"{ "extends": "./base.json", "rules": { "quotes": "error" } }"#,
        );

        let array = factory
            .load_file(config_path.to_str().unwrap(), LoadOptions::default())
            .unwrap();

        // Extended elements come first (lower precedence).
        assert_eq!(array.len(), 2);
        assert!(array[0].name.contains("./base.json"));

        let config = array.extract_config(dir.path().join("a.js")).unwrap();
        // The extending file wins the severity; the base supplies options.
        assert_eq!(config.rules["quotes"], json!(["error", "double"]));
    }

    #[test]
    fn test_extends_shareable_package() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-config-base/index.json",
            r#"{ "env": { "node": true } }"#,
        );
        let config_path = write(
            dir.path(),
            ".eslintrc.json",
            r#"{ "extends": "base" }"#,
        );

        let array = factory
            .load_file(config_path.to_str().unwrap(), LoadOptions::default())
            .unwrap();
        assert!(array[0].name.contains("eslint-config-base"));

        let config = array.extract_config(dir.path().join("a.js")).unwrap();
        assert_eq!(config.env["node"], json!(true));
    }

    #[test]
    fn test_extends_missing_reports_reference_trail() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        let config_path = write(
            dir.path(),
            ".eslintrc.json",
            r#"{ "extends": "nope" }"#,
        );

        let error = factory
            .load_file(config_path.to_str().unwrap(), LoadOptions::default())
            .unwrap_err();
        assert_eq!(error.template(), Some("extend-config-missing"));
        let message = error.to_string();
        assert!(message.contains("Failed to load config \"nope\""));
        assert!(message.contains("Referenced from:"));
        assert!(message.contains(".eslintrc.json"));
    }

    #[test]
    fn test_extends_builtin_recommended() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let array = factory
            .create(
                &json!({"extends": "eslint:recommended"}),
                CreateOptions {
                    name: Some("test".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(array.len(), 2);
        assert_eq!(array[0].name, "test » eslint:recommended");
        assert!(array[0].rules.as_ref().unwrap().contains_key("no-debugger"));
    }

    #[test]
    fn test_extends_unknown_builtin_is_missing_config() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let error = factory
            .create(
                &json!({"extends": "eslint:romantic"}),
                CreateOptions::default(),
            )
            .unwrap_err();
        assert_eq!(error.template(), Some("extend-config-missing"));
    }

    #[test]
    fn test_extends_plugin_preset() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-plugin-demo/index.json",
            r#"{
                "configs": {
                    "recommended": { "rules": { "demo/rule": "warn" } }
                }
            }"#,
        );

        let array = factory
            .create(
                &json!({"extends": "plugin:demo/recommended"}),
                CreateOptions {
                    name: Some("root".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(array.len(), 2);
        assert_eq!(array[0].name, "root » plugin:demo/recommended");
        assert_eq!(array[0].rules.as_ref().unwrap()["demo/rule"], json!("warn"));
    }

    #[test]
    fn test_extends_plugin_preset_missing_config() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-plugin-demo/index.json",
            r#"{ "configs": {} }"#,
        );

        let error = factory
            .create(
                &json!({"extends": "plugin:demo/nope"}),
                CreateOptions::default(),
            )
            .unwrap_err();
        assert_eq!(error.template(), Some("extend-config-missing"));
    }

    #[test]
    fn test_extends_plugin_without_config_name() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let error = factory
            .create(&json!({"extends": "plugin:demo"}), CreateOptions::default())
            .unwrap_err();
        assert_eq!(error.template(), Some("plugin-invalid"));
    }

    #[test]
    fn test_plugin_loading_and_id_invariant() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-plugin-demo/index.json",
            r#"{ "rules": { "my-rule": { "create": {} } } }"#,
        );

        let array = factory
            .create(&json!({"plugins": ["demo"]}), CreateOptions::default())
            .unwrap();

        let plugins = array[0].plugins.as_ref().unwrap();
        let dependency = &plugins["demo"];
        assert_eq!(dependency.id, "demo");
        assert!(dependency.definition.is_some());
        assert!(array.plugin_rules().contains_key("demo/my-rule"));
    }

    #[test]
    fn test_missing_plugin_is_captured_not_fatal() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let array = factory
            .create(
                &json!({
                    "plugins": ["ghost"],
                    "overrides": [
                        { "files": "*.special", "plugins": ["ghost"] }
                    ]
                }),
                CreateOptions::default(),
            )
            .unwrap();

        let dependency = &array[0].plugins.as_ref().unwrap()["ghost"];
        assert!(dependency.definition.is_none());
        assert_eq!(
            dependency.error.as_ref().unwrap().template(),
            Some("plugin-missing")
        );

        // The captured failure becomes fatal only when the plugin wins.
        let error = array.extract_config(dir.path().join("a.js")).unwrap_err();
        assert_eq!(error.template(), Some("plugin-missing"));
    }

    #[test]
    fn test_whitespace_plugin_name_captured() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let array = factory
            .create(&json!({"plugins": ["bad name"]}), CreateOptions::default())
            .unwrap();

        let plugins = array[0].plugins.as_ref().unwrap();
        let dependency = plugins.values().next().unwrap();
        assert_eq!(
            dependency.error.as_ref().unwrap().template(),
            Some("whitespace-found")
        );
    }

    #[test]
    fn test_additional_plugin_pool_short_circuits() {
        let dir = TempDir::new().unwrap();
        let definition = PluginDefinition::from_module_value(&json!({
            "rules": { "pool-rule": { "create": {} } }
        }));
        let factory = ConfigArrayFactory::with_options(ConfigArrayFactoryOptions {
            cwd: Some(dir.path().to_path_buf()),
            additional_plugin_pool: HashMap::from([(
                "eslint-plugin-pooled".to_string(),
                Arc::new(definition),
            )]),
            ..Default::default()
        });

        let array = factory
            .create(&json!({"plugins": ["pooled"]}), CreateOptions::default())
            .unwrap();
        assert!(array[0].plugins.as_ref().unwrap()["pooled"]
            .definition
            .is_some());
    }

    #[test]
    fn test_parser_loading() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/custom-parser/index.json",
            r#"{ "name": "custom-parser" }"#,
        );
        let config_path = write(
            dir.path(),
            ".eslintrc.json",
            r#"{ "parser": "custom-parser" }"#,
        );

        let array = factory
            .load_file(config_path.to_str().unwrap(), LoadOptions::default())
            .unwrap();
        let parser = array[0].parser.as_ref().unwrap();
        assert_eq!(parser.id, "custom-parser");
        assert!(parser.file_path.as_ref().unwrap().ends_with("index.json"));

        let config = array.extract_config(dir.path().join("a.js")).unwrap();
        assert_eq!(config.parser.as_ref().unwrap().id, "custom-parser");
    }

    #[test]
    fn test_file_extension_processors_emit_elements() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-plugin-markdown/index.json",
            r#"{ "processors": { ".md": {}, "named": {} } }"#,
        );

        let array = factory
            .create(&json!({"plugins": ["markdown"]}), CreateOptions::default())
            .unwrap();

        // One synthetic element for ".md"; nothing for the named processor.
        assert_eq!(array.len(), 2);
        let synthetic = &array[0];
        assert_eq!(synthetic.processor.as_deref(), Some("markdown/.md"));
        assert!(synthetic.criteria.is_some());

        let config = array.extract_config(dir.path().join("README.md")).unwrap();
        assert_eq!(config.processor.as_deref(), Some("markdown/.md"));
        let other = array.extract_config(dir.path().join("main.js")).unwrap();
        assert!(other.processor.is_none());
    }

    #[test]
    fn test_root_cutoff_skips_parent() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let parent = factory
            .create(
                &json!({"rules": {"from-parent": "error"}}),
                CreateOptions {
                    name: Some("parent".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        let child = factory
            .create(
                &json!({"root": true, "rules": {"from-child": "error"}}),
                CreateOptions {
                    name: Some("child".to_string()),
                    parent: Some(&parent),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(child.len(), 1);
        assert_eq!(child[0].name, "child");

        let composed = factory
            .create(
                &json!({"rules": {"from-child": "error"}}),
                CreateOptions {
                    name: Some("child".to_string()),
                    parent: Some(&parent),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(composed.len(), 2);
        assert_eq!(composed[0].name, "parent");
    }

    #[test]
    fn test_load_on_directory_probe_order() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(dir.path(), ".eslintrc.yaml", "rules:\n  semi: error\n");
        write(dir.path(), ".eslintrc.json", r#"{ "rules": { "semi": "off" } }"#);

        let array = factory
            .load_on_directory(dir.path(), LoadOptions::default())
            .unwrap();

        // YAML outranks JSON in the probe order.
        assert_eq!(array[0].rules.as_ref().unwrap()["semi"], json!("error"));
    }

    #[test]
    fn test_load_on_directory_skips_package_json_without_field() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(dir.path(), "package.json", r#"{ "name": "project" }"#);

        let array = factory
            .load_on_directory(dir.path(), LoadOptions::default())
            .unwrap();
        assert!(array.is_empty());
    }

    #[test]
    fn test_load_on_directory_reads_package_json_config() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "package.json",
            r#"{ "name": "project", "eslintConfig": { "env": { "node": true } } }"#,
        );

        let array = factory
            .load_on_directory(dir.path(), LoadOptions::default())
            .unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0].env.as_ref().unwrap()["node"], json!(true));
    }

    #[test]
    fn test_load_on_directory_propagates_broken_config() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(dir.path(), ".eslintrc.json", "{ broken");

        let error = factory
            .load_on_directory(dir.path(), LoadOptions::default())
            .unwrap_err();
        assert_eq!(error.template(), Some("failed-to-read-json"));
    }

    #[test]
    fn test_load_file_by_shareable_name() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-config-shared/index.json",
            r#"{ "rules": { "semi": "error" } }"#,
        );

        let array = factory
            .load_file("shared", LoadOptions::default())
            .unwrap();
        assert_eq!(array.len(), 1);
        assert_eq!(array[0].rules.as_ref().unwrap()["semi"], json!("error"));
    }

    #[test]
    fn test_load_file_missing() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);

        let error = factory
            .load_file("no-such-file.json", LoadOptions::default())
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn test_criteria_rebased_on_outermost_importer() {
        let dir = TempDir::new().unwrap();
        let factory = factory_for(&dir);
        write(
            dir.path(),
            "node_modules/eslint-config-base/index.json",
            r#"{
                "overrides": [
                    { "files": "src/*.ts", "rules": { "semi": "off" } }
                ]
            }"#,
        );
        let config_path = write(
            dir.path(),
            ".eslintrc.json",
            r#"{ "extends": "base" }"#,
        );

        let array = factory
            .load_file(config_path.to_str().unwrap(), LoadOptions::default())
            .unwrap();

        // The base package's override pattern is evaluated relative to the
        // project directory, not the package directory.
        let override_element = array
            .iter()
            .find(|e| e.criteria.is_some())
            .expect("override element");
        assert_eq!(
            override_element.criteria.as_ref().unwrap().base_path(),
            dir.path()
        );

        let config = array.extract_config(dir.path().join("src/a.ts")).unwrap();
        assert_eq!(config.rules["semi"], json!(["off"]));
        let other = array.extract_config(dir.path().join("lib/a.ts")).unwrap();
        assert!(!other.rules.contains_key("semi"));
    }
}
