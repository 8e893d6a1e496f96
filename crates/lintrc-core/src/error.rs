//! Error types and handling for configuration resolution

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for configuration resolution operations
///
/// Every variant carries owned data only, so captured errors can be stored
/// inside dependency records and re-raised later by cloning.
#[derive(Debug, Clone, Error)]
pub enum LintrcError {
    /// Configuration body or element failed validation
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A configuration file exists but could not be read or parsed
    #[error("Cannot read config file: {path}\nError: {message}")]
    ReadConfigFile { path: PathBuf, message: String },

    /// A JSON configuration file could not be parsed
    #[error("Cannot read config file: {path}\nError: {message}")]
    ReadJsonConfigFile { path: PathBuf, message: String },

    /// A referenced configuration file does not exist
    #[error("Config file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// A `package.json` file exists but has no `eslintConfig` field
    #[error("package.json file doesn't have \"eslintConfig\" field: {path}")]
    ConfigFieldNotFound { path: PathBuf },

    /// Module resolution failed to locate the requested module
    #[error("Cannot find module \"{request}\" from \"{importer}\"")]
    ModuleNotFound { request: String, importer: PathBuf },

    /// An `extends` reference did not resolve to a configuration
    #[error("Failed to load config \"{config_name}\" to extend from.")]
    ExtendConfigMissing {
        config_name: String,
        importer_name: String,
    },

    /// A `plugin:` extends reference is missing the config name part
    #[error("Invalid plugin config reference \"{extend_name}\" (expected \"plugin:<name>/<config>\").")]
    PluginInvalid {
        extend_name: String,
        importer_name: String,
    },

    /// A referenced plugin could not be resolved
    #[error("Failed to load plugin \"{plugin_name}\" declared in \"{importer_name}\".")]
    PluginMissing {
        plugin_name: String,
        resolve_plugins_relative_to: PathBuf,
        importer_name: String,
    },

    /// A plugin specifier contains whitespace
    #[error("Whitespace found in plugin name \"{plugin_name}\"")]
    WhitespaceFound { plugin_name: String },

    /// An override glob pattern is absolute or escapes its base path
    #[error("Invalid override pattern (expected relative path not containing '..'): {pattern}")]
    InvalidOverridePattern { pattern: String },

    /// `extract_config` was called with a non-absolute path
    #[error("'{value}' is not an absolute file path.")]
    InvalidFilePath { value: String },

    /// A nested failure annotated with the config that referenced it
    #[error("{source}\nReferenced from: {importer}")]
    ReferencedFrom {
        source: Box<LintrcError>,
        importer: String,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Read,
    FileNotFound,
    ConfigFieldNotFound,
    ModuleNotFound,
    ExtendConfigMissing,
    PluginInvalid,
    PluginMissing,
    Whitespace,
    InvalidPattern,
    InvalidArgument,
}

impl LintrcError {
    /// Get the error kind for this error
    ///
    /// A `ReferencedFrom` wrapper reports the kind of the underlying failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LintrcError::ConfigError { .. } => ErrorKind::Config,
            LintrcError::ReadConfigFile { .. } => ErrorKind::Read,
            LintrcError::ReadJsonConfigFile { .. } => ErrorKind::Read,
            LintrcError::FileNotFound { .. } => ErrorKind::FileNotFound,
            LintrcError::ConfigFieldNotFound { .. } => ErrorKind::ConfigFieldNotFound,
            LintrcError::ModuleNotFound { .. } => ErrorKind::ModuleNotFound,
            LintrcError::ExtendConfigMissing { .. } => ErrorKind::ExtendConfigMissing,
            LintrcError::PluginInvalid { .. } => ErrorKind::PluginInvalid,
            LintrcError::PluginMissing { .. } => ErrorKind::PluginMissing,
            LintrcError::WhitespaceFound { .. } => ErrorKind::Whitespace,
            LintrcError::InvalidOverridePattern { .. } => ErrorKind::InvalidPattern,
            LintrcError::InvalidFilePath { .. } => ErrorKind::InvalidArgument,
            LintrcError::ReferencedFrom { source, .. } => source.kind(),
        }
    }

    /// The named diagnostic template surfaced to host tooling, if any
    pub fn template(&self) -> Option<&'static str> {
        match self {
            LintrcError::ReadJsonConfigFile { .. } => Some("failed-to-read-json"),
            LintrcError::ExtendConfigMissing { .. } => Some("extend-config-missing"),
            LintrcError::PluginInvalid { .. } => Some("plugin-invalid"),
            LintrcError::PluginMissing { .. } => Some("plugin-missing"),
            LintrcError::WhitespaceFound { .. } => Some("whitespace-found"),
            LintrcError::ReferencedFrom { source, .. } => source.template(),
            _ => None,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Wrap a loader failure for the given config file
    pub fn read_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ReadConfigFile {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Wrap a JSON parse failure for the given config file
    pub fn read_json_error(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::ReadJsonConfigFile {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Classify an I/O failure while reading a config file
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::read_error(path, source)
        }
    }

    /// Create a module-not-found error
    pub fn module_not_found(request: impl Into<String>, importer: impl Into<PathBuf>) -> Self {
        Self::ModuleNotFound {
            request: request.into(),
            importer: importer.into(),
        }
    }

    /// Create an invalid-file-path error for `extract_config`
    pub fn invalid_file_path(value: impl std::fmt::Display) -> Self {
        Self::InvalidFilePath {
            value: value.to_string(),
        }
    }

    /// Annotate this error with the config that referenced the failing load
    pub fn referenced_from(self, importer: impl Into<String>) -> Self {
        Self::ReferencedFrom {
            source: Box::new(self),
            importer: importer.into(),
        }
    }
}
