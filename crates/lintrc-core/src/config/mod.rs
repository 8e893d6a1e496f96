//! Hierarchical configuration resolution
//!
//! This module turns configuration fragments discovered across a directory
//! hierarchy, shareable configuration packages, plugin presets, and
//! host-supplied overrides into a single merged configuration per source
//! file:
//!
//! - [`ConfigArrayFactory`] parses and normalizes configuration data into
//!   ordered [`ConfigArrayElement`]s, resolving `extends` chains and
//!   loading parsers and plugins along the way.
//! - [`ConfigArray`] holds the normalized elements for one scope, selects
//!   the elements matching a file through their [`OverrideTester`]
//!   criteria, folds them with the merge engine, and memoizes each result
//!   per matched index set.
//! - [`ExtractedConfig`] is the merged result handed to the rest of the
//!   toolchain.
//!
//! Loading is eager but failure is lazy: a parser or plugin that cannot be
//! loaded is captured in its [`ConfigDependency`] record and only aborts
//! resolution if it actually wins during extraction for a matching file.
//!
//! ## Example
//!
//! ```no_run
//! use lintrc_core::config::{ConfigArrayFactory, LoadOptions};
//! use std::path::Path;
//!
//! let factory = ConfigArrayFactory::new();
//! let array = factory.load_on_directory(Path::new("/project"), LoadOptions::default())?;
//! let config = array.extract_config("/project/src/main.js")?;
//! println!("{}", config.to_config_file_content());
//! # Ok::<(), lintrc_core::LintrcError>(())
//! ```

mod config_array;
mod dependency;
mod element;
pub mod environments;
mod extracted;
mod factory;
mod loader;
mod merge;
pub mod naming;
mod override_tester;
mod resolver;
pub mod validate;

pub use config_array::{ConfigArray, PluginMemberMaps};
pub use dependency::{ConfigDependency, ParserDependency, PluginDefinition, PluginDependency};
pub use element::ConfigArrayElement;
pub use extracted::ExtractedConfig;
pub use factory::{
    CONFIG_FILENAMES, ConfigArrayFactory, ConfigArrayFactoryOptions, CreateOptions, LoadOptions,
};
pub use override_tester::OverrideTester;
pub use resolver::{FsModuleResolver, ModuleResolver};
