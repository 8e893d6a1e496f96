//! lintrc core
//!
//! Hierarchical configuration resolution for the lintrc toolchain: given an
//! absolute source-file path, discover, order, and merge configuration
//! fragments from a directory hierarchy, shareable configuration packages,
//! plugin presets, and host-supplied overrides into one extracted
//! configuration.

pub mod config;
pub mod error;
pub mod result;

// Re-export commonly used types
pub use config::{
    ConfigArray, ConfigArrayElement, ConfigArrayFactory, ConfigArrayFactoryOptions,
    ConfigDependency, CreateOptions, ExtractedConfig, FsModuleResolver, LoadOptions,
    ModuleResolver, OverrideTester, ParserDependency, PluginDefinition, PluginDependency,
    PluginMemberMaps,
};
pub use error::{ErrorKind, LintrcError};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintrc=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
