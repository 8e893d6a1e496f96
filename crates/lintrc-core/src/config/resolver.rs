//! Module resolution for shareable configs, plugins, and parsers
//!
//! Configuration files refer to external modules by request string: a
//! relative or absolute path, or a bare package name. Resolution turns a
//! request plus the importing file into an absolute path; loading the
//! resolved file is the loader's concern. Hosts with their own resolution
//! scheme implement [`ModuleResolver`] and hand it to the factory.

use crate::error::LintrcError;
use crate::result::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions probed, in order, when a request omits one.
const MODULE_EXTENSIONS: &[&str] = &["json", "json5", "yaml", "yml", "js", "cjs"];

/// Resolves a module request to the absolute path of a module file
///
/// Failures to locate a module must be reported as
/// [`LintrcError::ModuleNotFound`] so callers can distinguish "missing"
/// from "broken".
pub trait ModuleResolver: fmt::Debug + Send + Sync {
    /// Resolve `request` as imported from the file `relative_to`.
    fn resolve(&self, request: &str, relative_to: &Path) -> Result<PathBuf>;
}

/// Filesystem-backed resolver
///
/// Relative and absolute requests resolve against the importer's
/// directory. Bare package names are searched in `node_modules`
/// directories walking up from the importer. A resolved directory is
/// entered through its `package.json` `"main"` field, falling back to
/// `index.*`.
#[derive(Debug, Clone, Default)]
pub struct FsModuleResolver;

impl FsModuleResolver {
    pub fn new() -> Self {
        Self
    }

    fn resolve_as_path(&self, candidate: &Path) -> Option<PathBuf> {
        if candidate.is_file() {
            return Some(candidate.to_path_buf());
        }

        // "foo" may mean "foo.json", "foo.yaml", ...
        if let Some(name) = candidate.file_name().and_then(|n| n.to_str()) {
            for ext in MODULE_EXTENSIONS {
                let with_ext = candidate.with_file_name(format!("{name}.{ext}"));
                if with_ext.is_file() {
                    return Some(with_ext);
                }
            }
        }

        if candidate.is_dir() {
            return self.resolve_as_directory(candidate);
        }

        None
    }

    fn resolve_as_directory(&self, dir: &Path) -> Option<PathBuf> {
        let manifest = dir.join("package.json");
        if manifest.is_file() {
            if let Ok(content) = std::fs::read_to_string(&manifest) {
                if let Ok(package) = serde_json::from_str::<serde_json::Value>(&content) {
                    if let Some(main) = package.get("main").and_then(|m| m.as_str()) {
                        if let Some(resolved) = self.resolve_as_path(&dir.join(main)) {
                            return Some(resolved);
                        }
                    }
                }
            }
        }

        self.resolve_as_path(&dir.join("index"))
    }
}

impl ModuleResolver for FsModuleResolver {
    fn resolve(&self, request: &str, relative_to: &Path) -> Result<PathBuf> {
        let importer_dir = relative_to.parent().unwrap_or(relative_to);

        let resolved = if Path::new(request).is_absolute() {
            self.resolve_as_path(Path::new(request))
        } else if request.starts_with("./") || request.starts_with("../") {
            self.resolve_as_path(&importer_dir.join(request))
        } else {
            // Bare package name: walk up through node_modules directories.
            let mut found = None;
            for dir in importer_dir.ancestors() {
                let candidate = dir.join("node_modules").join(request);
                if let Some(path) = self.resolve_as_path(&candidate) {
                    found = Some(path);
                    break;
                }
            }
            found
        };

        match resolved {
            Some(path) => {
                debug!("Resolved \"{request}\" to {}", path.display());
                Ok(path)
            }
            None => Err(LintrcError::module_not_found(request, relative_to)),
        }
    }
}
