//! Glob-based file match criteria for configuration elements
//!
//! An [`OverrideTester`] compiles the `files` / `excludedFiles` patterns of
//! an `overrides` entry and decides whether a given absolute file path is
//! covered by that entry. Testers compose with logical AND when an outer
//! config's criteria wrap an inner one, and every tester evaluates paths
//! relative to a base path (the directory of the outermost config file).

use crate::error::LintrcError;
use crate::result::Result;
use glob::{MatchOptions, Pattern};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::path::{Component, Path, PathBuf};

/// Match options for patterns that constrain the full relative path.
///
/// `require_literal_separator` keeps `*` from crossing directory
/// boundaries; dotfiles are matched like any other file.
const FULL_PATH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Match options for base-name patterns (no separator in the pattern).
const BASE_NAME_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// One compiled glob pattern, remembering its source text for diagnostics.
#[derive(Debug, Clone)]
struct CompiledPattern {
    source: String,
    pattern: Pattern,
    /// Patterns containing a separator match the whole relative path;
    /// separator-free patterns match on the base name only.
    full_path: bool,
}

impl CompiledPattern {
    fn compile(source: &str) -> Result<Self> {
        if Path::new(source).is_absolute() || has_parent_segment(source) {
            return Err(LintrcError::InvalidOverridePattern {
                pattern: source.to_string(),
            });
        }
        let pattern = Pattern::new(source).map_err(|e| LintrcError::ConfigError {
            message: format!("Invalid override pattern \"{source}\": {e}"),
        })?;
        Ok(Self {
            source: source.to_string(),
            pattern,
            full_path: source.contains('/'),
        })
    }

    fn matches(&self, relative: &Path) -> bool {
        if self.full_path {
            self.pattern.matches_path_with(relative, FULL_PATH_OPTIONS)
        } else {
            match relative.file_name() {
                Some(name) => self
                    .pattern
                    .matches_with(&name.to_string_lossy(), BASE_NAME_OPTIONS),
                None => false,
            }
        }
    }
}

/// A positive/negative pattern pair; either side may be unconstrained.
#[derive(Debug, Clone)]
struct PatternGroup {
    includes: Option<Vec<CompiledPattern>>,
    excludes: Option<Vec<CompiledPattern>>,
}

impl PatternGroup {
    fn matches(&self, relative: &Path) -> bool {
        let included = match &self.includes {
            Some(patterns) => patterns.iter().any(|p| p.matches(relative)),
            None => true,
        };
        let excluded = match &self.excludes {
            Some(patterns) => patterns.iter().any(|p| p.matches(relative)),
            None => false,
        };
        included && !excluded
    }
}

/// File-match criteria of one configuration element
///
/// Immutable after construction; `and` and `with_base_path` produce new
/// testers. A path matches only if every pattern group accepts it.
#[derive(Debug, Clone)]
pub struct OverrideTester {
    patterns: Vec<PatternGroup>,
    base_path: PathBuf,
}

impl OverrideTester {
    /// Compile criteria from `files` / `excludedFiles` pattern lists.
    ///
    /// Returns `Ok(None)` when both lists are empty (no constraint at all).
    /// Absolute patterns and patterns containing a `..` segment are
    /// rejected.
    pub fn create(
        files: &[String],
        excluded_files: &[String],
        base_path: &Path,
    ) -> Result<Option<OverrideTester>> {
        if files.is_empty() && excluded_files.is_empty() {
            return Ok(None);
        }

        let includes = compile_all(files)?;
        let excludes = compile_all(excluded_files)?;

        Ok(Some(OverrideTester {
            patterns: vec![PatternGroup { includes, excludes }],
            base_path: base_path.to_path_buf(),
        }))
    }

    /// Compose two testers with logical AND.
    ///
    /// The composed tester keeps the first operand's base path. An absent
    /// operand imposes no constraint, so the other operand is returned.
    pub fn and(a: Option<OverrideTester>, b: Option<OverrideTester>) -> Option<OverrideTester> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let mut patterns = a.patterns;
                patterns.extend(b.patterns);
                Some(OverrideTester {
                    patterns,
                    base_path: a.base_path,
                })
            }
            (Some(a), None) => Some(a),
            (None, b) => b,
        }
    }

    /// Rebind the base path the patterns are evaluated against.
    pub fn with_base_path(mut self, base_path: PathBuf) -> OverrideTester {
        self.base_path = base_path;
        self
    }

    /// The base path the patterns are evaluated against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Test whether an absolute file path matches every pattern group.
    pub fn test(&self, absolute_path: &Path) -> bool {
        let relative = relative_path(&self.base_path, absolute_path);
        self.patterns.iter().all(|group| group.matches(&relative))
    }
}

impl Serialize for OverrideTester {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct GroupRepr<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            includes: Option<Vec<&'a str>>,
            #[serde(skip_serializing_if = "Option::is_none")]
            excludes: Option<Vec<&'a str>>,
        }

        let groups: Vec<GroupRepr<'_>> = self
            .patterns
            .iter()
            .map(|g| GroupRepr {
                includes: g
                    .includes
                    .as_ref()
                    .map(|ps| ps.iter().map(|p| p.source.as_str()).collect()),
                excludes: g
                    .excludes
                    .as_ref()
                    .map(|ps| ps.iter().map(|p| p.source.as_str()).collect()),
            })
            .collect();

        let mut s = serializer.serialize_struct("OverrideTester", 2)?;
        s.serialize_field("basePath", &self.base_path)?;
        s.serialize_field("patterns", &groups)?;
        s.end()
    }
}

fn compile_all(sources: &[String]) -> Result<Option<Vec<CompiledPattern>>> {
    if sources.is_empty() {
        return Ok(None);
    }
    sources
        .iter()
        .map(|s| CompiledPattern::compile(s))
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

fn has_parent_segment(pattern: &str) -> bool {
    pattern
        .split(['/', '\\'])
        .any(|segment| segment == "..")
}

/// Compute the path of `target` relative to `base`, walking up with `..`
/// segments when `target` lies outside `base`.
fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base_components: Vec<Component<'_>> = base.components().collect();
    let target_components: Vec<Component<'_>> = target.components().collect();

    let mut shared = 0;
    while shared < base_components.len()
        && shared < target_components.len()
        && base_components[shared] == target_components[shared]
    {
        shared += 1;
    }

    let mut relative = PathBuf::new();
    for _ in shared..base_components.len() {
        relative.push("..");
    }
    for component in &target_components[shared..] {
        relative.push(component);
    }
    relative
}
