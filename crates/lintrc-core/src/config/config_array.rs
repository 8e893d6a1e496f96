//! Ordered configuration element lists with extraction caching
//!
//! A [`ConfigArray`] owns the normalized elements for one resolution
//! scope. Index 0 is the outermost (lowest precedence) element; the last
//! index is the innermost. Extraction selects the elements matching a file
//! and folds them with the merge engine, memoizing the result per matched
//! index set.

use super::dependency::PluginDefinition;
use super::element::ConfigArrayElement;
use super::extracted::ExtractedConfig;
use super::loader;
use super::merge;
use super::resolver::{FsModuleResolver, ModuleResolver};
use super::validate;
use crate::error::LintrcError;
use crate::result::Result;
use serde_json::{Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Deref;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, warn};

/// Rule references are chased through at most this many indirections.
const MAX_RULE_RESOLUTION_DEPTH: usize = 8;

/// Name-prefixed indices of the members contributed by all plugins of one
/// array
///
/// Keys are `"<pluginId>/<shortName>"`, or the bare short name when the
/// plugin id is empty. Initialized on first demand, immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct PluginMemberMaps {
    pub environments: BTreeMap<String, Value>,
    pub processors: BTreeMap<String, Value>,
    pub rules: BTreeMap<String, Value>,
}

/// An ordered list of configuration elements
///
/// Owns its extraction cache and plugin member maps; both are scoped to
/// this array's lifetime and never invalidated. Callers that re-load
/// configuration for a new run build a new array.
#[derive(Debug, Default)]
pub struct ConfigArray {
    elements: Vec<ConfigArrayElement>,
    cache: Mutex<HashMap<String, Arc<ExtractedConfig>>>,
    plugin_members: OnceLock<PluginMemberMaps>,
}

impl ConfigArray {
    /// Create an array from normalized elements, outermost first.
    pub fn new(elements: Vec<ConfigArrayElement>) -> Self {
        Self {
            elements,
            cache: Mutex::new(HashMap::new()),
            plugin_members: OnceLock::new(),
        }
    }

    /// Consume the array, returning its elements.
    pub fn into_elements(self) -> Vec<ConfigArrayElement> {
        self.elements
    }

    /// The effective `root` flag: the innermost element that declares a
    /// boolean `root` wins; `false` when none does.
    pub fn root(&self) -> bool {
        self.elements
            .iter()
            .rev()
            .find_map(|element| element.root)
            .unwrap_or(false)
    }

    /// Environments contributed by the plugins of this array.
    pub fn plugin_environments(&self) -> &BTreeMap<String, Value> {
        &self.members().environments
    }

    /// Processors contributed by the plugins of this array.
    pub fn plugin_processors(&self) -> &BTreeMap<String, Value> {
        &self.members().processors
    }

    /// Rule definitions contributed by the plugins of this array.
    pub fn plugin_rules(&self) -> &BTreeMap<String, Value> {
        &self.members().rules
    }

    /// Extract the merged config for an absolute file path.
    ///
    /// Two calls selecting the same element indices return the same
    /// `Arc` (reference-identical cached result).
    pub fn extract_config(&self, file_path: impl AsRef<Path>) -> Result<Arc<ExtractedConfig>> {
        let file_path = file_path.as_ref();
        if !file_path.is_absolute() {
            return Err(LintrcError::invalid_file_path(file_path.display()));
        }

        let indices = self.matched_indices(file_path);
        let cache_key = indices
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(",");

        if let Some(hit) = self.cache.lock().unwrap().get(&cache_key) {
            return Ok(Arc::clone(hit));
        }

        debug!(
            "No cached config for {}; merging indices [{cache_key}]",
            file_path.display()
        );
        let config = merge::create_config(&self.elements, &indices)?;

        let members = self.members();
        for &index in &indices {
            validate::validate_config_array_element(&self.elements[index], members)?;
        }

        let mut cache = self.cache.lock().unwrap();
        let entry = cache.entry(cache_key).or_insert_with(|| Arc::new(config));
        Ok(Arc::clone(entry))
    }

    /// Indices of the elements matching `file_path`, in merge order
    /// (highest precedence first).
    fn matched_indices(&self, file_path: &Path) -> Vec<usize> {
        (0..self.elements.len())
            .rev()
            .filter(|&index| match &self.elements[index].criteria {
                Some(criteria) => criteria.test(file_path),
                None => true,
            })
            .collect()
    }

    fn members(&self) -> &PluginMemberMaps {
        self.plugin_members.get_or_init(|| {
            let mut maps = PluginMemberMaps::default();
            let mut seen = HashSet::new();

            for element in &self.elements {
                let Some(plugins) = &element.plugins else {
                    continue;
                };
                for (plugin_id, dependency) in plugins {
                    let Some(definition) = &dependency.definition else {
                        continue;
                    };
                    if !seen.insert(plugin_id.clone()) {
                        continue;
                    }
                    collect_plugin_members(
                        &mut maps,
                        plugin_id,
                        definition,
                        dependency.file_path.as_deref(),
                    );
                }
            }

            maps
        })
    }
}

impl Deref for ConfigArray {
    type Target = [ConfigArrayElement];

    fn deref(&self) -> &Self::Target {
        &self.elements
    }
}

impl FromIterator<ConfigArrayElement> for ConfigArray {
    fn from_iter<I: IntoIterator<Item = ConfigArrayElement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

fn collect_plugin_members(
    maps: &mut PluginMemberMaps,
    plugin_id: &str,
    definition: &PluginDefinition,
    plugin_path: Option<&Path>,
) {
    for (name, value) in &definition.environments {
        maps.environments
            .insert(member_key(plugin_id, name), value.clone());
    }
    for (name, value) in &definition.processors {
        maps.processors
            .insert(member_key(plugin_id, name), value.clone());
    }
    for (name, value) in &definition.rules {
        maps.rules
            .insert(member_key(plugin_id, name), normalize_rule(value, plugin_path, 0));
    }
}

fn member_key(plugin_id: &str, short_name: &str) -> String {
    if plugin_id.is_empty() {
        short_name.to_string()
    } else {
        format!("{plugin_id}/{short_name}")
    }
}

/// Normalize a rule definition into record form.
///
/// A string is a module reference: resolve it relative to the plugin that
/// declared it and renormalize what it loads, bounded in depth against
/// pathological chains. Unresolvable references are kept as-is. Any other
/// non-record value is wrapped into a `{"create": ...}` record.
fn normalize_rule(value: &Value, importer: Option<&Path>, depth: usize) -> Value {
    if depth >= MAX_RULE_RESOLUTION_DEPTH {
        warn!("Rule reference chain exceeded {MAX_RULE_RESOLUTION_DEPTH} levels; keeping as-is");
        return value.clone();
    }

    match value {
        Value::String(request) => {
            let Some(importer) = importer else {
                return value.clone();
            };
            let loaded = FsModuleResolver::new()
                .resolve(request, importer)
                .and_then(|path| loader::load_module_value(&path).map(|v| (path, v)));
            match loaded {
                Ok((path, loaded)) => normalize_rule(&loaded, Some(&path), depth + 1),
                Err(error) => {
                    debug!("Unresolvable rule reference \"{request}\": {error}");
                    value.clone()
                }
            }
        }
        Value::Object(_) => value.clone(),
        other => json!({ "create": other.clone() }),
    }
}
