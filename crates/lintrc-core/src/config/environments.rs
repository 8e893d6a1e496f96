//! Built-in environment definitions
//!
//! Environments declare the globals a runtime provides. Configuration
//! bodies turn them on by name (`env: { browser: true }`); element
//! validation checks every name against this table plus the environments
//! contributed by loaded plugins.

use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// The built-in environment table, keyed by environment name.
///
/// Each definition has the same shape plugin-provided environments use: a
/// `globals` record and, for the `es*` family, `parserOptions` carrying the
/// implied language level.
pub fn builtin_environments() -> &'static BTreeMap<String, Value> {
    static ENVIRONMENTS: OnceLock<BTreeMap<String, Value>> = OnceLock::new();
    ENVIRONMENTS.get_or_init(|| {
        let mut map = BTreeMap::new();

        map.insert(
            "builtin".to_string(),
            json!({ "globals": { "Array": false, "Boolean": false, "JSON": false, "Math": false, "Object": false, "String": false, "undefined": false } }),
        );
        map.insert(
            "browser".to_string(),
            json!({ "globals": { "window": false, "document": false, "navigator": false, "console": false, "fetch": false, "localStorage": false } }),
        );
        map.insert(
            "node".to_string(),
            json!({ "globals": { "global": false, "process": false, "require": false, "module": false, "__dirname": false, "__filename": false, "Buffer": false, "console": false } }),
        );
        map.insert(
            "commonjs".to_string(),
            json!({ "globals": { "exports": true, "module": false, "require": false, "global": false } }),
        );
        map.insert(
            "shared-node-browser".to_string(),
            json!({ "globals": { "clearInterval": false, "clearTimeout": false, "console": false, "setInterval": false, "setTimeout": false, "URL": false } }),
        );
        map.insert(
            "worker".to_string(),
            json!({ "globals": { "self": false, "postMessage": false, "importScripts": false } }),
        );
        map.insert(
            "serviceworker".to_string(),
            json!({ "globals": { "self": false, "caches": false, "clients": false, "registration": false } }),
        );
        map.insert(
            "amd".to_string(),
            json!({ "globals": { "define": false, "require": false } }),
        );
        map.insert(
            "es6".to_string(),
            json!({ "globals": { "Promise": false, "Symbol": false, "Map": false, "Set": false, "WeakMap": false, "WeakSet": false, "Proxy": false, "Reflect": false }, "parserOptions": { "ecmaVersion": 6 } }),
        );
        map.insert(
            "es2017".to_string(),
            json!({ "globals": { "Atomics": false, "SharedArrayBuffer": false }, "parserOptions": { "ecmaVersion": 2017 } }),
        );
        map.insert(
            "es2020".to_string(),
            json!({ "globals": { "BigInt": false, "globalThis": false }, "parserOptions": { "ecmaVersion": 2020 } }),
        );
        map.insert(
            "es2021".to_string(),
            json!({ "globals": { "AggregateError": false, "FinalizationRegistry": false, "WeakRef": false }, "parserOptions": { "ecmaVersion": 2021 } }),
        );
        map.insert(
            "mocha".to_string(),
            json!({ "globals": { "describe": false, "it": false, "before": false, "after": false, "beforeEach": false, "afterEach": false } }),
        );
        map.insert(
            "jest".to_string(),
            json!({ "globals": { "describe": false, "it": false, "test": false, "expect": false, "jest": false, "beforeEach": false, "afterEach": false } }),
        );
        map.insert(
            "jasmine".to_string(),
            json!({ "globals": { "describe": false, "it": false, "expect": false, "spyOn": false, "jasmine": false } }),
        );
        map.insert(
            "qunit".to_string(),
            json!({ "globals": { "QUnit": false, "asyncTest": false, "deepEqual": false, "module": false, "test": false } }),
        );

        map
    })
}

/// Look up a built-in environment by name.
pub fn get_builtin_environment(name: &str) -> Option<&'static Value> {
    builtin_environments().get(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_environments_present() {
        for name in ["browser", "node", "es6", "commonjs", "jest"] {
            assert!(
                get_builtin_environment(name).is_some(),
                "missing environment {name}"
            );
        }
        assert!(get_builtin_environment("flash").is_none());
    }

    #[test]
    fn test_environment_shape() {
        let env = get_builtin_environment("es6").unwrap();
        assert!(env["globals"].is_object());
        assert_eq!(env["parserOptions"]["ecmaVersion"], 6);
    }
}
