//! Extraction behavior tests
//!
//! These tests exercise the merge semantics observable through
//! `ConfigArray::extract_config`: severity precedence, option backfill,
//! deep record merging, parser error disposition, and cache identity.

use lintrc_core::config::{ConfigArrayFactory, ConfigArrayFactoryOptions, CreateOptions};
use lintrc_core::{ConfigArray, ErrorKind};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn this_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/extraction_tests.rs")
}

fn factory_for(dir: &TempDir) -> ConfigArrayFactory {
    ConfigArrayFactory::with_options(ConfigArrayFactoryOptions {
        cwd: Some(dir.path().to_path_buf()),
        ..Default::default()
    })
}

/// Build an array from a sequence of config bodies, outermost first.
fn array_of(factory: &ConfigArrayFactory, bodies: &[serde_json::Value]) -> ConfigArray {
    let mut elements = Vec::new();
    for (index, body) in bodies.iter().enumerate() {
        let array = factory
            .create(
                body,
                CreateOptions {
                    name: Some(format!("config-{index}")),
                    ..Default::default()
                },
            )
            .unwrap();
        elements.extend(array.into_elements());
    }
    ConfigArray::new(elements)
}

#[test]
fn severity_override_keeps_inner_setting() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);
    let array = array_of(
        &factory,
        &[
            json!({"rules": {"r": [0, false]}}),
            json!({"rules": {"r": [1, true]}}),
        ],
    );

    let config = array.extract_config(this_file()).unwrap();
    assert_eq!(config.rules["r"], json!([1, true]));
}

#[test]
fn options_backfill_extends_severity_only_setting() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);
    let array = array_of(
        &factory,
        &[
            json!({"rules": {"r": [1, "n", "u"]}}),
            json!({"rules": {"r": "error"}}),
        ],
    );

    let config = array.extract_config(this_file()).unwrap();
    assert_eq!(config.rules["r"], json!(["error", "n", "u"]));
}

#[test]
fn parser_options_merge_deeply() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);
    let array = array_of(
        &factory,
        &[
            json!({"parserOptions": {"ecmaFeatures": {"jsx": true}}}),
            json!({"parserOptions": {"ecmaFeatures": {"globalReturn": true}}}),
        ],
    );

    let config = array.extract_config(this_file()).unwrap();
    assert_eq!(config.parser_options["ecmaFeatures"]["jsx"], json!(true));
    assert_eq!(
        config.parser_options["ecmaFeatures"]["globalReturn"],
        json!(true)
    );
}

#[test]
fn errored_parser_is_bypassed_when_criteria_do_not_match() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);

    // The parser does not exist; the element only applies to *.ts files.
    let array = factory
        .create(
            &json!({
                "overrides": [
                    { "files": "*.ts", "parser": "no-such-parser" }
                ]
            }),
            CreateOptions {
                file_path: Some(this_file()),
                name: Some("test".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    // Extracting for this .rs file never examines the broken parser.
    let config = array.extract_config(this_file()).unwrap();
    assert!(config.parser.is_none());
}

#[test]
fn errored_parser_overridden_by_winning_parser() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("node_modules/good-parser")).unwrap();
    std::fs::write(
        dir.path().join("node_modules/good-parser/index.json"),
        r#"{ "name": "good-parser" }"#,
    )
    .unwrap();

    let factory = factory_for(&dir);
    let config_path = dir.path().join(".eslintrc.json");
    std::fs::write(&config_path, "{}").unwrap();

    let outer = factory
        .create(
            &json!({"parser": "no-such-parser"}),
            CreateOptions {
                file_path: Some(config_path.clone()),
                ..Default::default()
            },
        )
        .unwrap();
    let array = factory
        .create(
            &json!({"parser": "good-parser"}),
            CreateOptions {
                file_path: Some(config_path),
                parent: Some(&outer),
                ..Default::default()
            },
        )
        .unwrap();

    // The inner parser wins before the broken one is ever examined.
    let config = array.extract_config(this_file()).unwrap();
    assert_eq!(config.parser.as_ref().unwrap().id, "good-parser");
}

#[test]
fn errored_parser_raises_when_it_wins() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);
    let array = array_of(&factory, &[json!({"parser": "no-such-parser"})]);

    let error = array.extract_config(this_file()).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::ModuleNotFound);
}

#[test]
fn extract_config_validates_path_argument() {
    let array = ConfigArray::default();

    let error = array.extract_config("not/absolute.js").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);
    assert!(error.to_string().contains("not/absolute.js"));
}

#[test]
fn extraction_cache_is_reference_identical() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);
    let array = array_of(
        &factory,
        &[json!({
            "rules": {"semi": "error"},
            "overrides": [ { "files": "*.ts", "rules": { "semi": "off" } } ]
        })],
    );

    let a = array.extract_config(this_file()).unwrap();
    let b = array.extract_config(this_file()).unwrap();
    assert!(Arc::ptr_eq(&a, &b));

    // A different file with the same matched indices shares the entry;
    // a file matching the override does not.
    let c = array.extract_config("/elsewhere/other.rs").unwrap();
    assert!(Arc::ptr_eq(&a, &c));
    let d = array.extract_config("/elsewhere/other.ts").unwrap();
    assert!(!Arc::ptr_eq(&a, &d));
}

#[test]
fn all_rule_settings_are_arrays_after_extraction() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);
    let array = array_of(
        &factory,
        &[json!({
            "rules": {
                "a": "off",
                "b": 2,
                "c": ["warn", {"max": 3}]
            }
        })],
    );

    let config = array.extract_config(this_file()).unwrap();
    for (rule_id, setting) in &config.rules {
        assert!(setting.is_array(), "rule {rule_id} is not in array form");
    }
    assert_eq!(config.rules["a"], json!(["off"]));
    assert_eq!(config.rules["b"], json!([2]));
    assert_eq!(config.rules["c"], json!(["warn", {"max": 3}]));
}

#[test]
fn criteria_depend_only_on_the_relative_path() {
    let dir = TempDir::new().unwrap();
    let factory = factory_for(&dir);

    let array = factory
        .create(
            &json!({
                "overrides": [ { "files": "src/*.js", "rules": { "semi": "error" } } ]
            }),
            CreateOptions {
                file_path: Some(dir.path().join(".eslintrc.json")),
                ..Default::default()
            },
        )
        .unwrap();

    let matching = array
        .extract_config(dir.path().join("src/app.js"))
        .unwrap();
    assert!(matching.rules.contains_key("semi"));

    let not_matching = array
        .extract_config(Path::new("/other/root/src/app.js"))
        .unwrap();
    assert!(!not_matching.rules.contains_key("semi"));
}
