//! Configuration file and module loading
//!
//! Config files are dispatched on their extension: JSON variants tolerate
//! JS-style comments, YAML uses the safe subset, the legacy extension-less
//! `.eslintrc` is comment-stripped YAML, and a `package.json` contributes
//! its nested `eslintConfig` field. Module files (plugins, parsers,
//! shareable-config entry points resolved to non-config names) load
//! through the same format set. Every load reads from disk; nothing is
//! cached, so on-disk edits are picked up by the next load.

use crate::error::LintrcError;
use crate::result::Result;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Load a configuration body from a config file.
///
/// Returns `Ok(None)` when the file is a `package.json` without an
/// `eslintConfig` field.
pub(crate) fn load_config_file(path: &Path) -> Result<Option<Value>> {
    let content = read_file(path)?;
    let extension = path.extension().and_then(|e| e.to_str());

    debug!("Loading config file {}", path.display());

    if path.file_name().and_then(|n| n.to_str()) == Some("package.json") {
        return load_package_json_config(&content, path);
    }

    let value = match extension {
        // Config modules are object-literal data; reading them from disk on
        // every load stands in for a cache-bypassing module load.
        Some("js") | Some("cjs") => parse_json5(&content, path, false)?,
        Some("json") => parse_json5(&content, path, true)?,
        Some("yaml") | Some("yml") => parse_yaml(&content, path)?,
        // Legacy ".eslintrc": YAML after stripping JS-style comments.
        _ => parse_yaml(&strip_json_comments(&content), path)?,
    };

    Ok(Some(value))
}

/// Load the value of a module file (plugin, parser, rule reference).
pub(crate) fn load_module_value(path: &Path) -> Result<Value> {
    let content = read_file(path)?;
    let extension = path.extension().and_then(|e| e.to_str());

    match extension {
        Some("yaml") | Some("yml") => parse_yaml(&content, path),
        _ => parse_json5(&content, path, false),
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| LintrcError::from_io(path, e))
}

fn load_package_json_config(content: &str, path: &Path) -> Result<Option<Value>> {
    let manifest = parse_json5(content, path, true)?;
    match manifest.get("eslintConfig") {
        Some(config) => Ok(Some(config.clone())),
        None => Ok(None),
    }
}

fn parse_json5(content: &str, path: &Path, json: bool) -> Result<Value> {
    json5::from_str(content).map_err(|e| {
        if json {
            LintrcError::read_json_error(path, e)
        } else {
            LintrcError::read_error(path, e)
        }
    })
}

fn parse_yaml(content: &str, path: &Path) -> Result<Value> {
    if content.trim().is_empty() {
        // An empty YAML config file is an empty record.
        return Ok(Value::Object(Default::default()));
    }
    let value: Value =
        serde_yaml::from_str(content).map_err(|e| LintrcError::read_error(path, e))?;
    match value {
        Value::Null => Ok(Value::Object(Default::default())),
        other => Ok(other),
    }
}

/// Strip `//` and `/* */` comments outside of string literals.
fn strip_json_comments(content: &str) -> String {
    let mut output = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            output.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                in_string = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = Some(c);
                output.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        output.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    // Keep newlines so YAML line structure survives.
                    if next == '\n' {
                        output.push('\n');
                    }
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => output.push(c),
        }
    }

    output
}
