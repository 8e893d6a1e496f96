//! Package-name normalization for shareable configs and plugins
//!
//! Shorthand names used in configuration files (`"foo"`, `"@scope"`,
//! `"@scope/foo"`) expand into the full package names they resolve to
//! (`"eslint-config-foo"`, `"@scope/eslint-config"`, ...), and full names
//! collapse back into the shorthand form used as plugin ids.

/// Expand a (possibly shorthand) package name into the prefixed full name.
///
/// Scopes are preserved: `@scope/foo` becomes `@scope/<prefix>-foo` and a
/// bare `@scope` becomes `@scope/<prefix>`. Names that already carry the
/// prefix are returned unchanged.
pub fn normalize_package_name(name: &str, prefix: &str) -> String {
    // Windows-style separators sneak in when configs are shared across
    // machines; normalize them before inspecting the name.
    let name = name.replace('\\', "/");

    if let Some(rest) = name.strip_prefix('@') {
        match rest.split_once('/') {
            // "@scope" or "@scope/" or "@scope/<prefix>"
            None => format!("@{rest}/{prefix}"),
            Some((scope, tail)) if tail.is_empty() || tail == prefix => {
                format!("@{scope}/{prefix}")
            }
            Some((scope, tail)) => {
                if has_prefix(tail, prefix) {
                    name.clone()
                } else {
                    format!("@{scope}/{prefix}-{tail}")
                }
            }
        }
    } else if has_prefix(&name, prefix) {
        name
    } else {
        format!("{prefix}-{name}")
    }
}

/// Collapse a full package name back into its shorthand form.
///
/// `eslint-plugin-foo` becomes `foo`, `@scope/eslint-plugin` becomes
/// `@scope`, and `@scope/eslint-plugin-foo` becomes `@scope/foo`. Names
/// without the prefix are returned unchanged.
pub fn get_shorthand_name(fullname: &str, prefix: &str) -> String {
    if let Some(rest) = fullname.strip_prefix('@') {
        if let Some((scope, tail)) = rest.split_once('/') {
            if tail == prefix {
                return format!("@{scope}");
            }
            if let Some(short) = tail.strip_prefix(prefix).and_then(|t| t.strip_prefix('-')) {
                return format!("@{scope}/{short}");
            }
        }
    } else if let Some(short) = fullname.strip_prefix(prefix).and_then(|t| t.strip_prefix('-')) {
        return short.to_string();
    }
    fullname.to_string()
}

/// Get the scope (`@scope/`) of a term, or the empty string if unscoped.
pub fn get_namespace_from_term(term: &str) -> &str {
    if term.starts_with('@') {
        if let Some(slash) = term.find('/') {
            return &term[..=slash];
        }
    }
    ""
}

/// True when the name equals `prefix` or starts with `prefix-`.
fn has_prefix(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('-'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bare_names() {
        assert_eq!(
            normalize_package_name("foo", "eslint-config"),
            "eslint-config-foo"
        );
        assert_eq!(
            normalize_package_name("eslint-config-foo", "eslint-config"),
            "eslint-config-foo"
        );
        assert_eq!(
            normalize_package_name("react", "eslint-plugin"),
            "eslint-plugin-react"
        );
    }

    #[test]
    fn test_normalize_scoped_names() {
        assert_eq!(
            normalize_package_name("@scope", "eslint-config"),
            "@scope/eslint-config"
        );
        assert_eq!(
            normalize_package_name("@scope/", "eslint-config"),
            "@scope/eslint-config"
        );
        assert_eq!(
            normalize_package_name("@scope/foo", "eslint-config"),
            "@scope/eslint-config-foo"
        );
        assert_eq!(
            normalize_package_name("@scope/eslint-config", "eslint-config"),
            "@scope/eslint-config"
        );
        assert_eq!(
            normalize_package_name("@scope/eslint-config-foo", "eslint-config"),
            "@scope/eslint-config-foo"
        );
    }

    #[test]
    fn test_normalize_backslashes() {
        assert_eq!(
            normalize_package_name("@scope\\foo", "eslint-plugin"),
            "@scope/eslint-plugin-foo"
        );
    }

    #[test]
    fn test_shorthand_names() {
        assert_eq!(get_shorthand_name("eslint-plugin-foo", "eslint-plugin"), "foo");
        assert_eq!(
            get_shorthand_name("@scope/eslint-plugin", "eslint-plugin"),
            "@scope"
        );
        assert_eq!(
            get_shorthand_name("@scope/eslint-plugin-foo", "eslint-plugin"),
            "@scope/foo"
        );
        assert_eq!(get_shorthand_name("plain", "eslint-plugin"), "plain");
    }

    #[test]
    fn test_namespace_from_term() {
        assert_eq!(get_namespace_from_term("@scope/foo"), "@scope/");
        assert_eq!(get_namespace_from_term("foo"), "");
        assert_eq!(get_namespace_from_term("@scope"), "");
    }
}
