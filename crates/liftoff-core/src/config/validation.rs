//! Structural validation of release declarations
//!
//! Decoding is all-or-nothing: the first violation is returned and no partial
//! configuration escapes.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SchemaError;
use crate::remote::RemoteUrl;

use super::types::{is_local_module, PluginOptions, PluginSpec, ReleaseConfig};

/// Top-level keys with a meaning of their own; everything else is a shared plugin option
pub const KNOWN_KEYS: &[&str] = &[
    "branches",
    "repositoryUrl",
    "plugins",
    "tagFormat",
    "dryRun",
    "ci",
];

/// Decode and validate a parsed document
pub fn decode_config(value: &Value) -> Result<ReleaseConfig, SchemaError> {
    debug!("validating release configuration");
    let map = value.as_object().ok_or_else(|| SchemaError::NotAMapping {
        found: kind(value).to_string(),
    })?;

    let branches = decode_branches(required(map, "branches")?)?;
    let (repository_url, remote) = decode_repository_url(required(map, "repositoryUrl")?)?;
    let plugins = decode_plugins(required(map, "plugins")?)?;

    let tag_format = optional_string(map, "tagFormat")?;
    if let Some(ref format) = tag_format {
        validate_tag_format(format)?;
    }
    let dry_run = optional_bool(map, "dryRun")?;
    let ci = optional_bool(map, "ci")?;

    let shared_options: PluginOptions = map
        .iter()
        .filter(|(key, _)| !KNOWN_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    debug!(
        branches = branches.len(),
        plugins = plugins.len(),
        shared_options = shared_options.len(),
        "release configuration validation passed"
    );

    Ok(ReleaseConfig {
        branches,
        repository_url,
        remote,
        plugins,
        tag_format,
        dry_run,
        ci,
        shared_options,
    })
}

/// Name of a JSON value's type, for error messages
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "mapping",
    }
}

fn required<'a>(map: &'a Map<String, Value>, field: &str) -> Result<&'a Value, SchemaError> {
    match map.get(field) {
        None | Some(Value::Null) => Err(SchemaError::MissingField(field.to_string())),
        Some(value) => Ok(value),
    }
}

fn wrong_type(field: impl Into<String>, expected: &str, found: &Value) -> SchemaError {
    SchemaError::WrongType {
        field: field.into(),
        expected: expected.to_string(),
        found: kind(found).to_string(),
    }
}

fn optional_string(map: &Map<String, Value>, field: &str) -> Result<Option<String>, SchemaError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(field, "string", other)),
    }
}

fn optional_bool(map: &Map<String, Value>, field: &str) -> Result<Option<bool>, SchemaError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(field, "boolean", other)),
    }
}

fn decode_branches(value: &Value) -> Result<Vec<String>, SchemaError> {
    let entries = value
        .as_array()
        .ok_or_else(|| wrong_type("branches", "array of branch names", value))?;
    if entries.is_empty() {
        return Err(SchemaError::Empty("branches".to_string()));
    }

    let mut seen = HashSet::new();
    let mut branches = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let field = format!("branches[{}]", i);
        let name = entry
            .as_str()
            .ok_or_else(|| wrong_type(field.clone(), "string", entry))?;

        validate_branch_name(name).map_err(|reason| SchemaError::InvalidBranch {
            field: field.clone(),
            name: name.to_string(),
            reason,
        })?;

        if !seen.insert(name) {
            return Err(SchemaError::DuplicateBranch(name.to_string()));
        }
        branches.push(name.to_string());
    }

    Ok(branches)
}

fn decode_repository_url(value: &Value) -> Result<(String, RemoteUrl), SchemaError> {
    let url = value
        .as_str()
        .ok_or_else(|| wrong_type("repositoryUrl", "string", value))?;
    if url.trim().is_empty() {
        return Err(SchemaError::Empty("repositoryUrl".to_string()));
    }

    let remote = RemoteUrl::parse(url).map_err(|e| SchemaError::InvalidRepositoryUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok((url.to_string(), remote))
}

fn decode_plugins(value: &Value) -> Result<Vec<PluginSpec>, SchemaError> {
    let entries = value
        .as_array()
        .ok_or_else(|| wrong_type("plugins", "array of plugin entries", value))?;
    if entries.is_empty() {
        return Err(SchemaError::Empty("plugins".to_string()));
    }

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| decode_plugin(i, entry))
        .collect()
}

fn decode_plugin(index: usize, entry: &Value) -> Result<PluginSpec, SchemaError> {
    let field = format!("plugins[{}]", index);
    match entry {
        Value::String(name) => {
            check_plugin_name(&field, name)?;
            Ok(PluginSpec::Named(name.clone()))
        }
        Value::Array(pair) => {
            if pair.len() != 2 {
                return Err(SchemaError::InvalidPlugin {
                    field,
                    reason: format!(
                        "expected a [name, options] pair, found {} element(s)",
                        pair.len()
                    ),
                });
            }

            let name_field = format!("{}[0]", field);
            let name = pair[0]
                .as_str()
                .ok_or_else(|| wrong_type(name_field.clone(), "string", &pair[0]))?;
            check_plugin_name(&name_field, name)?;

            let options = pair[1]
                .as_object()
                .ok_or_else(|| wrong_type(format!("{}[1]", field), "mapping", &pair[1]))?;

            Ok(PluginSpec::Configured(
                name.to_string(),
                options
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ))
        }
        other => Err(wrong_type(field, "string or [name, options] pair", other)),
    }
}

fn check_plugin_name(field: &str, name: &str) -> Result<(), SchemaError> {
    validate_plugin_name(name).map_err(|reason| SchemaError::InvalidPlugin {
        field: field.to_string(),
        reason,
    })
}

fn package_name() -> &'static Regex {
    static PACKAGE_NAME: OnceLock<Regex> = OnceLock::new();
    PACKAGE_NAME.get_or_init(|| {
        Regex::new(r"^(?:@[A-Za-z0-9~-][A-Za-z0-9._~-]*/)?[A-Za-z0-9~-][A-Za-z0-9._~-]*$")
            .expect("package name pattern is valid")
    })
}

/// Check a plugin identifier: a package name (optionally scoped) or a local module path
pub fn validate_plugin_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("plugin name must not be empty".to_string());
    }
    if is_local_module(name) {
        if name.starts_with("//") {
            return Err(format!("'{}' is not a module path", name));
        }
        if let Some(c) = name
            .chars()
            .find(|c| c.is_whitespace() || c.is_control() || matches!(*c, '\'' | '"' | '`'))
        {
            return Err(format!("'{}' contains {:?}", name, c));
        }
        return Ok(());
    }
    if !package_name().is_match(name) {
        return Err(format!(
            "'{}' is neither a package name nor a relative module path",
            name
        ));
    }
    Ok(())
}

/// Check a branch entry against git's ref-name rules
///
/// Glob metacharacters (`*`, `?`, `[`) are accepted and left for the release
/// engine to interpret.
pub fn validate_branch_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("branch name is empty".to_string());
    }
    if name == "@" {
        return Err("'@' is not a valid branch name".to_string());
    }
    if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("contains whitespace or control characters".to_string());
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '~' | '^' | ':' | '\\')) {
        return Err(format!("contains forbidden character '{}'", c));
    }
    for sequence in ["..", "@{", "//"] {
        if name.contains(sequence) {
            return Err(format!("contains '{}'", sequence));
        }
    }
    if name.starts_with('-') || name.starts_with('/') {
        return Err("must not start with '-' or '/'".to_string());
    }
    if name.ends_with('/') || name.ends_with('.') {
        return Err("must not end with '/' or '.'".to_string());
    }
    if name.ends_with(".lock") {
        return Err("must not end with '.lock'".to_string());
    }
    if name.split('/').any(|component| component.starts_with('.')) {
        return Err("path components must not start with '.'".to_string());
    }
    Ok(())
}

/// Check a tag format template
pub fn validate_tag_format(format: &str) -> Result<(), SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidTagFormat {
        format: format.to_string(),
        reason: reason.to_string(),
    };

    if format.matches("${version}").count() != 1 {
        return Err(invalid("must contain ${version} exactly once"));
    }
    if format.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Value {
        json!({
            "branches": ["main"],
            "repositoryUrl": "git@host:org/repo.git",
            "plugins": ["pluginA", ["pluginB", {"assets": ["CHANGELOG.md"]}]]
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut doc = base();
        doc[field] = value;
        doc
    }

    fn without(field: &str) -> Value {
        let mut doc = base();
        doc.as_object_mut().unwrap().remove(field);
        doc
    }

    #[test]
    fn test_scenario_loads() {
        let config = decode_config(&base()).unwrap();
        assert_eq!(config.branches(), ["main".to_string()]);
        assert_eq!(config.repository_url(), "git@host:org/repo.git");
        assert_eq!(config.plugins().len(), 2);

        let mut options = PluginOptions::new();
        options.insert("assets".to_string(), json!(["CHANGELOG.md"]));
        assert_eq!(
            config.plugins()[1],
            PluginSpec::Configured("pluginB".to_string(), options)
        );
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode_config(&base()).unwrap(), decode_config(&base()).unwrap());
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["branches", "repositoryUrl", "plugins"] {
            assert_eq!(
                decode_config(&without(field)),
                Err(SchemaError::MissingField(field.to_string())),
                "field {}",
                field
            );
        }
    }

    #[test]
    fn test_null_counts_as_missing() {
        assert_eq!(
            decode_config(&with("plugins", Value::Null)),
            Err(SchemaError::MissingField("plugins".to_string()))
        );
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert_eq!(
            decode_config(&json!(["main"])),
            Err(SchemaError::NotAMapping {
                found: "array".to_string()
            })
        );
    }

    #[test]
    fn test_empty_branches() {
        assert_eq!(
            decode_config(&with("branches", json!([]))),
            Err(SchemaError::Empty("branches".to_string()))
        );
    }

    #[test]
    fn test_branches_wrong_shape() {
        assert!(matches!(
            decode_config(&with("branches", json!("main"))),
            Err(SchemaError::WrongType { ref field, .. }) if field == "branches"
        ));
        assert!(matches!(
            decode_config(&with("branches", json!(["main", 3]))),
            Err(SchemaError::WrongType { ref field, .. }) if field == "branches[1]"
        ));
    }

    #[test]
    fn test_duplicate_branch() {
        assert_eq!(
            decode_config(&with("branches", json!(["main", "next", "main"]))),
            Err(SchemaError::DuplicateBranch("main".to_string()))
        );
    }

    #[test]
    fn test_invalid_branch_name() {
        let err = decode_config(&with("branches", json!(["main", "bad branch"]))).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidBranch { ref field, ref name, .. }
                if field == "branches[1]" && name == "bad branch"
        ));
    }

    #[test]
    fn test_empty_repository_url() {
        assert_eq!(
            decode_config(&with("repositoryUrl", json!("  "))),
            Err(SchemaError::Empty("repositoryUrl".to_string()))
        );
    }

    #[test]
    fn test_invalid_repository_url() {
        assert!(matches!(
            decode_config(&with("repositoryUrl", json!("just-a-name"))),
            Err(SchemaError::InvalidRepositoryUrl { .. })
        ));
        assert!(matches!(
            decode_config(&with("repositoryUrl", json!(42))),
            Err(SchemaError::WrongType { ref field, .. }) if field == "repositoryUrl"
        ));
    }

    #[test]
    fn test_empty_plugins() {
        assert_eq!(
            decode_config(&with("plugins", json!([]))),
            Err(SchemaError::Empty("plugins".to_string()))
        );
    }

    #[test]
    fn test_plugin_entry_wrong_type() {
        for bad in [json!(42), json!(true), json!({"path": "pluginA"}), json!(null)] {
            let err = decode_config(&with("plugins", json!(["pluginA", bad]))).unwrap_err();
            assert!(
                matches!(err, SchemaError::WrongType { ref field, .. } if field == "plugins[1]"),
                "unexpected error {:?}",
                err
            );
        }
    }

    #[test]
    fn test_plugin_pair_shape() {
        assert!(matches!(
            decode_config(&with("plugins", json!([["pluginB"]]))),
            Err(SchemaError::InvalidPlugin { ref field, .. }) if field == "plugins[0]"
        ));
        assert!(matches!(
            decode_config(&with("plugins", json!([["pluginB", {}, {}]]))),
            Err(SchemaError::InvalidPlugin { .. })
        ));
        assert!(matches!(
            decode_config(&with("plugins", json!([[1, {}]]))),
            Err(SchemaError::WrongType { ref field, .. }) if field == "plugins[0][0]"
        ));
        assert!(matches!(
            decode_config(&with("plugins", json!([["pluginB", ["CHANGELOG.md"]]]))),
            Err(SchemaError::WrongType { ref field, .. }) if field == "plugins[0][1]"
        ));
    }

    #[test]
    fn test_plugin_name_rules() {
        assert!(validate_plugin_name("@semantic-release/git").is_ok());
        assert!(validate_plugin_name("semantic-release-export-data").is_ok());
        assert!(validate_plugin_name("./release/plugin.js").is_ok());
        assert!(validate_plugin_name("").is_err());
        assert!(validate_plugin_name("two words").is_err());
        assert!(validate_plugin_name("@scope/").is_err());
    }

    #[test]
    fn test_local_plugin_path_rules() {
        assert!(validate_plugin_name("/opt/release/plugin.js").is_ok());
        assert!(validate_plugin_name("../shared/plugin").is_ok());
        assert!(validate_plugin_name("// analyze '@semantic-release/github'").is_err());
        assert!(validate_plugin_name("//analyze").is_err());
        assert!(validate_plugin_name("/ plugins/notify.js").is_err());
        assert!(validate_plugin_name("./plugin name.js").is_err());
        assert!(validate_plugin_name("./'quoted'.js").is_err());

        let err = decode_config(&with("plugins", json!(["/ x"]))).unwrap_err();
        assert_eq!(err.field(), Some("plugins[0]"));
    }

    #[test]
    fn test_branch_name_rules() {
        for ok in ["main", "next", "release/1.x", "+([0-9])?(.{+([0-9]),x}).x", "beta"] {
            assert!(validate_branch_name(ok).is_ok(), "{} should be valid", ok);
        }
        for bad in [
            "",
            "@",
            "-main",
            "/main",
            "main/",
            "main.",
            "main.lock",
            "feature..x",
            "a//b",
            "ref@{1}",
            "x:y",
            "x~1",
            "x^2",
            "feature/.hidden",
            ".hidden",
        ] {
            assert!(validate_branch_name(bad).is_err(), "{} should be invalid", bad);
        }
    }

    #[test]
    fn test_tag_format() {
        assert!(decode_config(&with("tagFormat", json!("v${version}"))).is_ok());
        assert!(matches!(
            decode_config(&with("tagFormat", json!("latest"))),
            Err(SchemaError::InvalidTagFormat { .. })
        ));
        assert!(matches!(
            decode_config(&with("tagFormat", json!("${version}-${version}"))),
            Err(SchemaError::InvalidTagFormat { .. })
        ));
        assert!(matches!(
            decode_config(&with("tagFormat", json!(["v${version}"]))),
            Err(SchemaError::WrongType { .. })
        ));
    }

    #[test]
    fn test_optional_flags() {
        let mut doc = base();
        doc["dryRun"] = json!(true);
        doc["ci"] = json!(false);
        let config = decode_config(&doc).unwrap();
        assert_eq!(config.dry_run(), Some(true));
        assert_eq!(config.ci(), Some(false));

        assert!(matches!(
            decode_config(&with("dryRun", json!("yes"))),
            Err(SchemaError::WrongType { ref field, .. }) if field == "dryRun"
        ));
    }

    #[test]
    fn test_unknown_keys_become_shared_options() {
        let config = decode_config(&with("preset", json!("angular"))).unwrap();
        assert_eq!(config.shared_options().get("preset"), Some(&json!("angular")));
        assert!(!config.shared_options().contains_key("branches"));
    }
}
