//! Declaration file formats
//!
//! Every reader turns its input into a `serde_json::Value`; schema checks
//! happen afterwards, the same way for all formats.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::ConfigError;

/// Supported declaration formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.releaserc.json`
    Json,
    /// `.releaserc.yaml` / `.releaserc.yml`
    Yaml,
    /// Extension-less `.releaserc`: JSON, falling back to YAML
    Rc,
    /// `release.config.js` and friends, static exports only
    StaticScript,
    /// The `release` key of `package.json`
    PackageJson,
}

impl ConfigFormat {
    /// Pick a format from a file name
    pub fn from_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        if file_name == "package.json" {
            return Some(Self::PackageJson);
        }
        if file_name == ".releaserc" {
            return Some(Self::Rc);
        }

        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "js" | "cjs" | "mjs" => Some(Self::StaticScript),
            _ => None,
        }
    }

    /// Get format name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Yaml => "YAML",
            Self::Rc => "releaserc",
            Self::StaticScript => "script",
            Self::PackageJson => "package.json",
        }
    }

    /// Read a document in this format; `path` is only used for error messages
    pub fn parse(&self, content: &str, path: &Path) -> Result<Value, ConfigError> {
        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        match self {
            Self::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string())),
            Self::Rc => match serde_json::from_str(content) {
                Ok(value) => Ok(value),
                Err(json_err) => {
                    debug!(error = %json_err, "releaserc is not JSON, trying YAML");
                    serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
                }
            },
            Self::StaticScript => {
                let literal = extract_static_export(content).map_err(|reason| {
                    ConfigError::DynamicScript {
                        path: path.to_path_buf(),
                        reason,
                    }
                })?;
                // An object literal is a YAML flow mapping: unquoted keys, either
                // quote style and trailing commas all read the same way.
                serde_yaml::from_str(&literal).map_err(|e| parse_error(e.to_string()))
            }
            Self::PackageJson => {
                let mut package: Value =
                    serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
                package
                    .get_mut("release")
                    .map(Value::take)
                    .ok_or_else(|| ConfigError::MissingReleaseKey(path.to_path_buf()))
            }
        }
    }
}

const EXPORT_MARKERS: &[&str] = &["module.exports", "export default"];

/// Pull the object literal out of a `module.exports = {...}` or
/// `export default {...}` script
///
/// Comments and a `'use strict'` directive may surround the export;
/// any other statement means the script needs evaluating.
pub fn extract_static_export(source: &str) -> Result<String, String> {
    let code = strip_comments(source)?;

    let (marker, start) = EXPORT_MARKERS
        .iter()
        .filter_map(|marker| code.find(marker).map(|pos| (*marker, pos)))
        .min_by_key(|(_, pos)| *pos)
        .ok_or_else(|| "no `module.exports` or `export default` found".to_string())?;

    let preamble = code[..start]
        .split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .find(|stmt| !matches!(*stmt, "'use strict'" | "\"use strict\""));
    if let Some(stmt) = preamble {
        let first_line = stmt.lines().next().unwrap_or(stmt);
        return Err(format!("unsupported statement before export: `{}`", first_line));
    }

    let mut body = code[start + marker.len()..].trim_start();
    if marker == "module.exports" {
        body = body
            .strip_prefix('=')
            .ok_or_else(|| "expected `=` after `module.exports`".to_string())?
            .trim_start();
    }

    let body = body.trim_end();
    let body = body.strip_suffix(';').unwrap_or(body).trim_end();

    if !body.starts_with('{') || !body.ends_with('}') {
        return Err("export is not an object literal".to_string());
    }
    if body.contains('`') {
        return Err("template literals need evaluating".to_string());
    }

    Ok(body.to_string())
}

/// Remove `//` and `/* ... */` comments that sit outside string literals
///
/// Line breaks inside comments are kept so the remaining text lines up with
/// the source.
fn strip_comments(source: &str) -> Result<String, String> {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == q {
                quote = None;
            } else if c == '\n' && q != '`' {
                return Err("unterminated string literal".to_string());
            }
            continue;
        }

        match (c, chars.peek().copied()) {
            ('\'' | '"' | '`', _) => {
                quote = Some(c);
                out.push(c);
            }
            ('/', Some('/')) => {
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                let mut closed = false;
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        closed = true;
                        break;
                    }
                    if next == '\n' {
                        out.push('\n');
                    }
                    prev = next;
                }
                if !closed {
                    return Err("unterminated block comment".to_string());
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    Ok(out)
}
