//! Download index parsing
//!
//! The index is shaped as
//! `{ "<channel>": { "version": "...", "<platform>": { "tarball": "<url>", ... } } }`.
//! Only the `master` channel is read.

use crate::error::{ZigboxError, ZigboxResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Channel holding the nightly builds
pub const MASTER_CHANNEL: &str = "master";

/// Every nightly tarball URL starts with this prefix
pub const BUILDS_URL_PREFIX: &str = "https://ziglang.org/builds/";

/// Every nightly tarball URL ends with this suffix
pub const TARBALL_SUFFIX: &str = ".tar.xz";

/// Metadata for one nightly build on one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildMetadata {
    /// Directory name the archive extracts to (e.g. `zig-x86_64-linux-0.14.0-dev.1+abc`)
    pub archive_name: String,
    /// Tarball URL exactly as listed in the index
    pub download_url: String,
    /// Nightly version, when the index lists a parseable one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<semver::Version>,
    /// SHA-256 of the tarball
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shasum: Option<String>,
    /// Tarball size in bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Parse an index document and pull out the nightly build for `platform_key`.
///
/// URLs must start with `url_prefix` and end with [`TARBALL_SUFFIX`].
pub fn parse_index(
    body: &str,
    platform_key: &str,
    url_prefix: &str,
) -> ZigboxResult<BuildMetadata> {
    let doc: Value = serde_json::from_str(body).map_err(|e| ZigboxError::MalformedIndex {
        reason: "index is not valid JSON".to_string(),
        source: Some(e),
    })?;

    let root = doc
        .as_object()
        .ok_or_else(|| ZigboxError::malformed("index root is not a JSON object"))?;
    let master = object_field(root, MASTER_CHANNEL, "index")?;
    let build = object_field(master, platform_key, MASTER_CHANNEL)?;

    let download_url = build
        .get("tarball")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ZigboxError::malformed(format!(
                "\"{MASTER_CHANNEL}.{platform_key}.tarball\" is missing or not a string"
            ))
        })?
        .to_string();

    let archive_name = archive_name(&download_url, url_prefix, TARBALL_SUFFIX)?.to_string();

    let version = master
        .get("version")
        .and_then(Value::as_str)
        .and_then(|v| semver::Version::parse(v).ok());
    let shasum = build.get("shasum").and_then(Value::as_str).map(str::to_string);
    let size = build.get("size").and_then(|v| match v {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    });

    Ok(BuildMetadata {
        archive_name,
        download_url,
        version,
        shasum,
        size,
    })
}

/// Strip `prefix` and `suffix` from a tarball URL.
///
/// Fails instead of guessing when either is absent or nothing is left.
pub fn archive_name<'a>(url: &'a str, prefix: &str, suffix: &str) -> ZigboxResult<&'a str> {
    let rest = url.strip_prefix(prefix).ok_or_else(|| {
        ZigboxError::malformed(format!("tarball URL {url} does not start with {prefix}"))
    })?;
    let name = rest.strip_suffix(suffix).ok_or_else(|| {
        ZigboxError::malformed(format!("tarball URL {url} does not end with {suffix}"))
    })?;

    if name.is_empty() || name.contains('/') {
        return Err(ZigboxError::malformed(format!(
            "tarball URL {url} has no usable archive name"
        )));
    }

    Ok(name)
}

fn object_field<'a>(
    parent: &'a Map<String, Value>,
    key: &str,
    parent_name: &str,
) -> ZigboxResult<&'a Map<String, Value>> {
    match parent.get(key) {
        Some(Value::Object(obj)) => Ok(obj),
        Some(_) => Err(ZigboxError::malformed(format!(
            "\"{key}\" in {parent_name} is not an object"
        ))),
        None => Err(ZigboxError::malformed(format!(
            "\"{key}\" not found in {parent_name}"
        ))),
    }
}
