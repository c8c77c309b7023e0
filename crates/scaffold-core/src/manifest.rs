//! Package manifest (`package.json`) types and the scripts amendment
//!
//! The manifest is an ordered-field record: serialization always emits the
//! recognized fields in the order they are declared on `PackageManifest`, and
//! anything serde does not recognize lands in `extra`, which is only written
//! back when explicitly requested.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// What to do with top-level fields `PackageManifest` does not recognize
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFields {
    /// Drop them silently
    #[default]
    Drop,
    /// Emit them after the canonical fields, in their original order
    Keep,
}

impl UnknownFields {
    pub fn from_keep_flag(keep: bool) -> Self {
        if keep {
            Self::Keep
        } else {
            Self::Drop
        }
    }
}

/// Recognized fields are kept as raw JSON so whatever type or `null` the
/// source used is written back unchanged; only their position is normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    /// Either a plain string or a `{name, email, url}` object
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub author: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub license: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub main: Option<Value>,

    /// The one field that is edited, so it has to be an object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts: Option<IndexMap<String, Value>>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,

    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub dev_dependencies: Option<Value>,

    /// Unrecognized top-level fields
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// `Some` whenever the key is present, `Some(Value::Null)` included.
/// Absent keys fall back to `None` through `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl PackageManifest {
    pub fn parse(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Overlay script entries; an existing entry with the same name is replaced
    pub fn merge_scripts(&mut self, overlay: &ScriptsOverlay) {
        let scripts = self.scripts.get_or_insert_with(IndexMap::new);
        for (name, command) in overlay.iter() {
            scripts.insert(name.to_string(), Value::from(command));
        }
    }

    /// Serialize with two-space indentation, canonical fields first
    pub fn to_canonical_json(&self, unknown: UnknownFields) -> serde_json::Result<String> {
        match unknown {
            UnknownFields::Keep => serde_json::to_string_pretty(self),
            UnknownFields::Drop => {
                let mut canonical = self.clone();
                canonical.extra.clear();
                serde_json::to_string_pretty(&canonical)
            }
        }
    }
}

/// Ordered (name, command) pairs merged into the manifest's `scripts`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptsOverlay(Vec<(String, String)>);

impl ScriptsOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, command: impl Into<String>) {
        self.0.push((name.into(), command.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for ScriptsOverlay {
    fn from_iter<I: IntoIterator<Item = (N, C)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
        )
    }
}

/// Parse `source`, merge `overlay` into its scripts and re-serialize canonically
pub fn amend(
    source: &str,
    overlay: &ScriptsOverlay,
    unknown: UnknownFields,
) -> serde_json::Result<String> {
    let mut manifest = PackageManifest::parse(source)?;
    manifest.merge_scripts(overlay);
    manifest.to_canonical_json(unknown)
}
