use crate::{Error, NetworkPolicy};
use serde::Deserialize;
use serde_yaml::Value;
use std::{fs, path::Path};
use tracing::debug;

/// Loads the first NetworkPolicy document from a (possibly multi-document)
/// YAML manifest.
pub fn load_policy(path: &Path) -> Result<NetworkPolicy, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;

    find_policy(&text)
        .map_err(|source| Error::DecodeManifest {
            path: path.to_path_buf(),
            source,
        })?
        .ok_or_else(|| Error::PolicyNotInManifest {
            path: path.to_path_buf(),
        })
}

/// Scans the manifest's documents for one of kind `NetworkPolicy`. Documents
/// of other kinds are skipped; an undecodable document is an error.
fn find_policy(text: &str) -> Result<Option<NetworkPolicy>, serde_yaml::Error> {
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;
        match value.get("kind").and_then(Value::as_str) {
            Some("NetworkPolicy") => return serde_yaml::from_value(value).map(Some),
            Some(kind) => debug!(%kind, "skipping document"),
            None => {}
        }
    }
    Ok(None)
}
