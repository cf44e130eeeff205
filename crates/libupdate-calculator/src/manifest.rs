// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fs, path::Path};

use crate::{Error, Result, paths, types::Manifest};

/// reads the latest manifest of a host.
///
/// returns `Ok(None)` when the host has no manifest on disk.
pub fn load_manifest(manifests_dir: &Path, host_id: &str) -> Result<Option<Manifest>> {
    let path = paths::manifest_file(manifests_dir, host_id);

    if !path.exists() {
        log::warn!(target: "manifest", "manifest not found for host: {host_id}");
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|e| Error::manifest_read(host_id, e))?;
    let manifest = serde_json::from_str(&content).map_err(|e| Error::manifest_read(host_id, e))?;

    Ok(Some(manifest))
}

/// lazily lists host ids, one per directory under `processed/`.
///
/// hosts come out in filesystem enumeration order, which is not stable.
/// a missing `processed/` directory yields no hosts.
pub fn host_ids(manifests_dir: &Path) -> impl Iterator<Item = String> + use<> {
    let processed = paths::processed_dir(manifests_dir);

    let entries = match fs::read_dir(&processed) {
        Ok(entries) => Some(entries),
        Err(e) => {
            log::warn!(
                target: "manifest",
                "no processed manifests directory at {}: {e}",
                processed.display()
            );
            None
        }
    };

    entries
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write_manifest(dir: &Path, host_id: &str, content: &str) {
        let path = paths::manifest_file(dir, host_id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_load_manifest() {
        let dir = TempDir::new().unwrap();
        write_manifest(
            dir.path(),
            "web-01",
            r#"{"host_id": "web-01", "os_release": {"id": "rhel", "version": "9.6"},
                "packages": [{"name": "bash", "arch": "x86_64", "epoch": "0", "version": "5.1.8", "release": "6.el9"}]}"#,
        );

        let manifest = load_manifest(dir.path(), "web-01").unwrap().unwrap();
        assert_eq!(manifest.host_id.as_deref(), Some("web-01"));
        assert_eq!(manifest.os_release.id, "rhel");
        assert_eq!(manifest.os_release.version, "9.6");
        assert_eq!(manifest.packages.len(), 1);
    }

    #[test]
    fn test_load_manifest_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(load_manifest(dir.path(), "nonexistent-host").unwrap().is_none());
    }

    #[test]
    fn test_load_manifest_malformed() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "broken", "{ not json");

        let err = load_manifest(dir.path(), "broken").unwrap_err();
        assert!(matches!(err, Error::ManifestRead { ref host_id, .. } if host_id == "broken"));
    }

    #[test]
    fn test_host_ids_lists_directories_only() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "a", "{}");
        write_manifest(dir.path(), "b", "{}");
        fs::write(paths::processed_dir(dir.path()).join("stray.json"), "{}").unwrap();

        let mut hosts: Vec<String> = host_ids(dir.path()).collect();
        hosts.sort();
        assert_eq!(hosts, vec!["a", "b"]);
    }

    #[test]
    fn test_host_ids_without_processed_dir() {
        let dir = TempDir::new().unwrap();
        assert_eq!(host_ids(dir.path()).count(), 0);
    }
}
