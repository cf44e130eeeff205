// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::{Path, PathBuf};

const PROCESSED_DIR: &str = "processed";
const LATEST_DIR: &str = "latest";
const MANIFEST_FILE: &str = "manifest.json";
const PACKAGE_CACHE_FILE: &str = ".package_cache.json";

/// directory holding one subdirectory per host.
pub(crate) fn processed_dir(manifests_dir: &Path) -> PathBuf {
    manifests_dir.join(PROCESSED_DIR)
}

pub(crate) fn manifest_file(manifests_dir: &Path, host_id: &str) -> PathBuf {
    processed_dir(manifests_dir)
        .join(host_id)
        .join(LATEST_DIR)
        .join(MANIFEST_FILE)
}

pub(crate) fn package_cache_file(mirror_dir: &Path, profile: &str, arch: &str, channel: &str) -> PathBuf {
    mirror_dir
        .join(profile)
        .join(arch)
        .join(channel)
        .join(PACKAGE_CACHE_FILE)
}
