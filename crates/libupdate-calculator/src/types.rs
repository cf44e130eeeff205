// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer, ser::SerializeStruct};

use crate::{Result, nevra, version};

/// placeholder used for host fields that could not be determined.
pub const UNKNOWN: &str = "unknown";

/// value substituted for any epoch, version or release missing from a record.
const MISSING_FIELD: &str = "0";

/// available packages of one repository channel, keyed by `"{name}.{arch}"`.
pub type PackageCache = HashMap<String, RepoPackage>;

/// epoch, version and release of one package build, as recorded on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Evr {
    pub epoch: String,
    pub version: String,
    pub release: String,
}

impl Evr {
    pub fn new(
        epoch: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
    ) -> Self {
        Self {
            epoch: epoch.into(),
            version: version.into(),
            release: release.into(),
        }
    }

    /// builds an evr from optional record fields, defaulting each missing one to `"0"`.
    pub fn from_fields(epoch: Option<&str>, version: Option<&str>, release: Option<&str>) -> Self {
        Self::new(
            epoch.unwrap_or(MISSING_FIELD),
            version.unwrap_or(MISSING_FIELD),
            release.unwrap_or(MISSING_FIELD),
        )
    }

    pub fn epoch_value(&self) -> Result<u64> {
        version::normalize_epoch(&self.epoch)
    }

    /// renders `epoch:version-release`, omitting a zero epoch.
    pub fn to_evr_string(&self) -> Result<String> {
        nevra::format_evr(self.epoch.as_str(), &self.version, &self.release)
    }
}

/// an installed package for which the mirror carries a newer build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUpdate {
    pub name: String,
    pub arch: String,
    pub channel: String,
    pub installed: Evr,
    pub available: Evr,
}

impl PackageUpdate {
    pub fn new(
        name: impl Into<String>,
        arch: impl Into<String>,
        channel: impl Into<String>,
        installed: Evr,
        available: Evr,
    ) -> Self {
        Self {
            name: name.into(),
            arch: arch.into(),
            channel: channel.into(),
            installed,
            available,
        }
    }

    pub fn installed_evr(&self) -> Result<String> {
        self.installed.to_evr_string()
    }

    pub fn available_evr(&self) -> Result<String> {
        self.available.to_evr_string()
    }
}

/// outcome of the update computation for a single host.
///
/// errors describe partial failures; a result carrying errors is still
/// valid output and may hold updates found on other channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult {
    pub host_id: String,
    pub profile: String,
    pub os_id: String,
    pub os_version: String,
    pub computed_at: String,
    pub updates: Vec<PackageUpdate>,
    pub errors: Vec<String>,
}

impl UpdateResult {
    pub fn new(
        host_id: impl Into<String>,
        profile: impl Into<String>,
        os_id: impl Into<String>,
        os_version: impl Into<String>,
        computed_at: impl Into<String>,
    ) -> Self {
        Self {
            host_id: host_id.into(),
            profile: profile.into(),
            os_id: os_id.into(),
            os_version: os_version.into(),
            computed_at: computed_at.into(),
            updates: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// result for a host whose manifest could not be used at all.
    pub fn unknown_host(
        host_id: impl Into<String>,
        computed_at: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        let mut result = Self::new(host_id, UNKNOWN, UNKNOWN, UNKNOWN, computed_at);
        result.add_error(error);
        result
    }

    pub fn update_count(&self) -> usize {
        self.updates.len()
    }

    pub fn has_updates(&self) -> bool {
        !self.updates.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn add_update(&mut self, update: PackageUpdate) {
        self.updates.push(update);
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    /// pretty-printed json with two-space indentation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for UpdateResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("UpdateResult", 8)?;
        state.serialize_field("host_id", &self.host_id)?;
        state.serialize_field("profile", &self.profile)?;
        state.serialize_field("os_id", &self.os_id)?;
        state.serialize_field("os_version", &self.os_version)?;
        state.serialize_field("computed_at", &self.computed_at)?;
        state.serialize_field("update_count", &self.update_count())?;
        state.serialize_field("updates", &self.updates)?;
        state.serialize_field("errors", &self.errors)?;
        state.end()
    }
}

/// host manifest as written by the inventory collector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub host_id: Option<String>,
    #[serde(default)]
    pub os_release: OsRelease,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub packages: Vec<InstalledPackage>,
}

/// reads an explicit `null` list as an empty one.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsRelease {
    #[serde(default = "unknown")]
    pub id: String,
    #[serde(default = "unknown")]
    pub version: String,
}

impl Default for OsRelease {
    fn default() -> Self {
        Self {
            id: unknown(),
            version: unknown(),
        }
    }
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// one entry of a manifest's package list; every field may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstalledPackage {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub epoch: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub release: Option<String>,
}

impl InstalledPackage {
    /// the repository cache key, if both name and arch are present and non-empty.
    pub fn cache_key(&self) -> Option<String> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;
        let arch = self.arch.as_deref().filter(|a| !a.is_empty())?;
        Some(format!("{name}.{arch}"))
    }

    pub fn evr(&self) -> Evr {
        Evr::from_fields(
            self.epoch.as_deref(),
            self.version.as_deref(),
            self.release.as_deref(),
        )
    }
}

/// an available package entry in a repository channel cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoPackage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arch: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub epoch: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string::deserialize")]
    pub release: Option<String>,
}

impl RepoPackage {
    pub fn new(epoch: &str, version: &str, release: &str) -> Self {
        Self {
            epoch: Some(epoch.to_string()),
            version: Some(version.to_string()),
            release: Some(release.to_string()),
            ..Default::default()
        }
    }

    /// true when the entry carries no version information at all.
    pub fn is_empty(&self) -> bool {
        self.epoch.is_none() && self.version.is_none() && self.release.is_none()
    }

    pub fn evr(&self) -> Evr {
        Evr::from_fields(
            self.epoch.as_deref(),
            self.version.as_deref(),
            self.release.as_deref(),
        )
    }
}

/// fleet-level report folded from many host results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSummary {
    pub generated_at: String,
    pub total_hosts: usize,
    pub hosts_with_updates: usize,
    pub total_updates: usize,
    pub hosts: Vec<HostSummary>,
}

impl FleetSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    pub host_id: String,
    pub profile: String,
    pub update_count: usize,
}

/// current UTC time as ISO-8601 with a `Z` suffix.
pub(crate) fn timestamp_now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}

/// accepts json strings as well as integers for version-like fields.
mod lenient_string {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(raw.map(|r| match r {
            Raw::Text(s) => s,
            Raw::Unsigned(n) => n.to_string(),
            Raw::Signed(n) => n.to_string(),
        }))
    }
}
