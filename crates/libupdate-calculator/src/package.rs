// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{cmp::Ordering, fmt, str::FromStr};

use crate::{
    Error, Result, nevra,
    types::Evr,
    version::{compare_version_strings, normalize_epoch},
};

/// identity of one package build: name, epoch, version, release and arch.
///
/// builds are ordered only against builds of the same name and arch, which
/// is why this type offers [`PackageVersion::compare`] instead of `Ord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageVersion {
    name: String,
    epoch: u64,
    version: String,
    release: String,
    arch: String,
}

impl PackageVersion {
    pub fn new(
        name: impl Into<String>,
        epoch: u64,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let version = version.into();
        let release = release.into();
        let arch = arch.into();

        if name.is_empty() {
            return Err(Error::invalid_package("package name is empty"));
        }
        check_field("version", &version, &['-'])?;
        check_field("release", &release, &['-'])?;
        check_field("arch", &arch, &['-', '.'])?;

        Ok(Self {
            name,
            epoch,
            version,
            release,
            arch,
        })
    }

    /// builds a package from a textual epoch such as `"(none)"`, `""` or `"2"`.
    pub fn from_raw(name: &str, epoch: &str, version: &str, release: &str, arch: &str) -> Result<Self> {
        Self::new(name, normalize_epoch(epoch)?, version, release, arch)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    /// `epoch:version-release`, with the epoch omitted when zero.
    pub fn evr(&self) -> String {
        nevra::render_evr(self.epoch, &self.version, &self.release)
    }

    pub fn nvra(&self) -> String {
        format!("{}-{}-{}.{}", self.name, self.version, self.release, self.arch)
    }

    /// full nevra; the epoch is always present, even when zero.
    pub fn nevra(&self) -> String {
        format!(
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }

    pub fn to_evr(&self) -> Evr {
        Evr::new(self.epoch.to_string(), &self.version, &self.release)
    }

    /// orders two builds of the same package by epoch, version, then release.
    ///
    /// returns [`Error::IncomparablePackages`] when name or arch differ.
    pub fn compare(&self, other: &Self) -> Result<Ordering> {
        if self.name != other.name || self.arch != other.arch {
            return Err(Error::incomparable(self.nevra(), other.nevra()));
        }

        Ok(self
            .epoch
            .cmp(&other.epoch)
            .then_with(|| compare_version_strings(&self.version, &other.version))
            .then_with(|| compare_version_strings(&self.release, &other.release)))
    }

    pub fn is_newer_than(&self, other: &Self) -> Result<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }
}

/// version, release and arch must be non-empty and free of the characters
/// that delimit them in a nevra string.
fn check_field(field: &str, value: &str, forbidden: &[char]) -> Result<()> {
    if value.is_empty() {
        return Err(Error::invalid_package(format!("{field} is empty")));
    }
    if let Some(c) = value.chars().find(|c| forbidden.contains(c)) {
        return Err(Error::invalid_package(format!(
            "{field} {value:?} contains {c:?}"
        )));
    }
    Ok(())
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.nevra())
    }
}

impl FromStr for PackageVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        nevra::parse_nevra(s).ok_or_else(|| Error::invalid_package(format!("not a nevra: {s}")))
    }
}
