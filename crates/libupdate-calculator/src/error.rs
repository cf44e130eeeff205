// SPDX-License-Identifier: MIT OR Apache-2.0

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid epoch: {0:?}")]
    InvalidEpoch(String),

    #[error("invalid package: {0}")]
    InvalidPackage(String),

    /// ordering is only defined between builds of the same name and arch.
    #[error("cannot compare {left} with {right}: name or arch differs")]
    IncomparablePackages { left: String, right: String },

    #[error("failed to read manifest for {host_id}: {reason}")]
    ManifestRead { host_id: String, reason: String },

    #[error("failed to read package cache {key}: {reason}")]
    CacheRead { key: String, reason: String },

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

macro_rules! error_ctor {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            pub fn $name(msg: impl Into<String>) -> Self {
                Self::$variant(msg.into())
            }
        )*
    };
}

impl Error {
    error_ctor!(
        invalid_epoch => InvalidEpoch,
        invalid_package => InvalidPackage,
        config => Config,
        other => Other,
    );

    pub fn incomparable(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::IncomparablePackages {
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn manifest_read(host_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::ManifestRead {
            host_id: host_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn cache_read(key: impl Into<String>, reason: impl ToString) -> Self {
        Self::CacheRead {
            key: key.into(),
            reason: reason.to_string(),
        }
    }
}
