//! Backend variant and credential mode value objects.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::ports::BackendError;

/// Every backend variant the configuration recognizes.
pub const SUPPORTED_CLOUDS: [&str; 4] = ["fs", "gcp", "aws", "azure"];

/// Storage backend variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Local filesystem; never needs credentials or network access.
    #[default]
    Fs,
    /// Google Cloud Storage.
    Gcp,
    /// Amazon S3.
    Aws,
    /// Azure Blob Storage. Recognized, not implemented.
    Azure,
}

impl Variant {
    /// Configuration tag of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Fs => "fs",
            Variant::Gcp => "gcp",
            Variant::Aws => "aws",
            Variant::Azure => "azure",
        }
    }

    /// URL scheme used to address buckets of this variant.
    pub fn scheme(&self) -> &'static str {
        match self {
            Variant::Fs => "file://",
            Variant::Gcp => "gs://",
            Variant::Aws => "s3://",
            Variant::Azure => "azblob://",
        }
    }

    /// Whether the variant talks to a remote object store.
    pub fn is_remote(&self) -> bool {
        !matches!(self, Variant::Fs)
    }

    /// Prefix `bucket` with this variant's scheme unless it already carries it.
    ///
    /// Idempotent: normalizing an already normalized bucket is a no-op.
    pub fn normalize_bucket(&self, bucket: &str) -> String {
        if bucket.starts_with(self.scheme()) {
            bucket.to_string()
        } else {
            format!("{}{}", self.scheme(), bucket)
        }
    }

    /// Strip this variant's scheme from a bucket URL, leaving the bare bucket.
    pub fn bare_bucket<'a>(&self, bucket: &'a str) -> &'a str {
        bucket.strip_prefix(self.scheme()).unwrap_or(bucket)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = BackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "fs" => Ok(Variant::Fs),
            "gcp" => Ok(Variant::Gcp),
            "aws" => Ok(Variant::Aws),
            "azure" => Ok(Variant::Azure),
            other => Err(BackendError::UnsupportedCloud {
                cloud: other.to_string(),
            }),
        }
    }
}

/// How cloud credentials are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Ambient credentials (environment, instance metadata, well-known files).
    #[default]
    Default,
    /// An explicit credential file.
    File,
}

impl CredentialMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialMode::Default => "default",
            CredentialMode::File => "file",
        }
    }
}

impl fmt::Display for CredentialMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "default" => Ok(CredentialMode::Default),
            "file" => Ok(CredentialMode::File),
            other => Err(format!(
                "unsupported credential mode '{}', expected 'default' or 'file'",
                other
            )),
        }
    }
}
