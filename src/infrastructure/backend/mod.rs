//! Backend implementations, one per variant
//!
//! - `fs` - [`FilesystemBackend`], no credentials, no network
//! - `gcp` - [`GcpBackend`], Google Cloud Storage
//! - `aws` - [`AwsBackend`], Amazon S3
//! - `unsupported` - [`UnsupportedBackend`], recognized variants without an implementation

mod aws;
mod cloud;
mod fs;
mod gcp;
mod unsupported;

pub use aws::{read_shared_credentials, AwsBackend, SharedCredentials};
pub use cloud::ObjectStoreBackend;
pub use fs::FilesystemBackend;
pub use gcp::GcpBackend;
pub use unsupported::UnsupportedBackend;

use tracing::debug;

use crate::domain::entities::BackendConfig;
use crate::domain::ports::{Backend, BackendError, BackendFactory};
use crate::domain::value_objects::Variant;

/// Factory keyed on the configured variant.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBackendFactory;

impl BackendFactory for DefaultBackendFactory {
    fn initialize(&self, config: &BackendConfig) -> Result<Box<dyn Backend>, BackendError> {
        debug!("Initializing {} backend", config.variant);
        Ok(match config.variant {
            Variant::Fs => Box::new(FilesystemBackend::new(config)),
            Variant::Gcp => Box::new(GcpBackend::connect(config)?),
            Variant::Aws => Box::new(AwsBackend::connect(config)?),
            Variant::Azure => Box::new(UnsupportedBackend::connect(config)?),
        })
    }
}

/// Bare bucket name, required by every cloud variant.
fn require_bucket(config: &BackendConfig) -> Result<&str, BackendError> {
    config
        .bare_bucket()
        .filter(|bucket| !bucket.is_empty())
        .ok_or(BackendError::MissingBucket {
            variant: config.variant,
        })
}
