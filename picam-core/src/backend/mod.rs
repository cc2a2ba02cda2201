//! Capture backends.
//!
//! The local driver delegates the actual exposure to a [`CaptureBackend`]:
//! given a config and a destination path, produce a file on disk. The
//! protocol contract and clamping rules do not depend on the backend
//! choice; [`RaspiBackend`] is the reference implementation that shells
//! out to the platform capture tools.

pub mod args;
mod raspi;

pub use raspi::RaspiBackend;

use std::path::Path;
use std::time::Duration;

use futures::future::BoxFuture;

use crate::config::CameraConfig;
use crate::error::CameraError;

/// Produces capture files from a camera configuration.
///
/// Methods return boxed futures so backends stay object-safe and can be
/// shared behind an `Arc<dyn CaptureBackend>`.
pub trait CaptureBackend: Send + Sync {
    /// Capture one still image into `dest`.
    fn capture_still<'a>(
        &'a self,
        config: &'a CameraConfig,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), CameraError>>;

    /// Record `duration` of video into `dest`.
    fn capture_video<'a>(
        &'a self,
        config: &'a CameraConfig,
        duration: Duration,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), CameraError>>;
}
