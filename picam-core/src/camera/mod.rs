//! The camera handle façade.
//!
//! One programming model, three backing roles: every public operation on
//! [`CameraHandle`] pattern-matches on the variant and routes to the
//! in-process driver, the remote client, or the service's embedded
//! driver. Accepted network sessions use the same driver from inside the
//! service worker, so a value set by any role is visible to every other.

pub mod local;
pub mod remote;
pub mod service;
pub(crate) mod session;

pub use local::LocalCamera;
pub use remote::RemoteCamera;
pub use service::{CameraService, ServiceConfig, DEFAULT_TICK_RATE};

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{CaptureBackend, RaspiBackend};
use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::protocol::transfer::Progress;

/// A camera handle backed by one of three roles.
pub enum CameraHandle {
    /// In-process driver shelling out to the capture tools.
    Local(LocalCamera),
    /// Client forwarding every call over TCP.
    Remote(RemoteCamera),
    /// TCP service multiplexing sessions over an embedded local driver.
    Service(CameraService),
}

impl CameraHandle {
    // ── Construction ──────────────────────────────────────────────

    /// Open a local camera with the reference backend.
    pub fn open() -> Self {
        Self::open_with_backend(Arc::new(RaspiBackend::new()))
    }

    /// Open a local camera with an explicit backend.
    pub fn open_with_backend(backend: Arc<dyn CaptureBackend>) -> Self {
        CameraHandle::Local(LocalCamera::new(backend))
    }

    /// Resolve `host` and connect to a remote service.
    pub async fn open_remote(host: &str, port: u16) -> Result<Self, CameraError> {
        Ok(CameraHandle::Remote(RemoteCamera::open(host, port).await?))
    }

    /// Resolve, bind, listen and start a service with defaults.
    pub async fn open_service(
        host: &str,
        port: u16,
        max_connections: usize,
    ) -> Result<Self, CameraError> {
        Self::open_service_with(
            host,
            port,
            max_connections,
            ServiceConfig::default(),
            Arc::new(RaspiBackend::new()),
        )
        .await
    }

    /// Start a service with explicit configuration and backend.
    pub async fn open_service_with(
        host: &str,
        port: u16,
        max_connections: usize,
        config: ServiceConfig,
        backend: Arc<dyn CaptureBackend>,
    ) -> Result<Self, CameraError> {
        Ok(CameraHandle::Service(
            CameraService::open(host, port, max_connections, config, backend).await?,
        ))
    }

    /// Tear the handle down: a service stops its worker and drops every
    /// session; a remote closes its socket; a local just goes away.
    pub async fn close(self) {
        if let CameraHandle::Service(service) = self {
            service.close().await;
        }
    }

    // ── Variant queries ───────────────────────────────────────────

    pub fn is_remote(&self) -> bool {
        matches!(self, CameraHandle::Remote(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, CameraHandle::Service(_))
    }

    /// Socket liveness for a remote handle; `false` for every other role.
    pub fn is_connected(&self) -> bool {
        match self {
            CameraHandle::Remote(remote) => remote.is_connected(),
            _ => false,
        }
    }

    // ── Operations ────────────────────────────────────────────────

    pub async fn is_busy(&mut self) -> Result<bool, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.is_busy().await),
            CameraHandle::Remote(remote) => remote.is_busy().await,
            CameraHandle::Service(service) => Ok(service.local().is_busy().await),
        }
    }

    pub async fn ev(&mut self) -> Result<i8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.ev().await),
            CameraHandle::Remote(remote) => remote.ev().await,
            CameraHandle::Service(service) => Ok(service.local().ev().await),
        }
    }

    pub async fn set_ev(&mut self, value: i8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_ev(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_ev(value).await,
            CameraHandle::Service(service) => {
                service.local().set_ev(value).await;
                Ok(())
            }
        }
    }

    pub async fn iso(&mut self) -> Result<u16, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.iso().await),
            CameraHandle::Remote(remote) => remote.iso().await,
            CameraHandle::Service(service) => Ok(service.local().iso().await),
        }
    }

    pub async fn set_iso(&mut self, value: u16) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_iso(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_iso(value).await,
            CameraHandle::Service(service) => {
                service.local().set_iso(value).await;
                Ok(())
            }
        }
    }

    pub async fn config(&mut self) -> Result<CameraConfig, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.config().await),
            CameraHandle::Remote(remote) => remote.config().await,
            CameraHandle::Service(service) => Ok(service.local().config().await),
        }
    }

    pub async fn set_config(&mut self, config: &CameraConfig) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_config(*config).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_config(config).await,
            CameraHandle::Service(service) => {
                service.local().set_config(*config).await;
                Ok(())
            }
        }
    }

    pub async fn contrast(&mut self) -> Result<i8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.contrast().await),
            CameraHandle::Remote(remote) => remote.contrast().await,
            CameraHandle::Service(service) => Ok(service.local().contrast().await),
        }
    }

    pub async fn set_contrast(&mut self, value: i8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_contrast(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_contrast(value).await,
            CameraHandle::Service(service) => {
                service.local().set_contrast(value).await;
                Ok(())
            }
        }
    }

    pub async fn sharpness(&mut self) -> Result<i8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.sharpness().await),
            CameraHandle::Remote(remote) => remote.sharpness().await,
            CameraHandle::Service(service) => Ok(service.local().sharpness().await),
        }
    }

    pub async fn set_sharpness(&mut self, value: i8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_sharpness(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_sharpness(value).await,
            CameraHandle::Service(service) => {
                service.local().set_sharpness(value).await;
                Ok(())
            }
        }
    }

    pub async fn brightness(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.brightness().await),
            CameraHandle::Remote(remote) => remote.brightness().await,
            CameraHandle::Service(service) => Ok(service.local().brightness().await),
        }
    }

    pub async fn set_brightness(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_brightness(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_brightness(value).await,
            CameraHandle::Service(service) => {
                service.local().set_brightness(value).await;
                Ok(())
            }
        }
    }

    pub async fn saturation(&mut self) -> Result<i8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.saturation().await),
            CameraHandle::Remote(remote) => remote.saturation().await,
            CameraHandle::Service(service) => Ok(service.local().saturation().await),
        }
    }

    pub async fn set_saturation(&mut self, value: i8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_saturation(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_saturation(value).await,
            CameraHandle::Service(service) => {
                service.local().set_saturation(value).await;
                Ok(())
            }
        }
    }

    pub async fn white_balance(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.white_balance().await),
            CameraHandle::Remote(remote) => remote.white_balance().await,
            CameraHandle::Service(service) => Ok(service.local().white_balance().await),
        }
    }

    pub async fn set_white_balance(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_white_balance(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_white_balance(value).await,
            CameraHandle::Service(service) => {
                service.local().set_white_balance(value).await;
                Ok(())
            }
        }
    }

    /// Shutter time in microseconds; 0 is automatic.
    pub async fn shutter_speed(&mut self) -> Result<u64, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.shutter_speed().await),
            CameraHandle::Remote(remote) => remote.shutter_speed().await,
            CameraHandle::Service(service) => Ok(service.local().shutter_speed().await),
        }
    }

    pub async fn set_shutter_speed(&mut self, value: u64) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_shutter_speed(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_shutter_speed(value).await,
            CameraHandle::Service(service) => {
                service.local().set_shutter_speed(value).await;
                Ok(())
            }
        }
    }

    pub async fn exposure_mode(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.exposure_mode().await),
            CameraHandle::Remote(remote) => remote.exposure_mode().await,
            CameraHandle::Service(service) => Ok(service.local().exposure_mode().await),
        }
    }

    pub async fn set_exposure_mode(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_exposure_mode(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_exposure_mode(value).await,
            CameraHandle::Service(service) => {
                service.local().set_exposure_mode(value).await;
                Ok(())
            }
        }
    }

    pub async fn metering_mode(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.metering_mode().await),
            CameraHandle::Remote(remote) => remote.metering_mode().await,
            CameraHandle::Service(service) => Ok(service.local().metering_mode().await),
        }
    }

    pub async fn set_metering_mode(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_metering_mode(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_metering_mode(value).await,
            CameraHandle::Service(service) => {
                service.local().set_metering_mode(value).await;
                Ok(())
            }
        }
    }

    pub async fn jpg_quality(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.jpg_quality().await),
            CameraHandle::Remote(remote) => remote.jpg_quality().await,
            CameraHandle::Service(service) => Ok(service.local().jpg_quality().await),
        }
    }

    pub async fn set_jpg_quality(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_jpg_quality(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_jpg_quality(value).await,
            CameraHandle::Service(service) => {
                service.local().set_jpg_quality(value).await;
                Ok(())
            }
        }
    }

    pub async fn image_size(&mut self) -> Result<(u16, u16), CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.image_size().await),
            CameraHandle::Remote(remote) => remote.image_size().await,
            CameraHandle::Service(service) => Ok(service.local().image_size().await),
        }
    }

    pub async fn set_image_size(&mut self, width: u16, height: u16) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_image_size(width, height).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_image_size(width, height).await,
            CameraHandle::Service(service) => {
                service.local().set_image_size(width, height).await;
                Ok(())
            }
        }
    }

    pub async fn image_effect(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.image_effect().await),
            CameraHandle::Remote(remote) => remote.image_effect().await,
            CameraHandle::Service(service) => Ok(service.local().image_effect().await),
        }
    }

    pub async fn set_image_effect(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_image_effect(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_image_effect(value).await,
            CameraHandle::Service(service) => {
                service.local().set_image_effect(value).await;
                Ok(())
            }
        }
    }

    pub async fn image_rotation(&mut self) -> Result<u16, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.image_rotation().await),
            CameraHandle::Remote(remote) => remote.image_rotation().await,
            CameraHandle::Service(service) => Ok(service.local().image_rotation().await),
        }
    }

    pub async fn set_image_rotation(&mut self, value: u16) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_image_rotation(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_image_rotation(value).await,
            CameraHandle::Service(service) => {
                service.local().set_image_rotation(value).await;
                Ok(())
            }
        }
    }

    pub async fn video_bit_rate(&mut self) -> Result<u32, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.video_bit_rate().await),
            CameraHandle::Remote(remote) => remote.video_bit_rate().await,
            CameraHandle::Service(service) => Ok(service.local().video_bit_rate().await),
        }
    }

    pub async fn set_video_bit_rate(&mut self, value: u32) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_video_bit_rate(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_video_bit_rate(value).await,
            CameraHandle::Service(service) => {
                service.local().set_video_bit_rate(value).await;
                Ok(())
            }
        }
    }

    pub async fn video_frame_rate(&mut self) -> Result<u8, CameraError> {
        match self {
            CameraHandle::Local(local) => Ok(local.video_frame_rate().await),
            CameraHandle::Remote(remote) => remote.video_frame_rate().await,
            CameraHandle::Service(service) => Ok(service.local().video_frame_rate().await),
        }
    }

    pub async fn set_video_frame_rate(&mut self, value: u8) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => {
                local.set_video_frame_rate(value).await;
                Ok(())
            }
            CameraHandle::Remote(remote) => remote.set_video_frame_rate(value).await,
            CameraHandle::Service(service) => {
                service.local().set_video_frame_rate(value).await;
                Ok(())
            }
        }
    }

    // ── Capture ───────────────────────────────────────────────────

    /// Capture one still into `dest`. On a remote handle the image
    /// travels through the file-transfer sub-protocol.
    pub async fn capture(&mut self, dest: &Path) -> Result<(), CameraError> {
        self.capture_with_progress(dest, None).await
    }

    /// Like [`capture`](Self::capture) with a transfer progress callback.
    /// Progress only fires on a remote handle; local and service captures
    /// write the file directly.
    pub async fn capture_with_progress(
        &mut self,
        dest: &Path,
        progress: Option<Progress<'_>>,
    ) -> Result<(), CameraError> {
        match self {
            CameraHandle::Local(local) => local.capture_still(dest).await,
            CameraHandle::Remote(remote) => remote.capture(dest, progress).await,
            CameraHandle::Service(service) => service.local().capture_still(dest).await,
        }
    }

    /// Record `duration_secs` seconds of video into `dest`.
    pub async fn capture_video(
        &mut self,
        duration_secs: u32,
        dest: &Path,
    ) -> Result<(), CameraError> {
        self.capture_video_with_progress(duration_secs, dest, None)
            .await
    }

    pub async fn capture_video_with_progress(
        &mut self,
        duration_secs: u32,
        dest: &Path,
        progress: Option<Progress<'_>>,
    ) -> Result<(), CameraError> {
        let duration = Duration::from_secs(duration_secs as u64);
        match self {
            CameraHandle::Local(local) => local.capture_video(duration, dest).await,
            CameraHandle::Remote(remote) => {
                remote.capture_video(duration_secs, dest, progress).await
            }
            CameraHandle::Service(service) => service.local().capture_video(duration, dest).await,
        }
    }
}
