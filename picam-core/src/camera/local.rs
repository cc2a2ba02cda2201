//! The in-process camera driver.
//!
//! [`LocalCamera`] owns the authoritative [`CameraConfig`], the busy flag
//! and the capture counters behind a mutex. The handle is cheap to clone;
//! the service worker and direct callers share one and serialize through
//! the lock. The lock is *not* held across a backend invocation — the busy
//! flag, not the mutex, serializes captures, so `is_busy` stays observable
//! while an exposure is in progress.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::backend::CaptureBackend;
use crate::config::CameraConfig;
use crate::error::CameraError;

struct LocalState {
    config: CameraConfig,
    busy: bool,
    image_counter: u32,
    video_counter: u32,
}

/// Shared handle to the local driver state.
#[derive(Clone)]
pub struct LocalCamera {
    state: Arc<Mutex<LocalState>>,
    backend: Arc<dyn CaptureBackend>,
}

impl LocalCamera {
    /// Open the driver with default configuration.
    pub fn new(backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(LocalState {
                config: CameraConfig::default(),
                busy: false,
                image_counter: 0,
                video_counter: 0,
            })),
            backend,
        }
    }

    pub async fn is_busy(&self) -> bool {
        self.state.lock().await.busy
    }

    pub async fn config(&self) -> CameraConfig {
        self.state.lock().await.config
    }

    /// Replace the whole config; every numeric field is clamped first.
    pub async fn set_config(&self, config: CameraConfig) {
        self.state.lock().await.config = config.clamped();
    }

    // ── Field access ──────────────────────────────────────────────
    // One getter/setter pair per field; setters clamp before storing.

    pub async fn ev(&self) -> i8 {
        self.state.lock().await.config.ev
    }

    pub async fn set_ev(&self, value: i8) {
        self.state.lock().await.config.ev = CameraConfig::clamp_ev(value);
    }

    pub async fn iso(&self) -> u16 {
        self.state.lock().await.config.iso
    }

    pub async fn set_iso(&self, value: u16) {
        self.state.lock().await.config.iso = CameraConfig::clamp_iso(value);
    }

    pub async fn contrast(&self) -> i8 {
        self.state.lock().await.config.contrast
    }

    pub async fn set_contrast(&self, value: i8) {
        self.state.lock().await.config.contrast = CameraConfig::clamp_contrast(value);
    }

    pub async fn sharpness(&self) -> i8 {
        self.state.lock().await.config.sharpness
    }

    pub async fn set_sharpness(&self, value: i8) {
        self.state.lock().await.config.sharpness = CameraConfig::clamp_sharpness(value);
    }

    pub async fn brightness(&self) -> u8 {
        self.state.lock().await.config.brightness
    }

    pub async fn set_brightness(&self, value: u8) {
        self.state.lock().await.config.brightness = CameraConfig::clamp_brightness(value);
    }

    pub async fn saturation(&self) -> i8 {
        self.state.lock().await.config.saturation
    }

    pub async fn set_saturation(&self, value: i8) {
        self.state.lock().await.config.saturation = CameraConfig::clamp_saturation(value);
    }

    pub async fn white_balance(&self) -> u8 {
        self.state.lock().await.config.white_balance
    }

    pub async fn set_white_balance(&self, value: u8) {
        self.state.lock().await.config.white_balance = value;
    }

    pub async fn shutter_speed(&self) -> u64 {
        self.state.lock().await.config.shutter_speed_us
    }

    pub async fn set_shutter_speed(&self, value: u64) {
        self.state.lock().await.config.shutter_speed_us = CameraConfig::clamp_shutter_speed(value);
    }

    pub async fn exposure_mode(&self) -> u8 {
        self.state.lock().await.config.exposure_mode
    }

    pub async fn set_exposure_mode(&self, value: u8) {
        self.state.lock().await.config.exposure_mode = value;
    }

    pub async fn metering_mode(&self) -> u8 {
        self.state.lock().await.config.metering_mode
    }

    pub async fn set_metering_mode(&self, value: u8) {
        self.state.lock().await.config.metering_mode = value;
    }

    pub async fn jpg_quality(&self) -> u8 {
        self.state.lock().await.config.jpg_quality
    }

    pub async fn set_jpg_quality(&self, value: u8) {
        self.state.lock().await.config.jpg_quality = CameraConfig::clamp_jpg_quality(value);
    }

    pub async fn image_size(&self) -> (u16, u16) {
        let state = self.state.lock().await;
        (
            state.config.image_size_width,
            state.config.image_size_height,
        )
    }

    pub async fn set_image_size(&self, width: u16, height: u16) {
        let mut state = self.state.lock().await;
        state.config.image_size_width = CameraConfig::clamp_image_width(width);
        state.config.image_size_height = CameraConfig::clamp_image_height(height);
    }

    pub async fn image_effect(&self) -> u8 {
        self.state.lock().await.config.image_effect
    }

    pub async fn set_image_effect(&self, value: u8) {
        self.state.lock().await.config.image_effect = value;
    }

    pub async fn image_rotation(&self) -> u16 {
        self.state.lock().await.config.image_rotation
    }

    pub async fn set_image_rotation(&self, value: u16) {
        self.state.lock().await.config.image_rotation = CameraConfig::clamp_image_rotation(value);
    }

    pub async fn video_bit_rate(&self) -> u32 {
        self.state.lock().await.config.video_bit_rate
    }

    pub async fn set_video_bit_rate(&self, value: u32) {
        self.state.lock().await.config.video_bit_rate = CameraConfig::clamp_video_bit_rate(value);
    }

    pub async fn video_frame_rate(&self) -> u8 {
        self.state.lock().await.config.video_frame_rate
    }

    pub async fn set_video_frame_rate(&self, value: u8) {
        self.state.lock().await.config.video_frame_rate =
            CameraConfig::clamp_video_frame_rate(value);
    }

    // ── Capture ───────────────────────────────────────────────────

    /// Capture one still into `dest`. Fails fast with `CameraBusy` if a
    /// capture is already in flight.
    pub async fn capture_still(&self, dest: &Path) -> Result<(), CameraError> {
        let config = self.begin_capture().await?;
        let result = self.backend.capture_still(&config, dest).await;
        self.end_capture().await;
        result
    }

    /// Record `duration` of video into `dest`.
    pub async fn capture_video(
        &self,
        duration: Duration,
        dest: &Path,
    ) -> Result<(), CameraError> {
        let config = self.begin_capture().await?;
        let result = self.backend.capture_video(&config, duration, dest).await;
        self.end_capture().await;
        result
    }

    /// Next service-side temp file name for a still.
    pub async fn next_image_name(&self) -> String {
        let mut state = self.state.lock().await;
        state.image_counter += 1;
        format!("pi_image_{}.jpg", state.image_counter)
    }

    /// Next service-side temp file name for a video.
    pub async fn next_video_name(&self) -> String {
        let mut state = self.state.lock().await;
        state.video_counter += 1;
        format!("pi_video_{}.mp4", state.video_counter)
    }

    async fn begin_capture(&self) -> Result<CameraConfig, CameraError> {
        let mut state = self.state.lock().await;
        if state.busy {
            return Err(CameraError::CameraBusy);
        }
        state.busy = true;
        Ok(state.config)
    }

    async fn end_capture(&self) {
        self.state.lock().await.busy = false;
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    /// Backend that writes fixed bytes after an optional delay.
    struct FixtureBackend {
        data: Vec<u8>,
        delay: Duration,
    }

    impl FixtureBackend {
        fn new(data: &[u8]) -> Self {
            Self {
                data: data.to_vec(),
                delay: Duration::ZERO,
            }
        }

        fn slow(data: &[u8], delay: Duration) -> Self {
            Self {
                data: data.to_vec(),
                delay,
            }
        }
    }

    impl CaptureBackend for FixtureBackend {
        fn capture_still<'a>(
            &'a self,
            _config: &'a CameraConfig,
            dest: &'a Path,
        ) -> BoxFuture<'a, Result<(), CameraError>> {
            Box::pin(async move {
                tokio::time::sleep(self.delay).await;
                tokio::fs::write(dest, &self.data)
                    .await
                    .map_err(|_| CameraError::FileWrite)
            })
        }

        fn capture_video<'a>(
            &'a self,
            config: &'a CameraConfig,
            _duration: Duration,
            dest: &'a Path,
        ) -> BoxFuture<'a, Result<(), CameraError>> {
            self.capture_still(config, dest)
        }
    }

    fn camera_with(backend: FixtureBackend) -> LocalCamera {
        LocalCamera::new(Arc::new(backend))
    }

    #[tokio::test]
    async fn setters_clamp_before_storing() {
        let camera = camera_with(FixtureBackend::new(b""));

        camera.set_ev(11).await;
        assert_eq!(camera.ev().await, 10);
        camera.set_ev(-20).await;
        assert_eq!(camera.ev().await, -10);

        camera.set_iso(5000).await;
        assert_eq!(camera.iso().await, 800);

        camera.set_image_size(9999, 9999).await;
        assert_eq!(camera.image_size().await, (3280, 2464));

        camera.set_image_rotation(1000).await;
        assert_eq!(camera.image_rotation().await, 359);

        camera.set_video_frame_rate(1).await;
        assert_eq!(camera.video_frame_rate().await, 2);
    }

    #[tokio::test]
    async fn enum_fields_store_verbatim() {
        let camera = camera_with(FixtureBackend::new(b""));
        camera.set_white_balance(0xAA).await;
        assert_eq!(camera.white_balance().await, 0xAA);
        camera.set_image_effect(0xBB).await;
        assert_eq!(camera.image_effect().await, 0xBB);
    }

    #[tokio::test]
    async fn set_config_clamps_every_numeric_field() {
        let camera = camera_with(FixtureBackend::new(b""));
        camera
            .set_config(CameraConfig {
                ev: 99,
                iso: 9999,
                brightness: 255,
                ..CameraConfig::default()
            })
            .await;

        let config = camera.config().await;
        assert_eq!(config.ev, 10);
        assert_eq!(config.iso, 800);
        assert_eq!(config.brightness, 100);
    }

    #[tokio::test]
    async fn capture_writes_fixture() {
        let camera = camera_with(FixtureBackend::new(b"fixture image"));
        let dest = std::env::temp_dir().join(format!("picam-local-{}.jpg", std::process::id()));

        camera.capture_still(&dest).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"fixture image");
        assert!(!camera.is_busy().await);

        let _ = tokio::fs::remove_file(&dest).await;
    }

    #[tokio::test]
    async fn busy_flag_guards_concurrent_captures() {
        let camera = camera_with(FixtureBackend::slow(b"slow", Duration::from_millis(200)));
        let dest = std::env::temp_dir().join(format!("picam-busy-{}.jpg", std::process::id()));

        let first = {
            let camera = camera.clone();
            let dest = dest.clone();
            tokio::spawn(async move { camera.capture_still(&dest).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(camera.is_busy().await);
        assert_eq!(
            camera.capture_still(&dest).await,
            Err(CameraError::CameraBusy)
        );

        first.await.unwrap().unwrap();
        assert!(!camera.is_busy().await);

        let _ = tokio::fs::remove_file(&dest).await;
    }

    #[tokio::test]
    async fn temp_names_are_monotonic() {
        let camera = camera_with(FixtureBackend::new(b""));
        assert_eq!(camera.next_image_name().await, "pi_image_1.jpg");
        assert_eq!(camera.next_image_name().await, "pi_image_2.jpg");
        assert_eq!(camera.next_video_name().await, "pi_video_1.mp4");
    }
}
