//! The remote client: forwards every operation over TCP.
//!
//! Calls are synchronous RPC — one request frame out, one response frame
//! back, strictly FIFO. Once an exchange fails with `ConnectionClosed` the
//! handle is dead for I/O and [`is_connected`](RemoteCamera::is_connected)
//! reports `false` from then on.

use std::net::SocketAddr;
use std::path::Path;

use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::net::{self, CameraStream};
use crate::protocol::client;
use crate::protocol::transfer::Progress;

pub struct RemoteCamera {
    endpoint: SocketAddr,
    stream: CameraStream,
    connected: bool,
}

impl RemoteCamera {
    /// Resolve `host` and connect.
    pub async fn open(host: &str, port: u16) -> Result<Self, CameraError> {
        let endpoint = net::resolve(host, port).await?;
        let stream = net::connect(endpoint).await?;

        Ok(Self {
            endpoint,
            stream,
            connected: true,
        })
    }

    /// The resolved service endpoint.
    pub fn endpoint(&self) -> SocketAddr {
        self.endpoint
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a transport failure: the socket is closed, the handle dead.
    fn track<T>(&mut self, result: Result<T, CameraError>) -> Result<T, CameraError> {
        if matches!(result, Err(CameraError::ConnectionClosed)) {
            self.connected = false;
        }
        result
    }

    pub async fn is_busy(&mut self) -> Result<bool, CameraError> {
        let result = client::begin_is_busy(&mut self.stream).await;
        self.track(result)
    }

    pub async fn ev(&mut self) -> Result<i8, CameraError> {
        let result = client::begin_get_ev(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_ev(&mut self, value: i8) -> Result<(), CameraError> {
        let result = client::begin_set_ev(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn iso(&mut self) -> Result<u16, CameraError> {
        let result = client::begin_get_iso(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_iso(&mut self, value: u16) -> Result<(), CameraError> {
        let result = client::begin_set_iso(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn config(&mut self) -> Result<CameraConfig, CameraError> {
        let result = client::begin_get_config(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_config(&mut self, config: &CameraConfig) -> Result<(), CameraError> {
        let result = client::begin_set_config(&mut self.stream, config).await;
        self.track(result)
    }

    pub async fn contrast(&mut self) -> Result<i8, CameraError> {
        let result = client::begin_get_contrast(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_contrast(&mut self, value: i8) -> Result<(), CameraError> {
        let result = client::begin_set_contrast(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn sharpness(&mut self) -> Result<i8, CameraError> {
        let result = client::begin_get_sharpness(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_sharpness(&mut self, value: i8) -> Result<(), CameraError> {
        let result = client::begin_set_sharpness(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn brightness(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_brightness(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_brightness(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_brightness(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn saturation(&mut self) -> Result<i8, CameraError> {
        let result = client::begin_get_saturation(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_saturation(&mut self, value: i8) -> Result<(), CameraError> {
        let result = client::begin_set_saturation(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn white_balance(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_white_balance(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_white_balance(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_white_balance(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn shutter_speed(&mut self) -> Result<u64, CameraError> {
        let result = client::begin_get_shutter_speed(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_shutter_speed(&mut self, value: u64) -> Result<(), CameraError> {
        let result = client::begin_set_shutter_speed(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn exposure_mode(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_exposure_mode(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_exposure_mode(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_exposure_mode(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn metering_mode(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_metering_mode(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_metering_mode(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_metering_mode(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn jpg_quality(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_jpg_quality(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_jpg_quality(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_jpg_quality(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn image_size(&mut self) -> Result<(u16, u16), CameraError> {
        let result = client::begin_get_image_size(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_image_size(&mut self, width: u16, height: u16) -> Result<(), CameraError> {
        let result = client::begin_set_image_size(&mut self.stream, width, height).await;
        self.track(result)
    }

    pub async fn image_effect(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_image_effect(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_image_effect(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_image_effect(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn image_rotation(&mut self) -> Result<u16, CameraError> {
        let result = client::begin_get_image_rotation(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_image_rotation(&mut self, value: u16) -> Result<(), CameraError> {
        let result = client::begin_set_image_rotation(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn video_bit_rate(&mut self) -> Result<u32, CameraError> {
        let result = client::begin_get_video_bit_rate(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_video_bit_rate(&mut self, value: u32) -> Result<(), CameraError> {
        let result = client::begin_set_video_bit_rate(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn video_frame_rate(&mut self) -> Result<u8, CameraError> {
        let result = client::begin_get_video_frame_rate(&mut self.stream).await;
        self.track(result)
    }

    pub async fn set_video_frame_rate(&mut self, value: u8) -> Result<(), CameraError> {
        let result = client::begin_set_video_frame_rate(&mut self.stream, value).await;
        self.track(result)
    }

    pub async fn capture(
        &mut self,
        dest: &Path,
        progress: Option<Progress<'_>>,
    ) -> Result<(), CameraError> {
        let result = client::begin_capture(&mut self.stream, dest, progress).await;
        self.track(result)
    }

    pub async fn capture_video(
        &mut self,
        duration_secs: u32,
        dest: &Path,
        progress: Option<Progress<'_>>,
    ) -> Result<(), CameraError> {
        let result =
            client::begin_capture_video(&mut self.stream, duration_secs, dest, progress).await;
        self.track(result)
    }
}
