//! Client-side protocol endpoints.
//!
//! One `begin_*` function per operation: send the request frame, block
//! until exactly one response frame arrives, surface a non-success error
//! code, decode the payload. Requests and responses on a stream are
//! strictly FIFO — a caller must not issue a second request before it has
//! read the first response.
//!
//! Response opcodes are deliberately not validated, matching what existing
//! deployments accept.

use std::path::Path;

use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::net::{self, CameraStream};
use crate::protocol::transfer::{self, Progress};
use crate::protocol::Opcode;
use crate::wire::{self, Frame};

/// One request/response exchange. Any transport failure leaves the stream
/// dead and surfaces as `ConnectionClosed`.
async fn call(stream: &mut CameraStream, request: Frame) -> Result<Frame, CameraError> {
    net::send_frame(stream, request).await?;
    let response = net::recv_frame(stream).await?;
    response.check()?;
    Ok(response)
}

// ── Status ────────────────────────────────────────────────────────

pub async fn begin_is_busy(stream: &mut CameraStream) -> Result<bool, CameraError> {
    let response = call(stream, Frame::request(Opcode::IsBusy, Vec::new())).await?;
    wire::payload_bool(&response)
}

// ── Exposure ──────────────────────────────────────────────────────

pub async fn begin_get_ev(stream: &mut CameraStream) -> Result<i8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetEv, Vec::new())).await?;
    wire::payload_i8(&response)
}

pub async fn begin_set_ev(stream: &mut CameraStream, value: i8) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetEv, vec![value as u8])).await?;
    Ok(())
}

pub async fn begin_get_iso(stream: &mut CameraStream) -> Result<u16, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetIso, Vec::new())).await?;
    wire::payload_u16(&response)
}

pub async fn begin_set_iso(stream: &mut CameraStream, value: u16) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetIso, value.to_be_bytes().to_vec()),
    )
    .await?;
    Ok(())
}

pub async fn begin_get_shutter_speed(stream: &mut CameraStream) -> Result<u64, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetShutterSpeed, Vec::new())).await?;
    wire::payload_u64(&response)
}

pub async fn begin_set_shutter_speed(
    stream: &mut CameraStream,
    value: u64,
) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetShutterSpeed, value.to_be_bytes().to_vec()),
    )
    .await?;
    Ok(())
}

pub async fn begin_get_exposure_mode(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetExposureMode, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_exposure_mode(
    stream: &mut CameraStream,
    value: u8,
) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetExposureMode, vec![value])).await?;
    Ok(())
}

pub async fn begin_get_metering_mode(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetMeteringMode, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_metering_mode(
    stream: &mut CameraStream,
    value: u8,
) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetMeteringMode, vec![value])).await?;
    Ok(())
}

// ── Color and tone ────────────────────────────────────────────────

pub async fn begin_get_contrast(stream: &mut CameraStream) -> Result<i8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetContrast, Vec::new())).await?;
    wire::payload_i8(&response)
}

pub async fn begin_set_contrast(stream: &mut CameraStream, value: i8) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetContrast, vec![value as u8])).await?;
    Ok(())
}

pub async fn begin_get_sharpness(stream: &mut CameraStream) -> Result<i8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetSharpness, Vec::new())).await?;
    wire::payload_i8(&response)
}

pub async fn begin_set_sharpness(stream: &mut CameraStream, value: i8) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetSharpness, vec![value as u8]),
    )
    .await?;
    Ok(())
}

pub async fn begin_get_brightness(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetBrightness, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_brightness(stream: &mut CameraStream, value: u8) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetBrightness, vec![value])).await?;
    Ok(())
}

pub async fn begin_get_saturation(stream: &mut CameraStream) -> Result<i8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetSaturation, Vec::new())).await?;
    wire::payload_i8(&response)
}

pub async fn begin_set_saturation(stream: &mut CameraStream, value: i8) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetSaturation, vec![value as u8]),
    )
    .await?;
    Ok(())
}

pub async fn begin_get_white_balance(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetWhiteBalance, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_white_balance(
    stream: &mut CameraStream,
    value: u8,
) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetWhiteBalance, vec![value])).await?;
    Ok(())
}

// ── Stills ────────────────────────────────────────────────────────

pub async fn begin_get_jpg_quality(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetJpgQuality, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_jpg_quality(
    stream: &mut CameraStream,
    value: u8,
) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetJpgQuality, vec![value])).await?;
    Ok(())
}

pub async fn begin_get_image_size(stream: &mut CameraStream) -> Result<(u16, u16), CameraError> {
    let response = call(stream, Frame::request(Opcode::GetImageSize, Vec::new())).await?;
    wire::payload_u16_pair(&response)
}

pub async fn begin_set_image_size(
    stream: &mut CameraStream,
    width: u16,
    height: u16,
) -> Result<(), CameraError> {
    let mut payload = Vec::with_capacity(4);
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    call(stream, Frame::request(Opcode::SetImageSize, payload)).await?;
    Ok(())
}

pub async fn begin_get_image_effect(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetImageEffect, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_image_effect(
    stream: &mut CameraStream,
    value: u8,
) -> Result<(), CameraError> {
    call(stream, Frame::request(Opcode::SetImageEffect, vec![value])).await?;
    Ok(())
}

pub async fn begin_get_image_rotation(stream: &mut CameraStream) -> Result<u16, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetImageRotation, Vec::new())).await?;
    wire::payload_u16(&response)
}

pub async fn begin_set_image_rotation(
    stream: &mut CameraStream,
    value: u16,
) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetImageRotation, value.to_be_bytes().to_vec()),
    )
    .await?;
    Ok(())
}

// ── Video ─────────────────────────────────────────────────────────

pub async fn begin_get_video_bit_rate(stream: &mut CameraStream) -> Result<u32, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetVideoBitRate, Vec::new())).await?;
    wire::payload_u32(&response)
}

pub async fn begin_set_video_bit_rate(
    stream: &mut CameraStream,
    value: u32,
) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetVideoBitRate, value.to_be_bytes().to_vec()),
    )
    .await?;
    Ok(())
}

pub async fn begin_get_video_frame_rate(stream: &mut CameraStream) -> Result<u8, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetVideoFrameRate, Vec::new())).await?;
    wire::payload_u8(&response)
}

pub async fn begin_set_video_frame_rate(
    stream: &mut CameraStream,
    value: u8,
) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetVideoFrameRate, vec![value]),
    )
    .await?;
    Ok(())
}

// ── Whole config ──────────────────────────────────────────────────

pub async fn begin_get_config(stream: &mut CameraStream) -> Result<CameraConfig, CameraError> {
    let response = call(stream, Frame::request(Opcode::GetConfig, Vec::new())).await?;
    CameraConfig::from_wire(&response.payload)
}

pub async fn begin_set_config(
    stream: &mut CameraStream,
    config: &CameraConfig,
) -> Result<(), CameraError> {
    call(
        stream,
        Frame::request(Opcode::SetConfig, config.to_wire().to_vec()),
    )
    .await?;
    Ok(())
}

// ── Capture ───────────────────────────────────────────────────────

/// Trigger a still capture on the service and receive the image into
/// `dest` through the file-transfer sub-protocol.
pub async fn begin_capture(
    stream: &mut CameraStream,
    dest: &Path,
    progress: Option<Progress<'_>>,
) -> Result<(), CameraError> {
    net::send_frame(stream, Frame::request(Opcode::Capture, Vec::new())).await?;
    transfer::receive_file(stream, dest, progress).await
}

/// Trigger a video capture of `duration_secs` seconds and receive the
/// container file into `dest`.
pub async fn begin_capture_video(
    stream: &mut CameraStream,
    duration_secs: u32,
    dest: &Path,
    progress: Option<Progress<'_>>,
) -> Result<(), CameraError> {
    net::send_frame(
        stream,
        Frame::request(Opcode::CaptureVideo, duration_secs.to_be_bytes().to_vec()),
    )
    .await?;
    transfer::receive_file(stream, dest, progress).await
}
