//! Service-side protocol endpoints: the opcode-indexed handler table and
//! one `complete_*` function per operation.
//!
//! Each `complete_*` is the mirror of the matching `begin_*` in
//! [`client`](crate::protocol::client): given the reply value or an error,
//! it sends exactly one response frame under the request's own opcode.
//! Handlers read the request payload, run the operation against the
//! session's shared local driver, and complete.
//!
//! The table is validated once at service start: every slot's declared
//! opcode must equal its index, and the service refuses to run otherwise.
//! [`FileTransferOffer`](Opcode::FileTransferOffer) and
//! [`FileTransferAck`](Opcode::FileTransferAck) have no top-level handler;
//! receiving one outside a transfer closes the session, exactly like an
//! unknown opcode.

use futures::future::BoxFuture;

use crate::camera::session::Session;
use crate::config::CameraConfig;
use crate::error::CameraError;
use crate::net::{self, CameraStream};
use crate::protocol::{transfer, Opcode};
use crate::wire::{self, Frame};

// ── Dispatch ──────────────────────────────────────────────────────

pub(crate) type Handler =
    for<'a> fn(&'a mut Session, Frame) -> BoxFuture<'a, Result<(), CameraError>>;

pub(crate) struct HandlerEntry {
    pub(crate) opcode: Opcode,
    pub(crate) handler: Option<Handler>,
}

/// Route one received frame to its handler.
///
/// `Err` — unknown opcode, null dispatch slot, or a failing handler —
/// means the session must be closed.
pub(crate) async fn dispatch(session: &mut Session, frame: Frame) -> Result<(), CameraError> {
    let opcode = Opcode::try_from(frame.opcode)?;

    match HANDLERS[opcode as usize].handler {
        Some(handler) => handler(session, frame).await,
        None => Err(CameraError::Undefined),
    }
}

/// Verify that every table slot sits at the index of its declared opcode.
pub(crate) fn validate_table() -> Result<(), CameraError> {
    for (index, entry) in HANDLERS.iter().enumerate() {
        if entry.opcode as usize != index {
            return Err(CameraError::Undefined);
        }
    }
    Ok(())
}

pub(crate) const HANDLERS: [HandlerEntry; Opcode::COUNT] = [
    HandlerEntry { opcode: Opcode::IsBusy, handler: Some(handle_is_busy) },

    HandlerEntry { opcode: Opcode::GetEv, handler: Some(handle_get_ev) },
    HandlerEntry { opcode: Opcode::SetEv, handler: Some(handle_set_ev) },

    HandlerEntry { opcode: Opcode::GetIso, handler: Some(handle_get_iso) },
    HandlerEntry { opcode: Opcode::SetIso, handler: Some(handle_set_iso) },

    HandlerEntry { opcode: Opcode::GetConfig, handler: Some(handle_get_config) },
    HandlerEntry { opcode: Opcode::SetConfig, handler: Some(handle_set_config) },

    HandlerEntry { opcode: Opcode::GetContrast, handler: Some(handle_get_contrast) },
    HandlerEntry { opcode: Opcode::SetContrast, handler: Some(handle_set_contrast) },

    HandlerEntry { opcode: Opcode::GetSharpness, handler: Some(handle_get_sharpness) },
    HandlerEntry { opcode: Opcode::SetSharpness, handler: Some(handle_set_sharpness) },

    HandlerEntry { opcode: Opcode::GetBrightness, handler: Some(handle_get_brightness) },
    HandlerEntry { opcode: Opcode::SetBrightness, handler: Some(handle_set_brightness) },

    HandlerEntry { opcode: Opcode::GetSaturation, handler: Some(handle_get_saturation) },
    HandlerEntry { opcode: Opcode::SetSaturation, handler: Some(handle_set_saturation) },

    HandlerEntry { opcode: Opcode::GetWhiteBalance, handler: Some(handle_get_white_balance) },
    HandlerEntry { opcode: Opcode::SetWhiteBalance, handler: Some(handle_set_white_balance) },

    HandlerEntry { opcode: Opcode::GetShutterSpeed, handler: Some(handle_get_shutter_speed) },
    HandlerEntry { opcode: Opcode::SetShutterSpeed, handler: Some(handle_set_shutter_speed) },

    HandlerEntry { opcode: Opcode::GetExposureMode, handler: Some(handle_get_exposure_mode) },
    HandlerEntry { opcode: Opcode::SetExposureMode, handler: Some(handle_set_exposure_mode) },

    HandlerEntry { opcode: Opcode::GetMeteringMode, handler: Some(handle_get_metering_mode) },
    HandlerEntry { opcode: Opcode::SetMeteringMode, handler: Some(handle_set_metering_mode) },

    HandlerEntry { opcode: Opcode::GetJpgQuality, handler: Some(handle_get_jpg_quality) },
    HandlerEntry { opcode: Opcode::SetJpgQuality, handler: Some(handle_set_jpg_quality) },

    HandlerEntry { opcode: Opcode::GetImageSize, handler: Some(handle_get_image_size) },
    HandlerEntry { opcode: Opcode::SetImageSize, handler: Some(handle_set_image_size) },

    HandlerEntry { opcode: Opcode::GetImageEffect, handler: Some(handle_get_image_effect) },
    HandlerEntry { opcode: Opcode::SetImageEffect, handler: Some(handle_set_image_effect) },

    HandlerEntry { opcode: Opcode::GetImageRotation, handler: Some(handle_get_image_rotation) },
    HandlerEntry { opcode: Opcode::SetImageRotation, handler: Some(handle_set_image_rotation) },

    HandlerEntry { opcode: Opcode::GetVideoBitRate, handler: Some(handle_get_video_bit_rate) },
    HandlerEntry { opcode: Opcode::SetVideoBitRate, handler: Some(handle_set_video_bit_rate) },

    HandlerEntry { opcode: Opcode::GetVideoFrameRate, handler: Some(handle_get_video_frame_rate) },
    HandlerEntry { opcode: Opcode::SetVideoFrameRate, handler: Some(handle_set_video_frame_rate) },

    HandlerEntry { opcode: Opcode::FileTransferOffer, handler: None },
    HandlerEntry { opcode: Opcode::FileTransferAck, handler: None },

    HandlerEntry { opcode: Opcode::Capture, handler: Some(handle_capture) },
    HandlerEntry { opcode: Opcode::CaptureVideo, handler: Some(handle_capture_video) },
];

// ── Complete functions ────────────────────────────────────────────

async fn respond(
    stream: &mut CameraStream,
    opcode: Opcode,
    result: Result<Vec<u8>, CameraError>,
) -> Result<(), CameraError> {
    let frame = match result {
        Ok(payload) => Frame::response(opcode, payload),
        Err(error) => Frame::error(opcode, error),
    };
    net::send_frame(stream, frame).await
}

pub(crate) async fn complete_is_busy(
    stream: &mut CameraStream,
    result: Result<bool, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::IsBusy, result.map(|v| vec![v as u8])).await
}

pub(crate) async fn complete_get_ev(
    stream: &mut CameraStream,
    result: Result<i8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetEv, result.map(|v| vec![v as u8])).await
}

pub(crate) async fn complete_set_ev(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetEv, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_iso(
    stream: &mut CameraStream,
    result: Result<u16, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetIso, result.map(|v| v.to_be_bytes().to_vec())).await
}

pub(crate) async fn complete_set_iso(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetIso, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_config(
    stream: &mut CameraStream,
    result: Result<CameraConfig, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetConfig, result.map(|c| c.to_wire().to_vec())).await
}

pub(crate) async fn complete_set_config(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetConfig, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_contrast(
    stream: &mut CameraStream,
    result: Result<i8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetContrast, result.map(|v| vec![v as u8])).await
}

pub(crate) async fn complete_set_contrast(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetContrast, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_sharpness(
    stream: &mut CameraStream,
    result: Result<i8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetSharpness, result.map(|v| vec![v as u8])).await
}

pub(crate) async fn complete_set_sharpness(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetSharpness, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_brightness(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetBrightness, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_brightness(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetBrightness, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_saturation(
    stream: &mut CameraStream,
    result: Result<i8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetSaturation, result.map(|v| vec![v as u8])).await
}

pub(crate) async fn complete_set_saturation(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetSaturation, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_white_balance(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetWhiteBalance, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_white_balance(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetWhiteBalance, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_shutter_speed(
    stream: &mut CameraStream,
    result: Result<u64, CameraError>,
) -> Result<(), CameraError> {
    respond(
        stream,
        Opcode::GetShutterSpeed,
        result.map(|v| v.to_be_bytes().to_vec()),
    )
    .await
}

pub(crate) async fn complete_set_shutter_speed(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetShutterSpeed, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_exposure_mode(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetExposureMode, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_exposure_mode(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetExposureMode, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_metering_mode(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetMeteringMode, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_metering_mode(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetMeteringMode, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_jpg_quality(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetJpgQuality, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_jpg_quality(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetJpgQuality, result.map(|_| Vec::new())).await
}

/// The response travels under the image-size opcode itself, not the
/// historical image-rotation reuse.
pub(crate) async fn complete_get_image_size(
    stream: &mut CameraStream,
    result: Result<(u16, u16), CameraError>,
) -> Result<(), CameraError> {
    respond(
        stream,
        Opcode::GetImageSize,
        result.map(|(w, h)| {
            let mut payload = Vec::with_capacity(4);
            payload.extend_from_slice(&w.to_be_bytes());
            payload.extend_from_slice(&h.to_be_bytes());
            payload
        }),
    )
    .await
}

pub(crate) async fn complete_set_image_size(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetImageSize, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_image_effect(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetImageEffect, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_image_effect(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetImageEffect, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_image_rotation(
    stream: &mut CameraStream,
    result: Result<u16, CameraError>,
) -> Result<(), CameraError> {
    respond(
        stream,
        Opcode::GetImageRotation,
        result.map(|v| v.to_be_bytes().to_vec()),
    )
    .await
}

pub(crate) async fn complete_set_image_rotation(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetImageRotation, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_video_bit_rate(
    stream: &mut CameraStream,
    result: Result<u32, CameraError>,
) -> Result<(), CameraError> {
    respond(
        stream,
        Opcode::GetVideoBitRate,
        result.map(|v| v.to_be_bytes().to_vec()),
    )
    .await
}

pub(crate) async fn complete_set_video_bit_rate(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetVideoBitRate, result.map(|_| Vec::new())).await
}

pub(crate) async fn complete_get_video_frame_rate(
    stream: &mut CameraStream,
    result: Result<u8, CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::GetVideoFrameRate, result.map(|v| vec![v])).await
}

pub(crate) async fn complete_set_video_frame_rate(
    stream: &mut CameraStream,
    result: Result<(), CameraError>,
) -> Result<(), CameraError> {
    respond(stream, Opcode::SetVideoFrameRate, result.map(|_| Vec::new())).await
}

/// Capture completes with either the file-transfer sequence or a single
/// error frame under the triggering opcode.
pub(crate) async fn complete_capture(
    stream: &mut CameraStream,
    opcode: Opcode,
    result: Result<&std::path::Path, CameraError>,
) -> Result<(), CameraError> {
    match result {
        Ok(path) => transfer::send_file(stream, path).await,
        Err(error) => net::send_frame(stream, Frame::error(opcode, error)).await,
    }
}

// ── Handlers ──────────────────────────────────────────────────────

fn handle_is_busy<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.is_busy().await;
        complete_is_busy(&mut session.stream, Ok(value)).await
    })
}

fn handle_get_ev<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.ev().await;
        complete_get_ev(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_ev<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_i8(&request)?;
        session.local.set_ev(value).await;
        complete_set_ev(&mut session.stream, Ok(())).await
    })
}

fn handle_get_iso<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.iso().await;
        complete_get_iso(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_iso<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u16(&request)?;
        session.local.set_iso(value).await;
        complete_set_iso(&mut session.stream, Ok(())).await
    })
}

fn handle_get_config<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.config().await;
        complete_get_config(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_config<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = CameraConfig::from_wire(&request.payload)?;
        session.local.set_config(value).await;
        complete_set_config(&mut session.stream, Ok(())).await
    })
}

fn handle_get_contrast<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.contrast().await;
        complete_get_contrast(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_contrast<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_i8(&request)?;
        session.local.set_contrast(value).await;
        complete_set_contrast(&mut session.stream, Ok(())).await
    })
}

fn handle_get_sharpness<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.sharpness().await;
        complete_get_sharpness(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_sharpness<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_i8(&request)?;
        session.local.set_sharpness(value).await;
        complete_set_sharpness(&mut session.stream, Ok(())).await
    })
}

fn handle_get_brightness<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.brightness().await;
        complete_get_brightness(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_brightness<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_brightness(value).await;
        complete_set_brightness(&mut session.stream, Ok(())).await
    })
}

fn handle_get_saturation<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.saturation().await;
        complete_get_saturation(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_saturation<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_i8(&request)?;
        session.local.set_saturation(value).await;
        complete_set_saturation(&mut session.stream, Ok(())).await
    })
}

fn handle_get_white_balance<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.white_balance().await;
        complete_get_white_balance(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_white_balance<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_white_balance(value).await;
        complete_set_white_balance(&mut session.stream, Ok(())).await
    })
}

fn handle_get_shutter_speed<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.shutter_speed().await;
        complete_get_shutter_speed(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_shutter_speed<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u64(&request)?;
        session.local.set_shutter_speed(value).await;
        complete_set_shutter_speed(&mut session.stream, Ok(())).await
    })
}

fn handle_get_exposure_mode<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.exposure_mode().await;
        complete_get_exposure_mode(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_exposure_mode<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_exposure_mode(value).await;
        complete_set_exposure_mode(&mut session.stream, Ok(())).await
    })
}

fn handle_get_metering_mode<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.metering_mode().await;
        complete_get_metering_mode(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_metering_mode<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_metering_mode(value).await;
        complete_set_metering_mode(&mut session.stream, Ok(())).await
    })
}

fn handle_get_jpg_quality<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.jpg_quality().await;
        complete_get_jpg_quality(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_jpg_quality<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_jpg_quality(value).await;
        complete_set_jpg_quality(&mut session.stream, Ok(())).await
    })
}

fn handle_get_image_size<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.image_size().await;
        complete_get_image_size(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_image_size<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let (width, height) = wire::payload_u16_pair(&request)?;
        session.local.set_image_size(width, height).await;
        complete_set_image_size(&mut session.stream, Ok(())).await
    })
}

fn handle_get_image_effect<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.image_effect().await;
        complete_get_image_effect(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_image_effect<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_image_effect(value).await;
        complete_set_image_effect(&mut session.stream, Ok(())).await
    })
}

fn handle_get_image_rotation<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.image_rotation().await;
        complete_get_image_rotation(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_image_rotation<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u16(&request)?;
        session.local.set_image_rotation(value).await;
        complete_set_image_rotation(&mut session.stream, Ok(())).await
    })
}

fn handle_get_video_bit_rate<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.video_bit_rate().await;
        complete_get_video_bit_rate(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_video_bit_rate<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u32(&request)?;
        session.local.set_video_bit_rate(value).await;
        complete_set_video_bit_rate(&mut session.stream, Ok(())).await
    })
}

fn handle_get_video_frame_rate<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = session.local.video_frame_rate().await;
        complete_get_video_frame_rate(&mut session.stream, Ok(value)).await
    })
}

fn handle_set_video_frame_rate<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let value = wire::payload_u8(&request)?;
        session.local.set_video_frame_rate(value).await;
        complete_set_video_frame_rate(&mut session.stream, Ok(())).await
    })
}

fn handle_capture<'a>(
    session: &'a mut Session,
    _request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let path = session.temp_dir.join(session.local.next_image_name().await);
        let captured = session.local.capture_still(&path).await;

        let result = match captured {
            Ok(()) => complete_capture(&mut session.stream, Opcode::Capture, Ok(&path)).await,
            Err(error) => {
                complete_capture(&mut session.stream, Opcode::Capture, Err(error)).await
            }
        };

        // The temp file is gone after the transfer, whatever happened.
        let _ = tokio::fs::remove_file(&path).await;

        result
    })
}

fn handle_capture_video<'a>(
    session: &'a mut Session,
    request: Frame,
) -> BoxFuture<'a, Result<(), CameraError>> {
    Box::pin(async move {
        let duration_secs = wire::payload_u32(&request)?;
        let path = session.temp_dir.join(session.local.next_video_name().await);
        let captured = session
            .local
            .capture_video(std::time::Duration::from_secs(duration_secs as u64), &path)
            .await;

        let result = match captured {
            Ok(()) => complete_capture(&mut session.stream, Opcode::CaptureVideo, Ok(&path)).await,
            Err(error) => {
                complete_capture(&mut session.stream, Opcode::CaptureVideo, Err(error)).await
            }
        };

        let _ = tokio::fs::remove_file(&path).await;

        result
    })
}

// ── Tests ─────────────────────────────────────────────────────────
