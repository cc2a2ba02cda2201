//! The framed wire format.
//!
//! Every message on the wire is one frame:
//!
//! ```text
//! offset 0: u8   opcode
//! offset 1: u8   error code
//! offset 2: u32  payload length   (big-endian)
//! offset 6: ..   payload bytes    (present iff error == Success and length > 0)
//! ```
//!
//! The header is exactly [`HEADER_LEN`] bytes with no padding. All
//! multi-byte integers inside payloads are big-endian; single bytes
//! (including signed 8-bit values and booleans as 0/1) are written raw.
//! [`FrameCodec`] plugs the format into `tokio_util`'s framed transport.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{CameraError, ErrorCode};
use crate::protocol::Opcode;

/// Size of the fixed frame header in bytes.
pub const HEADER_LEN: usize = 6;

/// Ceiling on the advertised payload length, enforced before the receive
/// buffer is allocated. A peer announcing more is treated as gone.
pub const MAX_PAYLOAD_LEN: usize = 32 * 1024 * 1024;

// ── Frame ─────────────────────────────────────────────────────────

/// One header plus optional payload, the atomic unit of the protocol.
///
/// The opcode is kept as a raw byte; interpreting it is the dispatch
/// layer's job so that an unknown opcode can be detected and the session
/// closed rather than failing mid-decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub opcode: u8,
    pub error: ErrorCode,
    pub payload: Vec<u8>,
}

impl Frame {
    /// A client request carrying `payload`.
    pub fn request(opcode: Opcode, payload: Vec<u8>) -> Self {
        Self {
            opcode: opcode as u8,
            error: ErrorCode::Success,
            payload,
        }
    }

    /// A successful service response carrying `payload`.
    pub fn response(opcode: Opcode, payload: Vec<u8>) -> Self {
        Self::request(opcode, payload)
    }

    /// A failed service response. Error frames never carry a payload.
    pub fn error(opcode: Opcode, error: CameraError) -> Self {
        Self {
            opcode: opcode as u8,
            error: error.code(),
            payload: Vec::new(),
        }
    }

    /// `Ok(())` if the header signals success, the carried error
    /// otherwise.
    pub fn check(&self) -> Result<(), CameraError> {
        self.error.into_result()
    }
}

// ── FrameCodec ────────────────────────────────────────────────────

/// `tokio_util` codec for [`Frame`]s.
pub struct FrameCodec;

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = CameraError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, CameraError> {
        if src.len() < HEADER_LEN {
            return Ok(None);
        }

        let error = ErrorCode::from_wire(src[1]);
        let payload_len = u32::from_be_bytes([src[2], src[3], src[4], src[5]]) as usize;

        if payload_len > MAX_PAYLOAD_LEN {
            return Err(CameraError::ConnectionClosed);
        }

        // Payload bytes are on the wire only for successful frames.
        let frame_len = if error == ErrorCode::Success {
            HEADER_LEN + payload_len
        } else {
            HEADER_LEN
        };

        if src.len() < frame_len {
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        let opcode = src[0];
        src.advance(HEADER_LEN);
        let payload = if frame_len > HEADER_LEN {
            src.split_to(payload_len).to_vec()
        } else {
            Vec::new()
        };

        Ok(Some(Frame {
            opcode,
            error,
            payload,
        }))
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = CameraError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), CameraError> {
        if frame.payload.len() > MAX_PAYLOAD_LEN {
            return Err(CameraError::ConnectionClosed);
        }

        dst.reserve(HEADER_LEN + frame.payload.len());
        dst.put_u8(frame.opcode);
        dst.put_u8(frame.error as u8);
        dst.put_u32(frame.payload.len() as u32);
        if frame.error == ErrorCode::Success {
            dst.extend_from_slice(&frame.payload);
        }
        Ok(())
    }
}

// ── Payload decoding ─────────────────────────────────────────────

// A payload of the wrong width is a protocol bug on the peer, not an I/O
// condition; all of these surface the Undefined guard.

pub fn payload_u8(frame: &Frame) -> Result<u8, CameraError> {
    match frame.payload.as_slice() {
        [value] => Ok(*value),
        _ => Err(CameraError::Undefined),
    }
}

pub fn payload_i8(frame: &Frame) -> Result<i8, CameraError> {
    payload_u8(frame).map(|value| value as i8)
}

pub fn payload_bool(frame: &Frame) -> Result<bool, CameraError> {
    payload_u8(frame).map(|value| value != 0)
}

pub fn payload_u16(frame: &Frame) -> Result<u16, CameraError> {
    match frame.payload.as_slice() {
        [a, b] => Ok(u16::from_be_bytes([*a, *b])),
        _ => Err(CameraError::Undefined),
    }
}

pub fn payload_u16_pair(frame: &Frame) -> Result<(u16, u16), CameraError> {
    match frame.payload.as_slice() {
        [a, b, c, d] => Ok((
            u16::from_be_bytes([*a, *b]),
            u16::from_be_bytes([*c, *d]),
        )),
        _ => Err(CameraError::Undefined),
    }
}

pub fn payload_u32(frame: &Frame) -> Result<u32, CameraError> {
    match frame.payload.as_slice() {
        [a, b, c, d] => Ok(u32::from_be_bytes([*a, *b, *c, *d])),
        _ => Err(CameraError::Undefined),
    }
}

pub fn payload_u64(frame: &Frame) -> Result<u64, CameraError> {
    match frame.payload.as_slice() {
        [a, b, c, d, e, f, g, h] => Ok(u64::from_be_bytes([*a, *b, *c, *d, *e, *f, *g, *h])),
        _ => Err(CameraError::Undefined),
    }
}

// ── Tests ─────────────────────────────────────────────────────────
