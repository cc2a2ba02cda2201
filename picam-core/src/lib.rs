//! Network-transparent control of a Raspberry Pi camera.
//!
//! One programming model — a [`CameraHandle`] with uniform getters,
//! setters and capture operations — resolves to one of three backing
//! roles:
//!
//! - **Local**: an in-process driver that shells out to the platform's
//!   still/video capture tools.
//! - **Remote**: a client forwarding every call over TCP.
//! - **Service**: a TCP listener multiplexing many client sessions
//!   against a single embedded local driver.
//!
//! The wire protocol is a length-prefixed binary format with a 6-byte
//! frame header ([`wire`]), an opcode-indexed handler table
//! ([`protocol`]), and a chunked acknowledged file transfer for capture
//! results ([`protocol::transfer`]).

pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod net;
pub mod protocol;
pub mod wire;

pub use backend::{CaptureBackend, RaspiBackend};
pub use camera::{
    CameraHandle, CameraService, LocalCamera, RemoteCamera, ServiceConfig, DEFAULT_TICK_RATE,
};
pub use config::{CameraConfig, ExposureMode, ImageEffect, MeteringMode, WhiteBalance};
pub use error::{CameraError, ErrorCode};
pub use protocol::transfer::CHUNK_SIZE;
pub use protocol::Opcode;
pub use wire::{Frame, FrameCodec, HEADER_LEN, MAX_PAYLOAD_LEN};
