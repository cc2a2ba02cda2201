//! The request/response protocol: opcodes, client begins, service
//! completes, and the chunked file-transfer sub-protocol.
//!
//! For every operation there is exactly one client-side `begin_*` function
//! ([`client`]) and one service-side `complete_*` function (the handler
//! module); their symmetry is the core invariant of the wire protocol.
//! Capture results travel through the acknowledged chunked transfer in
//! [`transfer`].

pub mod client;
pub(crate) mod handlers;
pub mod transfer;

use crate::error::CameraError;

// ── Opcode ────────────────────────────────────────────────────────

/// Wire-visible operation identifiers, offset 0 of every frame header.
///
/// The numbering is stable: requests and responses for an operation share
/// its opcode, and [`FileTransferOffer`](Opcode::FileTransferOffer) /
/// [`FileTransferAck`](Opcode::FileTransferAck) only ever appear inside an
/// ongoing transfer sequence, never at the top level.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    IsBusy = 0,

    GetEv = 1,
    SetEv = 2,

    GetIso = 3,
    SetIso = 4,

    GetConfig = 5,
    SetConfig = 6,

    GetContrast = 7,
    SetContrast = 8,

    GetSharpness = 9,
    SetSharpness = 10,

    GetBrightness = 11,
    SetBrightness = 12,

    GetSaturation = 13,
    SetSaturation = 14,

    GetWhiteBalance = 15,
    SetWhiteBalance = 16,

    GetShutterSpeed = 17,
    SetShutterSpeed = 18,

    GetExposureMode = 19,
    SetExposureMode = 20,

    GetMeteringMode = 21,
    SetMeteringMode = 22,

    GetJpgQuality = 23,
    SetJpgQuality = 24,

    GetImageSize = 25,
    SetImageSize = 26,

    GetImageEffect = 27,
    SetImageEffect = 28,

    GetImageRotation = 29,
    SetImageRotation = 30,

    GetVideoBitRate = 31,
    SetVideoBitRate = 32,

    GetVideoFrameRate = 33,
    SetVideoFrameRate = 34,

    FileTransferOffer = 35,
    FileTransferAck = 36,

    Capture = 37,
    CaptureVideo = 38,
}

impl Opcode {
    /// Number of opcodes; the handler table has exactly this many slots.
    pub const COUNT: usize = 39;
}

impl TryFrom<u8> for Opcode {
    type Error = CameraError;

    fn try_from(value: u8) -> Result<Self, CameraError> {
        match value {
            0 => Ok(Opcode::IsBusy),
            1 => Ok(Opcode::GetEv),
            2 => Ok(Opcode::SetEv),
            3 => Ok(Opcode::GetIso),
            4 => Ok(Opcode::SetIso),
            5 => Ok(Opcode::GetConfig),
            6 => Ok(Opcode::SetConfig),
            7 => Ok(Opcode::GetContrast),
            8 => Ok(Opcode::SetContrast),
            9 => Ok(Opcode::GetSharpness),
            10 => Ok(Opcode::SetSharpness),
            11 => Ok(Opcode::GetBrightness),
            12 => Ok(Opcode::SetBrightness),
            13 => Ok(Opcode::GetSaturation),
            14 => Ok(Opcode::SetSaturation),
            15 => Ok(Opcode::GetWhiteBalance),
            16 => Ok(Opcode::SetWhiteBalance),
            17 => Ok(Opcode::GetShutterSpeed),
            18 => Ok(Opcode::SetShutterSpeed),
            19 => Ok(Opcode::GetExposureMode),
            20 => Ok(Opcode::SetExposureMode),
            21 => Ok(Opcode::GetMeteringMode),
            22 => Ok(Opcode::SetMeteringMode),
            23 => Ok(Opcode::GetJpgQuality),
            24 => Ok(Opcode::SetJpgQuality),
            25 => Ok(Opcode::GetImageSize),
            26 => Ok(Opcode::SetImageSize),
            27 => Ok(Opcode::GetImageEffect),
            28 => Ok(Opcode::SetImageEffect),
            29 => Ok(Opcode::GetImageRotation),
            30 => Ok(Opcode::SetImageRotation),
            31 => Ok(Opcode::GetVideoBitRate),
            32 => Ok(Opcode::SetVideoBitRate),
            33 => Ok(Opcode::GetVideoFrameRate),
            34 => Ok(Opcode::SetVideoFrameRate),
            35 => Ok(Opcode::FileTransferOffer),
            36 => Ok(Opcode::FileTransferAck),
            37 => Ok(Opcode::Capture),
            38 => Ok(Opcode::CaptureVideo),
            _ => Err(CameraError::Undefined),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────
