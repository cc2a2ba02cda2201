//! Error codes shared between the public API and the wire protocol.
//!
//! Two types cover the same vocabulary: [`ErrorCode`] is the raw byte that
//! travels in every frame header (including `Success`), while
//! [`CameraError`] is the `Result` error carried through the API. The
//! mapping between them is total in both directions; an unknown wire byte
//! decodes to [`ErrorCode::Undefined`].

use thiserror::Error;

// ── ErrorCode ────────────────────────────────────────────────────

/// Wire-visible status byte, offset 1 of every frame header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success = 0,
    DnsFailed = 1,
    CameraBusy = 2,
    CameraFailed = 3,
    FileOpenError = 4,
    FileStatError = 5,
    FileReadError = 6,
    FileWriteError = 7,
    ThreadStartFailed = 8,
    ConnectionFailed = 9,
    ConnectionClosed = 10,
    ConnectionListenFailed = 11,
    /// Sentinel for unhandled handle variants and unknown wire bytes.
    Undefined = 12,
}

impl ErrorCode {
    /// Decode a header byte. Unknown values collapse to `Undefined`.
    pub fn from_wire(value: u8) -> Self {
        match value {
            0 => ErrorCode::Success,
            1 => ErrorCode::DnsFailed,
            2 => ErrorCode::CameraBusy,
            3 => ErrorCode::CameraFailed,
            4 => ErrorCode::FileOpenError,
            5 => ErrorCode::FileStatError,
            6 => ErrorCode::FileReadError,
            7 => ErrorCode::FileWriteError,
            8 => ErrorCode::ThreadStartFailed,
            9 => ErrorCode::ConnectionFailed,
            10 => ErrorCode::ConnectionClosed,
            11 => ErrorCode::ConnectionListenFailed,
            _ => ErrorCode::Undefined,
        }
    }

    /// Human-readable name, matching what the shell prints.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::DnsFailed => "DNS resolution failed",
            ErrorCode::CameraBusy => "Camera busy",
            ErrorCode::CameraFailed => "Camera failed",
            ErrorCode::FileOpenError => "File open error",
            ErrorCode::FileStatError => "File stat error",
            ErrorCode::FileReadError => "File read error",
            ErrorCode::FileWriteError => "File write error",
            ErrorCode::ThreadStartFailed => "Thread start failed",
            ErrorCode::ConnectionFailed => "Connection failed",
            ErrorCode::ConnectionClosed => "Connection closed",
            ErrorCode::ConnectionListenFailed => "Connection listen failed",
            ErrorCode::Undefined => "Undefined",
        }
    }

    /// `Ok(())` for `Success`, the matching [`CameraError`] otherwise.
    pub fn into_result(self) -> Result<(), CameraError> {
        match CameraError::from_code(self) {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}

// ── CameraError ──────────────────────────────────────────────────

/// The canonical error type for every fallible camera operation.
///
/// Variants map 1:1 onto the non-`Success` wire codes so a service-side
/// failure travels losslessly back to the remote caller.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraError {
    /// The host name could not be resolved.
    #[error("DNS resolution failed")]
    DnsFailed,

    /// A capture is already in progress.
    #[error("camera busy")]
    CameraBusy,

    /// The capture backend reported a failure.
    #[error("camera failed")]
    CameraFailed,

    /// A file could not be opened or created.
    #[error("file open error")]
    FileOpen,

    /// A file's size could not be queried.
    #[error("file stat error")]
    FileStat,

    /// Reading from an open file failed.
    #[error("file read error")]
    FileRead,

    /// Writing to an open file failed.
    #[error("file write error")]
    FileWrite,

    /// The service worker could not be started.
    #[error("worker start failed")]
    ThreadStart,

    /// The TCP connect failed.
    #[error("connection failed")]
    ConnectionFailed,

    /// The peer went away; the socket is closed and the handle is dead
    /// for I/O.
    #[error("connection closed")]
    ConnectionClosed,

    /// Binding or listening on the local endpoint failed.
    #[error("connection listen failed")]
    ConnectionListen,

    /// Bug guard: unhandled handle variant, unknown opcode, or a
    /// malformed payload.
    #[error("undefined")]
    Undefined,
}

impl CameraError {
    /// The wire byte for this error.
    pub fn code(self) -> ErrorCode {
        match self {
            CameraError::DnsFailed => ErrorCode::DnsFailed,
            CameraError::CameraBusy => ErrorCode::CameraBusy,
            CameraError::CameraFailed => ErrorCode::CameraFailed,
            CameraError::FileOpen => ErrorCode::FileOpenError,
            CameraError::FileStat => ErrorCode::FileStatError,
            CameraError::FileRead => ErrorCode::FileReadError,
            CameraError::FileWrite => ErrorCode::FileWriteError,
            CameraError::ThreadStart => ErrorCode::ThreadStartFailed,
            CameraError::ConnectionFailed => ErrorCode::ConnectionFailed,
            CameraError::ConnectionClosed => ErrorCode::ConnectionClosed,
            CameraError::ConnectionListen => ErrorCode::ConnectionListenFailed,
            CameraError::Undefined => ErrorCode::Undefined,
        }
    }

    /// Inverse of [`code`](Self::code); `None` for `Success`.
    pub fn from_code(code: ErrorCode) -> Option<Self> {
        match code {
            ErrorCode::Success => None,
            ErrorCode::DnsFailed => Some(CameraError::DnsFailed),
            ErrorCode::CameraBusy => Some(CameraError::CameraBusy),
            ErrorCode::CameraFailed => Some(CameraError::CameraFailed),
            ErrorCode::FileOpenError => Some(CameraError::FileOpen),
            ErrorCode::FileStatError => Some(CameraError::FileStat),
            ErrorCode::FileReadError => Some(CameraError::FileRead),
            ErrorCode::FileWriteError => Some(CameraError::FileWrite),
            ErrorCode::ThreadStartFailed => Some(CameraError::ThreadStart),
            ErrorCode::ConnectionFailed => Some(CameraError::ConnectionFailed),
            ErrorCode::ConnectionClosed => Some(CameraError::ConnectionClosed),
            ErrorCode::ConnectionListenFailed => Some(CameraError::ConnectionListen),
            ErrorCode::Undefined => Some(CameraError::Undefined),
        }
    }
}

// Any I/O failure on an established stream kills it; the protocol layer
// only ever sees a closed connection.
impl From<std::io::Error> for CameraError {
    fn from(_: std::io::Error) -> Self {
        CameraError::ConnectionClosed
    }
}

// ── Tests ─────────────────────────────────────────────────────────
