//! An accepted client connection inside the service.
//!
//! Sessions are created only by the service accept path and live in the
//! worker's session list; their reach-back into the service goes through
//! the shared [`LocalCamera`] handle, so a session can never outlive the
//! driver state it operates on.

use std::net::SocketAddr;
use std::path::PathBuf;

use futures::{FutureExt, StreamExt};

use crate::camera::local::LocalCamera;
use crate::error::CameraError;
use crate::net::CameraStream;
use crate::protocol::handlers;

pub(crate) struct Session {
    pub(crate) stream: CameraStream,
    pub(crate) peer: SocketAddr,
    pub(crate) local: LocalCamera,
    pub(crate) temp_dir: PathBuf,
}

impl Session {
    pub(crate) fn new(
        stream: CameraStream,
        peer: SocketAddr,
        local: LocalCamera,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            stream,
            peer,
            local,
            temp_dir,
        }
    }

    /// Poll for at most one frame and handle it.
    ///
    /// `Ok(true)` if a frame was handled, `Ok(false)` if nothing was
    /// ready this tick. `Err` means the session is dead — transport
    /// failure, unknown opcode, or a handler-level protocol violation —
    /// and must be dropped by the caller.
    pub(crate) async fn poll(&mut self) -> Result<bool, CameraError> {
        let frame = match self.stream.next().now_or_never() {
            None => return Ok(false),
            Some(None) | Some(Some(Err(_))) => return Err(CameraError::ConnectionClosed),
            Some(Some(Ok(frame))) => frame,
        };

        handlers::dispatch(self, frame).await?;
        Ok(true)
    }
}
