//! Socket plumbing: DNS resolution, connect/listen, and framed send/recv.
//!
//! Every I/O failure on an established stream surfaces as
//! [`CameraError::ConnectionClosed`] and the stream is dropped, which
//! closes the socket. There is no retry layer here; callers retry by
//! re-issuing the call.

use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::{lookup_host, TcpListener, TcpStream};
use tokio_util::codec::Framed;

use crate::error::CameraError;
use crate::wire::{Frame, FrameCodec};

/// A TCP stream speaking the framed wire format.
pub type CameraStream = Framed<TcpStream, FrameCodec>;

/// Resolve `host:port` to the first address DNS returns.
pub async fn resolve(host: &str, port: u16) -> Result<SocketAddr, CameraError> {
    let mut addrs = lookup_host((host, port))
        .await
        .map_err(|_| CameraError::DnsFailed)?;

    addrs.next().ok_or(CameraError::DnsFailed)
}

/// Connect to a resolved endpoint and wrap the socket in the frame codec.
pub async fn connect(addr: SocketAddr) -> Result<CameraStream, CameraError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|_| CameraError::ConnectionFailed)?;

    // Request/response frames are tiny; don't let Nagle hold them back.
    let _ = stream.set_nodelay(true);

    Ok(Framed::new(stream, FrameCodec))
}

/// Bind and listen on a local endpoint.
pub async fn listen(addr: SocketAddr) -> Result<TcpListener, CameraError> {
    TcpListener::bind(addr)
        .await
        .map_err(|_| CameraError::ConnectionListen)
}

/// Send one frame, flushing it onto the wire.
pub async fn send_frame(stream: &mut CameraStream, frame: Frame) -> Result<(), CameraError> {
    stream
        .send(frame)
        .await
        .map_err(|_| CameraError::ConnectionClosed)
}

/// Block until one complete frame arrives or the connection dies.
pub async fn recv_frame(stream: &mut CameraStream) -> Result<Frame, CameraError> {
    match stream.next().await {
        Some(Ok(frame)) => Ok(frame),
        Some(Err(_)) | None => Err(CameraError::ConnectionClosed),
    }
}

// ── Tests ─────────────────────────────────────────────────────────
