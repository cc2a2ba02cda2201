//! Chunked, acknowledged file transfer, layered on the frame protocol.
//!
//! Used to deliver capture results. After the triggering request has been
//! handled, the sender (service) and receiver (client) run:
//!
//! ```text
//! Service ──[FileTransferOffer, total size u64]──────────► Client
//! Client  ──[FileTransferAck]────────────────────────────► Service
//! Service ──[FileTransferOffer, chunk bytes]─────────────► Client   (repeated)
//! Client  ──[FileTransferAck]────────────────────────────► Service  (per chunk)
//! ```
//!
//! The transfer ends when the cumulative bytes equal the announced size.
//! File-level failures travel as error frames inside the sequence and
//! leave the session alive; a dead connection terminates both sides.

use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::error::{CameraError, ErrorCode};
use crate::net::{self, CameraStream};
use crate::protocol::Opcode;
use crate::wire::{self, Frame};

/// Fixed chunk size; the last chunk carries the remainder.
pub const CHUNK_SIZE: usize = 1_000_000;

/// Receiver-side progress callback, invoked as `(total, received)` after
/// each successful chunk write.
pub type Progress<'a> = &'a mut (dyn FnMut(u64, u64) + Send);

// ── Sender ────────────────────────────────────────────────────────

/// Stream `path` to the peer.
///
/// File-level errors (stat, open, read) are reported to the peer as error
/// frames and return `Ok(())` — the session survives them. `Err` means
/// the connection itself died.
pub async fn send_file(stream: &mut CameraStream, path: &Path) -> Result<(), CameraError> {
    let size = match tokio::fs::metadata(path).await {
        Ok(meta) => meta.len(),
        Err(_) => {
            return net::send_frame(
                stream,
                Frame::error(Opcode::FileTransferOffer, CameraError::FileStat),
            )
            .await;
        }
    };

    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(_) => {
            return net::send_frame(
                stream,
                Frame::error(Opcode::FileTransferOffer, CameraError::FileOpen),
            )
            .await;
        }
    };

    net::send_frame(
        stream,
        Frame::response(Opcode::FileTransferOffer, size.to_be_bytes().to_vec()),
    )
    .await?;

    let ack = net::recv_frame(stream).await?;
    if ack.error != ErrorCode::Success {
        // Receiver could not open its destination; nothing more to send.
        return Ok(());
    }

    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut sent: u64 = 0;

    while sent < size {
        let want = CHUNK_SIZE.min((size - sent) as usize);

        if file.read_exact(&mut chunk[..want]).await.is_err() {
            return net::send_frame(
                stream,
                Frame::error(Opcode::FileTransferOffer, CameraError::FileRead),
            )
            .await;
        }

        net::send_frame(
            stream,
            Frame::response(Opcode::FileTransferOffer, chunk[..want].to_vec()),
        )
        .await?;

        let ack = net::recv_frame(stream).await?;
        if ack.error != ErrorCode::Success {
            return Ok(());
        }

        sent += want as u64;
    }

    Ok(())
}

// ── Receiver ──────────────────────────────────────────────────────

/// Receive a file announced by the peer into `dest`.
///
/// On failure the partial file is left on disk; cleanup is the caller's
/// responsibility.
pub async fn receive_file(
    stream: &mut CameraStream,
    dest: &Path,
    mut progress: Option<Progress<'_>>,
) -> Result<(), CameraError> {
    let offer = net::recv_frame(stream).await?;
    offer.check()?;
    let total = wire::payload_u64(&offer)?;

    let mut file = match File::create(dest).await {
        Ok(file) => file,
        Err(_) => {
            net::send_frame(
                stream,
                Frame::error(Opcode::FileTransferAck, CameraError::FileOpen),
            )
            .await?;
            return Err(CameraError::FileOpen);
        }
    };

    net::send_frame(stream, Frame::response(Opcode::FileTransferAck, Vec::new())).await?;

    let mut received: u64 = 0;

    while received < total {
        let chunk = net::recv_frame(stream).await?;
        chunk.check()?;

        // An empty chunk can never make progress toward the announced
        // size; treat it as a dead peer.
        if chunk.payload.is_empty() {
            return Err(CameraError::ConnectionClosed);
        }

        if file.write_all(&chunk.payload).await.is_err() {
            net::send_frame(
                stream,
                Frame::error(Opcode::FileTransferAck, CameraError::FileWrite),
            )
            .await?;
            return Err(CameraError::FileWrite);
        }

        received += chunk.payload.len() as u64;
        net::send_frame(stream, Frame::response(Opcode::FileTransferAck, Vec::new())).await?;

        if let Some(callback) = progress.as_mut() {
            callback(total, received);
        }
    }

    file.flush().await.map_err(|_| CameraError::FileWrite)?;

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio_util::codec::Framed;

    use crate::wire::FrameCodec;

    async fn stream_pair() -> (CameraStream, CameraStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let client = tokio::spawn(async move { net::connect(addr).await.unwrap() });
        let (socket, _) = listener.accept().await.unwrap();
        (Framed::new(socket, FrameCodec), client.await.unwrap())
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("picam-transfer-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn single_chunk_transfer() {
        let (mut tx, mut rx) = stream_pair().await;

        let src = scratch("src-small");
        let dest = scratch("dest-small");
        tokio::fs::write(&src, b"not actually a jpeg").await.unwrap();

        let sender = {
            let src = src.clone();
            tokio::spawn(async move {
                send_file(&mut tx, &src).await.unwrap();
            })
        };

        let mut calls = Vec::new();
        let mut record = |total: u64, received: u64| calls.push((total, received));
        receive_file(&mut rx, &dest, Some(&mut record)).await.unwrap();
        sender.await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"not actually a jpeg");
        assert_eq!(calls, vec![(19, 19)]);

        let _ = tokio::fs::remove_file(&src).await;
        let _ = tokio::fs::remove_file(&dest).await;
    }

    #[tokio::test]
    async fn multi_chunk_transfer() {
        let (mut tx, mut rx) = stream_pair().await;

        let src = scratch("src-large");
        let dest = scratch("dest-large");
        let payload: Vec<u8> = (0..2_500_000u32).map(|i| (i % 251) as u8).collect();
        tokio::fs::write(&src, &payload).await.unwrap();

        let sender = {
            let src = src.clone();
            tokio::spawn(async move {
                send_file(&mut tx, &src).await.unwrap();
            })
        };

        let mut calls = Vec::new();
        let mut record = |total: u64, received: u64| calls.push((total, received));
        receive_file(&mut rx, &dest, Some(&mut record)).await.unwrap();
        sender.await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), payload);
        assert_eq!(
            calls,
            vec![
                (2_500_000, 1_000_000),
                (2_500_000, 2_000_000),
                (2_500_000, 2_500_000),
            ]
        );

        let _ = tokio::fs::remove_file(&src).await;
        let _ = tokio::fs::remove_file(&dest).await;
    }

    #[tokio::test]
    async fn empty_file_transfer() {
        let (mut tx, mut rx) = stream_pair().await;

        let src = scratch("src-empty");
        let dest = scratch("dest-empty");
        tokio::fs::write(&src, b"").await.unwrap();

        let sender = {
            let src = src.clone();
            tokio::spawn(async move {
                send_file(&mut tx, &src).await.unwrap();
            })
        };

        receive_file(&mut rx, &dest, None).await.unwrap();
        sender.await.unwrap();

        assert!(tokio::fs::read(&dest).await.unwrap().is_empty());

        let _ = tokio::fs::remove_file(&src).await;
        let _ = tokio::fs::remove_file(&dest).await;
    }

    #[tokio::test]
    async fn missing_file_surfaces_stat_error() {
        let (mut tx, mut rx) = stream_pair().await;

        let dest = scratch("dest-missing");
        let sender = tokio::spawn(async move {
            send_file(&mut tx, Path::new("/nonexistent/picam-no-such-file")).await
        });

        let result = receive_file(&mut rx, &dest, None).await;
        assert_eq!(result, Err(CameraError::FileStat));
        // The session-level result on the sender is still Ok.
        assert!(sender.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn unwritable_destination_aborts() {
        let (mut tx, mut rx) = stream_pair().await;

        let src = scratch("src-unwritable");
        tokio::fs::write(&src, b"data").await.unwrap();

        let sender = {
            let src = src.clone();
            tokio::spawn(async move { send_file(&mut tx, &src).await })
        };

        let result = receive_file(&mut rx, Path::new("/nonexistent/dir/out.jpg"), None).await;
        assert_eq!(result, Err(CameraError::FileOpen));
        assert!(sender.await.unwrap().is_ok());

        let _ = tokio::fs::remove_file(&src).await;
    }

    #[tokio::test]
    async fn dead_peer_terminates_receiver() {
        let (tx, mut rx) = stream_pair().await;
        drop(tx);

        let dest = scratch("dest-dead");
        let result = receive_file(&mut rx, &dest, None).await;
        assert_eq!(result, Err(CameraError::ConnectionClosed));
    }
}
