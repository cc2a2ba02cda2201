//! The TCP service: accept loop, session polling and lifecycle.
//!
//! A dedicated worker task runs the tick-paced loop. Each tick it accepts
//! new connections up to the configured bound, polls every session for at
//! most one frame, and sleeps the remainder of the tick. The worker owns
//! the session list exclusively; direct calls on the service handle reach
//! the same driver state through the shared, mutex-guarded
//! [`LocalCamera`].

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::FutureExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::codec::Framed;

use crate::backend::CaptureBackend;
use crate::camera::local::LocalCamera;
use crate::camera::session::Session;
use crate::error::CameraError;
use crate::net;
use crate::protocol::handlers;
use crate::wire::FrameCodec;

/// Default pace of the accept/poll loop, in ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 2;

// ── ServiceConfig ────────────────────────────────────────────────

/// Tunables for [`CameraService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Worker loop pace in ticks per second (minimum 1).
    pub tick_rate: u32,
    /// Directory for capture scratch files; they are deleted after every
    /// transfer.
    pub temp_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            temp_dir: std::env::temp_dir(),
        }
    }
}

// ── CameraService ────────────────────────────────────────────────

/// A running camera service with its embedded local driver.
pub struct CameraService {
    local: LocalCamera,
    local_addr: SocketAddr,
    max_connections: usize,
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Result<(), CameraError>>,
}

impl CameraService {
    /// Resolve, bind, listen and start the worker.
    ///
    /// The handler table is validated first; a service with a misindexed
    /// table refuses to run.
    pub async fn open(
        host: &str,
        port: u16,
        max_connections: usize,
        config: ServiceConfig,
        backend: Arc<dyn CaptureBackend>,
    ) -> Result<Self, CameraError> {
        handlers::validate_table()?;

        let addr = net::resolve(host, port).await?;
        let listener = net::listen(addr).await?;
        let local_addr = listener
            .local_addr()
            .map_err(|_| CameraError::ConnectionListen)?;

        let local = LocalCamera::new(backend);
        let stop = Arc::new(AtomicBool::new(false));

        let worker = tokio::spawn(run_loop(
            listener,
            local.clone(),
            Arc::clone(&stop),
            max_connections,
            config,
        ));

        tracing::info!(%local_addr, max_connections, "camera service listening");

        Ok(Self {
            local,
            local_addr,
            max_connections,
            stop,
            worker,
        })
    }

    /// The embedded local driver — single source of truth for all config
    /// reads and writes performed on behalf of any session.
    pub fn local(&self) -> &LocalCamera {
        &self.local
    }

    /// The bound listening address (useful with port 0).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Whether the worker is still running.
    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Signal the worker to stop and wait for it to exit. The listener
    /// and every session close when the loop unwinds; in-flight frames
    /// are not drained.
    pub async fn close(self) {
        self.stop.store(true, Ordering::SeqCst);
        let _ = self.worker.await;
    }
}

// ── Worker loop ───────────────────────────────────────────────────

async fn run_loop(
    listener: TcpListener,
    local: LocalCamera,
    stop: Arc<AtomicBool>,
    max_connections: usize,
    config: ServiceConfig,
) -> Result<(), CameraError> {
    let tick = Duration::from_secs_f64(1.0 / config.tick_rate.max(1) as f64);
    let mut sessions: Vec<Session> = Vec::new();

    while !stop.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        // 1. Accept until the bound is reached or nothing is pending.
        while sessions.len() < max_connections {
            match listener.accept().now_or_never() {
                None => break,
                Some(Ok((socket, peer))) => {
                    let _ = socket.set_nodelay(true);
                    tracing::debug!(%peer, sessions = sessions.len() + 1, "session accepted");
                    sessions.push(Session::new(
                        Framed::new(socket, FrameCodec),
                        peer,
                        local.clone(),
                        config.temp_dir.clone(),
                    ));
                }
                Some(Err(error)) => {
                    // A listener error takes the whole service down.
                    tracing::error!(%error, "accept failed, stopping service");
                    return Err(CameraError::ConnectionClosed);
                }
            }
        }

        // 2. Poll each session for at most one frame.
        let mut index = 0;
        while index < sessions.len() {
            match sessions[index].poll().await {
                Ok(_) => index += 1,
                Err(error) => {
                    tracing::debug!(peer = %sessions[index].peer, %error, "session dropped");
                    sessions.swap_remove(index);
                }
            }
        }

        // 3. Sleep the remainder of the tick.
        let elapsed = tick_start.elapsed();
        if elapsed < tick {
            tokio::time::sleep(tick - elapsed).await;
        }
    }

    tracing::info!("camera service stopping");
    Ok(())
}
