//! Integration tests — full service lifecycle, wire round-trips and error
//! scenarios over real TCP connections on localhost.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use picam_core::{
    CameraConfig, CameraError, CameraHandle, CameraService, CaptureBackend, ErrorCode, Frame,
    ServiceConfig, WhiteBalance,
};

// ── Helpers ──────────────────────────────────────────────────────

/// Backend that writes fixed bytes after an optional delay, standing in
/// for the capture tools.
struct FixtureBackend {
    data: Vec<u8>,
    delay: Duration,
}

impl FixtureBackend {
    fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            delay: Duration::ZERO,
        }
    }

    fn slow(data: Vec<u8>, delay: Duration) -> Self {
        Self { data, delay }
    }
}

impl CaptureBackend for FixtureBackend {
    fn capture_still<'a>(
        &'a self,
        _config: &'a CameraConfig,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), CameraError>> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            tokio::fs::write(dest, &self.data)
                .await
                .map_err(|_| CameraError::FileWrite)
        })
    }

    fn capture_video<'a>(
        &'a self,
        config: &'a CameraConfig,
        _duration: Duration,
        dest: &'a Path,
    ) -> BoxFuture<'a, Result<(), CameraError>> {
        self.capture_still(config, dest)
    }
}

static DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Fresh scratch directory per test.
async fn scratch_dir() -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "picam-it-{}-{}",
        std::process::id(),
        DIR_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));
    tokio::fs::create_dir_all(&dir).await.unwrap();
    dir
}

/// Start a service on an OS-assigned port with a fast tick for tests.
async fn start_service(max_connections: usize, backend: FixtureBackend) -> CameraService {
    let config = ServiceConfig {
        tick_rate: 50,
        temp_dir: scratch_dir().await,
    };
    CameraService::open("127.0.0.1", 0, max_connections, config, Arc::new(backend))
        .await
        .unwrap()
}

async fn connect_to(service: &CameraService) -> CameraHandle {
    let addr = service.local_addr();
    CameraHandle::open_remote(&addr.ip().to_string(), addr.port())
        .await
        .unwrap()
}

// ── Handle variants ──────────────────────────────────────────────

#[tokio::test]
async fn remote_handle_variant_queries() {
    let service = start_service(2, FixtureBackend::new(Vec::new())).await;
    let remote = connect_to(&service).await;

    assert!(remote.is_remote());
    assert!(remote.is_connected());
    assert!(!remote.is_service());

    service.close().await;
}

#[tokio::test]
async fn local_handle_set_get_clamps() {
    let mut camera = CameraHandle::open_with_backend(Arc::new(FixtureBackend::new(Vec::new())));

    assert!(!camera.is_remote());
    assert!(!camera.is_service());
    assert!(!camera.is_connected());

    camera.set_ev(11).await.unwrap();
    assert_eq!(camera.ev().await.unwrap(), 10);
    camera.set_ev(-20).await.unwrap();
    assert_eq!(camera.ev().await.unwrap(), -10);
}

// ── Service dispatch ─────────────────────────────────────────────

#[tokio::test]
async fn two_clients_share_one_driver() {
    let service = start_service(2, FixtureBackend::new(Vec::new())).await;

    let mut a = connect_to(&service).await;
    a.set_contrast(50).await.unwrap();

    let mut b = connect_to(&service).await;
    assert_eq!(b.contrast().await.unwrap(), 50);

    service.close().await;
}

#[tokio::test]
async fn every_operation_round_trips() {
    let service = start_service(1, FixtureBackend::new(Vec::new())).await;
    let mut camera = connect_to(&service).await;

    assert!(!camera.is_busy().await.unwrap());

    camera.set_ev(-4).await.unwrap();
    assert_eq!(camera.ev().await.unwrap(), -4);

    camera.set_iso(400).await.unwrap();
    assert_eq!(camera.iso().await.unwrap(), 400);

    camera.set_contrast(120).await.unwrap();
    assert_eq!(camera.contrast().await.unwrap(), 100); // clamped

    camera.set_sharpness(-120).await.unwrap();
    assert_eq!(camera.sharpness().await.unwrap(), -100); // clamped

    camera.set_brightness(80).await.unwrap();
    assert_eq!(camera.brightness().await.unwrap(), 80);

    camera.set_saturation(-5).await.unwrap();
    assert_eq!(camera.saturation().await.unwrap(), -5);

    camera
        .set_white_balance(WhiteBalance::Tungsten as u8)
        .await
        .unwrap();
    assert_eq!(
        camera.white_balance().await.unwrap(),
        WhiteBalance::Tungsten as u8
    );

    camera.set_shutter_speed(2_000_000).await.unwrap();
    assert_eq!(camera.shutter_speed().await.unwrap(), 2_000_000);

    camera.set_exposure_mode(4).await.unwrap();
    assert_eq!(camera.exposure_mode().await.unwrap(), 4);

    camera.set_metering_mode(2).await.unwrap();
    assert_eq!(camera.metering_mode().await.unwrap(), 2);

    camera.set_jpg_quality(150).await.unwrap();
    assert_eq!(camera.jpg_quality().await.unwrap(), 100); // clamped

    camera.set_image_size(1920, 4000).await.unwrap();
    assert_eq!(camera.image_size().await.unwrap(), (1920, 2464)); // height clamped

    camera.set_image_effect(7).await.unwrap();
    assert_eq!(camera.image_effect().await.unwrap(), 7);

    camera.set_image_rotation(720).await.unwrap();
    assert_eq!(camera.image_rotation().await.unwrap(), 359); // clamped

    camera.set_video_bit_rate(0).await.unwrap();
    assert_eq!(camera.video_bit_rate().await.unwrap(), 1); // clamped

    camera.set_video_frame_rate(60).await.unwrap();
    assert_eq!(camera.video_frame_rate().await.unwrap(), 30); // clamped

    service.close().await;
}

#[tokio::test]
async fn remote_config_matches_service_local() {
    let service = start_service(1, FixtureBackend::new(Vec::new())).await;
    let mut camera = connect_to(&service).await;

    camera.set_ev(3).await.unwrap();
    camera.set_iso(200).await.unwrap();
    camera.set_image_rotation(90).await.unwrap();

    let over_the_wire = camera.config().await.unwrap();
    let at_the_service = service.local().config().await;
    assert_eq!(over_the_wire, at_the_service);
    assert_eq!(over_the_wire.to_wire(), at_the_service.to_wire());

    service.close().await;
}

#[tokio::test]
async fn set_config_round_trips() {
    let service = start_service(1, FixtureBackend::new(Vec::new())).await;
    let mut camera = connect_to(&service).await;

    let config = CameraConfig {
        ev: 2,
        iso: 800,
        brightness: 60,
        image_size_width: 1280,
        image_size_height: 720,
        video_frame_rate: 24,
        ..CameraConfig::default()
    };
    camera.set_config(&config).await.unwrap();
    assert_eq!(camera.config().await.unwrap(), config);

    // Out-of-range numeric fields are clamped service-side.
    let wild = CameraConfig {
        ev: 127,
        iso: 65535,
        ..config
    };
    camera.set_config(&wild).await.unwrap();
    let stored = camera.config().await.unwrap();
    assert_eq!(stored.ev, 10);
    assert_eq!(stored.iso, 800);

    service.close().await;
}

// ── Max connections ──────────────────────────────────────────────

#[tokio::test]
async fn second_session_deferred_until_first_leaves() {
    let service = start_service(1, FixtureBackend::new(Vec::new())).await;

    let mut a = connect_to(&service).await;
    a.set_ev(5).await.unwrap();

    // B's TCP connect lands in the backlog, but the service never accepts
    // it while A holds the only slot, so the request goes unanswered.
    let mut b = connect_to(&service).await;
    let starved = tokio::time::timeout(Duration::from_millis(300), b.ev()).await;
    assert!(starved.is_err());

    // Once A leaves, B gets accepted and served.
    a.close().await;
    let value = tokio::time::timeout(Duration::from_secs(5), b.ev())
        .await
        .expect("accept after slot freed")
        .unwrap();
    assert_eq!(value, 5);

    service.close().await;
}

// ── Capture ──────────────────────────────────────────────────────

#[tokio::test]
async fn capture_over_the_wire_single_chunk() {
    let fixture = b"42 bytes of fixture image data, exactly...".to_vec();
    assert_eq!(fixture.len(), 42);

    let service = start_service(1, FixtureBackend::new(fixture.clone())).await;
    let mut camera = connect_to(&service).await;

    let dest = scratch_dir().await.join("out.jpg");
    let mut calls = Vec::new();
    let mut progress = |total: u64, received: u64| calls.push((total, received));
    camera
        .capture_with_progress(&dest, Some(&mut progress))
        .await
        .unwrap();

    assert_eq!(tokio::fs::read(&dest).await.unwrap(), fixture);
    assert_eq!(calls, vec![(42, 42)]);

    service.close().await;
}

#[tokio::test]
async fn capture_over_the_wire_multi_chunk() {
    let fixture: Vec<u8> = (0..2_500_000u32).map(|i| (i % 253) as u8).collect();

    let service = start_service(1, FixtureBackend::new(fixture.clone())).await;
    let mut camera = connect_to(&service).await;

    let dest = scratch_dir().await.join("large.jpg");
    let mut chunks = 0u32;
    let mut progress = |_: u64, _: u64| chunks += 1;
    camera
        .capture_with_progress(&dest, Some(&mut progress))
        .await
        .unwrap();

    assert_eq!(chunks, 3);
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), fixture);

    service.close().await;
}

#[tokio::test]
async fn capture_video_over_the_wire() {
    let fixture = b"mp4 container bytes".to_vec();
    let service = start_service(1, FixtureBackend::new(fixture.clone())).await;
    let mut camera = connect_to(&service).await;

    let dest = scratch_dir().await.join("clip.mp4");
    camera.capture_video(3, &dest).await.unwrap();
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), fixture);

    service.close().await;
}

#[tokio::test]
async fn service_temp_files_are_deleted() {
    let temp_dir = scratch_dir().await;
    let config = ServiceConfig {
        tick_rate: 50,
        temp_dir: temp_dir.clone(),
    };
    let service = CameraService::open(
        "127.0.0.1",
        0,
        1,
        config,
        Arc::new(FixtureBackend::new(b"img".to_vec())),
    )
    .await
    .unwrap();

    let mut camera = connect_to(&service).await;
    let dest_dir = scratch_dir().await;
    camera.capture(&dest_dir.join("one.jpg")).await.unwrap();
    camera.capture(&dest_dir.join("two.jpg")).await.unwrap();

    // The service staged pi_image_N.jpg files in its scratch directory
    // and removed them after each transfer.
    let mut leftovers = tokio::fs::read_dir(&temp_dir).await.unwrap();
    assert!(leftovers.next_entry().await.unwrap().is_none());
    assert!(tokio::fs::read(dest_dir.join("one.jpg")).await.unwrap() == b"img");

    service.close().await;
}

#[tokio::test]
async fn busy_flag_visible_during_capture() {
    let service = start_service(
        1,
        FixtureBackend::slow(b"slow image".to_vec(), Duration::from_millis(400)),
    )
    .await;

    let addr = service.local_addr();
    let dest = scratch_dir().await.join("busy.jpg");
    let capture = {
        let dest = dest.clone();
        tokio::spawn(async move {
            let mut camera = CameraHandle::open_remote(&addr.ip().to_string(), addr.port())
                .await
                .unwrap();
            camera.capture(&dest).await
        })
    };

    // Give the request time to reach the worker and start the backend.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(service.local().is_busy().await);

    // A concurrent capture on the service handle fails fast.
    let elsewhere = scratch_dir().await.join("concurrent.jpg");
    assert_eq!(
        service.local().capture_still(&elsewhere).await,
        Err(CameraError::CameraBusy)
    );

    capture.await.unwrap().unwrap();
    assert!(!service.local().is_busy().await);
    assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"slow image");

    service.close().await;
}

// ── Error scenarios ──────────────────────────────────────────────

#[tokio::test]
async fn garbage_opcode_drops_only_that_session() {
    let service = start_service(2, FixtureBackend::new(Vec::new())).await;

    let mut healthy = connect_to(&service).await;
    healthy.set_ev(7).await.unwrap();

    // Hand-rolled client speaking nonsense.
    let mut rogue = picam_core::net::connect(service.local_addr()).await.unwrap();
    picam_core::net::send_frame(
        &mut rogue,
        Frame {
            opcode: 250,
            error: ErrorCode::Success,
            payload: Vec::new(),
        },
    )
    .await
    .unwrap();

    // The service closes the rogue session without replying.
    let result = picam_core::net::recv_frame(&mut rogue).await;
    assert_eq!(result, Err(CameraError::ConnectionClosed));

    // The healthy session keeps working.
    assert_eq!(healthy.ev().await.unwrap(), 7);

    service.close().await;
}

#[tokio::test]
async fn top_level_transfer_opcode_drops_session() {
    let service = start_service(1, FixtureBackend::new(Vec::new())).await;

    let mut rogue = picam_core::net::connect(service.local_addr()).await.unwrap();
    picam_core::net::send_frame(
        &mut rogue,
        Frame {
            opcode: picam_core::Opcode::FileTransferOffer as u8,
            error: ErrorCode::Success,
            payload: Vec::new(),
        },
    )
    .await
    .unwrap();

    let result = picam_core::net::recv_frame(&mut rogue).await;
    assert_eq!(result, Err(CameraError::ConnectionClosed));

    service.close().await;
}

#[tokio::test]
async fn service_shutdown_surfaces_connection_closed() {
    let service = start_service(1, FixtureBackend::new(Vec::new())).await;
    let mut camera = connect_to(&service).await;

    camera.set_ev(1).await.unwrap();
    service.close().await;

    assert_eq!(camera.ev().await, Err(CameraError::ConnectionClosed));
    assert!(!camera.is_connected());
}

#[tokio::test]
async fn backend_failure_travels_as_wire_error() {
    /// Backend that always fails.
    struct BrokenBackend;

    impl CaptureBackend for BrokenBackend {
        fn capture_still<'a>(
            &'a self,
            _config: &'a CameraConfig,
            _dest: &'a Path,
        ) -> BoxFuture<'a, Result<(), CameraError>> {
            Box::pin(async { Err(CameraError::CameraFailed) })
        }

        fn capture_video<'a>(
            &'a self,
            _config: &'a CameraConfig,
            _duration: Duration,
            _dest: &'a Path,
        ) -> BoxFuture<'a, Result<(), CameraError>> {
            Box::pin(async { Err(CameraError::CameraFailed) })
        }
    }

    let config = ServiceConfig {
        tick_rate: 50,
        temp_dir: scratch_dir().await,
    };
    let service = CameraService::open("127.0.0.1", 0, 1, config, Arc::new(BrokenBackend))
        .await
        .unwrap();
    let mut camera = connect_to(&service).await;

    let dest = scratch_dir().await.join("never.jpg");
    assert_eq!(camera.capture(&dest).await, Err(CameraError::CameraFailed));

    // The session survives a backend-level failure.
    camera.set_ev(2).await.unwrap();
    assert_eq!(camera.ev().await.unwrap(), 2);

    service.close().await;
}
