//! The interactive `PiCamera:~$ ` shell.
//!
//! Commands are line-oriented, `verb [subject] [args…]`, with the field
//! aliases of the classic console. Parsing is a pure function over the
//! line so it stays testable without a camera or a terminal; execution
//! runs the parsed command against whatever [`CameraHandle`] role the
//! process was started with.

use std::io;
use std::path::PathBuf;

use picam_core::{CameraError, CameraHandle};

use crate::console::Console;

// ── Commands ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Exit,
    IsBusy,
    IsRemote,
    IsService,
    IsConnected,
    GetEv,
    SetEv(i8),
    GetIso,
    SetIso(u16),
    GetConfig,
    GetContrast,
    SetContrast(i8),
    GetSharpness,
    SetSharpness(i8),
    GetBrightness,
    SetBrightness(u8),
    GetSaturation,
    SetSaturation(i8),
    GetWhiteBalance,
    SetWhiteBalance(u8),
    GetShutterSpeed,
    SetShutterSpeed(u64),
    GetExposureMode,
    SetExposureMode(u8),
    GetMeteringMode,
    SetMeteringMode(u8),
    GetJpgQuality,
    SetJpgQuality(u8),
    GetImageSize,
    SetImageSize(u16, u16),
    GetImageEffect,
    SetImageEffect(u8),
    GetImageRotation,
    SetImageRotation(u16),
    GetVideoBitRate,
    SetVideoBitRate(u32),
    GetVideoFrameRate,
    SetVideoFrameRate(u8),
    Capture(PathBuf),
    CaptureVideo(u32, PathBuf),
}

impl ShellCommand {
    /// Canonical command name, used in error reports.
    pub fn name(&self) -> &'static str {
        match self {
            ShellCommand::Help => "help",
            ShellCommand::Exit => "exit",
            ShellCommand::IsBusy => "is_busy",
            ShellCommand::IsRemote => "is_remote",
            ShellCommand::IsService => "is_service",
            ShellCommand::IsConnected => "is_connected",
            ShellCommand::GetEv => "get_ev",
            ShellCommand::SetEv(_) => "set_ev",
            ShellCommand::GetIso => "get_iso",
            ShellCommand::SetIso(_) => "set_iso",
            ShellCommand::GetConfig => "get_config",
            ShellCommand::GetContrast => "get_contrast",
            ShellCommand::SetContrast(_) => "set_contrast",
            ShellCommand::GetSharpness => "get_sharpness",
            ShellCommand::SetSharpness(_) => "set_sharpness",
            ShellCommand::GetBrightness => "get_brightness",
            ShellCommand::SetBrightness(_) => "set_brightness",
            ShellCommand::GetSaturation => "get_saturation",
            ShellCommand::SetSaturation(_) => "set_saturation",
            ShellCommand::GetWhiteBalance => "get_white_balance",
            ShellCommand::SetWhiteBalance(_) => "set_white_balance",
            ShellCommand::GetShutterSpeed => "get_shutter_speed",
            ShellCommand::SetShutterSpeed(_) => "set_shutter_speed",
            ShellCommand::GetExposureMode => "get_exposure_mode",
            ShellCommand::SetExposureMode(_) => "set_exposure_mode",
            ShellCommand::GetMeteringMode => "get_metering_mode",
            ShellCommand::SetMeteringMode(_) => "set_metering_mode",
            ShellCommand::GetJpgQuality => "get_jpg_quality",
            ShellCommand::SetJpgQuality(_) => "set_jpg_quality",
            ShellCommand::GetImageSize => "get_image_size",
            ShellCommand::SetImageSize(..) => "set_image_size",
            ShellCommand::GetImageEffect => "get_image_effect",
            ShellCommand::SetImageEffect(_) => "set_image_effect",
            ShellCommand::GetImageRotation => "get_image_rotation",
            ShellCommand::SetImageRotation(_) => "set_image_rotation",
            ShellCommand::GetVideoBitRate => "get_video_bit_rate",
            ShellCommand::SetVideoBitRate(_) => "set_video_bit_rate",
            ShellCommand::GetVideoFrameRate => "get_video_frame_rate",
            ShellCommand::SetVideoFrameRate(_) => "set_video_frame_rate",
            ShellCommand::Capture(_) => "capture",
            ShellCommand::CaptureVideo(..) => "capture_video",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown,
    InvalidArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Ev,
    Iso,
    Config,
    Contrast,
    Sharpness,
    Brightness,
    Saturation,
    WhiteBalance,
    ShutterSpeed,
    ExposureMode,
    MeteringMode,
    JpgQuality,
    ImageSize,
    ImageEffect,
    ImageRotation,
    VideoBitRate,
    VideoFrameRate,
}

fn field(name: &str) -> Option<Field> {
    Some(match name {
        "e" | "ev" => Field::Ev,
        "i" | "iso" => Field::Iso,
        "config" => Field::Config,
        "c" | "contrast" => Field::Contrast,
        "sh" | "sharpness" => Field::Sharpness,
        "br" | "brightness" => Field::Brightness,
        "sat" | "saturation" => Field::Saturation,
        "wb" | "white_balance" => Field::WhiteBalance,
        "ss" | "shutter" | "shutter_speed" => Field::ShutterSpeed,
        "em" | "exposure" | "exposure_mode" => Field::ExposureMode,
        "mm" | "metering" | "metering_mode" => Field::MeteringMode,
        "jq" | "quality" | "jpg_quality" => Field::JpgQuality,
        "is" | "size" | "image_size" => Field::ImageSize,
        "ie" | "effect" | "image_effect" => Field::ImageEffect,
        "ir" | "rot" | "rotation" | "image_rotation" => Field::ImageRotation,
        "vbr" | "video_bit_rate" => Field::VideoBitRate,
        "vfr" | "video_frame_rate" => Field::VideoFrameRate,
        _ => return None,
    })
}

fn value<T: std::str::FromStr>(token: Option<&&str>) -> Result<T, ParseError> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or(ParseError::InvalidArgs)
}

/// Parse one input line into a command.
pub fn parse(line: &str) -> Result<ShellCommand, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let verb = match tokens.first() {
        None => return Err(ParseError::Empty),
        Some(verb) => verb.to_ascii_lowercase(),
    };

    match verb.as_str() {
        "help" => Ok(ShellCommand::Help),
        "exit" | "quit" | "x" | "q" => Ok(ShellCommand::Exit),

        "is" => match tokens.get(1).map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("busy") => Ok(ShellCommand::IsBusy),
            Some("remote") => Ok(ShellCommand::IsRemote),
            Some("service") => Ok(ShellCommand::IsService),
            Some("connected") => Ok(ShellCommand::IsConnected),
            _ => Err(ParseError::Unknown),
        },

        "get" => {
            let field = tokens
                .get(1)
                .map(|s| s.to_ascii_lowercase())
                .as_deref()
                .and_then(field)
                .ok_or(ParseError::Unknown)?;
            Ok(match field {
                Field::Ev => ShellCommand::GetEv,
                Field::Iso => ShellCommand::GetIso,
                Field::Config => ShellCommand::GetConfig,
                Field::Contrast => ShellCommand::GetContrast,
                Field::Sharpness => ShellCommand::GetSharpness,
                Field::Brightness => ShellCommand::GetBrightness,
                Field::Saturation => ShellCommand::GetSaturation,
                Field::WhiteBalance => ShellCommand::GetWhiteBalance,
                Field::ShutterSpeed => ShellCommand::GetShutterSpeed,
                Field::ExposureMode => ShellCommand::GetExposureMode,
                Field::MeteringMode => ShellCommand::GetMeteringMode,
                Field::JpgQuality => ShellCommand::GetJpgQuality,
                Field::ImageSize => ShellCommand::GetImageSize,
                Field::ImageEffect => ShellCommand::GetImageEffect,
                Field::ImageRotation => ShellCommand::GetImageRotation,
                Field::VideoBitRate => ShellCommand::GetVideoBitRate,
                Field::VideoFrameRate => ShellCommand::GetVideoFrameRate,
            })
        }

        "set" => {
            let field = tokens
                .get(1)
                .map(|s| s.to_ascii_lowercase())
                .as_deref()
                .and_then(field)
                .ok_or(ParseError::Unknown)?;
            match field {
                Field::Ev => Ok(ShellCommand::SetEv(value(tokens.get(2))?)),
                Field::Iso => Ok(ShellCommand::SetIso(value(tokens.get(2))?)),
                Field::Config => Err(ParseError::Unknown),
                Field::Contrast => Ok(ShellCommand::SetContrast(value(tokens.get(2))?)),
                Field::Sharpness => Ok(ShellCommand::SetSharpness(value(tokens.get(2))?)),
                Field::Brightness => Ok(ShellCommand::SetBrightness(value(tokens.get(2))?)),
                Field::Saturation => Ok(ShellCommand::SetSaturation(value(tokens.get(2))?)),
                Field::WhiteBalance => Ok(ShellCommand::SetWhiteBalance(value(tokens.get(2))?)),
                Field::ShutterSpeed => Ok(ShellCommand::SetShutterSpeed(value(tokens.get(2))?)),
                Field::ExposureMode => Ok(ShellCommand::SetExposureMode(value(tokens.get(2))?)),
                Field::MeteringMode => Ok(ShellCommand::SetMeteringMode(value(tokens.get(2))?)),
                Field::JpgQuality => Ok(ShellCommand::SetJpgQuality(value(tokens.get(2))?)),
                Field::ImageSize => Ok(ShellCommand::SetImageSize(
                    value(tokens.get(2))?,
                    value(tokens.get(3))?,
                )),
                Field::ImageEffect => Ok(ShellCommand::SetImageEffect(value(tokens.get(2))?)),
                Field::ImageRotation => Ok(ShellCommand::SetImageRotation(value(tokens.get(2))?)),
                Field::VideoBitRate => Ok(ShellCommand::SetVideoBitRate(value(tokens.get(2))?)),
                Field::VideoFrameRate => {
                    Ok(ShellCommand::SetVideoFrameRate(value(tokens.get(2))?))
                }
            }
        }

        "capture" => match tokens.get(1) {
            Some(path) => Ok(ShellCommand::Capture(PathBuf::from(path))),
            None => Err(ParseError::InvalidArgs),
        },

        "capture_video" => {
            let duration: u32 = value(tokens.get(1))?;
            match tokens.get(2) {
                Some(path) => Ok(ShellCommand::CaptureVideo(duration, PathBuf::from(path))),
                None => Err(ParseError::InvalidArgs),
            }
        }

        _ => Err(ParseError::Unknown),
    }
}

// ── Shell ─────────────────────────────────────────────────────────

const HELP: &[&str] = &[
    "help",
    "exit|quit|x|q",
    "is busy|remote|service|connected",
    "get e|ev",
    "set e|ev value",
    "get i|iso",
    "set i|iso value",
    "get config",
    "get c|contrast",
    "set c|contrast value",
    "get sh|sharpness",
    "set sh|sharpness value",
    "get br|brightness",
    "set br|brightness value",
    "get sat|saturation",
    "set sat|saturation value",
    "get wb|white_balance",
    "set wb|white_balance value",
    "get ss|shutter|shutter_speed",
    "set ss|shutter|shutter_speed microseconds",
    "get em|exposure|exposure_mode",
    "set em|exposure|exposure_mode value",
    "get mm|metering|metering_mode",
    "set mm|metering|metering_mode value",
    "get jq|quality|jpg_quality",
    "set jq|quality|jpg_quality value",
    "get is|size|image_size",
    "set is|size|image_size width height",
    "get ie|effect|image_effect",
    "set ie|effect|image_effect value",
    "get ir|rot|rotation|image_rotation",
    "set ir|rot|rotation|image_rotation value",
    "get vbr|video_bit_rate",
    "set vbr|video_bit_rate value",
    "get vfr|video_frame_rate",
    "set vfr|video_frame_rate value",
    "capture /path/to/file",
    "capture_video duration /path/to/file",
];

pub struct Shell<C: Console> {
    camera: CameraHandle,
    console: C,
}

impl<C: Console> Shell<C> {
    pub fn new(camera: CameraHandle, console: C) -> Self {
        Self { camera, console }
    }

    /// Run the read/execute loop until exit, EOF, or a lost connection.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            if self.camera.is_remote() && !self.camera.is_connected() {
                self.console.write_line("Connection lost")?;
                break;
            }

            let line = match self.console.read_line("PiCamera:~$ ")? {
                None => break,
                Some(line) => line,
            };

            match parse(&line) {
                Err(ParseError::Empty) => continue,
                Err(ParseError::Unknown) => self.console.write_line("Unknown command")?,
                Err(ParseError::InvalidArgs) => self.console.write_line("Invalid command args")?,
                Ok(ShellCommand::Exit) => break,
                Ok(ShellCommand::Help) => {
                    for line in HELP {
                        self.console.write_line(line)?;
                    }
                }
                Ok(command) => {
                    if !self.execute(command).await? {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    /// Execute one command, printing its result or its error. Returns
    /// `false` when the loop should end (connection closed).
    async fn execute(&mut self, command: ShellCommand) -> io::Result<bool> {
        let name = command.name();

        match self.run_command(command).await {
            Ok(lines) => {
                for line in lines {
                    self.console.write_line(&line)?;
                }
                Ok(true)
            }
            Err(error) => {
                self.console.write_line(&format!(
                    "{} returned {}: {}",
                    name,
                    error.code() as u8,
                    error.code().as_str()
                ))?;
                Ok(error != CameraError::ConnectionClosed)
            }
        }
    }

    async fn run_command(&mut self, command: ShellCommand) -> Result<Vec<String>, CameraError> {
        let camera = &mut self.camera;

        let lines = match command {
            // handled by the run loop
            ShellCommand::Help | ShellCommand::Exit => Vec::new(),

            ShellCommand::IsBusy => vec![format!("Busy: {}", camera.is_busy().await?)],
            ShellCommand::IsRemote => vec![format!("Remote: {}", camera.is_remote())],
            ShellCommand::IsService => vec![format!("Service: {}", camera.is_service())],
            ShellCommand::IsConnected => vec![format!("Connected: {}", camera.is_connected())],

            ShellCommand::GetEv => vec![format!("EV: {}", camera.ev().await?)],
            ShellCommand::SetEv(value) => {
                camera.set_ev(value).await?;
                Vec::new()
            }
            ShellCommand::GetIso => vec![format!("ISO: {}", camera.iso().await?)],
            ShellCommand::SetIso(value) => {
                camera.set_iso(value).await?;
                Vec::new()
            }
            ShellCommand::GetConfig => {
                let config = camera.config().await?;
                vec![
                    format!("EV: {}", config.ev),
                    format!("ISO: {}", config.iso),
                    format!("Contrast: {}", config.contrast),
                    format!("Sharpness: {}", config.sharpness),
                    format!("Brightness: {}", config.brightness),
                    format!("Saturation: {}", config.saturation),
                    format!("White Balance: {}", config.white_balance),
                    format!("Shutter Speed: {}", config.shutter_speed_us),
                    format!("Exposure Mode: {}", config.exposure_mode),
                    format!("Metering Mode: {}", config.metering_mode),
                    format!("JPG Quality: {}", config.jpg_quality),
                    format!("Image Effect: {}", config.image_effect),
                    format!("Image Rotation: {}", config.image_rotation),
                    format!(
                        "Image Size: {}x{}",
                        config.image_size_width, config.image_size_height
                    ),
                    format!("Video Bit Rate: {}", config.video_bit_rate),
                    format!("Video Frame Rate: {}", config.video_frame_rate),
                ]
            }
            ShellCommand::GetContrast => vec![format!("Contrast: {}", camera.contrast().await?)],
            ShellCommand::SetContrast(value) => {
                camera.set_contrast(value).await?;
                Vec::new()
            }
            ShellCommand::GetSharpness => {
                vec![format!("Sharpness: {}", camera.sharpness().await?)]
            }
            ShellCommand::SetSharpness(value) => {
                camera.set_sharpness(value).await?;
                Vec::new()
            }
            ShellCommand::GetBrightness => {
                vec![format!("Brightness: {}", camera.brightness().await?)]
            }
            ShellCommand::SetBrightness(value) => {
                camera.set_brightness(value).await?;
                Vec::new()
            }
            ShellCommand::GetSaturation => {
                vec![format!("Saturation: {}", camera.saturation().await?)]
            }
            ShellCommand::SetSaturation(value) => {
                camera.set_saturation(value).await?;
                Vec::new()
            }
            ShellCommand::GetWhiteBalance => {
                vec![format!("White Balance: {}", camera.white_balance().await?)]
            }
            ShellCommand::SetWhiteBalance(value) => {
                camera.set_white_balance(value).await?;
                Vec::new()
            }
            ShellCommand::GetShutterSpeed => {
                vec![format!("Shutter Speed: {}", camera.shutter_speed().await?)]
            }
            ShellCommand::SetShutterSpeed(value) => {
                camera.set_shutter_speed(value).await?;
                Vec::new()
            }
            ShellCommand::GetExposureMode => {
                vec![format!("Exposure Mode: {}", camera.exposure_mode().await?)]
            }
            ShellCommand::SetExposureMode(value) => {
                camera.set_exposure_mode(value).await?;
                Vec::new()
            }
            ShellCommand::GetMeteringMode => {
                vec![format!("Metering Mode: {}", camera.metering_mode().await?)]
            }
            ShellCommand::SetMeteringMode(value) => {
                camera.set_metering_mode(value).await?;
                Vec::new()
            }
            ShellCommand::GetJpgQuality => {
                vec![format!("JPG Quality: {}", camera.jpg_quality().await?)]
            }
            ShellCommand::SetJpgQuality(value) => {
                camera.set_jpg_quality(value).await?;
                Vec::new()
            }
            ShellCommand::GetImageSize => {
                let (width, height) = camera.image_size().await?;
                vec![format!("Image Size: {}x{}", width, height)]
            }
            ShellCommand::SetImageSize(width, height) => {
                camera.set_image_size(width, height).await?;
                Vec::new()
            }
            ShellCommand::GetImageEffect => {
                vec![format!("Image Effect: {}", camera.image_effect().await?)]
            }
            ShellCommand::SetImageEffect(value) => {
                camera.set_image_effect(value).await?;
                Vec::new()
            }
            ShellCommand::GetImageRotation => {
                vec![format!("Image Rotation: {}", camera.image_rotation().await?)]
            }
            ShellCommand::SetImageRotation(value) => {
                camera.set_image_rotation(value).await?;
                Vec::new()
            }
            ShellCommand::GetVideoBitRate => {
                vec![format!("Video Bit Rate: {}", camera.video_bit_rate().await?)]
            }
            ShellCommand::SetVideoBitRate(value) => {
                camera.set_video_bit_rate(value).await?;
                Vec::new()
            }
            ShellCommand::GetVideoFrameRate => {
                vec![format!(
                    "Video Frame Rate: {}",
                    camera.video_frame_rate().await?
                )]
            }
            ShellCommand::SetVideoFrameRate(value) => {
                camera.set_video_frame_rate(value).await?;
                Vec::new()
            }

            ShellCommand::Capture(path) => {
                camera.capture(&path).await?;
                vec![format!("Saved {}", path.display())]
            }
            ShellCommand::CaptureVideo(duration, path) => {
                camera.capture_video(duration, &path).await?;
                vec![format!("Saved {}", path.display())]
            }
        };

        Ok(lines)
    }
}

// ── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use futures::future::BoxFuture;
    use picam_core::{CameraConfig, CaptureBackend};

    // ── Parsing ───────────────────────────────────────────────────

    #[test]
    fn parse_exit_aliases() {
        for line in ["exit", "quit", "x", "q", "EXIT"] {
            assert_eq!(parse(line), Ok(ShellCommand::Exit));
        }
    }

    #[test]
    fn parse_empty_line() {
        assert_eq!(parse(""), Err(ParseError::Empty));
        assert_eq!(parse("   "), Err(ParseError::Empty));
    }

    #[test]
    fn parse_is_queries() {
        assert_eq!(parse("is busy"), Ok(ShellCommand::IsBusy));
        assert_eq!(parse("is remote"), Ok(ShellCommand::IsRemote));
        assert_eq!(parse("is service"), Ok(ShellCommand::IsService));
        assert_eq!(parse("is connected"), Ok(ShellCommand::IsConnected));
        assert_eq!(parse("is"), Err(ParseError::Unknown));
        assert_eq!(parse("is nonsense"), Err(ParseError::Unknown));
    }

    #[test]
    fn parse_field_aliases() {
        assert_eq!(parse("get e"), Ok(ShellCommand::GetEv));
        assert_eq!(parse("get ev"), Ok(ShellCommand::GetEv));
        assert_eq!(parse("set ev -3"), Ok(ShellCommand::SetEv(-3)));
        assert_eq!(parse("get wb"), Ok(ShellCommand::GetWhiteBalance));
        assert_eq!(parse("get shutter"), Ok(ShellCommand::GetShutterSpeed));
        assert_eq!(parse("get ss"), Ok(ShellCommand::GetShutterSpeed));
        assert_eq!(parse("get size"), Ok(ShellCommand::GetImageSize));
        assert_eq!(parse("get is"), Ok(ShellCommand::GetImageSize));
        assert_eq!(
            parse("set size 1920 1080"),
            Ok(ShellCommand::SetImageSize(1920, 1080))
        );
        assert_eq!(parse("get rot"), Ok(ShellCommand::GetImageRotation));
        assert_eq!(parse("get vbr"), Ok(ShellCommand::GetVideoBitRate));
        assert_eq!(parse("get vfr"), Ok(ShellCommand::GetVideoFrameRate));
        assert_eq!(parse("get config"), Ok(ShellCommand::GetConfig));
    }

    #[test]
    fn parse_invalid_values() {
        assert_eq!(parse("set ev"), Err(ParseError::InvalidArgs));
        assert_eq!(parse("set ev abc"), Err(ParseError::InvalidArgs));
        assert_eq!(parse("set ev 300"), Err(ParseError::InvalidArgs)); // overflows i8
        assert_eq!(parse("set size 1920"), Err(ParseError::InvalidArgs));
        assert_eq!(parse("set nonsense 1"), Err(ParseError::Unknown));
        assert_eq!(parse("set config"), Err(ParseError::Unknown));
        assert_eq!(parse("frobnicate"), Err(ParseError::Unknown));
    }

    #[test]
    fn parse_capture() {
        assert_eq!(
            parse("capture /tmp/out.jpg"),
            Ok(ShellCommand::Capture(PathBuf::from("/tmp/out.jpg")))
        );
        assert_eq!(parse("capture"), Err(ParseError::InvalidArgs));
        assert_eq!(
            parse("capture_video 10 /tmp/out.mp4"),
            Ok(ShellCommand::CaptureVideo(10, PathBuf::from("/tmp/out.mp4")))
        );
        assert_eq!(parse("capture_video ten /tmp/x"), Err(ParseError::InvalidArgs));
        assert_eq!(parse("capture_video 10"), Err(ParseError::InvalidArgs));
    }

    // ── Execution ─────────────────────────────────────────────────

    /// Console fed from a fixed script, recording all output.
    struct ScriptedConsole {
        input: Vec<String>,
        next: usize,
        pub output: Vec<String>,
    }

    impl ScriptedConsole {
        fn new(lines: &[&str]) -> Self {
            Self {
                input: lines.iter().map(|s| s.to_string()).collect(),
                next: 0,
                output: Vec::new(),
            }
        }
    }

    impl Console for ScriptedConsole {
        fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
            let line = self.input.get(self.next).cloned();
            self.next += 1;
            Ok(line)
        }

        fn write_line(&mut self, line: &str) -> io::Result<()> {
            self.output.push(line.to_string());
            Ok(())
        }
    }

    struct NullBackend;

    impl CaptureBackend for NullBackend {
        fn capture_still<'a>(
            &'a self,
            _config: &'a CameraConfig,
            dest: &'a Path,
        ) -> BoxFuture<'a, Result<(), picam_core::CameraError>> {
            Box::pin(async move {
                tokio::fs::write(dest, b"jpeg")
                    .await
                    .map_err(|_| picam_core::CameraError::FileWrite)
            })
        }

        fn capture_video<'a>(
            &'a self,
            config: &'a CameraConfig,
            _duration: Duration,
            dest: &'a Path,
        ) -> BoxFuture<'a, Result<(), picam_core::CameraError>> {
            self.capture_still(config, dest)
        }
    }

    async fn run_script(lines: &[&str]) -> Vec<String> {
        let camera = CameraHandle::open_with_backend(Arc::new(NullBackend));
        let mut shell = Shell::new(camera, ScriptedConsole::new(lines));
        shell.run().await.unwrap();
        shell.console.output
    }

    #[tokio::test]
    async fn set_then_get_reports_clamped_value() {
        let output = run_script(&["set ev 11", "get ev", "exit"]).await;
        assert_eq!(output, vec!["EV: 10"]);
    }

    #[tokio::test]
    async fn unknown_and_invalid_lines_are_reported() {
        let output = run_script(&["frobnicate", "set ev", "exit"]).await;
        assert_eq!(output, vec!["Unknown command", "Invalid command args"]);
    }

    #[tokio::test]
    async fn get_config_lists_every_field() {
        let output = run_script(&["get config", "exit"]).await;
        assert_eq!(output.len(), 16);
        assert_eq!(output[0], "EV: 0");
        assert_eq!(output[1], "ISO: 100");
        assert!(output.contains(&"Image Size: 3280x2464".to_string()));
        assert!(output.contains(&"Video Frame Rate: 30".to_string()));
    }

    #[tokio::test]
    async fn is_queries_on_local_handle() {
        let output = run_script(&["is busy", "is remote", "is service", "is connected", "q"]).await;
        assert_eq!(
            output,
            vec![
                "Busy: false",
                "Remote: false",
                "Service: false",
                "Connected: false"
            ]
        );
    }

    #[tokio::test]
    async fn capture_writes_file_and_confirms() {
        let dest = std::env::temp_dir().join(format!("picam-shell-{}.jpg", std::process::id()));
        let _ = tokio::fs::remove_file(&dest).await;

        let line = format!("capture {}", dest.display());
        let output = run_script(&[&line, "exit"]).await;
        assert_eq!(output, vec![format!("Saved {}", dest.display())]);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"jpeg");

        let _ = tokio::fs::remove_file(&dest).await;
    }

    #[tokio::test]
    async fn eof_ends_the_loop() {
        let output = run_script(&["get ev"]).await;
        assert_eq!(output, vec!["EV: 0"]);
    }
}
