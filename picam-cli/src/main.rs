//! `picam` — interactive control of a local, remote or service-mode
//! PiCamera.
//!
//! Startup verbs pick the handle role:
//!
//! ```text
//! picam open                                # local camera
//! picam connect <host> <port>               # remote client
//! picam start <host> <port> <max_conns>     # TCP service
//! ```
//!
//! With no verb, the role and its parameters are prompted for
//! interactively. Either way the process then drops into the
//! `PiCamera:~$ ` shell.

mod console;
mod shell;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use picam_core::CameraHandle;

use crate::console::{Console, StdConsole};
use crate::shell::Shell;

#[derive(Parser)]
#[command(name = "picam", about = "Network-transparent PiCamera control")]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Subcommand, Clone)]
enum Mode {
    /// Open the local camera
    Open,
    /// Connect to a remote camera service
    Connect { host: String, port: u16 },
    /// Start a camera service
    Start {
        host: String,
        port: u16,
        max_connections: usize,
    },
}

fn prompt_value(console: &mut dyn Console, label: &str) -> io::Result<Option<String>> {
    Ok(console
        .read_line(&format!("{}: ", label))?
        .map(|line| line.trim().to_string()))
}

/// Ask for the role and its parameters, mirroring the startup verbs.
fn prompt_mode(console: &mut dyn Console) -> io::Result<Option<Mode>> {
    let verb = match console.read_line("Open/Connect/Start: ")? {
        None => return Ok(None),
        Some(line) => line.trim().to_ascii_lowercase(),
    };

    let mode = match verb.as_str() {
        "open" => Some(Mode::Open),
        "connect" => {
            let host = prompt_value(console, "Host")?;
            let port = prompt_value(console, "Port")?;
            match (host, port.and_then(|p| p.parse().ok())) {
                (Some(host), Some(port)) => Some(Mode::Connect { host, port }),
                _ => None,
            }
        }
        "start" => {
            let host = prompt_value(console, "Host")?;
            let port = prompt_value(console, "Port")?;
            let max = prompt_value(console, "Max Connections")?;
            match (
                host,
                port.and_then(|p| p.parse().ok()),
                max.and_then(|m| m.parse().ok()),
            ) {
                (Some(host), Some(port), Some(max_connections)) => Some(Mode::Start {
                    host,
                    port,
                    max_connections,
                }),
                _ => None,
            }
        }
        _ => None,
    };

    if mode.is_none() {
        console.write_line("Invalid option")?;
    }

    Ok(mode)
}

async fn open_camera(mode: &Mode) -> Result<CameraHandle, picam_core::CameraError> {
    match mode {
        Mode::Open => Ok(CameraHandle::open()),
        Mode::Connect { host, port } => CameraHandle::open_remote(host, *port).await,
        Mode::Start {
            host,
            port,
            max_connections,
        } => CameraHandle::open_service(host, *port, *max_connections).await,
    }
}

fn banner(mode: &Mode) -> &'static str {
    match mode {
        Mode::Open => "Connected to local PiCamera service",
        Mode::Connect { .. } => "Connected to remote PiCamera service",
        Mode::Start { .. } => "Started PiCamera service",
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut console = StdConsole;

    let mode = match cli.mode {
        Some(mode) => mode,
        None => match prompt_mode(&mut console) {
            Ok(Some(mode)) => mode,
            Ok(None) => return ExitCode::FAILURE,
            Err(error) => {
                tracing::error!(%error, "console unavailable");
                return ExitCode::FAILURE;
            }
        },
    };

    let camera = match open_camera(&mode).await {
        Ok(camera) => camera,
        Err(error) => {
            let _ = console.write_line(&format!("Error opening camera: {}", error));
            return ExitCode::FAILURE;
        }
    };

    if console.write_line(banner(&mode)).is_err() {
        return ExitCode::FAILURE;
    }

    let mut shell = Shell::new(camera, console);
    match shell.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
