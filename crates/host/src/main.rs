//! aoa-hid
//!
//! Diagnostic tool that turns an Android device in accessory mode into a
//! virtual HID mouse using the AOA 2.0 HID requests, then sends it one click.

mod config;
mod session;
mod usb;

use anyhow::{Context, Result};
use clap::Parser;
use common::{DeviceIdentity, setup_logging};
use config::HostConfig;
use protocol::{MOUSE_CLICK_EVENT, MOUSE_REPORT_DESCRIPTOR};
use session::run_session;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use usb::{RusbBackend, list_devices};

/// Device missing, open failure, or any protocol step failed
const EXIT_FAILURE: u8 = 1;
/// VID or PID is not a 16-bit hex number
const EXIT_BAD_ID: u8 = 3;

#[derive(Parser, Debug)]
#[command(name = "aoa-hid")]
#[command(
    author,
    version,
    about = "Register a virtual HID mouse on an Android accessory and send one event"
)]
#[command(long_about = "
Registers a virtual HID mouse on an Android device in accessory mode using the
AOA 2.0 HID requests, uploads its report descriptor, and sends a single input
report.

EXAMPLES:
    # Android device already in accessory mode
    aoa-hid 18d1 2d00

    # Retry the event up to 3 times if the device is not ready yet
    aoa-hid --event-retries 3 18d1 2d00

    # List attached USB devices
    aoa-hid --list-devices

EXIT STATUS:
    0  success
    1  device not found, open failed, or a protocol step failed
    2  usage error
    3  VID or PID is not a hex number

CONFIGURATION:
    Looked up in this order:
    1. Path specified with --config
    2. ~/.config/aoa-hid/host.toml
    3. /etc/aoa-hid/host.toml
    4. Built-in defaults
")]
struct Args {
    /// Vendor ID in hex (e.g. 18d1)
    #[arg(
        required_unless_present_any = ["list_devices", "save_config"],
        allow_hyphen_values = true
    )]
    vid: Option<String>,

    /// Product ID in hex (e.g. 2d00)
    #[arg(
        required_unless_present_any = ["list_devices", "save_config"],
        allow_hyphen_values = true
    )]
    pid: Option<String>,

    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// List USB devices and exit
    #[arg(long)]
    list_devices: bool,

    /// Unregister the HID device after sending the event
    #[arg(long)]
    unregister: bool,

    /// Delay between descriptor upload and event, in milliseconds
    #[arg(long, value_name = "MS")]
    settle_delay_ms: Option<u64>,

    /// Retries for an event the device is not ready to accept
    #[arg(long, value_name = "N")]
    event_retries: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Runs before logging is set up, so errors go straight to stderr
    if args.save_config {
        return match save_default_config() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                ExitCode::from(EXIT_FAILURE)
            }
        };
    }

    let identity = if args.list_devices {
        None
    } else {
        match parse_identity(&args) {
            Ok(identity) => Some(identity),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::from(EXIT_BAD_ID);
            }
        }
    };

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let log_level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.general.log_level);
    if let Err(e) = setup_logging(log_level) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_FAILURE);
    }

    match identity {
        Some(identity) => exit_with(run_test(&args, &config, identity)),
        None => exit_with(list_devices_mode()),
    }
}

fn exit_with(result: Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if tracing::enabled!(Level::ERROR) {
                error!("{:#}", e);
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Parse the positional ids; the error names the offending argument
fn parse_identity(args: &Args) -> common::Result<DeviceIdentity> {
    DeviceIdentity::parse(
        args.vid.as_deref().unwrap_or_default(),
        args.pid.as_deref().unwrap_or_default(),
    )
}

fn load_config(args: &Args) -> Result<HostConfig> {
    let mut config = match &args.config {
        Some(path) => {
            HostConfig::load(Some(path.clone())).context("Failed to load configuration")?
        }
        None => HostConfig::load_or_default(),
    };

    if let Some(ms) = args.settle_delay_ms {
        config.transfer.settle_delay_ms = ms;
    }
    if let Some(n) = args.event_retries {
        config.transfer.event_retries = n;
    }
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

fn save_default_config() -> Result<()> {
    let config = HostConfig::default();
    let path = HostConfig::default_path();
    config.save(&path).context("Failed to save configuration")?;
    println!("Configuration saved to: {}", path.display());
    Ok(())
}

/// Register the mouse on `identity` and send it one click
fn run_test(args: &Args, config: &HostConfig, identity: DeviceIdentity) -> Result<()> {
    let backend = RusbBackend::new().context("Failed to initialize libusb")?;
    let options = config.session_options(args.unregister);

    run_session(
        &backend,
        identity,
        &MOUSE_REPORT_DESCRIPTOR,
        &MOUSE_CLICK_EVENT,
        &options,
    )
    .inspect_err(|e| debug!("Session aborted after stage: {}", e.stage()))?;

    println!("SUCCESS");
    Ok(())
}

/// List USB devices and exit
fn list_devices_mode() -> Result<()> {
    info!("Listing USB devices...");
    let backend = RusbBackend::new().context("Failed to initialize libusb")?;
    let devices = list_devices(&backend)?;

    if devices.is_empty() {
        println!("No USB devices found.");
        return Ok(());
    }

    println!("Found {} USB device(s):\n", devices.len());
    for device in devices {
        println!(
            "  Bus {:03} Device {:03}: ID {} mps0={}",
            device.bus_number, device.device_address, device.identity, device.max_packet_size_0
        );
    }

    Ok(())
}
