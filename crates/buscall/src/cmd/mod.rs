use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use buscall_kiosk::{TransmitterConfig, DEFAULT_BUTTON_PIN, DEFAULT_GPIO_ROOT};
use buscall_payload::{
    EndpointConfig, DEFAULT_RECEIVER_ADDR, IMAGE_PORT, TEXT_PORT, WAITING_MESSAGE,
};
use clap::{Args, Subcommand};

use crate::exit::{kiosk_error, CliError, CliResult, INTERNAL, USAGE};
use crate::output::OutputFormat;

pub mod depot;
pub mod doctor;
pub mod kiosk;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch the call button and transmit on every press.
    Kiosk(KioskArgs),
    /// Receive images and messages and keep the latest of each.
    Depot(DepotArgs),
    /// Transmit once without waiting for the button.
    Send(SendArgs),
    /// Run local environment health checks.
    Doctor(DoctorArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Kiosk(args) => kiosk::run(args, format),
        Command::Depot(args) => depot::run(args, format),
        Command::Send(args) => send::run(args, format),
        Command::Doctor(args) => doctor::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Ports shared by both ends; must match on kiosk and depot.
#[derive(Args, Debug, Clone)]
pub struct PortArgs {
    /// UDP port for image datagrams.
    #[arg(long, env = "BUSCALL_IMAGE_PORT", default_value_t = IMAGE_PORT)]
    pub image_port: u16,
    /// UDP port for text datagrams.
    #[arg(long, env = "BUSCALL_TEXT_PORT", default_value_t = TEXT_PORT)]
    pub text_port: u16,
}

/// What to send and where to send it.
#[derive(Args, Debug, Clone)]
pub struct TransmitArgs {
    /// Route identifier selecting the image (e.g. 110.jpg or a bus number).
    pub route: String,
    /// Receiver address.
    #[arg(long, env = "BUSCALL_RECEIVER", default_value_t = DEFAULT_RECEIVER_ADDR)]
    pub receiver: IpAddr,
    #[command(flatten)]
    pub ports: PortArgs,
    /// Directory holding route images.
    #[arg(long, env = "BUSCALL_IMAGE_DIR", default_value = ".")]
    pub image_dir: PathBuf,
    /// Message sent after the image.
    #[arg(long, env = "BUSCALL_MESSAGE", default_value = WAITING_MESSAGE)]
    pub message: String,
}

impl TransmitArgs {
    pub fn endpoints(&self) -> EndpointConfig {
        EndpointConfig::for_host(self.receiver, self.ports.image_port, self.ports.text_port)
    }

    pub fn transmitter_config(&self) -> CliResult<TransmitterConfig> {
        TransmitterConfig::new(self.route.clone(), self.message.clone().into_bytes())
            .map_err(|err| kiosk_error("invalid transmit settings", err))
    }
}

#[derive(Args, Debug)]
pub struct KioskArgs {
    #[command(flatten)]
    pub transmit: TransmitArgs,
    /// GPIO line number of the call button.
    #[arg(long, env = "BUSCALL_GPIO_PIN", default_value_t = DEFAULT_BUTTON_PIN)]
    pub gpio_pin: u32,
    /// Root of the GPIO sysfs tree.
    #[arg(long, env = "BUSCALL_GPIO_ROOT", default_value = DEFAULT_GPIO_ROOT)]
    pub gpio_root: PathBuf,
    /// Delay between button samples (e.g. 100ms, 1s).
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    pub poll_interval: Duration,
    /// Cooldown after each press (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub debounce: Duration,
}

#[derive(Args, Debug)]
pub struct DepotArgs {
    /// Local address to bind both channels on.
    #[arg(long, env = "BUSCALL_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,
    #[command(flatten)]
    pub ports: PortArgs,
    /// File overwritten with every received image.
    #[arg(long, short = 'o', env = "BUSCALL_OUTPUT", default_value = buscall_depot::DEFAULT_ARTIFACT)]
    pub output: PathBuf,
    /// Sleep when neither channel has data (e.g. 100ms).
    #[arg(long, default_value = "100ms", value_parser = parse_duration)]
    pub idle_sleep: Duration,
    /// Exit after handling N events.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub transmit: TransmitArgs,
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// GPIO line number to probe.
    #[arg(long, env = "BUSCALL_GPIO_PIN", default_value_t = DEFAULT_BUTTON_PIN)]
    pub gpio_pin: u32,
    /// Root of the GPIO sysfs tree.
    #[arg(long, env = "BUSCALL_GPIO_ROOT", default_value = DEFAULT_GPIO_ROOT)]
    pub gpio_root: PathBuf,
    /// Directory holding route images.
    #[arg(long, env = "BUSCALL_IMAGE_DIR")]
    pub image_dir: Option<PathBuf>,
    /// Route whose image should be resolvable.
    #[arg(long, requires = "image_dir")]
    pub route: Option<String>,
    #[command(flatten)]
    pub ports: PortArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Parse `150ms`, `2s` or bare seconds.
pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

/// Clear the returned flag on Ctrl-C so loops stop at the next iteration.
pub fn install_ctrlc_handler() -> CliResult<Arc<AtomicBool>> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))?;
    Ok(running)
}
