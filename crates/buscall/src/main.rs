mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "buscall",
    version,
    about = "Wheelchair-passenger call button: kiosk transmitter and depot receiver"
)]
struct Cli {
    /// Output format for reports and received messages.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr). BUSCALL_LOG directives take precedence.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_kiosk_subcommand_with_defaults() {
        let cli = Cli::try_parse_from(["buscall", "kiosk", "110.jpg"])
            .expect("kiosk args should parse");

        let Command::Kiosk(args) = cli.command else {
            panic!("expected kiosk command");
        };
        assert_eq!(args.transmit.route, "110.jpg");
        assert_eq!(args.transmit.ports.image_port, 2000);
        assert_eq!(args.transmit.ports.text_port, 2001);
        assert_eq!(args.gpio_pin, 76);
        assert_eq!(args.poll_interval, Duration::from_millis(100));
        assert_eq!(args.debounce, Duration::from_secs(1));
    }

    #[test]
    fn kiosk_requires_route() {
        let err = Cli::try_parse_from(["buscall", "kiosk"]).expect_err("route is required");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_depot_subcommand() {
        let cli = Cli::try_parse_from([
            "buscall",
            "depot",
            "--image-port",
            "3000",
            "--output",
            "/tmp/latest.jpg",
            "--count",
            "2",
        ])
        .expect("depot args should parse");

        let Command::Depot(args) = cli.command else {
            panic!("expected depot command");
        };
        assert_eq!(args.ports.image_port, 3000);
        assert_eq!(args.ports.text_port, 2001);
        assert_eq!(args.count, Some(2));
        assert!(args.bind.is_unspecified());
    }

    #[test]
    fn rejects_zero_debounce() {
        let err = Cli::try_parse_from(["buscall", "kiosk", "110.jpg", "--debounce", "0s"])
            .expect_err("zero debounce should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn doctor_route_requires_image_dir() {
        let err = Cli::try_parse_from(["buscall", "doctor", "--route", "110.jpg"])
            .expect_err("route without image dir should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
