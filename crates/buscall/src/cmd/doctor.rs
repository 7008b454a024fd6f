use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use buscall_kiosk::{DirectoryStore, ImageStore};
use buscall_payload::ChannelKind;
use buscall_transport::UdpReceiver;
use serde::Serialize;

use crate::cmd::DoctorArgs;
use crate::exit::{CliResult, HEALTH_CHECK_FAILED, SUCCESS};
use crate::output::OutputFormat;

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Pass,
    Fail,
    Warn,
    Info,
    Skip,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DoctorOutput {
    checks: Vec<CheckResult>,
    overall: &'static str,
}

pub fn run(args: DoctorArgs, format: OutputFormat) -> CliResult<i32> {
    let checks = vec![
        gpio_line_check(&args.gpio_root, args.gpio_pin),
        image_dir_check(args.image_dir.as_deref(), args.route.as_deref()),
        port_check(ChannelKind::Image, args.ports.image_port),
        port_check(ChannelKind::Text, args.ports.text_port),
        compiled_features_check(),
    ];

    let has_fail = checks.iter().any(|c| matches!(c.status, CheckStatus::Fail));
    let overall = if has_fail { "fail" } else { "pass" };

    let output = DoctorOutput { checks, overall };

    print_doctor(&output, format);

    if has_fail {
        Ok(HEALTH_CHECK_FAILED)
    } else {
        Ok(SUCCESS)
    }
}

fn print_doctor(output: &DoctorOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(output).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("buscall doctor\n");
            for c in &output.checks {
                println!(
                    "  [{:>4}] {:<16} {}",
                    status_text(c.status),
                    c.name,
                    c.detail
                );
            }
            if output.overall == "pass" {
                println!("\n  Result: all checks passed");
            } else {
                println!("\n  Result: one or more checks failed");
            }
        }
        OutputFormat::Raw => {
            println!("{}", output.overall);
        }
    }
}

fn status_text(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "PASS",
        CheckStatus::Fail => "FAIL",
        CheckStatus::Warn => "WARN",
        CheckStatus::Info => "INFO",
        CheckStatus::Skip => "SKIP",
    }
}

/// The button line is only needed by the kiosk, so a missing one is a warning.
fn gpio_line_check(root: &Path, pin: u32) -> CheckResult {
    const NAME: &str = "gpio_line";

    if !root.is_dir() {
        return CheckResult::new(
            NAME,
            CheckStatus::Warn,
            format!("{} not present (kiosk cannot run here)", root.display()),
        );
    }

    let value = root.join(format!("gpio{pin}")).join("value");
    if !value.exists() {
        return CheckResult::new(
            NAME,
            CheckStatus::Info,
            format!("gpio{pin} not exported yet; kiosk will export it"),
        );
    }

    match std::fs::read(&value) {
        Ok(_) => CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("{} readable", value.display()),
        ),
        Err(err) => CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{} unreadable: {err}", value.display()),
        ),
    }
}

fn image_dir_check(dir: Option<&Path>, route: Option<&str>) -> CheckResult {
    const NAME: &str = "image_dir";

    let Some(dir) = dir else {
        return CheckResult::new(NAME, CheckStatus::Skip, "BUSCALL_IMAGE_DIR not set");
    };

    if !dir.is_dir() {
        return CheckResult::new(
            NAME,
            CheckStatus::Fail,
            format!("{} is not a directory", dir.display()),
        );
    }

    let Some(route) = route else {
        return CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("{} exists", dir.display()),
        );
    };

    // A missing image only costs the image datagram; the message still goes out.
    match DirectoryStore::new(dir).load(route) {
        Ok(blob) => CheckResult::new(
            NAME,
            CheckStatus::Pass,
            format!("route {route:?} resolves ({} bytes)", blob.len()),
        ),
        Err(err) => CheckResult::new(NAME, CheckStatus::Warn, err.to_string()),
    }
}

fn port_check(kind: ChannelKind, port: u16) -> CheckResult {
    let name = format!("{kind}_port");
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    match UdpReceiver::bind(addr) {
        Ok(_) => CheckResult::new(&name, CheckStatus::Pass, format!("udp {port} bindable")),
        Err(err) => CheckResult::new(
            &name,
            CheckStatus::Warn,
            format!("udp {port} not bindable (depot cannot run here): {err}"),
        ),
    }
}

fn compiled_features_check() -> CheckResult {
    let mut features = Vec::new();
    if cfg!(feature = "kiosk") {
        features.push("kiosk");
    }
    if cfg!(feature = "depot") {
        features.push("depot");
    }
    if cfg!(feature = "cli") {
        features.push("cli");
    }

    CheckResult::new("compiled_features", CheckStatus::Info, features.join(", "))
}
