#![cfg(all(unix, feature = "cli"))]

use std::io::{BufRead, BufReader, Read};
use std::net::UdpSocket;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use buscall::payload::WAITING_MESSAGE;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/buscall-cli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

/// Two loopback UDP ports that were free a moment ago.
fn free_ports() -> (u16, u16) {
    let a = UdpSocket::bind("127.0.0.1:0").expect("ephemeral bind should work");
    let b = UdpSocket::bind("127.0.0.1:0").expect("ephemeral bind should work");
    (
        a.local_addr().expect("local addr").port(),
        b.local_addr().expect("local addr").port(),
    )
}

fn blob(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 253) as u8).collect()
}

/// Start a depot that exits after `count` events and wait until it listens.
fn spawn_depot(artifact: &Path, ports: (u16, u16), count: usize) -> Child {
    let mut child = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--format", "json", "--log-level", "info", "depot"])
        .args(["--bind", "127.0.0.1"])
        .args(["--image-port", &ports.0.to_string()])
        .args(["--text-port", &ports.1.to_string()])
        .args(["--idle-sleep", "10ms"])
        .args(["--count", &count.to_string()])
        .arg("--output")
        .arg(artifact)
        .env_remove("BUSCALL_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("depot command should start");

    let stderr = child.stderr.take().expect("stderr should be piped");
    let (ready_tx, ready_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if line.contains("receiver listening") {
                let _ = ready_tx.send(());
            }
        }
    });

    if ready_rx.recv_timeout(Duration::from_secs(5)).is_err() {
        let _ = child.kill();
        panic!("depot did not start listening");
    }
    child
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Option<i32> {
    let start = Instant::now();
    loop {
        if let Ok(Some(status)) = child.try_wait() {
            return status.code();
        }
        if start.elapsed() >= timeout {
            let _ = child.kill();
            let _ = child.wait();
            return None;
        }
        thread::sleep(Duration::from_millis(20));
    }
}

fn stdout_lines(child: &mut Child) -> Vec<serde_json::Value> {
    let mut out = String::new();
    child
        .stdout
        .take()
        .expect("stdout should be piped")
        .read_to_string(&mut out)
        .expect("stdout should be readable");
    out.lines()
        .map(|line| serde_json::from_str(line).expect("depot output should be json"))
        .collect()
}

fn assert_depot_events(events: &[serde_json::Value], image_len: usize) {
    assert_eq!(events.len(), 2, "unexpected depot output: {events:?}");
    assert_eq!(events[0]["channel"], "image");
    assert_eq!(events[0]["event"], "image_stored");
    assert_eq!(events[0]["bytes"], image_len);
    assert_eq!(events[1]["channel"], "text");
    assert_eq!(events[1]["event"], "message");
    assert_eq!(events[1]["text"], WAITING_MESSAGE);
}

#[test]
fn send_reaches_depot_and_overwrites_artifact() {
    let dir = unique_temp_dir("send");
    let images = dir.join("images");
    std::fs::create_dir_all(&images).expect("image dir should be creatable");
    let image = blob(20_000);
    std::fs::write(images.join("110.jpg"), &image).expect("image should be writable");
    let artifact = dir.join("received_image.jpg");
    std::fs::write(&artifact, b"stale").expect("artifact should be writable");

    let ports = free_ports();
    let mut depot = spawn_depot(&artifact, ports, 2);

    let send = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--format", "json", "--log-level", "error", "send", "110.jpg"])
        .args(["--receiver", "127.0.0.1"])
        .args(["--image-port", &ports.0.to_string()])
        .args(["--text-port", &ports.1.to_string()])
        .arg("--image-dir")
        .arg(&images)
        .output()
        .expect("send command should run");
    assert!(send.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&send.stdout).expect("send report should be json");
    assert_eq!(report["image"]["status"], "sent");
    assert_eq!(report["text"]["status"], "sent");

    assert_eq!(wait_with_timeout(&mut depot, Duration::from_secs(5)), Some(0));
    assert_depot_events(&stdout_lines(&mut depot), image.len());
    assert_eq!(std::fs::read(&artifact).expect("artifact should exist"), image);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_without_image_still_delivers_message() {
    let dir = unique_temp_dir("send-missing");
    let artifact = dir.join("received_image.jpg");
    let ports = free_ports();
    let mut depot = spawn_depot(&artifact, ports, 1);

    let send = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--format", "json", "--log-level", "error", "send", "404.jpg"])
        .args(["--receiver", "127.0.0.1"])
        .args(["--image-port", &ports.0.to_string()])
        .args(["--text-port", &ports.1.to_string()])
        .arg("--image-dir")
        .arg(&dir)
        .output()
        .expect("send command should run");
    assert!(send.status.success());

    assert_eq!(wait_with_timeout(&mut depot, Duration::from_secs(5)), Some(0));
    let events = stdout_lines(&mut depot);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["text"], WAITING_MESSAGE);
    assert!(!artifact.exists());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn kiosk_button_press_reaches_depot() {
    let dir = unique_temp_dir("kiosk");
    let gpio_root = dir.join("gpio");
    let line = gpio_root.join("gpio76");
    std::fs::create_dir_all(&line).expect("gpio dir should be creatable");
    std::fs::write(line.join("direction"), b"out").expect("direction should be writable");
    // Held high from the start: the first sample is a rising edge.
    std::fs::write(line.join("value"), b"1\n").expect("value should be writable");

    let images = dir.join("images");
    std::fs::create_dir_all(&images).expect("image dir should be creatable");
    let image = blob(12_345);
    std::fs::write(images.join("110.jpg"), &image).expect("image should be writable");
    let artifact = dir.join("received_image.jpg");

    let ports = free_ports();
    let mut depot = spawn_depot(&artifact, ports, 2);

    let mut kiosk = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--format", "json", "--log-level", "error", "kiosk", "110.jpg"])
        .args(["--receiver", "127.0.0.1"])
        .args(["--image-port", &ports.0.to_string()])
        .args(["--text-port", &ports.1.to_string()])
        .arg("--image-dir")
        .arg(&images)
        .arg("--gpio-root")
        .arg(&gpio_root)
        .args(["--poll-interval", "10ms", "--debounce", "50ms"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("kiosk command should start");

    let depot_code = wait_with_timeout(&mut depot, Duration::from_secs(5));
    let _ = kiosk.kill();
    let _ = kiosk.wait();

    assert_eq!(depot_code, Some(0));
    assert_depot_events(&stdout_lines(&mut depot), image.len());
    assert_eq!(std::fs::read(&artifact).expect("artifact should exist"), image);
    assert_eq!(
        std::fs::read_to_string(line.join("direction")).expect("direction should be readable"),
        "in"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn kiosk_without_gpio_line_exits_with_failure() {
    let dir = unique_temp_dir("kiosk-nogpio");
    let output = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--log-level", "error", "kiosk", "110.jpg"])
        .args(["--receiver", "127.0.0.1"])
        .arg("--gpio-root")
        .arg(dir.join("missing"))
        .output()
        .expect("kiosk command should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gpio76"), "stderr: {stderr}");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn send_rejects_route_outside_image_dir() {
    let output = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--log-level", "error", "send", "../110.jpg"])
        .args(["--receiver", "127.0.0.1"])
        .output()
        .expect("send command should run");

    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid route"), "stderr: {stderr}");
}

#[test]
fn doctor_reports_json_checks() {
    let dir = unique_temp_dir("doctor");
    std::fs::write(dir.join("110.jpg"), b"jpeg").expect("image should be writable");
    let (image_port, text_port) = free_ports();

    let output = Command::new(env!("CARGO_BIN_EXE_buscall"))
        .args(["--format", "json", "--log-level", "error", "doctor"])
        .arg("--gpio-root")
        .arg(dir.join("gpio"))
        .arg("--image-dir")
        .arg(&dir)
        .args(["--route", "110.jpg"])
        .args(["--image-port", &image_port.to_string()])
        .args(["--text-port", &text_port.to_string()])
        .output()
        .expect("doctor command should run");

    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("doctor output should be json");
    assert_eq!(report["overall"], "pass");
    let checks = report["checks"].as_array().expect("checks should be an array");
    let image_dir = checks
        .iter()
        .find(|c| c["name"] == "image_dir")
        .expect("image_dir check should be present");
    assert_eq!(image_dir["status"], "pass");

    let _ = std::fs::remove_dir_all(&dir);
}
