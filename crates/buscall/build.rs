use std::process::Command;

fn main() {
    if let Ok(target) = std::env::var("TARGET") {
        println!("cargo:rustc-env=BUSCALL_BUILD_TARGET={target}");
    }
    println!("cargo:rerun-if-env-changed=TARGET");

    // Source tarballs have no git metadata; version output falls back to "unknown".
    let hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(hash) = hash {
        println!("cargo:rustc-env=BUSCALL_GIT_HASH={hash}");
    }
}
