use std::process::Command;

// Stamp the binary with the short git revision so `twdict --version`
// identifies the build it came from. Builds outside a checkout get
// "unknown" rather than a failure.
fn main() {
    let revision = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=BUILD_HASH={revision}");
    println!("cargo:rerun-if-changed=../../.git/HEAD");
}
