use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rustc-env=JENKINS_CLIENT_VERSION={}", version());
}

/// `git describe` output when building from a checkout, the crate version otherwise.
fn version() -> String {
    let described = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|v| !v.is_empty());

    described.unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
}
