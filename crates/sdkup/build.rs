use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let git_hash = git_short_hash().unwrap_or_else(|| "unknown".to_owned());
    let build_date = Utc::now().format("%Y-%m-%d").to_string();

    let version_string = if is_tagged(version, &git_hash) {
        version.to_owned()
    } else {
        format!("{version}+{git_hash}.{build_date}")
    };

    println!("cargo:rustc-env=SDKUP_VERSION={version_string}");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8(output.stdout).ok())
        .flatten()
        .map(|hash| hash.trim().to_owned())
}

/// Release builds are cut from a `v<version>` tag on HEAD.
fn is_tagged(version: &str, git_hash: &str) -> bool {
    if git_hash == "unknown" {
        return false;
    }

    let expected = format!("v{version}");
    Command::new("git")
        .args(["tag", "--points-at", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .is_some_and(|tags| tags.lines().any(|line| line.trim() == expected))
}
