use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    println!("cargo:rustc-env=SALES_INSIGHT_BUILD_HASH={}", git_output(&["rev-parse", "--short", "HEAD"]));

    let status = git_output(&["status", "--porcelain"]);
    let status = match status.as_str() {
        "unknown" => "unknown",
        "" => "clean",
        _ => "dirty",
    };
    println!("cargo:rustc-env=SALES_INSIGHT_BUILD_STATUS={status}");

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    println!("cargo:rustc-env=SALES_INSIGHT_BUILD_TIMESTAMP={timestamp}");

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());
    println!("cargo:rustc-env=SALES_INSIGHT_BUILD_TARGET={target}");

    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_string());
    println!("cargo:rustc-env=SALES_INSIGHT_BUILD_PROFILE={profile}");
}

/// Trimmed stdout of a git command, `""` for empty output, `"unknown"` when git is unavailable.
fn git_output(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
