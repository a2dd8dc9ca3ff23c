//! Sets `RISKI_BUILD_GIT_HASH` and `RISKI_BUILD_TIMESTAMP` for `build_info`.
//!
//! Both can be pinned from the environment; otherwise the hash comes from
//! `git rev-parse` and the timestamp is the current unix time.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=RISKI_BUILD_GIT_HASH");
    println!("cargo:rerun-if-env-changed=RISKI_BUILD_TIMESTAMP");

    let git_hash = env::var("RISKI_BUILD_GIT_HASH")
        .ok()
        .or_else(head_commit)
        .unwrap_or_else(|| "unknown".to_string());
    let timestamp = env::var("RISKI_BUILD_TIMESTAMP").unwrap_or_else(|_| {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);
        format!("unix:{secs}")
    });

    println!("cargo:rustc-env=RISKI_BUILD_GIT_HASH={git_hash}");
    println!("cargo:rustc-env=RISKI_BUILD_TIMESTAMP={timestamp}");
}

fn head_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=12", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}
