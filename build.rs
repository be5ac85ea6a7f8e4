use std::env;
use std::process::Command;

fn main() {
    // Look up the git hash only for release builds (or when forced) so debug
    // rebuilds stay fast.
    let profile = env::var("PROFILE").unwrap_or_default();
    let force_hash = env::var("BUILD_VERSION_WITH_HASH").is_ok();

    let mut version_string = env::var("CARGO_PKG_VERSION").unwrap_or_default();

    if profile == "release" || force_hash {
        let git_output = Command::new("git")
            .args(["rev-parse", "--short", "HEAD"])
            .output();

        if let Ok(output) = git_output {
            if output.status.success() {
                let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !hash.is_empty() {
                    version_string = format!("{} ({})", version_string, hash);
                }
            } else {
                eprintln!(
                    "cargo:warning=Failed to get git hash: {}",
                    String::from_utf8_lossy(&output.stderr)
                );
            }
        } else {
            eprintln!("cargo:warning=Failed to execute git command. Is git installed and in PATH?");
        }
    } else {
        version_string = format!("{} (dev)", version_string);
    }

    println!("cargo:rustc-env=AWSKIT_BUILD_VERSION={}", version_string);

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/packed-refs");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
