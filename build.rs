use std::process::Command;

fn main() {
    set_git_version();
}

fn set_git_version() {
    let version = Command::new("git")
        .arg("describe")
        .arg("--always")
        .arg("--dirty=-modified")
        .output()
        .ok()
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|version| !version.is_empty())
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_default());
    println!("cargo::rustc-env=VERSION={version}");
}
