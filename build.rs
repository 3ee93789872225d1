//! Record the compiler that built this binary for the controller runtime check.

fn main() {
    let version = rustc_version::version()
        .map(|v| v.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env=TOOL_RUSTC_VERSION={version}");
    println!("cargo:rerun-if-changed=build.rs");
}
