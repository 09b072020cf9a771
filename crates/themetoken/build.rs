// Build provenance surfaced by `themetoken version --extended` and `envinfo`.
fn main() {
    for (source, exported) in [
        ("TARGET", "THEMETOKEN_BUILD_TARGET"),
        ("PROFILE", "THEMETOKEN_BUILD_PROFILE"),
    ] {
        println!("cargo:rerun-if-env-changed={source}");
        if let Ok(value) = std::env::var(source) {
            println!("cargo:rustc-env={exported}={value}");
        }
    }
}
