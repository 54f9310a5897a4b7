//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Version line printed by `simulate --version`.
pub fn version_line() -> String {
    format!("dropped-votes {} ({}, {})", PKG_VERSION, BUILD_DATE, BUILD_COMMIT)
}
