//! Bindings version.

/// Version of these bindings.
pub const BINDINGS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version of these bindings as `major.minor.patch`.
pub fn bindings_version() -> &'static str {
    BINDINGS_VERSION
}
