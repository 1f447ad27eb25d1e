// lib.rs from rustwad (c) 2025 NinjaCheetah & Contributors
// https://github.com/NinjaCheetah/rustwad
//
// Root level module that imports the feature modules.

pub mod title;

/// Gets the version of the library, as recorded at build time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
