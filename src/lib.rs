//! sg_android - Android platform glue for the Stellar Guesser app
//!
//! Makes the window edge-to-edge and keeps content clear of system UI. On
//! window creation the adapter disables decor fit, paints the status and
//! navigation bars transparent, sets the display-cutout mode, and registers
//! exactly one inset-change handler against the event source. Every inset
//! event then pads the root content view by the per-edge maximum of the
//! system-bar and display-cutout insets and consumes the event.
//!
//! Everything outside [`platform`] is platform-free; the behavior is
//! unit-testable on a desktop host.

// Core modules
pub mod adapter;
pub mod config;
pub mod insets;
pub mod platform;

// Re-exports for convenience
pub use adapter::{
    apply_safe_area, clear_safe_area_handler, dispatch_insets_changed, has_safe_area_handler,
    last_safe_area, register_safe_area_handler, InsetDisposition, InsetSink, SafeAreaHandler,
};
pub use config::{chrome_config, set_chrome_config, ChromeConfig, CutoutMode};
pub use insets::{Insets, InsetsSnapshot};

/// Tag used by the Android logger and logcat filters.
pub const LOG_TAG: &str = "StellarGuesser";

/// Crate version, surfaced in the startup log line.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
