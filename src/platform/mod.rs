//! Platform glue
//!
//! Only Android is wired up; the adapter and geometry layers above this
//! module are platform-free and carry the testable behavior.

#[cfg(target_os = "android")]
pub mod android;

#[cfg(target_os = "android")]
pub use android::{current_insets_snapshot, ContentView};
